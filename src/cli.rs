//! Terminal front end: one subcommand per list view or modal action.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::errors::ApiError;
use crate::domain::history::HistoryAction;
use crate::domain::types::ShedId;
use crate::forms::auth::{LoginForm, SignupForm};
use crate::forms::history::{DeliveryNoteForm, ReturnForm, WithdrawForm};
use crate::forms::items::{AdjustStockForm, CreateItemForm, DeleteItemForm};
use crate::forms::movements::MoveItemForm;
use crate::forms::observations::ObservationForm;
use crate::models::config::ClientConfig;
use crate::pagination::{Envelope, PaginationState};
use crate::query::FilterSet;
use crate::repository::{
    DeletedItemFilters, HistoryFilters, HttpRepository, ItemFilters, ListQuery, PendingFilters,
    UserFilters,
};
use crate::services::{self, ServiceError, ServiceResult};

#[derive(Parser)]
#[command(name = "stock-client", version)]
#[command(about = "Terminal client for the warehouse inventory API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and keep the token for later commands.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    /// Print the name of the logged-in user.
    Whoami,
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    #[command(subcommand)]
    Items(ItemsCommand),
    #[command(subcommand)]
    Sheds(ShedsCommand),
    #[command(subcommand)]
    Movements(MovementsCommand),
    #[command(subcommand)]
    History(HistoryCommand),
    #[command(subcommand)]
    Observations(ObservationsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Args, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page; the configured default of the view when omitted.
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand)]
pub enum ItemsCommand {
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        shed: Option<i32>,
        #[command(flatten)]
        page: PageArgs,
    },
    Search {
        name: String,
    },
    Show {
        id: i32,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        quantity: i32,
        #[arg(long)]
        category: String,
        #[arg(long)]
        shed: Option<i32>,
    },
    /// Add or remove units.
    Adjust {
        id: i32,
        #[arg(long)]
        quantity: i32,
        #[arg(long, value_parser = ["add", "rest"])]
        action: String,
    },
    /// Soft-delete an item.
    Delete {
        id: i32,
        #[arg(long)]
        reason: String,
    },
    /// List soft-deleted items.
    Deleted {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum ShedsCommand {
    List,
    Show { id: i32 },
}

#[derive(Subcommand)]
pub enum MovementsCommand {
    List {
        item_id: i32,
    },
    /// Move units of an item to another shed.
    Move {
        item_id: i32,
        #[arg(long)]
        to: i32,
        #[arg(long)]
        quantity: i32,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    List {
        #[arg(long)]
        item_name: Option<String>,
        #[arg(long)]
        user_name: Option<String>,
        #[arg(long)]
        place: Option<String>,
        /// `retiro` or `devolucion`.
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        shed: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Withdrawals not fully returned yet.
    Pending {
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        place: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Withdraw {
        item_id: i32,
        #[arg(long)]
        amount: i32,
        #[arg(long)]
        place: String,
        #[arg(long)]
        person: Option<String>,
    },
    Return {
        item_id: i32,
        #[arg(long)]
        amount: i32,
        #[arg(long)]
        place: String,
        #[arg(long)]
        person: Option<String>,
    },
    /// Generate a delivery note for the given records and save it.
    Note {
        #[arg(required = true)]
        ids: Vec<i32>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ObservationsCommand {
    List { item_id: i32 },
    Add { item_id: i32, text: String },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Deactivate a user account.
    Delete { id: i32 },
}

/// Executes one command against the API.
pub async fn run(cli: Cli, repo: &HttpRepository, config: &ClientConfig) -> ServiceResult<()> {
    let sizes = config.page_sizes;

    match cli.command {
        Command::Login { username, password } => {
            services::auth::login(repo, LoginForm { username, password }).await?;
            println!("logged in");
        }
        Command::Logout => {
            services::auth::logout(repo).await?;
            println!("logged out");
        }
        Command::Whoami => {
            println!("{}", services::users::current_user_name(repo).await?);
        }
        Command::Signup {
            name,
            surname,
            email,
            password,
        } => {
            let form = SignupForm {
                name,
                surname,
                email,
                password,
            };
            println!("{}", services::auth::sign_up(repo, form).await?);
        }
        Command::Items(command) => run_items(command, repo, sizes.items, sizes.deleted).await?,
        Command::Sheds(ShedsCommand::List) => {
            for shed in services::items::list_sheds(repo).await? {
                println!("{:>5}  {}", shed.id, shed.name);
            }
        }
        Command::Sheds(ShedsCommand::Show { id }) => {
            let shed = services::items::get_shed(repo, id).await?;
            println!("{:>5}  {}", shed.id, shed.name);
        }
        Command::Movements(MovementsCommand::List { item_id }) => {
            for movement in services::movements::list_item_movements(repo, item_id).await? {
                println!(
                    "{}  {:>4} x {}  {} -> {}  by {}",
                    movement.date,
                    movement.quantity,
                    movement.item_name,
                    movement.from_shed_name,
                    movement.to_shed_name,
                    movement.username.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Movements(MovementsCommand::Move {
            item_id,
            to,
            quantity,
        }) => {
            let form = MoveItemForm {
                to_shed_id: Some(to),
                quantity,
            };
            let movement = services::movements::move_item(repo, item_id, form).await?;
            println!(
                "moved {} x {} to {}",
                movement.quantity, movement.item_name, movement.to_shed_name
            );
        }
        Command::History(command) => {
            run_history(command, repo, sizes.history, sizes.pending).await?
        }
        Command::Observations(ObservationsCommand::List { item_id }) => {
            for observation in
                services::observations::list_item_observations(repo, item_id).await?
            {
                println!(
                    "{}  {}: {}",
                    observation.date, observation.user_name, observation.description
                );
            }
        }
        Command::Observations(ObservationsCommand::Add { item_id, text }) => {
            let form = ObservationForm {
                item_id,
                description: text,
            };
            let observation = services::observations::add_observation(repo, form).await?;
            println!("observation {} added", observation.id);
        }
        Command::Users(UsersCommand::List { name, email, page }) => {
            let query = list_query(UserFilters { name, email }, page, sizes.users);
            let envelope = services::users::list_users(repo, &query).await?;
            print_page(&envelope, &query, |user| {
                format!(
                    "{:>5}  {:<30} {:<30} {}",
                    user.id,
                    user.full_name(),
                    user.email,
                    user.role
                )
            });
        }
        Command::Users(UsersCommand::Delete { id }) => {
            println!("{}", services::users::delete_user(repo, id).await?);
        }
    }

    Ok(())
}

async fn run_items(
    command: ItemsCommand,
    repo: &HttpRepository,
    page_size: usize,
    deleted_page_size: usize,
) -> ServiceResult<()> {
    match command {
        ItemsCommand::List {
            name,
            category,
            shed,
            page,
        } => {
            let filters = ItemFilters {
                name,
                category,
                shed_id: shed.map(ShedId::new).transpose()?,
            };
            let query = list_query(filters, page, page_size);
            let envelope = services::items::list_items(repo, &query).await?;
            print_page(&envelope, &query, |item| {
                format!(
                    "{:>5}  {:<30} {:<16} {:>4}/{:<4}",
                    item.id,
                    item.name,
                    item.category.as_deref().unwrap_or("-"),
                    item.actual_amount,
                    item.total_amount
                )
            });
        }
        ItemsCommand::Search { name } => {
            for item in services::items::search_items(repo, &name).await? {
                println!("{:>5}  {}", item.id, item.name);
            }
        }
        ItemsCommand::Show { id } => {
            let details = services::items::get_item_details(repo, id).await?;
            let item = &details.item;
            println!("{} (#{})", item.name, item.id);
            println!("  category:    {}", item.category.as_deref().unwrap_or("-"));
            println!("  description: {}", item.description.as_deref().unwrap_or("-"));
            println!(
                "  stock:       {} in shed, {} out, {} total",
                item.actual_amount,
                item.outstanding(),
                item.total_amount
            );
            println!(
                "  history:     {} movements, {} observations",
                details.relations.movements_count, details.relations.observations_count
            );
            if let Some(info) = details.metadata.deletion_info.as_ref()
                && details.metadata.is_deleted
            {
                println!(
                    "  deleted:     {}",
                    info.deletion_reason.as_deref().unwrap_or("-")
                );
            }
        }
        ItemsCommand::Create {
            name,
            description,
            quantity,
            category,
            shed,
        } => {
            let form = CreateItemForm {
                name,
                description,
                quantity,
                category,
                shed_id: shed,
            };
            let item = services::items::create_item(repo, form).await?;
            println!("created item {} ({})", item.id, item.name);
        }
        ItemsCommand::Adjust {
            id,
            quantity,
            action,
        } => {
            let form = AdjustStockForm {
                item_id: id,
                quantity,
                action,
            };
            let item = services::items::adjust_stock(repo, form).await?;
            println!(
                "{}: {}/{} in stock",
                item.name, item.actual_amount, item.total_amount
            );
        }
        ItemsCommand::Delete { id, reason } => {
            let form = DeleteItemForm {
                item_id: id,
                reason,
                date: None,
            };
            println!("{}", services::items::delete_item(repo, form).await?);
        }
        ItemsCommand::Deleted {
            name,
            category,
            year,
            month,
            page,
        } => {
            let filters = DeletedItemFilters {
                name,
                category,
                year,
                month,
            };
            let query = list_query(filters, page, deleted_page_size);
            let envelope = services::items::list_deleted_items(repo, &query).await?;
            print_page(&envelope, &query, |deleted| {
                format!(
                    "{:>5}  {:<30} {}  {}",
                    deleted.item_id, deleted.name, deleted.deleted_at, deleted.deletion_reason
                )
            });
        }
    }

    Ok(())
}

async fn run_history(
    command: HistoryCommand,
    repo: &HttpRepository,
    page_size: usize,
    pending_page_size: usize,
) -> ServiceResult<()> {
    match command {
        HistoryCommand::List {
            item_name,
            user_name,
            place,
            action,
            category,
            shed,
            month,
            year,
            page,
        } => {
            let action = action
                .as_deref()
                .map(HistoryAction::try_from)
                .transpose()
                .map_err(ServiceError::Form)?;
            let filters = HistoryFilters {
                item_name,
                user_name,
                place,
                action,
                category,
                shed_id: shed.map(ShedId::new).transpose()?,
                month,
                year,
            };
            let query = list_query(filters, page, page_size);
            let envelope = services::history::list_history(repo, &query).await?;
            print_page(&envelope, &query, |record| {
                format!(
                    "{:>5}  {}  {:<10} {:>4} x {:<24} {:<16} {}",
                    record.id,
                    record.date,
                    record.action,
                    record.amount_retired.unwrap_or_default(),
                    record.item_name,
                    record.place,
                    record.user_name
                )
            });
        }
        HistoryCommand::Pending {
            person,
            place,
            page,
        } => {
            let filters = PendingFilters {
                person_who_took: person,
                place,
            };
            let query = list_query(filters, page, pending_page_size);
            let envelope = services::history::list_pending(repo, &query).await?;
            print_page(&envelope, &query, |record| {
                format!(
                    "{:>5}  {}  {:>4} out  {:<24} {:<16} {}",
                    record.id,
                    record.date,
                    record.amount_not_returned.unwrap_or_default(),
                    record.item_name,
                    record.place,
                    record.person_who_took.as_deref().unwrap_or("-")
                )
            });
        }
        HistoryCommand::Withdraw {
            item_id,
            amount,
            place,
            person,
        } => {
            let form = WithdrawForm {
                item_id,
                amount,
                place,
                person_who_took: person,
            };
            let record = services::history::withdraw_item(repo, form).await?;
            println!("withdrawal {} recorded", record.id);
        }
        HistoryCommand::Return {
            item_id,
            amount,
            place,
            person,
        } => {
            let form = ReturnForm {
                item_id,
                amount,
                place,
                person_who_returned: person,
            };
            let record = services::history::return_item(repo, form).await?;
            println!("return {} recorded", record.id);
        }
        HistoryCommand::Note { ids, output } => {
            let form = DeliveryNoteForm { history_ids: ids };
            let document = services::history::generate_delivery_note(repo, form).await?;
            fs::write(&output, &document).map_err(ApiError::from)?;
            println!("{} bytes written to {}", document.len(), output.display());
        }
    }

    Ok(())
}

fn list_query<F: FilterSet>(filters: F, page: PageArgs, default_page_size: usize) -> ListQuery<F> {
    ListQuery::new(filters).paginate(page.page, page.page_size.unwrap_or(default_page_size))
}

fn print_page<F: FilterSet, T>(
    envelope: &Envelope<T>,
    query: &ListQuery<F>,
    row: impl Fn(&T) -> String,
) {
    for record in &envelope.data {
        println!("{}", row(record));
    }
    let state = page_state(envelope, query);
    println!("{}", page_footer(&state));
    if state.total_pages() > 1 {
        println!("{}", page_links(&state));
    }
}

/// Position reported by the server, falling back to the requested page.
fn page_state<F: FilterSet, T>(envelope: &Envelope<T>, query: &ListQuery<F>) -> PaginationState {
    let info = &envelope.pagination;
    let mut state = PaginationState::new(info.page_size.unwrap_or(query.pagination.per_page));
    state.apply_result(info);
    state.set_page(info.current_page.unwrap_or(query.pagination.page));
    state
}

/// `page X/Y (a-b of n)`.
fn page_footer(state: &PaginationState) -> String {
    let shown = match state.showing_range() {
        Some((first, last)) => format!("{first}-{last} of {}", state.total_records()),
        None => format!("0 of {}", state.total_records()),
    };
    format!(
        "page {}/{} ({shown})",
        state.page(),
        state.total_pages()
    )
}

/// Page links with the current page in brackets and gaps as `…`.
fn page_links(state: &PaginationState) -> String {
    state
        .page_window()
        .into_iter()
        .map(|page| match page {
            Some(page) if page == state.page() => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageInfo;

    fn envelope(total_records: usize, current_page: Option<usize>) -> Envelope<()> {
        Envelope::new(
            Vec::new(),
            PageInfo {
                total_records,
                total_pages: None,
                current_page,
                page_size: None,
            },
        )
    }

    #[test]
    fn footer_shows_range_of_current_page() {
        let query = ListQuery::new(ItemFilters::default()).paginate(3, 10);
        let state = page_state(&envelope(25, None), &query);

        assert_eq!(page_footer(&state), "page 3/3 (21-25 of 25)");
    }

    #[test]
    fn footer_for_empty_result() {
        let query = ListQuery::new(ItemFilters::default());
        let state = page_state(&envelope(0, Some(1)), &query);

        assert_eq!(page_footer(&state), "page 1/1 (0 of 0)");
    }

    #[test]
    fn links_mark_current_page() {
        let query = ListQuery::new(UserFilters::default()).paginate(2, 10);
        let state = page_state(&envelope(30, Some(2)), &query);

        assert_eq!(page_links(&state), "1 [2] 3");
    }

    #[test]
    fn cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "stock-client",
            "items",
            "list",
            "--name",
            "tornillo",
            "--page",
            "2",
        ])
        .unwrap();

        match cli.command {
            Command::Items(ItemsCommand::List { name, page, .. }) => {
                assert_eq!(name.as_deref(), Some("tornillo"));
                assert_eq!(page.page, 2);
                assert_eq!(page.page_size, None);
            }
            _ => panic!("unexpected command"),
        }
    }
}

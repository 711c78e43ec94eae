use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Months, NaiveDate};

use crate::api::errors::ApiResult;
use crate::domain::deleted_item::DeletedItem;
use crate::domain::history::{HistoryAction, HistoryRecord, NewReturn, NewWithdrawal};
use crate::domain::item::{DeleteItem, Item, ItemDetails, NewItem, StockAdjustment};
use crate::domain::movement::{Movement, NewMovement};
use crate::domain::observation::{NewObservation, Observation};
use crate::domain::shed::Shed;
use crate::domain::types::{HistoryId, ItemId, ShedId, UserId};
use crate::domain::user::{Credentials, NewUser, User};
use crate::dto::auth::TokenResponse;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Envelope};
use crate::query::{FilterSet, FilterValue, QueryParams};

pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Filter set plus the page being requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub filters: F,
    pub pagination: Pagination,
}

impl<F: FilterSet> ListQuery<F> {
    pub fn new(filters: F) -> Self {
        Self {
            filters,
            pagination: Pagination::default(),
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Pagination {
            page: page.max(1),
            per_page: per_page.max(1),
        };
        self
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::build(
            &self.filters,
            self.pagination.page,
            self.pagination.per_page,
        )
    }
}

impl<F: FilterSet> Default for ListQuery<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

/// Filters of the inventory table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilters {
    pub name: Option<String>,
    pub category: Option<String>,
    pub shed_id: Option<ShedId>,
}

impl ItemFilters {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn shed(mut self, shed_id: ShedId) -> Self {
        self.shed_id = Some(shed_id);
        self
    }
}

impl FilterSet for ItemFilters {
    const PAGE_SIZE_KEY: &'static str = "pageSize";

    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("name", self.name.as_ref().into()),
            ("category", self.category.as_ref().into()),
            ("shed_id", self.shed_id.map(ShedId::get).into()),
        ]
    }
}

/// Filters of the movement history table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilters {
    pub item_name: Option<String>,
    pub user_name: Option<String>,
    pub place: Option<String>,
    pub action: Option<HistoryAction>,
    pub category: Option<String>,
    pub shed_id: Option<ShedId>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl FilterSet for HistoryFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("item_name", self.item_name.as_ref().into()),
            ("user_name", self.user_name.as_ref().into()),
            ("place", self.place.as_ref().into()),
            ("action", self.action.map(HistoryAction::as_str).into()),
            ("item_category", self.category.as_ref().into()),
            ("shedId", self.shed_id.map(ShedId::get).into()),
            ("month", self.month.map(i64::from).into()),
            ("year", self.year.into()),
        ]
    }
}

/// Filters of the pending-returns table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingFilters {
    pub person_who_took: Option<String>,
    pub place: Option<String>,
}

impl FilterSet for PendingFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("person_who_took", self.person_who_took.as_ref().into()),
            ("place", self.place.as_ref().into()),
        ]
    }
}

/// Filters of the deleted-items table. Year and month narrow the listing to
/// a one-month `from`/`to` window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedItemFilters {
    pub name: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

const DATE_RANGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl DeletedItemFilters {
    /// Start and end of the selected month, or `None` without year and month.
    pub fn date_range(&self) -> Option<(String, String)> {
        if self.year.is_none() && self.month.is_none() {
            return None;
        }
        let from = NaiveDate::from_ymd_opt(self.year.unwrap_or(2000), self.month.unwrap_or(1), 1)?;
        let to = from.checked_add_months(Months::new(1))?;
        let from = from.and_hms_opt(0, 0, 0)?;
        let to = to.and_hms_opt(0, 0, 0)?;
        Some((
            from.format(DATE_RANGE_FORMAT).to_string(),
            to.format(DATE_RANGE_FORMAT).to_string(),
        ))
    }
}

impl FilterSet for DeletedItemFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        let (from, to) = self.date_range().unzip();
        vec![
            ("name", self.name.as_ref().into()),
            ("category", self.category.as_ref().into()),
            ("from", from.into()),
            ("to", to.into()),
        ]
    }
}

/// Filters of the admin user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FilterSet for UserFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("name", self.name.as_ref().into()),
            ("email", self.email.as_ref().into()),
        ]
    }
}

#[async_trait]
pub trait ItemReader {
    async fn list_items(&self, query: &ListQuery<ItemFilters>) -> ApiResult<Envelope<Item>>;
    async fn search_items(&self, name: &str) -> ApiResult<Vec<Item>>;
    async fn get_item_details(&self, id: ItemId) -> ApiResult<ItemDetails>;
    async fn list_deleted_items(
        &self,
        query: &ListQuery<DeletedItemFilters>,
    ) -> ApiResult<Envelope<DeletedItem>>;
}

#[async_trait]
pub trait ItemWriter {
    async fn create_item(&self, new_item: &NewItem) -> ApiResult<Item>;
    async fn adjust_stock(&self, id: ItemId, adjustment: &StockAdjustment) -> ApiResult<Item>;
    async fn delete_item(&self, request: &DeleteItem) -> ApiResult<String>;
}

#[async_trait]
pub trait ShedReader {
    async fn list_sheds(&self) -> ApiResult<Vec<Shed>>;
    async fn get_shed(&self, id: ShedId) -> ApiResult<Shed>;
}

#[async_trait]
pub trait MovementReader {
    async fn list_item_movements(&self, item_id: ItemId) -> ApiResult<Vec<Movement>>;
}

#[async_trait]
pub trait MovementWriter {
    async fn move_item(&self, movement: &NewMovement) -> ApiResult<Movement>;
}

#[async_trait]
pub trait HistoryReader {
    async fn list_history(
        &self,
        query: &ListQuery<HistoryFilters>,
    ) -> ApiResult<Envelope<HistoryRecord>>;
    async fn list_pending(
        &self,
        query: &ListQuery<PendingFilters>,
    ) -> ApiResult<Envelope<HistoryRecord>>;
}

#[async_trait]
pub trait HistoryWriter {
    async fn withdraw_item(&self, withdrawal: &NewWithdrawal) -> ApiResult<HistoryRecord>;
    async fn return_item(&self, item_return: &NewReturn) -> ApiResult<HistoryRecord>;
    async fn generate_delivery_note(&self, history_ids: &[HistoryId]) -> ApiResult<Bytes>;
}

#[async_trait]
pub trait ObservationReader {
    async fn list_item_observations(&self, item_id: ItemId) -> ApiResult<Vec<Observation>>;
}

#[async_trait]
pub trait ObservationWriter {
    async fn add_observation(&self, observation: &NewObservation) -> ApiResult<Observation>;
}

#[async_trait]
pub trait UserReader {
    async fn current_user_name(&self) -> ApiResult<String>;
    async fn list_users(&self, query: &ListQuery<UserFilters>) -> ApiResult<Envelope<User>>;
}

#[async_trait]
pub trait UserWriter {
    async fn delete_user(&self, id: UserId) -> ApiResult<String>;
}

/// Account entry points that do not require an existing token.
#[async_trait]
pub trait AuthGateway {
    async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse>;
    async fn logout(&self) -> ApiResult<()>;
    async fn sign_up(&self, new_user: &NewUser) -> ApiResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_query_matches_documented_order() {
        let query = ListQuery::new(ItemFilters::default().name("tornillo")).paginate(2, 10);
        assert_eq!(
            query.to_params().to_query_string(),
            "name=tornillo&page=2&pageSize=10"
        );
    }

    #[test]
    fn whitespace_name_is_sent_as_typed() {
        let query = ListQuery::new(ItemFilters::default().name(" ")).paginate(1, 10);
        assert_eq!(
            query.to_params().to_query_string(),
            "name=+&page=1&pageSize=10"
        );
    }

    #[test]
    fn empty_filters_send_only_paging() {
        let query = ListQuery::new(HistoryFilters {
            item_name: Some(String::new()),
            ..HistoryFilters::default()
        })
        .paginate(1, 10);

        assert_eq!(query.to_params().to_query_string(), "page=1&page_size=10");
    }

    #[test]
    fn history_filters_use_server_names() {
        let filters = HistoryFilters {
            action: Some(HistoryAction::Return),
            category: Some("Herramientas".into()),
            shed_id: Some(ShedId::new(2).unwrap()),
            month: Some(3),
            year: Some(2024),
            ..HistoryFilters::default()
        };
        let params = ListQuery::new(filters).paginate(1, 25).to_params();

        assert_eq!(
            params.to_query_string(),
            "action=devolucion&item_category=Herramientas&shedId=2&month=3&year=2024&page=1&page_size=25"
        );
    }

    #[test]
    fn deleted_items_month_becomes_date_range() {
        let filters = DeletedItemFilters {
            year: Some(2024),
            month: Some(12),
            ..DeletedItemFilters::default()
        };
        let params = ListQuery::new(filters).to_params();

        assert_eq!(params.get("from"), Some("2024-12-01T00:00:00"));
        assert_eq!(params.get("to"), Some("2025-01-01T00:00:00"));
    }

    #[test]
    fn deleted_items_month_without_year_defaults_to_2000() {
        let filters = DeletedItemFilters {
            month: Some(6),
            ..DeletedItemFilters::default()
        };
        assert_eq!(
            filters.date_range(),
            Some((
                "2000-06-01T00:00:00".to_string(),
                "2000-07-01T00:00:00".to_string()
            ))
        );
        assert_eq!(DeletedItemFilters::default().date_range(), None);
    }

    #[test]
    fn paginate_never_requests_page_zero() {
        let query = ListQuery::new(UserFilters::default()).paginate(0, 0);
        assert_eq!(query.pagination, Pagination { page: 1, per_page: 1 });
    }
}

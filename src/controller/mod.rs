//! List view controller.
//!
//! A [`ListController`] owns the filter set and pagination state of one list
//! view and turns every change into a fetch against a [`ListSource`]. Filter
//! edits are debounced; page and page-size changes fetch immediately. Each
//! fetch carries a generation number so that, by default, only the most
//! recently issued request may update the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::errors::ApiResult;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Envelope, PaginationState};
use crate::query::FilterSet;
use crate::repository::ListQuery;

pub mod debounce;
pub mod sources;

pub use debounce::Debouncer;
pub use sources::{DeletedItemsSource, HistorySource, ItemsSource, PendingSource, UsersSource};

/// Default filter debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// How long a form-validation message stays visible.
pub const VALIDATION_ERROR_TTL: Duration = Duration::from_secs(5);

/// Paginated data behind a list view.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Filters: FilterSet;
    type Row: Clone + Send + Sync + 'static;

    async fn fetch(&self, query: &ListQuery<Self::Filters>) -> ApiResult<Envelope<Self::Row>>;
}

/// Which of several overlapping responses ends up on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseOrdering {
    /// Responses to superseded requests are dropped.
    #[default]
    LastIssuedWins,
    /// Every response is applied in arrival order, so a slow stale response
    /// can overwrite newer data.
    LastResolvedWins,
}

/// What happened to the response of a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer request was issued while this one was in flight.
    Discarded,
}

#[derive(Clone, Copy, Debug)]
pub struct ListOptions {
    pub page_size: usize,
    pub debounce: Duration,
    pub ordering: ResponseOrdering,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_ITEMS_PER_PAGE,
            debounce: DEFAULT_DEBOUNCE,
            ordering: ResponseOrdering::default(),
        }
    }
}

impl ListOptions {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Everything a list view renders.
#[derive(Clone, Debug)]
pub struct ViewState<F, T> {
    pub rows: Vec<T>,
    pub pagination: PaginationState,
    pub filters: F,
    /// `true` while at least one fetch is in flight.
    pub loading: bool,
    /// Message of the last failed fetch, cleared by the next applied one.
    pub error: Option<String>,
    /// Client-side validation message, cleared after [`VALIDATION_ERROR_TTL`].
    pub validation_error: Option<String>,
}

struct State<F, T> {
    rows: Vec<T>,
    pagination: PaginationState,
    filters: F,
    in_flight: usize,
    error: Option<String>,
    validation_error: Option<String>,
    validation_seq: u64,
}

struct Inner<S: ListSource> {
    source: S,
    ordering: ResponseOrdering,
    state: Mutex<State<S::Filters, S::Row>>,
    issued: AtomicU64,
    debouncer: Debouncer,
}

/// Cloneable handle to the state of one list view.
pub struct ListController<S: ListSource> {
    inner: Arc<Inner<S>>,
}

impl<S: ListSource> Clone for ListController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> ListController<S> {
    /// Creates a controller with default filters on page 1. Nothing is fetched
    /// until [`ListController::mount`].
    pub fn new(source: S, options: ListOptions) -> Self {
        Self::with_filters(source, S::Filters::default(), options)
    }

    pub fn with_filters(source: S, filters: S::Filters, options: ListOptions) -> Self {
        let state = State {
            rows: Vec::new(),
            pagination: PaginationState::new(options.page_size),
            filters,
            in_flight: 0,
            error: None,
            validation_error: None,
            validation_seq: 0,
        };
        Self {
            inner: Arc::new(Inner {
                source,
                ordering: options.ordering,
                state: Mutex::new(state),
                issued: AtomicU64::new(0),
                debouncer: Debouncer::new(options.debounce),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Loads the first page.
    pub async fn mount(&self) -> ApiResult<FetchOutcome> {
        self.inner.state.lock().pagination.reset_page();
        self.inner.fetch().await
    }

    /// Replaces the filter set and returns to page 1. The fetch is debounced:
    /// a burst of edits results in a single request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn update_filters(&self, filters: S::Filters) {
        {
            let mut state = self.inner.state.lock();
            state.filters = filters;
            state.pagination.reset_page();
        }

        let inner = Arc::downgrade(&self.inner);
        self.inner.debouncer.call(move || async move {
            if let Some(inner) = inner.upgrade() {
                // Failures are already recorded in the view state.
                let _ = inner.fetch().await;
            }
        });
    }

    /// Applies `edit` to the current filters, then behaves like
    /// [`ListController::update_filters`].
    pub fn edit_filters(&self, edit: impl FnOnce(&mut S::Filters)) {
        let mut filters = self.inner.state.lock().filters.clone();
        edit(&mut filters);
        self.update_filters(filters);
    }

    /// Resets filters to their defaults and reloads page 1 right away.
    pub async fn clear_filters(&self) -> ApiResult<FetchOutcome> {
        self.inner.debouncer.cancel();
        {
            let mut state = self.inner.state.lock();
            state.filters = S::Filters::default();
            state.pagination.reset_page();
        }
        self.inner.fetch().await
    }

    /// Moves to `page` (clamped to the known page range) and fetches it.
    /// Selecting the page already shown does nothing.
    pub async fn set_page(&self, page: usize) -> ApiResult<Option<FetchOutcome>> {
        let changed = self.inner.state.lock().pagination.set_page(page);
        if !changed {
            return Ok(None);
        }
        self.inner.fetch().await.map(Some)
    }

    pub async fn next_page(&self) -> ApiResult<Option<FetchOutcome>> {
        let page = self.inner.state.lock().pagination.page();
        self.set_page(page + 1).await
    }

    pub async fn previous_page(&self) -> ApiResult<Option<FetchOutcome>> {
        let page = self.inner.state.lock().pagination.page();
        self.set_page(page.saturating_sub(1)).await
    }

    /// Changes the page size, returns to page 1 and fetches.
    pub async fn set_page_size(&self, page_size: usize) -> ApiResult<FetchOutcome> {
        self.inner.state.lock().pagination.set_page_size(page_size);
        self.inner.fetch().await
    }

    /// Fetches the current page again with the current filters.
    pub async fn refresh(&self) -> ApiResult<FetchOutcome> {
        self.inner.fetch().await
    }

    pub fn snapshot(&self) -> ViewState<S::Filters, S::Row> {
        let state = self.inner.state.lock();
        ViewState {
            rows: state.rows.clone(),
            pagination: state.pagination,
            filters: state.filters.clone(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
            validation_error: state.validation_error.clone(),
        }
    }

    pub fn pagination(&self) -> PaginationState {
        self.inner.state.lock().pagination
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().in_flight > 0
    }

    /// Shows a form-validation message for [`VALIDATION_ERROR_TTL`]. A newer
    /// message restarts the countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn report_validation_error(&self, message: impl Into<String>) {
        let seq = {
            let mut state = self.inner.state.lock();
            state.validation_seq += 1;
            state.validation_error = Some(message.into());
            state.validation_seq
        };

        let inner: Weak<Inner<S>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(VALIDATION_ERROR_TTL).await;
            if let Some(inner) = inner.upgrade() {
                let mut state = inner.state.lock();
                if state.validation_seq == seq {
                    state.validation_error = None;
                }
            }
        });
    }

    pub fn clear_validation_error(&self) {
        let mut state = self.inner.state.lock();
        state.validation_seq += 1;
        state.validation_error = None;
    }
}

/// Decrements the in-flight counter even when the fetch future is dropped.
struct InFlight<'a, F, T> {
    state: &'a Mutex<State<F, T>>,
}

impl<F, T> Drop for InFlight<'_, F, T> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<S: ListSource> Inner<S> {
    async fn fetch(&self) -> ApiResult<FetchOutcome> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let query = {
            let mut state = self.state.lock();
            state.in_flight += 1;
            ListQuery::new(state.filters.clone())
                .paginate(state.pagination.page(), state.pagination.page_size())
        };
        let guard = InFlight { state: &self.state };

        let result = self.source.fetch(&query).await;
        drop(guard);

        let mut state = self.state.lock();

        if self.ordering == ResponseOrdering::LastIssuedWins
            && generation != self.issued.load(Ordering::SeqCst)
        {
            log::debug!("Discarding response of superseded request #{generation}");
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(envelope) => {
                state.pagination.apply_result(&envelope.pagination);
                state.rows = envelope.data;
                state.error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

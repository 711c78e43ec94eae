//! [`ListSource`] adapters for the five list views.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::errors::ApiResult;
use crate::controller::ListSource;
use crate::domain::deleted_item::DeletedItem;
use crate::domain::history::HistoryRecord;
use crate::domain::item::Item;
use crate::domain::user::User;
use crate::pagination::Envelope;
use crate::repository::{
    DeletedItemFilters, HistoryFilters, HistoryReader, ItemFilters, ItemReader, ListQuery,
    PendingFilters, UserFilters, UserReader,
};

macro_rules! list_source {
    ($(#[$doc:meta])* $name:ident, $reader:ident, $filters:ty, $row:ty, $method:ident) => {
        $(#[$doc])*
        pub struct $name<R: ?Sized>(pub Arc<R>);

        impl<R: ?Sized> $name<R> {
            pub fn new(repo: Arc<R>) -> Self {
                Self(repo)
            }
        }

        impl<R: ?Sized> Clone for $name<R> {
            fn clone(&self) -> Self {
                Self(Arc::clone(&self.0))
            }
        }

        #[async_trait]
        impl<R> ListSource for $name<R>
        where
            R: $reader + Send + Sync + ?Sized + 'static,
        {
            type Filters = $filters;
            type Row = $row;

            async fn fetch(&self, query: &ListQuery<$filters>) -> ApiResult<Envelope<$row>> {
                self.0.$method(query).await
            }
        }
    };
}

list_source!(
    /// Inventory table.
    ItemsSource,
    ItemReader,
    ItemFilters,
    Item,
    list_items
);
list_source!(
    /// Movement history table.
    HistorySource,
    HistoryReader,
    HistoryFilters,
    HistoryRecord,
    list_history
);
list_source!(
    /// Withdrawals that still have items out.
    PendingSource,
    HistoryReader,
    PendingFilters,
    HistoryRecord,
    list_pending
);
list_source!(
    /// Soft-deleted items.
    DeletedItemsSource,
    ItemReader,
    DeletedItemFilters,
    DeletedItem,
    list_deleted_items
);
list_source!(
    /// Admin user directory.
    UsersSource,
    UserReader,
    UserFilters,
    User,
    list_users
);

//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use bytes::Bytes;
use mockall::mock;

use crate::api::errors::ApiResult;
use crate::domain::deleted_item::DeletedItem;
use crate::domain::history::{HistoryRecord, NewReturn, NewWithdrawal};
use crate::domain::item::{DeleteItem, Item, ItemDetails, NewItem, StockAdjustment};
use crate::domain::movement::{Movement, NewMovement};
use crate::domain::observation::{NewObservation, Observation};
use crate::domain::shed::Shed;
use crate::domain::types::{HistoryId, ItemId, ShedId, UserId};
use crate::domain::user::{Credentials, NewUser, User};
use crate::dto::auth::TokenResponse;
use crate::pagination::Envelope;
use crate::repository::{
    AuthGateway, DeletedItemFilters, HistoryFilters, HistoryReader, HistoryWriter, ItemFilters,
    ItemReader, ItemWriter, ListQuery, MovementReader, MovementWriter, ObservationReader,
    ObservationWriter, PendingFilters, ShedReader, UserFilters, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl ItemReader for Repository {
        async fn list_items(&self, query: &ListQuery<ItemFilters>) -> ApiResult<Envelope<Item>>;
        async fn search_items(&self, name: &str) -> ApiResult<Vec<Item>>;
        async fn get_item_details(&self, id: ItemId) -> ApiResult<ItemDetails>;
        async fn list_deleted_items(
            &self,
            query: &ListQuery<DeletedItemFilters>,
        ) -> ApiResult<Envelope<DeletedItem>>;
    }

    #[async_trait]
    impl ItemWriter for Repository {
        async fn create_item(&self, new_item: &NewItem) -> ApiResult<Item>;
        async fn adjust_stock(&self, id: ItemId, adjustment: &StockAdjustment) -> ApiResult<Item>;
        async fn delete_item(&self, request: &DeleteItem) -> ApiResult<String>;
    }

    #[async_trait]
    impl ShedReader for Repository {
        async fn list_sheds(&self) -> ApiResult<Vec<Shed>>;
        async fn get_shed(&self, id: ShedId) -> ApiResult<Shed>;
    }

    #[async_trait]
    impl MovementReader for Repository {
        async fn list_item_movements(&self, item_id: ItemId) -> ApiResult<Vec<Movement>>;
    }

    #[async_trait]
    impl MovementWriter for Repository {
        async fn move_item(&self, movement: &NewMovement) -> ApiResult<Movement>;
    }

    #[async_trait]
    impl HistoryReader for Repository {
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
    impl HistoryWriter for Repository {
        async fn withdraw_item(&self, withdrawal: &NewWithdrawal) -> ApiResult<HistoryRecord>;
        async fn return_item(&self, item_return: &NewReturn) -> ApiResult<HistoryRecord>;
        async fn generate_delivery_note(&self, history_ids: &[HistoryId]) -> ApiResult<Bytes>;
    }

    #[async_trait]
    impl ObservationReader for Repository {
        async fn list_item_observations(&self, item_id: ItemId) -> ApiResult<Vec<Observation>>;
    }

    #[async_trait]
    impl ObservationWriter for Repository {
        async fn add_observation(&self, observation: &NewObservation) -> ApiResult<Observation>;
    }

    #[async_trait]
    impl UserReader for Repository {
        async fn current_user_name(&self) -> ApiResult<String>;
        async fn list_users(&self, query: &ListQuery<UserFilters>) -> ApiResult<Envelope<User>>;
    }

    #[async_trait]
    impl UserWriter for Repository {
        async fn delete_user(&self, id: UserId) -> ApiResult<String>;
    }

    #[async_trait]
    impl AuthGateway for Repository {
        async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse>;
        async fn logout(&self) -> ApiResult<()>;
        async fn sign_up(&self, new_user: &NewUser) -> ApiResult<String>;
    }
}

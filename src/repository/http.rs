//! Repository implementation backed by the REST API.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::session::Session;
use crate::api::{ApiClient, RequestOptions, ResponseBody};
use crate::domain::deleted_item::DeletedItem;
use crate::domain::history::{HistoryRecord, NewReturn, NewWithdrawal};
use crate::domain::item::{DeleteItem, Item, ItemDetails, NewItem, StockAdjustment};
use crate::domain::movement::{Movement, NewMovement};
use crate::domain::observation::{NewObservation, Observation};
use crate::domain::shed::Shed;
use crate::domain::types::{HistoryId, ItemId, ShedId, UserId};
use crate::domain::user::{Credentials, NewUser, User};
use crate::dto::api::MessageResponse;
use crate::dto::auth::{CurrentUserResponse, TokenResponse};
use crate::pagination::Envelope;
use crate::query::QueryParams;
use crate::repository::{
    AuthGateway, DeletedItemFilters, HistoryFilters, HistoryReader, HistoryWriter, ItemFilters,
    ItemReader, ItemWriter, ListQuery, MovementReader, MovementWriter, ObservationReader,
    ObservationWriter, PendingFilters, ShedReader, UserFilters, UserReader, UserWriter,
};

/// Data access over HTTP. Cloning shares the connection pool and the session.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: ApiClient,
    session: Arc<Session>,
}

impl HttpRepository {
    pub fn new(client: ApiClient, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: Option<QueryParams>,
    ) -> ApiResult<T> {
        let mut options = RequestOptions::get();
        if let Some(params) = params {
            options = options.params(params);
        }
        self.client
            .request_json(&self.session, path, options)
            .await
    }

    async fn send_json<B, T>(&self, options: RequestOptions, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        self.client
            .request_json(&self.session, path, options.json(body)?)
            .await
    }

    async fn message(&self, path: &str, options: RequestOptions) -> ApiResult<String> {
        let body = self.client.request(&self.session, path, options).await?;
        Ok(into_message(body))
    }
}

/// Human-readable acknowledgement from a mutation response.
fn into_message(body: ResponseBody) -> String {
    match body {
        ResponseBody::Json(value) => serde_json::from_value::<MessageResponse>(value)
            .map(|m| m.message)
            .unwrap_or_default(),
        ResponseBody::Text(text) => text,
    }
}

#[async_trait]
impl ItemReader for HttpRepository {
    async fn list_items(&self, query: &ListQuery<ItemFilters>) -> ApiResult<Envelope<Item>> {
        self.get("/", Some(query.to_params())).await
    }

    async fn search_items(&self, name: &str) -> ApiResult<Vec<Item>> {
        let mut params = QueryParams::new();
        params.push("name", name);
        self.get("/search", Some(params)).await
    }

    async fn get_item_details(&self, id: ItemId) -> ApiResult<ItemDetails> {
        self.get(&format!("/items/{id}"), None).await
    }

    async fn list_deleted_items(
        &self,
        query: &ListQuery<DeletedItemFilters>,
    ) -> ApiResult<Envelope<DeletedItem>> {
        self.get("/deleted-items", Some(query.to_params())).await
    }
}

#[async_trait]
impl ItemWriter for HttpRepository {
    async fn create_item(&self, new_item: &NewItem) -> ApiResult<Item> {
        self.send_json(RequestOptions::post(), "/", new_item).await
    }

    async fn adjust_stock(&self, id: ItemId, adjustment: &StockAdjustment) -> ApiResult<Item> {
        self.send_json(RequestOptions::put(), &format!("/items/by-id/{id}"), adjustment)
            .await
    }

    async fn delete_item(&self, request: &DeleteItem) -> ApiResult<String> {
        self.message("/", RequestOptions::delete().json(request)?)
            .await
    }
}

#[async_trait]
impl ShedReader for HttpRepository {
    async fn list_sheds(&self) -> ApiResult<Vec<Shed>> {
        self.get("/sheds/", None).await
    }

    async fn get_shed(&self, id: ShedId) -> ApiResult<Shed> {
        self.get(&format!("/sheds/{id}"), None).await
    }
}

#[async_trait]
impl MovementReader for HttpRepository {
    async fn list_item_movements(&self, item_id: ItemId) -> ApiResult<Vec<Movement>> {
        self.get(&format!("/movements/by-item/{item_id}"), None)
            .await
    }
}

#[async_trait]
impl MovementWriter for HttpRepository {
    async fn move_item(&self, movement: &NewMovement) -> ApiResult<Movement> {
        self.send_json(RequestOptions::post(), "/movements/", movement)
            .await
    }
}

#[async_trait]
impl HistoryReader for HttpRepository {
    async fn list_history(
        &self,
        query: &ListQuery<HistoryFilters>,
    ) -> ApiResult<Envelope<HistoryRecord>> {
        self.get("/historical/", Some(query.to_params())).await
    }

    async fn list_pending(
        &self,
        query: &ListQuery<PendingFilters>,
    ) -> ApiResult<Envelope<HistoryRecord>> {
        self.get("/historical/pending", Some(query.to_params()))
            .await
    }
}

#[async_trait]
impl HistoryWriter for HttpRepository {
    async fn withdraw_item(&self, withdrawal: &NewWithdrawal) -> ApiResult<HistoryRecord> {
        self.send_json(RequestOptions::post(), "/historical/retirar", withdrawal)
            .await
    }

    async fn return_item(&self, item_return: &NewReturn) -> ApiResult<HistoryRecord> {
        self.send_json(RequestOptions::post(), "/historical/devolver", item_return)
            .await
    }

    async fn generate_delivery_note(&self, history_ids: &[HistoryId]) -> ApiResult<Bytes> {
        let options = RequestOptions::post().json(history_ids)?;
        self.client
            .request_bytes(&self.session, "/historical/remito", options)
            .await
    }
}

#[async_trait]
impl ObservationReader for HttpRepository {
    async fn list_item_observations(&self, item_id: ItemId) -> ApiResult<Vec<Observation>> {
        self.get(&format!("/api/observations/item/{item_id}"), None)
            .await
    }
}

#[async_trait]
impl ObservationWriter for HttpRepository {
    async fn add_observation(&self, observation: &NewObservation) -> ApiResult<Observation> {
        self.send_json(RequestOptions::post(), "/api/observations/", observation)
            .await
    }
}

#[async_trait]
impl UserReader for HttpRepository {
    async fn current_user_name(&self) -> ApiResult<String> {
        let response: CurrentUserResponse = self.get("/admin/me", None).await?;
        if response.full_name.is_empty() {
            return Err(ApiError::Decode("missing full_name".to_string()));
        }
        Ok(response.full_name)
    }

    async fn list_users(&self, query: &ListQuery<UserFilters>) -> ApiResult<Envelope<User>> {
        self.get("/admin/users", Some(query.to_params())).await
    }
}

#[async_trait]
impl UserWriter for HttpRepository {
    async fn delete_user(&self, id: UserId) -> ApiResult<String> {
        self.message(&format!("/admin/users/{id}"), RequestOptions::delete())
            .await
    }
}

#[async_trait]
impl AuthGateway for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        let options = RequestOptions::post().form([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        let token: TokenResponse = self
            .client
            .request_json(&self.session, "/login", options)
            .await?;

        if token.access_token.is_empty() {
            return Err(ApiError::Decode("missing access_token".to_string()));
        }

        self.session.login(token.access_token.as_str())?;
        log::info!("Logged in as {}", credentials.username);
        Ok(token)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.session.logout()?;
        Ok(())
    }

    async fn sign_up(&self, new_user: &NewUser) -> ApiResult<String> {
        self.message("/signUp", RequestOptions::post().json(new_user)?)
            .await
    }
}

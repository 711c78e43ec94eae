//! Services for the inventory table, item modals and sheds.

use crate::domain::deleted_item::DeletedItem;
use crate::domain::item::{DeleteItem, Item, ItemDetails, NewItem};
use crate::domain::shed::Shed;
use crate::domain::types::{ItemId, ShedId};
use crate::forms::items::{AdjustStockForm, AdjustStockPayload, CreateItemForm, DeleteItemForm};
use crate::pagination::Envelope;
use crate::repository::{
    DeletedItemFilters, ItemFilters, ItemReader, ItemWriter, ListQuery, ShedReader,
};
use crate::services::{ServiceError, ServiceResult};

/// Loads one page of the inventory.
pub async fn list_items<R>(
    repo: &R,
    query: &ListQuery<ItemFilters>,
) -> ServiceResult<Envelope<Item>>
where
    R: ItemReader + ?Sized,
{
    repo.list_items(query).await.map_err(ServiceError::from)
}

/// Finds items by name. A blank term matches nothing and skips the request.
pub async fn search_items<R>(repo: &R, name: &str) -> ServiceResult<Vec<Item>>
where
    R: ItemReader + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Ok(Vec::new());
    }
    repo.search_items(name).await.map_err(ServiceError::from)
}

pub async fn get_item_details<R>(repo: &R, item_id: i32) -> ServiceResult<ItemDetails>
where
    R: ItemReader + ?Sized,
{
    let item_id = ItemId::new(item_id)?;
    repo.get_item_details(item_id)
        .await
        .map_err(ServiceError::from)
}

pub async fn list_deleted_items<R>(
    repo: &R,
    query: &ListQuery<DeletedItemFilters>,
) -> ServiceResult<Envelope<DeletedItem>>
where
    R: ItemReader + ?Sized,
{
    repo.list_deleted_items(query)
        .await
        .map_err(ServiceError::from)
}

/// Validates the form and registers the item.
pub async fn create_item<R>(repo: &R, form: CreateItemForm) -> ServiceResult<Item>
where
    R: ItemWriter + ?Sized,
{
    let new_item = NewItem::try_from(form)?;

    let item = repo.create_item(&new_item).await.map_err(|err| {
        log::error!("Failed to create item {}: {err}", new_item.name);
        err
    })?;

    Ok(item)
}

/// Adds or removes units of an existing item.
pub async fn adjust_stock<R>(repo: &R, form: AdjustStockForm) -> ServiceResult<Item>
where
    R: ItemWriter + ?Sized,
{
    let payload = AdjustStockPayload::try_from(form)?;

    let item = repo
        .adjust_stock(payload.item_id, &payload.adjustment)
        .await
        .map_err(|err| {
            log::error!("Failed to adjust stock of item {}: {err}", payload.item_id);
            err
        })?;

    Ok(item)
}

/// Soft-deletes an item and returns the server's acknowledgement.
pub async fn delete_item<R>(repo: &R, form: DeleteItemForm) -> ServiceResult<String>
where
    R: ItemWriter + ?Sized,
{
    let request = DeleteItem::try_from(form)?;

    let message = repo.delete_item(&request).await.map_err(|err| {
        log::error!("Failed to delete item {}: {err}", request.item_id);
        err
    })?;

    Ok(message)
}

pub async fn list_sheds<R>(repo: &R) -> ServiceResult<Vec<Shed>>
where
    R: ShedReader + ?Sized,
{
    repo.list_sheds().await.map_err(ServiceError::from)
}

pub async fn get_shed<R>(repo: &R, shed_id: i32) -> ServiceResult<Shed>
where
    R: ShedReader + ?Sized,
{
    let shed_id = ShedId::new(shed_id)?;
    repo.get_shed(shed_id).await.map_err(ServiceError::from)
}

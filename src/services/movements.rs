use crate::domain::movement::Movement;
use crate::domain::types::ItemId;
use crate::forms::movements::MoveItemForm;
use crate::repository::{ItemReader, MovementReader, MovementWriter, UserReader};
use crate::services::{ServiceError, ServiceResult};

/// Lists every transfer involving the item.
pub async fn list_item_movements<R>(repo: &R, item_id: i32) -> ServiceResult<Vec<Movement>>
where
    R: MovementReader + ?Sized,
{
    let item_id = ItemId::new(item_id)?;
    repo.list_item_movements(item_id)
        .await
        .map_err(ServiceError::from)
}

/// Moves stock of an item to another shed on behalf of the logged-in user.
///
/// The item is loaded first so the form can be checked against its current
/// shed and available stock.
pub async fn move_item<R>(repo: &R, item_id: i32, form: MoveItemForm) -> ServiceResult<Movement>
where
    R: ItemReader + UserReader + MovementWriter + ?Sized,
{
    let item_id = ItemId::new(item_id)?;

    let details = repo.get_item_details(item_id).await?;
    if details.metadata.is_deleted {
        return Err(ServiceError::NotFound);
    }

    let username = repo.current_user_name().await?;
    let movement = form.into_domain(&details.item, username)?;

    let created = repo.move_item(&movement).await.map_err(|err| {
        log::error!("Failed to move item {item_id}: {err}");
        err
    })?;

    Ok(created)
}

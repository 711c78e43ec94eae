use crate::domain::observation::{NewObservation, Observation};
use crate::domain::types::ItemId;
use crate::forms::observations::ObservationForm;
use crate::repository::{ObservationReader, ObservationWriter};
use crate::services::{ServiceError, ServiceResult};

pub async fn list_item_observations<R>(repo: &R, item_id: i32) -> ServiceResult<Vec<Observation>>
where
    R: ObservationReader + ?Sized,
{
    let item_id = ItemId::new(item_id)?;
    repo.list_item_observations(item_id)
        .await
        .map_err(ServiceError::from)
}

pub async fn add_observation<R>(repo: &R, form: ObservationForm) -> ServiceResult<Observation>
where
    R: ObservationWriter + ?Sized,
{
    let observation = NewObservation::try_from(form)?;

    let created = repo.add_observation(&observation).await.map_err(|err| {
        log::error!(
            "Failed to add observation to item {}: {err}",
            observation.item_id
        );
        err
    })?;

    Ok(created)
}

use serde::Deserialize;
use validator::Validate;

use crate::domain::observation::NewObservation;
use crate::domain::types::{ItemId, NonEmptyString};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for attaching a note to an item.
pub struct ObservationForm {
    pub item_id: i32,
    #[validate(length(min = 1))]
    pub description: String,
}

impl TryFrom<ObservationForm> for NewObservation {
    type Error = FormError;

    fn try_from(form: ObservationForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let item_id = ItemId::new(form.item_id).map_err(|_| FormError::InvalidItemId)?;
        let description = NonEmptyString::new(form.description)
            .map_err(|_| FormError::Required("description"))?;

        Ok(NewObservation::new(item_id, description))
    }
}

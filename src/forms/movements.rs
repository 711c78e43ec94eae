use serde::Deserialize;

use crate::domain::item::Item;
use crate::domain::movement::NewMovement;
use crate::domain::types::{Quantity, ShedId};
use crate::forms::FormError;

/// Form data for moving part of an item's stock to another shed.
#[derive(Debug, Deserialize)]
pub struct MoveItemForm {
    #[serde(default)]
    pub to_shed_id: Option<i32>,
    pub quantity: i32,
}

impl MoveItemForm {
    /// Checks the form against the item being moved and builds the request.
    ///
    /// The quantity must be positive and no larger than the item's available
    /// stock, and the destination must differ from the item's current shed.
    pub fn into_domain(self, item: &Item, username: String) -> Result<NewMovement, FormError> {
        let quantity = Quantity::new(self.quantity).map_err(|_| FormError::InvalidQuantity)?;
        if self.quantity > item.actual_amount {
            return Err(FormError::InsufficientStock {
                requested: self.quantity,
                available: item.actual_amount,
            });
        }

        let to_shed_id = self
            .to_shed_id
            .ok_or(FormError::Required("destination shed"))
            .and_then(|id| ShedId::new(id).map_err(|_| FormError::InvalidShedId))?;
        let from_shed_id = item.shed_id.ok_or(FormError::InvalidShedId)?;
        if from_shed_id == to_shed_id {
            return Err(FormError::SameShed);
        }

        Ok(NewMovement::new(
            item.id,
            from_shed_id,
            to_shed_id,
            quantity,
            username,
        ))
    }
}

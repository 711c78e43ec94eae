use serde::{Deserialize, Serialize};

use crate::domain::types::{ItemId, MovementId, Quantity, ShedId, UserId};

/// Transfer of units between two sheds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: MovementId,
    /// Item the units were taken from.
    #[serde(rename = "item_id_origen")]
    pub source_item_id: ItemId,
    /// Item that received the units in the destination shed.
    #[serde(rename = "item_id_destino", default)]
    pub target_item_id: Option<ItemId>,
    pub item_name: String,
    pub quantity: i32,
    pub date: String,
    pub from_shed_id: ShedId,
    pub to_shed_id: ShedId,
    pub from_shed_name: String,
    pub to_shed_name: String,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
}

/// Payload for `POST /movements/`.
#[derive(Clone, Debug, Serialize)]
pub struct NewMovement {
    pub item_id: ItemId,
    pub from_shed_id: ShedId,
    pub to_shed_id: ShedId,
    pub quantity: i32,
    pub username: String,
}

impl NewMovement {
    #[must_use]
    pub fn new(
        item_id: ItemId,
        from_shed_id: ShedId,
        to_shed_id: ShedId,
        quantity: Quantity,
        username: String,
    ) -> Self {
        Self {
            item_id,
            from_shed_id,
            to_shed_id,
            quantity: quantity.get(),
            username,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ItemId, NonEmptyString, ObservationId, UserId};

/// Free-text note attached to an item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub id: ObservationId,
    pub item_id: ItemId,
    pub description: String,
    pub date: NaiveDateTime,
    pub user_id: UserId,
    pub user_name: String,
}

/// Payload for `POST /api/observations/`.
#[derive(Clone, Debug, Serialize)]
pub struct NewObservation {
    pub item_id: ItemId,
    pub description: String,
}

impl NewObservation {
    #[must_use]
    pub fn new(item_id: ItemId, description: NonEmptyString) -> Self {
        Self {
            item_id,
            description: description.into_inner(),
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DeletedItemId, ItemId};

/// Record left behind when an item is soft-deleted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DeletedItem {
    pub id: DeletedItemId,
    pub item_id: ItemId,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub deletion_reason: String,
    pub deleted_at: NaiveDateTime,
}

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ItemId, NonEmptyString, Quantity, ShedId};

/// Inventory item as returned by the list, search and create endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Units owned, including those currently out at a site.
    #[serde(rename = "totalAmount")]
    pub total_amount: i32,
    /// Units physically present in the shed.
    #[serde(rename = "actualAmount")]
    pub actual_amount: i32,
    #[serde(default)]
    pub is_available: bool,
    pub shed_id: Option<ShedId>,
    #[serde(default)]
    pub status: i32,
}

impl Item {
    /// Units withdrawn and not yet returned.
    pub fn outstanding(&self) -> i32 {
        self.total_amount - self.actual_amount
    }
}

/// Payload for `POST /`.
#[derive(Clone, Debug, Serialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub category: String,
    pub shed_id: Option<ShedId>,
}

impl NewItem {
    #[must_use]
    pub fn new(
        name: NonEmptyString,
        description: Option<String>,
        quantity: Quantity,
        category: NonEmptyString,
        shed_id: ShedId,
    ) -> Self {
        Self {
            name: name.into_inner(),
            description: description
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            quantity: quantity.get(),
            category: category.into_inner(),
            shed_id: Some(shed_id),
        }
    }
}

/// Direction of a stock adjustment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Add,
    #[serde(rename = "rest")]
    Subtract,
}

impl Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockAction::Add => write!(f, "add"),
            StockAction::Subtract => write!(f, "rest"),
        }
    }
}

impl TryFrom<&str> for StockAction {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "add" => Ok(StockAction::Add),
            "rest" | "subtract" => Ok(StockAction::Subtract),
            other => Err(format!("unknown stock action `{other}`")),
        }
    }
}

/// Payload for `PUT /items/by-id/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct StockAdjustment {
    pub quantity: i32,
    pub action: StockAction,
}

impl StockAdjustment {
    #[must_use]
    pub fn new(quantity: Quantity, action: StockAction) -> Self {
        Self {
            quantity: quantity.get(),
            action,
        }
    }
}

/// Body of the soft-delete request sent to `DELETE /`.
#[derive(Clone, Debug, Serialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    /// Reason for the deletion.
    pub description: String,
    pub date: DateTime<Utc>,
}

impl DeleteItem {
    /// Builds the payload, stamping the current time when no date is given.
    #[must_use]
    pub fn new(item_id: ItemId, reason: NonEmptyString, date: Option<DateTime<Utc>>) -> Self {
        Self {
            item_id,
            description: reason.into_inner(),
            date: date.unwrap_or_else(Utc::now),
        }
    }
}

/// Aggregated item view returned by `GET /items/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ItemDetails {
    pub item: Item,
    pub metadata: ItemMetadata,
    pub relations: ItemRelations,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ItemMetadata {
    pub is_deleted: bool,
    pub deletion_info: Option<DeletionInfo>,
    pub permissions: ItemPermissions,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DeletionInfo {
    pub deletion_reason: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ItemPermissions {
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ItemRelations {
    pub observations_count: u32,
    pub movements_count: u32,
    pub last_movement: Option<NaiveDateTime>,
}

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{HistoryId, ItemId, NonEmptyString, Quantity, ShedId, UserId};

/// Kind of stock movement recorded in the history.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryAction {
    #[serde(rename = "retiro")]
    Withdrawal,
    #[serde(rename = "devolucion")]
    Return,
}

impl HistoryAction {
    /// Value used by the server in payloads and filters.
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryAction::Withdrawal => "retiro",
            HistoryAction::Return => "devolucion",
        }
    }
}

impl Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "retiro" | "withdrawal" => Ok(HistoryAction::Withdrawal),
            "devolucion" | "return" => Ok(HistoryAction::Return),
            other => Err(format!("unknown history action `{other}`")),
        }
    }
}

/// Historical movement record. A withdrawal with `turnback == false` is
/// pending: part of its quantity is still out.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub item_id: ItemId,
    #[serde(default)]
    pub item_name: String,
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub person_who_took: Option<String>,
    pub action: HistoryAction,
    #[serde(default)]
    pub amount_retired: Option<i32>,
    #[serde(default)]
    pub amount_not_returned: Option<i32>,
    pub date: NaiveDateTime,
    pub place: String,
    pub turnback: bool,
    #[serde(default)]
    pub turnback_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub item_category: Option<String>,
    #[serde(default)]
    pub shed_id: Option<ShedId>,
    #[serde(rename = "shed_name", default)]
    pub shed_name: Option<String>,
    #[serde(default)]
    pub last_notification: Option<NaiveDateTime>,
}

impl HistoryRecord {
    pub fn is_pending(&self) -> bool {
        self.action == HistoryAction::Withdrawal && !self.turnback
    }
}

/// Payload for `POST /historical/retirar`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawal {
    pub item_id: ItemId,
    pub amount: i32,
    pub place: String,
    pub person_who_took: Option<String>,
}

impl NewWithdrawal {
    #[must_use]
    pub fn new(
        item_id: ItemId,
        amount: Quantity,
        place: NonEmptyString,
        person_who_took: Option<String>,
    ) -> Self {
        Self {
            item_id,
            amount: amount.get(),
            place: place.into_inner(),
            person_who_took: crate::domain::types::optional_text(person_who_took),
        }
    }
}

/// Payload for `POST /historical/devolver`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReturn {
    pub item_id: ItemId,
    pub amount: i32,
    pub person_who_returned: Option<String>,
    pub place: String,
}

impl NewReturn {
    #[must_use]
    pub fn new(
        item_id: ItemId,
        amount: Quantity,
        place: NonEmptyString,
        person_who_returned: Option<String>,
    ) -> Self {
        Self {
            item_id,
            amount: amount.get(),
            person_who_returned: crate::domain::types::optional_text(person_who_returned),
            place: place.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn withdrawal_payload_uses_camel_case() {
        let payload = NewWithdrawal::new(
            ItemId::new(4).unwrap(),
            Quantity::new(2).unwrap(),
            NonEmptyString::new("Obra Norte").unwrap(),
            Some("  ".to_string()),
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"itemId": 4, "amount": 2, "place": "Obra Norte", "personWhoTook": null})
        );
    }

    #[test]
    fn withdrawal_response_without_item_name_parses() {
        let record: HistoryRecord = serde_json::from_value(json!({
            "id": 11,
            "itemId": 4,
            "userId": 2,
            "userName": "Ana",
            "personWhoTook": "Luis",
            "action": "retiro",
            "amountRetired": 2,
            "amountNotReturned": 2,
            "date": "2024-03-01T09:00:00",
            "place": "Obra Norte",
            "turnback": false,
            "turnbackDate": null,
            "lastNotification": null
        }))
        .unwrap();

        assert!(record.is_pending());
        assert_eq!(record.item_name, "");
        assert_eq!(record.action, HistoryAction::Withdrawal);
    }
}

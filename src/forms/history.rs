use serde::Deserialize;
use validator::Validate;

use crate::domain::history::{NewReturn, NewWithdrawal};
use crate::domain::types::{HistoryId, ItemId, NonEmptyString, Quantity};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Form data for taking items out of a shed.
pub struct WithdrawForm {
    pub item_id: i32,
    #[validate(range(min = 1))]
    pub amount: i32,
    #[validate(length(min = 1))]
    pub place: String,
    #[serde(default)]
    pub person_who_took: Option<String>,
}

impl TryFrom<WithdrawForm> for NewWithdrawal {
    type Error = FormError;

    fn try_from(form: WithdrawForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let item_id = ItemId::new(form.item_id).map_err(|_| FormError::InvalidItemId)?;
        let amount = Quantity::new(form.amount).map_err(|_| FormError::InvalidQuantity)?;
        let place = NonEmptyString::new(form.place).map_err(|_| FormError::Required("place"))?;

        Ok(NewWithdrawal::new(
            item_id,
            amount,
            place,
            form.person_who_took,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Form data for bringing withdrawn items back.
pub struct ReturnForm {
    pub item_id: i32,
    #[validate(range(min = 1))]
    pub amount: i32,
    #[validate(length(min = 1))]
    pub place: String,
    #[serde(default)]
    pub person_who_returned: Option<String>,
}

impl TryFrom<ReturnForm> for NewReturn {
    type Error = FormError;

    fn try_from(form: ReturnForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let item_id = ItemId::new(form.item_id).map_err(|_| FormError::InvalidItemId)?;
        let amount = Quantity::new(form.amount).map_err(|_| FormError::InvalidQuantity)?;
        let place = NonEmptyString::new(form.place).map_err(|_| FormError::Required("place"))?;

        Ok(NewReturn::new(
            item_id,
            amount,
            place,
            form.person_who_returned,
        ))
    }
}

/// Selection of history records printed on a delivery note.
#[derive(Debug, Deserialize)]
pub struct DeliveryNoteForm {
    #[serde(default)]
    pub history_ids: Vec<i32>,
}

/// Deduplicated, validated record ids in selection order.
pub struct DeliveryNotePayload {
    pub history_ids: Vec<HistoryId>,
}

impl TryFrom<DeliveryNoteForm> for DeliveryNotePayload {
    type Error = FormError;

    fn try_from(form: DeliveryNoteForm) -> Result<Self, Self::Error> {
        let mut history_ids: Vec<HistoryId> = Vec::with_capacity(form.history_ids.len());
        for id in form.history_ids {
            let id = HistoryId::new(id).map_err(|_| FormError::InvalidHistoryId)?;
            if !history_ids.contains(&id) {
                history_ids.push(id);
            }
        }

        if history_ids.is_empty() {
            return Err(FormError::EmptySelection);
        }

        Ok(Self { history_ids })
    }
}

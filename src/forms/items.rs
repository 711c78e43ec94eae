use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::item::{DeleteItem, NewItem, StockAction, StockAdjustment};
use crate::domain::types::{ItemId, NonEmptyString, Quantity, ShedId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for registering a new item.
pub struct CreateItemForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1))]
    pub category: String,
    /// Shed that stores the item. Mandatory, kept optional so a missing value
    /// is reported as such instead of a deserialization failure.
    #[serde(default)]
    pub shed_id: Option<i32>,
}

impl TryFrom<CreateItemForm> for NewItem {
    type Error = FormError;

    fn try_from(form: CreateItemForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = NonEmptyString::new(form.name).map_err(|_| FormError::Required("name"))?;
        let category =
            NonEmptyString::new(form.category).map_err(|_| FormError::Required("category"))?;
        let quantity = Quantity::new(form.quantity).map_err(|_| FormError::InvalidQuantity)?;
        let shed_id = form
            .shed_id
            .ok_or(FormError::Required("shed"))
            .and_then(|id| ShedId::new(id).map_err(|_| FormError::InvalidShedId))?;

        Ok(NewItem::new(
            name,
            form.description,
            quantity,
            category,
            shed_id,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for adding or removing stock.
pub struct AdjustStockForm {
    pub item_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// `add` or `rest`.
    pub action: String,
}

/// Validated stock adjustment for a single item.
#[derive(Debug)]
pub struct AdjustStockPayload {
    pub item_id: ItemId,
    pub adjustment: StockAdjustment,
}

impl TryFrom<AdjustStockForm> for AdjustStockPayload {
    type Error = FormError;

    fn try_from(form: AdjustStockForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let item_id = ItemId::new(form.item_id).map_err(|_| FormError::InvalidItemId)?;
        let quantity = Quantity::new(form.quantity).map_err(|_| FormError::InvalidQuantity)?;
        let action = StockAction::try_from(form.action.trim())
            .map_err(|_| FormError::InvalidAction(form.action.clone()))?;

        Ok(Self {
            item_id,
            adjustment: StockAdjustment::new(quantity, action),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for soft-deleting an item.
pub struct DeleteItemForm {
    pub item_id: i32,
    #[validate(length(min = 1))]
    pub reason: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl TryFrom<DeleteItemForm> for DeleteItem {
    type Error = FormError;

    fn try_from(form: DeleteItemForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let item_id = ItemId::new(form.item_id).map_err(|_| FormError::InvalidItemId)?;
        let reason = NonEmptyString::new(form.reason).map_err(|_| FormError::Required("reason"))?;

        Ok(DeleteItem::new(item_id, reason, form.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form() -> CreateItemForm {
        CreateItemForm {
            name: "Martillo".to_string(),
            description: Some("  mango de madera ".to_string()),
            quantity: 4,
            category: "Herramientas".to_string(),
            shed_id: Some(2),
        }
    }

    #[test]
    fn create_item_form_converts() {
        let item = NewItem::try_from(create_form()).unwrap();

        assert_eq!(item.name, "Martillo");
        assert_eq!(item.description, "mango de madera");
        assert_eq!(item.quantity, 4);
        assert_eq!(item.shed_id.map(ShedId::get), Some(2));
    }

    #[test]
    fn create_item_requires_shed() {
        let form = CreateItemForm {
            shed_id: None,
            ..create_form()
        };

        assert!(matches!(
            NewItem::try_from(form),
            Err(FormError::Required("shed"))
        ));
    }

    #[test]
    fn create_item_rejects_blank_name() {
        let form = CreateItemForm {
            name: "   ".to_string(),
            ..create_form()
        };

        assert!(matches!(
            NewItem::try_from(form),
            Err(FormError::Required("name"))
        ));
    }

    #[test]
    fn create_item_rejects_zero_quantity() {
        let form = CreateItemForm {
            quantity: 0,
            ..create_form()
        };

        assert!(matches!(
            NewItem::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn adjust_stock_parses_action() {
        let payload = AdjustStockPayload::try_from(AdjustStockForm {
            item_id: 3,
            quantity: 2,
            action: "rest".to_string(),
        })
        .unwrap();

        assert_eq!(payload.item_id.get(), 3);
        assert_eq!(payload.adjustment.action, StockAction::Subtract);
        assert_eq!(payload.adjustment.quantity, 2);
    }

    #[test]
    fn adjust_stock_rejects_unknown_action() {
        let result = AdjustStockPayload::try_from(AdjustStockForm {
            item_id: 3,
            quantity: 2,
            action: "multiply".to_string(),
        });

        assert!(matches!(result, Err(FormError::InvalidAction(action)) if action == "multiply"));
    }

    #[test]
    fn delete_requires_reason() {
        let result = DeleteItem::try_from(DeleteItemForm {
            item_id: 1,
            reason: " ".to_string(),
            date: None,
        });

        assert!(matches!(result, Err(FormError::Required("reason"))));
    }

    #[test]
    fn delete_keeps_explicit_date() {
        let date = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let request = DeleteItem::try_from(DeleteItemForm {
            item_id: 1,
            reason: "roto".to_string(),
            date: Some(date),
        })
        .unwrap();

        assert_eq!(request.date, date);
        assert_eq!(request.description, "roto");
    }
}

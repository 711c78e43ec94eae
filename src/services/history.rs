//! Services for withdrawals, returns and the movement history views.

use bytes::Bytes;

use crate::domain::history::{HistoryRecord, NewReturn, NewWithdrawal};
use crate::forms::history::{DeliveryNoteForm, DeliveryNotePayload, ReturnForm, WithdrawForm};
use crate::pagination::Envelope;
use crate::repository::{HistoryFilters, HistoryReader, HistoryWriter, ListQuery, PendingFilters};
use crate::services::{ServiceError, ServiceResult};

pub async fn list_history<R>(
    repo: &R,
    query: &ListQuery<HistoryFilters>,
) -> ServiceResult<Envelope<HistoryRecord>>
where
    R: HistoryReader + ?Sized,
{
    repo.list_history(query).await.map_err(ServiceError::from)
}

/// Withdrawals whose items have not all come back yet.
pub async fn list_pending<R>(
    repo: &R,
    query: &ListQuery<PendingFilters>,
) -> ServiceResult<Envelope<HistoryRecord>>
where
    R: HistoryReader + ?Sized,
{
    repo.list_pending(query).await.map_err(ServiceError::from)
}

pub async fn withdraw_item<R>(repo: &R, form: WithdrawForm) -> ServiceResult<HistoryRecord>
where
    R: HistoryWriter + ?Sized,
{
    let withdrawal = NewWithdrawal::try_from(form)?;

    let record = repo.withdraw_item(&withdrawal).await.map_err(|err| {
        log::error!("Failed to withdraw item {}: {err}", withdrawal.item_id);
        err
    })?;

    Ok(record)
}

pub async fn return_item<R>(repo: &R, form: ReturnForm) -> ServiceResult<HistoryRecord>
where
    R: HistoryWriter + ?Sized,
{
    let item_return = NewReturn::try_from(form)?;

    let record = repo.return_item(&item_return).await.map_err(|err| {
        log::error!("Failed to return item {}: {err}", item_return.item_id);
        err
    })?;

    Ok(record)
}

/// Renders the delivery note for the selected records and returns the raw
/// document bytes.
pub async fn generate_delivery_note<R>(repo: &R, form: DeliveryNoteForm) -> ServiceResult<Bytes>
where
    R: HistoryWriter + ?Sized,
{
    let payload = DeliveryNotePayload::try_from(form)?;

    let document = repo
        .generate_delivery_note(&payload.history_ids)
        .await
        .map_err(|err| {
            log::error!("Failed to generate delivery note: {err}");
            err
        })?;

    Ok(document)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::api::errors::ApiError;
    use crate::domain::history::HistoryAction;
    use crate::domain::types::{HistoryId, ItemId, UserId};
    use crate::repository::mock::MockRepository;

    fn record(action: HistoryAction) -> HistoryRecord {
        HistoryRecord {
            id: HistoryId::new(10).unwrap(),
            item_id: ItemId::new(2).unwrap(),
            item_name: "Amoladora".to_string(),
            user_id: UserId::new(1).unwrap(),
            user_name: "Ana".to_string(),
            person_who_took: Some("Luis".to_string()),
            action,
            amount_retired: Some(1),
            amount_not_returned: Some(1),
            date: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            place: "Obra".to_string(),
            turnback: false,
            turnback_date: None,
            item_category: None,
            shed_id: None,
            shed_name: None,
            last_notification: None,
        }
    }

    #[tokio::test]
    async fn withdraw_sends_trimmed_place() {
        let mut repo = MockRepository::new();
        repo.expect_withdraw_item()
            .withf(|withdrawal| withdrawal.place == "Obra" && withdrawal.amount == 1)
            .times(1)
            .returning(|_| Ok(record(HistoryAction::Withdrawal)));

        let form = WithdrawForm {
            item_id: 2,
            amount: 1,
            place: " Obra ".to_string(),
            person_who_took: Some("Luis".to_string()),
        };

        let created = withdraw_item(&repo, form).await.unwrap();
        assert!(created.is_pending());
    }

    #[tokio::test]
    async fn return_surfaces_server_detail() {
        let mut repo = MockRepository::new();
        repo.expect_return_item().returning(|_| {
            Err(ApiError::Status {
                status: 400,
                message: "Cantidad mayor a la retirada".to_string(),
            })
        });

        let form = ReturnForm {
            item_id: 2,
            amount: 5,
            place: "Galpón".to_string(),
            person_who_returned: None,
        };

        let err = return_item(&repo, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Cantidad mayor a la retirada");
    }

    #[tokio::test]
    async fn delivery_note_needs_selection() {
        let mut repo = MockRepository::new();
        repo.expect_generate_delivery_note().times(0);

        let result = generate_delivery_note(
            &repo,
            DeliveryNoteForm {
                history_ids: Vec::new(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn delivery_note_returns_document_bytes() {
        let mut repo = MockRepository::new();
        repo.expect_generate_delivery_note()
            .withf(|ids| ids.iter().map(|id| id.get()).collect::<Vec<_>>() == vec![4, 5])
            .returning(|_| Ok(Bytes::from_static(b"%PDF-1.4")));

        let document = generate_delivery_note(
            &repo,
            DeliveryNoteForm {
                history_ids: vec![4, 5, 4],
            },
        )
        .await
        .unwrap();

        assert!(document.starts_with(b"%PDF"));
    }
}

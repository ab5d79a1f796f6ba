// src/services/receipt_service.rs

use chrono::NaiveDateTime;
use sqlx::{Acquire, Executor, Postgres};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        dates,
        error::{AppError, FieldDetails},
        pagination::Paging,
        rules,
    },
    db::ReceiptRepository,
    models::receipt::{
        ActivityPayload, ActivityType, CreateReceiptPayload, NewActivity, NewReceipt,
        ReceiptListResponse, ReceiptWithActivities,
    },
};

#[derive(Clone, Default)]
pub struct ReceiptService {
    repo: ReceiptRepository,
}

impl ReceiptService {
    pub fn new(repo: ReceiptRepository) -> Self {
        Self { repo }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateReceiptPayload,
    ) -> Result<ReceiptWithActivities, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        payload.validate()?;
        let new_receipt = normalize(payload)?;

        let created = self.repo.create(executor, &new_receipt).await?;
        info!(
            receipt_id = %created.receipt.id,
            receipt_number = %created.receipt.receipt_number,
            activities = created.activities.len(),
            "✅ Recibo criado"
        );
        Ok(created)
    }

    /// Id malformado é tratado como inexistente.
    pub async fn get<'e, E>(&self, executor: E, id: &str) -> Result<ReceiptWithActivities, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let id = Uuid::parse_str(id.trim()).map_err(|_| AppError::ReceiptNotFound)?;
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::ReceiptNotFound)
    }

    pub async fn list<'e, E>(&self, executor: E, paging: Paging) -> Result<ReceiptListResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (data, total) = self.repo.list(executor, paging).await?;
        Ok(envelope(data, total, paging))
    }

    pub async fn search<'e, E>(
        &self,
        executor: E,
        term: Option<&str>,
        paging: Paging,
    ) -> Result<ReceiptListResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::EmptySearchQuery)?;

        let (data, total) = self.repo.search(executor, term, paging).await?;
        tracing::debug!(term, total, "busca de recibos");
        Ok(envelope(data, total, paging))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::parse_str(id.trim()).map_err(|_| AppError::ReceiptNotFound)?;
        if self.repo.delete(executor, id).await? == 0 {
            return Err(AppError::ReceiptNotFound);
        }
        info!(receipt_id = %id, "🗑️ Recibo excluído");
        Ok(())
    }
}

fn envelope(data: Vec<ReceiptWithActivities>, total: i64, paging: Paging) -> ReceiptListResponse {
    ReceiptListResponse {
        data,
        page: paging.page,
        limit: paging.limit,
        total,
        total_pages: paging.total_pages(total),
    }
}

// =============================================================================
//  NORMALIZAÇÃO DO PAYLOAD
// =============================================================================

/// Converte o payload já validado em `NewReceipt`: datas tipadas, textos
/// aparados (vazio vira `None`) e `amount_paid` recalculado.
///
/// As regras entre campos (datas fora de ordem, aluguel de carro sem locais)
/// saem em `InconsistentPayload`, com as mesmas chaves do formulário.
pub fn normalize(payload: &CreateReceiptPayload) -> Result<NewReceipt, AppError> {
    let receipt_datetime =
        dates::parse(&payload.receipt_date).ok_or_else(|| AppError::InvalidDate("receiptDate".into()))?;

    let mut details = FieldDetails::new();
    let mut activities = Vec::with_capacity(payload.activities.len());

    for (index, activity) in payload.activities.iter().enumerate() {
        let check_in = optional_date(activity.check_in.as_deref(), index, "checkIn")?;
        let check_out = optional_date(activity.check_out.as_deref(), index, "checkOut")?;

        for problem in rules::check_activity_dates(Some(receipt_datetime), check_in, check_out) {
            add_detail(&mut details, problem.key(index), problem.message());
        }
        if activity.activity_type == ActivityType::CarRental {
            let gaps = rules::car_rental_gaps(
                activity.pickup_location.as_deref().unwrap_or_default(),
                activity.dropoff_location.as_deref().unwrap_or_default(),
                activity.description.as_deref().unwrap_or_default(),
            );
            for gap in gaps {
                add_detail(&mut details, gap.key(index), gap.message());
            }
        }

        activities.push(new_activity(activity, check_in, check_out));
    }

    if !details.is_empty() {
        return Err(AppError::InconsistentPayload(details));
    }

    let amount_paid = rules::sum_amounts(activities.iter().map(|a| a.amount));

    Ok(NewReceipt {
        client_name: payload.client_name.trim().to_string(),
        client_email: payload.client_email.trim().to_string(),
        client_phone: payload.client_phone.trim().to_string(),
        receipt_date: receipt_datetime.date(),
        amount_paid,
        activities,
    })
}

fn add_detail(details: &mut FieldDetails, key: rules::ErrorKey, message: &str) {
    details.entry(key.to_string()).or_default().push(message.to_string());
}

// Em branco -> None; texto ilegível -> 400 apontando o campo.
fn optional_date(raw: Option<&str>, index: usize, field: &str) -> Result<Option<NaiveDateTime>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => dates::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(format!("activities[{index}].{field}"))),
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn new_activity(
    activity: &ActivityPayload,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
) -> NewActivity {
    NewActivity {
        activity_type: activity.activity_type,
        property_name: clean(&activity.property_name),
        property_address: clean(&activity.property_address),
        check_in: check_in.map(|d| d.date()),
        check_out: check_out.map(|d| d.date()),
        amount: activity.amount,
        car_model: clean(&activity.car_model),
        car_plate: clean(&activity.car_plate),
        pickup_location: clean(&activity.pickup_location),
        dropoff_location: clean(&activity.dropoff_location),
        transfer_type: activity.transfer_type,
        description: clean(&activity.description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn payload(activities: serde_json::Value) -> CreateReceiptPayload {
        serde_json::from_value(json!({
            "clientName": " Jane Doe ",
            "clientEmail": "jane@x.com",
            "clientPhone": "+15551234567",
            "receiptDate": "2024-05-01T00:00:00.000Z",
            "amountPaid": 1,
            "activities": activities
        }))
        .unwrap()
    }

    #[test]
    fn recomputes_amount_and_trims() {
        let new = normalize(&payload(json!([
            { "type": "hotel", "propertyName": " Hyatt ", "propertyAddress": "", "amount": 120.5, "checkIn": "2024-04-28" },
            { "type": "transfer", "amount": 30, "transferType": "airport_pickup" }
        ])))
        .unwrap();

        assert_eq!(new.client_name, "Jane Doe");
        assert_eq!(new.receipt_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(new.amount_paid, Decimal::new(1505, 1));
        assert_eq!(new.activities[0].property_name.as_deref(), Some("Hyatt"));
        assert_eq!(new.activities[0].property_address, None);
        assert_eq!(new.activities[0].check_in, NaiveDate::from_ymd_opt(2024, 4, 28));
    }

    #[test]
    fn cross_field_rules_use_form_keys() {
        let err = normalize(&payload(json!([
            { "type": "hotel", "amount": 10, "checkIn": "2024-06-10", "checkOut": "2024-06-05" },
            { "type": "car_rental", "amount": 10, "pickupLocation": "Airport" }
        ])))
        .unwrap_err();

        let AppError::InconsistentPayload(details) = err else {
            panic!("esperava InconsistentPayload, veio {err:?}");
        };
        assert_eq!(
            details.keys().map(String::as_str).collect::<Vec<_>>(),
            [
                "activityCheckIn0",
                "activityCheckOut0",
                "activityDescription1",
                "activityDropoffLocation1",
            ]
        );
        assert_eq!(details["activityCheckOut0"], vec![rules::CHECK_OUT_BEFORE_CHECK_IN.to_string()]);
    }

    #[test]
    fn unreadable_dates_name_the_field() {
        let err = normalize(&payload(json!([{ "type": "other", "amount": 5, "checkOut": "someday" }]))).unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(field) if field == "activities[0].checkOut"));

        let mut bad = payload(json!([{ "type": "other", "amount": 5 }]));
        bad.receipt_date = "yesterday".into();
        assert!(matches!(normalize(&bad), Err(AppError::InvalidDate(field)) if field == "receiptDate"));
    }
}

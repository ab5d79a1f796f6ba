// src/db/receipt_repo.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paging},
    models::receipt::{
        Activity, NewReceipt, Receipt, ReceiptWithActivities, format_receipt_number,
    },
};

const RECEIPT_COLUMNS: &str = r#"
    id, receipt_number, client_name, client_email, client_phone,
    receipt_date, amount_paid, created_at, updated_at
"#;

const ACTIVITY_COLUMNS: &str = r#"
    id, receipt_id, position, type, property_name, property_address,
    check_in, check_out, amount, car_model, car_plate,
    pickup_location, dropoff_location, transfer_type, description, created_at
"#;

// Busca por número, nome, e-mail ou telefone.
const SEARCH_FILTER: &str = r#"
    receipt_number ILIKE $1
    OR client_name ILIKE $1
    OR client_email ILIKE $1
    OR client_phone ILIKE $1
"#;

/// Padrão `%termo%` com `%`, `_` e `\` escapados.
pub fn search_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Clone, Default)]
pub struct ReceiptRepository;

impl ReceiptRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    /// Grava recibo + atividades numa única transação. O número vem da
    /// sequência `receipt_number_seq`, então dois POSTs simultâneos nunca
    /// recebem o mesmo número.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        new_receipt: &NewReceipt,
    ) -> Result<ReceiptWithActivities, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let sequence: i64 = sqlx::query_scalar("SELECT nextval('receipt_number_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let receipt_number = format_receipt_number(sequence);

        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            r#"
            INSERT INTO receipts (
                receipt_number, client_name, client_email, client_phone,
                receipt_date, amount_paid
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECEIPT_COLUMNS}
            "#
        ))
        .bind(&receipt_number)
        .bind(&new_receipt.client_name)
        .bind(&new_receipt.client_email)
        .bind(&new_receipt.client_phone)
        .bind(new_receipt.receipt_date)
        .bind(new_receipt.amount_paid)
        .fetch_one(&mut *tx)
        .await?;

        let mut activities = Vec::with_capacity(new_receipt.activities.len());
        for (position, activity) in new_receipt.activities.iter().enumerate() {
            let stored = sqlx::query_as::<_, Activity>(&format!(
                r#"
                INSERT INTO activities (
                    receipt_id, position, type, property_name, property_address,
                    check_in, check_out, amount, car_model, car_plate,
                    pickup_location, dropoff_location, transfer_type, description
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING {ACTIVITY_COLUMNS}
                "#
            ))
            .bind(receipt.id)
            .bind(position as i32)
            .bind(activity.activity_type)
            .bind(&activity.property_name)
            .bind(&activity.property_address)
            .bind(activity.check_in)
            .bind(activity.check_out)
            .bind(activity.amount)
            .bind(&activity.car_model)
            .bind(&activity.car_plate)
            .bind(&activity.pickup_location)
            .bind(&activity.dropoff_location)
            .bind(activity.transfer_type)
            .bind(&activity.description)
            .fetch_one(&mut *tx)
            .await?;
            activities.push(stored);
        }

        tx.commit().await?;

        Ok(ReceiptWithActivities { receipt, activities })
    }

    /// Remove o recibo (as atividades caem junto via ON DELETE CASCADE).
    /// Retorna quantas linhas foram apagadas.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ReceiptWithActivities>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(receipt) = receipt else {
            return Ok(None);
        };

        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE receipt_id = $1 ORDER BY position"
        ))
        .bind(receipt.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ReceiptWithActivities { receipt, activities }))
    }

    /// Página de recibos (mais recentes primeiro) + total geral.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        paging: Paging,
    ) -> Result<(Vec<ReceiptWithActivities>, i64), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&mut *tx)
            .await?;

        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            r#"
            SELECT {RECEIPT_COLUMNS} FROM receipts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(paging.limit)
        .bind(paging.offset())
        .fetch_all(&mut *tx)
        .await?;

        let page = attach_activities(&mut tx, receipts).await?;
        tx.commit().await?;

        Ok((page, total))
    }

    pub async fn search<'e, E>(
        &self,
        executor: E,
        term: &str,
        paging: Paging,
    ) -> Result<(Vec<ReceiptWithActivities>, i64), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let pattern = search_pattern(term);
        let mut tx = executor.begin().await?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM receipts WHERE {SEARCH_FILTER}"
        ))
        .bind(&pattern)
        .fetch_one(&mut *tx)
        .await?;

        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            r#"
            SELECT {RECEIPT_COLUMNS} FROM receipts
            WHERE {SEARCH_FILTER}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(paging.limit)
        .bind(paging.offset())
        .fetch_all(&mut *tx)
        .await?;

        let page = attach_activities(&mut tx, receipts).await?;
        tx.commit().await?;

        Ok((page, total))
    }
}

// Uma query só para as atividades de todos os recibos da página.
async fn attach_activities(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    receipts: Vec<Receipt>,
) -> Result<Vec<ReceiptWithActivities>, AppError> {
    if receipts.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = receipts.iter().map(|r| r.id).collect();
    let rows = sqlx::query_as::<_, Activity>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE receipt_id = ANY($1) ORDER BY position"
    ))
    .bind(&ids)
    .fetch_all(&mut **tx)
    .await?;

    let mut by_receipt: HashMap<Uuid, Vec<Activity>> = HashMap::new();
    for activity in rows {
        by_receipt.entry(activity.receipt_id).or_default().push(activity);
    }

    Ok(receipts
        .into_iter()
        .map(|receipt| {
            let activities = by_receipt.remove(&receipt.id).unwrap_or_default();
            ReceiptWithActivities { receipt, activities }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("jane"), "%jane%");
        assert_eq!(search_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(search_pattern("a\\b"), "%a\\\\b%");
    }
}

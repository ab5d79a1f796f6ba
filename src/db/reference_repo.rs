// src/db/reference_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reference::{CarRental, Hotel, NewCarRental, NewHotel},
};

#[derive(Clone, Default)]
pub struct ReferenceRepository;

impl ReferenceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  HOTÉIS
    // =========================================================================

    /// Lista hotéis por nome. Com `city`, filtra sem diferenciar maiúsculas.
    pub async fn list_hotels<'e, E>(
        &self,
        executor: E,
        city: Option<&str>,
    ) -> Result<Vec<Hotel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotels = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT id, name, address, city, created_at
            FROM hotels
            WHERE ($1::text IS NULL OR LOWER(city) = LOWER($1))
            ORDER BY name ASC
            "#,
        )
        .bind(city)
        .fetch_all(executor)
        .await?;

        Ok(hotels)
    }

    pub async fn create_hotel<'e, E>(&self, executor: E, hotel: &NewHotel) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Hotel>(
            r#"
            INSERT INTO hotels (name, address, city)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, city, created_at
            "#,
        )
        .bind(&hotel.name)
        .bind(&hotel.address)
        .bind(&hotel.city)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    pub async fn delete_hotel<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_hotels<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hotels")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    // =========================================================================
    //  LOCADORAS
    // =========================================================================

    pub async fn list_car_rentals<'e, E>(&self, executor: E) -> Result<Vec<CarRental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rentals = sqlx::query_as::<_, CarRental>(
            "SELECT id, name, address, created_at FROM car_rentals ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(rentals)
    }

    pub async fn create_car_rental<'e, E>(
        &self,
        executor: E,
        rental: &NewCarRental,
    ) -> Result<CarRental, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, CarRental>(
            r#"
            INSERT INTO car_rentals (name, address)
            VALUES ($1, $2)
            RETURNING id, name, address, created_at
            "#,
        )
        .bind(&rental.name)
        .bind(&rental.address)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    pub async fn delete_car_rental<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM car_rentals WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_car_rentals<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car_rentals")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }
}

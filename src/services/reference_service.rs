// src/services/reference_service.rs

use sqlx::{Executor, Postgres};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ReferenceRepository,
    models::reference::{CarRental, Hotel, NewCarRental, NewHotel},
};

#[derive(Clone, Default)]
pub struct ReferenceService {
    repo: ReferenceRepository,
}

impl ReferenceService {
    pub fn new(repo: ReferenceRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  HOTÉIS
    // =========================================================================

    pub async fn list_hotels<'e, E>(&self, executor: E, city: Option<&str>) -> Result<Vec<Hotel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        self.repo.list_hotels(executor, city).await
    }

    pub async fn create_hotel<'e, E>(&self, executor: E, hotel: &NewHotel) -> Result<Hotel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let hotel = hotel.normalized();
        hotel.validate()?;

        let created = self.repo.create_hotel(executor, &hotel).await?;
        info!(hotel_id = %created.id, name = %created.name, "🏨 Hotel cadastrado");
        Ok(created)
    }

    pub async fn delete_hotel<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.repo.delete_hotel(executor, id).await? == 0 {
            return Err(AppError::HotelNotFound);
        }
        info!(hotel_id = %id, "🗑️ Hotel excluído");
        Ok(())
    }

    // =========================================================================
    //  LOCADORAS
    // =========================================================================

    pub async fn list_car_rentals<'e, E>(&self, executor: E) -> Result<Vec<CarRental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_car_rentals(executor).await
    }

    pub async fn create_car_rental<'e, E>(&self, executor: E, rental: &NewCarRental) -> Result<CarRental, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = rental.normalized();
        rental.validate()?;

        let created = self.repo.create_car_rental(executor, &rental).await?;
        info!(car_rental_id = %created.id, name = %created.name, "🚗 Locadora cadastrada");
        Ok(created)
    }

    pub async fn delete_car_rental<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.repo.delete_car_rental(executor, id).await? == 0 {
            return Err(AppError::CarRentalNotFound);
        }
        info!(car_rental_id = %id, "🗑️ Locadora excluída");
        Ok(())
    }
}

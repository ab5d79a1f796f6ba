// src/services/seed_service.rs
//
// Catálogo inicial de hotéis e locadoras (Tashkent). Só insere quando a
// tabela está vazia, então pode rodar a cada inicialização.

use sqlx::{Acquire, Postgres};
use tracing::info;

use crate::{
    common::error::AppError,
    db::ReferenceRepository,
    models::reference::{NewCarRental, NewHotel},
};

const SEED_CITY: &str = "Tashkent";

const SEED_HOTELS: [(&str, &str); 5] = [
    ("Hilton Tashkent City", "Amir Temur Square 107/B"),
    ("Hyatt Regency Tashkent", "Navoi Street 1A"),
    ("InterContinental Tashkent", "Shakhrisabz Street 2"),
    ("Wyndham Tashkent", "Amir Temur Avenue 56"),
    ("Lotte City Hotel Tashkent Palace", "Buyuk Turon Street 56"),
];

const SEED_CAR_RENTALS: [&str; 5] = [
    "Uzbekistan Airways Car Rental",
    "Avis Uzbekistan",
    "Local Car Rent",
    "UzAuto Rent",
    "Express Car Rental",
];

pub fn default_hotels() -> Vec<NewHotel> {
    SEED_HOTELS
        .iter()
        .map(|(name, address)| NewHotel {
            name: name.to_string(),
            address: address.to_string(),
            city: Some(SEED_CITY.to_string()),
        })
        .collect()
}

/// Locadoras não têm endereço conhecido; usa a cidade.
pub fn default_car_rentals() -> Vec<NewCarRental> {
    SEED_CAR_RENTALS
        .iter()
        .map(|name| NewCarRental {
            name: name.to_string(),
            address: SEED_CITY.to_string(),
        })
        .collect()
}

/// Quantos registros foram inseridos em cada catálogo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub hotels: usize,
    pub car_rentals: usize,
}

#[derive(Clone, Default)]
pub struct SeedService {
    repo: ReferenceRepository,
}

impl SeedService {
    pub fn new(repo: ReferenceRepository) -> Self {
        Self { repo }
    }

    pub async fn seed_reference_data<'e, E>(&self, executor: E) -> Result<SeedReport, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let mut report = SeedReport::default();

        if self.repo.count_hotels(&mut *tx).await? == 0 {
            for hotel in default_hotels() {
                self.repo.create_hotel(&mut *tx, &hotel).await?;
                report.hotels += 1;
            }
        }
        if self.repo.count_car_rentals(&mut *tx).await? == 0 {
            for rental in default_car_rentals() {
                self.repo.create_car_rental(&mut *tx, &rental).await?;
                report.car_rentals += 1;
            }
        }

        tx.commit().await?;
        info!(hotels = report.hotels, car_rentals = report.car_rentals, "🌱 Catálogos de referência verificados");
        Ok(report)
    }
}

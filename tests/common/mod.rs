// tests/common/mod.rs
//
// Backend em memória que implementa `ReceiptsApi`. Emite os registros em
// snake_case, como algumas versões do backend, para exercitar o normalizador.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use receipts::{
    client::{ClientError, ReceiptListing, ReceiptsApi},
    models::{
        receipt::{CreateReceiptPayload, format_receipt_number},
        record::ReceiptRecord,
        reference::{CarRental, Hotel, NewCarRental, NewHotel},
    },
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Default)]
struct State {
    receipts: Vec<Value>,
    hotels: Vec<Hotel>,
    car_rentals: Vec<CarRental>,
    next_number: i64,
    calls: HashMap<&'static str, usize>,
    fail_next: Option<ClientError>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Próxima chamada (qualquer uma) falha com `err`.
    pub fn fail_next(&self, err: ClientError) {
        self.state().fail_next = Some(err);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.state().calls.get(name).copied().unwrap_or(0)
    }

    /// Insere um recibo já no formato armazenado (snake_case).
    pub fn insert_raw(&self, record: Value) {
        self.state().receipts.push(record);
    }

    pub fn seed_hotel(&self, name: &str, address: &str, city: &str) -> Hotel {
        let hotel = Hotel {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            city: Some(city.into()),
            created_at: None,
        };
        self.state().hotels.push(hotel.clone());
        hotel
    }

    fn enter(&self, name: &'static str) -> Result<MutexGuard<'_, State>, ClientError> {
        let mut state = self.state();
        *state.calls.entry(name).or_default() += 1;
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn listing(items: Vec<Value>, page: u32, limit: u32) -> ReceiptListing {
    let total = items.len() as u64;
    let start = ((page.max(1) - 1) * limit) as usize;
    let page_items = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .map(ReceiptRecord::new)
        .collect();
    ReceiptListing {
        items: page_items,
        page,
        limit,
        total,
        total_pages: total.div_ceil(u64::from(limit)) as u32,
    }
}

fn matches(record: &Value, query: &str) -> bool {
    let query = query.to_lowercase();
    ["receipt_number", "client_name", "client_email", "client_phone"]
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .any(|value| value.to_lowercase().contains(&query))
}

#[async_trait]
impl ReceiptsApi for FakeBackend {
    async fn create_receipt(&self, payload: &CreateReceiptPayload) -> Result<ReceiptRecord, ClientError> {
        let mut state = self.enter("create_receipt")?;
        state.next_number += 1;

        let activities: Vec<Value> = payload
            .activities
            .iter()
            .map(|a| {
                json!({
                    "id": Uuid::new_v4().to_string(),
                    "activity_type": a.activity_type.as_str(),
                    "property_name": a.property_name,
                    "property_address": a.property_address,
                    "check_in": a.check_in,
                    "check_out": a.check_out,
                    "amount": a.amount.to_string(),
                    "car_model": a.car_model,
                    "car_plate": a.car_plate,
                    "pickup_location": a.pickup_location,
                    "dropoff_location": a.dropoff_location,
                    "transfer_type": a.transfer_type.map(|t| t.as_str()),
                    "description": a.description,
                })
            })
            .collect();
        let amount_paid: Decimal = payload.activities.iter().map(|a| a.amount).sum();

        let record = json!({
            "id": Uuid::new_v4().to_string(),
            "receipt_number": format_receipt_number(state.next_number),
            "client_name": payload.client_name,
            "client_email": payload.client_email,
            "client_phone": payload.client_phone,
            "receipt_date": payload.receipt_date,
            "amount_paid": amount_paid.to_string(),
            "activities": activities,
        });
        state.receipts.push(record.clone());
        Ok(ReceiptRecord::new(record))
    }

    async fn list_receipts(&self, page: u32, limit: u32) -> Result<ReceiptListing, ClientError> {
        let state = self.enter("list_receipts")?;
        // Mais recentes primeiro; a tela reordena pelo número.
        let items = state.receipts.iter().rev().cloned().collect();
        Ok(listing(items, page, limit))
    }

    async fn search_receipts(&self, query: &str, page: u32, limit: u32) -> Result<ReceiptListing, ClientError> {
        let state = self.enter("search_receipts")?;
        let items = state
            .receipts
            .iter()
            .rev()
            .filter(|r| matches(r, query))
            .cloned()
            .collect();
        Ok(listing(items, page, limit))
    }

    async fn get_receipt(&self, id: &str) -> Result<ReceiptRecord, ClientError> {
        let state = self.enter("get_receipt")?;
        state
            .receipts
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            .cloned()
            .map(ReceiptRecord::new)
            .ok_or(ClientError::NotFound)
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, ClientError> {
        Ok(self.enter("list_hotels")?.hotels.clone())
    }

    async fn create_hotel(&self, hotel: &NewHotel) -> Result<Hotel, ClientError> {
        let mut state = self.enter("create_hotel")?;
        let created = Hotel {
            id: Uuid::new_v4(),
            name: hotel.name.clone(),
            address: hotel.address.clone(),
            city: hotel.city.clone(),
            created_at: None,
        };
        state.hotels.push(created.clone());
        Ok(created)
    }

    async fn delete_hotel(&self, id: Uuid) -> Result<(), ClientError> {
        let mut state = self.enter("delete_hotel")?;
        let before = state.hotels.len();
        state.hotels.retain(|h| h.id != id);
        if state.hotels.len() == before {
            return Err(ClientError::NotFound);
        }
        Ok(())
    }

    async fn list_car_rentals(&self) -> Result<Vec<CarRental>, ClientError> {
        Ok(self.enter("list_car_rentals")?.car_rentals.clone())
    }

    async fn create_car_rental(&self, rental: &NewCarRental) -> Result<CarRental, ClientError> {
        let mut state = self.enter("create_car_rental")?;
        let created = CarRental {
            id: Uuid::new_v4(),
            name: rental.name.clone(),
            address: rental.address.clone(),
            created_at: None,
        };
        state.car_rentals.push(created.clone());
        Ok(created)
    }

    async fn delete_car_rental(&self, id: Uuid) -> Result<(), ClientError> {
        let mut state = self.enter("delete_car_rental")?;
        let before = state.car_rentals.len();
        state.car_rentals.retain(|c| c.id != id);
        if state.car_rentals.len() == before {
            return Err(ClientError::NotFound);
        }
        Ok(())
    }
}

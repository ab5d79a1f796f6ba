// src/client/references.rs
//
// Catálogos de hotéis e locadoras do lado do cliente: um cache de leitura
// para o formulário e a tela de gestão (criar / listar / excluir).

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::flatten_validation_errors,
    models::reference::{CarRental, Hotel, NewCarRental, NewHotel},
};

use super::api::{ClientError, ReceiptsApi};

// =============================================================================
//  PROVEDOR (cache de leitura)
// =============================================================================

#[derive(Debug, Default)]
pub struct ReferenceProvider {
    hotels: Option<Vec<Hotel>>,
    car_rentals: Option<Vec<CarRental>>,
}

impl ReferenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Busca no backend só na primeira vez (ou depois de `invalidate`).
    pub async fn hotels(&mut self, api: &dyn ReceiptsApi) -> Result<&[Hotel], ClientError> {
        if self.hotels.is_none() {
            self.hotels = Some(api.list_hotels().await?);
        }
        Ok(self.hotels.as_deref().unwrap_or_default())
    }

    pub async fn car_rentals(&mut self, api: &dyn ReceiptsApi) -> Result<&[CarRental], ClientError> {
        if self.car_rentals.is_none() {
            self.car_rentals = Some(api.list_car_rentals().await?);
        }
        Ok(self.car_rentals.as_deref().unwrap_or_default())
    }

    pub fn invalidate(&mut self) {
        self.hotels = None;
        self.car_rentals = None;
    }

    /// Procura no que já está em cache (nome exato, sem diferenciar caixa).
    pub fn find_hotel_by_name(&self, name: &str) -> Option<&Hotel> {
        self.hotels
            .as_deref()?
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn find_car_rental_by_name(&self, name: &str) -> Option<&CarRental> {
        self.car_rentals
            .as_deref()?
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }
}

// =============================================================================
//  TELA DE GESTÃO
// =============================================================================

#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Dados recusados antes de ir para a rede.
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ReferenceError {
    pub fn user_message(&self) -> String {
        match self {
            ReferenceError::Invalid(message) => message.clone(),
            ReferenceError::Client(e) => e.user_message(),
        }
    }
}

/// Estado da tela de hotéis e locadoras. Toda mutação é seguida de uma
/// nova leitura dos dois catálogos; nada é corrigido localmente.
#[derive(Debug, Default)]
pub struct ReferenceManager {
    hotels: Vec<Hotel>,
    car_rentals: Vec<CarRental>,
    error: Option<String>,
    busy: bool,
}

impl ReferenceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    pub fn car_rentals(&self) -> &[CarRental] {
        &self.car_rentals
    }

    /// Mensagem única da última ação que falhou.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn refresh(&mut self, api: &dyn ReceiptsApi) -> Result<(), ClientError> {
        let hotels = api.list_hotels().await;
        let car_rentals = api.list_car_rentals().await;
        match (hotels, car_rentals) {
            (Ok(hotels), Ok(car_rentals)) => {
                self.hotels = hotels;
                self.car_rentals = car_rentals;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => Err(self.fail(e)),
        }
    }

    pub async fn add_hotel(&mut self, api: &dyn ReceiptsApi, hotel: NewHotel) -> Result<Hotel, ReferenceError> {
        let hotel = hotel.normalized();
        if let Err(errors) = hotel.validate() {
            return Err(self.reject(&errors));
        }

        self.begin();
        let created = api.create_hotel(&hotel).await;
        Ok(self.after_mutation(api, created).await?)
    }

    pub async fn add_car_rental(
        &mut self,
        api: &dyn ReceiptsApi,
        rental: NewCarRental,
    ) -> Result<CarRental, ReferenceError> {
        let rental = rental.normalized();
        if let Err(errors) = rental.validate() {
            return Err(self.reject(&errors));
        }

        self.begin();
        let created = api.create_car_rental(&rental).await;
        Ok(self.after_mutation(api, created).await?)
    }

    pub async fn delete_hotel(&mut self, api: &dyn ReceiptsApi, id: Uuid) -> Result<(), ClientError> {
        self.begin();
        let deleted = api.delete_hotel(id).await;
        self.after_mutation(api, deleted).await
    }

    pub async fn delete_car_rental(&mut self, api: &dyn ReceiptsApi, id: Uuid) -> Result<(), ClientError> {
        self.begin();
        let deleted = api.delete_car_rental(id).await;
        self.after_mutation(api, deleted).await
    }

    fn begin(&mut self) {
        self.busy = true;
        self.error = None;
    }

    async fn after_mutation<T>(
        &mut self,
        api: &dyn ReceiptsApi,
        outcome: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        self.busy = false;
        let value = outcome.map_err(|e| self.fail(e))?;
        info!("✅ Catálogo de referências alterado, recarregando");
        self.refresh(api).await?;
        Ok(value)
    }

    fn reject(&mut self, errors: &validator::ValidationErrors) -> ReferenceError {
        let message = validation_message(errors);
        warn!("⚠️ Referência recusada: {}", message);
        self.error = Some(message.clone());
        ReferenceError::Invalid(message)
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        error!("🔥 Falha na gestão de referências: {}", err);
        self.error = Some(err.user_message());
        err
    }
}

// "name: This field is required; address: ..."
fn validation_message(errors: &validator::ValidationErrors) -> String {
    flatten_validation_errors(errors)
        .into_iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rules;

    #[test]
    fn validation_message_lists_fields() {
        let errors = NewHotel::default().validate().unwrap_err();
        let message = validation_message(&errors);
        assert!(message.contains(&format!("name: {}", rules::REQUIRED)));
        assert!(message.contains(&format!("address: {}", rules::REQUIRED)));
    }

    #[test]
    fn empty_cache_finds_nothing() {
        let provider = ReferenceProvider::new();
        assert!(provider.find_hotel_by_name("Hyatt").is_none());
        assert!(provider.find_car_rental_by_name("Avis").is_none());
    }
}

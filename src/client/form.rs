// src/client/form.rs
//
// Estado do formulário de recibo: dados do cliente + lista de atividades,
// cada uma com os campos do seu tipo. Toda mutação é síncrona; só o envio
// (`generate`) espera a rede.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    common::{dates, rules::{self, ErrorKey}},
    models::{
        receipt::{ActivityPayload, ActivityType, CreateReceiptPayload, TransferType},
        record::ReceiptRecord,
        reference::ReferenceEntity,
    },
};

use super::{
    api::{ClientError, ReceiptsApi},
    storage::LastReceiptStore,
    validation::{self, FormErrors},
};

// =============================================================================
//  CAMPOS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Name,
    Email,
    Phone,
    ReceiptDate,
}

impl ClientField {
    pub fn error_key(self) -> ErrorKey {
        match self {
            ClientField::Name => ErrorKey::ClientName,
            ClientField::Email => ErrorKey::ClientEmail,
            ClientField::Phone => ErrorKey::ClientPhone,
            ClientField::ReceiptDate => ErrorKey::ReceiptDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Amount,
    CheckIn,
    CheckOut,
    PropertyName,
    PropertyAddress,
    CarModel,
    CarPlate,
    PickupLocation,
    DropoffLocation,
    TransferType,
    Description,
}

impl ActivityField {
    /// Chave de erro ligada ao campo, se houver.
    pub fn error_key(self, index: usize) -> Option<ErrorKey> {
        match self {
            ActivityField::Amount => Some(ErrorKey::ActivityAmount(index)),
            ActivityField::CheckIn => Some(ErrorKey::ActivityCheckIn(index)),
            ActivityField::CheckOut => Some(ErrorKey::ActivityCheckOut(index)),
            ActivityField::PickupLocation => Some(ErrorKey::ActivityPickupLocation(index)),
            ActivityField::DropoffLocation => Some(ErrorKey::ActivityDropoffLocation(index)),
            ActivityField::Description => Some(ErrorKey::ActivityDescription(index)),
            _ => None,
        }
    }
}

// =============================================================================
//  RASCUNHO
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub receipt_date: String,
}

impl ClientInfo {
    fn field_mut(&mut self, field: ClientField) -> &mut String {
        match field {
            ClientField::Name => &mut self.name,
            ClientField::Email => &mut self.email,
            ClientField::Phone => &mut self.phone,
            ClientField::ReceiptDate => &mut self.receipt_date,
        }
    }
}

/// Campos específicos de cada tipo de atividade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityDetails {
    Hotel {
        property_name: String,
        property_address: String,
    },
    CarRental {
        property_name: String,
        property_address: String,
        car_model: String,
        car_plate: String,
        pickup_location: String,
        dropoff_location: String,
        /// Comentários do operador.
        description: String,
    },
    Transfer {
        transfer_type: Option<TransferType>,
        pickup_location: String,
        dropoff_location: String,
    },
    Other {
        property_name: String,
        property_address: String,
        description: String,
    },
}

impl ActivityDetails {
    pub fn blank(activity_type: ActivityType) -> Self {
        match activity_type {
            ActivityType::Hotel => ActivityDetails::Hotel {
                property_name: String::new(),
                property_address: String::new(),
            },
            ActivityType::CarRental => ActivityDetails::CarRental {
                property_name: String::new(),
                property_address: String::new(),
                car_model: String::new(),
                car_plate: String::new(),
                pickup_location: String::new(),
                dropoff_location: String::new(),
                description: String::new(),
            },
            ActivityType::Transfer => ActivityDetails::Transfer {
                transfer_type: None,
                pickup_location: String::new(),
                dropoff_location: String::new(),
            },
            ActivityType::Other => ActivityDetails::Other {
                property_name: String::new(),
                property_address: String::new(),
                description: String::new(),
            },
        }
    }

    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityDetails::Hotel { .. } => ActivityType::Hotel,
            ActivityDetails::CarRental { .. } => ActivityType::CarRental,
            ActivityDetails::Transfer { .. } => ActivityType::Transfer,
            ActivityDetails::Other { .. } => ActivityType::Other,
        }
    }

    /// Campo de texto do tipo atual; `None` se o tipo não tem esse campo.
    fn text_field_mut(&mut self, field: ActivityField) -> Option<&mut String> {
        use ActivityDetails::*;
        use ActivityField as F;

        match (self, field) {
            (Hotel { property_name, .. }, F::PropertyName)
            | (CarRental { property_name, .. }, F::PropertyName)
            | (Other { property_name, .. }, F::PropertyName) => Some(property_name),
            (Hotel { property_address, .. }, F::PropertyAddress)
            | (CarRental { property_address, .. }, F::PropertyAddress)
            | (Other { property_address, .. }, F::PropertyAddress) => Some(property_address),
            (CarRental { car_model, .. }, F::CarModel) => Some(car_model),
            (CarRental { car_plate, .. }, F::CarPlate) => Some(car_plate),
            (CarRental { pickup_location, .. }, F::PickupLocation)
            | (Transfer { pickup_location, .. }, F::PickupLocation) => Some(pickup_location),
            (CarRental { dropoff_location, .. }, F::DropoffLocation)
            | (Transfer { dropoff_location, .. }, F::DropoffLocation) => Some(dropoff_location),
            (CarRental { description, .. }, F::Description)
            | (Other { description, .. }, F::Description) => Some(description),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub amount: String,
    pub check_in: String,
    pub check_out: String,
    pub details: ActivityDetails,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self::new(ActivityType::Hotel)
    }
}

impl ActivityDraft {
    pub fn new(activity_type: ActivityType) -> Self {
        Self {
            amount: String::new(),
            check_in: String::new(),
            check_out: String::new(),
            details: ActivityDetails::blank(activity_type),
        }
    }

    pub fn activity_type(&self) -> ActivityType {
        self.details.activity_type()
    }

    /// Valor numérico; em branco ou inválido conta como zero.
    pub fn amount_value(&self) -> Decimal {
        rules::parse_amount(&self.amount).unwrap_or_default()
    }

    fn to_payload(&self) -> ActivityPayload {
        let mut payload = ActivityPayload {
            activity_type: self.activity_type(),
            amount: self.amount_value(),
            check_in: dates::to_iso_date(&self.check_in),
            check_out: dates::to_iso_date(&self.check_out),
            ..ActivityPayload::default()
        };

        match &self.details {
            ActivityDetails::Hotel { property_name, property_address } => {
                payload.property_name = non_blank(property_name);
                payload.property_address = non_blank(property_address);
            }
            ActivityDetails::CarRental {
                property_name,
                property_address,
                car_model,
                car_plate,
                pickup_location,
                dropoff_location,
                description,
            } => {
                payload.property_name = non_blank(property_name);
                payload.property_address = non_blank(property_address);
                payload.car_model = non_blank(car_model);
                payload.car_plate = non_blank(car_plate);
                payload.pickup_location = non_blank(pickup_location);
                payload.dropoff_location = non_blank(dropoff_location);
                payload.description = non_blank(description);
            }
            ActivityDetails::Transfer { transfer_type, pickup_location, dropoff_location } => {
                payload.transfer_type = *transfer_type;
                payload.pickup_location = non_blank(pickup_location);
                payload.dropoff_location = non_blank(dropoff_location);
            }
            ActivityDetails::Other { property_name, property_address, description } => {
                payload.property_name = non_blank(property_name);
                payload.property_address = non_blank(property_address);
                payload.description = non_blank(description);
            }
        }

        payload
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDraft {
    pub client: ClientInfo,
    pub activities: Vec<ActivityDraft>,
}

impl Default for ReceiptDraft {
    fn default() -> Self {
        Self {
            client: ClientInfo::default(),
            activities: vec![ActivityDraft::default()],
        }
    }
}

impl ReceiptDraft {
    /// Soma dos valores das atividades (inválido conta como zero).
    pub fn amount_paid(&self) -> Decimal {
        rules::sum_amounts(self.activities.iter().map(ActivityDraft::amount_value))
    }

    /// Formato enviado ao backend: valores numéricos, datas ISO, vazio -> null.
    pub fn to_payload(&self) -> CreateReceiptPayload {
        CreateReceiptPayload {
            client_name: self.client.name.trim().to_string(),
            client_email: self.client.email.trim().to_string(),
            client_phone: self.client.phone.trim().to_string(),
            receipt_date: dates::to_iso_date(&self.client.receipt_date)
                .unwrap_or_else(|| self.client.receipt_date.trim().to_string()),
            amount_paid: Some(self.amount_paid()),
            activities: self.activities.iter().map(ActivityDraft::to_payload).collect(),
        }
    }
}

// =============================================================================
//  ERROS
// =============================================================================

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Atividade {0} não existe")]
    NoSuchActivity(usize),

    #[error("O campo {field:?} não se aplica a atividades do tipo {activity_type}")]
    FieldNotApplicable {
        field: ActivityField,
        activity_type: ActivityType,
    },

    #[error("O recibo precisa de pelo menos uma atividade")]
    LastActivity,

    #[error("Tipo de transfer inválido: {0}")]
    InvalidTransferType(String),

    #[error("Só hotéis e aluguéis de carro usam referências")]
    ReferenceNotApplicable,

    #[error("Formulário com {0} erro(s) de validação")]
    Invalid(usize),

    #[error("Já existe um envio em andamento")]
    Busy,

    #[error("Falha ao enviar o recibo: {0}")]
    Submission(#[from] ClientError),
}

// =============================================================================
//  FORMULÁRIO
// =============================================================================

/// Sessão do formulário de recibo.
#[derive(Debug, Default)]
pub struct ReceiptForm {
    draft: ReceiptDraft,
    errors: FormErrors,
    generated: Option<ReceiptRecord>,
    submitting: bool,
    store: Option<LastReceiptStore>,
}

impl ReceiptForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda o último recibo gerado em disco (usado só como prévia).
    pub fn with_store(mut self, store: LastReceiptStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn draft(&self) -> &ReceiptDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn generated(&self) -> Option<&ReceiptRecord> {
        self.generated.as_ref()
    }

    /// Enquanto `true`, o botão de envio fica desabilitado.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn amount_paid(&self) -> Decimal {
        self.draft.amount_paid()
    }

    // --- Mutações ---

    pub fn set_client_field(&mut self, field: ClientField, value: impl Into<String>) {
        *self.draft.client.field_mut(field) = value.into();
        self.errors.remove(field.error_key());
    }

    /// Acrescenta uma atividade de hotel em branco e devolve o índice dela.
    pub fn add_activity(&mut self) -> usize {
        self.draft.activities.push(ActivityDraft::default());
        self.errors.remove(ErrorKey::Activities);
        self.draft.activities.len() - 1
    }

    pub fn remove_activity(&mut self, index: usize) -> Result<ActivityDraft, FormError> {
        if index >= self.draft.activities.len() {
            return Err(FormError::NoSuchActivity(index));
        }
        if self.draft.activities.len() == 1 {
            return Err(FormError::LastActivity);
        }
        let removed = self.draft.activities.remove(index);
        self.errors.remove_activity(index);
        Ok(removed)
    }

    pub fn set_activity_field(
        &mut self,
        index: usize,
        field: ActivityField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let value = value.into();
        let activity = self
            .draft
            .activities
            .get_mut(index)
            .ok_or(FormError::NoSuchActivity(index))?;

        match field {
            ActivityField::Amount => activity.amount = value,
            ActivityField::CheckIn => activity.check_in = value,
            ActivityField::CheckOut => activity.check_out = value,
            ActivityField::TransferType => match &mut activity.details {
                ActivityDetails::Transfer { transfer_type, .. } => {
                    *transfer_type = if rules::is_blank(&value) {
                        None
                    } else {
                        Some(value.parse().map_err(|_| FormError::InvalidTransferType(value.clone()))?)
                    };
                }
                details => {
                    return Err(FormError::FieldNotApplicable {
                        field,
                        activity_type: details.activity_type(),
                    });
                }
            },
            _ => {
                let activity_type = activity.activity_type();
                let slot = activity
                    .details
                    .text_field_mut(field)
                    .ok_or(FormError::FieldNotApplicable { field, activity_type })?;
                *slot = value;
            }
        }

        if let Some(key) = field.error_key(index) {
            self.errors.remove(key);
        }
        Ok(())
    }

    /// Troca o tipo e zera os campos específicos (nada do tipo anterior vaza).
    pub fn set_activity_type(&mut self, index: usize, activity_type: ActivityType) -> Result<(), FormError> {
        let activity = self
            .draft
            .activities
            .get_mut(index)
            .ok_or(FormError::NoSuchActivity(index))?;
        activity.details = ActivityDetails::blank(activity_type);

        for key in [
            ErrorKey::ActivityPickupLocation(index),
            ErrorKey::ActivityDropoffLocation(index),
            ErrorKey::ActivityDescription(index),
        ] {
            self.errors.remove(key);
        }
        Ok(())
    }

    /// Copia nome + endereço de um hotel/locadora para a atividade.
    pub fn select_reference(&mut self, index: usize, reference: &dyn ReferenceEntity) -> Result<(), FormError> {
        let activity = self
            .draft
            .activities
            .get_mut(index)
            .ok_or(FormError::NoSuchActivity(index))?;

        match &mut activity.details {
            ActivityDetails::Hotel { property_name, property_address }
            | ActivityDetails::CarRental { property_name, property_address, .. } => {
                *property_name = reference.name().to_string();
                *property_address = reference.address().to_string();
                Ok(())
            }
            _ => Err(FormError::ReferenceNotApplicable),
        }
    }

    /// Descarta o rascunho e o recibo gerado.
    pub fn reset(&mut self) {
        self.draft = ReceiptDraft::default();
        self.errors.clear();
        self.generated = None;
        self.submitting = false;
    }

    // --- Envio ---

    /// Valida e, se estiver tudo certo, marca o envio como em andamento e
    /// devolve o payload. Recusa um segundo envio concorrente.
    pub fn begin_submit(&mut self) -> Result<CreateReceiptPayload, FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }

        let errors = validation::validate(&self.draft);
        if !errors.is_empty() {
            let count = errors.len();
            self.errors = errors;
            return Err(FormError::Invalid(count));
        }

        self.errors.clear();
        self.submitting = true;
        Ok(self.draft.to_payload())
    }

    /// Aplica a resposta do backend. Em caso de falha o rascunho fica intacto.
    pub fn finish_submit(
        &mut self,
        outcome: Result<ReceiptRecord, ClientError>,
    ) -> Result<ReceiptRecord, FormError> {
        self.submitting = false;
        match outcome {
            Ok(record) => {
                info!(receipt_number = %record.receipt_number(), "✅ Recibo gerado");
                self.errors.clear();
                if let Some(store) = &self.store {
                    if let Err(e) = store.save(&record) {
                        warn!("⚠️ Não foi possível guardar o último recibo: {}", e);
                    }
                }
                self.generated = Some(record.clone());
                Ok(record)
            }
            Err(e) => {
                error!("🔥 Falha ao gerar o recibo: {}", e);
                self.errors.insert(ErrorKey::General, e.user_message());
                Err(FormError::Submission(e))
            }
        }
    }

    pub async fn generate(&mut self, api: &dyn ReceiptsApi) -> Result<ReceiptRecord, FormError> {
        let payload = self.begin_submit()?;
        let outcome = api.create_receipt(&payload).await;
        self.finish_submit(outcome)
    }

    /// Recibo para a prévia: o recém-gerado ou, na falta dele, o último salvo.
    pub fn preview(&self) -> Option<ReceiptRecord> {
        if let Some(record) = &self.generated {
            return Some(record.clone());
        }
        self.store.as_ref().and_then(|store| match store.load() {
            Ok(record) => record,
            Err(e) => {
                warn!("⚠️ Último recibo salvo ilegível: {}", e);
                None
            }
        })
    }
}

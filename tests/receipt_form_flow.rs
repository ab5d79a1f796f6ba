// tests/receipt_form_flow.rs

mod common;

use common::FakeBackend;
use receipts::{
    client::{
        ClientError, LastReceiptStore, ReceiptForm, ReceiptsApi,
        form::{ActivityField, ClientField, FormError},
        validate,
    },
    common::{fields::Field, rules::ErrorKey},
    models::receipt::ActivityType,
    render::{PreviewView, ScreenView},
};
use rust_decimal::Decimal;

fn filled_form() -> ReceiptForm {
    let mut form = ReceiptForm::new();
    form.set_client_field(ClientField::Name, "Jane Doe");
    form.set_client_field(ClientField::Email, "jane@x.com");
    form.set_client_field(ClientField::Phone, "+15551234567");
    form.set_client_field(ClientField::ReceiptDate, "2024-05-01");

    form.set_activity_field(0, ActivityField::PropertyName, "Hyatt Regency Tashkent").unwrap();
    form.set_activity_field(0, ActivityField::PropertyAddress, "Navoi Street 1A").unwrap();
    form.set_activity_field(0, ActivityField::CheckIn, "2024-04-28").unwrap();
    form.set_activity_field(0, ActivityField::CheckOut, "2024-04-30").unwrap();
    form.set_activity_field(0, ActivityField::Amount, "120.50").unwrap();

    let transfer = form.add_activity();
    form.set_activity_type(transfer, ActivityType::Transfer).unwrap();
    form.set_activity_field(transfer, ActivityField::TransferType, "airport_pickup").unwrap();
    form.set_activity_field(transfer, ActivityField::PickupLocation, "Airport").unwrap();
    form.set_activity_field(transfer, ActivityField::Amount, "30").unwrap();
    form
}

#[test]
fn example_draft_is_valid_and_totals_150_50() {
    let form = filled_form();
    assert!(validate(form.draft()).is_empty());
    assert_eq!(form.amount_paid(), Decimal::new(15050, 2));
}

#[tokio::test]
async fn submitted_receipt_round_trips_through_the_backend() {
    let backend = FakeBackend::new();
    let mut form = filled_form();

    let generated = form.generate(&backend).await.unwrap();
    assert_eq!(generated.receipt_number(), "M00001");
    assert!(!form.is_submitting());

    let fetched = backend.get_receipt(&generated.id()).await.unwrap();
    assert_eq!(fetched.text(Field::ClientName), "Jane Doe");
    assert_eq!(fetched.text(Field::ClientEmail), "jane@x.com");
    assert_eq!(fetched.text(Field::ClientPhone), "+15551234567");
    assert_eq!(fetched.text(Field::ReceiptDate), "2024-05-01");
    assert_eq!(fetched.total(), Decimal::new(15050, 2));

    let activities = fetched.activities();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].activity_type(), Some(ActivityType::Hotel));
    assert_eq!(activities[0].text(Field::PropertyName), "Hyatt Regency Tashkent");
    assert_eq!(activities[1].text(Field::TransferType), "airport_pickup");

    let screen = ScreenView::from_record(&fetched);
    assert_eq!(screen.display_date, "01/05/2024");
    assert_eq!(screen.total, "$150.50");
    assert_eq!(screen.sections[1].title, "TRANSFER");
}

#[tokio::test]
async fn invalid_form_never_reaches_the_network() {
    let backend = FakeBackend::new();
    let mut form = filled_form();
    form.set_client_field(ClientField::Email, "not-an-email");

    let err = form.generate(&backend).await.unwrap_err();
    assert!(matches!(err, FormError::Invalid(1)));
    assert!(form.errors().contains(ErrorKey::ClientEmail));
    assert_eq!(backend.calls("create_receipt"), 0);
}

#[tokio::test]
async fn backend_failure_keeps_the_draft_for_retry() {
    let backend = FakeBackend::new();
    let mut form = filled_form();
    let draft_before = form.draft().clone();

    backend.fail_next(ClientError::Timeout);
    let err = form.generate(&backend).await.unwrap_err();
    assert!(matches!(err, FormError::Submission(ClientError::Timeout)));
    assert_eq!(form.draft(), &draft_before);
    assert_eq!(
        form.errors().get(ErrorKey::General),
        Some("The server took too long to respond. Please try again.")
    );

    // Segunda tentativa com o mesmo rascunho
    let generated = form.generate(&backend).await.unwrap();
    assert_eq!(generated.receipt_number(), "M00001");
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn last_receipt_is_kept_for_preview() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();

    let mut form = filled_form().with_store(LastReceiptStore::new(dir.path()));
    let generated = form.generate(&backend).await.unwrap();

    // Nova sessão: nada gerado ainda, a prévia vem do arquivo.
    let fresh = ReceiptForm::new().with_store(LastReceiptStore::new(dir.path()));
    let preview = fresh.preview().unwrap();
    assert_eq!(preview, generated);

    let view = PreviewView::from_record(&preview);
    assert_eq!(view.detail_path, format!("/receipt/{}", generated.id()));
    assert_eq!(view.lines[0], "HOTEL - Hyatt Regency Tashkent - $120.50");
    assert_eq!(view.total, "$150.50");
}

#[test]
fn reset_discards_everything() {
    let mut form = filled_form();
    form.reset();
    assert_eq!(form.draft().activities.len(), 1);
    assert_eq!(form.draft().client.name, "");
    assert!(form.generated().is_none());
}

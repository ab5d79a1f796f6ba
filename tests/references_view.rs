// tests/references_view.rs

mod common;

use common::FakeBackend;
use receipts::{
    client::{
        ReceiptForm, ReferenceManager, ReferenceProvider,
        form::ActivityDetails,
        references::ReferenceError,
    },
    common::rules,
    models::{
        receipt::ActivityType,
        reference::{NewCarRental, NewHotel},
    },
};

#[tokio::test]
async fn every_mutation_refetches_both_catalogs() {
    let backend = FakeBackend::new();
    let mut manager = ReferenceManager::new();
    manager.refresh(&backend).await.unwrap();

    let hotel = manager
        .add_hotel(
            &backend,
            NewHotel { name: " Hyatt Regency Tashkent ".into(), address: "Navoi Street 1A".into(), city: None },
        )
        .await
        .unwrap();
    assert_eq!(hotel.name, "Hyatt Regency Tashkent");
    assert_eq!(backend.calls("list_hotels"), 2);
    assert_eq!(backend.calls("list_car_rentals"), 2);
    assert_eq!(manager.hotels().len(), 1);

    manager
        .add_car_rental(&backend, NewCarRental { name: "Avis Uzbekistan".into(), address: "Tashkent".into() })
        .await
        .unwrap();
    assert_eq!(manager.car_rentals().len(), 1);

    manager.delete_hotel(&backend, hotel.id).await.unwrap();
    assert!(manager.hotels().is_empty());
    assert_eq!(backend.calls("list_hotels"), 4);
    assert_eq!(backend.calls("list_car_rentals"), 4);
    assert!(!manager.is_busy());
}

#[tokio::test]
async fn invalid_entries_are_rejected_locally() {
    let backend = FakeBackend::new();
    let mut manager = ReferenceManager::new();

    let err = manager
        .add_hotel(&backend, NewHotel { name: "Hilton".into(), address: "  ".into(), city: None })
        .await
        .unwrap_err();

    assert!(matches!(err, ReferenceError::Invalid(_)));
    assert_eq!(manager.error(), Some(format!("address: {}", rules::REQUIRED).as_str()));
    assert_eq!(backend.calls("create_hotel"), 0);
}

#[tokio::test]
async fn failed_delete_surfaces_one_message() {
    let backend = FakeBackend::new();
    let mut manager = ReferenceManager::new();

    let err = manager.delete_car_rental(&backend, uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, receipts::client::ClientError::NotFound));
    assert_eq!(manager.error(), Some("Not found"));
    assert_eq!(backend.calls("list_car_rentals"), 0);
}

#[tokio::test]
async fn provider_caches_until_invalidated() {
    let backend = FakeBackend::new();
    backend.seed_hotel("Wyndham Tashkent", "Amir Temur Avenue 56", "Tashkent");
    let mut provider = ReferenceProvider::new();

    assert_eq!(provider.hotels(&backend).await.unwrap().len(), 1);
    assert_eq!(provider.hotels(&backend).await.unwrap().len(), 1);
    assert_eq!(backend.calls("list_hotels"), 1);

    backend.seed_hotel("Hilton Tashkent City", "Amir Temur Square 107/B", "Tashkent");
    provider.invalidate();
    assert_eq!(provider.hotels(&backend).await.unwrap().len(), 2);
    assert_eq!(backend.calls("list_hotels"), 2);
}

#[tokio::test]
async fn selecting_a_hotel_prefills_the_activity() {
    let backend = FakeBackend::new();
    backend.seed_hotel("Wyndham Tashkent", "Amir Temur Avenue 56", "Tashkent");
    let mut provider = ReferenceProvider::new();
    provider.hotels(&backend).await.unwrap();

    let hotel = provider.find_hotel_by_name("wyndham tashkent").unwrap().clone();
    let mut form = ReceiptForm::new();
    form.select_reference(0, &hotel).unwrap();

    assert_eq!(form.draft().activities[0].activity_type(), ActivityType::Hotel);
    assert_eq!(
        form.draft().activities[0].details,
        ActivityDetails::Hotel {
            property_name: "Wyndham Tashkent".into(),
            property_address: "Amir Temur Avenue 56".into(),
        }
    );
}

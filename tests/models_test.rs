use serde_json::json;
use vet_console::models::{
    AnimalStatus, Contact, Medicine, MedicineCategory, Sale, UpdateUserPayload,
};

#[test]
fn medicine_price_accepts_string_or_number() {
    let from_string: Medicine = serde_json::from_value(json!({
        "id": 1,
        "name": "Amoxicillin",
        "category": "Antibiotic",
        "price": "12.50",
        "quantity": 4,
        "expiry_date": "2027-01-31"
    }))
    .expect("decode medicine");
    assert_eq!(from_string.price, 12.5);
    assert_eq!(from_string.category, MedicineCategory::Antibiotic);
    assert_eq!(from_string.stock_value(), 50.0);

    let from_number: Medicine = serde_json::from_value(json!({
        "id": 2,
        "name": "Fish oil",
        "price": 3,
        "quantity": 0,
        "expiry_date": "2027-01-31"
    }))
    .expect("decode medicine");
    assert_eq!(from_number.price, 3.0);
    assert_eq!(from_number.category, MedicineCategory::Other);

    let bad = serde_json::from_value::<Medicine>(json!({
        "id": 3,
        "name": "Broken",
        "price": "twelve",
        "quantity": 1,
        "expiry_date": "2027-01-31"
    }));
    assert!(bad.is_err());
}

#[test]
fn medicine_payload_serializes_lowercase_category() {
    let medicine: Medicine = serde_json::from_value(json!({
        "id": 1,
        "name": "Carprofen",
        "category": "painkiller",
        "price": 4.25,
        "quantity": 9,
        "expiry_date": "2027-01-31"
    }))
    .expect("decode medicine");

    let body = serde_json::to_value(medicine.to_payload()).expect("encode payload");
    assert_eq!(body["category"], "painkiller");
    assert_eq!(body["quantity"], 9);
    assert!(body.get("id").is_none());
}

#[test]
fn sale_total_may_be_missing() {
    let sale: Sale = serde_json::from_value(json!({
        "id": 5,
        "medicine": 1,
        "quantity_sold": 1,
        "sale_date": "2026-10-01T09:00:00Z"
    }))
    .expect("decode sale");
    assert_eq!(sale.total_price, None);
    assert_eq!(sale.medicine_name, None);
}

#[test]
fn contact_subject_falls_back_to_name() {
    let contact: Contact = serde_json::from_value(json!({
        "contact_id": 3,
        "name": "Billing",
        "email": "pat@example.com",
        "message": "Charged twice"
    }))
    .expect("decode contact");
    assert_eq!(contact.subject, "Billing");
}

#[test]
fn animal_status_uses_lowercase_wire_names() {
    assert_eq!(
        serde_json::to_value(AnimalStatus::Discharged).expect("encode status"),
        json!("discharged")
    );
    assert_eq!(AnimalStatus::Admitted.as_str(), "admitted");
}

#[test]
fn user_update_omits_unset_fields() {
    let body = serde_json::to_value(UpdateUserPayload {
        full_name: Some("Dr. Vet".to_string()),
        email: None,
    })
    .expect("encode payload");
    assert_eq!(body, json!({ "full_name": "Dr. Vet" }));
}

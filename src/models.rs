use serde::{Deserialize, Serialize};

/// Decimal fields arrive either as JSON numbers or as decimal strings ("12.50").
mod decimal {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    fn to_f64<E: Error>(value: NumberOrText) -> Result<f64, E> {
        match value {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid decimal '{}'", s))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        to_f64(NumberOrText::deserialize(deserializer)?)
    }

    pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<NumberOrText>::deserialize(deserializer)?
            .map(to_f64)
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterPayload {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateUserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Medicines and sales
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MedicineCategory {
    #[serde(rename = "antibiotic", alias = "Antibiotic")]
    Antibiotic,
    #[serde(rename = "painkiller", alias = "Painkiller")]
    Painkiller,
    #[serde(rename = "supplement", alias = "Supplement")]
    Supplement,
    #[default]
    #[serde(rename = "other", alias = "Other")]
    Other,
}

impl MedicineCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicineCategory::Antibiotic => "antibiotic",
            MedicineCategory::Painkiller => "painkiller",
            MedicineCategory::Supplement => "supplement",
            MedicineCategory::Other => "other",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: MedicineCategory,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub price: f64,
    pub quantity: u32,
    pub expiry_date: String,
}

impl Medicine {
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Full-record payload for a PUT, carrying every field of this medicine.
    pub fn to_payload(&self) -> MedicinePayload {
        MedicinePayload {
            name: self.name.clone(),
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            expiry_date: self.expiry_date.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MedicinePayload {
    pub name: String,
    pub category: MedicineCategory,
    pub price: f64,
    pub quantity: u32,
    pub expiry_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: i64,
    pub medicine: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_name: Option<String>,
    pub quantity_sold: u32,
    #[serde(default, deserialize_with = "decimal::option")]
    pub total_price: Option<f64>,
    pub sale_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SalePayload {
    pub medicine: i64,
    pub quantity_sold: u32,
    pub total_price: f64,
    pub sale_date: String,
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimalStatus {
    #[default]
    Admitted,
    Discharged,
}

impl AnimalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalStatus::Admitted => crate::constants::PATIENT_STATUS_ADMITTED,
            AnimalStatus::Discharged => crate::constants::PATIENT_STATUS_DISCHARGED,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Animal {
    pub animal_id: i64,
    pub owner_name: String,
    pub owner_contact: String,
    pub species: String,
    #[serde(default)]
    pub status: AnimalStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimalPayload {
    pub owner_name: String,
    pub owner_contact: String,
    pub species: String,
    pub status: AnimalStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimalDiagnosis {
    pub id: i64,
    pub animal: i64,
    pub diagnosis: String,
    pub prescribed_medicine: String,
    pub dosage: String,
    #[serde(default)]
    pub next_checkup: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiagnosisPayload {
    pub animal: i64,
    pub diagnosis: String,
    pub prescribed_medicine: String,
    pub dosage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_checkup: Option<String>,
}

// ---------------------------------------------------------------------------
// Appointments and support
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub owner_name: String,
    pub owner_contact: String,
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppointmentPayload {
    pub owner_name: String,
    pub owner_contact: String,
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contact {
    pub contact_id: i64,
    #[serde(alias = "name")]
    pub subject: String,
    pub email: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactPayload {
    pub subject: String,
    pub email: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Dashboard aggregates
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_medicines: u64,
    pub total_sales: u64,
    pub total_appointments: u64,
    pub total_contacts: u64,
    pub total_patients: u64,
    pub total_revenue: f64,
    pub total_stock_value: f64,
    pub low_stock: Vec<Medicine>,
}

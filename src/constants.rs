// Client configuration
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_PURCHASE_CLOSE_DELAY_MS: u64 = 1500;
pub const DEFAULT_LOG_FILTER: &str = "info,vet_console=debug";

// Local storage
pub const SESSION_FILE_NAME: &str = "session.json";
pub const PURCHASE_LEDGER_FILE_NAME: &str = "purchases.json";

// Collections
pub const USERS_COLLECTION: &str = "users";
pub const MEDICINE_COLLECTION: &str = "medicine";
pub const SALES_COLLECTION: &str = "sales";
pub const PATIENTS_COLLECTION: &str = "patients";
pub const DIAGNOSES_COLLECTION: &str = "animal-diagnoses";
pub const APPOINTMENTS_COLLECTION: &str = "appointments";
pub const CONTACTS_COLLECTION: &str = "contacts";

// Auth endpoints
pub const REGISTER_PATH: &str = "register";
pub const LOGIN_PATH: &str = "login";

// Aggregate endpoints
pub const SALES_COUNT_PATH: &str = "sales/count";
pub const MEDICINE_COUNT_PATH: &str = "medicine/count";
pub const APPOINTMENTS_COUNT_PATH: &str = "appointments/count";
pub const CONTACTS_COUNT_PATH: &str = "contacts/count";
pub const PATIENTS_COUNT_PATH: &str = "patients/count";
pub const USERS_COUNT_PATH: &str = "users/count";
pub const TOTAL_REVENUE_PATH: &str = "sales/total-revenue";
pub const TOTAL_STOCK_VALUE_PATH: &str = "medicine/total-stock-value";
pub const LOW_STOCK_PATH: &str = "medicine/low-stock";

// Page sizes per management screen
pub const USERS_PAGE_SIZE: usize = 5;
pub const PATIENTS_PAGE_SIZE: usize = 5;
pub const DIAGNOSES_PAGE_SIZE: usize = 5;
pub const SUPPORT_PAGE_SIZE: usize = 6;
pub const MEDICATIONS_PAGE_SIZE: usize = 6;
pub const APPOINTMENTS_PAGE_SIZE: usize = 6;
pub const SALES_PAGE_SIZE: usize = 8;

// Purchase wizard validation (minimum lengths only)
pub const MIN_PHONE_LENGTH: usize = 10;
pub const MIN_CARD_NUMBER_LENGTH: usize = 16;
pub const MIN_CARD_EXPIRY_LENGTH: usize = 5;
pub const MIN_CVV_LENGTH: usize = 3;

// Portal validation limits
pub const MAX_OWNER_NAME_LENGTH: usize = 100;
pub const MAX_OWNER_CONTACT_LENGTH: usize = 15;
pub const MAX_SUBJECT_LENGTH: usize = 100;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_FULL_NAME_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 254;

// Purchase intent status
pub const PURCHASE_STATUS_INITIATED: &str = "initiated";
pub const PURCHASE_STATUS_STOCK_RESERVED: &str = "stock_reserved";
pub const PURCHASE_STATUS_COMPLETED: &str = "completed";
pub const PURCHASE_STATUS_PARTIAL_FAILURE: &str = "partial_failure";
pub const PURCHASE_STATUS_COMPENSATED: &str = "compensated";

// Patient status
pub const PATIENT_STATUS_ADMITTED: &str = "admitted";
pub const PATIENT_STATUS_DISCHARGED: &str = "discharged";

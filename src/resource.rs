use std::future::Future;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::ApiClient;
use crate::constants::*;
use crate::error::ApiError;
use crate::models::*;
use crate::utils::case_insensitive_contains;

/// A record type served by one REST collection.
pub trait Resource: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Body sent on creation. The server assigns the id.
    type Draft: Serialize + Send + Sync;
    /// Body sent on update.
    type Patch: Serialize + Send + Sync;

    const COLLECTION: &'static str;
    /// Where creations are posted; differs from the collection for users.
    const CREATE_PATH: &'static str = Self::COLLECTION;
    /// Rows per page on the screen that manages this collection.
    const PAGE_SIZE: usize;

    fn id(&self) -> i64;

    /// `needle_lower` is already lowercased; an empty needle matches everything.
    fn matches(&self, needle_lower: &str) -> bool;
}

/// Typed access to one remote collection.
pub trait ResourceAdapter<R: Resource>: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<R>, ApiError>> + Send;

    fn fetch_one(&self, id: i64) -> impl Future<Output = Result<R, ApiError>> + Send;

    fn create(&self, draft: &R::Draft) -> impl Future<Output = Result<R, ApiError>> + Send;

    fn update(
        &self,
        id: i64,
        patch: &R::Patch,
    ) -> impl Future<Output = Result<R, ApiError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// The standard list/get/create/update/delete verbs over `{collection}/` and
/// `{collection}/{id}/`.
pub struct RestCollection<R> {
    api: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RestCollection<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Resource> RestCollection<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _record: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", R::COLLECTION, id)
    }
}

impl<R: Resource> ResourceAdapter<R> for RestCollection<R> {
    async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        self.api.get(R::COLLECTION).await
    }

    async fn fetch_one(&self, id: i64) -> Result<R, ApiError> {
        self.api.get(&Self::item_path(id)).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError> {
        self.api.post(R::CREATE_PATH, draft).await
    }

    async fn update(&self, id: i64, patch: &R::Patch) -> Result<R, ApiError> {
        self.api.put(&Self::item_path(id), patch).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&Self::item_path(id)).await
    }
}

// ---------------------------------------------------------------------------
// Clinic collections
// ---------------------------------------------------------------------------

impl Resource for User {
    type Draft = RegisterPayload;
    type Patch = UpdateUserPayload;

    const COLLECTION: &'static str = USERS_COLLECTION;
    const CREATE_PATH: &'static str = REGISTER_PATH;
    const PAGE_SIZE: usize = USERS_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.full_name, needle_lower)
            || case_insensitive_contains(&self.email, needle_lower)
    }
}

impl Resource for Medicine {
    type Draft = MedicinePayload;
    type Patch = MedicinePayload;

    const COLLECTION: &'static str = MEDICINE_COLLECTION;
    const PAGE_SIZE: usize = MEDICATIONS_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.name, needle_lower)
            || case_insensitive_contains(self.category.as_str(), needle_lower)
    }
}

impl Resource for Sale {
    type Draft = SalePayload;
    type Patch = SalePayload;

    const COLLECTION: &'static str = SALES_COLLECTION;
    const PAGE_SIZE: usize = SALES_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.medicine.to_string().contains(needle_lower)
            || self
                .medicine_name
                .as_deref()
                .is_some_and(|name| case_insensitive_contains(name, needle_lower))
    }
}

impl Resource for Animal {
    type Draft = AnimalPayload;
    type Patch = AnimalPayload;

    const COLLECTION: &'static str = PATIENTS_COLLECTION;
    const PAGE_SIZE: usize = PATIENTS_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.animal_id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.owner_name, needle_lower)
            || case_insensitive_contains(&self.owner_contact, needle_lower)
            || case_insensitive_contains(&self.species, needle_lower)
    }
}

impl Resource for AnimalDiagnosis {
    type Draft = DiagnosisPayload;
    type Patch = DiagnosisPayload;

    const COLLECTION: &'static str = DIAGNOSES_COLLECTION;
    const PAGE_SIZE: usize = DIAGNOSES_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.diagnosis, needle_lower)
            || case_insensitive_contains(&self.prescribed_medicine, needle_lower)
    }
}

impl Resource for Appointment {
    type Draft = AppointmentPayload;
    type Patch = AppointmentPayload;

    const COLLECTION: &'static str = APPOINTMENTS_COLLECTION;
    const PAGE_SIZE: usize = APPOINTMENTS_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.owner_name, needle_lower)
            || case_insensitive_contains(&self.owner_contact, needle_lower)
    }
}

impl Resource for Contact {
    type Draft = ContactPayload;
    type Patch = ContactPayload;

    const COLLECTION: &'static str = CONTACTS_COLLECTION;
    const PAGE_SIZE: usize = SUPPORT_PAGE_SIZE;

    fn id(&self) -> i64 {
        self.contact_id
    }

    fn matches(&self, needle_lower: &str) -> bool {
        case_insensitive_contains(&self.subject, needle_lower)
            || case_insensitive_contains(&self.email, needle_lower)
            || case_insensitive_contains(&self.message, needle_lower)
    }
}

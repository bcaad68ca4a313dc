pub mod api;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod list_view;
pub mod models;
pub mod pagination;
pub mod portal;
pub mod purchase;
pub mod resource;
pub mod session;
pub mod utils;

// Re-export types at crate root for convenient importing
pub use crate::api::ApiClient;
pub use crate::config::Config;
pub use crate::error::{
    ApiError, ConfigError, PortalError, PurchaseError, SessionError, ValidationError,
};
pub use crate::list_view::{ListView, PagePolicy};
pub use crate::purchase::{PurchaseLedger, PurchaseMode, PurchaseWizard};
pub use crate::resource::{Resource, ResourceAdapter, RestCollection};
pub use crate::session::{FileSessionStore, MemorySessionStore, Role, SessionContext};

/// Shared handles every screen is built from.
#[derive(Clone)]
pub struct ConsoleState {
    pub config: Config,
    pub api: ApiClient,
}

impl ConsoleState {
    pub fn new(config: Config) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());
        Self { config, api }
    }

    pub fn collection<R: Resource>(&self) -> RestCollection<R> {
        RestCollection::new(self.api.clone())
    }

    /// A management screen over `R`, paged with the collection's page size.
    pub fn list_view<R: Resource>(&self) -> ListView<R, RestCollection<R>> {
        ListView::new(self.collection()).with_policy(self.config.page_policy)
    }

    pub fn purchase_wizard(&self) -> PurchaseWizard {
        PurchaseWizard::new(self.config.purchase_mode)
    }

    pub async fn open_ledger(&self) -> Result<PurchaseLedger, PurchaseError> {
        PurchaseLedger::open(self.config.purchase_ledger_file()).await
    }

    pub async fn session(&self) -> Result<SessionContext<FileSessionStore>, SessionError> {
        SessionContext::init(
            self.api.clone(),
            FileSessionStore::new(self.config.session_file()),
        )
        .await
    }
}

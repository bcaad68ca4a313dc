use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::*;
use crate::error::{ApiError, PurchaseError, ValidationError};
use crate::list_view::ListView;
use crate::models::{Medicine, Sale, SalePayload};
use crate::resource::ResourceAdapter;
use crate::utils::{now_rfc3339, validate_min_length};

/// How a confirmed purchase is carried out against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchaseMode {
    /// Record an intent before touching stock, so a sale that fails after the
    /// stock update can be reconciled later.
    #[default]
    Saga,
    /// Stock update then sale creation with nothing recorded. A failed sale
    /// leaves the stock decremented.
    Sequential,
}

impl FromStr for PurchaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saga" => Ok(PurchaseMode::Saga),
            "sequential" => Ok(PurchaseMode::Sequential),
            other => Err(format!("Invalid purchase mode '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Closed,
    /// Phone number.
    Step1,
    /// Card number, expiry and CVV.
    Step2,
    /// Review and confirm.
    Step3,
    Submitting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub phone_number: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl PaymentForm {
    fn validate_contact(&self) -> Result<(), ValidationError> {
        validate_min_length(&self.phone_number, "Phone number", MIN_PHONE_LENGTH)
    }

    fn validate_card(&self) -> Result<(), ValidationError> {
        validate_min_length(&self.card_number, "Card number", MIN_CARD_NUMBER_LENGTH)?;
        validate_min_length(&self.expiry_date, "Expiry date", MIN_CARD_EXPIRY_LENGTH)?;
        validate_min_length(&self.cvv, "CVV", MIN_CVV_LENGTH)
    }
}

/// The three-step mock checkout for a single unit of one medicine.
#[derive(Debug, Clone)]
pub struct PurchaseWizard {
    mode: PurchaseMode,
    step: WizardStep,
    medicine: Option<Medicine>,
    form: PaymentForm,
    last_error: Option<String>,
}

impl PurchaseWizard {
    pub fn new(mode: PurchaseMode) -> Self {
        Self {
            mode,
            step: WizardStep::Closed,
            medicine: None,
            form: PaymentForm::default(),
            last_error: None,
        }
    }

    pub fn mode(&self) -> PurchaseMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn medicine(&self) -> Option<&Medicine> {
        self.medicine.as_ref()
    }

    pub fn form(&self) -> &PaymentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PaymentForm {
        &mut self.form
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a fresh checkout. Whatever was entered for a previous one is dropped.
    pub fn open(&mut self, medicine: Medicine) -> Result<(), PurchaseError> {
        if medicine.quantity == 0 {
            return Err(PurchaseError::OutOfStock(medicine.name));
        }
        self.medicine = Some(medicine);
        self.form = PaymentForm::default();
        self.last_error = None;
        self.step = WizardStep::Step1;
        Ok(())
    }

    /// Validates the current step and advances. On failure the step is kept.
    pub fn next(&mut self) -> Result<WizardStep, PurchaseError> {
        self.step = match self.step {
            WizardStep::Step1 => {
                self.form.validate_contact()?;
                WizardStep::Step2
            }
            WizardStep::Step2 => {
                self.form.validate_card()?;
                WizardStep::Step3
            }
            WizardStep::Step3 | WizardStep::Submitting => return Err(PurchaseError::NotReviewing),
            WizardStep::Closed => return Err(PurchaseError::NotOpen),
        };
        Ok(self.step)
    }

    /// One step back; entered data stays.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Step2 => WizardStep::Step1,
            WizardStep::Step3 => WizardStep::Step2,
            other => other,
        };
        self.step
    }

    pub fn cancel(&mut self) {
        self.step = WizardStep::Closed;
        self.medicine = None;
        self.form = PaymentForm::default();
        self.last_error = None;
    }

    /// Review text for the card, e.g. `**** **** **** 4242`.
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.form.card_number.chars().collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** **** **** {}", tail)
    }

    pub fn total_price(&self) -> Option<f64> {
        self.medicine.as_ref().map(|m| m.price)
    }

    /// Decrements the medicine's stock by one, then records the sale.
    ///
    /// In saga mode every step is written to `ledger` first; in sequential mode
    /// the ledger is not touched. On failure the wizard returns to the review
    /// step with the error recorded; on success it closes.
    pub async fn confirm<M, S>(
        &mut self,
        medicines: &M,
        sales: &S,
        ledger: &mut PurchaseLedger,
    ) -> Result<Sale, PurchaseError>
    where
        M: ResourceAdapter<Medicine>,
        S: ResourceAdapter<Sale>,
    {
        match self.step {
            WizardStep::Step3 => {}
            WizardStep::Closed => return Err(PurchaseError::NotOpen),
            _ => return Err(PurchaseError::NotReviewing),
        }
        let medicine = self.medicine.clone().ok_or(PurchaseError::NotOpen)?;
        if medicine.quantity == 0 {
            return Err(PurchaseError::OutOfStock(medicine.name));
        }

        self.step = WizardStep::Submitting;
        self.last_error = None;

        let result = match self.mode {
            PurchaseMode::Sequential => purchase_sequential(&medicine, medicines, sales).await,
            PurchaseMode::Saga => purchase_saga(&medicine, medicines, sales, ledger).await,
        };

        match result {
            Ok(sale) => {
                tracing::info!(medicine_id = medicine.id, sale_id = sale.id, "purchase completed");
                self.cancel();
                Ok(sale)
            }
            Err(e) => {
                tracing::warn!(medicine_id = medicine.id, error = %e, "purchase failed");
                self.last_error = Some(e.to_string());
                self.step = WizardStep::Step3;
                Err(e)
            }
        }
    }
}

fn sale_payload(medicine: &Medicine, sale_date: String) -> SalePayload {
    SalePayload {
        medicine: medicine.id,
        quantity_sold: 1,
        total_price: medicine.price,
        sale_date,
    }
}

async fn decrement_stock<M: ResourceAdapter<Medicine>>(
    medicine: &Medicine,
    medicines: &M,
) -> Result<Medicine, ApiError> {
    let mut payload = medicine.to_payload();
    payload.quantity = medicine.quantity.saturating_sub(1);
    medicines.update(medicine.id, &payload).await
}

async fn purchase_sequential<M, S>(
    medicine: &Medicine,
    medicines: &M,
    sales: &S,
) -> Result<Sale, PurchaseError>
where
    M: ResourceAdapter<Medicine>,
    S: ResourceAdapter<Sale>,
{
    decrement_stock(medicine, medicines)
        .await
        .map_err(PurchaseError::StockUpdate)?;

    sales
        .create(&sale_payload(medicine, now_rfc3339()))
        .await
        .map_err(PurchaseError::SaleCreate)
}

async fn purchase_saga<M, S>(
    medicine: &Medicine,
    medicines: &M,
    sales: &S,
    ledger: &mut PurchaseLedger,
) -> Result<Sale, PurchaseError>
where
    M: ResourceAdapter<Medicine>,
    S: ResourceAdapter<Sale>,
{
    let intent_id = ledger.begin(medicine).await?;

    if let Err(e) = decrement_stock(medicine, medicines).await {
        if outcome_unknown(&e) {
            // The PUT may have been applied; reconcile checks the stock later.
            ledger
                .transition(intent_id, PurchaseStatus::Initiated, Some(e.to_string()))
                .await?;
        } else {
            // Rejected by the backend, so nothing changed remotely.
            ledger.discard(intent_id).await?;
        }
        return Err(PurchaseError::StockUpdate(e));
    }
    ledger
        .transition(intent_id, PurchaseStatus::StockReserved, None)
        .await?;

    let payload = ledger.sale_payload(intent_id)?;
    match sales.create(&payload).await {
        Ok(sale) => {
            ledger.complete(intent_id, sale.id).await?;
            Ok(sale)
        }
        Err(e) => {
            ledger
                .transition(intent_id, PurchaseStatus::PartialFailure, Some(e.to_string()))
                .await?;
            Err(PurchaseError::PartialFailure {
                intent: intent_id.to_string(),
                source: e,
            })
        }
    }
}

/// A transport failure gives no answer about whether the request was applied.
fn outcome_unknown(e: &ApiError) -> bool {
    matches!(e, ApiError::Transport(_))
}

/// Dismisses a finished checkout after `close_delay`, then refreshes the
/// medication list so the new stock level shows.
pub async fn complete_purchase<A>(
    medications: &mut ListView<Medicine, A>,
    close_delay: Duration,
) -> Result<(), ApiError>
where
    A: ResourceAdapter<Medicine>,
{
    if !close_delay.is_zero() {
        tokio::time::sleep(close_delay).await;
    }
    medications.load().await
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Initiated,
    StockReserved,
    Completed,
    PartialFailure,
    Compensated,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Initiated => PURCHASE_STATUS_INITIATED,
            PurchaseStatus::StockReserved => PURCHASE_STATUS_STOCK_RESERVED,
            PurchaseStatus::Completed => PURCHASE_STATUS_COMPLETED,
            PurchaseStatus::PartialFailure => PURCHASE_STATUS_PARTIAL_FAILURE,
            PurchaseStatus::Compensated => PURCHASE_STATUS_COMPENSATED,
        }
    }

    /// Stock was, or may have been, taken but no sale is known to exist.
    pub fn needs_reconcile(&self) -> bool {
        matches!(
            self,
            PurchaseStatus::Initiated
                | PurchaseStatus::StockReserved
                | PurchaseStatus::PartialFailure
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PurchaseIntent {
    pub id: Uuid,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub previous_quantity: u32,
    pub unit_price: f64,
    pub sale_date: String,
    pub status: PurchaseStatus,
    pub sale_id: Option<i64>,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recorded purchase intents, optionally persisted as JSON so partial failures
/// survive a restart.
#[derive(Debug, Default)]
pub struct PurchaseLedger {
    path: Option<PathBuf>,
    intents: Vec<PurchaseIntent>,
}

impl PurchaseLedger {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the ledger at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PurchaseError> {
        let path = path.as_ref().to_path_buf();
        let intents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ledger_error("failed to parse ledger", e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ledger_error("failed to read ledger", e)),
        };
        Ok(Self {
            path: Some(path),
            intents,
        })
    }

    pub fn intents(&self) -> &[PurchaseIntent] {
        &self.intents
    }

    pub fn get(&self, id: Uuid) -> Option<&PurchaseIntent> {
        self.intents.iter().find(|intent| intent.id == id)
    }

    pub fn pending(&self) -> Vec<&PurchaseIntent> {
        self.intents
            .iter()
            .filter(|intent| intent.status.needs_reconcile())
            .collect()
    }

    async fn begin(&mut self, medicine: &Medicine) -> Result<Uuid, PurchaseError> {
        let now = now_rfc3339();
        let intent = PurchaseIntent {
            id: Uuid::new_v4(),
            medicine_id: medicine.id,
            medicine_name: medicine.name.clone(),
            previous_quantity: medicine.quantity,
            unit_price: medicine.price,
            sale_date: now.clone(),
            status: PurchaseStatus::Initiated,
            sale_id: None,
            attempts: 1,
            last_error: None,
            created_at: now.clone(),
            updated_at: now,
        };
        let id = intent.id;
        self.intents.push(intent);
        self.save().await?;
        Ok(id)
    }

    async fn discard(&mut self, id: Uuid) -> Result<(), PurchaseError> {
        self.intents.retain(|intent| intent.id != id);
        self.save().await
    }

    async fn transition(
        &mut self,
        id: Uuid,
        status: PurchaseStatus,
        error: Option<String>,
    ) -> Result<(), PurchaseError> {
        let intent = self.intent_mut(id)?;
        intent.status = status;
        intent.last_error = error;
        intent.updated_at = now_rfc3339();
        self.save().await
    }

    async fn complete(&mut self, id: Uuid, sale_id: i64) -> Result<(), PurchaseError> {
        let intent = self.intent_mut(id)?;
        intent.sale_id = Some(sale_id);
        self.transition(id, PurchaseStatus::Completed, None).await
    }

    /// Records a failed attempt, keeping `status` so the intent stays pending.
    async fn fail_attempt(
        &mut self,
        id: Uuid,
        status: PurchaseStatus,
        error: String,
    ) -> Result<(), PurchaseError> {
        self.intent_mut(id)?.attempts += 1;
        self.transition(id, status, Some(error)).await
    }

    fn sale_payload(&self, id: Uuid) -> Result<SalePayload, PurchaseError> {
        let intent = self
            .get(id)
            .ok_or_else(|| PurchaseError::Ledger(format!("unknown purchase intent {}", id)))?;
        Ok(SalePayload {
            medicine: intent.medicine_id,
            quantity_sold: 1,
            total_price: intent.unit_price,
            sale_date: intent.sale_date.clone(),
        })
    }

    fn intent_mut(&mut self, id: Uuid) -> Result<&mut PurchaseIntent, PurchaseError> {
        self.intents
            .iter_mut()
            .find(|intent| intent.id == id)
            .ok_or_else(|| PurchaseError::Ledger(format!("unknown purchase intent {}", id)))
    }

    async fn save(&self) -> Result<(), PurchaseError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ledger_error("failed to create ledger directory", e))?;
        }
        let body = serde_json::to_vec_pretty(&self.intents)
            .map_err(|e| ledger_error("failed to serialize ledger", e))?;
        tokio::fs::write(path, body)
            .await
            .map_err(|e| ledger_error("failed to write ledger", e))
    }
}

fn ledger_error(context: &str, e: impl std::fmt::Display) -> PurchaseError {
    PurchaseError::Ledger(format!("{}: {}", context, e))
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Post the missing sale again, with the original sale date.
    RetrySale,
    /// Give the unit back to stock and drop the sale.
    Restock,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReconcileReport {
    pub completed: Vec<Uuid>,
    pub compensated: Vec<Uuid>,
    /// Initiated intents whose stock turned out untouched; dropped from the ledger.
    pub discarded: Vec<Uuid>,
    pub still_failing: Vec<Uuid>,
}

/// Resolves every intent whose stock was taken without a recorded sale.
///
/// An intent still `initiated` (the process stopped, or the stock update got
/// no answer) is first checked against the medicine's current stock: below
/// the quantity seen at purchase time means the unit was taken, otherwise the
/// intent is discarded. A sale made elsewhere in between also lowers the
/// stock, so that check can over-report.
///
/// Intents that fail again stay pending with their attempt count bumped.
pub async fn reconcile<M, S>(
    ledger: &mut PurchaseLedger,
    medicines: &M,
    sales: &S,
    action: ReconcileAction,
) -> Result<ReconcileReport, PurchaseError>
where
    M: ResourceAdapter<Medicine>,
    S: ResourceAdapter<Sale>,
{
    let pending: Vec<Uuid> = ledger.pending().iter().map(|intent| intent.id).collect();
    let mut report = ReconcileReport::default();

    for id in pending {
        let (status, medicine_id, previous_quantity) = {
            let intent = ledger.intent_mut(id)?;
            (intent.status, intent.medicine_id, intent.previous_quantity)
        };

        if status == PurchaseStatus::Initiated {
            match stock_taken(medicine_id, previous_quantity, medicines).await {
                Ok(true) => {
                    ledger
                        .transition(id, PurchaseStatus::StockReserved, None)
                        .await?;
                }
                Ok(false) => {
                    ledger.discard(id).await?;
                    report.discarded.push(id);
                    continue;
                }
                Err(e) => {
                    tracing::warn!(intent = %id, error = %e, "could not check stock for purchase");
                    ledger
                        .fail_attempt(id, PurchaseStatus::Initiated, e.to_string())
                        .await?;
                    report.still_failing.push(id);
                    continue;
                }
            }
        }

        let outcome = match action {
            ReconcileAction::RetrySale => {
                let payload = ledger.sale_payload(id)?;
                sales.create(&payload).await.map(Some)
            }
            ReconcileAction::Restock => restock(medicine_id, medicines).await.map(|_| None),
        };

        match outcome {
            Ok(Some(sale)) => {
                ledger.complete(id, sale.id).await?;
                report.completed.push(id);
            }
            Ok(None) => {
                ledger
                    .transition(id, PurchaseStatus::Compensated, None)
                    .await?;
                report.compensated.push(id);
            }
            Err(e) => {
                tracing::warn!(intent = %id, error = %e, "purchase reconciliation failed");
                ledger
                    .fail_attempt(id, PurchaseStatus::PartialFailure, e.to_string())
                    .await?;
                report.still_failing.push(id);
            }
        }
    }

    tracing::info!(
        completed = report.completed.len(),
        compensated = report.compensated.len(),
        discarded = report.discarded.len(),
        still_failing = report.still_failing.len(),
        "purchase reconciliation finished"
    );
    Ok(report)
}

async fn stock_taken<M: ResourceAdapter<Medicine>>(
    medicine_id: i64,
    previous_quantity: u32,
    medicines: &M,
) -> Result<bool, ApiError> {
    let current = medicines.fetch_one(medicine_id).await?;
    Ok(current.quantity < previous_quantity)
}

/// Adds one unit back on top of the current stock, not the quantity seen at
/// purchase time, so sales made since are not overwritten.
async fn restock<M: ResourceAdapter<Medicine>>(
    medicine_id: i64,
    medicines: &M,
) -> Result<Medicine, ApiError> {
    let current = medicines.fetch_one(medicine_id).await?;
    let mut payload = current.to_payload();
    payload.quantity = current.quantity.saturating_add(1);
    medicines.update(medicine_id, &payload).await
}

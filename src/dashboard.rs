use serde_json::Value;

use crate::api::ApiClient;
use crate::constants::*;
use crate::error::ApiError;
use crate::models::{DashboardSummary, Medicine};

/// Reads one aggregate such as `{"total_sales": 12}`. Decimal aggregates may
/// come back as strings. The backend reports empty sums as 0, so a missing or
/// null field is a decode error.
pub async fn fetch_aggregate(api: &ApiClient, path: &str, key: &str) -> Result<f64, ApiError> {
    let body: Value = api.get(path).await?;
    let value = match body.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Null) | None => {
            return Err(decode_error(format!("field '{}' is missing", key)));
        }
        _ => None,
    };
    value.ok_or_else(|| decode_error(format!("field '{}' is not a number", key)))
}

fn decode_error(msg: String) -> ApiError {
    ApiError::Decode(serde::de::Error::custom(msg))
}

pub async fn fetch_low_stock(api: &ApiClient) -> Result<Vec<Medicine>, ApiError> {
    api.get(LOW_STOCK_PATH).await
}

/// Every counter is fetched concurrently. A counter that fails is logged and
/// reported as zero, so one broken endpoint does not blank the dashboard.
pub async fn fetch_summary(api: &ApiClient) -> DashboardSummary {
    let (users, medicines, sales, appointments, contacts, patients, revenue, stock_value, low) = tokio::join!(
        count_or_zero(api, USERS_COUNT_PATH, "total_users"),
        count_or_zero(api, MEDICINE_COUNT_PATH, "total_medicines"),
        count_or_zero(api, SALES_COUNT_PATH, "total_sales"),
        count_or_zero(api, APPOINTMENTS_COUNT_PATH, "total_appointments"),
        count_or_zero(api, CONTACTS_COUNT_PATH, "total_contacts"),
        count_or_zero(api, PATIENTS_COUNT_PATH, "total_patients"),
        amount_or_zero(api, TOTAL_REVENUE_PATH, "total_revenue"),
        amount_or_zero(api, TOTAL_STOCK_VALUE_PATH, "total_stock_value"),
        fetch_low_stock(api),
    );

    let low_stock = low.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch low stock medicines");
        Vec::new()
    });

    DashboardSummary {
        total_users: users,
        total_medicines: medicines,
        total_sales: sales,
        total_appointments: appointments,
        total_contacts: contacts,
        total_patients: patients,
        total_revenue: revenue,
        total_stock_value: stock_value,
        low_stock,
    }
}

async fn amount_or_zero(api: &ApiClient, path: &str, key: &str) -> f64 {
    fetch_aggregate(api, path, key).await.unwrap_or_else(|e| {
        tracing::warn!(path, error = %e, "failed to fetch aggregate");
        0.0
    })
}

async fn count_or_zero(api: &ApiClient, path: &str, key: &str) -> u64 {
    let amount = amount_or_zero(api, path, key).await;
    if amount.is_finite() && amount > 0.0 {
        amount as u64
    } else {
        0
    }
}

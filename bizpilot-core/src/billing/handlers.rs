use axum::extract::State;
use axum::response::Json;
use tracing::info;

use crate::auth::CurrentTenant;
use crate::billing::{numbering, store};
use crate::error::ApiResult;
use crate::models::{InvoiceResponse, SaveInvoiceRequest};
use crate::AppState;

/// `GET /invoices` - lists the tenant's invoices, newest first, with
/// customer and items resolved.
pub async fn list_invoices(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
) -> ApiResult<Json<Vec<InvoiceResponse>>> {
    let invoices = store::list_invoices(&state.db, &tenant_id).await?;
    Ok(Json(invoices))
}

/// `POST /invoices` - creates or replaces an invoice.
///
/// The same route serves both flows: an unknown id inserts, a known id
/// replaces the header and item list.
pub async fn save_invoice(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Json(req): Json<SaveInvoiceRequest>,
) -> ApiResult<Json<InvoiceResponse>> {
    info!("Saving invoice {} for tenant {}", req.id, tenant_id);
    let invoice = store::save_invoice(&state.db, &tenant_id, req).await?;
    Ok(Json(invoice))
}

/// `GET /invoices/next-id` - assigns the next invoice id for the tenant.
///
/// Falls back to sequence 001 when the store cannot be listed, so invoice
/// composition never blocks on numbering.
pub async fn next_invoice_id(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
) -> Json<serde_json::Value> {
    let id = numbering::assign_invoice_id(&state.db, &tenant_id).await;
    Json(serde_json::json!({ "id": id }))
}

//! Invoice persistence.
//!
//! All operations are scoped by tenant; no query can see another tenant's
//! rows. Saving is upsert-shaped: an unknown id inserts, a known id
//! replaces the header fields and wholesale-replaces the item list, so
//! editing an invoice is behaviorally identical to replacing it.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Customer, Invoice, InvoiceItem, InvoiceResponse, InvoiceStatus, SaveInvoiceRequest,
};

/// Lists a tenant's invoices, newest created first, with the customer and
/// ordered item list resolved for each. Read-only and safe to call
/// concurrently.
pub async fn list_invoices(pool: &PgPool, tenant_id: &str) -> ApiResult<Vec<InvoiceResponse>> {
    let headers: Vec<Invoice> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, customer_id, issue_date, due_date, status, notes,
               created_at, updated_at
        FROM invoices
        WHERE tenant_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let invoice_ids: Vec<String> = headers.iter().map(|h| h.id.clone()).collect();
    let customer_ids: Vec<Uuid> = headers.iter().map(|h| h.customer_id).collect();

    let items: Vec<InvoiceItem> = sqlx::query_as(
        r#"
        SELECT id, invoice_id, description, quantity, rate
        FROM invoice_items
        WHERE tenant_id = $1 AND invoice_id = ANY($2)
        ORDER BY invoice_id, position
        "#,
    )
    .bind(tenant_id)
    .bind(&invoice_ids)
    .fetch_all(pool)
    .await?;

    let customers: Vec<Customer> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, name, email, address, created_at
        FROM customers
        WHERE tenant_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(tenant_id)
    .bind(&customer_ids)
    .fetch_all(pool)
    .await?;

    let mut items_by_invoice: HashMap<String, Vec<InvoiceItem>> = HashMap::new();
    for item in items {
        items_by_invoice
            .entry(item.invoice_id.clone())
            .or_default()
            .push(item);
    }

    let customers_by_id: HashMap<Uuid, Customer> =
        customers.into_iter().map(|c| (c.id, c)).collect();

    headers
        .into_iter()
        .map(|header| {
            let customer = customers_by_id
                .get(&header.customer_id)
                .cloned()
                .ok_or_else(|| {
                    ApiError::Internal(anyhow::anyhow!(
                        "invoice {} references missing customer {}",
                        header.id,
                        header.customer_id
                    ))
                })?;
            let items = items_by_invoice.remove(&header.id).unwrap_or_default();
            Ok(InvoiceResponse::from_parts(header, customer, items))
        })
        .collect()
}

/// Saves an invoice for a tenant, inserting when the id is new and
/// replacing header and items otherwise.
///
/// Validation runs before anything is written; header and items are
/// persisted in a single transaction so a store failure can never leave a
/// partial record. Two concurrent creations racing on the same id leave
/// exactly one winner; the loser gets [`ApiError::DuplicateInvoiceId`].
pub async fn save_invoice(
    pool: &PgPool,
    tenant_id: &str,
    req: SaveInvoiceRequest,
) -> ApiResult<InvoiceResponse> {
    let customer_id = validate(&req)?;

    // The referenced customer must belong to this tenant.
    let customer_owned: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM customers WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(customer_id)
            .fetch_optional(pool)
            .await?;
    if customer_owned.is_none() {
        return Err(ApiError::Validation(vec!["customerId".to_string()]));
    }

    let mut tx = pool.begin().await?;

    let existing: Option<String> =
        sqlx::query_scalar("SELECT id FROM invoices WHERE tenant_id = $1 AND id = $2 FOR UPDATE")
            .bind(tenant_id)
            .bind(&req.id)
            .fetch_optional(&mut *tx)
            .await?;

    if existing.is_some() {
        info!("Replacing invoice {} for tenant {}", req.id, tenant_id);

        sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $3, issue_date = $4, due_date = $5, status = $6,
                notes = $7, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(&req.id)
        .bind(customer_id)
        .bind(req.issue_date)
        .bind(req.due_date)
        .bind(req.status)
        .bind(&req.notes)
        .execute(&mut *tx)
        .await?;

        // Wholesale replacement: items the caller removed are gone, items
        // it added get fresh ids.
        sqlx::query("DELETE FROM invoice_items WHERE tenant_id = $1 AND invoice_id = $2")
            .bind(tenant_id)
            .bind(&req.id)
            .execute(&mut *tx)
            .await?;
    } else {
        info!("Creating invoice {} for tenant {}", req.id, tenant_id);

        sqlx::query(
            r#"
            INSERT INTO invoices (id, tenant_id, customer_id, issue_date, due_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&req.id)
        .bind(tenant_id)
        .bind(customer_id)
        .bind(req.issue_date)
        .bind(req.due_date)
        .bind(req.status)
        .bind(&req.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if ApiError::is_unique_violation(&e) {
                ApiError::DuplicateInvoiceId(req.id.clone())
            } else {
                ApiError::Store(e)
            }
        })?;
    }

    insert_items(&mut tx, tenant_id, &req).await?;

    tx.commit().await?;

    get_invoice(pool, tenant_id, &req.id).await
}

/// Inserts the request's item list for an invoice, preserving order.
async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: &str,
    req: &SaveInvoiceRequest,
) -> ApiResult<()> {
    for (position, item) in req.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (id, tenant_id, invoice_id, position, description, quantity, rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(&req.id)
        .bind(position as i32)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.rate)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Fetches a single invoice with its customer and items resolved.
pub async fn get_invoice(pool: &PgPool, tenant_id: &str, id: &str) -> ApiResult<InvoiceResponse> {
    let header: Invoice = sqlx::query_as(
        r#"
        SELECT id, tenant_id, customer_id, issue_date, due_date, status, notes,
               created_at, updated_at
        FROM invoices
        WHERE tenant_id = $1 AND id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_one(pool)
    .await?;

    let customer: Customer = sqlx::query_as(
        r#"
        SELECT id, tenant_id, name, email, address, created_at
        FROM customers
        WHERE tenant_id = $1 AND id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(header.customer_id)
    .fetch_one(pool)
    .await?;

    let items: Vec<InvoiceItem> = sqlx::query_as(
        r#"
        SELECT id, invoice_id, description, quantity, rate
        FROM invoice_items
        WHERE tenant_id = $1 AND invoice_id = $2
        ORDER BY position
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(InvoiceResponse::from_parts(header, customer, items))
}

/// Validates a save request before any mutation is attempted, returning
/// the checked customer id.
///
/// The id and customer must be present, and the item list must be
/// non-empty unless the target status is `Draft` - an invoice needs at
/// least one item before it can move out of `Draft`. Quantities and rates
/// must be non-negative. Status itself is never validated: the caller
/// decides the target status, and `Paid`/`Overdue` arriving from other
/// flows are accepted unchanged.
fn validate(req: &SaveInvoiceRequest) -> Result<Uuid, ApiError> {
    let mut invalid = Vec::new();

    if req.id.trim().is_empty() {
        invalid.push("id".to_string());
    }

    if req.customer_id.is_none() {
        invalid.push("customerId".to_string());
    }

    if req.items.is_empty() && req.status != InvoiceStatus::Draft {
        invalid.push("items".to_string());
    }

    for (i, item) in req.items.iter().enumerate() {
        if !(item.quantity >= 0.0) {
            invalid.push(format!("items[{}].quantity", i));
        }
        if !(item.rate >= 0.0) {
            invalid.push(format!("items[{}].rate", i));
        }
    }

    match req.customer_id {
        Some(customer_id) if invalid.is_empty() => Ok(customer_id),
        _ => Err(ApiError::Validation(invalid)),
    }
}

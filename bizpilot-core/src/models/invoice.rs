use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::billing::totals;
use crate::models::customer::Customer;

/// Invoice status enumeration.
///
/// The client decides the target status when saving (`Draft` or `Pending`);
/// `Paid` and `Overdue` arrive through the same save path as external
/// events. The enum is closed, so every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum InvoiceStatus {
    #[sqlx(rename = "Draft")]
    Draft,
    #[sqlx(rename = "Pending")]
    Pending,
    #[sqlx(rename = "Paid")]
    Paid,
    #[sqlx(rename = "Overdue")]
    Overdue,
}

/// Invoice header row.
///
/// This struct maps to the `invoices` table. The id is the human-readable
/// `INV-<year>-<sequence>` string assigned once at creation and never
/// reassigned; re-saving the same id replaces the header and item list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Human-readable invoice identifier (e.g. `INV-2024-004`)
    pub id: String,

    /// Owning tenant
    pub tenant_id: String,

    /// Customer the invoice bills
    pub customer_id: Uuid,

    /// Date the invoice was issued
    pub issue_date: NaiveDate,

    /// Date payment is due
    pub due_date: NaiveDate,

    /// Invoice status
    pub status: InvoiceStatus,

    /// Free-form notes shown on the invoice
    pub notes: Option<String>,

    /// Timestamp when the invoice was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the invoice was last updated
    pub updated_at: DateTime<Utc>,
}

/// One billable row on an invoice.
///
/// The line amount (`quantity * rate`) is never stored; it is always
/// derived by the aggregator so a total can never drift from its items.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Unique identifier for the item
    pub id: Uuid,

    /// Invoice this item belongs to
    pub invoice_id: String,

    /// Description of the billed work or goods
    pub description: String,

    /// Billed quantity (non-negative)
    pub quantity: f64,

    /// Rate per unit (non-negative currency amount)
    pub rate: f64,
}

/// Item payload inside an invoice save request. Items are wholesale
/// replaced on every save, so incoming items carry no ids of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
}

/// Invoice save request, used for both create and update.
///
/// `customerId` is optional at the wire level so an absent customer is
/// reported through validation with the field named, not as a generic
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInvoiceRequest {
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<NewInvoiceItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Invoice response (public representation).
///
/// Carries the resolved customer and item list plus the derived totals.
/// The totals are recomputed from the items on every read and are never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub id: String,
    pub tenant_id: String,
    pub customer: Customer,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceResponse {
    /// Assembles a response from a header row, its resolved customer and
    /// its ordered item list, computing the totals in one place.
    pub fn from_parts(header: Invoice, customer: Customer, items: Vec<InvoiceItem>) -> Self {
        let subtotal = totals::subtotal(&items);
        let tax = totals::tax(&items);
        let total = totals::total(&items);

        InvoiceResponse {
            id: header.id,
            tenant_id: header.tenant_id,
            customer,
            issue_date: header.issue_date,
            due_date: header.due_date,
            status: header.status,
            notes: header.notes,
            items,
            subtotal,
            tax,
            total,
            created_at: header.created_at,
            updated_at: header.updated_at,
        }
    }
}

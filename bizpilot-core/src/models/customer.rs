use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Customer model representing a billable party in the directory.
///
/// This struct maps to the `customers` table. Every customer is scoped to
/// the tenant that created it; the directory never returns another
/// tenant's records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier for the customer
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: String,

    /// Customer's display name
    pub name: String,

    /// Customer's email address
    pub email: Option<String>,

    /// Customer's billing address
    pub address: Option<String>,

    /// Timestamp when the customer was created
    pub created_at: DateTime<Utc>,
}

/// Customer creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Business profile model, one per tenant.
///
/// This struct maps to the `business_profiles` table and holds the
/// tenant's billing identity, used as the invoice issuer at render time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    /// Owning tenant (one profile per tenant)
    pub tenant_id: String,

    /// Registered business name
    pub business_name: String,

    /// Business contact email
    pub email: String,

    /// Registered business address
    pub address: String,

    /// Industry sector (e.g. Services, Manufacturing)
    pub industry: Option<String>,

    /// Legal structure (e.g. Sole Proprietorship)
    pub business_type: Option<String>,

    /// Declared annual turnover
    pub annual_turnover: Option<Decimal>,

    /// Whether the business has employees
    pub has_employees: bool,

    /// Employee headcount, when known
    pub number_of_employees: Option<i32>,

    /// Timestamp when the profile was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Business profile save request.
///
/// Every field is optional at the wire level so the same payload type
/// serves both the strict `/business-profile` route (which rejects a
/// missing name/email/address) and the partial-aware `/profile` route
/// (which leaves absent fields untouched).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBusinessProfileRequest {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub annual_turnover: Option<Decimal>,
    #[serde(default)]
    pub has_employees: Option<bool>,
    #[serde(default)]
    pub number_of_employees: Option<i32>,
}

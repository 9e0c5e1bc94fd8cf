//! Invoice identifier assignment.
//!
//! Identifiers are human-readable, sortable strings of the form
//! `INV-<year>-<sequence>`, unique per tenant, assigned once at creation
//! and never reassigned.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use tracing::warn;

/// Computes the next invoice id from the tenant's existing ids.
///
/// Any id that splits into exactly three hyphen-delimited parts with a
/// numeric final segment participates in the scan; everything else is
/// ignored. The scan is deliberately not filtered by year, so a tenant's
/// numbering keeps climbing across year boundaries instead of resetting
/// each January. The new id is `INV-<year>-<max + 1>`, zero-padded to
/// three digits (sequences past 999 simply widen).
pub fn next_invoice_id(existing_ids: &[String], year: i32) -> String {
    let mut max_sequence: u64 = 0;

    for id in existing_ids {
        let parts: Vec<&str> = id.split('-').collect();
        if parts.len() != 3 {
            continue;
        }
        if let Ok(sequence) = parts[2].parse::<u64>() {
            if sequence > max_sequence {
                max_sequence = sequence;
            }
        }
    }

    format!("INV-{}-{:03}", year, max_sequence + 1)
}

/// Assigns the next invoice id for a tenant in the current year.
///
/// Lists the tenant's existing invoice ids and delegates to
/// [`next_invoice_id`]. If the listing fails the assigner falls back to
/// `INV-<year>-001` rather than erroring, so invoice creation stays
/// available even when numbering continuity cannot be guaranteed.
pub async fn assign_invoice_id(pool: &PgPool, tenant_id: &str) -> String {
    let year = Utc::now().year();

    match sqlx::query_scalar::<_, String>("SELECT id FROM invoices WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    {
        Ok(ids) => next_invoice_id(&ids, year),
        Err(e) => {
            warn!(
                "Failed to list invoices for tenant {} while assigning an id, falling back to sequence 001: {}",
                tenant_id, e
            );
            format!("INV-{}-001", year)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_store_starts_at_one() {
        assert_eq!(next_invoice_id(&[], 2024), "INV-2024-001");
    }

    #[test]
    fn test_next_id_is_max_plus_one_not_count_plus_one() {
        let existing = ids(&["INV-2024-001", "INV-2024-003"]);
        assert_eq!(next_invoice_id(&existing, 2024), "INV-2024-004");
    }

    #[test]
    fn test_sequence_does_not_reset_across_years() {
        let existing = ids(&["INV-2023-007"]);
        assert_eq!(next_invoice_id(&existing, 2024), "INV-2024-008");
    }

    #[test]
    fn test_malformed_ids_are_ignored() {
        let existing = ids(&[
            "INV-2024-002",
            "DRAFT",
            "INV-2024",
            "INV-2024-01-backup",
            "INV-2024-abc",
        ]);
        assert_eq!(next_invoice_id(&existing, 2024), "INV-2024-003");
    }

    #[test]
    fn test_sequences_past_three_digits_widen() {
        let existing = ids(&["INV-2024-999"]);
        assert_eq!(next_invoice_id(&existing, 2024), "INV-2024-1000");
    }

    #[test]
    fn test_padding_below_one_hundred() {
        let existing = ids(&["INV-2024-041"]);
        assert_eq!(next_invoice_id(&existing, 2024), "INV-2024-042");
    }

    /// When the store cannot be listed, assignment still succeeds with
    /// sequence 001 instead of erroring.
    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_sequence_one() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(1))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .expect("lazy pool");

        let id = assign_invoice_id(&pool, "tenant-offline").await;
        assert_eq!(id, format!("INV-{}-001", Utc::now().year()));
    }
}

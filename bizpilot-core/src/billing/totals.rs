//! Derived billing totals.
//!
//! Pure, stateless computation from an invoice's item list to its monetary
//! value. Totals are never persisted; every display site (list view, PDF
//! preview, reminder drafting) goes through these functions so the same
//! invoice can never show two different amounts. Formatting (currency
//! symbol, grouping, 2-decimal rounding) is a presentation concern layered
//! on top and never feeds back into stored values.

use crate::models::InvoiceItem;

/// Single fixed tax rate applied to every invoice (18% GST).
pub const TAX_RATE: f64 = 0.18;

/// Amount of one line item. No rounding at the line level.
pub fn line_amount(item: &InvoiceItem) -> f64 {
    item.quantity * item.rate
}

/// Sum of all line amounts. An empty item list yields zero; this happens
/// transiently while a new invoice is being composed.
pub fn subtotal(items: &[InvoiceItem]) -> f64 {
    items.iter().map(line_amount).sum()
}

/// Tax owed on the subtotal.
pub fn tax(items: &[InvoiceItem]) -> f64 {
    subtotal(items) * TAX_RATE
}

/// Subtotal plus tax.
pub fn total(items: &[InvoiceItem]) -> f64 {
    subtotal(items) + tax(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(description: &str, quantity: f64, rate: f64) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id: "INV-2024-001".to_string(),
            description: description.to_string(),
            quantity,
            rate,
        }
    }

    #[test]
    fn test_empty_item_list_yields_zeros() {
        let items: Vec<InvoiceItem> = Vec::new();
        assert_eq!(subtotal(&items), 0.0);
        assert_eq!(tax(&items), 0.0);
        assert_eq!(total(&items), 0.0);
    }

    #[test]
    fn test_web_dev_scenario() {
        let items = vec![item("Web Dev", 40.0, 500.0)];
        assert_eq!(subtotal(&items), 20_000.0);
        assert_eq!(tax(&items), 3_600.0);
        assert_eq!(total(&items), 23_600.0);
    }

    #[test]
    fn test_total_is_subtotal_times_one_point_one_eight() {
        let fixtures = vec![
            vec![item("Consulting", 12.5, 1_800.0)],
            vec![item("Design", 3.0, 7_499.99), item("Hosting", 1.0, 1_200.0)],
            vec![
                item("Support", 0.25, 4_000.0),
                item("Licenses", 17.0, 349.5),
                item("Travel", 2.0, 0.0),
            ],
        ];

        for items in fixtures {
            let expected = subtotal(&items) * 1.18;
            assert!((total(&items) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_amount_is_quantity_times_rate() {
        let it = item("Audit", 7.0, 950.25);
        assert!((line_amount(&it) - 6_651.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_quantity_lines_contribute_nothing() {
        let items = vec![item("Retainer", 0.0, 5_000.0), item("Hours", 10.0, 100.0)];
        assert!((subtotal(&items) - 1_000.0).abs() < 1e-9);
    }
}

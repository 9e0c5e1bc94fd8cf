pub mod handlers;
pub mod numbering;
pub mod store;
pub mod totals;


pub use numbering::{assign_invoice_id, next_invoice_id};
pub use store::{list_invoices, save_invoice};

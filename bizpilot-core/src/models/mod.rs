pub mod business_profile;
pub mod customer;
pub mod invoice;

pub use business_profile::{BusinessProfile, SaveBusinessProfileRequest};
pub use customer::{CreateCustomer, Customer};
pub use invoice::{Invoice, InvoiceItem, InvoiceResponse, InvoiceStatus, NewInvoiceItem, SaveInvoiceRequest};

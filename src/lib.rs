pub mod api;
pub mod core;
pub mod generator;
pub mod models;
pub mod numbering;
pub mod pdf;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{InvoiceError, InvoiceResult, Margin, PdfOptions};
pub use crate::generator::{GeneratedInvoice, InvoiceGenerator};
pub use crate::models::{InvoiceDetails, InvoicePayload, LineItem};
pub use crate::numbering::{CounterStore, FileCounterStore, MemoryCounterStore, SequenceCounter};
pub use crate::pdf::{HtmlToPdf, WkhtmltopdfConverter};
pub use crate::templates::{LogoUpload, TemplateEngine};

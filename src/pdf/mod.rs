pub mod converter;

pub use converter::{HtmlToPdf, WkhtmltopdfConverter};

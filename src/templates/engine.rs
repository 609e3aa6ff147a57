use minijinja::{context, AutoEscape, Environment, Value};
use std::collections::HashMap;

use crate::core::error::InvoiceResult;
use crate::models::{InvoicePayload, LineItem};

use super::helpers;

const INVOICE_TEMPLATE: &str = include_str!("invoice.html.j2");

/// Renders invoice payloads into self-contained HTML documents.
///
/// Everything interpolated into the template is HTML-escaped; the only raw
/// markup comes from the `multiline` filter, which escapes each address
/// segment itself before joining with `<br/>`.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> InvoiceResult<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_filter("money", helpers::money_filter);
        env.add_filter("multiline", helpers::multiline_filter);

        env.add_template("invoice", INVOICE_TEMPLATE)?;

        Ok(TemplateEngine { env })
    }

    /// Pure merge of payload + logo data URI into the invoice document.
    pub fn render_invoice(
        &self,
        payload: &InvoicePayload,
        logo_data_uri: &str,
    ) -> InvoiceResult<String> {
        let template = self.env.get_template("invoice")?;

        // Serializing a None invoice number would render as "none"
        let mut details = payload.details.clone();
        if details.invoice_number.is_none() {
            details.invoice_number = Some(String::new());
        }

        let rendered = template.render(context! {
            details => Value::from_serializable(&details),
            items => self.process_items(&payload.line_items),
            total => payload.total(),
            logo => logo_data_uri,
        })?;

        Ok(rendered)
    }

    /// Precomputes per-row amounts so the template stays declarative.
    fn process_items(&self, items: &[LineItem]) -> Vec<HashMap<String, Value>> {
        items
            .iter()
            .map(|item| {
                let mut processed = HashMap::new();
                processed.insert(
                    "description".to_string(),
                    Value::from(item.description.clone()),
                );
                processed.insert("quantity".to_string(), number_value(item.quantity));
                processed.insert("price".to_string(), Value::from(item.price));
                processed.insert("amount".to_string(), Value::from(item.amount()));
                processed
            })
            .collect()
    }
}

/// Whole quantities display as integers ("2", not "2.0").
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceDetails, InvoicePayload, LineItem};

    fn payload_with_items(items: Vec<LineItem>) -> InvoicePayload {
        let mut details = InvoiceDetails::default();
        details.currency = "INR".to_string();
        details.invoice_number = Some("INV-1".to_string());
        details.invoice_date = "01/01/2026".to_string();
        details.billing_name = "A".to_string();
        details.billing_phone = "1".to_string();
        details.billing_address = "X".to_string();
        InvoicePayload { details, line_items: items }
    }

    #[test]
    fn renders_row_and_total_for_inr_invoice() {
        let engine = TemplateEngine::new().unwrap();
        let payload = payload_with_items(vec![LineItem {
            description: "Soap".into(),
            quantity: 2.0,
            price: 25.5,
        }]);

        let html = engine.render_invoice(&payload, "").unwrap();

        assert!(html.contains("<td>Soap</td>"));
        assert!(html.contains("<td>2</td>"));
        assert!(html.contains("₹25.50"));
        assert!(html.contains("<b>₹51.00</b>"));
        assert!(html.contains("<strong>Total:</strong> <b>₹51.00</b>"));
        assert!(html.contains("INV-1"));
    }

    #[test]
    fn zero_items_render_valid_document_with_zero_total() {
        let engine = TemplateEngine::new().unwrap();
        let payload = payload_with_items(vec![]);

        let html = engine.render_invoice(&payload, "").unwrap();

        assert!(html.contains("₹0.00"));
        // header table + billing table + thead rows only, no item rows
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn fractional_quantities_keep_their_decimals() {
        let engine = TemplateEngine::new().unwrap();
        let payload = payload_with_items(vec![LineItem {
            description: "Rope".into(),
            quantity: 2.5,
            price: 10.0,
        }]);

        let html = engine.render_invoice(&payload, "").unwrap();
        assert!(html.contains("<td>2.5</td>"));
        assert!(html.contains("₹25.00"));
    }

    #[test]
    fn user_supplied_markup_is_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let mut payload = payload_with_items(vec![LineItem {
            description: "<script>alert(1)</script>".into(),
            quantity: 1.0,
            price: 1.0,
        }]);
        payload.details.billing_name = "<img src=x>".to_string();

        let html = engine.render_invoice(&payload, "").unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<img src=x>"));
    }

    #[test]
    fn billing_address_splits_on_slash_without_injection() {
        let engine = TemplateEngine::new().unwrap();
        let mut payload = payload_with_items(vec![]);
        payload.details.billing_address = "Line one/Line <b>two</b>".to_string();

        let html = engine.render_invoice(&payload, "").unwrap();

        assert!(html.contains("Line one<br/>Line &lt;b&gt;two&lt;/b&gt;"));
    }

    #[test]
    fn logo_data_uri_is_embedded_in_img_tag() {
        let engine = TemplateEngine::new().unwrap();
        let payload = payload_with_items(vec![]);

        let html = engine
            .render_invoice(&payload, "data:image/png;base64,AAAA")
            .unwrap();

        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
    }
}

use serde::{Deserialize, Serialize};

/// Invoice payload as submitted by the browser form.
///
/// Field names are camelCase on the wire. `invoiceNumber` and `companyLogo`
/// are server-assigned; any client-supplied value is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub details: InvoiceDetails,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDetails {
    pub currency: String,
    pub company_name: String,
    pub company_address: String,
    pub company_logo: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: String,
    pub billing_name: String,
    pub billing_phone: String,
    pub billing_address: String,
    pub shipping_name: String,
    pub shipping_address: String,
}

impl Default for InvoiceDetails {
    fn default() -> Self {
        InvoiceDetails {
            currency: "INR".to_string(),
            company_name: "Ashok Disposal Store".to_string(),
            company_address: "Vitoba Chowk Mainline,Hinganghat,442301".to_string(),
            company_logo: None,
            invoice_number: None,
            invoice_date: String::new(),
            billing_name: "Customer".to_string(),
            billing_phone: String::new(),
            billing_address: String::new(),
            shipping_name: "Rahul Gujar".to_string(),
            shipping_address: "Vitoba Chowk , Hinganghat".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
}

impl LineItem {
    pub fn amount(&self) -> f64 {
        self.quantity * self.price
    }
}

impl InvoicePayload {
    /// Grand total over all line items. Subtotal and total are the same
    /// figure: there is no tax or discount logic.
    pub fn total(&self) -> f64 {
        self.line_items.iter().map(LineItem::amount).sum()
    }
}

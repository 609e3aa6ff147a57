use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Margin {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 5.0,
            bottom: 5.0,
            left: 5.0,
            right: 5.0,
        }
    }
}

impl Margin {
    pub fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Margin { top, bottom, left, right }
    }

    pub fn uniform(size: f32) -> Self {
        Margin {
            top: size,
            bottom: size,
            left: size,
            right: size,
        }
    }
}

/// Page and footer configuration handed to the HTML→PDF converter.
///
/// Defaults reproduce the shop-bill format: 200mm×230mm page, 5mm border,
/// fixed thank-you footer.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin: Margin,
    pub footer_text: String,
    pub footer_height_mm: f32,
    pub timeout: Duration,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions {
            page_width_mm: 200.0,
            page_height_mm: 230.0,
            margin: Margin::default(),
            footer_text: "Thank you ! Visit us again.".to_string(),
            footer_height_mm: 10.0,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PdfOptions {
    pub fn builder() -> PdfOptionsBuilder {
        PdfOptionsBuilder::default()
    }

    /// Command-line arguments for wkhtmltopdf, minus input/output paths.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--page-width".to_string(),
            format!("{}mm", self.page_width_mm),
            "--page-height".to_string(),
            format!("{}mm", self.page_height_mm),
            "--margin-top".to_string(),
            format!("{}mm", self.margin.top),
            "--margin-bottom".to_string(),
            format!("{}mm", self.margin.bottom + self.footer_height_mm),
            "--margin-left".to_string(),
            format!("{}mm", self.margin.left),
            "--margin-right".to_string(),
            format!("{}mm", self.margin.right),
            "--footer-center".to_string(),
            self.footer_text.clone(),
            "--footer-font-size".to_string(),
            "14".to_string(),
            // Relative asset URLs resolve against the input HTML's directory
            "--enable-local-file-access".to_string(),
            "--quiet".to_string(),
        ]
    }
}

#[derive(Default)]
pub struct PdfOptionsBuilder {
    page_width_mm: Option<f32>,
    page_height_mm: Option<f32>,
    margin: Option<Margin>,
    footer_text: Option<String>,
    footer_height_mm: Option<f32>,
    timeout: Option<Duration>,
}

impl PdfOptionsBuilder {
    pub fn page_size(mut self, width_mm: f32, height_mm: f32) -> Self {
        self.page_width_mm = Some(width_mm);
        self.page_height_mm = Some(height_mm);
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    pub fn footer_height(mut self, height_mm: f32) -> Self {
        self.footer_height_mm = Some(height_mm);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> PdfOptions {
        let default = PdfOptions::default();
        PdfOptions {
            page_width_mm: self.page_width_mm.unwrap_or(default.page_width_mm),
            page_height_mm: self.page_height_mm.unwrap_or(default.page_height_mm),
            margin: self.margin.unwrap_or(default.margin),
            footer_text: self.footer_text.unwrap_or(default.footer_text),
            footer_height_mm: self.footer_height_mm.unwrap_or(default.footer_height_mm),
            timeout: self.timeout.unwrap_or(default.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_bill_format() {
        let opts = PdfOptions::default();
        assert_eq!(opts.page_width_mm, 200.0);
        assert_eq!(opts.page_height_mm, 230.0);
        assert_eq!(opts.margin.top, 5.0);
        assert_eq!(opts.footer_text, "Thank you ! Visit us again.");
    }

    #[test]
    fn args_carry_page_geometry_and_footer() {
        let opts = PdfOptions::builder()
            .page_size(100.0, 150.0)
            .margin(Margin::uniform(3.0))
            .footer_text("Bye")
            .build();

        let args = opts.to_args();
        let joined = args.join(" ");
        assert!(joined.contains("--page-width 100mm"));
        assert!(joined.contains("--page-height 150mm"));
        assert!(joined.contains("--margin-left 3mm"));
        assert!(args.contains(&"Bye".to_string()));
        assert!(args.contains(&"--enable-local-file-access".to_string()));
    }
}

//! Pipeline – ties together composition, layout, pagination, and rendering
//! into a single function call.

use rust_decimal::Decimal;

use crate::clock::{Clock, SystemClock};
use crate::composer::compose;
use crate::error::InvoiceError;
use crate::fonts::FontMetrics;
use crate::invoice::Invoice;
use crate::layout::layout_blocks;
use crate::layout_config::LayoutConfig;
use crate::pagination::{paginate, PAGE_MARGIN_PT};
use crate::render::render_pdf;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata (default: "Invoice").
    pub title: String,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page margin in points (default: 36).
    pub page_margin: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "Invoice".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            page_margin: PAGE_MARGIN_PT,
            orientation: PageOrientation::Portrait,
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    /// Create an A4 landscape config.
    pub fn a4_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }

    /// The margins must leave a positive content area.
    pub fn validate(&self) -> Result<(), InvoiceError> {
        let content_w = self.effective_width() - 2.0 * self.page_margin;
        let content_h = self.effective_height() - 2.0 * self.page_margin;
        if !(self.page_margin >= 0.0 && content_w > 0.0 && content_h > 0.0) {
            return Err(InvoiceError::Render(format!(
                "page {}x{}pt with {}pt margins leaves no content area",
                self.effective_width(),
                self.effective_height(),
                self.page_margin
            )));
        }
        Ok(())
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    /// Complete PDF document.
    pub bytes: Vec<u8>,
    /// Exact total recomputed from the items.
    pub total_amount: Decimal,
    pub page_count: usize,
}

/// Compose, lay out and paginate without producing PDF bytes – useful for
/// testing and for `--layout-json`.
pub fn compute_layout_config(
    invoice: &Invoice,
    clock: &dyn Clock,
    config: &PipelineConfig,
) -> Result<LayoutConfig, InvoiceError> {
    config.validate()?;

    // 1. Compose the template
    let blocks = compose(invoice, clock)?;
    log::debug!("composed {} blocks for {} item(s)", blocks.len(), invoice.items.len());

    // 2. Measure and flow
    let fonts = FontMetrics::default();
    let eff_w = config.effective_width();
    let eff_h = config.effective_height();
    let bands = layout_blocks(&blocks, config.page_margin, eff_w - 2.0 * config.page_margin, &fonts)?;

    // 3. Paginate
    let mut layout_config = paginate(&bands, eff_w, eff_h, config.page_margin, &fonts);
    layout_config.title = config.title.clone();
    Ok(layout_config)
}

/// Full pipeline: invoice → PDF bytes.
pub fn generate_invoice_pdf(
    invoice: &Invoice,
    clock: &dyn Clock,
    config: &PipelineConfig,
) -> Result<RenderedInvoice, InvoiceError> {
    let total_amount = invoice.validate()?;
    let layout_config = compute_layout_config(invoice, clock, config)?;

    // 4. Render PDF
    let bytes = render_pdf(&layout_config)?;

    Ok(RenderedInvoice {
        bytes,
        total_amount,
        page_count: layout_config.pages.len(),
    })
}

/// Convenience: generate a PDF with the default A4 config, dated today.
pub fn generate_pdf_from_invoice(invoice: &Invoice) -> Result<Vec<u8>, InvoiceError> {
    let rendered = generate_invoice_pdf(invoice, &SystemClock, &PipelineConfig::default())?;
    Ok(rendered.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceItem;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        Invoice::new("Acme", "a@acme.com", "1 Main St", vec![InvoiceItem::new("Widget", 2, dec!(9.99))])
    }

    #[test]
    fn pipeline_basic() {
        let rendered = generate_invoice_pdf(&invoice(), &SystemClock, &PipelineConfig::default()).unwrap();
        assert!(!rendered.bytes.is_empty());
        assert_eq!(rendered.page_count, 1);
        assert_eq!(rendered.total_amount, dec!(19.98));
        assert_eq!(&rendered.bytes[0..5], b"%PDF-");
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let config = PipelineConfig::a4_landscape();
        assert!(config.effective_width() > config.effective_height());
        let layout = compute_layout_config(&invoice(), &SystemClock, &config).unwrap();
        assert_eq!(layout.page_width_pt, 841.89);
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let config = PipelineConfig {
            page_margin: 400.0,
            ..PipelineConfig::default()
        };
        let err = generate_invoice_pdf(&invoice(), &SystemClock, &config).unwrap_err();
        assert!(matches!(err, InvoiceError::Render(_)));
    }

    #[test]
    fn empty_invoice_produces_no_bytes() {
        let empty = Invoice::new("Acme", "", "", Vec::new());
        let err = generate_pdf_from_invoice(&empty).unwrap_err();
        assert!(err.is_client_error());
    }
}

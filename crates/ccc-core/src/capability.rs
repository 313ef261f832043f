//! External capability interfaces
//!
//! Map rendering, QR rasterization and PDF composition are done by outside
//! libraries. The core talks to them only through these narrow traits and
//! owns nothing but the layout arithmetic.

use crate::error::CapabilityError;
use crate::summary::SummaryTable;
use crate::types::Location;

/// Interactive map the user picks a location on
pub trait MapWidget {
    /// Move the viewport
    fn center_on(&mut self, at: Location, zoom: f64);

    /// Show the device's own position
    fn show_user_location(&mut self, at: Location);

    /// Drop the user-placed pin at `at`
    fn place_marker(&mut self, at: Location);

    /// Remove the user-placed pin
    fn remove_marker(&mut self);
}

/// Rasterized image handed between capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// PNG bytes
    pub png: Vec<u8>,
}

/// Renders the share URL as a QR code
pub trait QrRenderer {
    /// Rasterize `data` as a QR code
    ///
    /// # Errors
    /// [`CapabilityError::Render`] when the renderer fails.
    fn render(&self, data: &str) -> Result<RasterImage, CapabilityError>;
}

/// Renders the summary table as an image
pub trait TableRenderer {
    /// Rasterize the table
    ///
    /// # Errors
    /// [`CapabilityError::Render`] when the renderer fails.
    fn render(&self, table: &SummaryTable) -> Result<RasterImage, CapabilityError>;
}

/// Composes the final PDF
pub trait PdfExporter {
    /// Produce PDF bytes for the request
    ///
    /// # Errors
    /// [`CapabilityError::Export`] when composition fails.
    fn export(&self, request: &ExportRequest) -> Result<Vec<u8>, CapabilityError>;
}

/// Page dimensions in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// A4 portrait
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

/// Where an image lands on the page (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Drawn width
    pub width: f32,
    /// Drawn height
    pub height: f32,
}

/// Page layout of the exported PDF
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportLayout {
    /// QR code placement
    pub qr: Placement,
    /// Summary table placement
    pub summary: Placement,
}

impl ExportLayout {
    /// Side of the square QR code
    pub const QR_SIZE: f32 = 275.0;
    /// Summary image is drawn at 1/N of its pixel size
    pub const SUMMARY_SCALE: f32 = 5.0;
    /// Summary image offset from the bottom-left corner
    pub const SUMMARY_OFFSET: f32 = 10.0;

    /// QR centred on the page, summary in the bottom-left corner
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(page: PageSize, summary_px: (u32, u32)) -> Self {
        Self {
            qr: Placement {
                x: (page.width - Self::QR_SIZE) / 2.0,
                y: (page.height - Self::QR_SIZE) / 2.0,
                width: Self::QR_SIZE,
                height: Self::QR_SIZE,
            },
            summary: Placement {
                x: Self::SUMMARY_OFFSET,
                y: Self::SUMMARY_OFFSET,
                width: summary_px.0 as f32 / Self::SUMMARY_SCALE,
                height: summary_px.1 as f32 / Self::SUMMARY_SCALE,
            },
        }
    }
}

/// Everything the PDF exporter needs
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Rendered QR code
    pub qr: RasterImage,
    /// Rendered summary table
    pub summary: RasterImage,
    /// Computed layout
    pub layout: ExportLayout,
    /// Suggested download name
    pub file_name: String,
}

impl ExportRequest {
    /// Render both images and lay them out
    ///
    /// # Errors
    /// [`CapabilityError::EmptyPayload`] for an empty URL, or whatever the
    /// renderers return.
    pub fn prepare(
        share_url: &str,
        table: &SummaryTable,
        qr: &dyn QrRenderer,
        tables: &dyn TableRenderer,
        page: PageSize,
        file_name: &str,
    ) -> Result<Self, CapabilityError> {
        if share_url.is_empty() {
            return Err(CapabilityError::EmptyPayload);
        }
        let qr = qr.render(share_url)?;
        let summary = tables.render(table)?;
        let layout = ExportLayout::compute(page, (summary.width, summary.height));
        Ok(Self {
            qr,
            summary,
            layout,
            file_name: file_name.to_string(),
        })
    }
}

/// Render, lay out and export in one go
///
/// # Errors
/// Any [`CapabilityError`] from the collaborators.
pub fn export_pdf(
    share_url: &str,
    table: &SummaryTable,
    qr: &dyn QrRenderer,
    tables: &dyn TableRenderer,
    exporter: &dyn PdfExporter,
    page: PageSize,
    file_name: &str,
) -> Result<Vec<u8>, CapabilityError> {
    let request = ExportRequest::prepare(share_url, table, qr, tables, page, file_name)?;
    let bytes = exporter.export(&request)?;
    tracing::info!(file = file_name, bytes = bytes.len(), "pdf exported");
    Ok(bytes)
}

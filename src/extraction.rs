use crate::{docx_extraction, pdf_extraction, DocumentFormat, Result};
use image::RgbImage;

// ── Extraction model ─────────────────────────────────────────────────────────
//
// Internal types shared by the format extractors. Callers see only the
// assembled AnalysisResult; the decoded pixel buffers here live for one
// analysis call and are dropped once classification is done.

/// Raw material pulled out of one document by a format extractor.
pub(crate) struct ExtractedDocument {
    /// Body text, page/paragraph order preserved.
    pub text: String,

    /// Page count as recorded by the container; 0 when the format does not
    /// store page geometry (DOCX).
    pub page_count: usize,

    /// Successfully decoded images in document order. Images that fail to
    /// decode never appear here.
    pub images: Vec<ExtractedImage>,
}

/// One decoded embedded image plus its provenance.
pub(crate) struct ExtractedImage {
    /// Decoded pixels, always converted to 8-bit RGB. Never zero-area.
    pub pixels: RgbImage,

    /// Source encoding name as reported in the result (e.g. `"JPEG"`).
    pub format: String,

    /// 1-based source page, when the container records one.
    pub page: Option<u32>,
}

/// Dispatch to the extractor for the declared format.
pub(crate) fn extract(bytes: &[u8], format: DocumentFormat) -> Result<ExtractedDocument> {
    match format {
        DocumentFormat::Pdf => pdf_extraction::extract(bytes),
        DocumentFormat::Docx => docx_extraction::extract(bytes),
    }
}

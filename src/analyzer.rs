use crate::report::{AnalysisResult, ColorSummary, DocumentFormat, ImageRecord};
use crate::{color_classify, dominant_colors, extraction, text_stats, AnalyzerConfig, Result};
use std::path::Path;

// ── DocumentAnalyzer ──────────────────────────────────────────────────────────

/// Entry point for document content analysis.
///
/// The analyzer holds only its (immutable) configuration; every call to
/// [`analyze`](DocumentAnalyzer::analyze) builds a fresh
/// [`AnalysisResult`] from scratch, so one analyzer may serve any number of
/// threads concurrently.
///
/// # Creating an analyzer
///
/// ```
/// use docanalyzer::{AnalyzerConfig, DocumentAnalyzer};
///
/// // Defaults
/// let analyzer = DocumentAnalyzer::new();
///
/// // With a custom palette size
/// let analyzer = DocumentAnalyzer::with_config(AnalyzerConfig {
///     palette_size: 8,
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
    config: AnalyzerConfig,
}

impl DocumentAnalyzer {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Create an analyzer with the default [`AnalyzerConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with a custom [`AnalyzerConfig`].
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    // ── Analysis ──────────────────────────────────────────────────────────────

    /// Analyze one document.
    ///
    /// `declared_format` names the container format the caller believes the
    /// bytes to be — typically the upload's file extension. It is validated
    /// *before* the bytes are touched, so a well-formed PDF declared as
    /// `"txt"` still fails with
    /// [`AnalyzeError::UnsupportedFormat`](crate::AnalyzeError::UnsupportedFormat).
    ///
    /// Failure modes:
    /// - [`AnalyzeError::UnsupportedFormat`](crate::AnalyzeError::UnsupportedFormat)
    ///   — `declared_format` is neither PDF nor DOCX; nothing is parsed.
    /// - [`AnalyzeError::CorruptDocument`](crate::AnalyzeError::CorruptDocument)
    ///   — the container cannot be opened; no partial result is returned.
    ///
    /// Individual images that fail to decode are skipped and excluded from
    /// every count; they never fail the document.
    pub fn analyze(&self, bytes: &[u8], declared_format: &str) -> Result<AnalysisResult> {
        let format = DocumentFormat::parse(declared_format)?;
        let extracted = extraction::extract(bytes, format)?;

        let text = text_stats::analyze_text(&extracted.text);

        let mut images = Vec::with_capacity(extracted.images.len());
        let mut color_summary = ColorSummary::default();
        let mut dominant = Vec::with_capacity(extracted.images.len());

        // Each image is classified and palettized independently; nothing
        // here depends on any other image's outcome.
        for (index, image) in extracted.images.iter().enumerate() {
            let classification = color_classify::classify(&image.pixels, &self.config);
            color_summary.record(classification);

            images.push(ImageRecord {
                index,
                width: image.pixels.width(),
                height: image.pixels.height(),
                format: image.format.clone(),
                page: image.page,
                classification,
            });

            dominant.push(dominant_colors::extract_dominant_colors(
                &image.pixels,
                index,
                &self.config,
            ));
        }

        Ok(AnalysisResult {
            document_type: format,
            page_count: extracted.page_count,
            text,
            image_count: images.len(),
            images,
            color_summary,
            dominant_colors: dominant,
        })
    }

    /// Analyze a document on the filesystem, deriving the declared format
    /// from the path's extension.
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult> {
        let path = path.as_ref();
        let declared = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = std::fs::read(path)?;
        self.analyze(&bytes, &declared)
    }
}

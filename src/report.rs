use crate::{AnalyzeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── DocumentFormat ───────────────────────────────────────────────────────────

/// The two document container formats this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Parse a declared format string as supplied by a caller (typically a
    /// file extension). Case-insensitive; a leading dot is tolerated.
    ///
    /// ```
    /// # use docanalyzer::DocumentFormat;
    /// assert_eq!(DocumentFormat::parse("PDF").unwrap(), DocumentFormat::Pdf);
    /// assert_eq!(DocumentFormat::parse(".docx").unwrap(), DocumentFormat::Docx);
    /// assert!(DocumentFormat::parse("txt").is_err());
    /// ```
    pub fn parse(declared: &str) -> Result<Self> {
        match declared.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(AnalyzeError::UnsupportedFormat(declared.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Docx => write!(f, "DOCX"),
        }
    }
}

// ── TextStatistics ───────────────────────────────────────────────────────────

/// Counts computed over the document's extracted text.
///
/// Produced by [`crate::analyze_text`]; `word_count` and `paragraph_count`
/// are both zero exactly when the text is empty or whitespace-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Maximal whitespace-delimited non-empty tokens.
    pub word_count: usize,

    /// Total characters including whitespace (Unicode scalar values).
    pub char_count: usize,

    /// Blocks of text separated by one or more blank lines.
    pub paragraph_count: usize,
}

// ── ColorClassification ──────────────────────────────────────────────────────

/// The color profile of one embedded image. Exactly one label per image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClassification {
    /// A non-trivial fraction of pixels are chromatically distinct from gray.
    Color,
    /// Achromatic with a continuous tonal range.
    Grayscale,
    /// Achromatic and effectively bilevel: every pixel sits near pure black
    /// or pure white.
    BlackAndWhite,
}

impl fmt::Display for ColorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => write!(f, "color"),
            Self::Grayscale => write!(f, "grayscale"),
            Self::BlackAndWhite => write!(f, "black & white"),
        }
    }
}

// ── ColorSummary ─────────────────────────────────────────────────────────────

/// Per-document tally of image classifications.
///
/// The three counts always sum to the document's image count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSummary {
    pub color: usize,
    pub grayscale: usize,
    pub black_and_white: usize,
}

impl ColorSummary {
    /// Total number of classified images.
    ///
    /// ```
    /// # use docanalyzer::ColorSummary;
    /// let s = ColorSummary { color: 3, grayscale: 1, black_and_white: 2 };
    /// assert_eq!(s.total(), 6);
    /// ```
    pub fn total(&self) -> usize {
        self.color + self.grayscale + self.black_and_white
    }

    pub(crate) fn record(&mut self, classification: ColorClassification) {
        match classification {
            ColorClassification::Color => self.color += 1,
            ColorClassification::Grayscale => self.grayscale += 1,
            ColorClassification::BlackAndWhite => self.black_and_white += 1,
        }
    }
}

// ── ImageRecord ──────────────────────────────────────────────────────────────

/// One successfully decoded embedded image.
///
/// The decoded pixel buffer itself is transient and not part of the result;
/// only its measurements and classification survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// 0-based position among the document's decoded images.
    pub index: usize,

    /// Width in pixels (always > 0; degenerate images are skipped upstream).
    pub width: u32,

    /// Height in pixels (always > 0).
    pub height: u32,

    /// Source encoding name, e.g. `"JPEG"`, `"PNG"`, or `"RAW"` for
    /// unfiltered PDF sample streams.
    pub format: String,

    /// 1-based source page for PDF images; `None` for DOCX, which does not
    /// record page geometry.
    pub page: Option<u32>,

    /// The image's color profile.
    pub classification: ColorClassification,
}

impl ImageRecord {
    /// Human-readable `"width x height"` string.
    ///
    /// ```
    /// # use docanalyzer::{ColorClassification, ImageRecord};
    /// # let record = ImageRecord { index: 0, width: 640, height: 480,
    /// #     format: "PNG".into(), page: None,
    /// #     classification: ColorClassification::Color };
    /// assert_eq!(record.dimensions(), "640x480");
    /// ```
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// The source page rendered for display: the page number, or `"unknown"`
    /// when the container format carries no page association.
    pub fn page_label(&self) -> String {
        match self.page {
            Some(p) => p.to_string(),
            None => "unknown".into(),
        }
    }
}

// ── Dominant colors ──────────────────────────────────────────────────────────

/// One cluster in an image's dominant-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantColorEntry {
    /// The cluster centroid, rounded to 8-bit RGB.
    pub rgb: [u8; 3],

    /// Number of pixels assigned to this cluster (always > 0).
    pub count: u64,
}

impl DominantColorEntry {
    /// CSS-style hex rendering of the centroid.
    ///
    /// ```
    /// # use docanalyzer::DominantColorEntry;
    /// let entry = DominantColorEntry { rgb: [255, 0, 0], count: 10 };
    /// assert_eq!(entry.hex(), "#ff0000");
    /// ```
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

/// The ranked palette for one image, descending by member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantColorSet {
    /// Index of the [`ImageRecord`] this palette belongs to.
    pub image_index: usize,

    /// Cluster entries, largest first. Never contains empty or duplicate
    /// clusters; for images with fewer distinct colors than the target
    /// palette size, there is one entry per distinct color.
    pub colors: Vec<DominantColorEntry>,
}

// ── AnalysisResult ───────────────────────────────────────────────────────────

/// The complete, immutable outcome of analyzing one document.
///
/// Returned by [`crate::DocumentAnalyzer::analyze`]. A document with zero
/// embedded images is a perfectly valid result: `image_count` is 0, the
/// summary counts are all 0, and `dominant_colors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The container format the document was analyzed as.
    pub document_type: DocumentFormat,

    /// Number of pages. Always 0 for DOCX, which stores no page geometry.
    pub page_count: usize,

    /// Statistics over the extracted text.
    pub text: TextStatistics,

    /// Number of successfully decoded embedded images. Images that fail to
    /// decode are excluded here and everywhere downstream.
    pub image_count: usize,

    /// One record per decoded image, in document order.
    pub images: Vec<ImageRecord>,

    /// Classification tally; `color_summary.total() == image_count`.
    pub color_summary: ColorSummary,

    /// One palette per decoded image, keyed by `image_index`.
    pub dominant_colors: Vec<DominantColorSet>,
}

use crate::extraction::{ExtractedDocument, ExtractedImage};
use crate::{AnalyzeError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::warn;
use zip::ZipArchive;

// ── DOCX extraction ──────────────────────────────────────────────────────────

/// Extract body text and embedded images from DOCX bytes.
///
/// A DOCX file is a zip archive: the body lives in `word/document.xml`,
/// embedded media under `word/media/`. OOXML stores no page geometry, so
/// the page count is reported as 0 and every image's page as unknown.
///
/// An archive that cannot be opened, or one without `word/document.xml`,
/// fails with [`AnalyzeError::CorruptDocument`]. Media entries that fail to
/// decode are logged and skipped.
pub(crate) fn extract(bytes: &[u8]) -> Result<ExtractedDocument> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalyzeError::CorruptDocument(format!("cannot open DOCX container: {e}")))?;

    let body_xml = read_entry(&mut archive, "word/document.xml").map_err(|_| {
        AnalyzeError::CorruptDocument("archive has no word/document.xml body".into())
    })?;

    let text = body_text(&String::from_utf8_lossy(&body_xml))?;
    let images = extract_media(&mut archive);

    Ok(ExtractedDocument {
        text,
        page_count: 0,
        images,
    })
}

/// Read one archive entry fully into memory.
fn read_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> std::io::Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

// ── Body text ────────────────────────────────────────────────────────────────

/// Pull the paragraph text out of `word/document.xml`.
///
/// Text runs (`w:t`) are concatenated within their paragraph; `w:tab` and
/// `w:br` become a tab and a newline. Paragraphs (`w:p`) are joined with
/// blank lines so the text statistics analyzer sees the same paragraph
/// boundaries the document declares.
fn body_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let fragment = t.unescape().map_err(|e| {
                    AnalyzeError::CorruptDocument(format!("malformed body XML text: {e}"))
                })?;
                current.push_str(&fragment);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AnalyzeError::CorruptDocument(format!(
                    "malformed body XML: {e}"
                )));
            }
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n\n"))
}

// ── Embedded media ───────────────────────────────────────────────────────────

/// Decode every image under `word/media/`, in lexicographic entry order so
/// repeated extraction yields the same image sequence.
fn extract_media(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Vec<ExtractedImage> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("word/media/"))
        .map(str::to_string)
        .collect();
    names.sort();

    let mut images = Vec::new();

    for name in names {
        let data = match read_entry(archive, &name) {
            Ok(d) => d,
            Err(e) => {
                warn!(entry = %name, "skipping unreadable media entry: {e}");
                continue;
            }
        };

        match image::load_from_memory(&data) {
            Ok(decoded) => {
                let pixels = decoded.to_rgb8();
                if pixels.width() == 0 || pixels.height() == 0 {
                    continue;
                }
                images.push(ExtractedImage {
                    pixels,
                    format: media_format(&name),
                    page: None,
                });
            }
            Err(e) => {
                warn!(entry = %name, "skipping undecodable media entry: {e}");
            }
        }
    }

    images
}

/// Encoding name from the media entry's file extension.
fn media_format(name: &str) -> String {
    match name.rsplit('.').next().map(str::to_ascii_uppercase) {
        Some(ext) if ext == "JPG" => "JPEG".into(),
        Some(ext) if !ext.is_empty() && !ext.contains('/') => ext,
        _ => "unknown".into(),
    }
}

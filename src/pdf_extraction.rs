use crate::extraction::{ExtractedDocument, ExtractedImage};
use crate::{AnalyzeError, Result};
use image::RgbImage;
use lopdf::{Dictionary, Document, Object};
use tracing::warn;

// ── PDF extraction ───────────────────────────────────────────────────────────

/// Extract text, page count, and embedded raster images from PDF bytes.
///
/// Text is pulled per page and concatenated in page order. Images are the
/// `/XObject` streams with `/Subtype /Image` reachable from each page's
/// resource dictionary, tagged with their 1-based source page.
///
/// A container that cannot be opened fails the whole call with
/// [`AnalyzeError::CorruptDocument`]. A single image that cannot be decoded
/// is logged and skipped; extraction of the rest of the document continues.
pub(crate) fn extract(bytes: &[u8]) -> Result<ExtractedDocument> {
    let document = Document::load_mem(bytes)
        .map_err(|e| AnalyzeError::CorruptDocument(format!("cannot open PDF container: {e}")))?;

    let pages = document.get_pages();
    let page_count = pages.len();

    let mut text = String::new();
    let mut images = Vec::new();

    for (&page_number, &page_id) in &pages {
        // A page whose content stream defeats text extraction contributes
        // nothing rather than failing the document.
        let page_text = document.extract_text(&[page_number]).unwrap_or_default();
        if !page_text.is_empty() {
            text.push_str(&page_text);
            if !page_text.ends_with('\n') {
                text.push('\n');
            }
        }

        for (name, stream) in page_image_streams(&document, page_id) {
            match decode_image_stream(&stream) {
                Ok(Some((pixels, format))) => images.push(ExtractedImage {
                    pixels,
                    format,
                    page: Some(page_number),
                }),
                Ok(None) => {} // zero-area image, silently dropped
                Err(e) => {
                    warn!(page = page_number, xobject = %name, "skipping image: {e}");
                }
            }
        }
    }

    Ok(ExtractedDocument {
        text,
        page_count,
        images,
    })
}

// ── Image discovery ──────────────────────────────────────────────────────────

/// Collect the image XObject streams referenced by one page, in resource
/// dictionary order.
fn page_image_streams(document: &Document, page_id: lopdf::ObjectId) -> Vec<(String, lopdf::Stream)> {
    let mut streams = Vec::new();

    let page_dict = match document.get_object(page_id).and_then(Object::as_dict) {
        Ok(d) => d,
        Err(_) => return streams,
    };

    // /Resources and /XObject may each be inline or an indirect reference.
    let resources = match page_dict.get(b"Resources").ok().and_then(|v| resolve_dict(document, v)) {
        Some(d) => d,
        None => return streams,
    };

    let xobjects = match resources.get(b"XObject").ok().and_then(|v| resolve_dict(document, v)) {
        Some(d) => d,
        None => return streams,
    };

    for (name, value) in xobjects.iter() {
        let stream = match value.as_reference() {
            Ok(id) => document
                .get_object(id)
                .ok()
                .and_then(|o| o.as_stream().ok().cloned()),
            Err(_) => value.as_stream().ok().cloned(),
        };

        if let Some(stream) = stream {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|n| n == b"Image")
                .unwrap_or(false);
            if is_image {
                streams.push((String::from_utf8_lossy(name).into_owned(), stream));
            }
        }
    }

    streams
}

/// Resolve a value that might be inline or a reference to a dictionary.
fn resolve_dict(document: &Document, value: &Object) -> Option<Dictionary> {
    if let Ok(id) = value.as_reference() {
        document
            .get_object(id)
            .ok()
            .and_then(|o| o.as_dict().ok().cloned())
    } else {
        value.as_dict().ok().cloned()
    }
}

// ── Image decoding ───────────────────────────────────────────────────────────

/// Decode one image XObject stream to RGB pixels.
///
/// Supported encodings:
/// - `DCTDecode` — the stream body is a complete JPEG file. A
///   `[FlateDecode, DCTDecode]` chain is also accepted: the zlib layer is
///   stripped first, then the JPEG inside is decoded.
/// - unfiltered or `FlateDecode` — raw 8-bit `DeviceRGB` or `DeviceGray`
///   samples, reported as `"RAW"`.
///
/// Anything else (JPX, CCITT, JBIG2, exotic color spaces, non-8-bit depths)
/// is an [`AnalyzeError::ImageDecode`], which the caller recovers from by
/// skipping the image. Returns `Ok(None)` for zero-area images.
fn decode_image_stream(stream: &lopdf::Stream) -> Result<Option<(RgbImage, String)>> {
    let width = dict_u32(&stream.dict, b"Width")?;
    let height = dict_u32(&stream.dict, b"Height")?;
    if width == 0 || height == 0 {
        return Ok(None);
    }

    let filters = stream_filters(&stream.dict);

    if filters.iter().any(|f| f == b"DCTDecode") {
        // The filter array lists filters in decode order, so the only chain
        // we can honor is an optional zlib wrapper ahead of the JPEG body.
        let body = if filters.len() == 1 {
            stream.content.clone()
        } else if filters.len() == 2 && filters[0] == b"FlateDecode" {
            inflate(&stream.content)?
        } else {
            return Err(AnalyzeError::ImageDecode(format!(
                "unsupported filter chain {}",
                filters
                    .iter()
                    .map(|f| String::from_utf8_lossy(f).into_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            )));
        };

        let decoded = image::load_from_memory(&body)
            .map_err(|e| AnalyzeError::ImageDecode(format!("DCTDecode stream: {e}")))?;
        return Ok(Some((decoded.to_rgb8(), "JPEG".into())));
    }

    let unsupported: Vec<_> = filters.iter().filter(|f| *f != b"FlateDecode").collect();
    if !unsupported.is_empty() {
        return Err(AnalyzeError::ImageDecode(format!(
            "unsupported stream filter {}",
            String::from_utf8_lossy(unsupported[0])
        )));
    }

    let bits = dict_u32(&stream.dict, b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return Err(AnalyzeError::ImageDecode(format!(
            "unsupported bit depth {bits}"
        )));
    }

    // decompressed_content handles FlateDecode; unfiltered streams fall back
    // to the raw body.
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let pixel_count = width as usize * height as usize;
    let pixels = match color_space(&stream.dict) {
        Some(cs) if cs == b"DeviceRGB" => {
            if data.len() < pixel_count * 3 {
                return Err(AnalyzeError::ImageDecode("truncated RGB sample data".into()));
            }
            RgbImage::from_raw(width, height, data[..pixel_count * 3].to_vec())
        }
        Some(cs) if cs == b"DeviceGray" => {
            if data.len() < pixel_count {
                return Err(AnalyzeError::ImageDecode("truncated gray sample data".into()));
            }
            let rgb: Vec<u8> = data[..pixel_count].iter().flat_map(|&g| [g, g, g]).collect();
            RgbImage::from_raw(width, height, rgb)
        }
        Some(other) => {
            return Err(AnalyzeError::ImageDecode(format!(
                "unsupported color space {}",
                String::from_utf8_lossy(&other)
            )));
        }
        None => {
            return Err(AnalyzeError::ImageDecode("missing /ColorSpace entry".into()));
        }
    };

    match pixels {
        Some(img) => Ok(Some((img, "RAW".into()))),
        None => Err(AnalyzeError::ImageDecode(
            "sample buffer does not match declared dimensions".into(),
        )),
    }
}

/// Strip a zlib (FlateDecode) wrapper from a stream body.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| AnalyzeError::ImageDecode(format!("FlateDecode layer: {e}")))?;
    Ok(out)
}

/// Read a required positive integer from an image dictionary.
fn dict_u32(dict: &Dictionary, key: &[u8]) -> Result<u32> {
    dict.get(key)
        .and_then(Object::as_i64)
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            AnalyzeError::ImageDecode(format!(
                "missing or invalid /{} entry",
                String::from_utf8_lossy(key)
            ))
        })
}

/// Collect the stream's filter chain. `/Filter` may be a single name or an
/// array of names, inline in the stream dictionary.
fn stream_filters(dict: &Dictionary) -> Vec<Vec<u8>> {
    let mut filters = Vec::new();

    if let Ok(value) = dict.get(b"Filter") {
        match value {
            Object::Name(name) => filters.push(name.clone()),
            Object::Array(items) => {
                for item in items {
                    if let Ok(name) = item.as_name() {
                        filters.push(name.to_vec());
                    }
                }
            }
            _ => {}
        }
    }

    filters
}

/// Read the color space name, tolerating a direct name only. Array-valued
/// color spaces (ICCBased, Indexed, …) are reported to the caller as
/// unsupported by returning the first array element's name when present.
fn color_space(dict: &Dictionary) -> Option<Vec<u8>> {
    match dict.get(b"ColorSpace").ok()? {
        Object::Name(name) => Some(name.clone()),
        Object::Array(items) => items.first().and_then(|o| o.as_name().ok().map(<[u8]>::to_vec)),
        _ => None,
    }
}

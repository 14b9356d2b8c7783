// Integration tests for docanalyzer.
//
// No binary fixtures are committed: PDFs are built with lopdf's document
// builder, DOCX archives with zip's writer, and image payloads with the
// image crate's in-memory encoders.

use docanalyzer::{
    AnalyzeError, AnalyzerConfig, ColorClassification, DocumentAnalyzer, DocumentFormat,
};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

// ── Fixture builders ──────────────────────────────────────────────────────────

/// One page of a PDF fixture: body text (`None` gives the page a content
/// stream that cannot be parsed, so its text extraction fails) plus image
/// XObject streams.
type PdfPage<'a> = (Option<&'a str>, Vec<Stream>);

/// Build a PDF with the given pages, in order.
fn build_pdf_pages(pages: Vec<PdfPage>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for (text, image_streams) in pages {
        let mut xobjects = Dictionary::new();
        for (i, stream) in image_streams.into_iter().enumerate() {
            let id = doc.add_object(stream);
            xobjects.set(format!("Im{i}"), id);
        }

        let mut resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(resources);

        let body = match text {
            Some(text) => Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text)]),
                    Operation::new("ET", vec![]),
                ],
            }
            .encode()
            .unwrap(),
            None => b"\xff\xfe not pdf operators at all (((".to_vec(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, body));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Build a one-page PDF with the given body text and image XObject streams.
fn build_pdf(text: &str, image_streams: Vec<Stream>) -> Vec<u8> {
    build_pdf_pages(vec![(Some(text), image_streams)])
}

/// Unfiltered 8-bit DeviceRGB image XObject.
fn raw_rgb_stream(width: u32, height: u32, pixel: [u8; 3]) -> Stream {
    let data: Vec<u8> = (0..width * height).flat_map(|_| pixel).collect();
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        data,
    )
}

/// Unfiltered 8-bit DeviceGray image XObject with per-pixel samples.
fn raw_gray_stream(width: u32, height: u32, samples: Vec<u8>) -> Stream {
    assert_eq!(samples.len(), (width * height) as usize);
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        samples,
    )
}

/// DCTDecode image XObject whose body is a real JPEG file.
fn jpeg_stream(width: u32, height: u32, pixel: [u8; 3]) -> Stream {
    let img = RgbImage::from_pixel(width, height, Rgb(pixel));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        buf.into_inner(),
    )
}

/// `[FlateDecode, DCTDecode]` image XObject: a JPEG body wrapped in zlib.
fn flate_jpeg_stream(width: u32, height: u32, pixel: [u8; 3]) -> Stream {
    let img = RgbImage::from_pixel(width, height, Rgb(pixel));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&buf.into_inner()).unwrap();
    let wrapped = encoder.finish().unwrap();

    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => vec!["FlateDecode".into(), "DCTDecode".into()],
        },
        wrapped,
    )
}

fn png_bytes(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(pixel));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Build a minimal DOCX archive: paragraphs of body text plus media entries.
fn build_docx(paragraphs: &[&str], media: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = String::new();
    for p in paragraphs {
        body.push_str(&format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"));
    }
    let document_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();

    for (name, data) in media {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

// ── Format gate ───────────────────────────────────────────────────────────────

#[test]
fn declared_format_accepts_case_and_dot_variants() {
    for declared in ["pdf", "PDF", ".pdf", "docx", ".DOCX"] {
        assert!(DocumentFormat::parse(declared).is_ok(), "rejected {declared}");
    }
}

#[test]
fn declared_format_rejects_unknown_types() {
    for declared in ["txt", "doc", "png", ""] {
        assert!(
            matches!(
                DocumentFormat::parse(declared),
                Err(AnalyzeError::UnsupportedFormat(_))
            ),
            "accepted {declared}"
        );
    }
}

#[test]
fn well_formed_pdf_declared_as_txt_is_unsupported() {
    let bytes = build_pdf("hello", vec![]);
    let err = DocumentAnalyzer::new().analyze(&bytes, "txt").unwrap_err();
    assert!(matches!(err, AnalyzeError::UnsupportedFormat(_)));
}

#[test]
fn corrupt_bytes_fail_with_corrupt_document() {
    let analyzer = DocumentAnalyzer::new();
    let garbage = b"this is not a document container";

    let pdf_err = analyzer.analyze(garbage, "pdf").unwrap_err();
    assert!(matches!(pdf_err, AnalyzeError::CorruptDocument(_)));

    let docx_err = analyzer.analyze(garbage, "docx").unwrap_err();
    assert!(matches!(docx_err, AnalyzeError::CorruptDocument(_)));
}

// ── PDF analysis ──────────────────────────────────────────────────────────────

#[test]
fn pdf_without_images_is_a_valid_result() {
    let bytes = build_pdf("Hello world. This is a test.", vec![]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.document_type, DocumentFormat::Pdf);
    assert_eq!(result.page_count, 1);
    assert_eq!(result.text.word_count, 6);
    assert_eq!(result.text.paragraph_count, 1);
    assert_eq!(result.image_count, 0);
    assert_eq!(result.color_summary.total(), 0);
    assert!(result.images.is_empty());
    assert!(result.dominant_colors.is_empty());
}

#[test]
fn pdf_images_are_decoded_classified_and_tagged_with_page() {
    let bytes = build_pdf(
        "two images",
        vec![raw_rgb_stream(4, 4, [255, 0, 0]), jpeg_stream(8, 8, [20, 40, 200])],
    );
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.image_count, 2);
    assert_eq!(result.color_summary.total(), result.image_count);

    let raw = &result.images[0];
    assert_eq!((raw.width, raw.height), (4, 4));
    assert_eq!(raw.format, "RAW");
    assert_eq!(raw.page, Some(1));
    assert_eq!(raw.classification, ColorClassification::Color);

    let jpeg = &result.images[1];
    assert_eq!(jpeg.format, "JPEG");
    assert_eq!(jpeg.page, Some(1));
    assert_eq!(jpeg.classification, ColorClassification::Color);

    // Uniform raw image: a single exact palette entry covering every pixel.
    let palette = &result.dominant_colors[0];
    assert_eq!(palette.image_index, 0);
    assert_eq!(palette.colors.len(), 1);
    assert_eq!(palette.colors[0].rgb, [255, 0, 0]);
    assert_eq!(palette.colors[0].count, 16);
}

#[test]
fn multi_page_pdf_tags_images_with_their_source_page() {
    let bytes = build_pdf_pages(vec![
        (Some("Alpha beta on the first page"), vec![]),
        (Some("gamma"), vec![raw_rgb_stream(4, 4, [255, 0, 0])]),
        (Some("delta"), vec![raw_gray_stream(4, 4, vec![128; 16])]),
    ]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.page_count, 3);
    assert_eq!(result.text.word_count, 8);

    assert_eq!(result.image_count, 2);
    assert_eq!(result.images[0].page, Some(2));
    assert_eq!(result.images[0].page_label(), "2");
    assert_eq!(result.images[1].page, Some(3));
    assert_eq!(result.color_summary.total(), 2);
}

#[test]
fn page_with_unparseable_content_contributes_no_text() {
    // The middle page's content stream defeats text extraction; the rest of
    // the document is analyzed normally.
    let bytes = build_pdf_pages(vec![
        (Some("Alpha beta"), vec![]),
        (None, vec![raw_rgb_stream(4, 4, [0, 0, 255])]),
        (Some("gamma"), vec![]),
    ]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.page_count, 3);
    assert_eq!(result.text.word_count, 3);
    // Image discovery is independent of text extraction on the same page.
    assert_eq!(result.image_count, 1);
    assert_eq!(result.images[0].page, Some(2));
}

#[test]
fn pdf_gray_and_bilevel_images_are_told_apart() {
    let mut bilevel = vec![0u8; 8];
    bilevel.extend(vec![255u8; 8]);

    let bytes = build_pdf(
        "tones",
        vec![
            raw_gray_stream(4, 4, vec![128; 16]),
            raw_gray_stream(4, 4, bilevel),
        ],
    );
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.images[0].classification, ColorClassification::Grayscale);
    assert_eq!(result.images[1].classification, ColorClassification::BlackAndWhite);
    assert_eq!(result.color_summary.grayscale, 1);
    assert_eq!(result.color_summary.black_and_white, 1);
    assert_eq!(result.color_summary.total(), 2);
}

#[test]
fn flate_wrapped_jpeg_stream_is_decoded() {
    let bytes = build_pdf("wrapped jpeg", vec![flate_jpeg_stream(8, 8, [200, 30, 30])]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.image_count, 1);
    let image = &result.images[0];
    assert_eq!(image.format, "JPEG");
    assert_eq!((image.width, image.height), (8, 8));
    assert_eq!(image.classification, ColorClassification::Color);
}

#[test]
fn undecodable_pdf_image_is_skipped_not_fatal() {
    let broken = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 4,
            "Height" => 4,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "JPXDecode",
        },
        vec![0xDE, 0xAD, 0xBE, 0xEF],
    );

    let bytes = build_pdf("one good image", vec![broken, raw_rgb_stream(4, 4, [0, 255, 0])]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "pdf").unwrap();

    assert_eq!(result.image_count, 1);
    assert_eq!(result.images[0].classification, ColorClassification::Color);
    assert_eq!(result.color_summary.total(), 1);
}

// ── DOCX analysis ─────────────────────────────────────────────────────────────

#[test]
fn docx_text_and_media_are_extracted() {
    let bytes = build_docx(
        &["Hello world. This is a test.", "Second paragraph here."],
        &[("word/media/image1.png", png_bytes(6, 6, [200, 30, 30]))],
    );
    let result = DocumentAnalyzer::new().analyze(&bytes, "docx").unwrap();

    assert_eq!(result.document_type, DocumentFormat::Docx);
    // OOXML stores no page geometry.
    assert_eq!(result.page_count, 0);
    assert_eq!(result.text.word_count, 9);
    assert_eq!(result.text.paragraph_count, 2);

    assert_eq!(result.image_count, 1);
    let image = &result.images[0];
    assert_eq!(image.format, "PNG");
    assert_eq!(image.page, None);
    assert_eq!(image.page_label(), "unknown");
    assert_eq!(image.classification, ColorClassification::Color);
}

#[test]
fn docx_undecodable_media_reduces_image_count_only() {
    let bytes = build_docx(
        &["text"],
        &[
            ("word/media/broken.png", b"not an image at all".to_vec()),
            ("word/media/ok.png", png_bytes(4, 4, [128, 128, 128])),
        ],
    );
    let result = DocumentAnalyzer::new().analyze(&bytes, "docx").unwrap();

    assert_eq!(result.image_count, 1);
    assert_eq!(result.images[0].classification, ColorClassification::Grayscale);
}

#[test]
fn docx_without_media_is_a_valid_result() {
    let bytes = build_docx(&["just text"], &[]);
    let result = DocumentAnalyzer::new().analyze(&bytes, "docx").unwrap();

    assert_eq!(result.image_count, 0);
    assert_eq!(result.color_summary.total(), 0);
    assert!(result.dominant_colors.is_empty());
}

#[test]
fn zip_without_document_body_is_corrupt() {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("unrelated.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"hello").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let err = DocumentAnalyzer::new().analyze(&bytes, "docx").unwrap_err();
    assert!(matches!(err, AnalyzeError::CorruptDocument(_)));
}

// ── Reproducibility & serialization ──────────────────────────────────────────

#[test]
fn repeated_analysis_yields_identical_results() {
    // A gradient image forces real k-means clustering; identical output
    // across runs depends on the fixed seed and iteration cap.
    let gradient = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 90]));
    let bytes = build_docx(
        &["deterministic"],
        &[("word/media/grad.png", {
            let mut buf = Cursor::new(Vec::new());
            gradient.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        })],
    );

    let analyzer = DocumentAnalyzer::new();
    let first = analyzer.analyze(&bytes, "docx").unwrap();
    let second = analyzer.analyze(&bytes, "docx").unwrap();
    assert_eq!(first, second);

    let palette = &first.dominant_colors[0];
    assert_eq!(palette.colors.len(), analyzer.config().palette_size);
    let total: u64 = palette.colors.iter().map(|e| e.count).sum();
    assert_eq!(total, 16 * 16);
}

#[test]
fn analysis_result_round_trips_through_json() {
    let bytes = build_docx(
        &["serialize me"],
        &[("word/media/dot.png", png_bytes(2, 2, [0, 0, 0]))],
    );
    let result = DocumentAnalyzer::new().analyze(&bytes, "docx").unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: docanalyzer::AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

// ── Path-based convenience ───────────────────────────────────────────────────

#[test]
fn analyze_path_derives_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.docx");
    std::fs::write(&path, build_docx(&["from disk"], &[])).unwrap();

    let result = DocumentAnalyzer::new().analyze_path(&path).unwrap();
    assert_eq!(result.document_type, DocumentFormat::Docx);
    assert_eq!(result.text.word_count, 2);
}

#[test]
fn analyze_path_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.txt");
    std::fs::write(&path, b"plain text").unwrap();

    let err = DocumentAnalyzer::new().analyze_path(&path).unwrap_err();
    assert!(matches!(err, AnalyzeError::UnsupportedFormat(_)));
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[test]
fn default_config_matches_documented_constants() {
    let cfg = AnalyzerConfig::default();
    assert_eq!(cfg.chroma_tolerance, docanalyzer::CHROMA_TOLERANCE);
    assert_eq!(cfg.color_presence_fraction, docanalyzer::COLOR_PRESENCE_FRACTION);
    assert_eq!(cfg.palette_size, docanalyzer::DEFAULT_PALETTE_SIZE);
    assert_eq!(cfg.clustering_seed, docanalyzer::DEFAULT_CLUSTERING_SEED);
}

#[test]
fn palette_size_is_configurable() {
    let gradient = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 0]));
    let mut buf = Cursor::new(Vec::new());
    gradient.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    let bytes = build_docx(&["palette"], &[("word/media/g.png", buf.into_inner())]);

    let analyzer = DocumentAnalyzer::with_config(AnalyzerConfig {
        palette_size: 3,
        ..Default::default()
    });
    let result = analyzer.analyze(&bytes, "docx").unwrap();
    assert_eq!(result.dominant_colors[0].colors.len(), 3);
}

// ── Error display ─────────────────────────────────────────────────────────────

#[test]
fn error_display_is_non_empty() {
    let errors: &[AnalyzeError] = &[
        AnalyzeError::UnsupportedFormat("txt".into()),
        AnalyzeError::CorruptDocument("test".into()),
        AnalyzeError::ImageDecode("test".into()),
    ];
    for e in errors {
        assert!(!e.to_string().is_empty(), "empty display for {e:?}");
    }
}

//! CLI tool for analyzing the content of PDF and DOCX documents.
//!
//! This binary demonstrates the capabilities of the docanalyzer crate: it
//! runs one analysis and prints the result as a human-readable report or,
//! with `--json`, as serialized JSON for downstream tooling.

use docanalyzer::{AnalysisResult, DocumentAnalyzer, Result};
use std::{env, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let path = &args[1];
    let as_json = args.iter().any(|a| a == "--json");

    match run_analysis(path, as_json) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(program_name: &str) {
    println!("docanalyzer - PDF/DOCX content analysis");
    println!();
    println!("USAGE:");
    println!("    {program_name} <document> [--json]");
    println!();
    println!("ARGUMENTS:");
    println!("    <document>   Path to a .pdf or .docx file");
    println!();
    println!("OPTIONS:");
    println!("    --json       Print the analysis result as JSON");
    println!("    -h, --help   Show this help message");
    println!();
    println!("The report covers page count, text statistics, every embedded");
    println!("image's dimensions and color classification, and each image's");
    println!("dominant-color palette.");
}

fn run_analysis(path: &str, as_json: bool) -> Result<()> {
    let result = DocumentAnalyzer::new().analyze_path(path)?;

    if as_json {
        // Serialization of our own result type cannot fail.
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
        return Ok(());
    }

    print_report(path, &result);
    Ok(())
}

fn print_report(path: &str, result: &AnalysisResult) {
    println!("Document: {path}");
    println!("  type       : {}", result.document_type);
    println!("  pages      : {}", result.page_count);
    println!();
    println!("Text:");
    println!("  words      : {}", result.text.word_count);
    println!("  characters : {}", result.text.char_count);
    println!("  paragraphs : {}", result.text.paragraph_count);
    println!();
    println!("Images: {}", result.image_count);

    for image in &result.images {
        println!(
            "  #{} {} {} page {} — {}",
            image.index,
            image.dimensions(),
            image.format,
            image.page_label(),
            image.classification
        );
    }

    if result.image_count > 0 {
        let summary = &result.color_summary;
        println!();
        println!(
            "Color summary: {} color, {} grayscale, {} black & white",
            summary.color, summary.grayscale, summary.black_and_white
        );

        println!();
        println!("Dominant colors:");
        for set in &result.dominant_colors {
            let palette: Vec<String> = set
                .colors
                .iter()
                .map(|c| format!("{} ({})", c.hex(), c.count))
                .collect();
            println!("  image #{}: {}", set.image_index, palette.join(", "));
        }
    }
}

//! Page-Flow CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Paginates a text file (or a built-in sample) with the synthetic renderer
//! and prints where the page breaks land.

use page_flow::layout::FontMetrics;
use page_flow::{paginate, Document, LayoutMode, OverlayKind, PageProfile, TextLayoutRenderer};

const MAX_PASSES: usize = 64;

fn sample_text() -> String {
    (1..=40)
        .map(|i| {
            format!(
                "Paragraph {} contains enough text to span multiple lines and exercise the \
                 line breaking and pagination of the document flow.",
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() {
    let mut layout_mode = LayoutMode::Paged;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--grid" => layout_mode = LayoutMode::Grid,
            _ => path = Some(arg),
        }
    }

    let text = match path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("cannot read {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => sample_text(),
    };

    let profile = PageProfile::default();
    let mut renderer = TextLayoutRenderer::new(profile, FontMetrics::default());
    let mut document = Document::from_text(&text);

    let result = match paginate(&mut document, &mut renderer, &profile, layout_mode, MAX_PASSES) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("pagination failed: {}", err);
            std::process::exit(1);
        }
    };

    println!("Page-Flow pagination");
    println!("====================");
    println!(
        "{} blocks, {} pages ({} splits, {} passes)",
        document.paragraph_count(),
        result.page_count,
        result.splits,
        result.passes
    );
    println!();

    for overlay in result.overlays.iter() {
        match overlay.kind {
            OverlayKind::Spacer { height } => {
                println!("  break before offset {:>6}  spacer {:>7.1}px", overlay.anchor, height)
            }
            OverlayKind::Footer {
                page_number,
                margin_top,
            } => println!(
                "  footer at offset {:>9}  page {} ({:.1}px unused)",
                overlay.anchor, page_number, margin_top
            ),
        }
    }
}

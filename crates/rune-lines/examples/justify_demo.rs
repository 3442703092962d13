//! Justify lines with and without spaces and print how glyph widths change.
//!
//! Run with: RUST_LOG=rune_lines=trace cargo run -p rune-lines --example justify_demo
use std::sync::Arc;

use rune_lines::{
    units::units_to_px, Context, FixedFont, FontId, Hinting, Line, LineBuilder, LineData,
    LinesConfig, SCALE,
};
use tracing_subscriber::EnvFilter;

fn build_line(ctx: &Arc<Context>, font: &Arc<FixedFont>, text: &str) -> Line {
    let data = Arc::new(LineData::from_text(text));
    LineBuilder::new(ctx.clone(), data.clone())
        .run(font.shape(&data, 0..data.len(), 0))
        .build()
        .expect("valid line")
}

fn print_widths(line: &Line) {
    let widths: Vec<String> = line
        .runs()
        .iter()
        .flat_map(|run| run.glyphs.glyphs())
        .map(|g| format!("{:.2}", units_to_px(g.geometry.width)))
        .collect();
    println!("  glyph widths: [{}]", widths.join(", "));
    println!(
        "  line width: {:.2}px, justified: {}",
        units_to_px(line.compute_width()),
        line.is_justified()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Justification Demo ===\n");

    let font = Arc::new(FixedFont::new(FontId(1)).with_advance('i', 3 * SCALE));
    let ctx = Arc::new(Context::new(font.clone()));

    println!("Test 1: Spaces absorb the extra width");
    println!("-------------------------------------");
    for text in ["fit this in", "a b c d"] {
        let line = build_line(&ctx, &font, text);
        println!("Text: \"{}\"", text);
        print_widths(&line);
        let target = line.compute_width() + 13 * SCALE + 300;
        let line = line.justify(target);
        println!("After justify to {:.2}px:", units_to_px(target));
        print_widths(&line);
        println!();
    }

    println!("\nTest 2: Letter spacing when there are no spaces");
    println!("-----------------------------------------------");
    let line = build_line(&ctx, &font, "justify");
    let target = line.compute_width() + 12 * SCALE;
    let line = line.justify(target);
    print_widths(&line);

    println!("\n\nTest 3: Hinting disabled, fallback disabled");
    println!("-------------------------------------------");
    let mut config = LinesConfig::default();
    config.justify.hinting = Hinting::Never;
    config.justify.letter_spacing_fallback = false;
    let strict = Arc::new(Context::with_config(font.clone(), config));
    for text in ["no spaces", "nospaces"] {
        let line = build_line(&strict, &font, text);
        let target = line.compute_width() + 10 * SCALE;
        let line = line.justify(target);
        println!("Text: \"{}\"", text);
        print_widths(&line);
    }
}

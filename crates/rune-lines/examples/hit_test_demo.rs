use std::sync::Arc;

use rune_lines::{Context, FixedFont, FontId, LineBuilder, LineData, Lines, SCALE};

fn main() {
    let font = Arc::new(FixedFont::new(FontId(1)));
    let ctx = Arc::new(Context::new(font.clone()));

    // Three lines of one paragraph, the second one indented
    let text = "Hello, World! This is line 2. And line 3.";
    let data = Arc::new(LineData::from_text(text));
    let breaks = [(0..14, 0), (14..30, 4 * SCALE), (30..text.len(), 0)];

    let mut lines = Lines::new();
    for (i, (range, x)) in breaks.into_iter().enumerate() {
        let line = LineBuilder::new(ctx.clone(), data.clone())
            .range(range.clone())
            .run(font.shape(&data, range, 0))
            .wrapped(i < 2)
            .starts_paragraph(i == 0)
            .ends_paragraph(i == 2)
            .build()
            .expect("valid line");
        lines.add_line(line, x, (12 + 18 * i as i32) * SCALE);
    }

    println!("=== Hit Testing Demo ===\n");
    println!("Text: {:?}", text);
    println!("Number of lines: {}", lines.line_count());
    let (width, height) = lines.size();
    println!("Size: {}px x {}px\n", width / SCALE, height / SCALE);

    println!("--- Point to Index ---");
    let test_points = [
        (0, 5, "Top-left corner"),
        (50, 5, "Middle of first line"),
        (2, 24, "Indent of second line"),
        (30, 24, "Middle of second line"),
        (150, 40, "Right of third line"),
        (30, 100, "Below the text"),
    ];
    for (x, y, description) in test_points {
        println!("\nPoint ({}, {}) - {}:", x, y, description);
        match lines.pos_to_index(x * SCALE, y * SCALE) {
            Some((hit, found)) => {
                let ch = text[found.index..].chars().next().unwrap_or('∅');
                println!("  Line index: {}", hit.line_no);
                println!("  Byte offset: {} (+{} trailing)", found.index, found.trailing);
                println!("  Character: '{}', inside: {}", ch, found.inside);
            }
            None => println!("  No line"),
        }
    }

    println!("\n--- Index to Position ---");
    let test_offsets = [
        (0, None, "Start of text"),
        (7, None, "After 'Hello, '"),
        (14, None, "Start of line 2"),
        (14, Some(0), "End of line 1"),
        (text.len(), None, "End of text"),
    ];
    for (index, hint, description) in test_offsets {
        let Some(hit) = lines.index_to_line(index, hint) else {
            continue;
        };
        println!("\nOffset {} - {}:", index, description);
        println!("  Line index: {}", hit.line_no);
        if let Some(pos) = lines.cursor_pos(Some(hit.line_no), index) {
            println!(
                "  Strong cursor: ({}, {}) height {}",
                pos.strong.x / SCALE,
                pos.strong.y / SCALE,
                pos.strong.height / SCALE
            );
        }
        let inside = lines
            .line(hit.line_no)
            .is_some_and(|(line, _, _)| index < line.end_index());
        if inside {
            if let Some(rect) = lines.index_to_pos(Some(hit.line_no), index) {
                println!("  Grapheme box: x {} width {}", rect.x / SCALE, rect.width / SCALE);
            }
        }
    }
}

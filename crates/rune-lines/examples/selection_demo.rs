use std::sync::Arc;

use rune_lines::{
    AttrList, Context, Direction, FixedFont, FontId, LineBuilder, LineData, Lines, SCALE,
    SelectionBound,
};

fn main() {
    println!("=== Selection Ranges Demo ===\n");

    let font = Arc::new(FixedFont::new(FontId(1)));
    let ctx = Arc::new(Context::new(font.clone()));

    // "select me" wrapped after the space, followed by an RTL paragraph
    let first = Arc::new(LineData::from_text("select me"));
    let second = Arc::new(LineData::new("אבג דה", Direction::Rtl, AttrList::new()));

    let mut lines = Lines::new();
    let layout = [
        (first.clone(), 0..7, 0, true, false),
        (first.clone(), 7..9, 0, false, true),
        (second.clone(), 0..second.len(), 1, true, true),
    ];
    for (i, (data, range, level, starts, ends)) in layout.into_iter().enumerate() {
        let line = LineBuilder::new(ctx.clone(), data.clone())
            .range(range.clone())
            .run(font.shape(&data, range, level))
            .wrapped(!ends)
            .starts_paragraph(starts)
            .ends_paragraph(ends)
            .build()
            .expect("valid line");
        lines.add_line(line, 0, (12 + 18 * i as i32) * SCALE);
    }

    let px = |ranges: Vec<(i32, i32)>| -> Vec<(i32, i32)> {
        ranges.into_iter().map(|(a, b)| (a / SCALE, b / SCALE)).collect()
    };

    println!("Selection 2..8 across the wrap:");
    let start = SelectionBound::new(2).on_line(0);
    let end = SelectionBound::new(8).on_line(1);
    for line_no in 0..2 {
        println!("  line {}: {:?}", line_no, px(lines.x_ranges(line_no, start, end)));
    }

    println!("\nSelection inside the RTL line:");
    let start = SelectionBound::new(2).on_line(2);
    let end = SelectionBound::new(7).on_line(2);
    println!("  line 2: {:?}", px(lines.x_ranges(2, start, end)));

    println!("\nSelection not reaching line 2:");
    println!("  line 2: {:?}", px(lines.x_ranges(2, start.on_line(0), end.on_line(0))));
}

use std::sync::Arc;

use rune_lines::{
    AttrList, Context, CursorMotion, Direction, FixedFont, FontId, LineBuilder, LineData, Lines,
    MovementDirection, SCALE,
};

/// Lay out `text` as one paragraph broken at the given byte offsets.
fn paragraph(font: &Arc<FixedFont>, text: &str, direction: Direction, breaks: &[usize]) -> Lines {
    let ctx = Arc::new(Context::new(font.clone()));
    let data = Arc::new(LineData::new(text, direction, AttrList::new()));
    let level = if direction.is_ltr() { 0 } else { 1 };

    let mut bounds = vec![0];
    bounds.extend_from_slice(breaks);
    bounds.push(data.len());

    let mut lines = Lines::new();
    let count = bounds.len() - 1;
    for (i, pair) in bounds.windows(2).enumerate() {
        let range = pair[0]..pair[1];
        let line = LineBuilder::new(ctx.clone(), data.clone())
            .range(range.clone())
            .run(font.shape(&data, range, level))
            .wrapped(i + 1 < count)
            .starts_paragraph(i == 0)
            .ends_paragraph(i + 1 == count)
            .build()
            .expect("valid line");
        lines.add_line(line, 0, (12 + 18 * i as i32) * SCALE);
    }
    lines
}

/// Press an arrow key until the cursor leaves the text.
fn walk(lines: &Lines, line_no: usize, index: usize, direction: MovementDirection) {
    let (mut line_no, mut index, mut trailing) = (line_no, index, 0);

    loop {
        match lines.move_cursor(true, Some(line_no), index, trailing, direction) {
            Some(CursorMotion::Moved {
                line_no: l,
                index: i,
                trailing: t,
            }) => {
                let x = lines
                    .cursor_pos(Some(l), i)
                    .map(|pos| pos.strong.x / SCALE)
                    .unwrap_or_default();
                println!("  line {l}, index {i} + {t} trailing, x = {x}px");
                (line_no, index, trailing) = (l, i, t);
            }
            Some(motion) => {
                println!("  {motion:?} (index {})", motion.index_or_sentinel());
                break;
            }
            None => {
                println!("  index {index} is not laid out");
                break;
            }
        }
    }
}

fn main() {
    println!("=== Cursor Motion Demo ===\n");

    let font = Arc::new(FixedFont::new(FontId(1)));

    println!("Test 1: Wrapped LTR paragraph");
    println!("-----------------------------");
    let text = "hello wide world";
    let lines = paragraph(&font, text, Direction::Ltr, &[6, 11]);
    for (line, x, y) in lines.lines() {
        println!(
            "  \"{}\" at ({}, {})",
            &text[line.start_index()..line.end_index()],
            x / SCALE,
            y / SCALE
        );
    }
    println!("\nMoving right:");
    walk(&lines, 0, 0, MovementDirection::Right);
    println!("\nMoving left:");
    walk(&lines, 2, text.len(), MovementDirection::Left);

    println!("\n\nTest 2: RTL line");
    println!("----------------");
    let text = "שלום עולם";
    let lines = paragraph(&font, text, Direction::Rtl, &[]);
    println!("Text: \"{}\" ({} bytes)", text, text.len());
    println!("\nMoving left (logically forward):");
    walk(&lines, 0, 0, MovementDirection::Left);
}

/// Ink extents of one rendered line relative to its pen origin, in the
/// usual y-down convention: `y_bearing` is negative for ink above the
/// baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
}

/// Pen origin for one line of a text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    pub x: f32,
    pub baseline: f32,
}

/// Lays out newline-separated `text` top-anchored at `(x, y)`.
///
/// Each line moves the cursor down by `row_pitch` plus that line's own
/// ascent, and is shifted left by its own horizontal bearing so ink starts
/// at `x`. A final line without a terminator is still placed; empty text
/// places nothing.
pub fn place_lines<'a>(
    text: &'a str,
    x: f32,
    y: f32,
    row_pitch: f32,
    mut measure: impl FnMut(&str) -> LineExtents,
) -> Vec<PlacedLine<'a>> {
    let mut cursor = y;
    text.lines()
        .map(|line| {
            let extents = measure(line);
            cursor += row_pitch - extents.y_bearing;
            PlacedLine {
                text: line,
                x: x - extents.x_bearing,
                baseline: cursor,
            }
        })
        .collect()
}

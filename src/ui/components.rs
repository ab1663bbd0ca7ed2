//! Reusable UI component helpers
//!
//! Button labels, grid rows and the block-digit font used for the big score.

use crate::score::PRESET_INCREMENTS;

/// Height of a block-digit glyph in terminal rows
pub const DIGIT_HEIGHT: u16 = 5;

const DIGIT_WIDTH: usize = 3;

/// 3x5 glyphs for 0-9
const DIGITS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    [" █ ", "██ ", " █ ", " █ ", "███"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

const MINUS: [&str; 5] = ["   ", "   ", "███", "   ", "   "];

/// Button text, e.g. "+10" or "-100"
pub fn button_label(prefix: char, value: i64) -> String {
    format!("{}{}", prefix, value)
}

/// Split the presets into rows of at most `per_row` (index, value) pairs
pub fn button_rows(per_row: usize) -> Vec<Vec<(usize, i64)>> {
    let indexed: Vec<(usize, i64)> = PRESET_INCREMENTS.iter().copied().enumerate().collect();
    indexed
        .chunks(per_row.max(1))
        .map(|row| row.to_vec())
        .collect()
}

/// Columns needed to draw `value` in block digits
pub fn big_number_width(value: i64) -> usize {
    let chars = value.to_string().chars().count();
    chars * (DIGIT_WIDTH + 1) - 1
}

/// Render `value` as DIGIT_HEIGHT lines of block glyphs
pub fn big_number(value: i64) -> Vec<String> {
    let glyphs: Vec<&[&str; 5]> = value
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => &DIGITS[d as usize],
            None => &MINUS,
        })
        .collect();

    (0..DIGIT_HEIGHT as usize)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| glyph[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

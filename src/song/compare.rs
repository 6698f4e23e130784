//! Comparison operands and rating-token decoding
//!
//! Comparisons against a [`crate::song::Song`] accept heterogeneous
//! right-hand sides: a bare integer is a release year, a star token
//! (`⭐⭐⭐` or `"3 stars"`) is a rating, and another song compares by
//! rating with the name as tie-break. The variants are dispatched
//! explicitly through [`Operand`] rather than operator overloading.

use crate::song::Song;

/// The star glyph used by rating tokens and rendering (U+2B50).
pub const STAR: char = '⭐';

/// A comparison operand, tagged by what it compares against.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Compare by release year.
    Year(i32),
    /// Compare by star count (0–5).
    Stars(u8),
    /// Compare by rating, then name.
    Song(&'a Song),
}

impl Operand<'_> {
    /// Parse user text into an operand: integers become years, rating
    /// tokens become star counts. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Operand<'static>> {
        if let Ok(year) = text.trim().parse::<i32>() {
            return Some(Operand::Year(year));
        }
        decode_rating_token(text).map(Operand::Stars)
    }
}

/// Decode a rating token into a star count.
///
/// Accepts a run of ⭐ glyphs (variation selectors and surrounding text are
/// ignored) or the textual form `"N stars"` / `"N star"`.
pub fn decode_rating_token(token: &str) -> Option<u8> {
    let glyphs = token.chars().filter(|c| *c == STAR).count();
    if glyphs > 0 {
        return Some(glyphs.min(u8::MAX as usize) as u8);
    }
    let text = token.trim().to_lowercase();
    let count = text
        .strip_suffix("stars")
        .or_else(|| text.strip_suffix("star"))?;
    count.trim().parse::<u8>().ok()
}

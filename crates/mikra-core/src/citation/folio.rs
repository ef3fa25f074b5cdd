//! Folio-and-side numbering
//!
//! Each physical leaf (folio) has two logical sides. A folio token like
//! `45b` linearizes to a single top-level section number so the rest of
//! the addressing machinery sees plain integers; the inverse projection
//! recovers the folio and side for display.

use crate::errors::{MikraError, Result};

/// Side of a folio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn letter(self) -> char {
        match self {
            Side::A => 'a',
            Side::B => 'b',
        }
    }
}

/// Linearize a folio and side to a top-level section number
///
/// Side a of folio N is section 2N-1, side b is section 2N.
pub fn encode_folio(folio: u32, side: Side) -> u32 {
    match side {
        Side::A => folio * 2 - 1,
        Side::B => folio * 2,
    }
}

/// Recover the folio and side from a linearized section number
pub fn decode_folio(section: u32) -> (u32, Side) {
    let folio = (section + 1) / 2;
    let side = if section % 2 == 1 { Side::A } else { Side::B };
    (folio, side)
}

/// Render a linearized section as a folio token (`45b`)
pub fn folio_token(section: u32) -> String {
    let (folio, side) = decode_folio(section);
    format!("{}{}", folio, side.letter())
}

/// Read a folio token of the form `<digits><a|b>`
pub fn parse_folio_token(token: &str) -> Result<(u32, Side)> {
    let malformed = || MikraError::MalformedFolioToken {
        token: token.to_string(),
    };

    let mut chars = token.chars();
    let side = match chars.next_back() {
        Some('a') | Some('A') => Side::A,
        Some('b') | Some('B') => Side::B,
        _ => return Err(malformed()),
    };

    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    let folio: u32 = digits.parse().map_err(|_| malformed())?;
    if folio == 0 {
        return Err(malformed());
    }

    Ok((folio, side))
}

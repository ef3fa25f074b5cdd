//! Citation parser
//!
//! Grammar: `Title[ |.]Section[.SubSection...][-ToSection[.ToSubSection...]]`
//! with `:` accepted as a section separator and `_` as a space. The book
//! name is resolved against the library's index set by longest prefix
//! match, following alias shorthands recursively. Folio tokens and
//! composite commentary titles resolve through the book's own Index, so
//! one pipeline serves every numbering convention.

use super::folio;
use super::reference::Ref;
use crate::errors::{MikraError, Result};
use crate::model::{Index, Numbering};
use crate::ops::Library;

/// Per-call parsing options
#[derive(Debug, Clone, Copy)]
pub struct ParseOpts {
    /// Pad missing trailing levels with 1 up to depth minus one, so a
    /// citation to a chapter implicitly addresses its first sub-unit.
    /// Callers that must detect whole-section intent parse unpadded.
    pub pad: bool,
}

impl ParseOpts {
    pub fn padded() -> Self {
        Self { pad: true }
    }

    pub fn unpadded() -> Self {
        Self { pad: false }
    }
}

impl Default for ParseOpts {
    fn default() -> Self {
        Self::padded()
    }
}

/// Normalize a raw citation string before parsing
///
/// Replaces `_` with space, unifies `:` to `.`, collapses space runs.
pub fn normalize_input(s: &str) -> String {
    let replaced: String = s
        .trim()
        .chars()
        .map(|c| match c {
            '_' => ' ',
            ':' => '.',
            other => other,
        })
        .collect();

    let mut out = String::with_capacity(replaced.len());
    let mut prev_space = false;
    for c in replaced.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

/// Parse a citation with default options (padded)
pub fn parse(lib: &Library, s: &str) -> Result<Ref> {
    parse_with(lib, s, ParseOpts::default())
}

/// Parse a citation string into a structured address
pub fn parse_with(lib: &Library, s: &str, opts: ParseOpts) -> Result<Ref> {
    let normalized = normalize_input(s);
    if normalized.is_empty() {
        return Err(MikraError::EmptyCitation);
    }

    let mut parts = normalized.split('-');
    let head = parts.next().unwrap_or_default().trim();
    let tail = parts.next().map(str::trim);
    if parts.next().is_some() {
        return Err(MikraError::TooManyRangeParts {
            citation: s.to_string(),
        });
    }

    let (index, rest) = resolve_book(lib, head, s)?;
    let tokens: Vec<&str> = rest.split([' ', '.']).filter(|t| !t.is_empty()).collect();
    let mut sections = read_sections(&index, &tokens)?;
    let mut to_sections = match tail {
        None => sections.clone(),
        Some(t) => combine_range_end(&index, &sections, t, s)?,
    };

    // End-before-start must fail loudly, never yield an inverted range.
    if to_sections < sections {
        return Err(MikraError::InvertedRange {
            citation: s.to_string(),
        });
    }

    if opts.pad && !sections.is_empty() {
        while sections.len() + 1 < index.depth() {
            sections.push(1);
            to_sections.push(1);
        }
    }

    Ok(Ref {
        book: index.title.clone(),
        categories: index.categories.clone(),
        sections,
        to_sections,
        depth: index.depth(),
        scheme: index.scheme,
        base_title: index.base_title.clone(),
    })
}

// Longest-prefix title resolution over token boundaries, aliases included.
fn resolve_book<'a>(lib: &Library, head: &'a str, citation: &str) -> Result<(Index, &'a str)> {
    let separators: Vec<usize> = head
        .char_indices()
        .filter(|(_, c)| *c == ' ' || *c == '.')
        .map(|(i, _)| i)
        .collect();

    let mut candidates: Vec<(usize, usize)> = vec![(head.len(), head.len())];
    for &i in separators.iter().rev() {
        candidates.push((i, i + 1));
    }

    for (end, rest_start) in candidates {
        let raw = head[..end].replace('.', " ");
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if let Some(title) = lib.resolve_title(name) {
            let index = lib.get_index(&title)?.clone();
            return Ok((index, &head[rest_start..]));
        }
    }

    Err(MikraError::UnknownBook {
        citation: citation.to_string(),
    })
}

fn read_sections(index: &Index, tokens: &[&str]) -> Result<Vec<u32>> {
    if tokens.len() > index.depth() {
        return Err(MikraError::DepthExceeded {
            title: index.title.clone(),
            depth: index.depth(),
            given: tokens.len(),
        });
    }

    let mut sections = Vec::with_capacity(tokens.len());
    for (level, token) in tokens.iter().enumerate() {
        sections.push(read_level(index, level, token)?);
    }
    Ok(sections)
}

fn read_level(index: &Index, level: usize, token: &str) -> Result<u32> {
    if level == 0 && index.scheme == Numbering::Folio {
        let (folio_no, side) = folio::parse_folio_token(token)?;
        if let Some(length) = index.declared_length {
            if folio_no > length {
                return Err(MikraError::FolioOutOfRange {
                    title: index.title.clone(),
                    folio: folio_no,
                    length,
                });
            }
        }
        Ok(folio::encode_folio(folio_no, side))
    } else {
        let value: u32 = token.parse().map_err(|_| MikraError::MalformedSection {
            token: token.to_string(),
        })?;
        if value == 0 {
            return Err(MikraError::MalformedSection {
                token: token.to_string(),
            });
        }
        Ok(value)
    }
}

// The range tail names only trailing levels; missing leading levels are
// inherited from the range start.
fn combine_range_end(
    index: &Index,
    sections: &[u32],
    tail: &str,
    citation: &str,
) -> Result<Vec<u32>> {
    let tokens: Vec<&str> = tail.split([' ', '.']).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() || tokens.len() > sections.len() {
        return Err(MikraError::MalformedRange {
            citation: citation.to_string(),
        });
    }

    let offset = sections.len() - tokens.len();
    let mut to_sections = sections.to_vec();
    for (j, token) in tokens.iter().enumerate() {
        to_sections[offset + j] = read_level(index, offset + j, token)?;
    }
    Ok(to_sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Numbering;

    fn test_library() -> Library {
        let mut lib = Library::new();
        lib.add_index(
            Index::new(
                "Genesis",
                vec!["Tanakh".to_string()],
                vec!["Chapter".to_string(), "Verse".to_string()],
                Numbering::Positional,
            )
            .with_alias("Bereshit")
            .with_alias("Gen."),
        )
        .unwrap();
        lib.add_index(
            Index::new(
                "Shabbat",
                vec!["Talmud".to_string()],
                vec!["Daf".to_string(), "Line".to_string()],
                Numbering::Folio,
            )
            .with_declared_length(157),
        )
        .unwrap();
        let shabbat = lib.get_index("Shabbat").unwrap().clone();
        lib.add_index(Index::commentary("Rashi on Shabbat", &shabbat))
            .unwrap();
        lib
    }

    #[test]
    fn test_parse_simple() {
        let lib = test_library();
        let r = parse(&lib, "Genesis 4:5").unwrap();
        assert_eq!(r.book, "Genesis");
        assert_eq!(r.sections, vec![4, 5]);
        assert_eq!(r.to_sections, vec![4, 5]);
        assert!(!r.is_range());
    }

    #[test]
    fn test_parse_separator_variants() {
        let lib = test_library();
        for citation in ["Genesis 4:5", "Genesis 4.5", "Genesis_4.5", "Genesis.4.5"] {
            let r = parse(&lib, citation).unwrap();
            assert_eq!(r.sections, vec![4, 5], "citation {:?}", citation);
        }
    }

    #[test]
    fn test_parse_alias_resolves() {
        let lib = test_library();
        let r = parse(&lib, "Bereshit 4:5").unwrap();
        assert_eq!(r.book, "Genesis");
    }

    #[test]
    fn test_parse_folio() {
        let lib = test_library();
        let r = parse(&lib, "Shabbat 45b:11").unwrap();
        assert_eq!(r.sections, vec![90, 11]);
        assert_eq!(r.normalize(), "Shabbat 45b:11");
    }

    #[test]
    fn test_parse_commentary_composite() {
        let lib = test_library();
        let r = parse(&lib, "Rashi on Shabbat 45b:15:1").unwrap();
        assert_eq!(r.book, "Rashi on Shabbat");
        assert_eq!(r.base_title.as_deref(), Some("Shabbat"));
        assert_eq!(r.sections, vec![90, 15, 1]);
        assert_eq!(r.depth, 3);
    }

    #[test]
    fn test_parse_range_shares_leading_levels() {
        let lib = test_library();
        let r = parse(&lib, "Genesis 4:5-7").unwrap();
        assert_eq!(r.sections, vec![4, 5]);
        assert_eq!(r.to_sections, vec![4, 7]);

        let r = parse(&lib, "Genesis 4:5-5:2").unwrap();
        assert_eq!(r.to_sections, vec![5, 2]);
    }

    #[test]
    fn test_parse_whole_book() {
        let lib = test_library();
        let r = parse(&lib, "Genesis").unwrap();
        assert!(r.is_whole_book());
    }

    #[test]
    fn test_padding_is_optional() {
        let lib = test_library();
        let rashi = lib.get_index("Rashi on Shabbat").unwrap().clone();
        assert_eq!(rashi.depth(), 3);

        let padded = parse(&lib, "Rashi on Shabbat 45b").unwrap();
        assert_eq!(padded.sections, vec![90, 1]);

        let unpadded = parse_with(&lib, "Rashi on Shabbat 45b", ParseOpts::unpadded()).unwrap();
        assert_eq!(unpadded.sections, vec![90]);
    }

    #[test]
    fn test_unknown_book() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Atlantis 3:2"),
            Err(MikraError::UnknownBook { .. })
        ));
    }

    #[test]
    fn test_too_many_range_parts() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Genesis 4:5-6-7"),
            Err(MikraError::TooManyRangeParts { .. })
        ));
    }

    #[test]
    fn test_depth_exceeded() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Genesis 4:5:6"),
            Err(MikraError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn test_folio_out_of_range() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Shabbat 200a:1"),
            Err(MikraError::FolioOutOfRange { .. })
        ));
    }

    #[test]
    fn test_malformed_folio_token() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Shabbat 45c:1"),
            Err(MikraError::MalformedFolioToken { .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let lib = test_library();
        assert!(matches!(
            parse(&lib, "Genesis 4:5-3:1"),
            Err(MikraError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_degenerate_range_is_not_a_range() {
        let lib = test_library();
        let r = parse(&lib, "Genesis 4:5-5").unwrap();
        assert!(!r.is_range());
    }

    #[test]
    fn test_normalize_round_trip() {
        let lib = test_library();
        for citation in [
            "Genesis 4:5",
            "Genesis 4:5-7",
            "Genesis 4:5-5:2",
            "Shabbat 45b:11",
            "Shabbat 45b:11-12",
            "Shabbat 45b:11-46a:2",
            "Rashi on Shabbat 45b:15:1",
        ] {
            let once = parse(&lib, citation).unwrap().normalize();
            let twice = parse(&lib, &once).unwrap().normalize();
            assert_eq!(once, twice);
            assert_eq!(once, citation);
        }
    }
}

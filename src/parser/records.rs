//! Fixed-column record field extraction.
//!
//! Column ranges are zero-based, end-exclusive byte offsets into a record
//! line. Short lines yield empty fields rather than errors.

use std::ops::Range;

pub(crate) const RECORD_NAME: Range<usize> = 0..6;
pub(crate) const ATOM_NAME: Range<usize> = 12..16;
pub(crate) const ALT_LOC: usize = 16;
pub(crate) const RES_NAME: Range<usize> = 17..21;
pub(crate) const CHAIN_ID: usize = 21;
pub(crate) const RES_SEQ: Range<usize> = 22..26;
pub(crate) const INS_CODE: usize = 26;
pub(crate) const X: Range<usize> = 30..38;
pub(crate) const Y: Range<usize> = 38..46;
pub(crate) const Z: Range<usize> = 46..54;
pub(crate) const OCCUPANCY: Range<usize> = 54..60;
pub(crate) const TEMP_FACTOR: Range<usize> = 60..66;
pub(crate) const ELEMENT: Range<usize> = 76..78;
pub(crate) const TITLE_TEXT: Range<usize> = 10..80;

pub(crate) const HELIX_CHAIN: usize = 19;
pub(crate) const HELIX_START: Range<usize> = 21..25;
pub(crate) const HELIX_END: Range<usize> = 33..37;
pub(crate) const SHEET_CHAIN: usize = 21;
pub(crate) const SHEET_START: Range<usize> = 22..26;
pub(crate) const SHEET_END: Range<usize> = 33..37;

/// Two-letter elements that commonly appear left-justified in hetero-atom
/// names (`FE`, `ZN`, ...). Anything else is read from its first letter.
const TWO_LETTER_ELEMENTS: &[&str] = &[
    "FE", "ZN", "MG", "MN", "CL", "BR", "NA", "CA", "CU", "CO", "NI", "SE",
    "CD", "HG", "LI", "AL", "SI", "AU", "AG", "PT", "SR", "BA", "CS", "RB",
];

/// Trimmed text in `range`, empty if the line is too short.
pub(crate) fn field(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    if range.start >= end {
        return "";
    }
    line.get(range.start..end).map_or("", str::trim)
}

/// Single byte at column `col`, `b' '` if the line is too short.
pub(crate) fn column(line: &str, col: usize) -> u8 {
    line.as_bytes().get(col).copied().unwrap_or(b' ')
}

/// Parse a required float field.
pub(crate) fn float(line: &str, range: Range<usize>) -> Option<f32> {
    field(line, range).parse().ok()
}

/// Parse an optional float field: blank gives `default`, garbage gives
/// `None`.
pub(crate) fn float_or(
    line: &str,
    range: Range<usize>,
    default: f32,
) -> Option<f32> {
    let text = field(line, range);
    if text.is_empty() {
        Some(default)
    } else {
        text.parse().ok()
    }
}

/// Parse a required integer field.
pub(crate) fn int(line: &str, range: Range<usize>) -> Option<i32> {
    field(line, range).parse().ok()
}

/// Record name in upper case, trimmed.
pub(crate) fn record_name(line: &str) -> &str {
    field(line, RECORD_NAME)
}

/// Element symbol from the element columns, or inferred from the atom name
/// when those are blank.
pub(crate) fn element(line: &str, is_hetatm: bool) -> String {
    let explicit = field(line, ELEMENT);
    if !explicit.is_empty() {
        return explicit.to_ascii_uppercase();
    }
    infer_element(line.get(ATOM_NAME).unwrap_or(""), is_hetatm)
}

/// Infer an element from a raw (untrimmed) four-column atom name.
///
/// Names are right-justified for one-letter elements, so a non-blank first
/// column on a hetero atom signals a two-letter element.
pub(crate) fn infer_element(raw_name: &str, is_hetatm: bool) -> String {
    let upper = raw_name.to_ascii_uppercase();
    if is_hetatm && upper.starts_with(|c: char| c.is_ascii_alphabetic()) {
        if let Some(two) = upper.get(..2) {
            if TWO_LETTER_ELEMENTS.contains(&two) {
                return two.to_owned();
            }
        }
    }
    upper
        .chars()
        .find(char::is_ascii_alphabetic)
        .map(String::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_give_empty_fields() {
        assert_eq!(field("ATOM", X), "");
        assert_eq!(column("ATOM", CHAIN_ID), b' ');
        assert_eq!(float_or("ATOM", OCCUPANCY, 1.0), Some(1.0));
    }

    #[test]
    fn garbage_optional_field_is_an_error() {
        let mut line = format!("{:<54}", "ATOM");
        line.push_str("  x.xx");
        assert_eq!(float_or(&line, OCCUPANCY, 1.0), None);
    }

    #[test]
    fn infers_elements_from_names() {
        assert_eq!(infer_element(" CA ", false), "C");
        assert_eq!(infer_element("1HB2", false), "H");
        assert_eq!(infer_element("FE  ", true), "FE");
        assert_eq!(infer_element(" O3'", false), "O");
        assert_eq!(infer_element("CA  ", true), "CA");
    }
}

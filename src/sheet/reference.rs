//! Parsing and resolution of cell range references in A1 notation.
//!
//! A reference names one or more rectangular areas, each optionally
//! qualified with a sheet name:
//!
//! - `A1`
//! - `$B$2:$B$10`
//! - `Sheet2!C3:D4`
//! - `'My Sheet'!$A$1:$C$10`
//! - `(Sheet1!$A$1:$A$2,Sheet1!$C$1:$C$2)` (union)
//!
//! [`RangeResolver::resolve`] flattens such a reference into the ordered list
//! of cells it covers: row-major inside each area, areas in the order they
//! appear in the text.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::charts::config::ExtractConfig;
use crate::common::error::{Error, Result};

bitflags! {
    /// Which parts of a coordinate were written in absolute form.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AddressFlags: u8 {
        /// Sheet was named explicitly
        const SHEET = 0b001;
        /// Row carried a `$` marker
        const ROW = 0b010;
        /// Column carried a `$` marker
        const COL = 0b100;
        /// Fully qualified
        const ABSOLUTE = Self::SHEET.bits() | Self::ROW.bits() | Self::COL.bits();
    }
}

/// A single cell address (0-based row and column).
///
/// Equality and hashing look only at sheet, row, and column; the absolute
/// markers in `flags` describe how the address was written and never take
/// part in comparisons. Compare coordinates after [`CellCoordinate::to_absolute`]
/// when one side may be unqualified.
#[derive(Debug, Clone)]
pub struct CellCoordinate {
    /// Sheet name, `None` when the address was written without one
    pub sheet: Option<String>,
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u32,
    /// Absolute/relative markers
    pub flags: AddressFlags,
}

impl CellCoordinate {
    /// Create an unqualified, relative coordinate.
    #[inline]
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            sheet: None,
            row,
            col,
            flags: AddressFlags::empty(),
        }
    }

    /// Create a fully qualified coordinate.
    #[inline]
    pub fn absolute(sheet: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            sheet: Some(sheet.into()),
            row,
            col,
            flags: AddressFlags::ABSOLUTE,
        }
    }

    /// Qualify this coordinate with a sheet name.
    #[inline]
    pub fn on_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self.flags |= AddressFlags::SHEET;
        self
    }

    /// Returns true if sheet, row, and column are all absolute.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.sheet.is_some() && self.flags.contains(AddressFlags::ABSOLUTE)
    }

    /// Normalize to absolute form, filling a missing sheet from `context_sheet`.
    pub fn to_absolute(&self, context_sheet: &str) -> CellCoordinate {
        CellCoordinate {
            sheet: Some(
                self.sheet
                    .clone()
                    .unwrap_or_else(|| context_sheet.to_string()),
            ),
            row: self.row,
            col: self.col,
            flags: AddressFlags::ABSOLUTE,
        }
    }

    /// Parse a single-cell reference such as `B2`, `$B$2`, or `Sheet1!B2`.
    pub fn parse(input: &str) -> Result<CellCoordinate> {
        let corner = parse_corner(input, input.trim())?;
        let mut coord = CellCoordinate {
            sheet: None,
            row: corner.row,
            col: corner.col,
            flags: corner.flags,
        };
        if let Some(sheet) = corner.sheet {
            coord = coord.on_sheet(sheet);
        }
        Ok(coord)
    }

    /// A1-style column letters for this coordinate.
    #[inline]
    pub fn column_letters(&self) -> String {
        column_index_to_letters(self.col)
    }
}

impl PartialEq for CellCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col && self.sheet == other.sheet
    }
}

impl Eq for CellCoordinate {}

impl Hash for CellCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sheet.hash(state);
        self.row.hash(state);
        self.col.hash(state);
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write_sheet_name(f, sheet)?;
            f.write_str("!")?;
        }
        write_a1(f, self.row, self.col, self.flags)
    }
}

/// One rectangular block of cells within a reference.
///
/// Corners are normalized on construction so `top <= bottom` and
/// `left <= right`, whatever order the reference text used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellArea {
    /// Sheet name, `None` when unqualified
    pub sheet: Option<String>,
    /// First row (0-based, inclusive)
    pub top: u32,
    /// First column (0-based, inclusive)
    pub left: u32,
    /// Last row (0-based, inclusive)
    pub bottom: u32,
    /// Last column (0-based, inclusive)
    pub right: u32,
    /// Absolute markers of the top-left corner
    pub start_flags: AddressFlags,
    /// Absolute markers of the bottom-right corner
    pub end_flags: AddressFlags,
}

impl CellArea {
    /// Create an unqualified area from two corners in any order.
    pub fn new(row_a: u32, col_a: u32, row_b: u32, col_b: u32) -> Self {
        Self {
            sheet: None,
            top: row_a.min(row_b),
            left: col_a.min(col_b),
            bottom: row_a.max(row_b),
            right: col_a.max(col_b),
            start_flags: AddressFlags::empty(),
            end_flags: AddressFlags::empty(),
        }
    }

    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> usize {
        (self.right - self.left) as usize + 1
    }

    /// Number of rows covered.
    #[inline]
    pub fn height(&self) -> usize {
        (self.bottom - self.top) as usize + 1
    }

    /// Total number of cells covered.
    #[inline]
    pub fn cell_count(&self) -> u64 {
        (self.width() as u64) * (self.height() as u64)
    }

    /// Iterate the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoordinate> + '_ {
        let flags = self.start_flags & self.end_flags;
        (self.top..=self.bottom).flat_map(move |row| {
            (self.left..=self.right).map(move |col| CellCoordinate {
                sheet: self.sheet.clone(),
                row,
                col,
                flags,
            })
        })
    }
}

impl fmt::Display for CellArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write_sheet_name(f, sheet)?;
            f.write_str("!")?;
        }
        write_a1(f, self.top, self.left, self.start_flags)?;
        if self.top != self.bottom || self.left != self.right {
            f.write_str(":")?;
            write_a1(f, self.bottom, self.right, self.end_flags)?;
        }
        Ok(())
    }
}

/// Resolves reference text into cell areas and flattened coordinate lists.
#[derive(Debug, Clone)]
pub struct RangeResolver {
    delimiter: char,
    max_cells: usize,
}

impl RangeResolver {
    /// Create a resolver with the default delimiter (`,`) and cell limit.
    #[inline]
    pub fn new() -> Self {
        Self::from_config(&ExtractConfig::default())
    }

    /// Create a resolver that follows `config`.
    #[inline]
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            delimiter: config.union_delimiter,
            max_cells: config.max_cells,
        }
    }

    /// Set the union delimiter.
    #[inline]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Union delimiter in use.
    #[inline]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Set the maximum number of cells a single reference may cover.
    #[inline]
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Parse a reference into its areas, in textual order.
    ///
    /// Blank input yields no areas.
    pub fn parse(&self, reference: &str) -> Result<SmallVec<[CellArea; 2]>> {
        let mut text = reference.trim();
        let mut areas = SmallVec::new();
        if text.is_empty() {
            return Ok(areas);
        }

        if text.starts_with('(') && text.ends_with(')') {
            text = text[1..text.len() - 1].trim();
        }

        let mut total: u64 = 0;
        for part in split_outside_quotes(text, self.delimiter) {
            let part = part.trim();
            if part.is_empty() {
                return Err(Error::parse(reference, "empty area in union"));
            }
            let area = parse_area(reference, part)?;
            total = total.saturating_add(area.cell_count());
            if total > self.max_cells as u64 {
                return Err(Error::RangeTooLarge {
                    formula: reference.to_string(),
                    cells: total,
                    limit: self.max_cells,
                });
            }
            areas.push(area);
        }
        Ok(areas)
    }

    /// Flatten a reference into an ordered list of coordinates.
    pub fn resolve(&self, reference: &str) -> Result<Vec<CellCoordinate>> {
        let areas = self.parse(reference)?;
        let count = areas.iter().map(|a| a.cell_count() as usize).sum();
        let mut coords = Vec::with_capacity(count);
        for area in &areas {
            coords.extend(area.cells());
        }
        Ok(coords)
    }
}

impl Default for RangeResolver {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a reference with default settings.
///
/// See [`RangeResolver::resolve`].
pub fn resolve(reference: &str) -> Result<Vec<CellCoordinate>> {
    RangeResolver::new().resolve(reference)
}

/// Convert a 0-based column index to letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_index_to_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col as u64 + 1;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

struct Corner {
    sheet: Option<String>,
    row: u32,
    col: u32,
    flags: AddressFlags,
}

fn parse_area(formula: &str, part: &str) -> Result<CellArea> {
    let corners: SmallVec<[&str; 2]> = split_outside_quotes(part, ':').collect();
    let (start, end) = match corners.as_slice() {
        [single] => {
            let c = parse_corner(formula, single)?;
            let end = Corner {
                sheet: None,
                row: c.row,
                col: c.col,
                flags: c.flags,
            };
            (c, end)
        },
        [first, second] => (parse_corner(formula, first)?, parse_corner(formula, second)?),
        _ => return Err(Error::parse(formula, "too many ':' in area")),
    };

    let sheet = match (start.sheet, end.sheet) {
        (Some(a), Some(b)) if a != b => {
            return Err(Error::parse(formula, "area spans two sheets"));
        },
        (Some(a), _) => Some(a),
        (None, Some(_)) => {
            return Err(Error::parse(formula, "sheet name only on the end corner"));
        },
        (None, None) => None,
    };

    let mut area = CellArea::new(start.row, start.col, end.row, end.col);
    area.start_flags = start.flags;
    area.end_flags = end.flags;
    if let Some(sheet) = sheet {
        area.sheet = Some(sheet);
        area.start_flags |= AddressFlags::SHEET;
        area.end_flags |= AddressFlags::SHEET;
    }
    Ok(area)
}

fn parse_corner(formula: &str, text: &str) -> Result<Corner> {
    let text = text.trim();
    // The cell part never contains '!', so the last one ends the sheet name.
    let (sheet, cell) = match memchr::memrchr(b'!', text.as_bytes()) {
        Some(pos) => {
            let sheet = unescape_sheet_name(&text[..pos])
                .ok_or_else(|| Error::parse(formula, "invalid sheet name"))?;
            (Some(sheet), &text[pos + 1..])
        },
        None => (None, text),
    };

    let (row, col, flags) = parse_a1_ref(cell).ok_or_else(|| {
        let cell = cell.trim_matches('$');
        if !cell.is_empty()
            && (cell.bytes().all(|b| b.is_ascii_alphabetic())
                || cell.bytes().all(|b| b.is_ascii_digit()))
        {
            Error::parse(formula, "whole-row and whole-column references are unsupported")
        } else {
            Error::parse(formula, format!("invalid cell address '{}'", cell))
        }
    })?;

    Ok(Corner {
        sheet,
        row,
        col,
        flags,
    })
}

/// Split `text` on `delimiter`, ignoring delimiters inside single quotes.
fn split_outside_quotes(text: &str, delimiter: char) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if ch == '\'' {
            in_quote = !in_quote;
        } else if ch == delimiter && !in_quote {
            parts.push(&text[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts.into_iter()
}

fn unescape_sheet_name(sheet: &str) -> Option<String> {
    let trimmed = sheet.trim();
    let bytes = trimmed.as_bytes();
    if bytes.first() == Some(&b'\'') {
        if bytes.len() < 3 || bytes.last() != Some(&b'\'') {
            return None;
        }
        // Strip outer quotes and unescape doubled quotes.
        let inner = &trimmed[1..trimmed.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\'' {
                if chars.peek() != Some(&'\'') {
                    return None;
                }
                chars.next();
            }
            out.push(ch);
        }
        Some(out)
    } else if !trimmed.is_empty() && !trimmed.contains('\'') {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Parse `[$]COL[$]ROW` into a 0-based (row, col) plus absolute markers.
fn parse_a1_ref(cell: &str) -> Option<(u32, u32, AddressFlags)> {
    let mut flags = AddressFlags::empty();
    let mut rest = cell.trim();

    if let Some(stripped) = rest.strip_prefix('$') {
        flags |= AddressFlags::COL;
        rest = stripped;
    }

    let letters_end = rest
        .bytes()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if letters_end == 0 {
        return None;
    }
    let (letters, mut rest) = rest.split_at(letters_end);

    if let Some(stripped) = rest.strip_prefix('$') {
        flags |= AddressFlags::ROW;
        rest = stripped;
    }

    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let col = column_letters_to_index(letters)?;
    let row = rest.parse::<u32>().ok()?.checked_sub(1)?;
    Some((row, col, flags))
}

fn column_letters_to_index(col: &str) -> Option<u32> {
    let mut result: u32 = 0;
    for b in col.bytes() {
        let value = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        result = result.checked_mul(26)?.checked_add(value)?;
    }
    result.checked_sub(1)
}

fn write_a1(f: &mut fmt::Formatter<'_>, row: u32, col: u32, flags: AddressFlags) -> fmt::Result {
    if flags.contains(AddressFlags::COL) {
        f.write_str("$")?;
    }
    f.write_str(&column_index_to_letters(col))?;
    if flags.contains(AddressFlags::ROW) {
        f.write_str("$")?;
    }
    let mut buf = itoa::Buffer::new();
    f.write_str(buf.format(row as u64 + 1))
}

fn write_sheet_name(f: &mut fmt::Formatter<'_>, sheet: &str) -> fmt::Result {
    let plain = !sheet.is_empty()
        && !sheet.as_bytes()[0].is_ascii_digit()
        && sheet.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
    if plain {
        f.write_str(sheet)
    } else {
        write!(f, "'{}'", sheet.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a1(sheet: &str, text: &str) -> CellCoordinate {
        let c = CellCoordinate::parse(text).unwrap();
        CellCoordinate::absolute(sheet, c.row, c.col)
    }

    #[test]
    fn test_single_area_row_order() {
        let coords = resolve("Sheet1!$A$1:$A$4").unwrap();
        assert_eq!(coords.len(), 4);
        for (i, c) in coords.iter().enumerate() {
            assert_eq!(c.sheet.as_deref(), Some("Sheet1"));
            assert_eq!(c.row, i as u32);
            assert_eq!(c.col, 0);
            assert!(c.is_absolute());
        }
    }

    #[test]
    fn test_union_preserves_area_order() {
        let coords = resolve("A1:A2,C1:C2").unwrap();
        let rendered: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["A1", "A2", "C1", "C2"]);
    }

    #[test]
    fn test_parenthesized_union_with_sheets() {
        let coords = resolve("(Data!$B$1:$B$2,'Other Sheet'!$D$5)").unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], a1("Data", "B1"));
        assert_eq!(coords[1], a1("Data", "B2"));
        assert_eq!(coords[2], a1("Other Sheet", "D5"));
    }

    #[test]
    fn test_block_is_row_major() {
        let coords = resolve("A1:B2").unwrap();
        let rendered: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_reversed_corners_normalize() {
        let forward = resolve("A1:B3").unwrap();
        let reversed = resolve("B3:A1").unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_blank_reference_is_empty() {
        assert!(resolve("").unwrap().is_empty());
        assert!(resolve("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_sheet_with_delimiter_and_escape() {
        let coords = resolve("'Q1, ''24'!A1:A2").unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].sheet.as_deref(), Some("Q1, '24"));
    }

    #[test]
    fn test_sheet_repeated_on_end_corner() {
        let coords = resolve("S!A1:S!A3").unwrap();
        assert_eq!(coords.len(), 3);
        assert!(matches!(
            resolve("S!A1:T!A3"),
            Err(Error::FormulaParse { .. })
        ));
    }

    #[test]
    fn test_invalid_references() {
        for bad in ["A", "A1:", "1A", "A0", "A1:B2:C3", "A1,,B1", "'Open!A1", "A:A", "1:1"] {
            assert!(
                matches!(resolve(bad), Err(Error::FormulaParse { .. })),
                "expected parse error for {bad:?}"
            );
        }
    }

    #[test]
    fn test_cell_limit() {
        let resolver = RangeResolver::new().with_max_cells(10);
        assert!(resolver.resolve("A1:A10").is_ok());
        assert!(matches!(
            resolver.resolve("A1:A10,B1"),
            Err(Error::RangeTooLarge { cells: 11, .. })
        ));
    }

    #[test]
    fn test_custom_delimiter() {
        let resolver = RangeResolver::new().with_delimiter(';');
        assert_eq!(resolver.resolve("A1;B1").unwrap().len(), 2);
    }

    #[test]
    fn test_equality_ignores_absolute_markers() {
        let relative = CellCoordinate::parse("Sheet1!A2").unwrap();
        let absolute = CellCoordinate::parse("Sheet1!$A$2").unwrap();
        assert_eq!(relative, absolute);
        assert_ne!(relative.flags, absolute.flags);
    }

    #[test]
    fn test_to_absolute_fills_sheet() {
        let c = CellCoordinate::parse("B7").unwrap().to_absolute("Sales");
        assert_eq!(c, CellCoordinate::absolute("Sales", 6, 1));
        assert!(c.is_absolute());
    }

    #[test]
    fn test_area_display() {
        let areas = RangeResolver::new()
            .parse("'My Sheet'!$A$1:$C$10")
            .unwrap();
        assert_eq!(areas[0].to_string(), "'My Sheet'!$A$1:$C$10");
        assert_eq!(column_index_to_letters(27), "AB");
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_area_resolves_row_major(
                top in 0u32..200,
                left in 0u32..60,
                height in 1u32..12,
                width in 1u32..12,
            ) {
                let area = CellArea::new(top, left, top + height - 1, left + width - 1);
                let coords = resolve(&area.to_string()).unwrap();

                prop_assert_eq!(coords.len(), (height * width) as usize);
                for (i, c) in coords.iter().enumerate() {
                    let i = i as u32;
                    prop_assert_eq!(c.row, top + i / width);
                    prop_assert_eq!(c.col, left + i % width);
                }
            }
        }
    }
}

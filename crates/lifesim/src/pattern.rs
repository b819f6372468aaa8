//! Pattern import and export.
//!
//! Two interchange formats are decoded, RLE (`.rle`) and Life 1.05
//! (`.lif`, `.lif.txt`), plus this tool's own JSON save format (`.json`),
//! which is a flat array of `"row,col"` keys. The text decoders never fail:
//! unknown characters are skipped and malformed headers read as zero.

use std::str::FromStr;

use tracing::warn;

use crate::cell::{Bounds, CellKey, Position};
use crate::error::{LifeError, Result};
use crate::LiveCells;

/// Longest run a single RLE token may expand to.
pub const MAX_RUN: u32 = 1 << 16;

/// Decoded cells relative to the pattern's top-left corner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    /// Offsets in file order; the minimum row and column are both 0.
    pub cells: Vec<Position>,
    pub width: u32,
    pub height: u32,
}

impl Pattern {
    /// Shifts cells so the minimum row and column become 0. Cells whose offset
    /// from the minimum does not fit an `i32` are dropped.
    fn normalized(cells: Vec<Position>, width: u32, height: u32) -> Self {
        let min_row = cells.iter().map(|p| i64::from(p.row)).min().unwrap_or(0);
        let min_col = cells.iter().map(|p| i64::from(p.col)).min().unwrap_or(0);
        let total = cells.len();
        let cells: Vec<Position> = cells
            .into_iter()
            .filter_map(|p| {
                let row = i32::try_from(i64::from(p.row) - min_row).ok()?;
                let col = i32::try_from(i64::from(p.col) - min_col).ok()?;
                Some(Position::new(row, col))
            })
            .collect();
        if cells.len() < total {
            warn!(dropped = total - cells.len(), "pattern cells out of range");
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Normalized cells with width and height measured from the kept cells.
    fn measured(cells: Vec<Position>) -> Self {
        let mut pattern = Self::normalized(cells, 0, 0);
        (pattern.width, pattern.height) = Bounds::enclosing(pattern.cells.iter().copied())
            .map_or((0, 0), |b| (b.width(), b.height()));
        pattern
    }

    /// Extent used for placement: the declared size, or the measured one when
    /// the header left it at zero.
    #[must_use]
    pub fn span(&self) -> (u32, u32) {
        let measured = Bounds::enclosing(self.cells.iter().copied())
            .map_or((0, 0), |b| (b.width(), b.height()));
        let width = if self.width == 0 { measured.0 } else { self.width };
        let height = if self.height == 0 { measured.1 } else { self.height };
        (width, height)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PatternFormat {
    Rle,
    Life,
    Json,
}

impl PatternFormat {
    /// Picks the decoder from a file name's suffix, case-insensitively.
    ///
    /// # Errors
    ///
    /// [`LifeError::UnsupportedFormat`] for any other suffix.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.ends_with(".rle") {
            Ok(Self::Rle)
        } else if lower.ends_with(".lif") || lower.ends_with(".lif.txt") {
            Ok(Self::Life)
        } else if lower.ends_with(".json") {
            Ok(Self::Json)
        } else {
            Err(LifeError::unsupported(name))
        }
    }
}

impl FromStr for PatternFormat {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rle" => Ok(Self::Rle),
            "lif" | "life" | "lif.txt" => Ok(Self::Life),
            "json" => Ok(Self::Json),
            other => Self::from_file_name(other),
        }
    }
}

/// Decodes `text` with the given format.
///
/// # Errors
///
/// Only the JSON format can fail; see [`decode_json`].
pub fn decode(text: &str, format: PatternFormat) -> Result<Pattern> {
    match format {
        PatternFormat::Rle => Ok(decode_rle(text)),
        PatternFormat::Life => Ok(decode_life(text)),
        PatternFormat::Json => decode_json(text),
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Reads `x = W, y = H` out of an RLE header line.
fn parse_rle_header(line: &str) -> Option<(u32, u32)> {
    let mut width = None;
    let mut height = None;
    for field in line.split(',') {
        let Some((name, value)) = field.split_once('=') else {
            continue;
        };
        let value = value.trim().parse::<u32>().ok();
        match name.trim() {
            "x" => width = value,
            "y" => height = value,
            _ => {}
        }
    }
    Some((width?, height?))
}

fn is_rle_header(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('x') && line.contains('=')
}

/// Decodes run-length encoded text.
///
/// `b` skips dead cells, `o` emits live ones, `$` ends rows and `!` stops.
/// A missing count means 1. Width and height come from the header and do not
/// clip the decoded cells.
#[must_use]
pub fn decode_rle(text: &str) -> Pattern {
    let lines: Vec<&str> = content_lines(text)
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect();
    let header = lines.iter().position(|line| is_rle_header(line));
    let (width, height) = header
        .and_then(|i| parse_rle_header(lines[i]))
        .unwrap_or((0, 0));

    let mut cells = Vec::new();
    let (mut row, mut col) = (0i32, 0i32);
    let mut count: Option<u32> = None;

    'decode: for (_, line) in lines.iter().enumerate().filter(|&(i, _)| Some(i) != header) {
        for c in line.chars() {
            match c {
                '0'..='9' => {
                    let digit = c.to_digit(10).unwrap_or(0);
                    count = Some(
                        count
                            .unwrap_or(0)
                            .saturating_mul(10)
                            .saturating_add(digit)
                            .min(MAX_RUN),
                    );
                }
                'b' => {
                    col = col.saturating_add(count.take().unwrap_or(1) as i32);
                }
                'o' => {
                    for _ in 0..count.take().unwrap_or(1) {
                        cells.push(Position::new(row, col));
                        col = col.saturating_add(1);
                    }
                }
                '$' => {
                    row = row.saturating_add(count.take().unwrap_or(1) as i32);
                    col = 0;
                }
                '!' => break 'decode,
                _ => {}
            }
        }
    }

    Pattern::normalized(cells, width, height)
}

/// `#P x y` or `P x y` block origin, as `(x, y)`.
fn parse_marker(line: &str) -> Option<(i32, i32)> {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('#').unwrap_or(rest);
    let rest = rest.strip_prefix(|c: char| c == 'P' || c == 'p')?;
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    let mut parts = rest.split_whitespace().map(|v| v.parse::<i32>().unwrap_or(0));
    Some((parts.next().unwrap_or(0), parts.next().unwrap_or(0)))
}

/// Decodes Life 1.05 text.
///
/// Each `#P x y` marker starts a block whose following lines are rows, `*`
/// marking a live cell at `(y + row, x + column)`. Rows before the first marker
/// belong to an implicit block at the origin. Other `#` lines are comments.
#[must_use]
pub fn decode_life(text: &str) -> Pattern {
    let mut cells = Vec::new();
    let (mut origin_x, mut row) = (0i32, 0i32);

    for line in content_lines(text) {
        if let Some((x, y)) = parse_marker(line) {
            origin_x = x;
            row = y;
            continue;
        }
        if line.trim_start().starts_with('#') {
            continue;
        }
        for (offset, c) in line.chars().enumerate() {
            if c == '*' {
                cells.push(Position::new(row, origin_x.saturating_add(offset as i32)));
            }
        }
        row = row.saturating_add(1);
    }

    Pattern::measured(cells)
}

/// Serializes the live set as a JSON array of `"row,col"` strings, sorted so
/// equal boards export identically.
#[must_use]
pub fn encode_json(live: &LiveCells) -> String {
    let mut keys: Vec<CellKey> = live.iter().copied().collect();
    keys.sort_unstable_by_key(|k| k.decode());
    let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
    serde_json::to_string(&keys).unwrap_or_else(|_| "[]".to_owned())
}

/// Reads an array produced by [`encode_json`] back into a pattern.
///
/// # Errors
///
/// [`LifeError::Json`] when the text is not an array of strings,
/// [`LifeError::InvalidKey`] when an element is not `row,col`.
pub fn decode_json(text: &str) -> Result<Pattern> {
    let keys: Vec<String> = serde_json::from_str(text)?;
    let cells = keys
        .iter()
        .map(|k| k.parse::<CellKey>().map(CellKey::decode))
        .collect::<Result<Vec<_>>>()?;
    Ok(Pattern::measured(cells))
}

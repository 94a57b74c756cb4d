//! Dotted-segment account codes.
//!
//! A code such as `1.2.3` is a path from a root account down the tree. The
//! helpers here are pure value operations; range checking happens at the
//! request boundary through [`check_format`].

use std::{cmp::Ordering, fmt, str::FromStr};

/// Smallest value a segment may take.
pub const MIN_SEGMENT: u32 = 1;

/// Largest value a segment may take. A container whose last child reached this
/// value is full.
pub const MAX_SEGMENT: u32 = 999;

/// Root accounts are single-segment codes, so they share the segment ceiling.
pub const MAX_ROOT_ACCOUNTS: u32 = MAX_SEGMENT;

/// Longest textual segment accepted at the boundary.
const MAX_SEGMENT_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCodeError {
    #[error("code is empty")]
    Empty,

    #[error("code has an empty segment")]
    EmptySegment,

    #[error("segment '{0}' is not a number")]
    NotANumber(String),
}

/// Parsed account code.
///
/// Ordering is segment-wise and numeric, so `1.2 < 1.10 < 2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeAddress {
    segments: Vec<u32>,
}

impl CodeAddress {
    pub fn root(segment: u32) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Number of segments; roots have depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.depth() == 1
    }

    /// Final segment, i.e. the position among siblings.
    pub fn last(&self) -> u32 {
        // Parsing rejects empty codes, so there is always a last segment.
        self.segments[self.depth() - 1]
    }

    /// Address with the last segment dropped, `None` for roots.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.depth() - 1].to_vec(),
        })
    }

    /// Address of the `segment`-th child of this one.
    pub fn child(&self, segment: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// True iff `self` has exactly one more segment than `parent` and shares its prefix.
    pub fn is_direct_child_of(&self, parent: &CodeAddress) -> bool {
        self.depth() == parent.depth() + 1 && self.segments.starts_with(parent.segments())
    }
}

impl FromStr for CodeAddress {
    type Err = ParseCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code.is_empty() {
            return Err(ParseCodeError::Empty);
        }

        let segments = code
            .split('.')
            .map(|segment| {
                if segment.is_empty() {
                    return Err(ParseCodeError::EmptySegment);
                }
                segment
                    .parse::<u32>()
                    .map_err(|_| ParseCodeError::NotANumber(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }
}

impl fmt::Display for CodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(self.segments()))
    }
}

impl Ord for CodeAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl PartialOrd for CodeAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a code into its numeric segments.
pub fn parse(code: &str) -> Result<Vec<u32>, ParseCodeError> {
    code.parse::<CodeAddress>().map(|address| address.segments)
}

/// Inverse of [`parse`].
pub fn join(segments: &[u32]) -> String {
    segments
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Structural direct-child test over raw codes. Unparsable input is never a child.
pub fn is_direct_child(child_code: &str, parent_code: &str) -> bool {
    match (
        child_code.parse::<CodeAddress>(),
        parent_code.parse::<CodeAddress>(),
    ) {
        (Ok(child), Ok(parent)) => child.is_direct_child_of(&parent),
        _ => false,
    }
}

/// Code of the structural parent, `None` for roots and unparsable input.
pub fn parent_of(code: &str) -> Option<String> {
    code.parse::<CodeAddress>()
        .ok()?
        .parent()
        .map(|parent| parent.to_string())
}

/// Boundary format violations for user-supplied codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Code is required")]
    Empty,

    #[error("Invalid format. Use: 999.999.999")]
    Shape,

    #[error("Each segment must be between 1 and 999")]
    OutOfRange,
}

/// Check the `999.999.999` input shape and the `[1, 999]` segment range.
pub fn check_format(code: &str) -> Result<(), FormatError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(FormatError::Empty);
    }

    for segment in code.split('.') {
        let well_shaped = !segment.is_empty()
            && segment.len() <= MAX_SEGMENT_DIGITS
            && segment.bytes().all(|b| b.is_ascii_digit());
        if !well_shaped {
            return Err(FormatError::Shape);
        }
    }

    // Shape check above guarantees every segment parses.
    let in_range = code
        .split('.')
        .filter_map(|segment| segment.parse::<u32>().ok())
        .all(|value| (MIN_SEGMENT..=MAX_SEGMENT).contains(&value));
    if !in_range {
        return Err(FormatError::OutOfRange);
    }

    Ok(())
}

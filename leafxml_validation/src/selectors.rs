/*!
# Constants and utilities for matching ranges of codepoints

The contents of this module are implementation details of `leafxml` and
`leafxml_validation` and should not be relied upon.
*/
use std::fmt;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

impl CharSelector for &'_ [char] {
	fn select(&self, c: char) -> bool {
		for r in self.iter() {
			if *r == c {
				return true;
			}
		}
		false
	}
}

// start to end (incl., because some of the edge points are not valid chars
// in rust)
/// Selects all chars from a range (including both ends)
pub struct CodepointRange(pub char, pub char);

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		(self.0 <= c) && (c <= self.1)
	}
}

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

/// Selects all chars from any of the contained ranges
#[derive(Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		contained_in_ranges(c, self.0)
	}
}

pub fn contained_in_ranges(c: char, rs: &[CodepointRange]) -> bool {
	for r in rs.iter() {
		if r.contains(c) {
			return true;
		}
	}
	false
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

impl Clone for CodepointRanges {
	fn clone(&self) -> Self {
		CodepointRanges(self.0)
	}
}

impl PartialEq for CodepointRanges {
	fn eq(&self, other: &CodepointRanges) -> bool {
		std::ptr::eq(&self.0, &other.0)
	}
}

/// Codepoints accepted anywhere in a LeafXML document.
///
/// This is narrower than the XML 1.0 `Char` production: C0 controls other
/// than Tab/LF/CR stay excluded, C1 controls are excluded except NEL
/// (`U+0085`, which is folded into a line feed on input), and the
/// noncharacter block `U+FDD0..=U+FDEF` is excluded.
///
/// The per-plane noncharacters (codepoints whose low 16 bits are `0xFFFE`
/// or `0xFFFF`) are *not* representable as contiguous ranges and are
/// excluded by a separate mask test in
/// [`valid_codepoint`](crate::valid_codepoint).
pub const VALID_LEAFXML_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\u{0009}', '\u{000a}'),
	CodepointRange('\u{000d}', '\u{000d}'),
	CodepointRange('\u{0020}', '\u{007e}'),
	CodepointRange('\u{0085}', '\u{0085}'),
	CodepointRange('\u{00a0}', '\u{d7ff}'),
	CodepointRange('\u{e000}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{10fffd}'),
];

// XML 1.0 § 2.3 [4a], with ':' included; prefix handling happens after
// name validation.
const VALID_XML_NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('-', '-'),
	CodepointRange('.', '.'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('0', '9'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{300}', '\u{36f}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

// Name codepoints which may not start a name: the digit/combiner
// exclusion set.
const NAME_START_EXCLUSION_RANGES: &'static [CodepointRange] = &[
	CodepointRange('-', '-'),
	CodepointRange('.', '.'),
	CodepointRange('0', '9'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{300}', '\u{36f}'),
	CodepointRange('\u{203f}', '\u{2040}'),
];

/// Codepoints accepted in a LeafXML document (modulo the per-plane
/// noncharacter mask; see [`VALID_LEAFXML_CHAR_RANGES`])
pub static CLASS_LEAFXML_CHAR: CodepointRanges = CodepointRanges(VALID_LEAFXML_CHAR_RANGES);

/// Valid characters for an XML Name (XML 1.0 § 2.3 \[4a\])
pub static CLASS_XML_NAME: CodepointRanges = CodepointRanges(VALID_XML_NAME_RANGES);

/// Name characters which are not allowed as the first character of a name
pub static CLASS_NAME_START_EXCLUDED: CodepointRanges =
	CodepointRanges(NAME_START_EXCLUSION_RANGES);

/*!
# Validator functions for LeafXML strings

This is a supplementary crate for `leafxml`. It holds the pure codepoint
predicates of the decoder: membership in the LeafXML character set and the
name well-formedness checks. It is factored out of the main crate so that
tooling can validate names and text without pulling in the decoder.
*/
use std::fmt;

pub mod selectors;

use selectors::CharSelector;

/**
Error condition from validating a string.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A name was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("names must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04X} is not allowed", *c as u32),
		}
	}
}

impl std::error::Error for Error {}

/**
Check whether a codepoint is in the LeafXML character set.

The set consists of Tab, LF, CR, the printable ASCII range, NEL, and the
non-control Unicode ranges, minus the `U+FDD0..=U+FDEF` noncharacters and
minus every codepoint whose low 16 bits are `0xFFFE` or `0xFFFF`.

# Example

```rust
use leafxml_validation::valid_codepoint;

assert!(valid_codepoint('\n'));
assert!(valid_codepoint('ä'));
assert!(!valid_codepoint('\x07'));
assert!(!valid_codepoint('\u{fffe}'));
assert!(!valid_codepoint('\u{3fffe}'));
```
*/
pub fn valid_codepoint(c: char) -> bool {
	// per-plane noncharacters cannot be expressed as contiguous ranges
	if (c as u32) & 0xffff >= 0xfffe {
		return false;
	}
	selectors::CLASS_LEAFXML_CHAR.select(c)
}

/**
Check whether every codepoint of a str is in the LeafXML character set.

The empty string passes. The first offending codepoint is reported.

# Example

```rust
use leafxml_validation::{validate_string, Error};

assert!(validate_string("foo bar <&> baz").is_ok());
assert!(validate_string("").is_ok());
assert!(matches!(validate_string("a\x01b"), Err(Error::InvalidChar('\x01'))));
```
*/
pub fn validate_string(s: &str) -> Result<(), Error> {
	for ch in s.chars() {
		if !valid_codepoint(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

/**
Check whether a codepoint may start a name.

True iff the codepoint is in the XML name class and not in the
digit/combiner exclusion set (`-`, `.`, decimal digits, `U+00B7`,
`U+0300..=U+036F`, `U+203F`, `U+2040`).
*/
pub fn name_start_allowed(c: char) -> bool {
	selectors::CLASS_XML_NAME.select(c) && !selectors::CLASS_NAME_START_EXCLUDED.select(c)
}

/**
Check whether a str is a valid LeafXML name.

A name is non-empty, consists only of XML name codepoints, and does not
start with a codepoint from the digit/combiner exclusion set.

**Note:** This does *not* constrain the use of colons; qualified-name
splitting happens after name validation.

# Example

```rust
use leafxml_validation::{validate_name, Error};

assert!(validate_name("foobar").is_ok());
assert!(validate_name("foo:bar").is_ok());
assert!(matches!(validate_name("foo bar"), Err(Error::InvalidChar(' '))));
assert!(matches!(validate_name("-foo"), Err(Error::InvalidChar('-'))));
assert!(matches!(validate_name(""), Err(Error::EmptyName)));
```
*/
pub fn validate_name(s: &str) -> Result<(), Error> {
	let mut chars = s.chars();
	match chars.next() {
		// must have at least one char
		None => return Err(Error::EmptyName),
		Some(c) => {
			if !name_start_allowed(c) {
				return Err(Error::InvalidChar(c));
			}
		}
	}
	for ch in chars {
		if !selectors::CLASS_XML_NAME.select(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

/*!
# Entity and character-reference decoder

Expands the five named escapes (`&amp; &lt; &gt; &apos; &quot;`) and
decimal/hexadecimal character references. A bare `&` is an error, as is
any reference decoding to a codepoint outside the supported set.

The decoder operates on text which already had its line breaks normalized;
it advances an internal line counter over embedded LFs so that per-escape
failures point at the right line.
*/
use leafxml_validation::valid_codepoint;

use crate::error::{ParseError, ParseErrorKind};

// longest valid decimal reference has 8 digits, hexadecimal 6
const MAX_DECIMAL_DIGITS: usize = 8;
const MAX_HEX_DIGITS: usize = 6;

/// Decode all escapes in `s`, which starts on 1-based line `start_line`.
pub fn decode(s: &str, start_line: usize) -> Result<String, ParseError> {
	let mut out = String::with_capacity(s.len());
	let mut line = start_line;
	let mut rest = s;
	while let Some(pos) = rest.find(|c| c == '&' || c == '\n') {
		out.push_str(&rest[..pos]);
		if rest.as_bytes()[pos] == b'\n' {
			out.push('\n');
			line += 1;
			rest = &rest[pos + 1..];
			continue;
		}
		rest = &rest[pos + 1..];
		let semicolon = rest.find(';');
		let next_amp = rest.find('&');
		let body = match (semicolon, next_amp) {
			// the escape must close before another '&' starts
			(Some(sc), Some(amp)) if amp < sc => {
				return Err(ParseError::new(ParseErrorKind::BareAmpersand, line))
			}
			(Some(sc), _) => &rest[..sc],
			(None, _) => return Err(ParseError::new(ParseErrorKind::BareAmpersand, line)),
		};
		rest = &rest[body.len() + 1..];
		out.push(decode_escape(body, line)?);
		line += body.matches('\n').count();
	}
	out.push_str(rest);
	Ok(out)
}

/// Decode a single escape body (the part between `&` and `;`).
fn decode_escape(body: &str, line: usize) -> Result<char, ParseError> {
	match body {
		"amp" => return Ok('&'),
		"lt" => return Ok('<'),
		"gt" => return Ok('>'),
		"apos" => return Ok('\''),
		"quot" => return Ok('"'),
		_ => (),
	}
	if let Some(digits) = body.strip_prefix("#x") {
		if digits.is_empty()
			|| digits.len() > MAX_HEX_DIGITS
			|| !digits.bytes().all(|b| b.is_ascii_hexdigit())
		{
			return Err(ParseError::new(ParseErrorKind::InvalidEscape, line));
		}
		// cannot overflow: at most 6 hex digits
		let cp = u32::from_str_radix(digits, 16).unwrap();
		return checked_codepoint(cp, line);
	}
	if let Some(digits) = body.strip_prefix('#') {
		// note: an uppercase "#X…" lands here and is rejected below
		if digits.is_empty()
			|| digits.len() > MAX_DECIMAL_DIGITS
			|| !digits.bytes().all(|b| b.is_ascii_digit())
		{
			return Err(ParseError::new(ParseErrorKind::InvalidEscape, line));
		}
		// cannot overflow: at most 8 decimal digits
		let cp: u32 = digits.parse().unwrap();
		return checked_codepoint(cp, line);
	}
	if body.is_empty() {
		return Err(ParseError::new(ParseErrorKind::InvalidEscape, line));
	}
	Err(ParseError::new(ParseErrorKind::UnknownEntity, line))
}

fn checked_codepoint(cp: u32, line: usize) -> Result<char, ParseError> {
	match char::from_u32(cp) {
		Some(c) if valid_codepoint(c) => Ok(c),
		_ => Err(ParseError::new(ParseErrorKind::EscapeOutOfRange(cp), line)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kind_of(r: Result<String, ParseError>) -> ParseErrorKind {
		r.err().unwrap().kind().clone()
	}

	#[test]
	fn named_escapes_expand() {
		assert_eq!(
			decode("a &amp; b &lt;c&gt; &apos;d&apos; &quot;e&quot;", 1).unwrap(),
			"a & b <c> 'd' \"e\""
		);
	}

	#[test]
	fn numeric_escapes_expand() {
		assert_eq!(decode("&#65;&#x41;&#x4a;&#x4A;", 1).unwrap(), "AAJJ");
		assert_eq!(decode("&#xe4;", 1).unwrap(), "\u{e4}");
		assert_eq!(decode("&#10;", 1).unwrap(), "\n");
		assert_eq!(decode("&#x10FFFD;", 1).unwrap(), "\u{10fffd}");
	}

	#[test]
	fn text_without_escapes_is_copied() {
		assert_eq!(decode("no escapes at all", 5).unwrap(), "no escapes at all");
		assert_eq!(decode("", 1).unwrap(), "");
	}

	#[test]
	fn bare_ampersand_is_rejected() {
		assert_eq!(kind_of(decode("a & b", 1)), ParseErrorKind::BareAmpersand);
		assert_eq!(kind_of(decode("a &amp b", 1)), ParseErrorKind::BareAmpersand);
		assert_eq!(
			kind_of(decode("a &amp&amp; b", 1)),
			ParseErrorKind::BareAmpersand
		);
		assert_eq!(kind_of(decode("&", 1)), ParseErrorKind::BareAmpersand);
	}

	#[test]
	fn unknown_entities_are_rejected() {
		assert_eq!(kind_of(decode("&nbsp;", 1)), ParseErrorKind::UnknownEntity);
		assert_eq!(kind_of(decode("&AMP;", 1)), ParseErrorKind::UnknownEntity);
	}

	#[test]
	fn malformed_references_are_rejected() {
		assert_eq!(kind_of(decode("&;", 1)), ParseErrorKind::InvalidEscape);
		assert_eq!(kind_of(decode("&#;", 1)), ParseErrorKind::InvalidEscape);
		assert_eq!(kind_of(decode("&#x;", 1)), ParseErrorKind::InvalidEscape);
		assert_eq!(kind_of(decode("&#1a;", 1)), ParseErrorKind::InvalidEscape);
		// the x must be lowercase
		assert_eq!(kind_of(decode("&#X41;", 1)), ParseErrorKind::InvalidEscape);
		// length limits: 9 decimal digits / 7 hex digits
		assert_eq!(
			kind_of(decode("&#000000065;", 1)),
			ParseErrorKind::InvalidEscape
		);
		assert_eq!(
			kind_of(decode("&#x0000041;", 1)),
			ParseErrorKind::InvalidEscape
		);
	}

	#[test]
	fn out_of_range_references_are_rejected() {
		assert_eq!(
			kind_of(decode("&#0;", 1)),
			ParseErrorKind::EscapeOutOfRange(0)
		);
		assert_eq!(
			kind_of(decode("&#x8;", 1)),
			ParseErrorKind::EscapeOutOfRange(8)
		);
		// surrogate
		assert_eq!(
			kind_of(decode("&#xd800;", 1)),
			ParseErrorKind::EscapeOutOfRange(0xd800)
		);
		// per-plane noncharacter
		assert_eq!(
			kind_of(decode("&#xfffe;", 1)),
			ParseErrorKind::EscapeOutOfRange(0xfffe)
		);
	}

	#[test]
	fn errors_carry_the_line_of_the_escape() {
		let err = decode("one\ntwo\nthree &bogus; four", 4).err().unwrap();
		assert_eq!(err.line(), Some(6));
		let err = decode("fine & here", 9).err().unwrap();
		assert_eq!(err.line(), Some(9));
	}
}

/*!
# Tag token parser

Takes a tag token (the full `<…>` lexeme, line breaks normalized) apart
into its kind, element name and attribute items. Attribute values get the
full decode treatment here: entity expansion, whitespace compression and
NFC normalization. Names are NFC-normalized before validation.

Each attribute records two line numbers, one for the name and one for the
value, so diagnostics can point at the exact field even when a tag spans
several lines.
*/
use std::convert::TryFrom;

use crate::entities;
use crate::error::{ParseError, ParseErrorKind};
use crate::norm;
use crate::strings::Name;

/// Kind of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
	/// `<name …>`
	Start,
	/// `<name …/>`
	Empty,
	/// `</name>`
	End,
}

/// A single attribute item of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// NFC-normalized attribute name, verbatim including any prefix.
	pub name: Name,
	/// Fully decoded value: entities expanded, whitespace compressed,
	/// NFC-normalized.
	pub value: String,
	/// 1-based line of the attribute name.
	pub name_line: usize,
	/// 1-based line of the attribute value.
	pub value_line: usize,
}

/// Parse result of a tag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
	pub kind: TagKind,
	/// NFC-normalized element name, verbatim including any prefix.
	pub name: Name,
	/// Attribute items in document order.
	pub attrs: Vec<Attribute>,
	/// 1-based starting line of the tag.
	pub line: usize,
}

/// Parse a tag token starting on the given 1-based line.
pub fn parse_tag(token: &str, line: usize) -> Result<ParsedTag, ParseError> {
	// the lexer guarantees the "<" and ">" delimiters
	let inner = &token[1..token.len() - 1];
	let (leading_slash, inner) = match inner.strip_prefix('/') {
		Some(rest) => (true, rest),
		None => (false, inner),
	};
	let (trailing_slash, inner) = match inner.strip_suffix('/') {
		Some(rest) => (true, rest),
		None => (false, inner),
	};
	if leading_slash && trailing_slash {
		return Err(ParseError::new(ParseErrorKind::TagParseFailed, line));
	}
	let kind = if leading_slash {
		TagKind::End
	} else if trailing_slash {
		TagKind::Empty
	} else {
		TagKind::Start
	};

	let name_end = inner
		.find(|c| matches!(c, ' ' | '\t' | '\n'))
		.unwrap_or(inner.len());
	if name_end == 0 {
		return Err(ParseError::new(ParseErrorKind::TagParseFailed, line));
	}
	let name = make_name(&inner[..name_end], line, ParseErrorKind::InvalidTagName)?;

	let mut attrs: Vec<Attribute> = Vec::new();
	let mut body = &inner[name_end..];
	let mut cur_line = line;
	loop {
		let before = body.len();
		body = skip_ws(body, &mut cur_line);
		if body.is_empty() {
			break;
		}
		if before == body.len() {
			// attribute items must be separated by whitespace
			return Err(ParseError::new(ParseErrorKind::TagParseFailed, cur_line));
		}
		let name_line = cur_line;
		let name_end = body
			.find(|c| matches!(c, ' ' | '\t' | '\n' | '='))
			.unwrap_or(body.len());
		if name_end == 0 {
			return Err(ParseError::new(ParseErrorKind::TagParseFailed, cur_line));
		}
		let raw_name = &body[..name_end];
		body = skip_ws(&body[name_end..], &mut cur_line);
		body = match body.strip_prefix('=') {
			Some(rest) => rest,
			None => return Err(ParseError::new(ParseErrorKind::TagParseFailed, cur_line)),
		};
		body = skip_ws(body, &mut cur_line);
		let value_line = cur_line;
		let delim = match body.chars().next() {
			Some(c @ ('"' | '\'')) => c,
			_ => return Err(ParseError::new(ParseErrorKind::TagParseFailed, value_line)),
		};
		body = &body[1..];
		let value_end = match body.find(delim) {
			Some(i) => i,
			None => return Err(ParseError::new(ParseErrorKind::TagParseFailed, value_line)),
		};
		let raw_value = &body[..value_end];
		body = &body[value_end + 1..];
		cur_line += raw_value.matches('\n').count();

		if raw_value.contains('<') {
			return Err(ParseError::new(ParseErrorKind::UnescapedLess, value_line));
		}
		let decoded = entities::decode(raw_value, value_line)?;
		let value = norm::nfc(norm::compress_attr_whitespace(&decoded));
		let name = make_name(raw_name, name_line, ParseErrorKind::InvalidAttributeName)?;
		if attrs.iter().any(|a| a.name == name) {
			return Err(ParseError::new(
				ParseErrorKind::DuplicateAttribute,
				name_line,
			));
		}
		attrs.push(Attribute {
			name,
			value,
			name_line,
			value_line,
		});
	}

	if kind == TagKind::End && !attrs.is_empty() {
		return Err(ParseError::new(
			ParseErrorKind::EndTagWithAttributes,
			line,
		));
	}

	Ok(ParsedTag {
		kind,
		name,
		attrs,
		line,
	})
}

/// NFC-normalize a raw name and validate it.
fn make_name(raw: &str, line: usize, on_invalid: ParseErrorKind) -> Result<Name, ParseError> {
	let normalized = norm::nfc(raw.to_string());
	Name::try_from(normalized).map_err(|_| ParseError::new(on_invalid, line))
}

/// Skip tag whitespace, advancing the line counter over LFs.
fn skip_ws<'x>(s: &'x str, line: &mut usize) -> &'x str {
	for (i, c) in s.char_indices() {
		match c {
			' ' | '\t' => (),
			'\n' => *line += 1,
			_ => return &s[i..],
		}
	}
	&s[s.len()..]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kind_of(r: Result<ParsedTag, ParseError>) -> ParseErrorKind {
		r.err().unwrap().kind().clone()
	}

	#[test]
	fn parses_plain_start_tag() {
		let tag = parse_tag("<root>", 1).unwrap();
		assert_eq!(tag.kind, TagKind::Start);
		assert_eq!(tag.name, "root");
		assert_eq!(tag.attrs.len(), 0);
		assert_eq!(tag.line, 1);
	}

	#[test]
	fn parses_empty_and_end_tags() {
		let tag = parse_tag("<leaf/>", 4).unwrap();
		assert_eq!(tag.kind, TagKind::Empty);
		assert_eq!(tag.name, "leaf");
		let tag = parse_tag("</root>", 9).unwrap();
		assert_eq!(tag.kind, TagKind::End);
		assert_eq!(tag.name, "root");
	}

	#[test]
	fn parses_attributes_with_both_quote_styles() {
		let tag = parse_tag("<a x=\"1\" y='two'>", 1).unwrap();
		assert_eq!(tag.attrs.len(), 2);
		assert_eq!(tag.attrs[0].name, "x");
		assert_eq!(tag.attrs[0].value, "1");
		assert_eq!(tag.attrs[1].name, "y");
		assert_eq!(tag.attrs[1].value, "two");
	}

	#[test]
	fn attribute_values_are_fully_decoded() {
		let tag = parse_tag("<a x=\" 1 &amp;\t2 \">", 1).unwrap();
		assert_eq!(tag.attrs[0].value, "1 & 2");
	}

	#[test]
	fn attribute_padding_may_span_lines() {
		let tag = parse_tag("<a\n  x\n  =\n  'v'\n  y='w'>", 3).unwrap();
		assert_eq!(tag.attrs[0].name_line, 4);
		assert_eq!(tag.attrs[0].value_line, 6);
		assert_eq!(tag.attrs[1].name_line, 7);
		assert_eq!(tag.attrs[1].value_line, 7);
	}

	#[test]
	fn value_lines_account_for_embedded_breaks() {
		let tag = parse_tag("<a x='one\ntwo' y='z'>", 1).unwrap();
		assert_eq!(tag.attrs[0].value, "one two");
		assert_eq!(tag.attrs[1].name_line, 2);
	}

	#[test]
	fn empty_tag_with_trailing_ws_before_slash() {
		let tag = parse_tag("<a x='1' />", 1).unwrap();
		assert_eq!(tag.kind, TagKind::Empty);
		assert_eq!(tag.attrs.len(), 1);
	}

	#[test]
	fn rejects_double_slash() {
		assert_eq!(kind_of(parse_tag("</a/>", 1)), ParseErrorKind::TagParseFailed);
	}

	#[test]
	fn rejects_missing_separators_and_quotes() {
		assert_eq!(
			kind_of(parse_tag("<a x='1'y='2'>", 1)),
			ParseErrorKind::TagParseFailed
		);
		assert_eq!(kind_of(parse_tag("<a x=1>", 1)), ParseErrorKind::TagParseFailed);
		assert_eq!(kind_of(parse_tag("<a x>", 1)), ParseErrorKind::TagParseFailed);
		assert_eq!(kind_of(parse_tag("<a ='1'>", 1)), ParseErrorKind::TagParseFailed);
	}

	#[test]
	fn rejects_invalid_names() {
		assert_eq!(kind_of(parse_tag("<1a>", 1)), ParseErrorKind::InvalidTagName);
		assert_eq!(kind_of(parse_tag("<a/b>", 1)), ParseErrorKind::InvalidTagName);
		assert_eq!(
			kind_of(parse_tag("<a 1x='v'>", 1)),
			ParseErrorKind::InvalidAttributeName
		);
	}

	#[test]
	fn rejects_unescaped_less_than_in_value() {
		assert_eq!(
			kind_of(parse_tag("<a x='a<b'>", 1)),
			ParseErrorKind::UnescapedLess
		);
	}

	#[test]
	fn rejects_duplicate_attributes() {
		assert_eq!(
			kind_of(parse_tag("<a x='1' x='2'>", 1)),
			ParseErrorKind::DuplicateAttribute
		);
	}

	#[test]
	fn duplicate_detection_happens_after_nfc() {
		// A+COMBINING RING and U+00C5 are the same name after NFC
		assert_eq!(
			kind_of(parse_tag("<a A\u{30a}='1' \u{c5}='2'>", 1)),
			ParseErrorKind::DuplicateAttribute
		);
	}

	#[test]
	fn rejects_attributes_on_end_tags() {
		assert_eq!(
			kind_of(parse_tag("</a x='1'>", 1)),
			ParseErrorKind::EndTagWithAttributes
		);
	}

	#[test]
	fn names_are_nfc_normalized() {
		let tag = parse_tag("<e\u{301}l>", 1).unwrap();
		assert_eq!(tag.name, "\u{e9}l");
	}
}

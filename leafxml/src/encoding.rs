/*!
# Byte-stream decoder

Turns raw input bytes into the codepoint string the tokenizer works on.
The encoding is detected from the byte order mark: `EF BB BF` means UTF-8,
`FE FF` UTF-16BE, `FF FE` UTF-16LE; anything else is decoded as UTF-8
without BOM. Decoding failures are fatal.
*/
use crate::error::{ParseError, ParseErrorKind};

/// Decode raw bytes into a codepoint string, sniffing and stripping the
/// byte order mark.
pub fn decode(bytes: &[u8]) -> Result<String, ParseError> {
	if let Some(rest) = strip_prefix(bytes, &[0xef, 0xbb, 0xbf]) {
		return decode_utf8(rest);
	}
	if let Some(rest) = strip_prefix(bytes, &[0xfe, 0xff]) {
		return decode_utf16(rest, true);
	}
	if let Some(rest) = strip_prefix(bytes, &[0xff, 0xfe]) {
		return decode_utf16(rest, false);
	}
	decode_utf8(bytes)
}

fn strip_prefix<'x>(bytes: &'x [u8], prefix: &[u8]) -> Option<&'x [u8]> {
	if bytes.starts_with(prefix) {
		Some(&bytes[prefix.len()..])
	} else {
		None
	}
}

fn decode_utf8(bytes: &[u8]) -> Result<String, ParseError> {
	match std::str::from_utf8(bytes) {
		Ok(s) => Ok(s.to_string()),
		Err(_) => Err(ParseError::unpositioned(ParseErrorKind::InvalidUtf8)),
	}
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> Result<String, ParseError> {
	if bytes.len() % 2 != 0 {
		return Err(ParseError::unpositioned(ParseErrorKind::InvalidUtf16));
	}
	let units = bytes.chunks_exact(2).map(|pair| {
		if big_endian {
			u16::from_be_bytes([pair[0], pair[1]])
		} else {
			u16::from_le_bytes([pair[0], pair[1]])
		}
	});
	char::decode_utf16(units)
		.collect::<Result<String, _>>()
		.map_err(|_| ParseError::unpositioned(ParseErrorKind::InvalidUtf16))
}

/*!
# Public pull-style event API

The [`Reader`] is the main entry point of the crate. It owns the
tokenizer and the event engine and exposes a cursor over the event
stream: [`Reader::read_event`] advances to the next event, the accessors
inspect the current one.

Accessor results borrow from the current event; the next `read_event`
invalidates them. Calling an accessor without a matching event loaded is
a caller error ([`crate::ApiError`]), kept strictly apart from parse
errors.
*/
use std::collections::HashMap;

use crate::encoding;
use crate::error::{ApiError, Error, ParseError, ParseErrorKind, Result};
use crate::lexer::Lexer;
use crate::parser::namespaces::NamespaceName;
use crate::parser::{Event, Parser};
use crate::strings::{Name, NameStr};

/// Kind of the currently loaded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
	/// An element start.
	Start,
	/// Decoded character data.
	Text,
	/// An element end.
	End,
}

/**
# Pull-based document reader

## Example

```
use leafxml::{EventKind, Reader};

let mut reader = Reader::from_string("<hello>World!</hello>".to_string()).unwrap();
let mut text = String::new();
while reader.read_event().unwrap() {
	if reader.event_kind().unwrap() == EventKind::Text {
		text.push_str(reader.content_text().unwrap());
	}
}
assert_eq!(text, "World!");
```
*/
pub struct Reader {
	lexer: Lexer,
	parser: Parser,
	current: Option<Event>,
	err: Option<Box<ParseError>>,
	source_name: Option<String>,
}

impl Reader {
	/// Create a reader over an already-decoded codepoint string.
	///
	/// The string must not begin with U+FEFF; byte-order marks belong to
	/// byte input and are handled by [`Reader::from_bytes`].
	pub fn from_string(src: String) -> Result<Self> {
		if src.starts_with('\u{feff}') {
			return Err(ParseError::unpositioned(ParseErrorKind::LeadingBom).into());
		}
		Ok(Self {
			lexer: Lexer::new(src),
			parser: Parser::new(),
			current: None,
			err: None,
			source_name: None,
		})
	}

	/// Create a reader over raw bytes, sniffing the encoding from the byte
	/// order mark (UTF-8 with or without BOM, UTF-16 with BOM).
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Self::from_string(encoding::decode(bytes)?)
	}

	/// Set or clear the source name used in diagnostics.
	pub fn set_source_name(&mut self, name: Option<String>) {
		self.source_name = name;
	}

	/// The source name used in diagnostics, if any.
	pub fn source_name(&self) -> Option<&str> {
		self.source_name.as_deref()
	}

	/// Advance to the next event.
	///
	/// Returns `true` when an event was loaded and `false` at the end of
	/// the stream. Must be called before the first accessor use. A parse
	/// error is fatal: the reader latches it and returns it from every
	/// further call.
	pub fn read_event(&mut self) -> Result<bool> {
		if let Some(e) = self.err.as_ref() {
			return Err(Error::Parse((**e).clone()));
		}
		match self.parser.parse(&mut self.lexer) {
			Ok(Some(ev)) => {
				self.current = Some(ev);
				Ok(true)
			}
			Ok(None) => {
				self.current = None;
				Ok(false)
			}
			Err(e) => {
				let e = e.with_source_name(self.source_name.as_deref());
				self.current = None;
				self.err = Some(Box::new(e.clone()));
				Err(Error::Parse(e))
			}
		}
	}

	fn current(&self) -> Result<&Event> {
		match self.current.as_ref() {
			Some(ev) => Ok(ev),
			None => Err(ApiError::NoEventLoaded.into()),
		}
	}

	/// The kind of the current event.
	pub fn event_kind(&self) -> Result<EventKind> {
		Ok(match self.current()? {
			Event::Start { .. } => EventKind::Start,
			Event::Text { .. } => EventKind::Text,
			Event::End { .. } => EventKind::End,
		})
	}

	/// The 1-based starting line of the current event.
	pub fn line_number(&self) -> Result<usize> {
		Ok(self.current()?.line())
	}

	/// The decoded text of the current event. Only valid for
	/// [`EventKind::Text`].
	pub fn content_text(&self) -> Result<&str> {
		match self.current()? {
			Event::Text { text, .. } => Ok(text),
			_ => Err(ApiError::NotText.into()),
		}
	}

	/// The local name of the current element. Only valid for
	/// [`EventKind::Start`].
	pub fn element_name(&self) -> Result<&NameStr> {
		match self.current()? {
			Event::Start { name, .. } => {
				let name: &NameStr = name;
				Ok(name)
			}
			_ => Err(ApiError::NotStartElement.into()),
		}
	}

	/// The namespace value of the current element, absent when the element
	/// has none. Only valid for [`EventKind::Start`].
	pub fn element_namespace(&self) -> Result<Option<&str>> {
		match self.current()? {
			Event::Start { namespace, .. } => Ok(namespace.as_deref()),
			_ => Err(ApiError::NotStartElement.into()),
		}
	}

	/// The plain attributes of the current element: unprefixed names,
	/// excluding the bare word `xmlns`. Only valid for
	/// [`EventKind::Start`].
	pub fn attrs(&self) -> Result<&HashMap<Name, String>> {
		match self.current()? {
			Event::Start { attrs, .. } => Ok(attrs),
			_ => Err(ApiError::NotStartElement.into()),
		}
	}

	/// The external attributes of the current element, grouped as
	/// namespace value → local name → value. Only valid for
	/// [`EventKind::Start`].
	pub fn external_attrs(&self) -> Result<&HashMap<NamespaceName, HashMap<Name, String>>> {
		match self.current()? {
			Event::Start { external, .. } => Ok(external),
			_ => Err(ApiError::NotStartElement.into()),
		}
	}

	/// Read all remaining events, invoking `cb` for each.
	///
	/// This consumes the events; the cursor accessors see none of them.
	pub fn read_all<F>(&mut self, mut cb: F) -> Result<()>
	where
		F: FnMut(Event),
	{
		while self.read_event()? {
			// the event was just stored, so it is present
			if let Some(ev) = self.current.take() {
				cb(ev);
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ParseErrorKind;

	#[test]
	fn accessors_require_a_loaded_event() {
		let reader = Reader::from_string("<r/>".to_string()).unwrap();
		assert!(matches!(
			reader.event_kind(),
			Err(Error::Api(ApiError::NoEventLoaded))
		));
		assert!(matches!(
			reader.line_number(),
			Err(Error::Api(ApiError::NoEventLoaded))
		));
	}

	#[test]
	fn accessors_check_the_event_kind() {
		let mut reader = Reader::from_string("<r>x</r>".to_string()).unwrap();
		assert!(reader.read_event().unwrap());
		assert_eq!(reader.event_kind().unwrap(), EventKind::Start);
		assert!(matches!(
			reader.content_text(),
			Err(Error::Api(ApiError::NotText))
		));
		assert!(reader.read_event().unwrap());
		assert_eq!(reader.event_kind().unwrap(), EventKind::Text);
		assert!(matches!(
			reader.element_name(),
			Err(Error::Api(ApiError::NotStartElement))
		));
	}

	#[test]
	fn end_of_stream_unloads_the_event() {
		let mut reader = Reader::from_string("<r/>".to_string()).unwrap();
		assert!(reader.read_event().unwrap());
		assert!(reader.read_event().unwrap());
		assert!(!reader.read_event().unwrap());
		assert!(matches!(
			reader.event_kind(),
			Err(Error::Api(ApiError::NoEventLoaded))
		));
	}

	#[test]
	fn parse_errors_latch() {
		let mut reader = Reader::from_string("<r>".to_string()).unwrap();
		assert!(reader.read_event().unwrap());
		let first = reader.read_event().err().unwrap();
		let second = reader.read_event().err().unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn source_name_appears_in_diagnostics() {
		let mut reader = Reader::from_string("<r>&bogus;</r>".to_string()).unwrap();
		reader.set_source_name(Some("doc.xml".to_string()));
		assert_eq!(reader.source_name(), Some("doc.xml"));
		assert!(reader.read_event().unwrap());
		let err = reader.read_event().err().unwrap();
		match err {
			Error::Parse(e) => {
				assert_eq!(e.source_name(), Some("doc.xml"));
				assert_eq!(format!("{}", e), "\"doc.xml\" line 1: unrecognized named entity");
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn leading_bom_on_decoded_input_is_rejected() {
		let err = Reader::from_string("\u{feff}<r/>".to_string()).err().unwrap();
		match err {
			Error::Parse(e) => assert_eq!(*e.kind(), ParseErrorKind::LeadingBom),
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[test]
	fn read_all_drains_the_stream() {
		let mut reader = Reader::from_string("<a><b/>text</a>".to_string()).unwrap();
		let mut kinds = Vec::new();
		reader
			.read_all(|ev| {
				kinds.push(match ev {
					Event::Start { .. } => "start",
					Event::Text { .. } => "text",
					Event::End { .. } => "end",
				})
			})
			.unwrap();
		assert_eq!(kinds, vec!["start", "start", "end", "text", "end"]);
	}
}

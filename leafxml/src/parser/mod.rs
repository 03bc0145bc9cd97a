/*!
# Assembler and event engine

Drives the tokenizer and turns the token stream into the three-event
stream of the decoder: element start, element end, content text.

Comment, processing-instruction and DOCTYPE tokens are discarded.
Adjacent text and CDATA tokens are concatenated into a single content
assembly, which is flushed when a tag arrives or the input ends. Empty
tags expand into a start/end pair through the internal event buffer.
*/
use std::collections::VecDeque;
use std::rc::Rc;

use crate::context::Context;
use crate::entities;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenRead};
use crate::norm;
use crate::strings::Name;

pub mod namespaces;
pub mod tag;

use namespaces::{ExternalAttrs, NamespaceStack, PlainAttrs};
use tag::{ParsedTag, TagKind};

/**
# Logical XML document parts

The term *Event* is borrowed from SAX terminology. Each event refers to a
bit of the document which has been decoded, carrying its 1-based starting
line.

A well-formed document generates exactly one [`Event::Start`] /
[`Event::End`] pair for the root, with properly nested pairs and text in
between. An empty tag generates a start immediately followed by an end on
the same line.
*/
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// The start of an element.
	Start {
		/// 1-based starting line of the tag.
		line: usize,
		/// Local name of the element (prefix resolved away).
		name: Name,
		/// Namespace value of the element, if it has one.
		namespace: Option<namespaces::NamespaceName>,
		/// Unprefixed attributes, excluding `xmlns`.
		attrs: PlainAttrs,
		/// Prefixed attributes grouped by namespace value.
		external: ExternalAttrs,
	},
	/// The end of an element.
	End {
		/// 1-based line; for an empty tag, the same as its start event.
		line: usize,
	},
	/// A content assembly: adjacent text and CDATA spans, entity-decoded,
	/// merged, line-break and NFC normalized.
	Text {
		/// 1-based line the assembly started on.
		line: usize,
		/// Decoded text content.
		text: String,
	},
}

impl Event {
	/// The 1-based starting line of the event.
	pub fn line(&self) -> usize {
		match self {
			Self::Start { line, .. } => *line,
			Self::End { line } => *line,
			Self::Text { line, .. } => *line,
		}
	}
}

/// Root bracketing state: no tag seen yet, root open, root closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
	Initial,
	Active,
	Finished,
}

/// Content accumulator for a run of adjacent text/CDATA tokens.
struct PendingContent {
	text: String,
	line: usize,
}

/**
# Event engine

Pulls tokens from a [`TokenRead`] source and assembles events. The parser
owns the element stack (verbatim tag names, including prefixes), the
namespace stack and a small event buffer.

The first error poisons the parser: every further call to
[`Parser::parse`] returns the same error without touching the source.
*/
pub struct Parser {
	ctx: Rc<Context>,
	element_stack: Vec<Name>,
	namespaces: NamespaceStack,
	tag_state: TagState,
	pending: Option<PendingContent>,
	eventq: VecDeque<Event>,
	err: Option<Box<ParseError>>,
}

impl Parser {
	/// Create a new parser with its own (unshared) [`Context`].
	pub fn new() -> Self {
		Self::with_context(Rc::new(Context::new()))
	}

	/// Create a new parser interning namespace values in the given shared
	/// [`Context`].
	pub fn with_context(ctx: Rc<Context>) -> Self {
		let namespaces = NamespaceStack::new(ctx.clone());
		Self {
			ctx,
			element_stack: Vec::new(),
			namespaces,
			tag_state: TagState::Initial,
			pending: None,
			eventq: VecDeque::new(),
			err: None,
		}
	}

	/// Access the interning context.
	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	/// Produce the next event, pulling tokens from `r` as needed.
	///
	/// Returns `None` when the input ended after a complete document.
	/// Errors are fatal and repeat on every further call.
	pub fn parse<R: TokenRead>(&mut self, r: &mut R) -> Result<Option<Event>, ParseError> {
		if let Some(e) = self.err.as_ref() {
			return Err((**e).clone());
		}
		match self.parse_inner(r) {
			Ok(ev) => Ok(ev),
			Err(e) => {
				self.err = Some(Box::new(e.clone()));
				Err(e)
			}
		}
	}

	fn parse_inner<R: TokenRead>(&mut self, r: &mut R) -> Result<Option<Event>, ParseError> {
		loop {
			if let Some(ev) = self.eventq.pop_front() {
				return Ok(Some(ev));
			}
			match r.read()? {
				Some(token) => self.process_token(token)?,
				None => {
					self.flush_content()?;
					if let Some(ev) = self.eventq.pop_front() {
						return Ok(Some(ev));
					}
					return match self.tag_state {
						TagState::Active => {
							Err(ParseError::unpositioned(ParseErrorKind::UnclosedTags))
						}
						TagState::Initial => {
							Err(ParseError::unpositioned(ParseErrorKind::MissingRootElement))
						}
						TagState::Finished => Ok(None),
					};
				}
			}
		}
	}

	fn process_token(&mut self, token: Token) -> Result<(), ParseError> {
		match token {
			Token::Comment(..) | Token::ProcessingInstruction(..) | Token::Doctype(..) => Ok(()),
			Token::Cdata(line, text) => {
				// body between "<![CDATA[" and "]]>", no entity decoding
				let body = &text[9..text.len() - 3];
				self.append_content(line, body);
				Ok(())
			}
			Token::Text(line, text) => {
				let decoded = entities::decode(&text, line)?;
				self.append_content(line, &decoded);
				Ok(())
			}
			Token::Tag(line, text) => {
				self.flush_content()?;
				self.process_tag(&text, line)
			}
		}
	}

	fn append_content(&mut self, line: usize, text: &str) {
		match self.pending.as_mut() {
			Some(pending) => pending.text.push_str(text),
			None => {
				self.pending = Some(PendingContent {
					text: text.to_string(),
					line,
				})
			}
		}
	}

	/// Flush the content accumulator as a text event.
	///
	/// Empty assemblies vanish. Outside the root element only whitespace
	/// is tolerated (and discarded); the first non-whitespace codepoint is
	/// reported with its line.
	fn flush_content(&mut self) -> Result<(), ParseError> {
		let pending = match self.pending.take() {
			Some(pending) => pending,
			None => return Ok(()),
		};
		if pending.text.is_empty() {
			return Ok(());
		}
		if self.tag_state != TagState::Active {
			let mut line = pending.line;
			for c in pending.text.chars() {
				match c {
					'\n' => line += 1,
					' ' | '\t' => (),
					_ => {
						return Err(ParseError::new(
							ParseErrorKind::ContentOutsideRoot,
							line,
						))
					}
				}
			}
			return Ok(());
		}
		let text = norm::normalize_line_breaks(&pending.text);
		let text = norm::nfc(text.into_owned());
		self.eventq.push_back(Event::Text {
			line: pending.line,
			text,
		});
		Ok(())
	}

	fn process_tag(&mut self, token: &str, line: usize) -> Result<(), ParseError> {
		let ParsedTag {
			kind,
			name,
			attrs,
			line,
		} = tag::parse_tag(token, line)?;
		let opens = matches!(kind, TagKind::Start | TagKind::Empty);
		let closes = matches!(kind, TagKind::End | TagKind::Empty);

		if opens {
			if self.tag_state == TagState::Finished {
				return Err(ParseError::new(ParseErrorKind::MultipleRootElements, line));
			}
			self.element_stack.push(name.clone());
			self.tag_state = TagState::Active;
		}
		if closes {
			if self.tag_state != TagState::Active {
				return Err(ParseError::new(ParseErrorKind::TagPairingError, line));
			}
			match self.element_stack.last() {
				Some(top) if *top == name => (),
				_ => return Err(ParseError::new(ParseErrorKind::TagPairingError, line)),
			}
			self.element_stack.pop();
			if self.element_stack.is_empty() {
				self.tag_state = TagState::Finished;
			}
		}

		if opens {
			self.namespaces.push_scope(&attrs)?;
			let (namespace, local) = self.namespaces.resolve_element(&name, line)?;
			let (plain, external) = self.namespaces.resolve_attributes(&attrs)?;
			self.eventq.push_back(Event::Start {
				line,
				name: local,
				namespace,
				attrs: plain,
				external,
			});
		}
		if closes {
			self.namespaces.pop_scope();
			self.eventq.push_back(Event::End { line });
		}
		debug_assert_eq!(self.element_stack.len() + 1, self.namespaces.depth());
		Ok(())
	}
}

impl Default for Parser {
	fn default() -> Self {
		Self::new()
	}
}

/*!
# Error types

This module holds the error types returned by the various functions of this
crate.

Two categories are kept strictly apart:

- [`ParseError`]: the input document is malformed. These carry the
  diagnostics context (optional source name, optional 1-based line).
- [`ApiError`]: the caller misused the API, for instance by calling an
  accessor while no matching event is loaded. These are never produced by
  malformed input.
*/
use std::error;
use std::fmt;
use std::result::Result as StdResult;

/// Detail of a [`ParseError`].
///
/// The variants cover every way a document can be rejected; their
/// [`fmt::Display`] output is the stable detail message of the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
	/// A `<` was encountered from which no lexeme could be matched.
	TokenizationFailed,
	/// A codepoint outside the supported set was encountered.
	///
	/// The contents are the codepoint value.
	InvalidCodepoint(u32),
	/// An invalid byte sequence was encountered while decoding UTF-8 input.
	InvalidUtf8,
	/// An invalid unit sequence or odd byte count was encountered while
	/// decoding UTF-16 input.
	InvalidUtf16,
	/// A pre-decoded input string began with U+FEFF.
	LeadingBom,
	/// A tag token did not match the tag grammar.
	TagParseFailed,
	/// An element name failed name validation.
	InvalidTagName,
	/// An attribute name failed name validation.
	InvalidAttributeName,
	/// An attribute value contained a bare `<`.
	UnescapedLess,
	/// An `&` that does not start a well-formed escape.
	BareAmpersand,
	/// A named entity other than `amp`, `lt`, `gt`, `apos`, `quot`.
	UnknownEntity,
	/// A character reference decoded to a codepoint outside the supported
	/// set.
	///
	/// The contents are the decoded codepoint value.
	EscapeOutOfRange(u32),
	/// A malformed character reference (bad digits, bad length, uppercase
	/// `X`, or an empty escape body).
	InvalidEscape,
	/// A second root element was opened after the first one closed.
	MultipleRootElements,
	/// End of input while elements were still open.
	UnclosedTags,
	/// End of input without any root element.
	MissingRootElement,
	/// An end tag did not match the open element, or appeared without one.
	TagPairingError,
	/// An end tag carried attributes.
	EndTagWithAttributes,
	/// Non-whitespace content outside the root element.
	ContentOutsideRoot,
	/// A namespace declaration with an empty value.
	EmptyNamespaceValue,
	/// An attempt to declare the `xmlns` prefix.
	XmlnsPrefixMapped,
	/// A reserved namespace value was declared for an ordinary prefix.
	ReservedNamespaceValue,
	/// The `xml` prefix was declared with a value other than the reserved
	/// xml namespace.
	XmlPrefixValue,
	/// The same prefix was declared twice on one element.
	PrefixRedefined,
	/// A name used a prefix with no declaration in scope.
	UnmappedPrefix,
	/// Two attributes of one tag resolved to the same (namespace, local)
	/// pair through different prefixes.
	AliasedExternalAttribute,
	/// An attribute name occurred twice within one tag.
	DuplicateAttribute,
}

impl fmt::Display for ParseErrorKind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::TokenizationFailed => f.write_str("tokenization failed"),
			Self::InvalidCodepoint(cp) => write!(f, "invalid codepoint U+{:04X}", cp),
			Self::InvalidUtf8 => f.write_str("invalid UTF-8 sequence"),
			Self::InvalidUtf16 => f.write_str("invalid UTF-16 sequence"),
			Self::LeadingBom => {
				f.write_str("decoded input must not begin with a byte order mark")
			}
			Self::TagParseFailed => f.write_str("tag parse failure"),
			Self::InvalidTagName => f.write_str("invalid tag name"),
			Self::InvalidAttributeName => f.write_str("invalid attribute name"),
			Self::UnescapedLess => f.write_str("attribute value contains unescaped '<'"),
			Self::BareAmpersand => f.write_str("ampersand must be part of escape"),
			Self::UnknownEntity => f.write_str("unrecognized named entity"),
			Self::EscapeOutOfRange(cp) => {
				write!(f, "escaped codepoint out of range: U+{:04X}", cp)
			}
			Self::InvalidEscape => f.write_str("invalid entity escape"),
			Self::MultipleRootElements => f.write_str("multiple root elements"),
			Self::UnclosedTags => f.write_str("unclosed tags"),
			Self::MissingRootElement => f.write_str("missing root element"),
			Self::TagPairingError => f.write_str("tag pairing error"),
			Self::EndTagWithAttributes => {
				f.write_str("closing tags may not have attributes")
			}
			Self::ContentOutsideRoot => {
				f.write_str("text content not allowed outside root element")
			}
			Self::EmptyNamespaceValue => f.write_str("can't map namespace to empty"),
			Self::XmlnsPrefixMapped => f.write_str("can't map xmlns prefix"),
			Self::ReservedNamespaceValue => {
				f.write_str("can't map to reserved namespace value")
			}
			Self::XmlPrefixValue => {
				f.write_str("can only map namespace prefix 'xml' to reserved xml value")
			}
			Self::PrefixRedefined => {
				f.write_str("redefinition of namespace prefix on element")
			}
			Self::UnmappedPrefix => f.write_str("unmapped namespace prefix"),
			Self::AliasedExternalAttribute => f.write_str("aliased external attribute"),
			Self::DuplicateAttribute => f.write_str("duplicate attribute"),
		}
	}
}

/// Rejection of a malformed document.
///
/// Carries the detail [`ParseErrorKind`], the 1-based line the problem was
/// observed on (absent for failures before any token exists, such as
/// encoding errors), and the source name if one was set on the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
	kind: ParseErrorKind,
	line: Option<usize>,
	source_name: Option<String>,
}

impl ParseError {
	/// Create a parse error positioned at the given 1-based line.
	pub fn new(kind: ParseErrorKind, line: usize) -> Self {
		Self {
			kind,
			line: Some(line),
			source_name: None,
		}
	}

	/// Create a parse error with no line position.
	pub fn unpositioned(kind: ParseErrorKind) -> Self {
		Self {
			kind,
			line: None,
			source_name: None,
		}
	}

	/// The detail of the error.
	pub fn kind(&self) -> &ParseErrorKind {
		&self.kind
	}

	/// The 1-based line the error was observed on, if any.
	pub fn line(&self) -> Option<usize> {
		self.line
	}

	/// The source name attached for diagnostics, if any.
	pub fn source_name(&self) -> Option<&str> {
		self.source_name.as_deref()
	}

	/// Attach the reader's source name for diagnostics.
	pub(crate) fn with_source_name(mut self, name: Option<&str>) -> Self {
		self.source_name = name.map(String::from);
		self
	}
}

impl fmt::Display for ParseError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		if let Some(name) = self.source_name.as_ref() {
			write!(f, "\"{}\" ", name)?;
		}
		if let Some(line) = self.line {
			write!(f, "line {}: ", line)?;
		}
		fmt::Display::fmt(&self.kind, f)
	}
}

impl error::Error for ParseError {}

/// Misuse of the reader API by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
	/// An accessor was called while no event is loaded, either because
	/// `read_event` has not been called yet or because the stream has
	/// ended.
	NoEventLoaded,
	/// `content_text` was called while the current event is not a text
	/// event.
	NotText,
	/// An element accessor was called while the current event is not an
	/// element start.
	NotStartElement,
}

impl fmt::Display for ApiError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::NoEventLoaded => {
				f.write_str("no event is loaded; call read_event() first")
			}
			Self::NotText => f.write_str("current event is not a text event"),
			Self::NotStartElement => f.write_str("current event is not an element start"),
		}
	}
}

impl error::Error for ApiError {}

/// Error type returned by the public API of this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// The document is malformed. Fatal; the reader returns the same error
	/// from every further call.
	Parse(ParseError),
	/// The caller misused the API. The reader state is unchanged.
	Api(ApiError),
}

pub type Result<T> = StdResult<T, Error>;

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Parse(e) => fmt::Display::fmt(e, f),
			Self::Api(e) => write!(f, "api misuse: {}", e),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Self::Parse(e) => Some(e),
			Self::Api(e) => Some(e),
		}
	}
}

impl From<ParseError> for Error {
	fn from(e: ParseError) -> Self {
		Self::Parse(e)
	}
}

impl From<ApiError> for Error {
	fn from(e: ApiError) -> Self {
		Self::Api(e)
	}
}

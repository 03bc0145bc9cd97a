/*!
# LeafXML parsing

This crate decodes a well-defined subset of XML 1.0/1.1 with namespace
processing folded into the core and Unicode NFC normalization of names
and text.

## Features (some call them restrictions)

* No DTD interpretation (a DOCTYPE without internal subset is skipped)
* No external resources and no custom entities
* Comments and processing instructions are skipped, never delivered
* UTF-8 and UTF-16 input only
* Namespace-well-formedness enforced
* Names, attribute values and text normalized to NFC
* Streamed pull-based decoding with line-accurate diagnostics

## Example

```
use leafxml::{EventKind, Reader};

let doc = "<greeting xmlns='urn:example'>Hello!</greeting>";
let mut reader = Reader::from_string(doc.to_string()).unwrap();
assert!(reader.read_event().unwrap());
assert_eq!(reader.event_kind().unwrap(), EventKind::Start);
assert_eq!(reader.element_name().unwrap(), "greeting");
assert_eq!(reader.element_namespace().unwrap(), Some("urn:example"));
assert!(reader.read_event().unwrap());
assert_eq!(reader.content_text().unwrap(), "Hello!");
```

## Event model

Three event kinds reach the client: element start, element end, content
text. Empty tags (`<a/>`) are delivered as a start/end pair, so consumers
only ever handle the three kinds. Adjacent text and CDATA spans merge
into a single text event.

## Error model

Malformed input raises a [`ParseError`] carrying the source name (if set)
and the 1-based line. Parse errors are fatal; the reader latches the
first one. Misuse of the accessors is an [`ApiError`], a distinct
category which never results from document contents.
*/
mod context;
pub mod encoding;
pub mod entities;
pub mod error;
pub mod lexer;
pub mod norm;
pub mod parser;
pub mod reader;
pub mod strings;


pub use context::Context;
#[doc(inline)]
pub use error::{ApiError, Error, ParseError, ParseErrorKind, Result};
#[doc(inline)]
pub use lexer::{Lexer, Token, TokenRead};
#[doc(inline)]
pub use parser::namespaces::{NamespaceName, XMLNS_XML, XMLNS_XMLNS};
#[doc(inline)]
pub use parser::{Event, Parser};
#[doc(inline)]
pub use reader::{EventKind, Reader};
pub use strings::{Name, NameStr};

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

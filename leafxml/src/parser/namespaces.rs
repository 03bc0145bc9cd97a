/*!
# Namespace frames and prefix resolution

Namespace processing is part of the core: every start tag's `xmlns` /
`xmlns:*` attributes are validated and applied here, and element and
attribute names are resolved against the innermost frame.

A frame is an immutable, complete prefix map. Elements which declare
nothing share the parent frame by reference; elements with declarations
get a copy-on-write overlay. The bottom frame is never popped and maps the
two reserved prefixes.
*/
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

use smartstring::alias::String as SmartString;

use crate::context::Context;
use crate::error::{ParseError, ParseErrorKind};
use crate::strings::Name;

use super::tag::Attribute;

/// Interned namespace value.
pub type NamespaceName = Rc<str>;

/// Reserved namespace value of the `xml` prefix.
pub const XMLNS_XML: &'static str = "http://www.w3.org/XML/1998/namespace";
/// Reserved namespace value of the `xmlns` prefix.
pub const XMLNS_XMLNS: &'static str = "http://www.w3.org/2000/xmlns/";

/// Prefix map effective for one element depth. The empty-string key holds
/// the default element namespace.
type Frame = HashMap<SmartString, NamespaceName>;

/// Plain attributes: unprefixed names, excluding the bare word `xmlns`.
pub type PlainAttrs = HashMap<Name, String>;
/// External attributes: namespace value → local name → value.
pub type ExternalAttrs = HashMap<NamespaceName, HashMap<Name, String>>;

/**
# Stack of namespace frames

One frame per open element plus the permanent bottom frame. Pushing walks
the raw attributes of a start or empty tag; popping accompanies the end
tag. The stack is never empty.
*/
pub struct NamespaceStack {
	ctx: Rc<Context>,
	frames: Vec<Rc<Frame>>,
}

impl NamespaceStack {
	pub fn new(ctx: Rc<Context>) -> Self {
		let mut bottom = Frame::new();
		bottom.insert("xml".into(), ctx.intern(XMLNS_XML));
		bottom.insert("xmlns".into(), ctx.intern(XMLNS_XMLNS));
		Self {
			ctx,
			frames: vec![Rc::new(bottom)],
		}
	}

	/// Number of frames, including the bottom frame.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}

	fn top(&self) -> &Rc<Frame> {
		// the bottom frame is never popped
		self.frames.last().unwrap()
	}

	/// Validate the declarations of a start or empty tag and push the
	/// element's frame.
	///
	/// With no new declarations, the pushed frame is a shared reference to
	/// the current top.
	pub fn push_scope(&mut self, attrs: &[Attribute]) -> Result<(), ParseError> {
		let mut declared = Frame::new();
		for attr in attrs {
			let prefix: &str = if attr.name == "xmlns" {
				""
			} else {
				match attr.name.split_name() {
					Some((p, local)) if p == "xmlns" => local.as_str(),
					_ => continue,
				}
			};
			if attr.value.is_empty() {
				return Err(ParseError::new(
					ParseErrorKind::EmptyNamespaceValue,
					attr.value_line,
				));
			}
			if prefix == "xmlns" {
				return Err(ParseError::new(
					ParseErrorKind::XmlnsPrefixMapped,
					attr.name_line,
				));
			}
			if attr.value == XMLNS_XMLNS {
				return Err(ParseError::new(
					ParseErrorKind::ReservedNamespaceValue,
					attr.value_line,
				));
			}
			if prefix == "xml" {
				if attr.value != XMLNS_XML {
					return Err(ParseError::new(
						ParseErrorKind::XmlPrefixValue,
						attr.value_line,
					));
				}
			} else if attr.value == XMLNS_XML {
				return Err(ParseError::new(
					ParseErrorKind::ReservedNamespaceValue,
					attr.value_line,
				));
			}
			match declared.entry(prefix.into()) {
				Entry::Occupied(_) => {
					return Err(ParseError::new(
						ParseErrorKind::PrefixRedefined,
						attr.name_line,
					))
				}
				Entry::Vacant(e) => e.insert(self.ctx.intern(&attr.value)),
			};
		}
		if declared.is_empty() {
			self.frames.push(Rc::clone(self.top()));
		} else {
			let mut frame = (**self.top()).clone();
			frame.extend(declared);
			self.frames.push(Rc::new(frame));
		}
		Ok(())
	}

	/// Pop the frame pushed for the element that just ended.
	pub fn pop_scope(&mut self) {
		debug_assert!(self.frames.len() > 1);
		self.frames.pop();
	}

	/// Resolve an element name against the innermost frame.
	///
	/// Prefixed names look up their prefix (an unknown prefix is an
	/// error); bare names take the default namespace when one is declared,
	/// otherwise no namespace.
	pub fn resolve_element(
		&self,
		name: &Name,
		line: usize,
	) -> Result<(Option<NamespaceName>, Name), ParseError> {
		match name.split_name() {
			Some((prefix, local)) => match self.top().get(prefix.as_str()) {
				Some(ns) => Ok((Some(ns.clone()), local.to_name())),
				None => Err(ParseError::new(ParseErrorKind::UnmappedPrefix, line)),
			},
			None => Ok((self.top().get("").cloned(), name.clone())),
		}
	}

	/// Split a tag's attributes into the plain and external maps.
	///
	/// Declarations (`xmlns`, `xmlns:*`) appear in neither. Two attributes
	/// resolving to the same (namespace, local) pair through different
	/// prefixes are an error.
	pub fn resolve_attributes(
		&self,
		attrs: &[Attribute],
	) -> Result<(PlainAttrs, ExternalAttrs), ParseError> {
		let mut plain = PlainAttrs::new();
		let mut external = ExternalAttrs::new();
		for attr in attrs {
			if attr.name == "xmlns" {
				continue;
			}
			match attr.name.split_name() {
				Some((prefix, _)) if prefix == "xmlns" => continue,
				Some((prefix, local)) => {
					let ns = match self.top().get(prefix.as_str()) {
						Some(ns) => ns.clone(),
						None => {
							return Err(ParseError::new(
								ParseErrorKind::UnmappedPrefix,
								attr.name_line,
							))
						}
					};
					match external.entry(ns).or_default().entry(local.to_name()) {
						Entry::Occupied(_) => {
							return Err(ParseError::new(
								ParseErrorKind::AliasedExternalAttribute,
								attr.name_line,
							))
						}
						Entry::Vacant(e) => e.insert(attr.value.clone()),
					};
				}
				None => {
					// uniqueness was enforced by the tag parser
					plain.insert(attr.name.clone(), attr.value.clone());
				}
			}
		}
		Ok((plain, external))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::convert::TryFrom;

	fn attr(name: &str, value: &str) -> Attribute {
		Attribute {
			name: Name::try_from(name).unwrap(),
			value: value.to_string(),
			name_line: 1,
			value_line: 1,
		}
	}

	fn stack() -> NamespaceStack {
		NamespaceStack::new(Rc::new(Context::new()))
	}

	fn kind_of<T: std::fmt::Debug>(r: Result<T, ParseError>) -> ParseErrorKind {
		r.err().unwrap().kind().clone()
	}

	#[test]
	fn bottom_frame_maps_reserved_prefixes() {
		let ns = stack();
		let name = Name::try_from("xml:lang").unwrap();
		let (nsname, local) = ns.resolve_element(&name, 1).unwrap();
		assert_eq!(&*nsname.unwrap(), XMLNS_XML);
		assert_eq!(local, "lang");
	}

	#[test]
	fn default_namespace_applies_to_bare_elements_only() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns", "urn:a")]).unwrap();
		let bare = Name::try_from("e").unwrap();
		let (nsname, _) = ns.resolve_element(&bare, 1).unwrap();
		assert_eq!(&*nsname.unwrap(), "urn:a");
		// attributes never take the default namespace
		let (plain, external) = ns.resolve_attributes(&[attr("x", "1")]).unwrap();
		assert_eq!(plain.get("x").unwrap(), "1");
		assert!(external.is_empty());
	}

	#[test]
	fn prefixed_resolution_and_scoping() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns:p", "urn:a")]).unwrap();
		let name = Name::try_from("p:x").unwrap();
		let (nsname, local) = ns.resolve_element(&name, 1).unwrap();
		assert_eq!(&*nsname.unwrap(), "urn:a");
		assert_eq!(local, "x");
		// inner scope without declarations shares the frame
		ns.push_scope(&[]).unwrap();
		assert!(ns.resolve_element(&name, 1).is_ok());
		ns.pop_scope();
		ns.pop_scope();
		assert_eq!(
			kind_of(ns.resolve_element(&name, 1)),
			ParseErrorKind::UnmappedPrefix
		);
	}

	#[test]
	fn redeclaration_shadows_outer_scope() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns:p", "urn:a")]).unwrap();
		ns.push_scope(&[attr("xmlns:p", "urn:b")]).unwrap();
		let name = Name::try_from("p:x").unwrap();
		let (nsname, _) = ns.resolve_element(&name, 1).unwrap();
		assert_eq!(&*nsname.unwrap(), "urn:b");
		ns.pop_scope();
		let (nsname, _) = ns.resolve_element(&name, 1).unwrap();
		assert_eq!(&*nsname.unwrap(), "urn:a");
	}

	#[test]
	fn undeclared_elements_have_no_namespace() {
		let ns = stack();
		let name = Name::try_from("e").unwrap();
		let (nsname, local) = ns.resolve_element(&name, 1).unwrap();
		assert!(nsname.is_none());
		assert_eq!(local, "e");
	}

	#[test]
	fn declaration_constraints() {
		let mut ns = stack();
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:p", "")])),
			ParseErrorKind::EmptyNamespaceValue
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:xmlns", "urn:a")])),
			ParseErrorKind::XmlnsPrefixMapped
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:p", XMLNS_XMLNS)])),
			ParseErrorKind::ReservedNamespaceValue
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:p", XMLNS_XML)])),
			ParseErrorKind::ReservedNamespaceValue
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns", XMLNS_XML)])),
			ParseErrorKind::ReservedNamespaceValue
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:xml", "urn:other")])),
			ParseErrorKind::XmlPrefixValue
		);
		assert_eq!(
			kind_of(ns.push_scope(&[attr("xmlns:p", "urn:a"), attr("xmlns:p", "urn:b")])),
			ParseErrorKind::PrefixRedefined
		);
		// restating the reserved xml mapping is allowed
		ns.push_scope(&[attr("xmlns:xml", XMLNS_XML)]).unwrap();
	}

	#[test]
	fn default_and_prefix_declarations_coexist() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns", "urn:a"), attr("xmlns:p", "urn:b")])
			.unwrap();
		let bare = Name::try_from("e").unwrap();
		let prefixed = Name::try_from("p:e").unwrap();
		assert_eq!(&*ns.resolve_element(&bare, 1).unwrap().0.unwrap(), "urn:a");
		assert_eq!(
			&*ns.resolve_element(&prefixed, 1).unwrap().0.unwrap(),
			"urn:b"
		);
	}

	#[test]
	fn external_attributes_group_by_namespace() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns:p", "urn:a"), attr("xmlns:q", "urn:b")])
			.unwrap();
		let (plain, external) = ns
			.resolve_attributes(&[
				attr("xmlns:p", "urn:a"),
				attr("plain", "0"),
				attr("p:x", "1"),
				attr("q:x", "2"),
			])
			.unwrap();
		assert_eq!(plain.len(), 1);
		assert_eq!(plain.get("plain").unwrap(), "0");
		assert_eq!(external.len(), 2);
		let a: NamespaceName = Rc::from("urn:a");
		let b: NamespaceName = Rc::from("urn:b");
		assert_eq!(external.get(&a).unwrap().get("x").unwrap(), "1");
		assert_eq!(external.get(&b).unwrap().get("x").unwrap(), "2");
	}

	#[test]
	fn aliased_external_attributes_are_rejected() {
		let mut ns = stack();
		ns.push_scope(&[attr("xmlns:p", "urn:a"), attr("xmlns:q", "urn:a")])
			.unwrap();
		assert_eq!(
			kind_of(ns.resolve_attributes(&[attr("p:x", "1"), attr("q:x", "2")])),
			ParseErrorKind::AliasedExternalAttribute
		);
	}

	#[test]
	fn unmapped_attribute_prefix_is_rejected() {
		let ns = stack();
		assert_eq!(
			kind_of(ns.resolve_attributes(&[attr("p:x", "1")])),
			ParseErrorKind::UnmappedPrefix
		);
	}
}

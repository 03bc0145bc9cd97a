/*!
# Strongly-typed name strings

This module defines the [`Name`]/[`NameStr`] pair used for element and
attribute names throughout the decoder. The types guarantee that the
contained text passed name validation, so checks done in the tag parser do
not need to be repeated downstream.

Names are kept *verbatim*, including any namespace prefix; prefix splitting
happens on demand through [`Name::split_name`]. A name only counts as
prefixed when it contains exactly one colon and both sides are themselves
valid names; every other colon arrangement is treated as a bare name.
*/
use std::borrow::{Borrow, ToOwned};
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use smartstring::alias::String as SmartString;

use leafxml_validation::{validate_name, Error as ValidationError};

/// String which passed name validation.
///
/// [`Name`] corresponds to a (restricted) [`String`]. For a [`str`]-like
/// type with the same restriction, see [`NameStr`].
///
/// Since [`Name`] (indirectly) derefs to [`str`], all non-mutating methods
/// of [`str`] are available.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(SmartString);

impl Name {
	/// Obtain a reference to the inner string slice.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// Extract the inner string and return it.
	pub fn into_inner(self) -> SmartString {
		self.0
	}

	/// Construct a `Name` without checking the contents.
	///
	/// # Safety
	///
	/// The caller is responsible for ensuring that the passed string is in
	/// fact a valid name.
	pub unsafe fn from_string_unchecked<T: Into<SmartString>>(s: T) -> Self {
		Self(s.into())
	}

	/// Split the name into a prefix and a local part, if it is prefixed.
	///
	/// Returns `Some((prefix, local))` iff the name contains exactly one
	/// colon and both sides are valid names on their own. Any other
	/// arrangement (no colon, several colons, an empty side, or a side
	/// failing name validation) means the name is bare and `None` is
	/// returned.
	pub fn split_name(&self) -> Option<(&NameStr, &NameStr)> {
		let s = self.as_str();
		let colon = s.find(':')?;
		let prefix = &s[..colon];
		let local = &s[colon + 1..];
		if local.contains(':') {
			return None;
		}
		if validate_name(prefix).is_err() || validate_name(local).is_err() {
			return None;
		}
		// SAFETY: both sides were validated right above
		Some(unsafe {
			(
				NameStr::from_str_unchecked(prefix),
				NameStr::from_str_unchecked(local),
			)
		})
	}
}

impl Deref for Name {
	type Target = NameStr;

	fn deref(&self) -> &Self::Target {
		// SAFETY: the inner string was validated on construction
		unsafe { NameStr::from_str_unchecked(&self.0) }
	}
}

impl Hash for Name {
	fn hash<H: Hasher>(&self, state: &mut H) {
		// must agree with str's Hash for Borrow<str>-based map lookups
		self.as_str().hash(state)
	}
}

impl Borrow<str> for Name {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Borrow<NameStr> for Name {
	fn borrow(&self) -> &NameStr {
		self
	}
}

impl AsRef<str> for Name {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl AsRef<NameStr> for Name {
	fn as_ref(&self) -> &NameStr {
		self
	}
}

impl PartialEq<str> for Name {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<Name> for str {
	fn eq(&self, other: &Name) -> bool {
		other.0 == self
	}
}

impl PartialEq<&str> for Name {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

impl PartialEq<Name> for &str {
	fn eq(&self, other: &Name) -> bool {
		other.0 == *self
	}
}

impl fmt::Display for Name {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<&str> for Name {
	type Error = ValidationError;

	fn try_from(other: &str) -> Result<Self, Self::Error> {
		validate_name(other)?;
		Ok(Self(other.into()))
	}
}

impl TryFrom<String> for Name {
	type Error = ValidationError;

	fn try_from(other: String) -> Result<Self, Self::Error> {
		validate_name(&other)?;
		Ok(Self(other.into()))
	}
}

impl TryFrom<SmartString> for Name {
	type Error = ValidationError;

	fn try_from(other: SmartString) -> Result<Self, Self::Error> {
		validate_name(&other)?;
		Ok(Self(other))
	}
}

impl From<Name> for String {
	fn from(other: Name) -> Self {
		other.0.into()
	}
}

impl From<Name> for SmartString {
	fn from(other: Name) -> Self {
		other.0
	}
}

/// str which passed name validation.
///
/// [`NameStr`] corresponds to a (restricted) [`str`]. For a
/// [`String`]-like type with the same restriction, see [`Name`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NameStr(str);

impl NameStr {
	/// Validate a str and reinterpret it as a `NameStr` reference.
	pub fn from_str(s: &str) -> Result<&Self, ValidationError> {
		validate_name(s)?;
		// SAFETY: validated right above
		Ok(unsafe { Self::from_str_unchecked(s) })
	}

	/// Reinterpret a str as a `NameStr` reference without checking.
	///
	/// # Safety
	///
	/// The caller is responsible for ensuring that the passed str is in
	/// fact a valid name.
	pub unsafe fn from_str_unchecked(s: &str) -> &Self {
		// SAFETY: NameStr is a repr(transparent) wrapper around str
		std::mem::transmute(s)
	}

	/// Obtain a reference to the inner string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Create an owned copy of the string as [`Name`].
	pub fn to_name(&self) -> Name {
		self.into()
	}
}

impl Deref for NameStr {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl AsRef<str> for NameStr {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for NameStr {
	fn eq(&self, other: &str) -> bool {
		&self.0 == other
	}
}

impl PartialEq<NameStr> for str {
	fn eq(&self, other: &NameStr) -> bool {
		self == &other.0
	}
}

impl ToOwned for NameStr {
	type Owned = Name;

	fn to_owned(&self) -> Self::Owned {
		self.into()
	}
}

impl From<&NameStr> for Name {
	fn from(other: &NameStr) -> Self {
		// SAFETY: the source carries the same validation guarantee
		unsafe { Name::from_string_unchecked(&other.0) }
	}
}

impl fmt::Display for NameStr {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

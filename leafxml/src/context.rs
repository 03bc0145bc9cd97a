/*!
# Shared interning context

Namespace values recur heavily: most documents use a handful of namespaces
across thousands of elements. The [`Context`] interns them so every frame
and event referring to the same value shares one allocation.
*/
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use weak_table::WeakHashSet;

/**
# Shared context for one or more parsers

The context interns namespace values encountered in documents. It can be
shared between parsers through an immutable reference; interior mutability
takes care of the bookkeeping. The decoder is a single-threaded machine,
so the context is neither `Send` nor `Sync`.
*/
pub struct Context {
	values: RefCell<WeakHashSet<Weak<str>>>,
}

impl Context {
	/// Create a new context
	pub fn new() -> Context {
		Context {
			values: RefCell::new(WeakHashSet::new()),
		}
	}

	/// Intern a string value.
	///
	/// The value is interned in the context and a refcounted pointer is
	/// returned. When the last strong reference to that pointer expires,
	/// the value is lazily removed from the internal storage.
	pub fn intern(&self, value: &str) -> Rc<str> {
		let mut values = self.values.borrow_mut();
		match values.get(value) {
			Some(ptr) => ptr,
			None => {
				let ptr: Rc<str> = Rc::from(value);
				values.insert(ptr.clone());
				ptr
			}
		}
	}

	/// Remove all expired values from storage and shrink the storage to
	/// fit.
	///
	/// This should rarely be necessary to call; the internal storage
	/// prefers expiring unused values over reallocating.
	pub fn release_temporaries(&self) {
		let mut values = self.values.borrow_mut();
		values.remove_expired();
		values.shrink_to_fit();
	}

	/// Return the number of values interned.
	///
	/// The count includes values which are unreferenced and which would be
	/// removed before the next reallocation.
	pub fn len(&self) -> usize {
		self.values.borrow().len()
	}

	/// Return true if no values are interned.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Context {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("Context")
			.field("instance", &(self as *const Context))
			.field("values.len()", &self.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intern_shares_storage() {
		let ctx = Context::new();
		let a = ctx.intern("urn:example:ns");
		let b = ctx.intern("urn:example:ns");
		assert!(Rc::ptr_eq(&a, &b));
		assert_eq!(ctx.len(), 1);
	}

	#[test]
	fn interned_values_expire_with_their_last_user() {
		let ctx = Context::new();
		{
			let _v = ctx.intern("urn:example:gone");
		}
		ctx.release_temporaries();
		assert_eq!(ctx.len(), 0);
	}
}

//! Multicast delegate: an ordered, comparable list of callables.
//!
//! Semantics follow the classic event-delegate convention: callables run in
//! registration order, the return value of a multicast invocation is the
//! *last* callable's result, and removal scans newest-first so unregistering
//! matches the most recently added equal entry.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::core::error::{Error, Result};

/// Identity handle for a callable added without an explicit key.
///
/// Two distinct closures are never considered equal; the handle returned by
/// [`Delegate::add`] is the only way to remove such an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallableId(u64);

/// Equality key for one stored callable.
///
/// Function pointers compare by address, keyed closures by the caller's key,
/// and plain closures by an identity token minted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKey {
    /// Plain function pointer, compared by address.
    Ptr(usize),
    /// Caller-supplied key, compared by value.
    Keyed(u64),
    /// Identity token for an otherwise incomparable closure.
    Ident(u64),
}

/// One registered callable.
struct Entry<A, R> {
    /// Equality key for removal.
    key: EntryKey,
    /// The callable itself.
    call: Rc<dyn Fn(&A) -> R>,
}

impl<A, R> Clone for Entry<A, R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            call: Rc::clone(&self.call),
        }
    }
}

/// A multicast delegate over argument type `A` with result type `R`.
///
/// The common single-subscriber case stores its entry inline; the list only
/// spills to the heap on the second registration.
pub struct Delegate<A, R = ()> {
    /// Registered callables, in registration order.
    entries: SmallVec<[Entry<A, R>; 1]>,
    /// Next identity token for unkeyed closures.
    next_ident: u64,
}

impl<A, R> Default for Delegate<A, R> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
            next_ident: 0,
        }
    }
}

impl<A, R> Clone for Delegate<A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            next_ident: self.next_ident,
        }
    }
}

impl<A: 'static, R: 'static> Delegate<A, R> {
    /// Construct an empty delegate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered callables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no callables are registered.
    ///
    /// Callers that tolerate "maybe nobody is listening" should check this
    /// before [`Delegate::invoke`].
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all registered callables.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a plain function pointer. Equal pointers are equal entries.
    pub fn add_fn(&mut self, f: fn(&A) -> R) {
        self.entries.push(Entry {
            key: EntryKey::Ptr(f as usize),
            call: Rc::new(f),
        });
    }

    /// Append a closure with a caller-supplied equality key.
    pub fn add_keyed(&mut self, key: u64, f: impl Fn(&A) -> R + 'static) {
        self.entries.push(Entry {
            key: EntryKey::Keyed(key),
            call: Rc::new(f),
        });
    }

    /// Append a closure with identity-only equality and return its handle.
    pub fn add(&mut self, f: impl Fn(&A) -> R + 'static) -> CallableId {
        let id = self.next_ident;
        self.next_ident += 1;
        self.entries.push(Entry {
            key: EntryKey::Ident(id),
            call: Rc::new(f),
        });
        CallableId(id)
    }

    /// Remove the most recently added entry registered via [`Delegate::add_fn`]
    /// with this pointer. Returns whether a removal occurred.
    pub fn remove_fn(&mut self, f: fn(&A) -> R) -> bool {
        self.remove_key_inner(EntryKey::Ptr(f as usize))
    }

    /// Remove the most recently added entry with this caller key.
    pub fn remove_key(&mut self, key: u64) -> bool {
        self.remove_key_inner(EntryKey::Keyed(key))
    }

    /// Remove the entry identified by a handle from [`Delegate::add`].
    pub fn remove_id(&mut self, id: CallableId) -> bool {
        self.remove_key_inner(EntryKey::Ident(id.0))
    }

    /// Newest-first scan removing the first structurally equal entry.
    fn remove_key_inner(&mut self, key: EntryKey) -> bool {
        match self.entries.iter().rposition(|e| e.key == key) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Invoke every callable in registration order and return the last
    /// result. Fails with [`Error::EmptyDelegate`] when nothing is
    /// registered.
    pub fn invoke(&self, args: &A) -> Result<R> {
        let (last, rest) = self.entries.split_last().ok_or(Error::EmptyDelegate)?;
        for entry in rest {
            (entry.call)(args);
        }
        Ok((last.call)(args))
    }

    /// Invoke every callable in registration order, collecting all results.
    pub fn invoke_all(&self, args: &A) -> Vec<R> {
        self.entries.iter().map(|e| (e.call)(args)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn invoke_empty_fails() {
        let d: Delegate<i32, ()> = Delegate::new();
        assert_eq!(d.invoke(&1), Err(Error::EmptyDelegate));
    }

    #[test]
    fn invoke_returns_last_result() {
        let mut d: Delegate<i32, i32> = Delegate::new();
        d.add(|v| v + 1);
        d.add(|v| v + 2);
        d.add(|v| v + 3);
        assert_eq!(d.invoke(&10), Ok(13));
        assert_eq!(d.invoke_all(&10), vec![11, 12, 13]);
    }

    #[test]
    fn invocation_order_is_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d: Delegate<(), ()> = Delegate::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            d.add(move |_| log.borrow_mut().push(tag));
        }
        d.invoke(&()).unwrap();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_is_lifo_for_equal_entries() {
        /// Records which entry ran: the shared log for the LIFO test.
        fn a(log: &Rc<RefCell<Vec<&'static str>>>) {
            log.borrow_mut().push("a");
        }
        /// Second distinct callable for the LIFO test.
        fn b(log: &Rc<RefCell<Vec<&'static str>>>) {
            log.borrow_mut().push("b");
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d: Delegate<Rc<RefCell<Vec<&'static str>>>, ()> = Delegate::new();
        // A, B, A' where A' == A by pointer equality.
        d.add_fn(a);
        d.add_fn(b);
        d.add_fn(a);

        assert!(d.remove_fn(a));
        assert_eq!(d.len(), 2);
        d.invoke(&log).unwrap();
        // A and B survive, in their original order.
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn remove_missing_returns_false() {
        let mut d: Delegate<(), ()> = Delegate::new();
        d.add_keyed(1, |_| {});
        assert!(!d.remove_key(2));
        assert!(d.remove_key(1));
        assert!(d.is_empty());
    }

    #[test]
    fn distinct_closures_are_never_equal() {
        let mut d: Delegate<(), ()> = Delegate::new();
        let first = d.add(|_| {});
        let second = d.add(|_| {});
        assert_ne!(first, second);
        assert!(d.remove_id(second));
        assert!(d.remove_id(first));
        assert!(!d.remove_id(first));
    }

    #[test]
    fn clone_is_independent() {
        let mut d: Delegate<(), ()> = Delegate::new();
        d.add_keyed(7, |_| {});
        let mut clone = d.clone();
        assert!(clone.remove_key(7));
        assert_eq!(d.len(), 1);
        assert!(clone.is_empty());
    }
}

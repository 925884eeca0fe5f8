//! Dynamic objects: the runtime-typed boxing layer and change notification.
//!
//! Everything the binding engine can use as a source lives behind
//! [`DynamicObject`]: a downcastable trait object that may expose named
//! properties as [`Accessor`]s and a [`Notifier`] for change and death
//! notifications. [`Boxed`] wraps an arbitrary value with no property
//! surface; [`Observable`] wraps a single value and raises change
//! notifications on mutation, which is what makes it bindable.

use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

use downcast_rs::{Downcast, impl_downcast};

use crate::core::binding::Accessor;
use crate::core::delegate::Delegate;
use crate::core::error::{Error, Result};

/// Identifies one property of a dynamic object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(pub u64);

/// The single value property exposed by [`Observable`].
pub const OBSERVED_VALUE: PropertyId = PropertyId(0);

/// A runtime-typed object the binding engine can work with.
///
/// The default implementations expose no properties and no notifier, which
/// is what [`Boxed`] wants. Implementors with bindable state override both.
pub trait DynamicObject: Downcast {
    /// Resolve a property into an accessor bound to this object, or `None`
    /// if the object has no such property.
    fn property(self: Rc<Self>, id: PropertyId) -> Option<Accessor> {
        let _ = id;
        None
    }

    /// Change and death notification surface, if the object has one.
    fn notifier(&self) -> Option<&Notifier> {
        None
    }
}
impl_downcast!(DynamicObject);

/// True if the erased object is concretely a `T`.
pub fn is_type<T: DynamicObject>(obj: &dyn DynamicObject) -> bool {
    obj.as_any().is::<T>()
}

/// Recover the concrete type behind a shared dynamic object.
///
/// Fails with [`Error::InvalidCast`] naming the requested type.
pub fn dynamic_cast<T: DynamicObject>(obj: Rc<dyn DynamicObject>) -> Result<Rc<T>> {
    obj.downcast_rc::<T>()
        .map_err(|_| Error::InvalidCast(type_name::<T>().to_string()))
}

/// Argument carried by property change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChangedArgs {
    /// The property that changed.
    pub property: PropertyId,
}

/// Change and death notification surface of a dynamic object.
///
/// Raising clones the delegate before invoking it, so handlers may subscribe
/// and unsubscribe from inside a notification without re-entering the cell.
#[derive(Default)]
pub struct Notifier {
    /// Raised after a property value changes.
    changed: RefCell<Delegate<PropertyChangedArgs>>,
    /// Raised when the owning object is dropped.
    dead: RefCell<Delegate<()>>,
}

impl Notifier {
    /// New notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to property changes under a caller-chosen key.
    pub fn subscribe_changed(&self, key: u64, f: impl Fn(&PropertyChangedArgs) + 'static) {
        self.changed.borrow_mut().add_keyed(key, f);
    }

    /// Remove the most recent change subscription under `key`.
    pub fn unsubscribe_changed(&self, key: u64) -> bool {
        self.changed.borrow_mut().remove_key(key)
    }

    /// Subscribe to object death under a caller-chosen key.
    pub fn subscribe_dead(&self, key: u64, f: impl Fn(&()) + 'static) {
        self.dead.borrow_mut().add_keyed(key, f);
    }

    /// Remove the most recent death subscription under `key`.
    pub fn unsubscribe_dead(&self, key: u64) -> bool {
        self.dead.borrow_mut().remove_key(key)
    }

    /// Notify all change subscribers that `property` changed.
    pub fn raise_changed(&self, property: PropertyId) {
        let snapshot = self.changed.borrow().clone();
        if !snapshot.is_empty() {
            let _ = snapshot.invoke(&PropertyChangedArgs { property });
        }
    }

    /// Notify all death subscribers.
    pub fn raise_dead(&self) {
        let snapshot = self.dead.borrow().clone();
        if !snapshot.is_empty() {
            let _ = snapshot.invoke(&());
        }
    }
}

/// An arbitrary value boxed into the dynamic-object layer.
///
/// No property surface and no notifications: a `Boxed` exists so plain
/// values can travel through `Rc<dyn DynamicObject>` slots such as data
/// contexts and be recovered with [`dynamic_cast`].
pub struct Boxed<T> {
    /// The wrapped value.
    value: RefCell<T>,
}

impl<T: 'static> Boxed<T> {
    /// Box a value.
    pub fn new(value: T) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
        })
    }

    /// Replace the wrapped value.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    /// Run `f` against the wrapped value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Run `f` against the wrapped value mutably.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.borrow_mut())
    }
}

impl<T: Clone + 'static> Boxed<T> {
    /// Clone the wrapped value out.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T: 'static> DynamicObject for Boxed<T> {}

/// A single observable value: the canonical binding source.
///
/// Exposes its value as [`OBSERVED_VALUE`] and raises a change notification
/// whenever [`set`](Self::set) writes a different value. Writes that compare
/// equal to the current value are dropped, which is what keeps two-way
/// binding loops from ping-ponging.
pub struct Observable<T> {
    /// Current value.
    value: RefCell<T>,
    /// Change and death notifications.
    notifier: Notifier,
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// New observable holding `value`.
    pub fn new(value: T) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            notifier: Notifier::new(),
        })
    }

    /// Clone the current value out.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Write a new value, notifying subscribers if it differs from the
    /// current one.
    pub fn set(&self, value: T) {
        {
            let mut cur = self.value.borrow_mut();
            if *cur == value {
                return;
            }
            *cur = value;
        }
        self.notifier.raise_changed(OBSERVED_VALUE);
    }
}

impl<T: Clone + PartialEq + 'static> DynamicObject for Observable<T> {
    fn property(self: Rc<Self>, id: PropertyId) -> Option<Accessor> {
        if id != OBSERVED_VALUE {
            return None;
        }
        let read = Rc::downgrade(&self);
        let write = Rc::downgrade(&self);
        Some(Accessor::fallible(
            move || {
                read.upgrade()
                    .map(|o| o.get())
                    .ok_or_else(|| Error::Invalid("observable source dropped".into()))
            },
            move |v: T| {
                let o = write
                    .upgrade()
                    .ok_or_else(|| Error::Invalid("observable source dropped".into()))?;
                o.set(v);
                Ok(())
            },
        ))
    }

    fn notifier(&self) -> Option<&Notifier> {
        Some(&self.notifier)
    }
}

impl<T> Drop for Observable<T> {
    fn drop(&mut self) {
        self.notifier.raise_dead();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn boxed_round_trips_through_dynamic_cast() {
        let b: Rc<dyn DynamicObject> = Boxed::new("label".to_string());
        assert!(is_type::<Boxed<String>>(b.as_ref()));
        assert!(!is_type::<Boxed<i32>>(b.as_ref()));

        let back = dynamic_cast::<Boxed<String>>(Rc::clone(&b)).unwrap();
        assert_eq!(back.get(), "label");

        assert!(matches!(
            dynamic_cast::<Boxed<i32>>(b),
            Err(Error::InvalidCast(_))
        ));
    }

    #[test]
    fn observable_notifies_on_distinct_writes_only() {
        let obs = Observable::new(10_i32);
        let fired = Rc::new(Cell::new(0_u32));
        let f = Rc::clone(&fired);
        obs.notifier.subscribe_changed(1, move |args| {
            assert_eq!(args.property, OBSERVED_VALUE);
            f.set(f.get() + 1);
        });

        obs.set(10);
        assert_eq!(fired.get(), 0);
        obs.set(11);
        assert_eq!(fired.get(), 1);
        obs.set(11);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn observable_accessor_reads_and_writes() {
        let obs = Observable::new(1.0_f64);
        let dy: Rc<dyn DynamicObject> = Rc::clone(&obs) as Rc<dyn DynamicObject>;
        let acc = dy.property(OBSERVED_VALUE).unwrap();

        assert_eq!(acc.get_value::<f64>().unwrap(), 1.0);
        acc.set_value(4.5_f64).unwrap();
        assert_eq!(obs.get(), 4.5);
    }

    #[test]
    fn observable_accessor_fails_after_drop() {
        let obs = Observable::new(1_i32);
        let dy: Rc<dyn DynamicObject> = Rc::clone(&obs) as Rc<dyn DynamicObject>;
        let acc = Rc::clone(&dy).property(OBSERVED_VALUE).unwrap();
        drop(dy);
        drop(obs);
        assert!(acc.get_value::<i32>().is_err());
    }

    #[test]
    fn dropping_observable_raises_dead() {
        let obs = Observable::new(0_u8);
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        obs.notifier.subscribe_dead(7, move |_| f.set(true));
        drop(obs);
        assert!(fired.get());
    }
}

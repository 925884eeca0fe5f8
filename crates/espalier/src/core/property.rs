//! Reactive property cells.
//!
//! A [`Property`] holds no value of its own: reads and writes are routed
//! through closures bound once at construction time. This lets computed,
//! validated, or host-backed values present themselves as plain fields. The
//! cell itself performs no validation; the bound setter is free to coerce,
//! reject, or trigger side effects such as layout invalidation.

use std::any::type_name;
use std::rc::Rc;

use crate::core::binding::Accessor;
use crate::core::error::{Error, Result};

/// A typed cell indirecting reads and writes through bound closures.
pub struct Property<T> {
    /// Bound getter.
    get: Rc<dyn Fn() -> T>,
    /// Bound setter; absent for read-only cells.
    set: Option<Rc<dyn Fn(T)>>,
}

impl<T: 'static> Property<T> {
    /// Construct a read-write cell from a getter and a setter.
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Some(Rc::new(set)),
        }
    }

    /// Construct a read-only cell. Writes fail with
    /// [`Error::UnsupportedOperation`].
    pub fn read_only(get: impl Fn() -> T + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: None,
        }
    }

    /// True if the cell has no bound setter.
    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    /// Read the value through the bound getter.
    pub fn get(&self) -> T {
        (self.get)()
    }

    /// Write a value through the bound setter.
    pub fn set(&self, value: T) -> Result<()> {
        match &self.set {
            Some(set) => {
                set(value);
                Ok(())
            }
            None => Err(Error::UnsupportedOperation(format!(
                "write to read-only property of {}",
                type_name::<T>()
            ))),
        }
    }

    /// Erase the cell into an untyped accessor for the binding engine.
    pub fn accessor(&self) -> Accessor {
        let get = Rc::clone(&self.get);
        match &self.set {
            Some(set) => {
                let set = Rc::clone(set);
                Accessor::new(move || get(), move |v| set(v))
            }
            None => Accessor::read_only(move || get()),
        }
    }
}

impl<T: PartialEq + 'static> PartialEq<T> for Property<T> {
    fn eq(&self, other: &T) -> bool {
        self.get() == *other
    }
}

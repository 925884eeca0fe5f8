//! Data-binding primitives: untyped accessors, value converters, binding
//! modes and endpoints.
//!
//! The binding engine itself lives on [`crate::Tree`], which owns every
//! binding, resolves implicit sources against node data contexts, and flushes
//! change notifications. This module defines the value-level pieces: an
//! [`Accessor`] is a `(get, set)` pair bound to a specific object at
//! construction time, erased behind `TypeId`-tagged boxed values so the
//! engine can move data between endpoints without compile-time knowledge of
//! the concrete types involved.

use std::any::{Any, TypeId, type_name};
use std::rc::{Rc, Weak};

use crate::core::error::{Error, Result};
use crate::core::id::NodeId;
use crate::core::object::{DynamicObject, PropertyId};

/// Erased property value in transit between binding endpoints.
pub(crate) type Value = Box<dyn Any>;

/// Fallible erased getter.
type GetFn = Rc<dyn Fn() -> Result<Value>>;
/// Fallible erased setter.
type SetFn = Rc<dyn Fn(Value) -> Result<()>>;

/// An untyped `(get, set)` pair bound to a specific object.
///
/// Accessors are how arbitrary properties become visible to the binding
/// engine: the closures capture whatever object they read and write, and the
/// stored `TypeId` lets the engine type-check bindings fail-fast at
/// construction.
#[derive(Clone)]
pub struct Accessor {
    /// Value type this accessor reads and writes.
    value_type: TypeId,
    /// Human-readable name of the value type, for diagnostics.
    type_name: &'static str,
    /// Bound getter, if readable.
    get: Option<GetFn>,
    /// Bound setter, if writable.
    set: Option<SetFn>,
}

impl Accessor {
    /// Build a read-write accessor from infallible closures.
    pub fn new<T: 'static>(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self::fallible(move || Ok(get()), move |v| {
            set(v);
            Ok(())
        })
    }

    /// Build a read-only accessor. Writes fail with
    /// [`Error::UnsupportedOperation`].
    pub fn read_only<T: 'static>(get: impl Fn() -> T + 'static) -> Self {
        Self {
            value_type: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            get: Some(Rc::new(move || Ok(Box::new(get()) as Value))),
            set: None,
        }
    }

    /// Build a read-write accessor from fallible closures. Used where the
    /// underlying object may be gone by the time the accessor runs.
    pub fn fallible<T: 'static>(
        get: impl Fn() -> Result<T> + 'static,
        set: impl Fn(T) -> Result<()> + 'static,
    ) -> Self {
        Self {
            value_type: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            get: Some(Rc::new(move || get().map(|v| Box::new(v) as Value))),
            set: Some(Rc::new(move |v: Value| {
                let v = *v.downcast::<T>().map_err(|_| {
                    Error::TypeMismatch(format!("accessor expects {}", type_name::<T>()))
                })?;
                set(v)
            })),
        }
    }

    /// The value type this accessor reads and writes.
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Human-readable name of the value type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Read the erased value.
    pub(crate) fn get_boxed(&self) -> Result<Value> {
        match &self.get {
            Some(get) => get(),
            None => Err(Error::UnsupportedOperation(
                "accessor is write-only".into(),
            )),
        }
    }

    /// Write the erased value.
    pub(crate) fn set_boxed(&self, v: Value) -> Result<()> {
        match &self.set {
            Some(set) => set(v),
            None => Err(Error::UnsupportedOperation("accessor is read-only".into())),
        }
    }

    /// Typed read convenience.
    pub fn get_value<T: 'static>(&self) -> Result<T> {
        let v = self.get_boxed()?;
        v.downcast::<T>().map(|b| *b).map_err(|_| {
            Error::TypeMismatch(format!(
                "accessor holds {}, requested {}",
                self.type_name,
                type_name::<T>()
            ))
        })
    }

    /// Typed write convenience.
    pub fn set_value<T: 'static>(&self, v: T) -> Result<()> {
        self.set_boxed(Box::new(v))
    }
}

/// Direction of synchronization between a binding's source and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// Update the target once when the binding is created or rebound.
    OneTime,
    /// Source to target, on source change notifications.
    OneWay,
    /// Target to source, on target change notifications.
    OneWayToSource,
    /// Source and target update each other.
    TwoWay,
}

impl BindingMode {
    /// True if values flow from source to target.
    pub(crate) fn updates_target(self) -> bool {
        !matches!(self, Self::OneWayToSource)
    }

    /// True if values flow from target to source.
    pub(crate) fn updates_source(self) -> bool {
        matches!(self, Self::OneWayToSource | Self::TwoWay)
    }
}

/// Erased one-way conversion function.
type ConvertFn = Box<dyn Fn(Value) -> Result<Value>>;

/// A value converter bridging a source type and a target type.
///
/// A converter belongs to exactly one binding; it is moved into
/// [`crate::Tree::create_binding`] and owned by the binding for its lifetime.
pub struct Converter {
    /// Source value type.
    source: TypeId,
    /// Source type name, for diagnostics.
    source_name: &'static str,
    /// Target value type.
    target: TypeId,
    /// Target type name, for diagnostics.
    target_name: &'static str,
    /// Source-to-target conversion.
    convert: ConvertFn,
    /// Target-to-source conversion; required for two-way flows.
    convert_back: Option<ConvertFn>,
}

impl Converter {
    /// Build a one-way converter from source to target.
    pub fn new<S: 'static, T: 'static>(f: impl Fn(&S) -> T + 'static) -> Self {
        Self {
            source: TypeId::of::<S>(),
            source_name: type_name::<S>(),
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            convert: erase_conversion(f),
            convert_back: None,
        }
    }

    /// Add the target-to-source direction, enabling two-way bindings.
    pub fn with_back<S: 'static, T: 'static>(mut self, f: impl Fn(&T) -> S + 'static) -> Self {
        assert_eq!(self.source, TypeId::of::<S>(), "converter source mismatch");
        assert_eq!(self.target, TypeId::of::<T>(), "converter target mismatch");
        self.convert_back = Some(erase_conversion(f));
        self
    }

    /// Source value type.
    pub(crate) fn source_type(&self) -> TypeId {
        self.source
    }

    /// Target value type.
    pub(crate) fn target_type(&self) -> TypeId {
        self.target
    }

    /// True if the converter can run target-to-source.
    pub(crate) fn has_back(&self) -> bool {
        self.convert_back.is_some()
    }

    /// Convert a source value into a target value.
    pub(crate) fn convert(&self, v: Value) -> Result<Value> {
        (self.convert)(v)
    }

    /// Convert a target value back into a source value.
    pub(crate) fn convert_back(&self, v: Value) -> Result<Value> {
        match &self.convert_back {
            Some(back) => back(v),
            None => Err(Error::UnsupportedOperation(format!(
                "converter {} -> {} has no back conversion",
                self.source_name, self.target_name
            ))),
        }
    }
}

/// Erase a typed conversion closure.
fn erase_conversion<A: 'static, B: 'static>(f: impl Fn(&A) -> B + 'static) -> ConvertFn {
    Box::new(move |v: Value| {
        let v = v.downcast::<A>().map_err(|_| {
            Error::TypeMismatch(format!("converter expects {}", type_name::<A>()))
        })?;
        Ok(Box::new(f(&v)) as Value)
    })
}

/// Bindable properties of a tree element.
///
/// The element side of the binding surface: each variant names one value the
/// engine can read and write through the arena without a per-node accessor
/// closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeProperty {
    /// Explicit width, consumed by measurement.
    Width,
    /// Explicit height, consumed by measurement.
    Height,
    /// Left margin component.
    MarginLeft,
    /// Top margin component.
    MarginTop,
    /// Right margin component.
    MarginRight,
    /// Bottom margin component.
    MarginBottom,
    /// Packed 64-bit layout tag consumed by grid/dock strategies.
    LayoutTag,
    /// Float flag pinning the element to the viewport.
    Float,
}

impl NodeProperty {
    /// The value type read and written through this property.
    pub fn value_type(self) -> TypeId {
        match self {
            Self::Width
            | Self::Height
            | Self::MarginLeft
            | Self::MarginTop
            | Self::MarginRight
            | Self::MarginBottom => TypeId::of::<f64>(),
            Self::LayoutTag => TypeId::of::<u64>(),
            Self::Float => TypeId::of::<bool>(),
        }
    }

    /// Human-readable name of the value type.
    pub(crate) fn type_name(self) -> &'static str {
        match self {
            Self::LayoutTag => "u64",
            Self::Float => "bool",
            _ => "f64",
        }
    }
}

/// One end of a binding.
#[derive(Clone)]
pub enum Endpoint {
    /// A free-standing object property, reached through an accessor.
    Object {
        /// The owning object, when known; enables change/death
        /// subscriptions. Held weakly so a binding never keeps its source
        /// alive.
        object: Option<Weak<dyn DynamicObject>>,
        /// The property the accessor was looked up by, when known.
        property: Option<PropertyId>,
        /// The bound accessor.
        accessor: Accessor,
    },
    /// A bindable property of a tree element.
    Node(NodeId, NodeProperty),
}

impl Endpoint {
    /// Wrap a bare accessor with no notification surface.
    pub fn accessor(accessor: Accessor) -> Self {
        Self::Object {
            object: None,
            property: None,
            accessor,
        }
    }

    /// Resolve a property of a dynamic object into an endpoint.
    ///
    /// Fails with [`Error::Invalid`] if the object does not expose the
    /// property.
    pub fn object_property(object: &Rc<dyn DynamicObject>, property: PropertyId) -> Result<Self> {
        let accessor = Rc::clone(object)
            .property(property)
            .ok_or_else(|| Error::Invalid(format!("object has no property {property:?}")))?;
        Ok(Self::Object {
            object: Some(Rc::downgrade(object)),
            property: Some(property),
            accessor,
        })
    }

    /// A bindable tree-element property.
    pub fn node(id: NodeId, property: NodeProperty) -> Self {
        Self::Node(id, property)
    }

    /// The value type flowing through this endpoint.
    pub(crate) fn value_type(&self) -> TypeId {
        match self {
            Self::Object { accessor, .. } => accessor.value_type(),
            Self::Node(_, prop) => prop.value_type(),
        }
    }

    /// Human-readable name of the endpoint's value type.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Object { accessor, .. } => accessor.type_name(),
            Self::Node(_, prop) => prop.type_name(),
        }
    }
}

/// How a binding finds its source.
#[derive(Clone)]
pub enum SourceSpec {
    /// An explicit endpoint supplied at creation.
    Explicit(Endpoint),
    /// The anchored node's resolved data context, by property id.
    DataContext(PropertyId),
}

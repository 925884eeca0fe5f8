//! The element tree: arena storage, structure operations, routed dispatch,
//! data contexts and the binding engine.
//!
//! All node state lives in a `SlotMap` keyed by [`NodeId`]; the tree owns
//! every element and every binding. Layout pass sequencing is implemented on
//! this same type in [`crate::layout::pass`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::core::binding::{
    BindingMode, Converter, Endpoint, NodeProperty, SourceSpec, Value,
};
use crate::core::element::{Element, HorizontalAlign, VerticalAlign};
use crate::core::error::{Error, Result};
use crate::core::event::{EventKind, RoutedEventArgs};
use crate::core::id::{BindingId, NodeId};
use crate::core::object::{DynamicObject, PropertyId};
use crate::geom::{Rect, Size, Thickness};
use crate::layout::LayoutHost;

/// Where arranged rects go: the seam to whatever displays the tree.
///
/// The tree pushes placements after every arrange and teardown notices when
/// nodes die. Implementations translate these into native moves.
pub trait Backend {
    /// Node `uid` was arranged at `rect`, in parent coordinates.
    fn place(&mut self, uid: u64, rect: Rect);

    /// Node `uid` was removed from the tree.
    fn removed(&mut self, uid: u64);
}

/// Which end of a binding a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// The binding's source endpoint.
    Source,
    /// The binding's target endpoint.
    Target,
}

/// A queued binding notification, recorded by subscription closures and
/// drained by [`Tree::flush_bindings`].
enum Pending {
    /// The named side's value changed; propagate across the binding.
    Changed(BindingId, Side),
    /// The named side's object died; detach that endpoint.
    Dead(BindingId, Side),
}

/// Subscription sub-key distinguishing target-side subscriptions from
/// source-side ones on the same notifier.
const TARGET_SUB_KEY: u64 = 1 << 63;

/// One live binding.
struct BindingEntry {
    /// Where values land.
    target: Endpoint,
    /// Where values come from; `None` while an implicit source is
    /// unresolved or after the source object died.
    source: Option<Endpoint>,
    /// How the source is found when endpoints change.
    spec: SourceSpec,
    /// Node whose data context resolves the source and whose removal tears
    /// the binding down.
    anchor: Option<NodeId>,
    /// Synchronization direction.
    mode: BindingMode,
    /// Optional bridging converter, owned for the binding's lifetime.
    converter: Option<Converter>,
    /// True while an update is in flight. Shared with the binding's
    /// subscription closures so echo notifications are dropped at enqueue
    /// time, before they can go stale in the pending queue.
    updating: Rc<Cell<bool>>,
    /// True once the target object died.
    target_dead: bool,
}

/// Upper bound on notification rounds per flush. Bindings that keep
/// re-enqueueing each other past this are cyclic and get dropped with a
/// warning.
const MAX_FLUSH_ROUNDS: usize = 64;

/// A handler currently out of its slot while it runs.
struct InFlightHandler {
    /// Node whose slot the handler came from.
    node: NodeId,
    /// Event kind it is registered under.
    kind: EventKind,
    /// Set when the handler unregistered itself mid-dispatch, which vetoes
    /// the restore.
    removed: bool,
}

/// A retained element tree.
///
/// Not `Send`: all interior state is `Rc`/`RefCell`, one tree per thread.
pub struct Tree {
    /// Element storage.
    pub(crate) nodes: SlotMap<NodeId, Element>,
    /// Binding storage.
    bindings: SlotMap<BindingId, BindingEntry>,
    /// Source of element uids.
    next_uid: u64,
    /// Notifications queued by subscription closures.
    pending: Rc<RefCell<Vec<Pending>>>,
    /// Placement sink, if attached.
    pub(crate) backend: Option<Box<dyn Backend>>,
    /// Nesting depth of routed dispatch; deferred work runs at zero.
    dispatch_depth: u32,
    /// Handlers currently out of their slots, newest last.
    in_flight: Vec<InFlightHandler>,
    /// Mutations deferred from inside dispatch.
    deferred: Vec<Box<dyn FnOnce(&mut Tree)>>,
    /// Layout suspension count.
    pub(crate) suspend_count: u32,
    /// Roots invalidated while layout was suspended.
    pub(crate) dirty: Vec<NodeId>,
    /// Re-entrancy guard for [`Self::flush_bindings`].
    flushing: bool,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            bindings: SlotMap::with_key(),
            next_uid: 1,
            pending: Rc::new(RefCell::new(Vec::new())),
            backend: None,
            dispatch_depth: 0,
            in_flight: Vec::new(),
            deferred: Vec::new(),
            suspend_count: 0,
            dirty: Vec::new(),
            flushing: false,
        }
    }

    /// Attach the placement sink.
    pub fn set_backend(&mut self, backend: Box<dyn Backend>) {
        self.backend = Some(backend);
    }

    /// Borrow an element.
    pub(crate) fn el(&self, id: NodeId) -> Result<&Element> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow an element mutably.
    pub(crate) fn el_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    // ------------------------------------------------------------------
    // Structure

    /// Create a detached node.
    pub fn new_node(&mut self) -> NodeId {
        let uid = self.next_uid;
        self.next_uid += 1;
        let id = self.nodes.insert(Element::new(uid));
        trace!(uid, "node created");
        id
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True if `id` is a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The node's stable uid.
    pub fn uid(&self, id: NodeId) -> Result<u64> {
        Ok(self.el(id)?.uid)
    }

    /// Find the node carrying `uid`, if any.
    pub fn find_by_uid(&self, uid: u64) -> Option<NodeId> {
        self.nodes.iter().find(|(_, e)| e.uid == uid).map(|(k, _)| k)
    }

    /// The node's parent, if attached.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.el(id)?.parent)
    }

    /// The node's children, in insertion order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.el(id)?.children.clone())
    }

    /// True if `ancestor` is `id` or an ancestor of `id`.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> Result<bool> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return Ok(true);
            }
            cur = self.el(n)?.parent;
        }
        Ok(false)
    }

    /// Append `child` to `parent`'s children.
    ///
    /// The child must be detached; attaching an ancestor of `parent` is
    /// rejected to keep the tree acyclic.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if self.el(child)?.parent.is_some() {
            return Err(Error::Invalid("child already has a parent".into()));
        }
        if self.is_ancestor_or_self(child, parent)? {
            return Err(Error::Invalid("attach would create a cycle".into()));
        }
        self.el_mut(child)?.parent = Some(parent);
        self.el_mut(parent)?.children.push(child);
        self.refresh_implicit_bindings(child)?;
        self.invalidate(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The subtree stays alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.el(child)?.parent != Some(parent) {
            return Err(Error::Invalid("node is not a child of that parent".into()));
        }
        self.el_mut(parent)?.children.retain(|&c| c != child);
        self.el_mut(child)?.parent = None;
        self.refresh_implicit_bindings(child)?;
        self.invalidate(parent);
        Ok(())
    }

    /// Move `child` under `new_parent`, detaching from its current parent
    /// first. Attach checks run before the detach, so a failed reparent
    /// leaves the tree unchanged.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        if !self.nodes.contains_key(new_parent) {
            return Err(Error::NodeNotFound(new_parent));
        }
        if self.is_ancestor_or_self(child, new_parent)? {
            return Err(Error::Invalid("attach would create a cycle".into()));
        }
        if let Some(old) = self.el(child)?.parent {
            if old == new_parent {
                return Ok(());
            }
            self.el_mut(old)?.children.retain(|&c| c != child);
            self.invalidate(old);
        }
        self.el_mut(child)?.parent = Some(new_parent);
        self.el_mut(new_parent)?.children.push(child);
        self.refresh_implicit_bindings(child)?;
        self.invalidate(new_parent);
        Ok(())
    }

    /// Destroy `id` and its whole subtree.
    ///
    /// Detaches from the parent first, then tears down bindings and
    /// subscriptions for every node in the subtree, then releases the nodes.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        let parent = self.el(id)?.parent;
        if let Some(p) = parent {
            self.el_mut(p)?.children.retain(|&c| c != id);
        }
        self.el_mut(id)?.parent = None;

        let subtree = self.collect_subtree(id);
        let doomed: Vec<BindingId> = self
            .bindings
            .iter()
            .filter(|(_, e)| binding_touches(e, &subtree))
            .map(|(k, _)| k)
            .collect();
        for b in doomed {
            self.remove_binding(b);
        }

        for n in subtree {
            if let Some(el) = self.nodes.remove(n) {
                if let Some(backend) = &mut self.backend {
                    backend.removed(el.uid);
                }
            }
        }
        if let Some(p) = parent {
            self.invalidate(p);
        }
        Ok(())
    }

    /// The subtree rooted at `id`, preorder.
    pub(crate) fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(el) = self.nodes.get(n) {
                out.push(n);
                stack.extend(el.children.iter().rev());
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Element surface

    /// The node's outer margin.
    pub fn margin(&self, id: NodeId) -> Result<Thickness> {
        Ok(self.el(id)?.margin)
    }

    /// Set the node's outer margin.
    pub fn set_margin(&mut self, id: NodeId, margin: Thickness) -> Result<()> {
        let el = self.el_mut(id)?;
        if el.margin == margin {
            return Ok(());
        }
        el.margin = margin;
        for p in [
            NodeProperty::MarginLeft,
            NodeProperty::MarginTop,
            NodeProperty::MarginRight,
            NodeProperty::MarginBottom,
        ] {
            self.node_property_changed(id, p);
        }
        self.invalidate(id);
        Ok(())
    }

    /// The node's horizontal alignment.
    pub fn h_align(&self, id: NodeId) -> Result<HorizontalAlign> {
        Ok(self.el(id)?.h_align)
    }

    /// Set the node's horizontal alignment.
    pub fn set_h_align(&mut self, id: NodeId, align: HorizontalAlign) -> Result<()> {
        self.el_mut(id)?.h_align = align;
        self.invalidate(id);
        Ok(())
    }

    /// The node's vertical alignment.
    pub fn v_align(&self, id: NodeId) -> Result<VerticalAlign> {
        Ok(self.el(id)?.v_align)
    }

    /// Set the node's vertical alignment.
    pub fn set_v_align(&mut self, id: NodeId, align: VerticalAlign) -> Result<()> {
        self.el_mut(id)?.v_align = align;
        self.invalidate(id);
        Ok(())
    }

    /// The node's explicit size.
    pub fn size(&self, id: NodeId) -> Result<Size> {
        let el = self.el(id)?;
        Ok(Size::new(el.width, el.height))
    }

    /// Set the node's explicit width.
    pub fn set_width(&mut self, id: NodeId, width: f64) -> Result<()> {
        let el = self.el_mut(id)?;
        if el.width == width {
            return Ok(());
        }
        el.width = width;
        self.node_property_changed(id, NodeProperty::Width);
        self.invalidate(id);
        Ok(())
    }

    /// Set the node's explicit height.
    pub fn set_height(&mut self, id: NodeId, height: f64) -> Result<()> {
        let el = self.el_mut(id)?;
        if el.height == height {
            return Ok(());
        }
        el.height = height;
        self.node_property_changed(id, NodeProperty::Height);
        self.invalidate(id);
        Ok(())
    }

    /// Set both explicit dimensions at once.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        self.set_width(id, size.width)?;
        self.set_height(id, size.height)
    }

    /// Desired size cached by the last measure pass, margins included.
    pub fn desired_size(&self, id: NodeId) -> Result<Size> {
        Ok(self.el(id)?.desired)
    }

    /// Rect assigned by the last arrange pass, in parent coordinates.
    pub fn arranged_rect(&self, id: NodeId) -> Result<Rect> {
        Ok(self.el(id)?.rect)
    }

    /// The node's packed layout tag.
    pub fn layout_tag(&self, id: NodeId) -> Result<u64> {
        Ok(self.el(id)?.layout_tag)
    }

    /// Set the node's packed layout tag.
    pub fn set_layout_tag(&mut self, id: NodeId, tag: u64) -> Result<()> {
        let el = self.el_mut(id)?;
        if el.layout_tag == tag {
            return Ok(());
        }
        el.layout_tag = tag;
        self.node_property_changed(id, NodeProperty::LayoutTag);
        self.invalidate(id);
        Ok(())
    }

    /// Whether the node floats above its parent's scrolled content.
    pub fn float(&self, id: NodeId) -> Result<bool> {
        Ok(self.el(id)?.float)
    }

    /// Pin or unpin the node relative to its parent's viewport.
    pub fn set_float(&mut self, id: NodeId, float: bool) -> Result<()> {
        let el = self.el_mut(id)?;
        if el.float == float {
            return Ok(());
        }
        el.float = float;
        self.node_property_changed(id, NodeProperty::Float);
        self.invalidate(id);
        Ok(())
    }

    /// Install the node's child-layout strategy.
    pub fn set_layout_host(&mut self, id: NodeId, host: Box<dyn LayoutHost>) -> Result<()> {
        self.el_mut(id)?.host = Some(host);
        self.invalidate(id);
        Ok(())
    }

    /// Remove the node's child-layout strategy.
    pub fn clear_layout_host(&mut self, id: NodeId) -> Result<()> {
        self.el_mut(id)?.host = None;
        self.invalidate(id);
        Ok(())
    }

    /// True if the node sizes itself from its strategy's result.
    pub fn auto_size(&self, id: NodeId) -> Result<bool> {
        Ok(self.el(id)?.auto_size)
    }

    /// Choose between strategy-derived and explicit container size.
    pub fn set_auto_size(&mut self, id: NodeId, auto: bool) -> Result<()> {
        self.el_mut(id)?.auto_size = auto;
        self.invalidate(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Data context

    /// The node's own data context, if locally set.
    pub fn data_context(&self, id: NodeId) -> Result<Option<Rc<dyn DynamicObject>>> {
        Ok(self.el(id)?.data_context.clone())
    }

    /// The context the node actually sees: its own if set, else the nearest
    /// ancestor's.
    pub fn effective_data_context(&self, id: NodeId) -> Result<Option<Rc<dyn DynamicObject>>> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let el = self.el(n)?;
            if let Some(ctx) = &el.data_context {
                return Ok(Some(Rc::clone(ctx)));
            }
            cur = el.parent;
        }
        Ok(None)
    }

    /// Set or clear the node's own data context.
    ///
    /// Re-resolves every implicit-source binding anchored at or below the
    /// node, then raises [`EventKind::DATA_CONTEXT_CHANGED`] from it.
    pub fn set_data_context(
        &mut self,
        id: NodeId,
        ctx: Option<Rc<dyn DynamicObject>>,
    ) -> Result<()> {
        self.el_mut(id)?.data_context = ctx;
        self.refresh_implicit_bindings(id)?;
        self.raise(id, EventKind::DATA_CONTEXT_CHANGED)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Routed events

    /// Register the node's handler for `kind`, replacing any existing one.
    pub fn add_handler(
        &mut self,
        id: NodeId,
        kind: EventKind,
        handler: impl FnMut(&mut Tree, NodeId, &mut RoutedEventArgs) + 'static,
    ) -> Result<()> {
        self.el_mut(id)?.handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    /// Remove the node's handler for `kind`.
    pub fn remove_handler(&mut self, id: NodeId, kind: EventKind) -> Result<bool> {
        if self.el_mut(id)?.handlers.remove(&kind).is_some() {
            return Ok(true);
        }
        // The handler may be out of its slot while it runs; removing it then
        // vetoes the restore instead.
        for f in self.in_flight.iter_mut().rev() {
            if f.node == id && f.kind == kind && !f.removed {
                f.removed = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Raise a payload-free event from `origin`.
    pub fn raise(&mut self, origin: NodeId, kind: EventKind) -> Result<bool> {
        let mut args = RoutedEventArgs::new(kind);
        self.raise_event(origin, &mut args)
    }

    /// Bubble `args` from `origin` toward the root.
    ///
    /// Each node on the path may run one handler; a handler setting
    /// `args.handled` stops the walk. Returns whether the event was handled.
    /// While a handler runs it is taken out of its node's slot, so it never
    /// re-enters itself; structural mutation from inside a handler should go
    /// through [`Tree::defer`].
    pub fn raise_event(&mut self, origin: NodeId, args: &mut RoutedEventArgs) -> Result<bool> {
        if !self.nodes.contains_key(origin) {
            return Err(Error::NodeNotFound(origin));
        }
        trace!(kind = ?args.kind, "routed event");
        self.dispatch_depth += 1;
        let mut cur = Some(origin);
        while let Some(n) = cur {
            let next = self.nodes.get(n).and_then(|el| el.parent);
            let slot = self
                .nodes
                .get_mut(n)
                .and_then(|el| el.handlers.remove(&args.kind));
            if let Some(mut handler) = slot {
                self.in_flight.push(InFlightHandler {
                    node: n,
                    kind: args.kind,
                    removed: false,
                });
                handler(self, origin, args);
                let removed = self.in_flight.pop().is_some_and(|f| f.removed);
                // Restore unless the handler replaced or removed itself, or
                // the node died under us.
                if !removed
                    && let Some(el) = self.nodes.get_mut(n)
                {
                    el.handlers.entry(args.kind).or_insert(handler);
                }
                if args.handled {
                    break;
                }
            }
            cur = next;
        }
        self.dispatch_depth -= 1;
        if self.dispatch_depth == 0 {
            self.run_deferred();
        }
        Ok(args.handled)
    }

    /// Run `f` now, or after the outermost in-flight dispatch finishes.
    ///
    /// The safe way for a handler to mutate tree structure.
    pub fn defer(&mut self, f: impl FnOnce(&mut Tree) + 'static) {
        if self.dispatch_depth == 0 {
            f(self);
        } else {
            self.deferred.push(Box::new(f));
        }
    }

    /// Drain the deferred queue, including work deferred by deferred work.
    fn run_deferred(&mut self) {
        while !self.deferred.is_empty() {
            let batch: Vec<_> = self.deferred.drain(..).collect();
            for f in batch {
                f(self);
            }
        }
    }

    // ------------------------------------------------------------------
    // Bindings

    /// Create a binding between explicit endpoints.
    ///
    /// Endpoint value types must match, or `converter` must bridge them
    /// (with a back conversion if values flow toward the source). The
    /// initial synchronization runs before this returns.
    pub fn create_binding(
        &mut self,
        target: Endpoint,
        source: Endpoint,
        mode: BindingMode,
        converter: Option<Converter>,
    ) -> Result<BindingId> {
        check_types(&target, &source, mode, converter.as_ref())?;
        let spec = SourceSpec::Explicit(source.clone());
        let id = self.bindings.insert(BindingEntry {
            target,
            source: Some(source),
            spec,
            anchor: None,
            mode,
            converter,
            updating: Rc::new(Cell::new(false)),
            target_dead: false,
        });
        self.subscribe_endpoints(id);
        self.initial_sync(id);
        debug!(binding = id.as_u64(), "binding created");
        Ok(id)
    }

    /// Anchor a binding at `node` with an implicit source: the node's
    /// resolved data context, looked up by `source_property`.
    ///
    /// The binding follows data-context changes and dies with the node. If
    /// the node currently resolves no context the binding stays dormant
    /// until one appears.
    pub fn bind_node(
        &mut self,
        node: NodeId,
        target_property: NodeProperty,
        source_property: PropertyId,
        mode: BindingMode,
        converter: Option<Converter>,
    ) -> Result<BindingId> {
        if !self.nodes.contains_key(node) {
            return Err(Error::NodeNotFound(node));
        }
        let id = self.bindings.insert(BindingEntry {
            target: Endpoint::node(node, target_property),
            source: None,
            spec: SourceSpec::DataContext(source_property),
            anchor: Some(node),
            mode,
            converter,
            updating: Rc::new(Cell::new(false)),
            target_dead: false,
        });
        self.resolve_source(id)?;
        debug!(binding = id.as_u64(), "node binding created");
        Ok(id)
    }

    /// Tear a binding down, unsubscribing both endpoints.
    pub fn remove_binding(&mut self, id: BindingId) -> bool {
        let Some(entry) = self.bindings.remove(id) else {
            return false;
        };
        unsubscribe_endpoint(entry.source.as_ref(), id.as_u64());
        unsubscribe_endpoint(Some(&entry.target), id.as_u64() ^ TARGET_SUB_KEY);
        true
    }

    /// Number of live bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Push the source value across the binding. Failures (dead or
    /// unresolved endpoints, conversion errors) are logged and reported as
    /// `false`.
    pub fn update_target(&mut self, id: BindingId) -> bool {
        self.propagate(id, Side::Target)
    }

    /// Push the target value back to the source. Failures are logged and
    /// reported as `false`.
    pub fn update_source(&mut self, id: BindingId) -> bool {
        self.propagate(id, Side::Source)
    }

    /// Move one value across a binding toward `dest`.
    fn propagate(&mut self, id: BindingId, dest: Side) -> bool {
        let (from, to, converter, updating) = {
            let Some(e) = self.bindings.get_mut(id) else {
                return false;
            };
            if e.updating.get() {
                return true;
            }
            if e.target_dead {
                return false;
            }
            let Some(source) = e.source.clone() else {
                return false;
            };
            e.updating.set(true);
            let flag = Rc::clone(&e.updating);
            let conv = e.converter.take();
            match dest {
                Side::Target => (source, e.target.clone(), conv, flag),
                Side::Source => (e.target.clone(), source, conv, flag),
            }
        };
        let outcome = (|| -> Result<()> {
            let mut v = self.endpoint_get(&from)?;
            if let Some(c) = &converter {
                v = match dest {
                    Side::Target => c.convert(v)?,
                    Side::Source => c.convert_back(v)?,
                };
            }
            self.endpoint_set(&to, v)
        })();
        updating.set(false);
        if let Some(e) = self.bindings.get_mut(id)
            && let Some(c) = converter
        {
            e.converter = Some(c);
        }
        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!(binding = id.as_u64(), %err, "binding update failed");
                false
            }
        }
    }

    /// Read a value out of an endpoint.
    fn endpoint_get(&mut self, ep: &Endpoint) -> Result<Value> {
        match ep {
            Endpoint::Object { accessor, .. } => accessor.get_boxed(),
            Endpoint::Node(id, prop) => {
                let el = self.el(*id)?;
                Ok(match prop {
                    NodeProperty::Width => Box::new(el.width) as Value,
                    NodeProperty::Height => Box::new(el.height) as Value,
                    NodeProperty::MarginLeft => Box::new(el.margin.left) as Value,
                    NodeProperty::MarginTop => Box::new(el.margin.top) as Value,
                    NodeProperty::MarginRight => Box::new(el.margin.right) as Value,
                    NodeProperty::MarginBottom => Box::new(el.margin.bottom) as Value,
                    NodeProperty::LayoutTag => Box::new(el.layout_tag) as Value,
                    NodeProperty::Float => Box::new(el.float) as Value,
                })
            }
        }
    }

    /// Write a value into an endpoint. Node writes go through the public
    /// setters, so other bindings watching the property still hear about
    /// the change; the in-flight binding itself is muted by its `updating`
    /// flag.
    fn endpoint_set(&mut self, ep: &Endpoint, v: Value) -> Result<()> {
        match ep {
            Endpoint::Object { accessor, .. } => accessor.set_boxed(v),
            Endpoint::Node(id, prop) => {
                let type_err = || {
                    Error::TypeMismatch(format!("node property expects {}", prop.type_name()))
                };
                match prop {
                    NodeProperty::LayoutTag => {
                        let v = *v.downcast::<u64>().map_err(|_| type_err())?;
                        self.set_layout_tag(*id, v)
                    }
                    NodeProperty::Float => {
                        let v = *v.downcast::<bool>().map_err(|_| type_err())?;
                        self.set_float(*id, v)
                    }
                    _ => {
                        let v = *v.downcast::<f64>().map_err(|_| type_err())?;
                        match prop {
                            NodeProperty::Width => self.set_width(*id, v),
                            NodeProperty::Height => self.set_height(*id, v),
                            _ => {
                                let mut m = self.el(*id)?.margin;
                                match prop {
                                    NodeProperty::MarginLeft => m.left = v,
                                    NodeProperty::MarginTop => m.top = v,
                                    NodeProperty::MarginRight => m.right = v,
                                    NodeProperty::MarginBottom => m.bottom = v,
                                    _ => unreachable!(),
                                }
                                self.set_margin(*id, m)
                            }
                        }
                    }
                }
            }
        }
    }

    /// Queue updates for every binding with an endpoint on this node
    /// property. Called by the element setters.
    fn node_property_changed(&mut self, id: NodeId, prop: NodeProperty) {
        let mut queue = self.pending.borrow_mut();
        for (bid, e) in &self.bindings {
            if e.updating.get() {
                continue;
            }
            if matches!(e.target, Endpoint::Node(n, p) if n == id && p == prop)
                && e.mode.updates_source()
            {
                queue.push(Pending::Changed(bid, Side::Source));
            }
            if matches!(e.source, Some(Endpoint::Node(n, p)) if n == id && p == prop)
                && e.mode.updates_target()
                && e.mode != BindingMode::OneTime
            {
                queue.push(Pending::Changed(bid, Side::Target));
            }
        }
    }

    /// Drain the pending notification queue, propagating values until it is
    /// empty or the round limit trips.
    pub fn flush_bindings(&mut self) {
        if self.flushing {
            return;
        }
        self.flushing = true;
        for round in 0.. {
            let batch: Vec<Pending> = self.pending.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            if round >= MAX_FLUSH_ROUNDS {
                warn!("binding notification cycle; dropping {} updates", batch.len());
                break;
            }
            for p in batch {
                match p {
                    Pending::Changed(id, dest) => {
                        self.propagate(id, dest);
                    }
                    Pending::Dead(id, side) => self.endpoint_died(id, side),
                }
            }
        }
        self.flushing = false;
    }

    /// Detach the named end of a binding whose object died.
    fn endpoint_died(&mut self, id: BindingId, side: Side) {
        if let Some(e) = self.bindings.get_mut(id) {
            match side {
                Side::Source => e.source = None,
                Side::Target => e.target_dead = true,
            }
            debug!(binding = id.as_u64(), ?side, "binding endpoint died");
        }
    }

    /// Run the creation-time synchronization for the binding's mode.
    fn initial_sync(&mut self, id: BindingId) {
        let mode = match self.bindings.get(id) {
            Some(e) => e.mode,
            None => return,
        };
        if mode.updates_target() {
            self.update_target(id);
        } else {
            self.update_source(id);
        }
    }

    /// Subscribe to change and death notifications on whichever endpoints
    /// carry a notifier.
    fn subscribe_endpoints(&mut self, id: BindingId) {
        let Some(e) = self.bindings.get(id) else {
            return;
        };
        let mode = e.mode;
        if mode != BindingMode::OneTime && mode.updates_target() {
            subscribe_endpoint(
                e.source.as_ref(),
                id,
                Side::Target,
                id.as_u64(),
                &self.pending,
                &e.updating,
            );
        }
        if mode.updates_source() {
            subscribe_endpoint(
                Some(&e.target),
                id,
                Side::Source,
                id.as_u64() ^ TARGET_SUB_KEY,
                &self.pending,
                &e.updating,
            );
        }
        // Death is always interesting, even for OneTime sources that will
        // never fire again.
        subscribe_dead(e.source.as_ref(), id, Side::Source, id.as_u64(), &self.pending);
        subscribe_dead(
            Some(&e.target),
            id,
            Side::Target,
            id.as_u64() ^ TARGET_SUB_KEY,
            &self.pending,
        );
    }

    /// Resolve (or re-resolve) an implicit source against the anchor's
    /// current data context, rewiring subscriptions and re-running the
    /// initial synchronization when the source actually changes.
    fn resolve_source(&mut self, id: BindingId) -> Result<()> {
        let (anchor, prop, mode, old) = {
            let Some(e) = self.bindings.get(id) else {
                return Ok(());
            };
            let SourceSpec::DataContext(prop) = e.spec else {
                return Ok(());
            };
            let Some(anchor) = e.anchor else {
                return Ok(());
            };
            (anchor, prop, e.mode, e.source.clone())
        };
        let ctx = self.effective_data_context(anchor)?;

        let same = match (&old, &ctx) {
            (None, None) => true,
            (Some(Endpoint::Object { object: Some(a), .. }), Some(b)) => {
                a.upgrade().is_some_and(|a| Rc::ptr_eq(&a, b))
            }
            _ => false,
        };
        if same {
            return Ok(());
        }

        unsubscribe_endpoint(old.as_ref(), id.as_u64());
        // Resolution failures leave the binding dormant rather than failing
        // the structural operation that triggered the re-resolve.
        let resolved = match &ctx {
            Some(obj) => {
                let checked = Endpoint::object_property(obj, prop).and_then(|ep| {
                    match self.bindings.get(id) {
                        Some(e) => {
                            check_types(&e.target, &ep, mode, e.converter.as_ref())?;
                            Ok(ep)
                        }
                        None => Ok(ep),
                    }
                });
                match checked {
                    Ok(ep) => Some(ep),
                    Err(err) => {
                        warn!(binding = id.as_u64(), %err, "implicit source rejected");
                        None
                    }
                }
            }
            None => None,
        };
        let updating = match self.bindings.get_mut(id) {
            Some(e) => {
                e.source = resolved.clone();
                Rc::clone(&e.updating)
            }
            None => return Ok(()),
        };
        if resolved.is_some() {
            if mode != BindingMode::OneTime && mode.updates_target() {
                subscribe_endpoint(
                    resolved.as_ref(),
                    id,
                    Side::Target,
                    id.as_u64(),
                    &self.pending,
                    &updating,
                );
            }
            subscribe_dead(resolved.as_ref(), id, Side::Source, id.as_u64(), &self.pending);
            self.initial_sync(id);
        }
        Ok(())
    }

    /// Re-resolve every implicit binding anchored at or below `node`.
    fn refresh_implicit_bindings(&mut self, node: NodeId) -> Result<()> {
        let candidates: Vec<BindingId> = self
            .bindings
            .iter()
            .filter(|(_, e)| matches!(e.spec, SourceSpec::DataContext(_)))
            .filter_map(|(k, e)| e.anchor.map(|a| (k, a)))
            .filter(|&(_, a)| self.is_ancestor_or_self(node, a).unwrap_or(false))
            .map(|(k, _)| k)
            .collect();
        for id in candidates {
            self.resolve_source(id)?;
        }
        Ok(())
    }
}

/// True if the binding is anchored to or has an endpoint on any node in
/// `subtree`.
fn binding_touches(e: &BindingEntry, subtree: &[NodeId]) -> bool {
    let hits = |n: NodeId| subtree.contains(&n);
    e.anchor.is_some_and(hits)
        || matches!(e.target, Endpoint::Node(n, _) if hits(n))
        || matches!(e.source, Some(Endpoint::Node(n, _)) if hits(n))
}

/// Fail unless source values can reach the target (and back, for modes that
/// flow toward the source).
fn check_types(
    target: &Endpoint,
    source: &Endpoint,
    mode: BindingMode,
    converter: Option<&Converter>,
) -> Result<()> {
    match converter {
        None => {
            if source.value_type() != target.value_type() {
                return Err(Error::TypeMismatch(format!(
                    "binding source is {}, target is {}",
                    source.type_name(),
                    target.type_name()
                )));
            }
        }
        Some(c) => {
            if c.source_type() != source.value_type() || c.target_type() != target.value_type() {
                return Err(Error::TypeMismatch(format!(
                    "converter does not bridge {} to {}",
                    source.type_name(),
                    target.type_name()
                )));
            }
            if mode.updates_source() && !c.has_back() {
                return Err(Error::TypeMismatch(
                    "two-way binding needs a back conversion".into(),
                ));
            }
        }
    }
    Ok(())
}

/// Subscribe a binding to change notifications on an object endpoint.
///
/// The closure consults `updating` before enqueueing: a change raised while
/// the binding itself is writing is an echo, and queueing it would let it
/// fire later with a stale value.
fn subscribe_endpoint(
    ep: Option<&Endpoint>,
    id: BindingId,
    dest: Side,
    key: u64,
    pending: &Rc<RefCell<Vec<Pending>>>,
    updating: &Rc<Cell<bool>>,
) {
    let Some(Endpoint::Object {
        object: Some(weak),
        property,
        ..
    }) = ep
    else {
        return;
    };
    let Some(obj) = weak.upgrade() else {
        return;
    };
    let Some(notifier) = obj.notifier() else {
        return;
    };
    let filter = *property;
    let queue = Rc::clone(pending);
    let in_flight = Rc::clone(updating);
    notifier.subscribe_changed(key, move |args| {
        if !in_flight.get() && filter.is_none_or(|p| p == args.property) {
            queue.borrow_mut().push(Pending::Changed(id, dest));
        }
    });
}

/// Subscribe a binding to the death of an object endpoint.
fn subscribe_dead(
    ep: Option<&Endpoint>,
    id: BindingId,
    side: Side,
    key: u64,
    pending: &Rc<RefCell<Vec<Pending>>>,
) {
    let Some(Endpoint::Object {
        object: Some(weak), ..
    }) = ep
    else {
        return;
    };
    let Some(obj) = weak.upgrade() else {
        return;
    };
    let Some(notifier) = obj.notifier() else {
        return;
    };
    let queue = Rc::clone(pending);
    notifier.subscribe_dead(key, move |_| {
        queue.borrow_mut().push(Pending::Dead(id, side));
    });
}

/// Drop a binding's subscriptions on an object endpoint.
fn unsubscribe_endpoint(ep: Option<&Endpoint>, key: u64) {
    if let Some(Endpoint::Object {
        object: Some(weak), ..
    }) = ep
    {
        if let Some(obj) = weak.upgrade() {
            if let Some(notifier) = obj.notifier() {
                notifier.unsubscribe_changed(key);
                notifier.unsubscribe_dead(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::core::object::{Boxed, Observable, OBSERVED_VALUE};
    use crate::core::property::Property;
    use crate::geom::Size;

    use super::*;

    /// A tree with a root-parent-child chain.
    fn chain() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.new_node();
        let mid = tree.new_node();
        let leaf = tree.new_node();
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();
        (tree, root, mid, leaf)
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = Tree::new();
        let root = tree.new_node();
        let kids: Vec<NodeId> = (0..3).map(|_| tree.new_node()).collect();
        for &k in &kids {
            tree.add_child(root, k).unwrap();
        }
        assert_eq!(tree.children(root).unwrap(), kids);
        assert_eq!(tree.parent(kids[1]).unwrap(), Some(root));
    }

    #[test]
    fn attach_rejects_cycles_and_double_parents() {
        let (mut tree, root, mid, leaf) = chain();
        assert!(matches!(
            tree.add_child(leaf, root),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            tree.reparent(root, leaf),
            Err(Error::Invalid(_))
        ));
        let other = tree.new_node();
        assert!(matches!(
            tree.add_child(other, mid),
            Err(Error::Invalid(_))
        ));
        // A failed reparent leaves the old attachment intact.
        assert_eq!(tree.parent(mid).unwrap(), Some(root));
    }

    #[test]
    fn reparent_is_atomic() {
        let (mut tree, root, mid, leaf) = chain();
        let other = tree.new_node();
        tree.add_child(root, other).unwrap();
        tree.reparent(leaf, other).unwrap();
        assert_eq!(tree.parent(leaf).unwrap(), Some(other));
        assert!(tree.children(mid).unwrap().is_empty());
    }

    #[test]
    fn remove_node_releases_the_subtree() {
        let (mut tree, root, mid, leaf) = chain();
        tree.remove_node(mid).unwrap();
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.contains(root));
        assert!(tree.children(root).unwrap().is_empty());
    }

    #[test]
    fn events_bubble_until_handled() {
        let (mut tree, root, mid, leaf) = chain();
        let kind = EventKind::user(1);
        let order = Rc::new(RefCell::new(Vec::new()));

        for (name, node) in [("leaf", leaf), ("mid", mid), ("root", root)] {
            let order = Rc::clone(&order);
            tree.add_handler(node, kind, move |_, origin, args| {
                assert_eq!(origin, leaf);
                order.borrow_mut().push(name);
                if name == "mid" {
                    args.handled = true;
                }
            })
            .unwrap();
        }

        assert!(tree.raise(leaf, kind).unwrap());
        assert_eq!(*order.borrow(), vec!["leaf", "mid"]);
    }

    #[test]
    fn handlers_are_restored_after_dispatch() {
        let (mut tree, _, _, leaf) = chain();
        let kind = EventKind::user(2);
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        tree.add_handler(leaf, kind, move |_, _, _| *h.borrow_mut() += 1)
            .unwrap();
        tree.raise(leaf, kind).unwrap();
        tree.raise(leaf, kind).unwrap();
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn a_handler_can_unregister_itself() {
        let (mut tree, _, _, leaf) = chain();
        let kind = EventKind::user(4);
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        tree.add_handler(leaf, kind, move |t, origin, _| {
            *h.borrow_mut() += 1;
            // One-shot: the removal must survive the post-dispatch restore.
            assert!(t.remove_handler(origin, kind).unwrap());
        })
        .unwrap();
        tree.raise(leaf, kind).unwrap();
        tree.raise(leaf, kind).unwrap();
        assert_eq!(*hits.borrow(), 1);
        assert!(!tree.remove_handler(leaf, kind).unwrap());
    }

    #[test]
    fn deferred_work_runs_after_the_outermost_dispatch() {
        let (mut tree, _, mid, leaf) = chain();
        let kind = EventKind::user(3);
        tree.add_handler(leaf, kind, move |t, _, _| {
            t.defer(move |t| {
                let _ = t.remove_node(mid);
            });
            // Still alive while the dispatch is in flight.
            assert!(t.contains(mid));
        })
        .unwrap();
        tree.raise(leaf, kind).unwrap();
        assert!(!tree.contains(mid));
    }

    #[test]
    fn two_way_binding_round_trips() {
        let mut tree = Tree::new();
        let a = Observable::new(1_i32);
        let b = Observable::new(2_i32);
        let src: Rc<dyn DynamicObject> = Rc::clone(&a) as _;
        let dst: Rc<dyn DynamicObject> = Rc::clone(&b) as _;

        tree.create_binding(
            Endpoint::object_property(&dst, OBSERVED_VALUE).unwrap(),
            Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
            BindingMode::TwoWay,
            None,
        )
        .unwrap();
        // Creation synchronized target from source.
        assert_eq!(b.get(), 1);

        a.set(5);
        tree.flush_bindings();
        assert_eq!(b.get(), 5);

        b.set(9);
        tree.flush_bindings();
        assert_eq!(a.get(), 9);
    }

    #[test]
    fn binding_writes_queue_no_stale_echo() {
        let mut tree = Tree::new();
        let a = Observable::new(1_i32);
        let b = Observable::new(2_i32);
        let src: Rc<dyn DynamicObject> = Rc::clone(&a) as _;
        let dst: Rc<dyn DynamicObject> = Rc::clone(&b) as _;

        tree.create_binding(
            Endpoint::object_property(&dst, OBSERVED_VALUE).unwrap(),
            Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
            BindingMode::TwoWay,
            None,
        )
        .unwrap();
        // The creation-time write to the target must not leave a queued
        // reverse update that would replay the old source value over a
        // later external change.
        a.set(5);
        tree.flush_bindings();
        assert_eq!(a.get(), 5);
        assert_eq!(b.get(), 5);
    }

    #[test]
    fn property_cells_bind_through_their_accessors() {
        let mut tree = Tree::new();
        let store = Rc::new(Cell::new(0.0_f64));
        let g = Rc::clone(&store);
        let s = Rc::clone(&store);
        let cell = Property::new(move || g.get(), move |v| s.set(v));
        let src = Observable::new(2.5_f64);
        let source: Rc<dyn DynamicObject> = Rc::clone(&src) as _;

        tree.create_binding(
            Endpoint::accessor(cell.accessor()),
            Endpoint::object_property(&source, OBSERVED_VALUE).unwrap(),
            BindingMode::OneWay,
            None,
        )
        .unwrap();
        assert_eq!(cell.get(), 2.5);

        src.set(7.0);
        tree.flush_bindings();
        assert_eq!(store.get(), 7.0);

        // A read-only cell can feed a source but rejects target writes.
        let frozen = Property::read_only(|| 1.5_f64);
        let sink = Observable::new(0.0_f64);
        let sink_dy: Rc<dyn DynamicObject> = Rc::clone(&sink) as _;
        tree.create_binding(
            Endpoint::object_property(&sink_dy, OBSERVED_VALUE).unwrap(),
            Endpoint::accessor(frozen.accessor()),
            BindingMode::OneWay,
            None,
        )
        .unwrap();
        assert_eq!(sink.get(), 1.5);

        let ro = tree
            .create_binding(
                Endpoint::accessor(frozen.accessor()),
                Endpoint::object_property(&source, OBSERVED_VALUE).unwrap(),
                BindingMode::OneWay,
                None,
            )
            .unwrap();
        assert!(!tree.update_target(ro));
    }

    #[test]
    fn binding_type_check_is_fail_fast() {
        let mut tree = Tree::new();
        let a = Observable::new(1_i32);
        let b = Observable::new(String::new());
        let src: Rc<dyn DynamicObject> = Rc::clone(&a) as _;
        let dst: Rc<dyn DynamicObject> = Rc::clone(&b) as _;

        let err = tree
            .create_binding(
                Endpoint::object_property(&dst, OBSERVED_VALUE).unwrap(),
                Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
                BindingMode::OneWay,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));

        // A converter bridges it, but two-way needs the back direction too.
        let err = tree
            .create_binding(
                Endpoint::object_property(&dst, OBSERVED_VALUE).unwrap(),
                Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
                BindingMode::TwoWay,
                Some(Converter::new(|v: &i32| v.to_string())),
            )
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch(_)));

        tree.create_binding(
            Endpoint::object_property(&dst, OBSERVED_VALUE).unwrap(),
            Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
            BindingMode::OneWay,
            Some(Converter::new(|v: &i32| v.to_string())),
        )
        .unwrap();
        assert_eq!(b.get(), "1");
    }

    #[test]
    fn one_time_binding_ignores_later_changes() {
        let mut tree = Tree::new();
        let a = Observable::new(10_f64);
        let src: Rc<dyn DynamicObject> = Rc::clone(&a) as _;
        let node = tree.new_node();

        tree.create_binding(
            Endpoint::node(node, NodeProperty::Width),
            Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
            BindingMode::OneTime,
            None,
        )
        .unwrap();
        assert_eq!(tree.size(node).unwrap().width, 10.0);

        a.set(50.0);
        tree.flush_bindings();
        assert_eq!(tree.size(node).unwrap().width, 10.0);
    }

    #[test]
    fn node_binding_follows_the_data_context() {
        let (mut tree, root, _, leaf) = chain();
        let ctx = Observable::new(42.0_f64);
        let id = tree
            .bind_node(leaf, NodeProperty::Width, OBSERVED_VALUE, BindingMode::OneWay, None)
            .unwrap();
        // Dormant until a context resolves.
        assert!(!tree.update_target(id));
        assert_eq!(tree.size(leaf).unwrap().width, 0.0);

        tree.set_data_context(root, Some(Rc::clone(&ctx) as _)).unwrap();
        assert_eq!(tree.size(leaf).unwrap().width, 42.0);

        ctx.set(100.0);
        tree.flush_bindings();
        assert_eq!(tree.size(leaf).unwrap().width, 100.0);

        // A nearer context shadows the ancestor's.
        let near = Observable::new(7.0_f64);
        tree.set_data_context(leaf, Some(Rc::clone(&near) as _)).unwrap();
        assert_eq!(tree.size(leaf).unwrap().width, 7.0);

        // The shadowed context no longer feeds the binding.
        ctx.set(1.0);
        tree.flush_bindings();
        assert_eq!(tree.size(leaf).unwrap().width, 7.0);
    }

    #[test]
    fn node_bindings_die_with_the_node() {
        let (mut tree, root, mid, leaf) = chain();
        let ctx = Observable::new(5.0_f64);
        tree.set_data_context(root, Some(Rc::clone(&ctx) as _)).unwrap();
        tree.bind_node(leaf, NodeProperty::Width, OBSERVED_VALUE, BindingMode::OneWay, None)
            .unwrap();
        assert_eq!(tree.binding_count(), 1);

        tree.remove_node(mid).unwrap();
        assert_eq!(tree.binding_count(), 0);
        // The dead binding no longer reacts.
        ctx.set(90.0);
        tree.flush_bindings();
    }

    #[test]
    fn source_death_detaches_the_endpoint() {
        let mut tree = Tree::new();
        let node = tree.new_node();
        let id = {
            let a = Observable::new(3.0_f64);
            let src: Rc<dyn DynamicObject> = Rc::clone(&a) as _;
            tree.create_binding(
                Endpoint::node(node, NodeProperty::Width),
                Endpoint::object_property(&src, OBSERVED_VALUE).unwrap(),
                BindingMode::OneWay,
                None,
            )
            .unwrap()
        };
        assert_eq!(tree.size(node).unwrap().width, 3.0);
        tree.flush_bindings();
        assert!(!tree.update_target(id));
        assert_eq!(tree.size(node).unwrap().width, 3.0);
    }

    #[test]
    fn boxed_values_travel_as_data_contexts() {
        let mut tree = Tree::new();
        let node = tree.new_node();
        tree.set_data_context(node, Some(Boxed::new(123_u32) as _))
            .unwrap();
        let ctx = tree.effective_data_context(node).unwrap().unwrap();
        let boxed = crate::core::object::dynamic_cast::<Boxed<u32>>(ctx).unwrap();
        assert_eq!(boxed.get(), 123);
    }

    #[test]
    fn update_failures_are_boolean() {
        let mut tree = Tree::new();
        let node = tree.new_node();
        let acc = crate::core::binding::Accessor::read_only(|| 4.0_f64);
        let id = tree
            .create_binding(
                Endpoint::node(node, NodeProperty::Width),
                Endpoint::accessor(acc),
                BindingMode::OneWay,
                None,
            )
            .unwrap();
        assert_eq!(tree.size(node).unwrap().width, 4.0);
        // Writing back into a read-only source fails softly.
        assert!(!tree.update_source(id));
    }

    #[test]
    fn suspended_layout_batches_into_one_pass() {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(crate::layout::StackLayout::horizontal()))
            .unwrap();
        let a = tree.new_node();
        tree.add_child(panel, a).unwrap();
        tree.client_resized(panel, Size::new(100.0, 50.0)).unwrap();

        tree.suspend_layout();
        tree.set_width(a, 20.0).unwrap();
        tree.set_height(a, 10.0).unwrap();
        // Nothing arranged yet.
        assert_eq!(tree.arranged_rect(a).unwrap().width, 0.0);
        tree.resume_layout();
        assert_eq!(tree.arranged_rect(a).unwrap().width, 20.0);
    }
}

//! Layout pass sequencing over the tree: measure, arrange, invalidation,
//! suspension and scrolling.
//!
//! Rects are stored unscrolled, in parent content coordinates. A parent's
//! scroll offset is applied where rects leave the tree, in the
//! [`Tree::displayed_rect`] query and in backend placement. Repeated passes
//! therefore never accumulate offsets, and a scroll change only
//! re-publishes the affected children.

use tracing::{debug, trace};

use crate::core::element::ScrollState;
use crate::core::error::{Error, Result};
use crate::core::event::{EventKind, RoutedEventArgs};
use crate::core::id::NodeId;
use crate::core::tree::Tree;
use crate::geom::{Point, Rect, Size};
use crate::layout::Children;

impl Tree {
    // ------------------------------------------------------------------
    // Public pass entry points

    /// Measure `id` against `available` and return its desired size,
    /// margins included.
    pub fn measure(&mut self, id: NodeId, available: Size) -> Result<Size> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        Ok(self.measure_node(id, available))
    }

    /// Arrange `id` into `final_rect`, in parent content coordinates.
    ///
    /// A NaN `left` or `top` means "keep the current position on that axis
    /// and size to the desired size", which is how free-floating elements
    /// are refreshed in place.
    pub fn arrange(&mut self, id: NodeId, final_rect: Rect) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.arrange_node(id, final_rect);
        Ok(())
    }

    /// Re-run layout for the pass root covering `id`, flushing pending
    /// binding updates first. No-op while layout is suspended (the root is
    /// remembered and handled by [`Tree::resume_layout`]).
    pub fn update_layout(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.flush_bindings();
        if self.suspend_count > 0 {
            self.mark_dirty(id);
            return Ok(());
        }
        let root = self.layout_root(id);
        debug!(root = self.el(root)?.uid, "layout pass");
        self.refresh_layout(root);
        Ok(())
    }

    /// Stop layout passes until the matching [`Tree::resume_layout`].
    /// Nestable; mutations made while suspended are batched into one pass
    /// per dirty root on the final resume.
    pub fn suspend_layout(&mut self) {
        self.suspend_count += 1;
    }

    /// Undo one [`Tree::suspend_layout`]; the final resume runs the batched
    /// passes.
    pub fn resume_layout(&mut self) {
        if self.suspend_count == 0 {
            return;
        }
        self.suspend_count -= 1;
        if self.suspend_count > 0 {
            return;
        }
        let dirty = std::mem::take(&mut self.dirty);
        let mut roots: Vec<NodeId> = Vec::new();
        for id in dirty {
            if !self.contains(id) {
                continue;
            }
            let root = self.layout_root(id);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        self.flush_bindings();
        for root in roots {
            self.refresh_layout(root);
        }
    }

    /// The hosting element changed size: adopt the new size and re-run
    /// layout inside it.
    pub fn client_resized(&mut self, id: NodeId, size: Size) -> Result<()> {
        let el = self.el_mut(id)?;
        el.rect.width = size.width.max(0.0);
        el.rect.height = size.height.max(0.0);
        if self.suspend_count > 0 {
            self.mark_dirty(id);
            return Ok(());
        }
        self.flush_bindings();
        self.refresh_layout(id);
        Ok(())
    }

    /// Something size-affecting happened outside the tree's own setters;
    /// schedule a pass.
    pub fn notify_layout_changed(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.invalidate(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Scrolling

    /// The node's scroll bookkeeping.
    pub fn scroll_state(&self, id: NodeId) -> Result<ScrollState> {
        Ok(self.el(id)?.scroll)
    }

    /// Set the horizontal scroll position, clamped to the current range.
    /// Children are re-published without re-measuring; raises
    /// [`EventKind::SCROLL`] when the position actually moves.
    pub fn set_h_scroll_pos(&mut self, id: NodeId, pos: f64) -> Result<()> {
        let el = self.el_mut(id)?;
        let clamped = pos.clamp(0.0, el.scroll.h_limit);
        if clamped == el.scroll.h_pos {
            return Ok(());
        }
        el.scroll.h_pos = clamped;
        self.scrolled(id)
    }

    /// Set the vertical scroll position, clamped to the current range.
    pub fn set_v_scroll_pos(&mut self, id: NodeId, pos: f64) -> Result<()> {
        let el = self.el_mut(id)?;
        let clamped = pos.clamp(0.0, el.scroll.v_limit);
        if clamped == el.scroll.v_pos {
            return Ok(());
        }
        el.scroll.v_pos = clamped;
        self.scrolled(id)
    }

    /// Republish child placements after a scroll move and announce it.
    fn scrolled(&mut self, id: NodeId) -> Result<()> {
        for child in self.children(id)? {
            self.place_node(child);
        }
        let state = self.el(id)?.scroll;
        let mut args = RoutedEventArgs::with_param(EventKind::SCROLL, state);
        self.raise_event(id, &mut args)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Invalidation

    /// Schedule a layout pass covering `id`: immediate unless suspended.
    pub(crate) fn invalidate(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        if self.suspend_count > 0 {
            self.mark_dirty(id);
        } else {
            let _ = self.update_layout(id);
        }
    }

    /// Remember `id` for the resume-time batch.
    fn mark_dirty(&mut self, id: NodeId) {
        if !self.dirty.contains(&id) {
            self.dirty.push(id);
        }
    }

    /// The pass root for `id`: the highest self-or-ancestor carrying a
    /// layout host (auto-size containers propagate size changes upward), or
    /// the tree root when no host exists on the path.
    fn layout_root(&self, id: NodeId) -> NodeId {
        let mut best = id;
        let mut top = id;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Ok(el) = self.el(n) else { break };
            if el.host.is_some() {
                best = n;
            }
            top = n;
            cur = el.parent;
        }
        if self.el(best).map(|e| e.host.is_some()).unwrap_or(false) {
            best
        } else {
            top
        }
    }

    // ------------------------------------------------------------------
    // Pass internals

    /// Measure one node. Containers with a host and auto-size ask their
    /// strategy; everything else is its explicit size. Margins are part of
    /// the desired size either way.
    pub(crate) fn measure_node(&mut self, id: NodeId, available: Size) -> Size {
        let Ok(el) = self.el(id) else {
            return Size::zero();
        };
        let margin = el.margin;
        let hosted = el.host.is_some() && el.auto_size;
        let explicit = Size::new(el.width, el.height);

        let desired = if hosted {
            let content = self.run_host_measure(id, available.deflate(margin));
            content.inflate(margin)
        } else {
            explicit.inflate(margin)
        };
        if let Ok(el) = self.el_mut(id) {
            el.desired = desired;
        }
        trace!(?available, ?desired, "measured");
        desired
    }

    /// Arrange one node into `final_rect` and recurse into its children.
    pub(crate) fn arrange_node(&mut self, id: NodeId, final_rect: Rect) {
        let Ok(el) = self.el(id) else {
            return;
        };
        let margin = el.margin;
        let desired = el.desired;
        let h_align = el.h_align;
        let v_align = el.v_align;
        let cur = el.rect;

        let mut fin = final_rect;
        if fin.left.is_nan() {
            fin.left = cur.left - margin.left;
            fin.width = desired.width;
        }
        if fin.top.is_nan() {
            fin.top = cur.top - margin.top;
            fin.height = desired.height;
        }

        let mut rect = Rect::new(
            0.0,
            0.0,
            desired.width - margin.horizontal(),
            desired.height - margin.vertical(),
        );
        use crate::core::element::HorizontalAlign as H;
        use crate::core::element::VerticalAlign as V;
        match h_align {
            H::Center => {
                rect.left = fin.left + (fin.width - rect.width - margin.horizontal()) / 2.0
                    + margin.left;
            }
            H::Stretch => {
                rect.left = fin.left + margin.left;
                rect.width = fin.width - margin.horizontal();
            }
            H::Start => rect.left = fin.left + margin.left,
            H::End => rect.left = fin.left + fin.width - rect.width - margin.right,
        }
        match v_align {
            V::Center => {
                rect.top = fin.top + (fin.height - rect.height - margin.vertical()) / 2.0
                    + margin.top;
            }
            V::Stretch => {
                rect.top = fin.top + margin.top;
                rect.height = fin.height - margin.vertical();
            }
            V::Start => rect.top = fin.top + margin.top,
            V::End => rect.top = fin.top + fin.height - rect.height - margin.bottom,
        }
        rect = rect.clamp_size();

        if let Ok(el) = self.el_mut(id) {
            el.rect = rect;
        }
        self.place_node(id);
        self.arrange_children(id);
    }

    /// Run the strategy (or the default absolute pass) over a container's
    /// children and refresh its scroll range.
    fn arrange_children(&mut self, id: NodeId) {
        let Ok(el) = self.el(id) else {
            return;
        };
        let client = el.client_rect().size();
        let hosted = el.host.is_some();
        let auto = el.auto_size;
        let ids = el.children.clone();

        if hosted {
            // Non-auto containers skipped child measurement during their own
            // measure, so the strategy measures here against the final size.
            if !auto {
                self.run_host_measure(id, client);
            }
            self.run_host_arrange(id, client);
        } else if !ids.is_empty() {
            // Default absolute pass: unconstrained children kept at their
            // current positions, sized to content.
            if let Ok(el) = self.el_mut(id) {
                el.scroll.h_pos = 0.0;
                el.scroll.v_pos = 0.0;
            }
            for &child in &ids {
                self.measure_node(child, Size::unbounded());
                self.arrange_node(child, Rect::new(f64::NAN, f64::NAN, 0.0, 0.0));
            }
        } else {
            return;
        }
        self.update_scroll_range(id);
    }

    /// Take the host out, run its measure, and put it back.
    fn run_host_measure(&mut self, id: NodeId, available: Size) -> Size {
        let Some(mut host) = self.el_mut(id).ok().and_then(|el| el.host.take()) else {
            return Size::zero();
        };
        let ids = self.el(id).map(|el| el.children.clone()).unwrap_or_default();
        let content = host.measure(&mut Children::new(self, ids), available);
        if let Ok(el) = self.el_mut(id) {
            if el.host.is_none() {
                el.host = Some(host);
            }
        }
        content
    }

    /// Take the host out, run its arrange, and put it back.
    fn run_host_arrange(&mut self, id: NodeId, final_size: Size) {
        let Some(mut host) = self.el_mut(id).ok().and_then(|el| el.host.take()) else {
            return;
        };
        let ids = self.el(id).map(|el| el.children.clone()).unwrap_or_default();
        host.arrange(&mut Children::new(self, ids), final_size);
        if let Ok(el) = self.el_mut(id) {
            if el.host.is_none() {
                el.host = Some(host);
            }
        }
    }

    /// Recompute a container's scroll ranges from its non-float children.
    pub(crate) fn update_scroll_range(&mut self, id: NodeId) {
        let Ok(el) = self.el(id) else {
            return;
        };
        let client = el.client_rect().size();
        let mut extent = Size::zero();
        for &child in &el.children {
            let Ok(c) = self.el(child) else { continue };
            if c.float {
                continue;
            }
            extent.width = extent.width.max(c.rect.right() + c.margin.right);
            extent.height = extent.height.max(c.rect.bottom() + c.margin.bottom);
        }

        let el = match self.el_mut(id) {
            Ok(el) => el,
            Err(_) => return,
        };
        let mut moved = false;
        let h_over = extent.width - client.width;
        if h_over > 0.0 {
            el.scroll.h_limit = h_over;
            let clamped = el.scroll.h_pos.clamp(0.0, h_over);
            moved |= clamped != el.scroll.h_pos;
            el.scroll.h_pos = clamped;
        } else {
            moved |= el.scroll.h_pos != 0.0;
            el.scroll.h_limit = 0.0;
            el.scroll.h_pos = 0.0;
        }
        let v_over = extent.height - client.height;
        if v_over > 0.0 {
            el.scroll.v_limit = v_over;
            let clamped = el.scroll.v_pos.clamp(0.0, v_over);
            moved |= clamped != el.scroll.v_pos;
            el.scroll.v_pos = clamped;
        } else {
            moved |= el.scroll.v_pos != 0.0;
            el.scroll.v_limit = 0.0;
            el.scroll.v_pos = 0.0;
        }
        if moved {
            if let Ok(ids) = self.children(id) {
                for child in ids {
                    self.place_node(child);
                }
            }
        }
    }

    /// One pass over an existing root: re-measure children at the current
    /// size (the root's own desired size is preserved), re-arrange, refresh
    /// scroll ranges, and announce completion.
    pub(crate) fn refresh_layout(&mut self, root: NodeId) {
        let Ok(el) = self.el(root) else {
            return;
        };
        let saved = el.desired;
        let margin = el.margin;
        let avail = el.client_rect().size().inflate(margin);
        self.measure_node(root, avail);
        if let Ok(el) = self.el_mut(root) {
            el.desired = saved;
        }
        self.arrange_children(root);
        let _ = self.raise(root, EventKind::LAYOUT_UPDATED);
    }

    // ------------------------------------------------------------------
    // Placement

    /// The scroll offset the node's parent applies to it.
    fn inherited_offset(&self, id: NodeId) -> Point {
        let Ok(el) = self.el(id) else {
            return Point::zero();
        };
        if el.float {
            return Point::zero();
        }
        el.parent
            .and_then(|p| self.el(p).ok())
            .map(|p| p.scroll.offset())
            .unwrap_or_else(Point::zero)
    }

    /// The node's arranged rect with its parent's scroll offset applied.
    pub fn displayed_rect(&self, id: NodeId) -> Result<Rect> {
        let el = self.el(id)?;
        let off = self.inherited_offset(id);
        Ok(Rect::new(
            el.rect.left + off.x,
            el.rect.top + off.y,
            el.rect.width,
            el.rect.height,
        ))
    }

    /// Push the node's displayed rect to the backend, if one is attached.
    pub(crate) fn place_node(&mut self, id: NodeId) {
        if self.backend.is_none() {
            return;
        }
        let Ok(rect) = self.displayed_rect(id) else {
            return;
        };
        let Ok(uid) = self.uid(id) else {
            return;
        };
        if let Some(backend) = &mut self.backend {
            backend.place(uid, rect);
        }
    }
}

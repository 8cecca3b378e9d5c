use std::{
    any::Any,
    collections::{HashSet, VecDeque},
    mem,
};

use slotmap::SlotMap;

use super::render;
use crate::{
    Context,
    backend::RenderBackend,
    command::{CommandBuffer, Cursor},
    config::Config,
    core::{context::CoreContext, id::NodeId, node::Node},
    error::{Error, FirstError, Result},
    geom::{Color, Expanse, Rect},
    widget::{EventKind, Fit, Widget},
};

/// Upper bound on settle rounds. Each round applies queued mutations and
/// layout requests, which may queue more work.
const MAX_SETTLE_ROUNDS: usize = 8;

/// A structural mutation requested from inside a widget hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deferred {
    /// Attach `child` under `parent`.
    AddChild {
        /// Parent node.
        parent: NodeId,
        /// Child node.
        child: NodeId,
    },
    /// Detach `child` from `parent`.
    RemoveChild {
        /// Parent node.
        parent: NodeId,
        /// Child node.
        child: NodeId,
    },
    /// Free a whole subtree.
    FreeTree(NodeId),
}

/// How much layout work a request needs. Requests for the same node merge to
/// the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Relayout {
    /// The node's size is already set: adjust ancestors and positions.
    Adjust,
    /// Re-fit the node itself, then adjust.
    Refit,
    /// Re-fit the node's whole subtree bottom-up, then adjust.
    RefitTree,
}

/// Core state: the arena that owns every node, the references that route
/// events, the command buffer and the backend.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    pub(crate) root: Option<NodeId>,
    /// Node that takes every event while set.
    pub(crate) overlay: Option<NodeId>,
    /// Node that captures pointer motion and buttons while set.
    pub(crate) active_scrollbar: Option<NodeId>,
    /// Node holding keyboard focus.
    pub(crate) keyboard_focus: Option<NodeId>,
    /// Node the pointer is over.
    pub(crate) mouse_focus: Option<NodeId>,
    /// Configuration, including the default font.
    pub(crate) config: Config,
    /// Output of the most recent render.
    pub(crate) commands: CommandBuffer,
    /// Registered render backend.
    pub(crate) backend: Option<Box<dyn RenderBackend>>,
    /// Current mouse cursor.
    pub(crate) cursor: Cursor,
    /// Structural mutations queued by widget hooks.
    deferred: VecDeque<Deferred>,
    /// Coalesced layout requests.
    pending_layout: Vec<(NodeId, Relayout)>,
    /// A render was requested since the last render.
    pub(crate) render_requested: bool,
}

impl Core {
    /// Create an empty core.
    pub fn new(config: Config) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            overlay: None,
            active_scrollbar: None,
            keyboard_focus: None,
            mouse_focus: None,
            config,
            commands: CommandBuffer::new(),
            backend: None,
            cursor: Cursor::default(),
            deferred: VecDeque::new(),
            pending_layout: Vec::new(),
            render_requested: false,
        }
    }

    /// The configuration this core was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Root node, if one is set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into())
    }

    /// Does the arena hold this node?
    pub fn contains(&self, node_id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(node_id.into())
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node under the pointer.
    pub fn mouse_focus(&self) -> Option<NodeId> {
        self.mouse_focus
    }

    /// Node holding keyboard focus.
    pub fn keyboard_focus(&self) -> Option<NodeId> {
        self.keyboard_focus
    }

    /// Node capturing pointer events.
    pub fn active_scrollbar(&self) -> Option<NodeId> {
        self.active_scrollbar
    }

    /// Current overlay.
    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    /// Current mouse cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The command buffer filled by the most recent render.
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// Mutable access to the command buffer.
    pub fn commands_mut(&mut self) -> &mut CommandBuffer {
        &mut self.commands
    }

    /// Install or clear the overlay.
    pub fn set_overlay(&mut self, node: Option<NodeId>) -> Result<()> {
        if let Some(id) = node
            && !self.nodes.contains_key(id)
        {
            return Err(Error::NodeNotFound(id));
        }
        self.overlay = node;
        Ok(())
    }

    /// Parent of a node.
    pub fn parent_of(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.nodes
            .get(node_id)
            .map(|n| n.parent)
            .ok_or(Error::NodeNotFound(node_id))
    }

    /// Children of a node, in insertion order.
    pub fn children_of(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        self.nodes
            .get(node_id)
            .map(|n| n.children.clone())
            .ok_or(Error::NodeNotFound(node_id))
    }

    /// Insert a widget. With a parent, the node is attached to it
    /// immediately; without one it stays detached until `add_child`.
    pub fn create(&mut self, widget: Box<dyn Widget>, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(parent) = parent
            && !self.nodes.contains_key(parent)
        {
            return Err(Error::NodeNotFound(parent));
        }
        let id = self.nodes.insert(Node::new(widget));
        if let Some(parent) = parent {
            if let Err(e) = self.link(parent, id) {
                self.nodes.remove(id);
                return Err(e);
            }
            self.finish_attach(parent, id)?;
        }
        Ok(id)
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.link(parent, child)?;
        self.finish_attach(parent, child)
    }

    /// Check and record the parent/child link.
    fn link(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let child_node = self.nodes.get(child).ok_or(Error::NodeNotFound(child))?;
        if child_node.parent.is_some() || self.root == Some(child) {
            return Err(Error::AlreadyAttached(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or(Error::NodeNotFound(parent))?;
        parent_node.children.try_reserve(1)?;
        parent_node.children.push(child);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Propagate the attachment state to a freshly linked child and schedule
    /// its initial layout.
    fn finish_attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let attached = self.nodes.get(parent).is_some_and(|n| n.attached);
        tracing::debug!("attach {child:?} to {parent:?} (attached: {attached})");
        if !attached {
            return Ok(());
        }
        let newly = self.set_attached(child, true);
        self.request_layout(child, Relayout::RefitTree);
        self.request_render();
        self.notify_attached(&newly)
    }

    /// Detach `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.unlink(parent, child)?;
        self.set_attached(child, false);
        for id in self.subtree_pre_order(child) {
            self.clear_refs(id);
        }
        self.pending_layout
            .retain(|(n, _)| self.nodes.get(*n).is_some_and(|n| n.attached));
        if self.nodes.get(parent).is_some_and(|n| n.attached) {
            self.request_layout(parent, Relayout::Refit);
            self.request_render();
        }
        tracing::debug!("detach {child:?} from {parent:?}");
        Ok(())
    }

    /// Remove `child` from `parent`'s children and clear its parent link.
    fn unlink(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or(Error::NodeNotFound(parent))?;
        if parent_node.children.is_empty() {
            return Err(Error::NoChildren(parent));
        }
        let idx = parent_node
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(Error::NotAChild { parent, child })?;
        parent_node.children.remove(idx);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        Ok(())
    }

    /// Free the subtree rooted at `node_id`, children before parents. Every
    /// node is visited even if a hook fails; the first failure is returned.
    pub fn free_tree(&mut self, node_id: NodeId) -> Result<()> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if let Some(parent) = node.parent {
            self.unlink(parent, node_id)?;
            if self.nodes.get(parent).is_some_and(|n| n.attached) {
                self.request_layout(parent, Relayout::Refit);
                self.request_render();
            }
        }
        if self.root == Some(node_id) {
            self.root = None;
        }

        let mut errs = FirstError::default();
        for id in self.subtree_post_order(node_id) {
            errs.note(self.call_widget(id, |w, ctx| w.on_free(ctx)));
            self.clear_refs(id);
            if let Some(node) = self.nodes.remove(id)
                && let Some(parent) = node.parent
                && let Some(parent_node) = self.nodes.get_mut(parent)
            {
                parent_node.children.retain(|c| *c != id);
            }
            self.pending_layout.retain(|(n, _)| *n != id);
        }
        tracing::debug!("freed tree at {node_id:?}");
        errs.finish()
    }

    /// Bind the root of the tree.
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        if self.root.is_some() {
            return Err(Error::RootAlreadySet);
        }
        let node = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.parent.is_some() {
            return Err(Error::AlreadyAttached(node_id));
        }
        self.root = Some(node_id);
        let newly = self.set_attached(node_id, true);
        self.request_layout(node_id, Relayout::RefitTree);
        self.request_render();
        self.notify_attached(&newly)
    }

    /// Register the render backend and load the default font.
    pub fn register_backend(&mut self, mut backend: Box<dyn RenderBackend>) -> Result<()> {
        if self.backend.is_some() {
            return Err(Error::BackendAlreadyRegistered);
        }
        backend.load_font(&self.config.default_font, self.config.font_size)?;
        self.backend = Some(backend);
        if let Some(root) = self.root {
            self.request_layout(root, Relayout::RefitTree);
            self.request_render();
        }
        Ok(())
    }

    /// Measure text with the registered backend.
    pub fn text_dimensions(&mut self, text: &str, font: &str, size: u32) -> Result<Expanse> {
        self.backend
            .as_mut()
            .ok_or(Error::NoBackend)?
            .text_dimensions(text, font, size)
    }

    /// The area of a node that receives pointer events.
    pub fn bounding_rect(&self, node_id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(node_id)?;
        Some(
            node.widget
                .as_deref()
                .map_or(node.rect, |w| w.bounding_rect(node.rect)),
        )
    }

    /// Does the node's bounding rect contain the point? Edges are inclusive.
    pub fn encloses_point(&self, node_id: NodeId, x: i32, y: i32) -> bool {
        self.bounding_rect(node_id)
            .is_some_and(|r| r.encloses_point(x, y))
    }

    /// The deepest visible node under `(x, y)` in the subtree at `root`. At
    /// each level the first child, in insertion order, that encloses the
    /// point is taken.
    pub fn deepest_widget_with_point(&self, root: NodeId, x: i32, y: i32) -> Option<NodeId> {
        if self.nodes.get(root)?.hidden || !self.encloses_point(root, x, y) {
            return None;
        }
        let mut current = root;
        'descend: loop {
            let node = self.nodes.get(current)?;
            for child in &node.children {
                let visible = self.nodes.get(*child).is_some_and(|c| !c.hidden);
                if visible && self.encloses_point(*child, x, y) {
                    current = *child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Like `deepest_widget_with_point`, but returns the nearest node on the
    /// path back to `root` that handles `kind`.
    pub fn deepest_widget_with_point_and_event_type(
        &self,
        root: NodeId,
        x: i32,
        y: i32,
        kind: EventKind,
    ) -> Option<NodeId> {
        let mut current = Some(self.deepest_widget_with_point(root, x, y)?);
        while let Some(id) = current {
            if self.handles(id, kind) {
                return Some(id);
            }
            if id == root {
                break;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        None
    }

    /// Does the node's widget handle `kind`?
    pub fn handles(&self, node_id: NodeId, kind: EventKind) -> bool {
        self.nodes
            .get(node_id)
            .and_then(|n| n.widget.as_deref())
            .is_some_and(|w| w.handles(kind))
    }

    /// Can the node's widget hold keyboard focus?
    pub fn accepts_focus(&self, node_id: NodeId) -> bool {
        self.nodes
            .get(node_id)
            .and_then(|n| n.widget.as_deref())
            .is_some_and(|w| w.accept_focus())
    }

    /// Fit a node, and first its visible descendants if `call_on_children`.
    /// Returns true if the node's size changed.
    pub fn fit_layout(&mut self, node_id: NodeId, call_on_children: bool) -> Result<bool> {
        if call_on_children {
            for child in self.children_of(node_id)? {
                if self.nodes.get(child).is_some_and(|n| !n.hidden) {
                    self.fit_layout(child, true)?;
                }
            }
        }
        let fit = self.call_widget(node_id, |w, ctx| w.fit(ctx))?;
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        match fit {
            Fit::Keep => Ok(false),
            Fit::Size(size) => {
                let changed = node.rect.size() != size;
                node.rect = node.rect.with_size(size);
                Ok(changed)
            }
        }
    }

    /// Place the children of `node_id`, then recurse into each child.
    pub fn assign_positions(&mut self, node_id: NodeId) -> Result<()> {
        self.call_widget(node_id, |w, ctx| w.assign_positions(ctx))?;
        for child in self.children_of(node_id)? {
            self.assign_positions(child)?;
        }
        Ok(())
    }

    /// Re-fit ancestors of `node_id` until one keeps its size, then assign
    /// positions from there down.
    pub fn adjust_layout(&mut self, node_id: NodeId) -> Result<()> {
        let mut anchor = node_id;
        let mut current = self.parent_of(node_id)?;
        while let Some(parent) = current {
            anchor = parent;
            if !self.fit_layout(parent, false)? {
                break;
            }
            current = self.parent_of(parent)?;
        }
        self.assign_positions(anchor)?;
        self.request_render();
        Ok(())
    }

    /// Run a layout request.
    pub(crate) fn relayout(&mut self, node_id: NodeId, request: Relayout) -> Result<()> {
        match request {
            Relayout::Adjust => {}
            Relayout::Refit => {
                self.fit_layout(node_id, false)?;
            }
            Relayout::RefitTree => {
                self.fit_layout(node_id, true)?;
            }
        }
        self.adjust_layout(node_id)
    }

    /// Full layout pass over the tree.
    pub fn layout(&mut self) -> Result<()> {
        let root = self.root.ok_or(Error::NoRoot)?;
        self.fit_layout(root, true)?;
        self.assign_positions(root)?;
        self.request_render();
        Ok(())
    }

    /// Set a node's rect, moving its descendants by the same offset.
    pub(crate) fn place(&mut self, node_id: NodeId, rect: Rect) -> Result<()> {
        let old = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?
            .rect;
        let dx = rect.x.saturating_sub(old.x);
        let dy = rect.y.saturating_sub(old.y);
        if dx != 0 || dy != 0 {
            for id in self.subtree_pre_order(node_id).into_iter().skip(1) {
                if let Some(n) = self.nodes.get_mut(id) {
                    n.rect = n.rect.translate(dx, dy);
                }
            }
        }
        if let Some(n) = self.nodes.get_mut(node_id) {
            n.rect = rect;
        }
        Ok(())
    }

    /// Move a node and its subtree so its origin is `(x, y)`.
    pub fn set_position(&mut self, node_id: NodeId, x: i32, y: i32) -> Result<()> {
        let size = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?
            .rect
            .size();
        self.place(node_id, Rect::new(x, y, size.w, size.h))?;
        self.assign_positions(node_id)?;
        self.request_render();
        Ok(())
    }

    /// Resize a node and adjust the layout around it.
    pub fn set_size(&mut self, node_id: NodeId, w: u32, h: u32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        node.rect = node.rect.with_size(Expanse::new(w, h));
        self.request_layout(node_id, Relayout::Adjust);
        self.request_render();
        Ok(())
    }

    /// Move and resize a node.
    pub fn set_rect(&mut self, node_id: NodeId, rect: Rect) -> Result<()> {
        self.place(node_id, rect)?;
        self.request_layout(node_id, Relayout::Adjust);
        self.request_render();
        Ok(())
    }

    /// Show or hide a node.
    pub fn set_hidden(&mut self, node_id: NodeId, hidden: bool) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.hidden != hidden {
            node.hidden = hidden;
            self.request_layout(node_id, Relayout::Adjust);
            self.request_render();
        }
        Ok(())
    }

    /// Set a node's colors.
    pub fn set_colors(&mut self, node_id: NodeId, fg: Color, bg: Color) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        node.fg = fg;
        node.bg = bg;
        self.request_render();
        Ok(())
    }

    /// Queue a layout request, merging with any pending request for the
    /// same node.
    pub(crate) fn request_layout(&mut self, node_id: NodeId, request: Relayout) {
        if let Some(entry) = self.pending_layout.iter_mut().find(|(n, _)| *n == node_id) {
            entry.1 = entry.1.max(request);
        } else {
            self.pending_layout.push((node_id, request));
        }
    }

    /// Ask for a render when the current operation settles.
    pub(crate) fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Queue a structural mutation.
    pub(crate) fn defer(&mut self, op: Deferred) -> Result<()> {
        self.deferred.try_reserve(1)?;
        self.deferred.push_back(op);
        Ok(())
    }

    /// Apply a queued structural mutation.
    fn apply_deferred(&mut self, op: Deferred) -> Result<()> {
        match op {
            Deferred::AddChild { parent, child } => self.add_child(parent, child),
            Deferred::RemoveChild { parent, child } => self.remove_child(parent, child),
            Deferred::FreeTree(node) => self.free_tree(node),
        }
    }

    /// Apply queued mutations and layout requests, then render if anything
    /// asked for it. Called once at the end of every public operation.
    /// Layout needs text metrics, so without a backend layout requests are
    /// dropped.
    pub(crate) fn settle(&mut self) -> Result<()> {
        let mut errs = FirstError::default();
        let mut rounds = 0;
        while !self.deferred.is_empty() || !self.pending_layout.is_empty() {
            if rounds == MAX_SETTLE_ROUNDS {
                tracing::warn!(
                    "layout did not settle after {MAX_SETTLE_ROUNDS} rounds, dropping {} requests",
                    self.deferred.len() + self.pending_layout.len()
                );
                self.deferred.clear();
                self.pending_layout.clear();
                break;
            }
            rounds += 1;
            while let Some(op) = self.deferred.pop_front() {
                errs.note(self.apply_deferred(op));
            }
            let pending = mem::take(&mut self.pending_layout);
            if self.backend.is_none() {
                continue;
            }
            for (node_id, request) in pending {
                if self.nodes.get(node_id).is_some_and(|n| n.attached) {
                    errs.note(self.relayout(node_id, request));
                }
            }
        }
        self.debug_assert_tree_invariants();

        if self.render_requested && self.root.is_some() {
            errs.note(render::render(self));
            if self.config.present_on_event && self.backend.is_some() {
                errs.note(self.present());
            }
        }
        errs.finish()
    }

    /// Hand the command buffer to the backend, draining it.
    pub fn present(&mut self) -> Result<()> {
        let backend = self.backend.as_mut().ok_or(Error::NoBackend)?;
        backend.process_command_buffer(&mut self.commands)
    }

    /// Take a node's widget out of its slot for the duration of `f`.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> Result<R>,
    ) -> Result<R> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let mut widget = node
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        let out = f(widget.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.widget = Some(widget);
        }
        out
    }

    /// Call into a widget with a context bound to its node.
    pub(crate) fn call_widget<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut dyn Context) -> Result<R>,
    ) -> Result<R> {
        self.with_widget_mut(node_id, |widget, core| {
            let mut ctx = CoreContext::new(core, node_id);
            f(widget, &mut ctx)
        })
    }

    /// Borrow a node's widget as a concrete type.
    pub fn widget<W: Widget>(&self, node_id: impl Into<NodeId>) -> Result<&W> {
        let node_id = node_id.into();
        let widget = self
            .nodes
            .get(node_id)
            .ok_or(Error::NodeNotFound(node_id))?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        (widget as &dyn Any)
            .downcast_ref::<W>()
            .ok_or(Error::WrongWidgetType(node_id))
    }

    /// Is `ancestor` on the parent chain of `node_id`, or the node itself?
    fn is_ancestor_or_self(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Set the attachment flag over a subtree. Returns the nodes that became
    /// attached, in pre-order.
    fn set_attached(&mut self, node_id: NodeId, attached: bool) -> Vec<NodeId> {
        let mut changed = Vec::new();
        for id in self.subtree_pre_order(node_id) {
            if let Some(node) = self.nodes.get_mut(id)
                && node.attached != attached
            {
                node.attached = attached;
                changed.push(id);
            }
        }
        if attached { changed } else { Vec::new() }
    }

    /// Run `on_attach` hooks for newly attached nodes.
    fn notify_attached(&mut self, nodes: &[NodeId]) -> Result<()> {
        let mut errs = FirstError::default();
        for id in nodes {
            errs.note(self.call_widget(*id, |w, ctx| w.on_attach(ctx)));
        }
        errs.finish()
    }

    /// Drop every routing reference to a node.
    fn clear_refs(&mut self, node_id: NodeId) {
        for slot in [
            &mut self.overlay,
            &mut self.active_scrollbar,
            &mut self.keyboard_focus,
            &mut self.mouse_focus,
        ] {
            if *slot == Some(node_id) {
                *slot = None;
            }
        }
    }

    /// Collect a subtree in pre-order, including the root.
    pub(crate) fn subtree_pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    pub(crate) fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Verify the structural invariants of the arena.
    pub fn check_tree_invariants(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::Invalid(msg));
        if let Some(root) = self.root {
            let Some(node) = self.nodes.get(root) else {
                return fail(format!("root {root:?} missing"));
            };
            if node.parent.is_some() || !node.attached {
                return fail(format!("root {root:?} has a parent or is detached"));
            }
        }
        for (id, node) in &self.nodes {
            let mut seen = HashSet::with_capacity(node.children.len());
            for child in &node.children {
                if !seen.insert(*child) {
                    return fail(format!("duplicate child {child:?} under {id:?}"));
                }
                match self.nodes.get(*child) {
                    None => return fail(format!("child {child:?} of {id:?} missing")),
                    Some(c) if c.parent != Some(id) => {
                        return fail(format!("child {child:?} parent mismatch under {id:?}"));
                    }
                    Some(c) if c.attached != node.attached => {
                        return fail(format!("child {child:?} attachment differs from {id:?}"));
                    }
                    Some(_) => {}
                }
            }
            if let Some(parent) = node.parent {
                let count = self
                    .nodes
                    .get(parent)
                    .map_or(0, |p| p.children.iter().filter(|c| **c == id).count());
                if count != 1 {
                    return fail(format!("{id:?} appears {count} times under {parent:?}"));
                }
            }
            let mut top = id;
            for _ in 0..=self.nodes.len() {
                match self.nodes.get(top).and_then(|n| n.parent) {
                    Some(p) => top = p,
                    None => break,
                }
            }
            if self.nodes.get(top).and_then(|n| n.parent).is_some() {
                return fail(format!("cycle above {id:?}"));
            }
            if node.attached != (Some(top) == self.root) {
                return fail(format!("{id:?} attachment does not match reachability"));
            }
        }
        for r in [
            self.overlay,
            self.active_scrollbar,
            self.keyboard_focus,
            self.mouse_focus,
        ]
        .into_iter()
        .flatten()
        {
            if !self.nodes.contains_key(r) {
                return fail(format!("dangling reference to {r:?}"));
            }
        }
        Ok(())
    }

    /// Assert tree invariants in debug builds.
    pub(crate) fn debug_assert_tree_invariants(&self) {
        let result = self.check_tree_invariants();
        debug_assert!(result.is_ok(), "tree invariant violated: {result:?}");
    }

    /// Free the tree, then any detached nodes left in the arena.
    pub(crate) fn teardown(&mut self) -> Result<()> {
        let mut errs = FirstError::default();
        if let Some(root) = self.root {
            errs.note(self.free_tree(root));
        }
        let orphans: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
            .collect();
        for id in orphans {
            if self.nodes.contains_key(id) {
                errs.note(self.free_tree(id));
            }
        }
        self.deferred.clear();
        self.pending_layout.clear();
        self.commands.clear_commands();
        self.render_requested = false;
        errs.finish()
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        if !self.nodes.is_empty()
            && let Err(e) = self.teardown()
        {
            tracing::warn!("teardown failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::backend::test::TestBackend;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records frees and reports a fixed fit.
    struct Probe {
        label: String,
        log: Log,
        size: Option<Expanse>,
        fail_free: bool,
    }

    impl Probe {
        fn new(label: &str, log: &Log) -> Box<dyn Widget> {
            Box::new(Self {
                label: label.into(),
                log: log.clone(),
                size: None,
                fail_free: false,
            })
        }

        fn sized(label: &str, log: &Log, w: u32, h: u32) -> Box<dyn Widget> {
            Box::new(Self {
                label: label.into(),
                log: log.clone(),
                size: Some(Expanse::new(w, h)),
                fail_free: false,
            })
        }
    }

    impl Widget for Probe {
        fn fit(&mut self, _ctx: &mut dyn Context) -> Result<Fit> {
            self.log.borrow_mut().push(format!("fit {}", self.label));
            Ok(self.size.map_or(Fit::Keep, Fit::Size))
        }

        fn on_free(&mut self, _ctx: &mut dyn Context) -> Result<()> {
            self.log.borrow_mut().push(format!("free {}", self.label));
            if self.fail_free {
                return Err(Error::Invalid(self.label.clone()));
            }
            Ok(())
        }
    }

    /// Sums the heights of its children and stacks them vertically.
    struct Stack;

    impl Widget for Stack {
        fn fit(&mut self, ctx: &mut dyn Context) -> Result<Fit> {
            let mut size = Expanse::default();
            for c in ctx.visible_children() {
                let r = ctx.rect_of(c).unwrap_or_default();
                size.w = size.w.max(r.w);
                size.h += r.h;
            }
            Ok(Fit::Size(size))
        }

        fn assign_positions(&mut self, ctx: &mut dyn Context) -> Result<()> {
            let origin = ctx.rect();
            let mut y = origin.y;
            for c in ctx.visible_children() {
                let r = ctx.rect_of(c).unwrap_or_default();
                ctx.place(c, Rect::new(origin.x, y, r.w, r.h))?;
                y += r.h as i32;
            }
            Ok(())
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn create_and_link() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        let a = core.create(Probe::new("a", &l), Some(root))?;
        let b = core.create(Probe::new("b", &l), None)?;
        assert!(core.node(a).unwrap().attached());
        assert!(!core.node(b).unwrap().attached());
        core.add_child(a, b)?;
        assert!(core.node(b).unwrap().attached());
        assert_eq!(core.children_of(root)?, vec![a]);
        assert_eq!(core.parent_of(b)?, Some(a));
        core.check_tree_invariants()?;

        assert_eq!(core.add_child(root, b), Err(Error::AlreadyAttached(b)));
        assert_eq!(core.add_child(b, root), Err(Error::AlreadyAttached(root)));
        let c = core.create(Probe::new("c", &l), None)?;
        let d = core.create(Probe::new("d", &l), Some(c))?;
        assert_eq!(
            core.add_child(d, c),
            Err(Error::WouldCreateCycle {
                parent: d,
                child: c
            })
        );
        assert_eq!(
            core.add_child(c, c),
            Err(Error::WouldCreateCycle {
                parent: c,
                child: c
            })
        );
        core.check_tree_invariants()?;
        Ok(())
    }

    #[test]
    fn remove_child_errors() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        let a = core.create(Probe::new("a", &l), None)?;
        assert_eq!(core.remove_child(root, a), Err(Error::NoChildren(root)));
        let b = core.create(Probe::new("b", &l), Some(root))?;
        assert_eq!(
            core.remove_child(root, a),
            Err(Error::NotAChild {
                parent: root,
                child: a
            })
        );
        core.mouse_focus = Some(b);
        core.remove_child(root, b)?;
        assert_eq!(core.mouse_focus, None);
        assert!(!core.node(b).unwrap().attached());
        assert_eq!(core.parent_of(b)?, None);
        core.check_tree_invariants()?;
        Ok(())
    }

    #[test]
    fn free_tree_is_post_order() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        let a = core.create(Probe::new("a", &l), Some(root))?;
        core.create(Probe::new("a1", &l), Some(a))?;
        core.create(Probe::new("a2", &l), Some(a))?;
        core.create(Probe::new("b", &l), Some(root))?;
        core.free_tree(root)?;
        assert_eq!(
            *l.borrow(),
            vec!["free a1", "free a2", "free a", "free b", "free root"]
        );
        assert!(core.is_empty());
        assert_eq!(core.root(), None);
        Ok(())
    }

    #[test]
    fn free_tree_is_best_effort() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        let bad = core.create(
            Box::new(Probe {
                label: "bad".into(),
                log: l.clone(),
                size: None,
                fail_free: true,
            }),
            Some(root),
        )?;
        core.create(Probe::new("leaf", &l), Some(bad))?;
        core.create(Probe::new("other", &l), Some(root))?;
        assert_eq!(core.free_tree(root), Err(Error::Invalid("bad".into())));
        assert!(core.is_empty());
        assert_eq!(l.borrow().len(), 4);
        Ok(())
    }

    #[test]
    fn teardown_frees_random_trees() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let l = log();
            let mut core = Core::new(Config::default());
            let root = core.create(Probe::new("n", &l), None)?;
            core.set_root(root)?;
            let mut ids = vec![root];
            let n = rng.random_range(1..60);
            for _ in 0..n {
                let parent = ids[rng.random_range(0..ids.len())];
                ids.push(core.create(Probe::new("n", &l), Some(parent))?);
            }
            // A detached subtree that never reached the root.
            let loose = core.create(Probe::new("n", &l), None)?;
            core.create(Probe::new("n", &l), Some(loose))?;
            core.check_tree_invariants()?;
            let total = core.len();
            core.teardown()?;
            assert!(core.is_empty());
            assert_eq!(l.borrow().len(), total);
        }
        Ok(())
    }

    #[test]
    fn drop_runs_teardown() -> Result<()> {
        let l = log();
        {
            let mut core = Core::new(Config::default());
            let root = core.create(Probe::new("root", &l), None)?;
            core.create(Probe::new("child", &l), Some(root))?;
        }
        assert_eq!(*l.borrow(), vec!["free child", "free root"]);
        Ok(())
    }

    #[test]
    fn hit_test_first_child_wins() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        core.set_rect(root, Rect::new(0, 0, 100, 100))?;
        let a = core.create(Probe::new("a", &l), Some(root))?;
        let b = core.create(Probe::new("b", &l), Some(root))?;
        core.set_rect(a, Rect::new(10, 10, 20, 20))?;
        core.set_rect(b, Rect::new(20, 20, 20, 20))?;
        assert_eq!(core.deepest_widget_with_point(root, 25, 25), Some(a));
        assert_eq!(core.deepest_widget_with_point(root, 35, 35), Some(b));
        assert_eq!(core.deepest_widget_with_point(root, 5, 5), Some(root));
        assert_eq!(core.deepest_widget_with_point(root, 100, 100), Some(root));
        assert_eq!(core.deepest_widget_with_point(root, 101, 50), None);
        core.set_hidden(a, true)?;
        assert_eq!(core.deepest_widget_with_point(root, 25, 25), Some(b));
        assert_eq!(
            core.deepest_widget_with_point_and_event_type(root, 25, 25, EventKind::Button),
            None
        );
        Ok(())
    }

    #[test]
    fn layout_settles_at_first_unchanged_ancestor() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let (_, backend) = TestBackend::create();
        core.register_backend(Box::new(backend))?;
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        core.set_rect(root, Rect::new(0, 0, 200, 200))?;
        let stack = core.create(Box::new(Stack), Some(root))?;
        let a = core.create(Probe::sized("a", &l, 30, 10), Some(stack))?;
        let b = core.create(Probe::sized("b", &l, 40, 20), Some(stack))?;
        core.settle()?;
        assert_eq!(core.node(stack).unwrap().rect(), Rect::new(0, 0, 40, 30));
        assert_eq!(core.node(a).unwrap().rect(), Rect::new(0, 0, 30, 10));
        assert_eq!(core.node(b).unwrap().rect(), Rect::new(0, 10, 40, 20));

        // Growing `a` re-fits the stack, whose size changes, and then the
        // root, whose size does not.
        l.borrow_mut().clear();
        core.set_size(a, 30, 15)?;
        core.settle()?;
        assert_eq!(core.node(stack).unwrap().rect(), Rect::new(0, 0, 40, 35));
        assert_eq!(core.node(b).unwrap().rect(), Rect::new(0, 15, 40, 20));
        assert_eq!(*l.borrow(), vec!["fit root"]);

        core.set_position(stack, 50, 50)?;
        assert_eq!(core.node(b).unwrap().rect(), Rect::new(50, 65, 40, 20));
        Ok(())
    }

    #[test]
    fn layout_requests_need_a_backend() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let root = core.create(Probe::new("root", &l), None)?;
        core.set_root(root)?;
        core.create(Probe::sized("a", &l, 10, 10), Some(root))?;
        core.settle()?;
        assert!(l.borrow().is_empty());
        let (fonts, backend) = TestBackend::create();
        core.register_backend(Box::new(backend))?;
        core.settle()?;
        assert_eq!(*l.borrow(), vec!["fit a", "fit root"]);
        assert_eq!(fonts.lock().unwrap().fonts, vec![("default".to_string(), 16)]);
        let (_, again) = TestBackend::create();
        assert!(matches!(
            core.register_backend(Box::new(again)),
            Err(Error::BackendAlreadyRegistered)
        ));
        Ok(())
    }

    #[test]
    fn root_rules() -> Result<()> {
        let l = log();
        let mut core = Core::new(Config::default());
        let a = core.create(Probe::new("a", &l), None)?;
        let b = core.create(Probe::new("b", &l), Some(a))?;
        assert_eq!(core.set_root(b), Err(Error::AlreadyAttached(b)));
        core.set_root(a)?;
        assert!(core.node(b).unwrap().attached());
        assert_eq!(core.set_root(a), Err(Error::RootAlreadySet));
        let mut empty = Core::new(Config::default());
        assert_eq!(empty.layout(), Err(Error::NoRoot));
        Ok(())
    }
}

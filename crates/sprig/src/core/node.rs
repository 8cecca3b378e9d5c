use crate::{
    core::id::NodeId,
    geom::{Color, Rect},
    name::NodeName,
    widget::Widget,
};

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. `None` while one of the widget's own hooks
    /// is running.
    pub(crate) widget: Option<Box<dyn Widget>>,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in insertion order. Later children draw
    /// on top of earlier ones.
    pub(crate) children: Vec<NodeId>,

    /// Absolute rect.
    pub(crate) rect: Rect,
    /// Node visibility.
    pub(crate) hidden: bool,
    /// Foreground color.
    pub(crate) fg: Color,
    /// Background color.
    pub(crate) bg: Color,
    /// Whether the node is reachable from the context root.
    pub(crate) attached: bool,
    /// Node name for dumps and logs.
    pub(crate) name: NodeName,
}

impl Node {
    /// Wrap a widget in a fresh, detached node.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            rect: Rect::zero(),
            hidden: false,
            fg: Color::BLACK,
            bg: Color::TRANSPARENT,
            attached: false,
            name,
        }
    }

    /// Return the node's widget name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the node's absolute rect.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Return true if the node is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Foreground color.
    pub fn fg(&self) -> Color {
        self.fg
    }

    /// Background color.
    pub fn bg(&self) -> Color {
        self.bg
    }

    /// Return true if the node is reachable from the root.
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Borrow the widget, unless one of its hooks is running.
    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }
}

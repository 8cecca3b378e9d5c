use crate::widget::Widget;

/// A node with no behavior of its own. Children keep whatever positions they
/// are given.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base;

impl Widget for Base {}

//! Demo widget trees and the pointer scripts that drive them.

use clap::ValueEnum;
use sprig::{
    Config, NodeId, Sprig,
    backend::RenderBackend,
    error::Result,
    event::{Event, MouseButton, MouseMotion, MouseScroll},
    geom::{Color, Orientation, Rect},
    widgets::{
        Base, Button, Checkbox, Frame, Label, ListView, ProgressBar, Scrollbar, SplitView, Toggle,
        View,
    },
};
use tracing::info;

/// Width of the demo window.
pub const WIDTH: u32 = 800;
/// Height of the demo window.
pub const HEIGHT: u32 = 600;

/// The available demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scenario {
    /// One of each leaf widget in a padded column.
    #[default]
    Gallery,
    /// A scrolling list with a scrollbar beside it.
    List,
    /// Two framed panes with a draggable divider.
    Split,
}

/// A built scene: a context with a tree under a plain root, and a script of
/// events to play against it.
pub struct Scene {
    /// The context holding the tree.
    pub sprig: Sprig,
    /// The plain root node.
    pub root: NodeId,
    /// Widgets of interest, by name, for inspection after a run.
    pub marks: Vec<(&'static str, NodeId)>,
    /// Pointer events that exercise the scene.
    pub script: Vec<Event>,
}

/// The middle of a rect.
fn center(r: Rect) -> (i32, i32) {
    (r.x + (r.w / 2) as i32, r.y + (r.h / 2) as i32)
}

/// A press followed by a release at the same point.
fn click(events: &mut Vec<Event>, (x, y): (i32, i32)) {
    events.push(MouseMotion::new(x, y).into());
    events.push(MouseButton::down(x, y).into());
    events.push(MouseButton::up(x, y).into());
}

impl Scene {
    /// Build `scenario` in a fresh context that renders to `backend`.
    pub fn build(
        scenario: Scenario,
        config: Config,
        backend: Box<dyn RenderBackend>,
    ) -> Result<Self> {
        let mut sprig = Sprig::new(config);
        sprig.register_backend(backend)?;
        let root = sprig.create(Base, None)?.id();
        sprig.set_root(root)?;
        sprig.set_size(root, WIDTH, HEIGHT)?;
        sprig.set_colors(root, Color::BLACK, Color::WHITE)?;
        let mut scene = Self {
            sprig,
            root,
            marks: Vec::new(),
            script: Vec::new(),
        };
        match scenario {
            Scenario::Gallery => scene.gallery()?,
            Scenario::List => scene.list()?,
            Scenario::Split => scene.split()?,
        }
        info!(?scenario, events = scene.script.len(), "scene built");
        Ok(scene)
    }

    /// Look up a marked node.
    pub fn mark(&self, name: &str) -> Option<NodeId> {
        self.marks
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
    }

    /// Play the script, then render and present a final frame.
    pub fn play(&mut self) -> Result<()> {
        for event in &self.script {
            self.sprig.process_event(event)?;
        }
        self.sprig.render()?;
        self.sprig.present()
    }

    /// Record a node under `name`.
    fn keep(&mut self, name: &'static str, id: impl Into<NodeId>) -> NodeId {
        let id = id.into();
        self.marks.push((name, id));
        id
    }

    /// A status label, a button that updates it, and the toggle widgets.
    fn gallery(&mut self) -> Result<()> {
        let column = self
            .sprig
            .create(View::column().with_gap(8).with_padding(10), Some(self.root))?;
        self.sprig.set_position(column, 20, 20)?;
        let column = self.keep("column", column);

        let status = self
            .sprig
            .create(Label::new("Nothing clicked yet"), Some(column))?;
        self.keep("status", status);

        let mut clicks = 0u32;
        let button = self.sprig.create(
            Button::new("Hola!").on_click(move |ctx| {
                clicks += 1;
                ctx.with_widget(status, |label: &mut Label, ctx| {
                    label.set_text(ctx, format!("Clicked {clicks} times"));
                    Ok(())
                })
            }),
            Some(column),
        )?;
        let button = self.keep("button", button);

        let checkbox = self.sprig.create(Checkbox::new("Enabled"), Some(column))?;
        let checkbox = self.keep("checkbox", checkbox);
        let toggle = self.sprig.create(Toggle::new(), Some(column))?;
        let toggle = self.keep("toggle", toggle);

        let progress = self.sprig.create(ProgressBar::new(40.0)?, Some(column))?;
        self.sprig.set_size(progress, 200, 12)?;
        self.keep("progress", progress);

        let frame = self
            .sprig
            .create(Frame::new().with_padding(6).with_border(1), Some(column))?;
        self.sprig.create(Label::new("Framed"), Some(frame.id()))?;
        self.keep("frame", frame);

        let mut script = Vec::new();
        let at = center(self.sprig.rect(button)?);
        click(&mut script, at);
        click(&mut script, at);
        click(&mut script, center(self.sprig.rect(checkbox)?));
        click(&mut script, center(self.sprig.rect(toggle)?));
        script.push(MouseMotion::new(700, 500).into());
        self.script = script;
        Ok(())
    }

    /// Twenty labels in a list view, with a scrollbar that drives it.
    fn list(&mut self) -> Result<()> {
        let list = self.sprig.create(ListView::new().with_gap(4), Some(self.root))?;
        self.sprig.set_rect(list, Rect::new(20, 20, 200, 200))?;
        for n in 0..20 {
            self.sprig
                .create(Label::new(format!("Item {n}")), Some(list.id()))?;
        }
        self.keep("list", list);

        let content = self.sprig.core().children_of(list.id())?.len() as u32;
        let font = self.sprig.core().config().font_size;
        let content_len = content * font + content.saturating_sub(1) * 4;
        let bar = self.sprig.create(
            Scrollbar::vertical(content_len, 200).on_scroll(move |offset, ctx| {
                let offset = i32::try_from(offset).unwrap_or(i32::MAX);
                ctx.with_widget(list, |list: &mut ListView, ctx| {
                    list.set_offset(ctx, -offset);
                    Ok(())
                })
            }),
            Some(self.root),
        )?;
        self.sprig.set_rect(bar, Rect::new(224, 20, 12, 200))?;
        self.keep("scrollbar", bar);

        let (x, y) = center(Rect::new(20, 20, 200, 200));
        let mut script = vec![
            MouseMotion::new(x, y).into(),
            MouseScroll::vertical(x, y, -1.0).into(),
            MouseScroll::vertical(x, y, -1.0).into(),
            MouseScroll::vertical(x, y, -1.0).into(),
            MouseScroll::vertical(x, y, 1.0).into(),
        ];
        // Grab the thumb at the top of the track and drag it to the bottom.
        script.push(MouseButton::down(230, 22).into());
        script.push(MouseMotion::new(230, 400).into());
        script.push(MouseButton::up(230, 400).into());
        self.script = script;
        Ok(())
    }

    /// Two framed panes split side by side.
    fn split(&mut self) -> Result<()> {
        let split = self
            .sprig
            .create(SplitView::new(Orientation::Horizontal), Some(self.root))?;
        self.sprig.set_rect(split, Rect::new(0, 0, 600, 400))?;
        for text in ["Left", "Right"] {
            let frame = self
                .sprig
                .create(Frame::new().with_padding(8).with_border(1), Some(split.id()))?;
            self.sprig.create(Label::new(text), Some(frame.id()))?;
        }
        self.keep("split", split);

        let (_, y) = center(Rect::new(0, 0, 600, 400));
        let divider = 600 / 2;
        self.script = vec![
            MouseMotion::new(divider, y).into(),
            MouseButton::down(divider, y).into(),
            MouseMotion::new(400, y).into(),
            MouseButton::up(400, y).into(),
        ];
        Ok(())
    }
}

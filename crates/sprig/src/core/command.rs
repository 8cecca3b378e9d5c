//! Render commands and the FIFO buffer that carries them to a backend.

use std::collections::{VecDeque, vec_deque};

use crate::{
    error::{Error, Result},
    geom::{Color, Point, Rect},
};

/// Mouse cursor shapes a backend may be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Default pointer.
    #[default]
    Arrow,
    /// Pointing hand, shown over clickable widgets.
    Hand,
    /// Text insertion beam.
    Text,
    /// Horizontal resize arrows.
    ResizeHorizontal,
    /// Vertical resize arrows.
    ResizeVertical,
}

/// A single drawing instruction. Each variant carries only its own payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Filled rectangle.
    Rect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Filled rectangle with rounded corners.
    RoundedRect {
        /// Area to fill.
        rect: Rect,
        /// Corner radius.
        radius: u32,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline.
    RectOutlined {
        /// Outline bounds.
        rect: Rect,
        /// Stroke width.
        thickness: u32,
        /// Stroke color.
        color: Color,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke width.
        thickness: u32,
        /// Stroke color.
        color: Color,
    },
    /// A run of text. The command owns its string.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner of the text.
        origin: Point,
        /// Font name.
        font: String,
        /// Font size.
        size: u32,
        /// Text color.
        color: Color,
    },
    /// Restrict drawing to a rectangle until the matching `PopClip`.
    PushClip(Rect),
    /// Drop the innermost clip.
    PopClip,
    /// Change the mouse cursor.
    SetCursor(Cursor),
    /// Clear the whole surface to a color.
    Clear(Color),
}

/// Strict FIFO of render commands. Appends go to the tail, pops come from
/// the head.
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    /// Queued commands, head first.
    commands: VecDeque<Command>,
}

impl CommandBuffer {
    /// Construct an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Fails with `Error::Allocation` if the buffer can't
    /// grow.
    pub fn push(&mut self, command: Command) -> Result<()> {
        self.commands.try_reserve(1)?;
        self.commands.push_back(command);
        Ok(())
    }

    /// Append a filled rectangle.
    pub fn add_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.push(Command::Rect { rect, color })
    }

    /// Append a filled rounded rectangle.
    pub fn add_rounded_rect(&mut self, rect: Rect, radius: u32, color: Color) -> Result<()> {
        self.push(Command::RoundedRect {
            rect,
            radius,
            color,
        })
    }

    /// Append a rectangle outline.
    pub fn add_rect_outlined(&mut self, rect: Rect, thickness: u32, color: Color) -> Result<()> {
        self.push(Command::RectOutlined {
            rect,
            thickness,
            color,
        })
    }

    /// Append a line segment.
    pub fn add_line(&mut self, from: Point, to: Point, thickness: u32, color: Color) -> Result<()> {
        self.push(Command::Line {
            from,
            to,
            thickness,
            color,
        })
    }

    /// Append a text run. The text and font name are copied into the command.
    pub fn add_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &str,
        size: u32,
        color: Color,
    ) -> Result<()> {
        self.push(Command::Text {
            text: text.to_string(),
            origin,
            font: font.to_string(),
            size,
            color,
        })
    }

    /// Append a clip push.
    pub fn add_push_clip(&mut self, rect: Rect) -> Result<()> {
        self.push(Command::PushClip(rect))
    }

    /// Append a clip pop.
    pub fn add_pop_clip(&mut self) -> Result<()> {
        self.push(Command::PopClip)
    }

    /// Append a cursor change.
    pub fn add_set_cursor(&mut self, cursor: Cursor) -> Result<()> {
        self.push(Command::SetCursor(cursor))
    }

    /// Append a surface clear.
    pub fn add_clear(&mut self, color: Color) -> Result<()> {
        self.push(Command::Clear(color))
    }

    /// Remove and return the command at the head of the buffer.
    pub fn get_next_command(&mut self) -> Result<Command> {
        self.commands.pop_front().ok_or(Error::EmptyCommandBuffer)
    }

    /// Drop every queued command.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Iterate over queued commands, head first, without consuming them.
    pub fn iter(&self) -> vec_deque::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Remove and yield every queued command in order.
    pub fn drain(&mut self) -> vec_deque::Drain<'_, Command> {
        self.commands.drain(..)
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a Command;
    type IntoIter = vec_deque::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

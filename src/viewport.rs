use ratatui::layout::Rect;

use crate::config::GameSettings;
use crate::layout::Position;
use crate::session::Session;

/// Maps the game canvas onto a rectangle of terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    canvas_width: f64,
    canvas_height: f64,
    item_size: f64,
}

impl Viewport {
    pub fn new(area: Rect, settings: &GameSettings) -> Self {
        Self {
            area,
            canvas_width: settings.canvas_width.max(1.0),
            canvas_height: settings.canvas_height.max(1.0),
            item_size: settings.item_size.max(0.0),
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn scale(value: f64, canvas: f64, cells: u16) -> u16 {
        (value * cells as f64 / canvas).floor().clamp(0.0, u16::MAX as f64) as u16
    }

    /// Cells covered by a target whose top-left corner is `position`.
    /// Targets are at least 3x1 cells so their rank stays readable, and are
    /// shifted back inside the area when rounding pushes them past an edge.
    pub fn target_rect(&self, position: Position) -> Rect {
        let width = Self::scale(self.item_size, self.canvas_width, self.area.width)
            .max(3)
            .min(self.area.width);
        let height = Self::scale(self.item_size, self.canvas_height, self.area.height)
            .max(1)
            .min(self.area.height);

        let x = Self::scale(position.x, self.canvas_width, self.area.width)
            .min(self.area.width.saturating_sub(width));
        let y = Self::scale(position.y, self.canvas_height, self.area.height)
            .min(self.area.height.saturating_sub(height));

        Rect::new(self.area.x + x, self.area.y + y, width, height)
    }

    /// Rank of the topmost visible target under a terminal cell.
    /// Higher ranks are drawn later, so they win where targets overlap.
    pub fn hit_test(&self, session: &Session, column: u16, row: u16) -> Option<usize> {
        if !session.is_running() {
            return None;
        }

        session
            .visible_targets()
            .filter(|t| {
                let r = self.target_rect(t.position);
                column >= r.x && column < r.right() && row >= r.y && row < r.bottom()
            })
            .map(|t| t.rank)
            .last()
    }
}

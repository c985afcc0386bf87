use iced::{Point, Vector};

/// Drag-to-move for the frameless overlay. Positions are window-relative
/// cursor positions; the returned delta is how far the window must move.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    dragging: bool,
    anchor: Point,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            dragging: false,
            anchor: Point::ORIGIN,
        }
    }
}

impl DragState {
    pub fn press(&mut self, at: Point) {
        self.dragging = true;
        self.anchor = at;
    }

    pub fn drag_to(&self, cursor: Point) -> Option<Vector> {
        self.dragging.then(|| cursor - self.anchor)
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

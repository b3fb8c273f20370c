//! Access to the host-owned drawing list
//!
//! The engine never keeps its own copy of the drawings. Every change is
//! computed as a fresh list and handed back through [`DrawingStore::set_drawings`].

use annotations_shared::{Drawing, DrawingId};

/// The caller's ordered drawing list plus its setter
pub trait DrawingStore {
    fn drawings(&self) -> &[Drawing];

    /// Replace the whole list
    fn set_drawings(&mut self, drawings: Vec<Drawing>);

    fn find(&self, id: &DrawingId) -> Option<&Drawing> {
        self.drawings().iter().find(|d| &d.id == id)
    }

    fn contains(&self, id: &DrawingId) -> bool {
        self.find(id).is_some()
    }
}

impl DrawingStore for Vec<Drawing> {
    fn drawings(&self) -> &[Drawing] {
        self
    }

    fn set_drawings(&mut self, drawings: Vec<Drawing>) {
        *self = drawings;
    }
}

/// New list with `drawing` appended on top
pub fn with_appended(drawings: &[Drawing], drawing: Drawing) -> Vec<Drawing> {
    let mut next = Vec::with_capacity(drawings.len() + 1);
    next.extend_from_slice(drawings);
    next.push(drawing);
    next
}

/// New list with the drawing of the same id swapped for `drawing`.
/// Order is preserved; an unknown id leaves the list as it was.
pub fn with_replaced(drawings: &[Drawing], drawing: &Drawing) -> Vec<Drawing> {
    drawings
        .iter()
        .map(|d| {
            if d.id == drawing.id {
                drawing.clone()
            } else {
                d.clone()
            }
        })
        .collect()
}

/// New list without the drawing `id`
pub fn without(drawings: &[Drawing], id: &DrawingId) -> Vec<Drawing> {
    drawings.iter().filter(|d| &d.id != id).cloned().collect()
}

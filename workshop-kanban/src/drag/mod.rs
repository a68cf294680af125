//! Drag Session Tracker
//!
//! Holds the transient state of the one drag gesture a board may have in
//! flight: what is being dragged, where it started, and what it hovers.
//! Nothing here is persisted.

use crate::types::{ColumnId, EntityKind, Target};
use serde::Serialize;
use tracing::{debug, trace};

/// Where a dragged item sat when the gesture began
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub column: ColumnId,
    pub position: i64,
}

/// The entity under the pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dragged {
    pub id: String,
    pub kind: EntityKind,
    /// Pre-drag placement, recorded for items only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

/// A finished gesture handed back by [`DragSession::take`]
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedDrag {
    pub dragged: Dragged,
    pub last_hover: Option<Target>,
}

/// At most one drag per board; empty outside of a gesture.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    dragged: Option<Dragged>,
    hover: Option<Target>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<&Dragged> {
        self.dragged.as_ref()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.dragged.as_ref().map(|d| d.id.as_str())
    }

    pub fn hover(&self) -> Option<&Target> {
        self.hover.as_ref()
    }

    /// Record the dragged entity. Returns false, changing nothing, when a
    /// drag is already active.
    pub fn begin(&mut self, id: impl Into<String>, kind: EntityKind, origin: Option<Origin>) -> bool {
        let id = id.into();
        if let Some(active) = &self.dragged {
            debug!(active = %active.id, ignored = %id, "drag already active, ignoring begin");
            return false;
        }
        debug!(id = %id, ?kind, "drag started");
        self.dragged = Some(Dragged { id, kind, origin });
        self.hover = None;
        true
    }

    /// Overwrite the hover target. Ignored without an active drag and when
    /// the target is the dragged entity itself.
    pub fn update_hover(&mut self, target: Target) -> bool {
        let Some(dragged) = &self.dragged else {
            return false;
        };
        if dragged.id == target.id {
            trace!(id = %target.id, "ignoring self-hover");
            return false;
        }
        trace!(over = %target.id, kind = ?target.kind, placement = ?target.placement, "hover");
        self.hover = Some(target);
        true
    }

    /// The pointer left every target
    pub fn leave_hover(&mut self) {
        self.hover = None;
    }

    /// Consume the session, leaving it empty
    pub fn take(&mut self) -> Option<FinishedDrag> {
        let last_hover = self.hover.take();
        self.dragged.take().map(|dragged| FinishedDrag {
            dragged,
            last_hover,
        })
    }

    pub fn clear(&mut self) {
        self.dragged = None;
        self.hover = None;
    }
}

//! Drag targets and pointer geometry.

use serde::{Deserialize, Serialize};

/// What kind of entity an id names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Item,
    Column,
}

/// Whether a dragged item lands before or after the item it hovers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Before,
    After,
}

/// Vertical extent of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

impl Placement {
    /// Decide placement from the dragged element's translated top edge and the
    /// hovered element's bounds. The item counts as below only once its top
    /// edge has passed the hovered element's bottom edge.
    pub fn from_geometry(translated_top: Option<f64>, over: Rect) -> Self {
        match translated_top {
            Some(top) if top > over.top + over.height => Self::After,
            _ => Self::Before,
        }
    }
}

/// A hover or drop target reported by the pointer layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub kind: EntityKind,
    #[serde(default)]
    pub placement: Placement,
}

impl Target {
    /// Target an item, landing before it
    pub fn item(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Item,
            placement: Placement::Before,
        }
    }

    /// Target the empty space of a column
    pub fn column(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Column,
            placement: Placement::Before,
        }
    }

    /// Land after the targeted item instead of before it
    pub fn after(mut self) -> Self {
        self.placement = Placement::After;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_below_bottom_edge() {
        let over = Rect::new(100.0, 40.0);
        assert_eq!(Placement::from_geometry(Some(141.0), over), Placement::After);
        assert_eq!(Placement::from_geometry(Some(140.0), over), Placement::Before);
        assert_eq!(Placement::from_geometry(Some(90.0), over), Placement::Before);
    }

    #[test]
    fn test_placement_without_translated_rect() {
        let over = Rect::new(0.0, 10.0);
        assert_eq!(Placement::from_geometry(None, over), Placement::Before);
    }

    #[test]
    fn test_target_builders() {
        let t = Target::item("c").after();
        assert_eq!(t.kind, EntityKind::Item);
        assert_eq!(t.placement, Placement::After);
        assert_eq!(Target::column("todo").kind, EntityKind::Column);
    }
}

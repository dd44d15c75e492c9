use foundation::{EntityCode, Rgb};

use crate::entity::EntityId;

/// A rendered country shape on the globe.
///
/// The scene owns creation and destruction; the recoloring pipeline only
/// reads `code` and writes `color`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonHandle {
    pub id: EntityId,
    pub code: EntityCode,
    pub color: Rgb,
}

impl PolygonHandle {
    pub fn new(id: EntityId, code: impl Into<EntityCode>, color: Rgb) -> Self {
        Self {
            id,
            code: code.into(),
            color,
        }
    }
}

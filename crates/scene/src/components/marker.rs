use foundation::EntityCode;

use crate::components::Visibility;
use crate::entity::EntityId;

pub const COUNTRY_MARKER_PREFIX: &str = "country-";
pub const REGION_MARKER_PREFIX: &str = "region-label-";

/// Marker collection a label belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Country,
    Region,
}

impl MarkerKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MarkerKind::Country => COUNTRY_MARKER_PREFIX,
            MarkerKind::Region => REGION_MARKER_PREFIX,
        }
    }
}

/// A rendered label element tagged with its geographic code.
///
/// Country markers carry the country code, region markers carry the region slug.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHandle {
    pub id: EntityId,
    pub kind: MarkerKind,
    pub code: EntityCode,
    pub visibility: Visibility,
}

impl MarkerHandle {
    pub fn new(id: EntityId, kind: MarkerKind, code: impl Into<EntityCode>) -> Self {
        Self {
            id,
            kind,
            code: code.into(),
            visibility: Visibility::hidden(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.visible
    }

    /// DOM element id, e.g. `country-USA` or `region-label-europe`.
    pub fn dom_id(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.code)
    }

    /// Recovers `(kind, code)` from a DOM element id.
    ///
    /// The region prefix is tested first; `region-label-` never collides with
    /// `country-`.
    pub fn parse_dom_id(dom_id: &str) -> Option<(MarkerKind, EntityCode)> {
        for kind in [MarkerKind::Region, MarkerKind::Country] {
            if let Some(code) = dom_id.strip_prefix(kind.prefix()) {
                if code.is_empty() {
                    return None;
                }
                return Some((kind, EntityCode::from(code)));
            }
        }
        None
    }
}

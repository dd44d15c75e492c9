use scene::GlobeScene;
use scene::components::{MarkerHandle, MarkerKind, Visibility};
use scene::selection::MatchSet;

use crate::layer::{Layer, LayerId};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct VisibilitySummary {
    pub shown: usize,
    pub hidden: usize,
}

/// Shows markers of `kind` whose code is matched and hides the rest.
///
/// Markers of any other kind are left untouched. An empty match set hides
/// every marker of `kind`.
pub fn resolve_visibility<'a, I>(markers: I, kind: MarkerKind, matched: &MatchSet) -> VisibilitySummary
where
    I: IntoIterator<Item = &'a mut MarkerHandle>,
{
    let mut summary = VisibilitySummary::default();
    for marker in markers {
        if marker.kind != kind {
            continue;
        }
        let visible = !matched.is_empty() && matched.contains(marker.code.as_str());
        marker.visibility = Visibility::from_flag(visible);
        if visible {
            summary.shown += 1;
        } else {
            summary.hidden += 1;
        }
    }
    summary
}

/// One marker collection (country labels or region labels).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MarkerLayer {
    id: LayerId,
    pub kind: MarkerKind,
}

impl MarkerLayer {
    pub fn new(id: u64, kind: MarkerKind) -> Self {
        Self {
            id: LayerId(id),
            kind,
        }
    }

    pub fn apply(&self, scene: &mut GlobeScene, matched: &MatchSet) -> VisibilitySummary {
        let summary = resolve_visibility(scene.markers_mut(self.kind), self.kind, matched);
        tracing::debug!(
            layer = self.name(),
            shown = summary.shown,
            hidden = summary.hidden,
            "marker visibility applied"
        );
        summary
    }

    pub fn hide_all(&self, scene: &mut GlobeScene) -> VisibilitySummary {
        self.apply(scene, &MatchSet::new())
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        match self.kind {
            MarkerKind::Country => "country-markers",
            MarkerKind::Region => "region-markers",
        }
    }
}

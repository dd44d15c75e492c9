use catalog::ReferenceCatalog;
use foundation::handles::Handle;
use foundation::{EntityCode, Rgb};

use crate::components::{MarkerHandle, MarkerKind, PolygonHandle};
use crate::entity::EntityId;

/// Rendered globe state the pipeline writes into.
///
/// Polygons and markers live in one index space so every handle has a
/// distinct `EntityId`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlobeScene {
    next_index: u32,
    polygons: Vec<PolygonHandle>,
    markers: Vec<MarkerHandle>,
}

impl GlobeScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// One polygon and one marker per catalog country, one marker per region.
    pub fn from_catalog(catalog: &ReferenceCatalog, base_color: Rgb) -> Self {
        let mut scene = Self::new();
        for code in catalog.countries() {
            scene.add_polygon(code.clone(), base_color);
            scene.add_marker(MarkerKind::Country, code.clone());
        }
        for region in catalog.regions() {
            scene.add_marker(MarkerKind::Region, region.slug.clone());
        }
        scene
    }

    fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        id
    }

    pub fn add_polygon(&mut self, code: impl Into<EntityCode>, color: Rgb) -> EntityId {
        let id = self.spawn();
        self.polygons.push(PolygonHandle::new(id, code, color));
        id
    }

    pub fn add_marker(&mut self, kind: MarkerKind, code: impl Into<EntityCode>) -> EntityId {
        let id = self.spawn();
        self.markers.push(MarkerHandle::new(id, kind, code));
        id
    }

    pub fn polygons(&self) -> &[PolygonHandle] {
        &self.polygons
    }

    pub fn polygons_mut(&mut self) -> &mut [PolygonHandle] {
        &mut self.polygons
    }

    pub fn polygon(&self, code: &str) -> Option<&PolygonHandle> {
        self.polygons.iter().find(|p| p.code.as_str() == code)
    }

    pub fn markers(&self) -> &[MarkerHandle] {
        &self.markers
    }

    /// All markers of one collection, in insertion order.
    pub fn markers_of(&self, kind: MarkerKind) -> impl Iterator<Item = &MarkerHandle> + '_ {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    pub fn markers_mut(&mut self, kind: MarkerKind) -> impl Iterator<Item = &mut MarkerHandle> + '_ {
        self.markers.iter_mut().filter(move |m| m.kind == kind)
    }

    pub fn marker(&self, kind: MarkerKind, code: &str) -> Option<&MarkerHandle> {
        self.markers_of(kind).find(|m| m.code.as_str() == code)
    }

    /// Looks a marker up by its DOM id (`country-USA`, `region-label-europe`).
    pub fn marker_by_dom_id(&self, dom_id: &str) -> Option<&MarkerHandle> {
        let (kind, code) = MarkerHandle::parse_dom_id(dom_id)?;
        self.marker(kind, code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeScene;
    use crate::components::MarkerKind;
    use catalog::ReferenceCatalog;
    use foundation::Rgb;

    const CATALOG: &str = r#"{
        "regions": [{ "name": "Europe", "slug": "europe", "countries": ["FRA", "DEU"] }],
        "countries": ["USA"]
    }"#;

    #[test]
    fn builds_handles_from_catalog() {
        let catalog = ReferenceCatalog::from_json_str(CATALOG).unwrap();
        let base = Rgb::new(1, 2, 3);
        let scene = GlobeScene::from_catalog(&catalog, base);

        assert_eq!(scene.polygons().len(), 3);
        assert!(scene.polygons().iter().all(|p| p.color == base));
        assert_eq!(scene.markers_of(MarkerKind::Country).count(), 3);
        assert_eq!(scene.markers_of(MarkerKind::Region).count(), 1);
        assert!(scene.markers().iter().all(|m| !m.is_visible()));

        let europe = scene.marker_by_dom_id("region-label-europe").unwrap();
        assert_eq!(europe.kind, MarkerKind::Region);
        assert!(scene.marker_by_dom_id("country-FRA").is_some());
        assert!(scene.marker_by_dom_id("country-XXX").is_none());
    }

    #[test]
    fn ids_are_unique_across_collections() {
        let mut scene = GlobeScene::new();
        let a = scene.add_polygon("USA", Rgb::new(0, 0, 0));
        let b = scene.add_marker(MarkerKind::Country, "USA");
        assert_ne!(a, b);
        assert_eq!(scene.polygon("USA").map(|p| p.id), Some(a));
    }
}

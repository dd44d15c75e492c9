//! Assigns gradient colors to country polygons from a match set.
//!
//! Two traversal modes:
//! - countries: the k-th matched country sits at `k / n` along the gradient;
//! - regions: the k-th matched region sits at `0.15 * (k + 1)` and all of its
//!   countries share that color.
//!
//! Positions are clamped to `1.0`.

use std::collections::BTreeMap;

use catalog::ReferenceCatalog;
use foundation::EntityCode;
use scene::GlobeScene;
use scene::components::PolygonHandle;
use scene::selection::MatchSet;

use crate::layer::{Layer, LayerId};
use crate::symbology::Gradient;

pub const REGION_STEP: f64 = 0.15;
pub const MAX_POSITION: f64 = 1.0;

/// Gradient position per matched country code.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColorPlan {
    positions: BTreeMap<EntityCode, f64>,
}

impl ColorPlan {
    /// Plan that paints every polygon inactive.
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn countries(matched: &MatchSet) -> Self {
        let mut plan = Self::default();
        if matched.is_empty() {
            return plan;
        }
        let step = 1.0 / matched.len() as f64;
        for (k, code) in matched.iter().enumerate() {
            plan.positions.insert(code.clone(), clamp_position(k as f64 * step));
        }
        plan
    }

    /// `matched` holds region names; regions missing from `catalog` are skipped
    /// and do not consume a step.
    pub fn regions(matched: &MatchSet, catalog: &ReferenceCatalog) -> Self {
        let mut plan = Self::default();
        let mut k = 0usize;
        for name in matched.iter() {
            let Some(region) = catalog.region(name.as_str()) else {
                tracing::warn!(region = %name, "matched region not in catalog");
                continue;
            };
            k += 1;
            let raw = REGION_STEP * k as f64;
            if raw > MAX_POSITION {
                tracing::debug!(region = %name, position = raw, "region position clamped");
            }
            let position = clamp_position(raw);
            for country in &region.countries {
                // First matched region wins for shared countries.
                plan.positions.entry(country.clone()).or_insert(position);
            }
        }
        plan
    }

    pub fn position(&self, code: &str) -> Option<f64> {
        self.positions.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn clamp_position(p: f64) -> f64 {
    p.clamp(0.0, MAX_POSITION)
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ColoringSummary {
    pub highlighted: usize,
    pub inactive: usize,
}

/// Repaints every polygon: planned codes get their gradient color, the rest
/// get `gradient.inactive`.
pub fn assign_colors<'a, I>(polygons: I, plan: &ColorPlan, gradient: &Gradient) -> ColoringSummary
where
    I: IntoIterator<Item = &'a mut PolygonHandle>,
{
    let mut summary = ColoringSummary::default();
    for polygon in polygons {
        match plan.position(polygon.code.as_str()) {
            Some(position) => {
                polygon.color = gradient.sample(position);
                summary.highlighted += 1;
            }
            None => {
                polygon.color = gradient.inactive;
                summary.inactive += 1;
            }
        }
    }
    summary
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChoroplethLayer {
    id: LayerId,
    pub gradient: Gradient,
}

impl ChoroplethLayer {
    pub fn new(id: u64, gradient: Gradient) -> Self {
        Self {
            id: LayerId(id),
            gradient,
        }
    }

    pub fn apply(&self, scene: &mut GlobeScene, plan: &ColorPlan) -> ColoringSummary {
        let summary = assign_colors(scene.polygons_mut(), plan, &self.gradient);
        tracing::debug!(
            layer = self.name(),
            highlighted = summary.highlighted,
            inactive = summary.inactive,
            "choropleth applied"
        );
        summary
    }
}

impl Layer for ChoroplethLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "choropleth"
    }
}

#[cfg(test)]
mod tests {
    use super::{ChoroplethLayer, ColorPlan, REGION_STEP, assign_colors};
    use crate::symbology::Gradient;
    use catalog::ReferenceCatalog;
    use foundation::Rgb;
    use scene::GlobeScene;
    use scene::selection::MatchSet;

    const CATALOG: &str = r#"{
        "regions": [
            { "name": "Europe", "slug": "europe", "countries": ["FRA", "DEU"] },
            { "name": "Americas", "slug": "americas", "countries": ["USA", "CAN", "FRA"] }
        ],
        "countries": ["JPN"]
    }"#;

    fn scene() -> (ReferenceCatalog, GlobeScene) {
        let catalog = ReferenceCatalog::from_json_str(CATALOG).unwrap();
        let scene = GlobeScene::from_catalog(&catalog, Rgb::new(0x9b, 0xb5, 0x79));
        (catalog, scene)
    }

    #[test]
    fn country_positions_step_by_inverse_count() {
        let matched: MatchSet = ["USA", "CAN"].into_iter().collect();
        let plan = ColorPlan::countries(&matched);
        assert_eq!(plan.position("USA"), Some(0.0));
        assert_eq!(plan.position("CAN"), Some(0.5));
        assert_eq!(plan.position("FRA"), None);
        assert!(ColorPlan::countries(&MatchSet::new()).is_empty());
    }

    #[test]
    fn region_positions_share_color_and_first_region_wins() {
        let (catalog, _) = scene();
        let matched: MatchSet = ["Europe", "Atlantis", "Americas"].into_iter().collect();
        let plan = ColorPlan::regions(&matched, &catalog);
        assert_eq!(plan.position("FRA"), Some(REGION_STEP));
        assert_eq!(plan.position("DEU"), Some(REGION_STEP));
        assert_eq!(plan.position("USA"), Some(REGION_STEP * 2.0));
        assert_eq!(plan.position("CAN"), Some(REGION_STEP * 2.0));
        assert_eq!(plan.position("JPN"), None);
    }

    #[test]
    fn region_positions_are_clamped() {
        let names: Vec<String> = (0..8).map(|i| format!("R{i}")).collect();
        let regions: Vec<String> = names
            .iter()
            .map(|n| format!(r#"{{"name": "{n}", "slug": "{}", "countries": ["{n}X"]}}"#, n.to_lowercase()))
            .collect();
        let json = format!(r#"{{"regions": [{}]}}"#, regions.join(","));
        let catalog = ReferenceCatalog::from_json_str(&json).unwrap();
        let matched: MatchSet = names.iter().map(String::as_str).collect();
        let plan = ColorPlan::regions(&matched, &catalog);
        assert_eq!(plan.position("R7X"), Some(1.0));
        assert_eq!(plan.position("R6X"), Some(1.0));
        assert!((plan.position("R5X").unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn painting_is_complementary_and_idempotent() {
        let (_, mut scene) = scene();
        let g = Gradient::default();
        let matched: MatchSet = ["USA", "CAN"].into_iter().collect();
        let plan = ColorPlan::countries(&matched);

        let summary = assign_colors(scene.polygons_mut(), &plan, &g);
        assert_eq!(summary.highlighted, 2);
        assert_eq!(summary.inactive, 3);
        let once = scene.clone();

        assign_colors(scene.polygons_mut(), &plan, &g);
        assert_eq!(scene, once);

        for p in scene.polygons() {
            let matched_code = matched.contains(p.code.as_str());
            assert!(matched_code ^ (p.color == g.inactive), "{}", p.code);
        }
        assert_eq!(scene.polygon("USA").unwrap().color, g.sample(0.0));
        assert_eq!(scene.polygon("CAN").unwrap().color, g.sample(0.5));
    }

    #[test]
    fn replay_with_new_plan_overwrites_everything() {
        let (_, mut scene) = scene();
        let layer = ChoroplethLayer::new(1, Gradient::default());
        let first: MatchSet = ["USA"].into_iter().collect();
        layer.apply(&mut scene, &ColorPlan::countries(&first));

        let second: MatchSet = ["JPN"].into_iter().collect();
        layer.apply(&mut scene, &ColorPlan::countries(&second));
        assert_eq!(scene.polygon("USA").unwrap().color, layer.gradient.inactive);
        assert_eq!(scene.polygon("JPN").unwrap().color, layer.gradient.sample(0.0));

        let summary = layer.apply(&mut scene, &ColorPlan::inactive());
        assert_eq!(summary.highlighted, 0);
        assert!(scene.polygons().iter().all(|p| p.color == layer.gradient.inactive));
    }
}

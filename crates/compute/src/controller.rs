//! Owns the visualization state and drives the recoloring pipeline.
//!
//! State machine:
//! - `Idle -> QueryPending` on `select_question`;
//! - `QueryPending -> QueryApplied` on a decodable, current response
//!   (normalize, then color polygons, then resolve markers);
//! - `QueryPending -> Idle` on fetch failure or malformed response, with no
//!   visible change;
//! - any state `-> Idle` on `clear`.
//!
//! Every failure path leaves metrics, polygon colors and marker visibility
//! exactly as they were.

use catalog::ReferenceCatalog;
use foundation::{EntityCode, EntityKind};
use layers::choropleth::{ChoroplethLayer, ColorPlan, ColoringSummary};
use layers::labels::{MarkerLayer, VisibilitySummary};
use layers::symbology::GlobePalette;
use runtime::{Event, EventBus};
use scene::GlobeScene;
use scene::components::MarkerKind;
use scene::selection::MatchSet;
use streaming::{
    ApiConfig, MetricRecord, ProtocolError, Question, Request, RequestGenerations,
    decode_response, find_question,
};

use crate::analysis::{MetricSummary, summarize_metric};
use crate::detail::{CountryDetail, country_detail};
use crate::normalize::{EntityMetrics, normalize};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerState {
    Idle,
    QueryPending {
        request: Request,
        question: &'static Question,
    },
    QueryApplied {
        question: &'static Question,
    },
}

/// A selected question waiting for its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub request: Request,
    pub question: &'static Question,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub request: Request,
    pub question: &'static Question,
    /// Region names or country codes, depending on the question target.
    pub matched: MatchSet,
    pub coloring: ColoringSummary,
    pub visibility: VisibilitySummary,
}

#[derive(Debug)]
pub enum ControllerError {
    UnknownQuestion(String),
    UnknownCountry(String),
    /// No scene attached yet.
    NotReady,
    /// The response belongs to a superseded request.
    StaleResponse { request: Request, latest: Request },
    Malformed(ProtocolError),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerError::UnknownQuestion(id) => write!(f, "unknown question: {id}"),
            ControllerError::UnknownCountry(code) => write!(f, "unknown country: {code}"),
            ControllerError::NotReady => write!(f, "globe scene not initialized"),
            ControllerError::StaleResponse { request, latest } => write!(
                f,
                "response for request {} superseded by request {}",
                request.0, latest.0
            ),
            ControllerError::Malformed(err) => write!(f, "malformed response: {err}"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControllerError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct GlobeController {
    catalog: ReferenceCatalog,
    api: ApiConfig,
    palette: GlobePalette,
    region_metrics: EntityMetrics,
    country_metrics: EntityMetrics,
    scene: Option<GlobeScene>,
    choropleth: ChoroplethLayer,
    country_markers: MarkerLayer,
    region_markers: MarkerLayer,
    generations: RequestGenerations,
    state: ControllerState,
    modal: Option<EntityCode>,
    events: EventBus,
}

impl GlobeController {
    pub fn new(catalog: ReferenceCatalog, api: ApiConfig) -> Self {
        let palette = GlobePalette::default();
        let region_metrics = EntityMetrics::for_regions(&catalog);
        let country_metrics = EntityMetrics::for_countries(&catalog);
        Self {
            catalog,
            api,
            palette,
            region_metrics,
            country_metrics,
            scene: None,
            choropleth: ChoroplethLayer::new(1, palette.gradient()),
            country_markers: MarkerLayer::new(2, MarkerKind::Country),
            region_markers: MarkerLayer::new(3, MarkerKind::Region),
            generations: RequestGenerations::new(),
            state: ControllerState::Idle,
            modal: None,
            events: EventBus::bounded(EVENT_CAPACITY),
        }
    }

    pub fn attach_scene(&mut self, scene: GlobeScene) {
        self.scene = Some(scene);
    }

    /// Builds the scene from the catalog, painted with the default polygon color.
    pub fn attach_catalog_scene(&mut self) {
        let scene = GlobeScene::from_catalog(&self.catalog, self.palette.polygon);
        self.scene = Some(scene);
    }

    pub fn scene(&self) -> Option<&GlobeScene> {
        self.scene.as_ref()
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn palette(&self) -> &GlobePalette {
        &self.palette
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn latest_request(&self) -> Request {
        self.generations.latest()
    }

    pub fn metrics(&self, kind: EntityKind) -> &EntityMetrics {
        match kind {
            EntityKind::Region => &self.region_metrics,
            EntityKind::Country => &self.country_metrics,
        }
    }

    pub fn match_set(&self, kind: EntityKind) -> MatchSet {
        self.metrics(kind).match_set()
    }

    pub fn metric_summary(&self, kind: EntityKind, metric: &str) -> Option<MetricSummary> {
        summarize_metric(self.metrics(kind), metric)
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Issues a new request generation for question `id`.
    ///
    /// Any response still in flight for an earlier generation will be discarded.
    pub fn select_question(&mut self, id: &str) -> Result<PendingQuery, ControllerError> {
        let question =
            find_question(id).ok_or_else(|| ControllerError::UnknownQuestion(id.to_string()))?;
        let request = self.generations.issue();
        let url = self.api.url_for(question.endpoint);
        self.state = ControllerState::QueryPending { request, question };
        tracing::debug!(request = request.0, question = question.id, %url, "query selected");
        self.events.emit(request.0, "select", question.id);
        Ok(PendingQuery {
            request,
            question,
            url,
        })
    }

    /// Decodes `body` and applies it if `request` is still the pending one.
    pub fn apply_response(
        &mut self,
        request: Request,
        body: &str,
    ) -> Result<ApplyOutcome, ControllerError> {
        let question = self.pending_question(request)?;
        if self.scene.is_none() {
            return Err(self.not_ready(request));
        }
        let records = match decode_response(body, question.target) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(request = request.0, error = %err, "metrics response rejected");
                self.events.emit(request.0, "malformed", err.to_string());
                self.state = ControllerState::Idle;
                return Err(ControllerError::Malformed(err));
            }
        };
        self.apply_records(request, &records)
    }

    /// Runs normalize, color and marker stages for already-decoded records.
    pub fn apply_records(
        &mut self,
        request: Request,
        records: &[MetricRecord],
    ) -> Result<ApplyOutcome, ControllerError> {
        let question = self.pending_question(request)?;
        if self.scene.is_none() {
            return Err(self.not_ready(request));
        }

        let (metrics, matched, plan, marker_matches, marker_layer) = match question.target {
            EntityKind::Region => {
                let metrics = normalize(&self.region_metrics, records);
                let matched = metrics.match_set();
                let plan = ColorPlan::regions(&matched, &self.catalog);
                let slugs = matched.filter_map(|name| {
                    self.catalog
                        .region(name.as_str())
                        .map(|region| region.slug.clone())
                });
                (metrics, matched, plan, slugs, self.region_markers)
            }
            EntityKind::Country => {
                let metrics = normalize(&self.country_metrics, records);
                let matched = metrics.match_set();
                let plan = ColorPlan::countries(&matched);
                let codes = matched.clone();
                (metrics, matched, plan, codes, self.country_markers)
            }
        };

        let Some(scene) = self.scene.as_mut() else {
            return Err(ControllerError::NotReady);
        };
        match question.target {
            EntityKind::Region => self.region_metrics = metrics,
            EntityKind::Country => self.country_metrics = metrics,
        }
        let coloring = self.choropleth.apply(scene, &plan);
        let visibility = marker_layer.apply(scene, &marker_matches);

        self.state = ControllerState::QueryApplied { question };
        tracing::debug!(
            request = request.0,
            question = question.id,
            matched = matched.len(),
            "metrics applied"
        );
        self.events.emit(
            request.0,
            "applied",
            format!(
                "{} matched, {} highlighted, {} markers shown",
                matched.len(),
                coloring.highlighted,
                visibility.shown
            ),
        );

        Ok(ApplyOutcome {
            request,
            question,
            matched,
            coloring,
            visibility,
        })
    }

    /// Records a failed fetch; the visualization is left as it was.
    pub fn fetch_failed(&mut self, request: Request, reason: &str) -> Result<(), ControllerError> {
        self.pending_question(request)?;
        tracing::warn!(request = request.0, reason, "metrics fetch failed");
        self.events.emit(request.0, "fetch_failed", reason);
        self.state = ControllerState::Idle;
        Ok(())
    }

    /// Resets all metrics, paints every polygon inactive and hides every marker.
    ///
    /// Responses still in flight are discarded when they arrive.
    pub fn clear(&mut self) -> Result<(), ControllerError> {
        if self.scene.is_none() {
            let latest = self.generations.latest();
            return Err(self.not_ready(latest));
        }
        self.generations.invalidate();
        self.region_metrics = normalize(&self.region_metrics, &[]);
        self.country_metrics = normalize(&self.country_metrics, &[]);
        self.modal = None;

        if let Some(scene) = self.scene.as_mut() {
            self.choropleth.apply(scene, &ColorPlan::inactive());
            self.country_markers.hide_all(scene);
            self.region_markers.hide_all(scene);
        }

        self.state = ControllerState::Idle;
        let generation = self.generations.latest().0;
        tracing::debug!(generation, "selection cleared");
        self.events.emit(generation, "cleared", "");
        Ok(())
    }

    pub fn open_modal(&mut self, code: &str) -> Result<(), ControllerError> {
        if !self.catalog.contains_country(code) {
            return Err(ControllerError::UnknownCountry(code.to_string()));
        }
        self.modal = Some(EntityCode::from(code));
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Detail panel for the open country, if any.
    pub fn modal(&self) -> Option<CountryDetail> {
        let code = self.modal.as_ref()?;
        country_detail(&self.country_metrics, code.as_str())
    }

    fn pending_question(&mut self, request: Request) -> Result<&'static Question, ControllerError> {
        let latest = self.generations.latest();
        match self.state {
            ControllerState::QueryPending {
                request: pending,
                question,
            } if pending == request && self.generations.is_current(request) => Ok(question),
            _ => {
                tracing::warn!(
                    request = request.0,
                    latest = latest.0,
                    "stale metrics response discarded"
                );
                self.events
                    .emit(request.0, "stale", format!("latest request is {}", latest.0));
                Err(ControllerError::StaleResponse { request, latest })
            }
        }
    }

    fn not_ready(&mut self, request: Request) -> ControllerError {
        tracing::warn!(request = request.0, "globe scene not initialized");
        self.events.emit(request.0, "not_ready", "");
        ControllerError::NotReady
    }
}

use std::collections::BTreeMap;

use catalog::ReferenceCatalog;
use foundation::EntityCode;
use scene::selection::MatchSet;
use streaming::{MetricRecord, MetricValue};

/// Metric name used when a record omits one.
pub const DEFAULT_METRIC: &str = "score";

pub type MetricSet = BTreeMap<String, MetricValue>;

/// Per-entity metrics keyed by entity code.
///
/// Invariants:
/// - the key set is fixed at construction (seeded from the catalog);
/// - `merge_order` lists codes in the order the latest batch first touched them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EntityMetrics {
    entries: BTreeMap<EntityCode, MetricSet>,
    merge_order: Vec<EntityCode>,
}

impl EntityMetrics {
    pub fn seeded<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<EntityCode>,
    {
        Self {
            entries: codes.into_iter().map(|c| (c.into(), MetricSet::new())).collect(),
            merge_order: Vec::new(),
        }
    }

    /// Keyed by region name.
    pub fn for_regions(catalog: &ReferenceCatalog) -> Self {
        Self::seeded(catalog.regions().iter().map(|r| r.name.clone()))
    }

    /// Keyed by country code.
    pub fn for_countries(catalog: &ReferenceCatalog) -> Self {
        Self::seeded(catalog.countries().iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn get(&self, code: &str) -> Option<&MetricSet> {
        self.entries.get(code)
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntityCode> + '_ {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityCode, &MetricSet)> + '_ {
        self.entries.iter()
    }

    /// Codes holding at least one metric, in first-merged order.
    pub fn match_set(&self) -> MatchSet {
        self.merge_order
            .iter()
            .filter(|code| self.entries.get(*code).is_some_and(|m| !m.is_empty()))
            .cloned()
            .collect()
    }
}

/// Resets every entity of `existing` and merges `records` into it.
///
/// - Records without an entity code are skipped.
/// - Records for codes outside `existing` are skipped; the key set never changes.
/// - A missing metric name falls back to [`DEFAULT_METRIC`].
/// - Duplicate `(code, metric)` pairs: last write wins.
pub fn normalize(existing: &EntityMetrics, records: &[MetricRecord]) -> EntityMetrics {
    let mut out = EntityMetrics {
        entries: existing
            .entries
            .keys()
            .map(|code| (code.clone(), MetricSet::new()))
            .collect(),
        merge_order: Vec::new(),
    };

    let mut skipped = 0usize;
    for record in records {
        let Some(code) = record.entity_code.as_deref() else {
            skipped += 1;
            continue;
        };
        let metric = record.metric.as_deref().unwrap_or(DEFAULT_METRIC);
        let Some(metrics) = out.entries.get_mut(code) else {
            tracing::warn!(entity = code, "record for unknown entity skipped");
            skipped += 1;
            continue;
        };
        // Every entry starts empty, so empty means untouched in this batch.
        if metrics.is_empty() {
            out.merge_order.push(EntityCode::from(code));
        }
        metrics.insert(metric.to_string(), record.value.clone());
    }

    tracing::debug!(
        records = records.len(),
        skipped,
        matched = out.merge_order.len(),
        "metrics normalized"
    );
    out
}

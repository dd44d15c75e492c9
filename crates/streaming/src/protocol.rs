//! Wire format of the metrics API.
//!
//! Every question endpoint answers `GET` with
//! `{ "data": [ { "region"?, "country"?, "metric"?, "value" } ] }`.
//! Which of `region` / `country` carries the entity code depends on the
//! question target.

use foundation::EntityKind;
use serde::{Deserialize, Serialize};

/// Metric value as sent by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            MetricValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Number(v) => write!(f, "{v}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// One row of `data` exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub data: Option<Vec<WireRecord>>,
}

/// Decoded record with the entity code picked for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub entity_code: Option<String>,
    pub metric: Option<String>,
    pub value: MetricValue,
}

impl MetricRecord {
    pub fn new(entity_code: impl Into<String>, metric: impl Into<String>, value: MetricValue) -> Self {
        Self {
            entity_code: Some(entity_code.into()),
            metric: Some(metric.into()),
            value,
        }
    }

    pub fn from_wire(wire: WireRecord, target: EntityKind) -> Self {
        let entity_code = match target {
            EntityKind::Region => wire.region,
            EntityKind::Country => wire.country,
        };
        Self {
            entity_code,
            metric: wire.metric,
            value: wire.value,
        }
    }
}

#[derive(Debug)]
pub enum ProtocolError {
    Json(serde_json::Error),
    MissingData,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Json(err) => write!(f, "response is not valid JSON: {err}"),
            ProtocolError::MissingData => write!(f, "response has no `data` field"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Json(err) => Some(err),
            ProtocolError::MissingData => None,
        }
    }
}

/// Decodes a response body into records for `target`.
///
/// A body without `data` (or with `"data": null`) is rejected; an empty
/// array is a valid, empty answer.
pub fn decode_response(body: &str, target: EntityKind) -> Result<Vec<MetricRecord>, ProtocolError> {
    let response: MetricsResponse = serde_json::from_str(body).map_err(ProtocolError::Json)?;
    let rows = response.data.ok_or(ProtocolError::MissingData)?;
    tracing::debug!(rows = rows.len(), %target, "decoded metrics response");
    Ok(rows
        .into_iter()
        .map(|row| MetricRecord::from_wire(row, target))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{MetricValue, ProtocolError, decode_response};
    use foundation::EntityKind;

    #[test]
    fn decodes_country_rows() {
        let body = r#"{"data": [
            {"country": "USA", "metric": "score", "value": 10},
            {"country": "CAN", "value": "5.5"},
            {"region": "Europe", "metric": "gdp", "value": 1}
        ]}"#;
        let records = decode_response(body, EntityKind::Country).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].entity_code.as_deref(), Some("USA"));
        assert_eq!(records[0].value, MetricValue::Number(10.0));
        assert_eq!(records[1].metric, None);
        assert_eq!(records[1].value.as_f64(), Some(5.5));
        // Region-only rows carry no country code.
        assert_eq!(records[2].entity_code, None);
    }

    #[test]
    fn decodes_region_rows() {
        let body = r#"{"data": [{"region": "Europe", "metric": "gdp", "value": 1}]}"#;
        let records = decode_response(body, EntityKind::Region).unwrap();
        assert_eq!(records[0].entity_code.as_deref(), Some("Europe"));
        assert_eq!(records[0].metric.as_deref(), Some("gdp"));
    }

    #[test]
    fn missing_or_null_data_is_rejected() {
        assert!(matches!(
            decode_response("{}", EntityKind::Country),
            Err(ProtocolError::MissingData)
        ));
        assert!(matches!(
            decode_response(r#"{"data": null}"#, EntityKind::Country),
            Err(ProtocolError::MissingData)
        ));
        assert!(matches!(
            decode_response("<html>", EntityKind::Country),
            Err(ProtocolError::Json(_))
        ));
        assert!(decode_response(r#"{"data": []}"#, EntityKind::Country)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn text_values_render_verbatim() {
        assert_eq!(MetricValue::Text("high".into()).to_string(), "high");
        assert_eq!(MetricValue::Text("high".into()).as_f64(), None);
        assert_eq!(MetricValue::Number(2.5).to_string(), "2.5");
    }
}

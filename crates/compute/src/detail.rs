use foundation::EntityCode;

use crate::normalize::EntityMetrics;

/// Fields never shown in the country detail panel.
pub const HIDDEN_DETAIL_FIELDS: [&str; 2] = ["iso2", "coordinates"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryDetail {
    pub code: EntityCode,
    /// `(field, rendered value)` in field-name order.
    pub fields: Vec<(String, String)>,
}

pub fn country_detail(metrics: &EntityMetrics, code: &str) -> Option<CountryDetail> {
    let set = metrics.get(code)?;
    let fields = set
        .iter()
        .filter(|(name, _)| !HIDDEN_DETAIL_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect();
    Some(CountryDetail {
        code: EntityCode::from(code),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::country_detail;
    use crate::normalize::{EntityMetrics, normalize};
    use pretty_assertions::assert_eq;
    use streaming::{MetricRecord, MetricValue};

    #[test]
    fn hides_internal_fields() {
        let metrics = normalize(
            &EntityMetrics::seeded(["FRA"]),
            &[
                MetricRecord::new("FRA", "iso2", MetricValue::Text("FR".into())),
                MetricRecord::new("FRA", "coordinates", MetricValue::Text("2,46".into())),
                MetricRecord::new("FRA", "score", MetricValue::Number(71.5)),
                MetricRecord::new("FRA", "currency", MetricValue::Text("EUR".into())),
            ],
        );
        let detail = country_detail(&metrics, "FRA").unwrap();
        assert_eq!(
            detail.fields,
            vec![
                ("currency".to_string(), "EUR".to_string()),
                ("score".to_string(), "71.5".to_string()),
            ]
        );
        assert!(country_detail(&metrics, "DEU").is_none());
    }
}

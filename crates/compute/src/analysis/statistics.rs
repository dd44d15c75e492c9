use crate::normalize::EntityMetrics;

pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for &v in values {
            sum += v;
        }
        Some(sum / values.len() as f64)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }
}

/// Legend range of one metric across all entities.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summarizes the numeric values of `metric`; text values that do not parse
/// as numbers are ignored.
pub fn summarize_metric(metrics: &EntityMetrics, metric: &str) -> Option<MetricSummary> {
    let values: Vec<f64> = metrics
        .iter()
        .filter_map(|(_, set)| set.get(metric))
        .filter_map(|v| v.as_f64())
        .filter(|v| v.is_finite())
        .collect();
    let (min, max) = Statistics::min_max(&values)?;
    let mean = Statistics::mean(&values)?;
    Some(MetricSummary {
        count: values.len(),
        min,
        max,
        mean,
    })
}

#[cfg(test)]
mod tests {
    use super::{Statistics, summarize_metric};
    use crate::normalize::{EntityMetrics, normalize};
    use streaming::{MetricRecord, MetricValue};

    #[test]
    fn mean_works() {
        let m = Statistics::mean(&[1.0, 2.0, 3.0]).unwrap();
        assert!((m - 2.0).abs() < 1e-9);
        assert_eq!(Statistics::mean(&[]), None);
        assert_eq!(Statistics::min_max(&[3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    }

    #[test]
    fn summarizes_numeric_values_only() {
        let seeded = EntityMetrics::seeded(["A", "B", "C", "D"]);
        let metrics = normalize(
            &seeded,
            &[
                MetricRecord::new("A", "gdp", MetricValue::Number(2.0)),
                MetricRecord::new("B", "gdp", MetricValue::Text("4".into())),
                MetricRecord::new("C", "gdp", MetricValue::Text("n/a".into())),
                MetricRecord::new("D", "pop", MetricValue::Number(100.0)),
            ],
        );
        let s = summarize_metric(&metrics, "gdp").unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 4.0);
        assert!((s.mean - 3.0).abs() < 1e-9);
        assert!(summarize_metric(&metrics, "missing").is_none());
    }
}

use foundation::EntityKind;
use serde::Serialize;

/// A canned analytical question offered in the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub label: &'static str,
    /// Path appended to the API base URL.
    pub endpoint: &'static str,
    #[serde(serialize_with = "serialize_target")]
    pub target: EntityKind,
}

fn serialize_target<S: serde::Serializer>(target: &EntityKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(target.as_str())
}

pub const QUESTIONS: [Question; 6] = [
    Question {
        id: "region-emissions",
        label: "Which regions emit the most CO2 per capita?",
        endpoint: "/questions/region-emissions",
        target: EntityKind::Region,
    },
    Question {
        id: "region-renewables",
        label: "Which regions lead in renewable energy share?",
        endpoint: "/questions/region-renewables",
        target: EntityKind::Region,
    },
    Question {
        id: "region-poverty",
        label: "Where is extreme poverty concentrated?",
        endpoint: "/questions/region-poverty",
        target: EntityKind::Region,
    },
    Question {
        id: "country-electricity",
        label: "Which countries have the lowest access to electricity?",
        endpoint: "/questions/country-electricity",
        target: EntityKind::Country,
    },
    Question {
        id: "country-forest-loss",
        label: "Which countries lost the most forest area?",
        endpoint: "/questions/country-forest-loss",
        target: EntityKind::Country,
    },
    Question {
        id: "country-sdg-score",
        label: "Top countries by overall SDG score",
        endpoint: "/questions/country-sdg-score",
        target: EntityKind::Country,
    },
];

pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

#[cfg(test)]
mod tests {
    use super::{QUESTIONS, find_question};
    use foundation::EntityKind;
    use std::collections::HashSet;

    #[test]
    fn ids_and_endpoints_are_unique() {
        let ids: HashSet<_> = QUESTIONS.iter().map(|q| q.id).collect();
        let endpoints: HashSet<_> = QUESTIONS.iter().map(|q| q.endpoint).collect();
        assert_eq!(ids.len(), QUESTIONS.len());
        assert_eq!(endpoints.len(), QUESTIONS.len());
        assert!(QUESTIONS.iter().all(|q| q.endpoint.starts_with('/')));
    }

    #[test]
    fn both_targets_are_covered() {
        assert!(QUESTIONS.iter().any(|q| q.target == EntityKind::Region));
        assert!(QUESTIONS.iter().any(|q| q.target == EntityKind::Country));
    }

    #[test]
    fn lookup_and_serialize() {
        let q = find_question("country-sdg-score").unwrap();
        assert_eq!(q.target, EntityKind::Country);
        assert!(find_question("nope").is_none());

        let json = serde_json::to_value(q).unwrap();
        assert_eq!(json["target"], "country");
        assert_eq!(json["endpoint"], "/questions/country-sdg-score");
    }
}

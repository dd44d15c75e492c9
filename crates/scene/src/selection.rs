use std::collections::HashSet;

use foundation::EntityCode;

/// Deterministic match set.
///
/// Ordering contract:
/// - Iteration yields codes in first-insertion order; re-inserting an existing
///   code keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    order: Vec<EntityCode>,
    members: HashSet<EntityCode>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.members.contains(code)
    }

    /// Inserts `code` into the set.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, code: impl Into<EntityCode>) -> bool {
        let code = code.into();
        if self.members.contains(&code) {
            return false;
        }
        self.members.insert(code.clone());
        self.order.push(code);
        true
    }

    /// 0-based insertion rank of `code`.
    pub fn position(&self, code: &str) -> Option<usize> {
        if !self.contains(code) {
            return None;
        }
        self.order.iter().position(|c| c.as_str() == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityCode> + '_ {
        self.order.iter()
    }

    /// Maps each member through `f`, dropping `None`s; order is preserved.
    pub fn filter_map<F>(&self, mut f: F) -> MatchSet
    where
        F: FnMut(&EntityCode) -> Option<EntityCode>,
    {
        let mut out = MatchSet::new();
        for code in &self.order {
            if let Some(mapped) = f(code) {
                out.insert(mapped);
            }
        }
        out
    }
}

impl<C: Into<EntityCode>> FromIterator<C> for MatchSet {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut out = MatchSet::new();
        for code in iter {
            out.insert(code);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::MatchSet;

    #[test]
    fn insert_contains_and_len() {
        let mut s = MatchSet::new();
        assert!(s.is_empty());
        assert!(s.insert("USA"));
        assert!(!s.insert("USA"));
        assert!(s.contains("USA"));
        assert!(!s.contains("CAN"));
        assert_eq!(s.len(), 1);
        s.clear();
        assert!(s.is_empty());
        assert!(!s.contains("USA"));
    }

    #[test]
    fn iter_follows_first_insertion() {
        let s: MatchSet = ["USA", "CAN", "USA", "MEX"].into_iter().collect();
        let got: Vec<&str> = s.iter().map(|c| c.as_str()).collect();
        assert_eq!(got, vec!["USA", "CAN", "MEX"]);
        assert_eq!(s.position("CAN"), Some(1));
        assert_eq!(s.position("BRA"), None);
    }

    #[test]
    fn filter_map_keeps_order() {
        let s: MatchSet = ["Europe", "Nowhere", "Asia"].into_iter().collect();
        let slugs = s.filter_map(|c| match c.as_str() {
            "Europe" => Some("europe".into()),
            "Asia" => Some("asia".into()),
            _ => None,
        });
        let got: Vec<&str> = slugs.iter().map(|c| c.as_str()).collect();
        assert_eq!(got, vec!["europe", "asia"]);
    }
}

use std::fmt;

/// Join key between metrics and rendered geography.
///
/// Country codes are ISO-3166 alpha-3 (`"USA"`); region codes are either the
/// region name (metrics side) or its slug (marker side).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityCode(String);

impl EntityCode {
    pub fn new(code: impl Into<String>) -> Self {
        EntityCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityCode {
    fn from(s: &str) -> Self {
        EntityCode(s.to_string())
    }
}

impl From<String> for EntityCode {
    fn from(s: String) -> Self {
        EntityCode(s)
    }
}

impl std::borrow::Borrow<str> for EntityCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which family of geography an entity code belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Region,
    Country,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Region => "region",
            EntityKind::Country => "country",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

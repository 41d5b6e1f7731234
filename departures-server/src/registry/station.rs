//! Station table entries.

use serde::{Deserialize, Serialize};

/// A station the portal publishes departures for.
///
/// The portal addresses each station page as `<code>-<slug>`, e.g.
/// `13106-llodio`. The slug is opaque: it is used exactly as given, accents
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    /// Numeric-looking station code, e.g. "13106".
    pub code: String,

    /// URL path slug used by the portal, e.g. "llodio".
    pub slug: String,

    /// Human-readable name. Falls back to the slug when absent.
    #[serde(default)]
    pub name: String,
}

impl StationEntry {
    /// Create a new station entry.
    pub fn new(code: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            slug: slug.into(),
            name: name.into(),
        }
    }

    /// The last path segment of the station page, `<code>-<slug>`.
    pub fn page_path(&self) -> String {
        format!("{}-{}", self.code, self.slug)
    }

    /// The name to show to people.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.slug
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_path_joins_code_and_slug() {
        let station = StationEntry::new("13106", "llodio", "Llodio");
        assert_eq!(station.page_path(), "13106-llodio");
    }

    #[test]
    fn page_path_keeps_accents() {
        let station = StationEntry::new("70100", "vicálvaro", "Vicálvaro");
        assert_eq!(station.page_path(), "70100-vicálvaro");
    }

    #[test]
    fn display_name_falls_back_to_slug() {
        let station = StationEntry::new("13106", "llodio", "");
        assert_eq!(station.display_name(), "llodio");

        let station = StationEntry::new("13106", "llodio", "Llodio");
        assert_eq!(station.display_name(), "Llodio");
    }
}

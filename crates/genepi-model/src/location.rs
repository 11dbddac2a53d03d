//! Collection locations and free-text lookup against a vocabulary.

use serde::{Deserialize, Serialize};

/// Trailing qualifiers ignored when matching free text.
const QUALIFIERS: &[&str] = &["county", "city", "parish", "borough", "province", "state"];

/// A canonical location from the controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub region: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Location {
    /// Components from broadest to most specific.
    pub fn components(&self) -> Vec<&str> {
        let mut parts = vec![self.region.as_str()];
        for part in [&self.country, &self.division, &self.location]
            .into_iter()
            .flatten()
        {
            parts.push(part.as_str());
        }
        parts
    }

    /// Most specific component, as shown in tables.
    pub fn name(&self) -> &str {
        self.components().last().copied().unwrap_or_default()
    }

    /// `Region/Country/Division/Location`.
    pub fn path(&self) -> String {
        self.components().join("/")
    }

    /// True if `raw` already spells this location canonically.
    pub fn is_exact_match(&self, raw: &str) -> bool {
        let raw = raw.trim();
        raw == self.name() || raw == self.path()
    }
}

/// Resolves free-text location strings to a canonical [`Location`].
pub trait StringToLocationFinder {
    fn find(&self, query: &str) -> Option<Location>;
}

/// An in-memory vocabulary of named locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationVocabulary {
    locations: Vec<Location>,
}

impl LocationVocabulary {
    pub fn new(mut locations: Vec<Location>) -> Self {
        locations.sort_by_key(|location| location.id);
        Self { locations }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    fn find_exact(&self, normalized: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|location| normalize(location.name()) == normalized)
            .or_else(|| {
                self.locations
                    .iter()
                    .find(|location| normalize(&location.path()) == normalized)
            })
    }

    fn find_by_parts(&self, parts: &[String]) -> Option<&Location> {
        // Fewest components wins: "california" should be the division, not
        // every county inside it.
        self.locations
            .iter()
            .filter(|location| {
                let components: Vec<String> = location
                    .components()
                    .into_iter()
                    .map(|component| strip_qualifier(&normalize(component)))
                    .collect();
                components
                    .last()
                    .is_some_and(|last| parts.iter().any(|part| part == last))
                    && parts.iter().all(|part| components.contains(part))
            })
            .min_by_key(|location| (location.components().len(), location.id))
    }
}

impl FromIterator<Location> for LocationVocabulary {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl StringToLocationFinder for LocationVocabulary {
    fn find(&self, query: &str) -> Option<Location> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return None;
        }
        if let Some(location) = self.find_exact(&normalized) {
            return Some(location.clone());
        }
        let parts: Vec<String> = normalized
            .split([',', '/'])
            .map(|part| strip_qualifier(part.trim()))
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            return None;
        }
        self.find_by_parts(&parts).cloned()
    }
}

impl<T: StringToLocationFinder + ?Sized> StringToLocationFinder for &T {
    fn find(&self, query: &str) -> Option<Location> {
        (**self).find(query)
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn strip_qualifier(value: &str) -> String {
    for qualifier in QUALIFIERS {
        if let Some(stripped) = value.strip_suffix(qualifier)
            && let Some(stripped) = stripped.strip_suffix(' ')
        {
            return stripped.trim().to_string();
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county(id: i64, division: &str, name: &str) -> Location {
        Location {
            id,
            region: "North America".to_string(),
            country: Some("USA".to_string()),
            division: Some(division.to_string()),
            location: Some(name.to_string()),
        }
    }

    #[test]
    fn strips_trailing_qualifier_only() {
        assert_eq!(strip_qualifier("san mateo county"), "san mateo");
        assert_eq!(strip_qualifier("county"), "county");
        assert_eq!(strip_qualifier("new york city"), "new york");
    }

    #[test]
    fn prefers_least_specific_covering_location() {
        let vocabulary = LocationVocabulary::new(vec![
            county(2, "California", "San Mateo County"),
            Location {
                id: 1,
                region: "North America".to_string(),
                country: Some("USA".to_string()),
                division: Some("California".to_string()),
                location: None,
            },
        ]);
        let found = vocabulary.find("california, usa").expect("division");
        assert_eq!(found.id, 1);
    }
}

//! Station and traffic-type lookup tables.
//!
//! The portal only serves the stations we know the URL slug for, so the
//! station set is a fixed table. The table is built once at startup (either
//! the compiled-in defaults or a JSON file) and shared read-only afterwards.

mod error;
mod station;
mod traffic;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use serde::Deserialize;

pub use error::{RegistryError, RegistryLoadError};
pub use station::StationEntry;
pub use traffic::TrafficType;

/// On-disk shape of a registry table.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    stations: Vec<StationEntry>,
    traffic_types: Vec<TrafficType>,
}

/// Immutable station and traffic-type tables.
#[derive(Debug, Clone)]
pub struct Registry {
    stations: BTreeMap<String, StationEntry>,
    traffic_types: BTreeMap<String, TrafficType>,
}

impl Registry {
    /// Build a registry, rejecting duplicate keys and empty fields.
    pub fn new(
        stations: Vec<StationEntry>,
        traffic_types: Vec<TrafficType>,
    ) -> Result<Self, RegistryLoadError> {
        let mut station_map = BTreeMap::new();
        for station in stations {
            require("station code", &station.code, &station.code)?;
            require("slug", &station.slug, &station.code)?;
            match station_map.entry(station.code.clone()) {
                Entry::Occupied(_) => {
                    return Err(RegistryLoadError::DuplicateStation { code: station.code });
                }
                Entry::Vacant(slot) => {
                    slot.insert(station);
                }
            }
        }

        let mut traffic_map = BTreeMap::new();
        for traffic in traffic_types {
            require("traffic key", &traffic.key, &traffic.key)?;
            require("traffic value", &traffic.value, &traffic.key)?;
            match traffic_map.entry(traffic.key.clone()) {
                Entry::Occupied(_) => {
                    return Err(RegistryLoadError::DuplicateTrafficType { key: traffic.key });
                }
                Entry::Vacant(slot) => {
                    slot.insert(traffic);
                }
            }
        }

        Ok(Self {
            stations: station_map,
            traffic_types: traffic_map,
        })
    }

    /// The compiled-in table.
    pub fn builtin() -> Self {
        let stations = [
            ("13106", "llodio", "Llodio"),
            ("70100", "vicálvaro", "Vicálvaro"),
        ]
        .into_iter()
        .map(|(code, slug, name)| (code.to_string(), StationEntry::new(code, slug, name)))
        .collect();

        let traffic_types = [
            ("1", "Todos", "all"),
            ("2", "Cercanías", "cercanias"),
            ("3", "AV/LD/MD", "avldmd"),
            ("4", "Mercancías", "m"),
            ("5", "Sin Parada", "sp"),
            ("6", "Sin Parada2", "sinparada"),
        ]
        .into_iter()
        .map(|(key, name, value)| (key.to_string(), TrafficType::new(key, name, value)))
        .collect();

        Self {
            stations,
            traffic_types,
        }
    }

    /// Parse a registry from its JSON representation.
    ///
    /// ```
    /// use departures_server::registry::Registry;
    ///
    /// let registry = Registry::from_json_str(r#"{
    ///     "stations": [{"code": "13106", "slug": "llodio", "name": "Llodio"}],
    ///     "traffic_types": [{"key": "1", "name": "Todos", "value": "all"}]
    /// }"#).unwrap();
    /// assert_eq!(registry.resolve_station("13106").unwrap().slug, "llodio");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, RegistryLoadError> {
        let file: RegistryFile =
            serde_json::from_str(json).map_err(|e| RegistryLoadError::Json {
                message: e.to_string(),
            })?;
        Self::new(file.stations, file.traffic_types)
    }

    /// Load a registry from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a station by code.
    pub fn resolve_station(&self, code: &str) -> Result<&StationEntry, RegistryError> {
        self.stations
            .get(code)
            .ok_or_else(|| RegistryError::UnknownStation {
                code: code.to_string(),
            })
    }

    /// Look up a traffic type by its front-end key.
    pub fn resolve_traffic(&self, key: &str) -> Result<&TrafficType, RegistryError> {
        self.traffic_types
            .get(key)
            .ok_or_else(|| RegistryError::UnknownTrafficType {
                key: key.to_string(),
            })
    }

    /// All stations, ordered by code.
    pub fn stations(&self) -> impl Iterator<Item = &StationEntry> {
        self.stations.values()
    }

    /// All traffic types, ordered by key.
    pub fn traffic_types(&self) -> impl Iterator<Item = &TrafficType> {
        self.traffic_types.values()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn require(field: &'static str, value: &str, entry: &str) -> Result<(), RegistryLoadError> {
    if value.trim().is_empty() {
        return Err(RegistryLoadError::EmptyField {
            field,
            entry: entry.to_string(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any code outside the table is reported as unknown, with the code echoed back.
        #[test]
        fn absent_station_not_found(code in "[0-9]{1,6}|[a-z]{1,8}") {
            let registry = Registry::builtin();
            prop_assume!(code != "13106" && code != "70100");
            prop_assert_eq!(
                registry.resolve_station(&code),
                Err(RegistryError::UnknownStation { code: code.clone() })
            );
        }

        /// Traffic keys are looked up exactly.
        #[test]
        fn absent_traffic_not_found(key in "[0-9]{2,4}|[a-z]{1,6}") {
            let registry = Registry::builtin();
            prop_assert!(registry.resolve_traffic(&key).is_err());
        }
    }
}

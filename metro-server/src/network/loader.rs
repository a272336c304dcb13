//! JSON station dataset loader.
//!
//! The dataset is a single JSON object keyed by station identifier:
//!
//! ```json
//! {
//!   "pantitlan": {
//!     "lineas": ["01", "05", "09", "A"],
//!     "transbordos": [{ "lineas": ["01", "09"], "distancia": 0.35 }],
//!     "ubicacion": { "01": { "latitud": 19.4153, "longitud": -99.0720 } },
//!     "conexiones": [{ "estacion": "zaragoza", "distancia": 1.32, "linea": "01" }],
//!     "afluencia_promedio": { "01": 41250 },
//!     "nombre_original": "Pantitlán",
//!     "abierta": true
//!   }
//! }
//! ```
//!
//! Object order matters: the first `ubicacion` entry is a station's default
//! anchor point, so maps are read in document order.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use tracing::info;

use crate::domain::{Coordinates, Line, Station, StationId};

use super::{Network, NetworkError};

/// JSON object entries in document order. Repeated keys are all kept, so
/// duplicates can be rejected later.
struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct RawStation {
    #[serde(default, rename = "lineas")]
    lines: Vec<String>,
    #[serde(default, rename = "transbordos")]
    transfers: Vec<RawTransfer>,
    #[serde(default, rename = "ubicacion")]
    anchors: OrderedMap<RawLocation>,
    #[serde(default, rename = "conexiones")]
    connections: Vec<RawConnection>,
    #[serde(default, rename = "afluencia_promedio")]
    loads: OrderedMap<u64>,
    #[serde(default, rename = "nombre_original")]
    display_name: Option<String>,
    #[serde(default = "default_open", rename = "abierta")]
    is_open: bool,
}

fn default_open() -> bool {
    true
}

#[derive(Deserialize)]
struct RawTransfer {
    #[serde(rename = "lineas")]
    lines: Vec<String>,
    #[serde(rename = "distancia")]
    distance_km: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    #[serde(rename = "latitud")]
    latitude: f64,
    #[serde(rename = "longitud")]
    longitude: f64,
}

#[derive(Deserialize)]
struct RawConnection {
    #[serde(rename = "estacion")]
    target: String,
    #[serde(rename = "distancia")]
    distance_km: f64,
    #[serde(rename = "linea")]
    line: String,
}

/// Load a network from a dataset file.
pub fn load_network(path: impl AsRef<Path>) -> Result<Network, NetworkError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let network = parse_network(&contents)?;
    info!(
        path = %path.display(),
        stations = network.len(),
        max_crowd_load = network.max_crowd_load(),
        "loaded metro network"
    );
    Ok(network)
}

/// Parse a network from dataset JSON.
pub fn parse_network(json: &str) -> Result<Network, NetworkError> {
    let raw: OrderedMap<RawStation> = serde_json::from_str(json)?;

    let stations = raw
        .0
        .into_iter()
        .map(|(key, raw)| convert_station(key, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Network::from_stations(stations)
}

fn convert_station(key: String, raw: RawStation) -> Result<Station, NetworkError> {
    let id = StationId::new(key.clone())
        .map_err(|source| NetworkError::InvalidStationId { key, source })?;

    let line = |code: &str| {
        Line::parse_normalized(code).map_err(|source| NetworkError::InvalidLine {
            station: id.clone(),
            source,
        })
    };

    let mut builder = Station::builder(id.clone()).open(raw.is_open);

    if let Some(name) = raw.display_name.filter(|n| !n.trim().is_empty()) {
        builder = builder.display_name(name);
    }

    for code in &raw.lines {
        builder = builder.line(line(code)?);
    }

    for (code, location) in &raw.anchors.0 {
        let coordinates = Coordinates::new(location.latitude, location.longitude).map_err(
            |source| NetworkError::InvalidCoordinates {
                station: id.clone(),
                source,
            },
        )?;
        builder = builder.anchor(line(code)?, coordinates);
    }

    for connection in &raw.connections {
        let target = StationId::new(connection.target.clone()).map_err(|source| {
            NetworkError::InvalidStationId {
                key: connection.target.clone(),
                source,
            }
        })?;
        builder = builder.connection(target, line(&connection.line)?, connection.distance_km);
    }

    for transfer in &raw.transfers {
        let lines = transfer
            .lines
            .iter()
            .map(|code| line(code))
            .collect::<Result<Vec<_>, _>>()?;
        builder = builder.transfer(lines, transfer.distance_km);
    }

    for (code, average) in &raw.loads.0 {
        builder = builder.load(line(code)?, *average);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "pantitlan": {
            "lineas": ["01", "9", "A"],
            "transbordos": [{ "lineas": ["01", "09"], "distancia": 0.35 }],
            "ubicacion": {
                "A":  { "latitud": 19.4160, "longitud": -99.0740 },
                "01": { "latitud": 19.4153, "longitud": -99.0720 },
                "09": { "latitud": 19.4150, "longitud": -99.0725 }
            },
            "conexiones": [
                { "estacion": "zaragoza", "distancia": 1.32, "linea": "01" },
                { "estacion": "puebla", "distancia": 1.38, "linea": "09" }
            ],
            "afluencia_promedio": { "01": 41250, "09": 30000 },
            "nombre_original": "Pantitlán"
        },
        "zaragoza": {
            "lineas": ["01"],
            "ubicacion": { "01": { "latitud": 19.4117, "longitud": -99.0824 } },
            "conexiones": [{ "estacion": "pantitlan", "distancia": 1.32, "linea": "1" }],
            "afluencia_promedio": { "01": 18000 },
            "abierta": false
        }
    }"#;

    fn id(s: &str) -> StationId {
        StationId::new(s).unwrap()
    }

    #[test]
    fn parses_sample_dataset() {
        let network = parse_network(SAMPLE).unwrap();
        assert_eq!(network.len(), 2);

        let pantitlan = network.station(&id("pantitlan")).unwrap();
        assert_eq!(pantitlan.display_name(), Some("Pantitlán"));
        assert_eq!(pantitlan.lines(), &[Line::L1, Line::L9, Line::A]);
        assert_eq!(pantitlan.connections().len(), 2);
        assert_eq!(pantitlan.transfer_distance(Line::L9, Line::L1), Some(0.35));
        assert_eq!(pantitlan.load_on(Line::L9), Some(30_000));
        assert!(pantitlan.is_open());

        let zaragoza = network.station(&id("zaragoza")).unwrap();
        assert!(!zaragoza.is_open());
        assert_eq!(zaragoza.display_name(), None);
        assert_eq!(zaragoza.connections()[0].line, Line::L1);
    }

    #[test]
    fn preserves_document_order() {
        let network = parse_network(SAMPLE).unwrap();

        let order: Vec<_> = network.stations().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(order, vec!["pantitlan", "zaragoza"]);

        // "A" is listed first, so it is the default anchor.
        let pantitlan = network.station(&id("pantitlan")).unwrap();
        let anchor_lines: Vec<_> = pantitlan.anchors().iter().map(|a| a.line).collect();
        assert_eq!(anchor_lines, vec![Line::A, Line::L1, Line::L9]);
        assert_eq!(
            pantitlan.first_anchor(),
            pantitlan.anchor_for(Line::A)
        );
    }

    #[test]
    fn computes_max_crowd_load() {
        let network = parse_network(SAMPLE).unwrap();
        assert_eq!(network.max_crowd_load(), 41_250);
    }

    #[test]
    fn accepts_dangling_targets() {
        let json = r#"{
            "a": { "lineas": ["02"], "conexiones": [{ "estacion": "ghost", "distancia": 1.0, "linea": "02" }] }
        }"#;
        let network = parse_network(json).unwrap();
        assert_eq!(network.dangling_connections().count(), 1);
    }

    #[test]
    fn rejects_unknown_line() {
        let json = r#"{ "a": { "lineas": ["13"] } }"#;
        let err = parse_network(json).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidLine { .. }), "{err}");
    }

    #[test]
    fn rejects_bad_coordinates() {
        let json = r#"{ "a": { "ubicacion": { "01": { "latitud": 120.0, "longitud": 0.0 } } } }"#;
        let err = parse_network(json).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidCoordinates { .. }), "{err}");
    }

    #[test]
    fn rejects_negative_distance() {
        let json = r#"{
            "a": { "conexiones": [{ "estacion": "b", "distancia": -2.0, "linea": "01" }] }
        }"#;
        let err = parse_network(json).unwrap_err();
        assert!(matches!(err, NetworkError::Domain(_)), "{err}");
    }

    #[test]
    fn rejects_duplicate_keys() {
        let json = r#"{ "a": {}, "a": {} }"#;
        let err = parse_network(json).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateStation(_)), "{err}");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_network("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, NetworkError::Json(_)), "{err}");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let network = load_network(file.path()).unwrap();
        assert_eq!(network.len(), 2);
    }

    #[test]
    fn bundled_dataset_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/stations.json");
        let network = load_network(path).unwrap();
        assert_eq!(network.len(), 7);
        assert_eq!(network.dangling_connections().count(), 0);
        assert_eq!(network.max_crowd_load(), 41_250);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_network(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }), "{err}");
    }
}

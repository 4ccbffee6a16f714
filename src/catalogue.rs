//! Flight records and the deduplicated point catalogue built from them.

use crate::colors::{parse_rgb, Rgb, Rgba};
use crate::error::GlobeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const BUNDLED_FLIGHTS: &str = include_str!("../assets/flights.json");

/// One flight between two airports. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlightArc {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub arc_alt: f64,
    pub order: i64,
    pub color: Rgb,
    pub from: String,
    pub to: String,
}

/// A labeled endpoint on the globe
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub order: i64,
    pub rgb: Rgb,
    pub size: f64,
}

impl GeoPoint {
    fn endpoint(lat: f64, lng: f64, label: &str, arc: &FlightArc) -> Self {
        Self {
            lat,
            lng,
            label: label.to_string(),
            order: arc.order,
            rgb: arc.color,
            size: 1.0,
        }
    }

    fn same_coords(&self, other: &GeoPoint) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }
}

/// Color at fade fraction `t`: `rgb` with alpha `1 - t`.
pub fn fade_color(rgb: Rgb, t: f64) -> Rgba {
    rgb.with_alpha(1.0 - t.clamp(0.0, 1.0))
}

/// Build the point catalogue: two endpoints per arc, first occurrence of
/// each exact (lat, lng) pair kept, discovery order preserved.
pub fn build(arcs: &[FlightArc]) -> Vec<GeoPoint> {
    let mut points: Vec<GeoPoint> = Vec::with_capacity(arcs.len() * 2);

    for arc in arcs {
        let origin = GeoPoint::endpoint(arc.start_lat, arc.start_lng, &arc.from, arc);
        let destination = GeoPoint::endpoint(arc.end_lat, arc.end_lng, &arc.to, arc);

        for candidate in [origin, destination] {
            if !points.iter().any(|p| p.same_coords(&candidate)) {
                points.push(candidate);
            }
        }
    }

    points
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Deserialize)]
struct FlightFile {
    flights: Vec<FlightRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightRecord {
    start_lat: f64,
    start_lng: f64,
    end_lat: f64,
    end_lng: f64,
    #[serde(default)]
    arc_alt: f64,
    #[serde(default)]
    order: i64,
    color: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

/// Parse a `{ "flights": [...] }` document
pub fn parse_flights(json: &str) -> Result<Vec<FlightArc>, GlobeError> {
    let file: FlightFile = serde_json::from_str(json)?;

    file.flights
        .into_iter()
        .enumerate()
        .map(|(index, rec)| {
            let color = parse_rgb(&rec.color).ok_or_else(|| GlobeError::FlightColor {
                index,
                color: rec.color.clone(),
            })?;
            Ok(FlightArc {
                start_lat: rec.start_lat,
                start_lng: rec.start_lng,
                end_lat: rec.end_lat,
                end_lng: rec.end_lng,
                arc_alt: rec.arc_alt,
                order: rec.order,
                color,
                from: rec.from,
                to: rec.to,
            })
        })
        .collect()
}

/// Load flights from a local JSON file
pub fn load_flights(path: &Path) -> Result<Vec<FlightArc>, GlobeError> {
    let content = fs::read_to_string(path).map_err(|source| GlobeError::FlightsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let flights = parse_flights(&content)?;
    tracing::info!(path = %path.display(), count = flights.len(), "loaded flights");
    Ok(flights)
}

/// The dataset compiled into the binary
pub fn bundled_flights() -> Vec<FlightArc> {
    match parse_flights(BUNDLED_FLIGHTS) {
        Ok(flights) => flights,
        Err(err) => {
            tracing::error!(error = %err, "bundled flight data is invalid");
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) fn arc(start: (f64, f64), end: (f64, f64), order: i64) -> FlightArc {
    FlightArc {
        start_lat: start.0,
        start_lng: start.1,
        end_lat: end.0,
        end_lng: end.1,
        arc_alt: 0.1,
        order,
        color: Rgb::from_hex(0x06b6d4),
        from: format!("{},{}", start.0, start.1),
        to: format!("{},{}", end.0, end.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HONG_KONG: (f64, f64) = (22.3193, 114.1694);
    const TOKYO: (f64, f64) = (35.6762, 139.6503);
    const SINGAPORE: (f64, f64) = (1.3521, 103.8198);

    #[test]
    fn empty_input_gives_empty_catalogue() {
        assert!(build(&[]).is_empty());
    }

    #[test]
    fn repeated_origin_kept_once_and_first() {
        let arcs = vec![arc(HONG_KONG, TOKYO, 1), arc(HONG_KONG, SINGAPORE, 2)];
        let points = build(&arcs);

        assert_eq!(points.len(), 3);
        assert_eq!((points[0].lat, points[0].lng), HONG_KONG);
        assert_eq!(points[0].order, 1);
        assert_eq!((points[1].lat, points[1].lng), TOKYO);
        assert_eq!((points[2].lat, points[2].lng), SINGAPORE);
    }

    #[test]
    fn output_bounded_and_unique() {
        let arcs = vec![
            arc(HONG_KONG, TOKYO, 1),
            arc(TOKYO, HONG_KONG, 2),
            arc(SINGAPORE, TOKYO, 3),
            arc(SINGAPORE, SINGAPORE, 4),
        ];
        let points = build(&arcs);

        assert!(points.len() <= arcs.len() * 2);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(!a.same_coords(b), "duplicate point {:?}", (a.lat, a.lng));
            }
        }
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn endpoints_take_arc_labels() {
        let mut a = arc(HONG_KONG, TOKYO, 1);
        a.from = "Hong Kong".into();
        a.to = "Tokyo".into();
        let points = build(&[a]);
        assert_eq!(points[0].label, "Hong Kong");
        assert_eq!(points[1].label, "Tokyo");
    }

    #[test]
    fn fade_color_drops_alpha() {
        let points = build(&[arc(HONG_KONG, TOKYO, 1)]);
        assert_eq!(fade_color(points[0].rgb, 0.0).to_string(), "rgba(6, 182, 212, 1)");
        assert_eq!(fade_color(points[0].rgb, 0.75).to_string(), "rgba(6, 182, 212, 0.25)");
        assert_eq!(fade_color(points[0].rgb, 3.0).a, 0.0);
    }

    #[test]
    fn bundled_dataset_dedups() {
        let flights = bundled_flights();
        assert_eq!(flights.len(), 16);
        let points = build(&flights);
        assert_eq!(points.len(), 16);
        assert_eq!(points[0].label, "Hong Kong");
    }

    #[test]
    fn bad_color_reports_index() {
        let json = r#"{"flights":[{"startLat":0,"startLng":0,"endLat":1,"endLng":1,"color":"nope"}]}"#;
        match parse_flights(json) {
            Err(GlobeError::FlightColor { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected color error, got {:?}", other.map(|f| f.len())),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_flights("{"), Err(GlobeError::Json(_))));
    }
}

//! Immutable parameter sets handed to the render engine.
//!
//! Each update re-derives the whole set from the current config; the engine
//! never receives partial changes.

use crate::catalogue::{fade_color, FlightArc, GeoPoint};
use crate::colors::{parse_color, Rgb, Rgba};
use crate::config::{derive, AnimationConfig};
use rand::Rng;
use serde::Serialize;

/// Stroke widths picked per arc
const ARC_STROKES: [f64; 3] = [0.32, 0.28, 0.3];

/// Gap after each dash, in arc lengths
pub const ARC_DASH_GAP: f64 = 15.0;

/// Country outlines and the atmosphere shell
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutlineParams {
    pub hex_polygon_resolution: u32,
    pub hex_polygon_margin: f64,
    pub polygon_color: Rgba,
    pub show_atmosphere: bool,
    pub atmosphere_color: Rgba,
    pub atmosphere_altitude: f64,
}

/// Per-arc draw parameters
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcParams {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub altitude: f64,
    pub color: Rgb,
    pub stroke: f64,
    pub dash_length: f64,
    pub dash_initial_gap: f64,
    pub dash_gap: f64,
    pub dash_animate_time: f64, // ms
}

/// Arcs, points and ring timing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationParams {
    pub arcs: Vec<ArcParams>,
    pub points: Vec<GeoPoint>,
    pub points_merge: bool,
    pub point_altitude: f64,
    pub point_radius: f64,
    pub ring_max_radius: f64,
    pub ring_propagation_speed: f64,
    /// Milliseconds; serialized as `null` when infinite.
    pub ring_repeat_period: f64,
}

/// One active ring, carrying the data its fade color is computed from
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RingDatum {
    pub index: usize,
    pub lat: f64,
    pub lng: f64,
    pub rgb: Rgb,
}

impl RingDatum {
    pub fn from_point(index: usize, point: &GeoPoint) -> Self {
        Self {
            index,
            lat: point.lat,
            lng: point.lng,
            rgb: point.rgb,
        }
    }

    /// Ring color at fade fraction `t` (0 at spawn, 1 at max radius)
    pub fn color(&self, t: f64) -> Rgba {
        fade_color(self.rgb, t)
    }
}

/// Globe surface material
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceMaterial {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f64,
    pub shininess: f64,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            color: Rgb::from_hex(0x3b42ec),
            emissive: Rgb::from_hex(0x220038),
            emissive_intensity: 0.1,
            shininess: 0.9,
        }
    }
}

impl SurfaceMaterial {
    /// Base color plus an emissive companion: same hue, +10% saturation, -30% lightness.
    pub fn from_base(color: Rgb) -> Self {
        Self {
            color,
            emissive: color.offset_hsl(0.0, 0.1, -0.3),
            ..Self::default()
        }
    }
}

fn color_or_white(field: &str, value: &str) -> Rgba {
    parse_color(value).unwrap_or_else(|| {
        tracing::warn!(field, value, "unparseable color, using white");
        Rgb::WHITE.with_alpha(1.0)
    })
}

pub fn derive_outline(config: &AnimationConfig) -> OutlineParams {
    OutlineParams {
        hex_polygon_resolution: config.hex_polygon_resolution,
        hex_polygon_margin: config.hex_polygon_margin,
        polygon_color: color_or_white("polygon_color", &config.polygon_color),
        show_atmosphere: config.show_atmosphere,
        atmosphere_color: color_or_white("atmosphere_color", &config.atmosphere_color),
        atmosphere_altitude: config.atmosphere_altitude,
    }
}

pub fn derive_animation<R: Rng + ?Sized>(
    config: &AnimationConfig,
    flights: &[FlightArc],
    points: &[GeoPoint],
    rng: &mut R,
) -> AnimationParams {
    let arcs = flights
        .iter()
        .map(|f| ArcParams {
            start_lat: f.start_lat,
            start_lng: f.start_lng,
            end_lat: f.end_lat,
            end_lng: f.end_lng,
            altitude: f.arc_alt,
            color: f.color,
            // round() of a [0, 2) draw picks the middle stroke half the time, not uniformly
            stroke: ARC_STROKES[(rng.gen::<f64>() * 2.0).round() as usize],
            dash_length: config.arc_relative_length,
            dash_initial_gap: f.order as f64,
            dash_gap: ARC_DASH_GAP,
            dash_animate_time: config.flight_time,
        })
        .collect();

    AnimationParams {
        arcs,
        points: points.to_vec(),
        points_merge: true,
        point_altitude: config.point_altitude,
        point_radius: config.point_radius,
        ring_max_radius: config.ring_max_radius,
        ring_propagation_speed: config.ring_propagation_speed,
        ring_repeat_period: derive(config).ring_repeat_period,
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunable globe animation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub arc_relative_length: f64,   // fraction of the arc drawn as the moving dash
    pub flight_time: f64,           // ms per arc traversal
    pub num_rings: u32,
    pub ring_max_radius: f64,       // degrees
    pub ring_propagation_speed: f64, // degrees/sec
    pub ring_spawn_interval: f64,   // seconds
    pub point_altitude: f64,
    pub point_radius: f64,
    pub show_atmosphere: bool,
    pub atmosphere_color: String,
    pub atmosphere_altitude: f64,
    pub hex_polygon_resolution: u32,
    pub hex_polygon_margin: f64,
    pub polygon_color: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            arc_relative_length: 0.9,
            flight_time: 2000.0,
            num_rings: 1,
            ring_max_radius: 3.0,
            ring_propagation_speed: 3.0,
            ring_spawn_interval: 2.0,
            point_altitude: 0.0,
            point_radius: 0.25,
            show_atmosphere: true,
            atmosphere_color: "#ffffff".to_string(),
            atmosphere_altitude: 0.1,
            hex_polygon_resolution: 3,
            hex_polygon_margin: 0.7,
            polygon_color: "rgba(255,255,255, 0.7)".to_string(),
        }
    }
}

/// A partial update; `None` fields keep their previous value on merge
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialAnimationConfig {
    pub arc_relative_length: Option<f64>,
    pub flight_time: Option<f64>,
    pub num_rings: Option<u32>,
    pub ring_max_radius: Option<f64>,
    pub ring_propagation_speed: Option<f64>,
    pub ring_spawn_interval: Option<f64>,
    pub point_altitude: Option<f64>,
    pub point_radius: Option<f64>,
    pub show_atmosphere: Option<bool>,
    pub atmosphere_color: Option<String>,
    pub atmosphere_altitude: Option<f64>,
    pub hex_polygon_resolution: Option<u32>,
    pub hex_polygon_margin: Option<f64>,
    pub polygon_color: Option<String>,
}

impl PartialAnimationConfig {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&AnimationConfig> for PartialAnimationConfig {
    fn from(c: &AnimationConfig) -> Self {
        Self {
            arc_relative_length: Some(c.arc_relative_length),
            flight_time: Some(c.flight_time),
            num_rings: Some(c.num_rings),
            ring_max_radius: Some(c.ring_max_radius),
            ring_propagation_speed: Some(c.ring_propagation_speed),
            ring_spawn_interval: Some(c.ring_spawn_interval),
            point_altitude: Some(c.point_altitude),
            point_radius: Some(c.point_radius),
            show_atmosphere: Some(c.show_atmosphere),
            atmosphere_color: Some(c.atmosphere_color.clone()),
            atmosphere_altitude: Some(c.atmosphere_altitude),
            hex_polygon_resolution: Some(c.hex_polygon_resolution),
            hex_polygon_margin: Some(c.hex_polygon_margin),
            polygon_color: Some(c.polygon_color.clone()),
        }
    }
}

/// Quantities computed from the config rather than set directly
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedTiming {
    /// Milliseconds between ring repeats; infinite when there are no rings.
    pub ring_repeat_period: f64,
}

/// Couple ring cadence to the arc flight duration.
pub fn derive(config: &AnimationConfig) -> DerivedTiming {
    let ring_repeat_period = if config.num_rings == 0 {
        f64::INFINITY
    } else {
        config.flight_time * config.arc_relative_length / config.num_rings as f64
    };
    DerivedTiming { ring_repeat_period }
}

/// Shallow field-wise override of `config` by the fields present in `partial`.
pub fn merge(config: &AnimationConfig, partial: &PartialAnimationConfig) -> AnimationConfig {
    let p = partial.clone();
    let c = config.clone();
    AnimationConfig {
        arc_relative_length: p.arc_relative_length.unwrap_or(c.arc_relative_length),
        flight_time: p.flight_time.unwrap_or(c.flight_time),
        num_rings: p.num_rings.unwrap_or(c.num_rings),
        ring_max_radius: p.ring_max_radius.unwrap_or(c.ring_max_radius),
        ring_propagation_speed: p.ring_propagation_speed.unwrap_or(c.ring_propagation_speed),
        ring_spawn_interval: p.ring_spawn_interval.unwrap_or(c.ring_spawn_interval),
        point_altitude: p.point_altitude.unwrap_or(c.point_altitude),
        point_radius: p.point_radius.unwrap_or(c.point_radius),
        show_atmosphere: p.show_atmosphere.unwrap_or(c.show_atmosphere),
        atmosphere_color: p.atmosphere_color.unwrap_or(c.atmosphere_color),
        atmosphere_altitude: p.atmosphere_altitude.unwrap_or(c.atmosphere_altitude),
        hex_polygon_resolution: p.hex_polygon_resolution.unwrap_or(c.hex_polygon_resolution),
        hex_polygon_margin: p.hex_polygon_margin.unwrap_or(c.hex_polygon_margin),
        polygon_color: p.polygon_color.unwrap_or(c.polygon_color),
    }
}

/// Configuration for an interactive run
#[derive(Clone)]
pub struct RunConfig {
    pub time_step: f32,
    pub seed: Option<u64>,
    pub flights: Option<PathBuf>,
    pub overrides: Vec<String>,
    pub show_hud: bool,
}

//! Settings form boundary: raw text in, validated scene settings out.
//!
//! Numbers that fail to parse are dropped and the previous value kept, so a
//! half-filled form never breaks the scene.

use crate::error::GlobeError;
use crate::settings::SceneSettings;
use std::collections::BTreeMap;

const FIELDS: [&str; 19] = [
    "color",
    "lat",
    "lng",
    "altitude",
    "mission",
    "arc_relative_length",
    "flight_time",
    "num_rings",
    "ring_max_radius",
    "ring_propagation_speed",
    "ring_spawn_interval",
    "point_altitude",
    "point_radius",
    "show_atmosphere",
    "atmosphere_color",
    "atmosphere_altitude",
    "hex_polygon_resolution",
    "hex_polygon_margin",
    "polygon_color",
];

/// Raw submitted values keyed by field name; absent keys are untouched.
#[derive(Clone, Debug, Default)]
pub struct SettingsForm {
    values: BTreeMap<String, String>,
}

impl SettingsForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; camelCase names are accepted as well.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), GlobeError> {
        let key = snake_case(key.trim());
        if !FIELDS.contains(&key.as_str()) {
            return Err(GlobeError::UnknownSetting(key));
        }
        self.values.insert(key, value.to_string());
        Ok(())
    }

    /// Parse `key=value` pairs from the command line
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, GlobeError> {
        let mut form = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| GlobeError::Override(pair.to_string()))?;
            form.set(key, value)?;
        }
        Ok(form)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                tracing::warn!(field = key, value = raw, "rejected non-numeric value");
                None
            }
        }
    }

    fn count(&self, key: &str) -> Option<u32> {
        let raw = self.get(key)?;
        let trimmed = raw.trim();
        let parsed = trimmed.parse::<u32>().ok().or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && *v <= u32::MAX as f64)
                .map(|v| v.trunc() as u32)
        });
        if parsed.is_none() {
            tracing::warn!(field = key, value = raw, "rejected non-count value");
        }
        parsed
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Apply the submitted fields on top of `state`.
    pub fn apply(&self, state: &SceneSettings) -> SceneSettings {
        let mut next = state.clone();
        let g = &mut next.globe;

        if let Some(v) = self.text("color") {
            next.color = v;
        }
        if let Some(v) = self.number("lat") {
            next.lat = v;
        }
        if let Some(v) = self.number("lng") {
            next.lng = v;
        }
        if let Some(v) = self.number("altitude") {
            next.altitude_km = v;
        }
        if let Some(v) = self.text("mission") {
            next.mission = v;
        }

        if let Some(v) = self.number("arc_relative_length") {
            g.arc_relative_length = v;
        }
        if let Some(v) = self.number("flight_time") {
            g.flight_time = v;
        }
        if let Some(v) = self.count("num_rings") {
            g.num_rings = v;
        }
        if let Some(v) = self.number("ring_max_radius") {
            g.ring_max_radius = v;
        }
        if let Some(v) = self.number("ring_propagation_speed") {
            g.ring_propagation_speed = v;
        }
        if let Some(v) = self.number("ring_spawn_interval") {
            g.ring_spawn_interval = v;
        }
        if let Some(v) = self.number("point_altitude") {
            g.point_altitude = v;
        }
        if let Some(v) = self.number("point_radius") {
            g.point_radius = v;
        }
        if let Some(v) = self.get("show_atmosphere") {
            g.show_atmosphere = v.trim() != "false";
        }
        if let Some(v) = self.text("atmosphere_color") {
            g.atmosphere_color = v;
        }
        if let Some(v) = self.number("atmosphere_altitude") {
            g.atmosphere_altitude = v;
        }
        if let Some(v) = self.count("hex_polygon_resolution") {
            g.hex_polygon_resolution = v;
        }
        if let Some(v) = self.number("hex_polygon_margin") {
            g.hex_polygon_margin = v;
        }
        if let Some(v) = self.text("polygon_color") {
            g.polygon_color = v;
        }

        next
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

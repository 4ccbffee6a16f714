use crate::colors::{parse_rgb, Rgb};
use crate::settings::SceneSettings;

/// Position readout, e.g. `Lat 22.32°, Lng 114.17°, Alt 1000 km`
pub fn format_position(lat: f64, lng: f64, altitude_km: f64) -> String {
    format!("Lat {:.2}°, Lng {:.2}°, Alt {} km", lat, lng, altitude_km.round())
}

/// Text overlay drawn in the corner of the globe view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    pub position: Option<String>,
    pub mission: Option<String>,
    pub swatch: Option<(Rgb, String)>,
}

impl Hud {
    pub fn from_settings(settings: &SceneSettings) -> Self {
        let position = [settings.lat, settings.lng, settings.altitude_km]
            .iter()
            .all(|v| v.is_finite())
            .then(|| format_position(settings.lat, settings.lng, settings.altitude_km));

        let mission = Some(settings.mission.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let swatch = parse_rgb(&settings.color).map(|rgb| (rgb, settings.color.clone()));

        Self { position, mission, swatch }
    }

    /// Hidden HUD
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.mission.is_none() && self.swatch.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_format_matches_readout() {
        assert_eq!(
            format_position(22.3193, 114.1694, 1000.0),
            "Lat 22.32°, Lng 114.17°, Alt 1000 km"
        );
        assert_eq!(format_position(-0.004, 0.0, 999.6), "Lat -0.00°, Lng 0.00°, Alt 1000 km");
    }

    #[test]
    fn default_settings_fill_every_line() {
        let hud = Hud::from_settings(&SceneSettings::default());
        assert_eq!(hud.position.as_deref(), Some("Lat 22.32°, Lng 114.17°, Alt 1000 km"));
        assert_eq!(hud.mission.as_deref(), Some("Orbital overview"));
        assert_eq!(hud.swatch.map(|(rgb, _)| rgb), Some(Rgb::from_hex(0x3b42ec)));
    }

    #[test]
    fn missing_data_is_skipped() {
        let settings = SceneSettings {
            mission: "  ".into(),
            color: "not-a-color".into(),
            lat: f64::NAN,
            ..Default::default()
        };
        let hud = Hud::from_settings(&settings);
        assert!(hud.is_empty());
        assert!(Hud::hidden().is_empty());
    }
}

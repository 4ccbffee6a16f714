//! Scene context: owns the viewport, the globe and the render engine and
//! runs them once per frame in a fixed order.

use crate::catalogue::FlightArc;
use crate::config::PartialAnimationConfig;
use crate::form::SettingsForm;
use crate::globe::{Globe, RenderEngine, Stage};
use crate::hud::Hud;
use crate::settings::SceneSettings;
use crate::viewport::{altitude_km_to_factor, ViewportController, ViewportSettings, ZoomDirection};

pub struct Scene<E: RenderEngine> {
    viewport: ViewportController,
    globe: Globe,
    engine: E,
    settings: SceneSettings,
}

impl<E: RenderEngine> Scene<E> {
    /// Build the scene and request staged globe setup.
    pub fn new(
        flights: Vec<FlightArc>,
        settings: SceneSettings,
        viewport: ViewportSettings,
        engine: E,
        seed: Option<u64>,
    ) -> Self {
        let mut globe = Globe::new(flights, settings.globe.clone(), seed);
        globe.initialize();

        let mut scene = Self {
            viewport: ViewportController::new(viewport),
            globe,
            engine,
            settings,
        };
        scene.apply_view();
        scene
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[cfg(test)]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn hud(&self) -> Hud {
        Hud::from_settings(&self.settings)
    }

    /// Viewport update, then the globe tick, then the engine clock.
    pub fn frame(&mut self, dt: f64) {
        self.viewport.update(dt);
        if self.globe.stage() == Stage::AwaitingEngine {
            self.globe.on_engine_ready(&mut self.engine);
        }
        self.globe.tick(dt, &mut self.engine);
        self.engine.advance(dt);
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.viewport.zoom(direction);
    }

    /// Submit a settings form on top of the current settings.
    pub fn apply_settings(&mut self, form: &SettingsForm) {
        let next = form.apply(&self.settings);
        self.replace_settings(next);
    }

    /// Switch to `next` wholesale: color, then point of view, then globe config.
    pub fn replace_settings(&mut self, next: SceneSettings) {
        self.settings = next;
        self.apply_view();
        let partial = PartialAnimationConfig::from(&self.settings.globe);
        self.globe.update_config(&partial, &mut self.engine);
        tracing::info!(mission = %self.settings.mission, "settings applied");
    }

    /// Switch the globe color; unparseable input leaves everything as is.
    pub fn set_color(&mut self, color: &str) {
        if self.globe.set_color(color, &mut self.engine) {
            self.settings.color = color.to_string();
        }
    }

    pub fn teardown(&mut self) {
        self.globe.teardown();
    }

    fn apply_view(&mut self) {
        let color = self.settings.color.clone();
        self.globe.set_color(&color, &mut self.engine);
        self.viewport.fly_to(
            self.settings.lat,
            self.settings.lng,
            altitude_km_to_factor(self.settings.altitude_km),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::bundled_flights;
    use crate::globe::testing::RecordingEngine;

    fn scene(engine: RecordingEngine) -> Scene<RecordingEngine> {
        Scene::new(
            bundled_flights(),
            SceneSettings::default(),
            ViewportSettings::default(),
            engine,
            Some(7),
        )
    }

    #[test]
    fn setup_waits_for_the_first_ready_frame() {
        let mut scene = scene(RecordingEngine::default());
        scene.frame(0.016);
        assert_eq!(scene.globe().stage(), Stage::AwaitingEngine);

        scene.engine_mut().ready = true;
        scene.frame(0.016);
        assert_eq!(scene.globe().stage(), Stage::Ready);
        let calls = &scene.engine().calls;
        let outline = calls.iter().position(|c| *c == "outline").unwrap();
        let animation = calls.iter().position(|c| *c == "animation").unwrap();
        assert!(outline < animation);
    }

    #[test]
    fn apply_settings_orders_color_view_config() {
        let mut scene = scene(RecordingEngine::ready());
        scene.frame(0.0);
        scene.engine_mut().calls.clear();

        let form = SettingsForm::from_pairs(&[
            "color=#0f766e",
            "lat=0",
            "lng=0",
            "altitude=12742",
            "num_rings=2",
            "mission=Relay",
        ])
        .unwrap();
        scene.apply_settings(&form);

        assert_eq!(scene.engine().calls, vec!["material", "outline", "animation"]);
        assert_eq!(scene.globe().config().num_rings, 2);
        assert_eq!(scene.settings().mission, "Relay");
        let pos = scene.viewport().camera_position();
        assert!(pos.x.abs() < 1e-6 && pos.y.abs() < 1e-6);
        assert!((scene.viewport().current_zoom_distance() - 300.0).abs() < 1e-6);
        assert_eq!(
            scene.hud().position.as_deref(),
            Some("Lat 0.00°, Lng 0.00°, Alt 12742 km")
        );
    }

    #[test]
    fn replace_settings_reconfigures_a_running_globe() {
        let mut scene = scene(RecordingEngine::ready());
        scene.frame(0.0);
        scene.engine_mut().calls.clear();

        let mut next = SceneSettings::default();
        next.globe.num_rings = 0;
        next.mission = "Reloaded".into();
        scene.replace_settings(next);

        assert_eq!(scene.engine().calls, vec!["material", "outline", "animation"]);
        assert_eq!(scene.globe().config().num_rings, 0);
        assert_eq!(scene.settings().mission, "Reloaded");
    }

    #[test]
    fn settings_before_engine_ready_survive_setup() {
        let mut scene = scene(RecordingEngine::ready());
        let form = SettingsForm::from_pairs(&["num_rings=4", "point_radius=1e9"]).unwrap();
        scene.apply_settings(&form);
        scene.frame(0.0);
        assert_eq!(scene.globe().stage(), Stage::Ready);
        assert_eq!(scene.globe().config().num_rings, 4);
        assert_eq!(scene.globe().config().point_radius, 1e9);
    }

    #[test]
    fn bad_color_keeps_previous() {
        let mut scene = scene(RecordingEngine::ready());
        scene.set_color("nonsense");
        assert_eq!(scene.settings().color, "#3b42ec");
        scene.set_color("teal");
        assert_eq!(scene.settings().color, "teal");
    }

    #[test]
    fn zoom_commands_reach_viewport() {
        let mut scene = scene(RecordingEngine::ready());
        let before = scene.viewport().current_zoom_distance();
        scene.zoom(ZoomDirection::Out);
        assert!(scene.viewport().current_zoom_distance() > before);
    }

    #[test]
    fn teardown_stops_ring_updates() {
        let mut scene = scene(RecordingEngine::ready());
        scene.frame(0.0);
        scene.teardown();
        scene.frame(5.0);
        assert!(scene.engine().rings.is_empty());
    }
}

//! Globe façade: owns the catalogue, the animation config and the ring
//! scheduler, and hands render parameters to a [`RenderEngine`].

pub mod params;

use crate::catalogue::{self, FlightArc, GeoPoint};
use crate::colors::parse_rgb;
use crate::config::{merge, AnimationConfig, PartialAnimationConfig};
use crate::rings::RingScheduler;
use params::{AnimationParams, OutlineParams, RingDatum, SurfaceMaterial};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Consumer of globe render parameters
pub trait RenderEngine {
    /// Whether the engine can accept parameters yet
    fn is_ready(&self) -> bool;
    fn apply_outline(&mut self, outline: &OutlineParams);
    /// Replaces arcs and points; also clears the active ring set.
    fn apply_animation(&mut self, animation: &AnimationParams);
    fn apply_rings(&mut self, rings: &[RingDatum]);
    fn apply_material(&mut self, material: &SurfaceMaterial);
    /// Advance the engine's own animation clock by `dt` seconds.
    fn advance(&mut self, _dt: f64) {}
}

/// Lifecycle of the globe relative to its engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Created,
    AwaitingEngine,
    Ready,
    TornDown,
}

pub struct Globe {
    flights: Vec<FlightArc>,
    points: Vec<GeoPoint>,
    config: AnimationConfig,
    material: SurfaceMaterial,
    scheduler: RingScheduler,
    rng: StdRng,
    stage: Stage,
}

impl Globe {
    pub fn new(flights: Vec<FlightArc>, config: AnimationConfig, seed: Option<u64>) -> Self {
        let points = catalogue::build(&flights);
        tracing::info!(flights = flights.len(), points = points.len(), "globe catalogue built");

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            flights,
            points,
            config,
            material: SurfaceMaterial::default(),
            scheduler: RingScheduler::new(),
            rng,
            stage: Stage::Created,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_alive(&self) -> bool {
        self.stage != Stage::TornDown
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[cfg(test)]
    pub fn material(&self) -> SurfaceMaterial {
        self.material
    }

    pub fn outline_params(&self) -> OutlineParams {
        params::derive_outline(&self.config)
    }

    pub fn animation_params(&mut self) -> AnimationParams {
        params::derive_animation(&self.config, &self.flights, &self.points, &mut self.rng)
    }

    /// Rings currently flashing
    pub fn active_rings(&self) -> Vec<RingDatum> {
        self.scheduler
            .active()
            .iter()
            .map(|&i| RingDatum::from_point(i, &self.points[i]))
            .collect()
    }

    /// Request staged setup; it runs once the engine reports readiness.
    pub fn initialize(&mut self) {
        if self.stage == Stage::Created {
            self.stage = Stage::AwaitingEngine;
        }
    }

    /// Readiness callback: outlines first, then the heavier arc/point data.
    pub fn on_engine_ready<E: RenderEngine + ?Sized>(&mut self, engine: &mut E) {
        match self.stage {
            Stage::AwaitingEngine | Stage::Ready => {}
            Stage::Created | Stage::TornDown => return,
        }
        if !engine.is_ready() {
            return;
        }

        engine.apply_material(&self.material);
        self.apply_outline(engine);
        self.apply_animation(engine);
        self.stage = Stage::Ready;
        tracing::info!("globe parameters attached");
    }

    /// Stop forwarding anything to the engine.
    pub fn teardown(&mut self) {
        self.stage = Stage::TornDown;
    }

    /// Merge `partial` into the config and re-apply all derived parameters.
    pub fn update_config<E: RenderEngine + ?Sized>(
        &mut self,
        partial: &PartialAnimationConfig,
        engine: &mut E,
    ) {
        if !self.is_alive() {
            return;
        }
        self.config = merge(&self.config, partial);
        tracing::debug!(config = ?self.config, "globe config updated");

        self.apply_outline(engine);
        self.apply_animation(engine);
    }

    /// Set the surface color; blank or unparseable input is ignored.
    /// Returns whether the color was applied.
    pub fn set_color<E: RenderEngine + ?Sized>(&mut self, color: &str, engine: &mut E) -> bool {
        let Some(rgb) = parse_rgb(color) else {
            if !color.trim().is_empty() {
                tracing::warn!(color, "ignoring unparseable globe color");
            }
            return false;
        };
        if !self.is_alive() {
            return false;
        }

        self.material = SurfaceMaterial::from_base(rgb);
        engine.apply_material(&self.material);
        true
    }

    /// Advance the ring scheduler by `dt` seconds and forward a new ring set.
    pub fn tick<E: RenderEngine + ?Sized>(&mut self, dt: f64, engine: &mut E) {
        let refreshed = self
            .scheduler
            .tick(dt, self.points.len(), self.config.ring_spawn_interval, &mut self.rng)
            .is_some();

        if refreshed && self.is_alive() {
            let rings = self.active_rings();
            engine.apply_rings(&rings);
        }
    }

    fn apply_outline<E: RenderEngine + ?Sized>(&self, engine: &mut E) {
        engine.apply_outline(&self.outline_params());
    }

    fn apply_animation<E: RenderEngine + ?Sized>(&mut self, engine: &mut E) {
        let animation = self.animation_params();
        engine.apply_animation(&animation);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingEngine;
    use super::*;
    use crate::catalogue::arc;

    fn five_point_flights() -> Vec<FlightArc> {
        vec![
            arc((0.0, 0.0), (10.0, 10.0), 1),
            arc((20.0, 20.0), (30.0, 30.0), 2),
            arc((40.0, 40.0), (0.0, 0.0), 3),
        ]
    }

    #[test]
    fn staged_init_applies_outline_before_animation() {
        let mut globe = Globe::new(five_point_flights(), AnimationConfig::default(), Some(1));
        let mut engine = RecordingEngine::ready();

        globe.on_engine_ready(&mut engine);
        assert!(engine.calls.is_empty(), "nothing before initialize()");

        globe.initialize();
        globe.on_engine_ready(&mut engine);
        assert_eq!(engine.calls, vec!["material", "outline", "animation"]);
        assert_eq!(globe.stage(), Stage::Ready);

        globe.on_engine_ready(&mut engine);
        assert_eq!(engine.calls.len(), 6);
        assert_eq!(engine.outline.as_ref(), Some(&globe.outline_params()));
    }

    #[test]
    fn waits_for_engine_readiness() {
        let mut globe = Globe::new(five_point_flights(), AnimationConfig::default(), Some(1));
        let mut engine = RecordingEngine::default();
        globe.initialize();
        globe.on_engine_ready(&mut engine);
        assert!(engine.calls.is_empty());
        assert_eq!(globe.stage(), Stage::AwaitingEngine);
    }

    #[test]
    fn teardown_blocks_late_application() {
        let mut globe = Globe::new(five_point_flights(), AnimationConfig::default(), Some(1));
        let mut engine = RecordingEngine::ready();
        globe.initialize();
        globe.teardown();

        globe.on_engine_ready(&mut engine);
        globe.update_config(&PartialAnimationConfig::default(), &mut engine);
        globe.tick(10.0, &mut engine);
        assert!(!globe.set_color("#ff0000", &mut engine));
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn update_config_merges_and_reapplies() {
        let mut globe = Globe::new(five_point_flights(), AnimationConfig::default(), Some(1));
        let mut engine = RecordingEngine::ready();
        let partial = PartialAnimationConfig {
            num_rings: Some(0),
            show_atmosphere: Some(false),
            ..Default::default()
        };
        globe.update_config(&partial, &mut engine);

        assert_eq!(engine.calls, vec!["outline", "animation"]);
        assert!(!engine.outline.as_ref().unwrap().show_atmosphere);
        assert_eq!(
            engine.animation.as_ref().unwrap().ring_repeat_period,
            f64::INFINITY
        );
        assert_eq!(globe.config().flight_time, 2000.0);
    }

    #[test]
    fn set_color_derives_emissive() {
        let mut globe = Globe::new(Vec::new(), AnimationConfig::default(), Some(1));
        let mut engine = RecordingEngine::ready();

        assert!(!globe.set_color("", &mut engine));
        assert!(!globe.set_color("definitely not a color", &mut engine));
        assert!(engine.calls.is_empty());
        assert_eq!(globe.material(), SurfaceMaterial::default());

        assert!(globe.set_color("#3b42ec", &mut engine));
        let material = engine.material.unwrap();
        let (base, glow) = (material.color.to_hsl(), material.emissive.to_hsl());
        assert_ne!(material.color, material.emissive);
        assert!((base.h - glow.h).abs() < 1e-9);
        assert!(glow.s > base.s);
        assert!(glow.l < base.l);
    }

    #[test]
    fn tick_forwards_ring_refreshes() {
        let mut globe = Globe::new(five_point_flights(), AnimationConfig::default(), None);
        assert_eq!(globe.points().len(), 5);
        let mut engine = RecordingEngine::ready();

        globe.tick(1.0, &mut engine);
        assert!(engine.rings.is_empty(), "no change at t=1");
        globe.tick(1.0, &mut engine);
        assert!(engine.rings.is_empty(), "no change at t=2");
        globe.tick(0.1, &mut engine);
        assert_eq!(engine.rings.len(), 1, "one refresh by t=2.1");
        assert_eq!(engine.rings[0].len(), 4);
        assert_eq!(engine.rings[0], globe.active_rings());
    }
}

//! Orbit camera around the globe: drag rotation inside a polar band,
//! clamped zoom, point-of-view jumps and idle auto-rotation.

use glam::DVec3;
use serde::Deserialize;
use std::f64::consts::{PI, TAU};

/// Globe radius in scene units
pub const GLOBE_RADIUS: f64 = 100.0;

/// Mean Earth radius, used to convert UI kilometres into globe radii
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Tunable viewport limits
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub camera_z: f64,
    pub min_zoom_distance: f64,
    pub max_zoom_distance: f64,
    pub zoom_step: f64,
    pub zoom_speed: f64,
    pub rotate_speed: f64,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            camera_z: 300.0,
            min_zoom_distance: 220.0,
            max_zoom_distance: 420.0,
            zoom_step: 30.0,
            zoom_speed: 0.8,
            rotate_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            min_polar_angle: PI / 3.5,
            max_polar_angle: PI - PI / 3.0,
            fov_deg: 50.0,
            near: 1.0,
            far: 1800.0,
        }
    }
}

impl ViewportSettings {
    /// Replace unusable limits with the defaults. `clamp` needs ordered,
    /// non-NaN bounds, and the projection needs a positive frustum.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let mut out = self;

        let ordered = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo <= hi;

        if !(ordered(out.min_zoom_distance, out.max_zoom_distance) && out.min_zoom_distance > 0.0) {
            tracing::warn!(
                min = out.min_zoom_distance,
                max = out.max_zoom_distance,
                "invalid zoom bounds, using defaults"
            );
            out.min_zoom_distance = defaults.min_zoom_distance;
            out.max_zoom_distance = defaults.max_zoom_distance;
        }
        if !(ordered(out.min_polar_angle, out.max_polar_angle)
            && out.min_polar_angle >= 0.0
            && out.max_polar_angle <= PI)
        {
            tracing::warn!(
                min = out.min_polar_angle,
                max = out.max_polar_angle,
                "invalid polar band, using defaults"
            );
            out.min_polar_angle = defaults.min_polar_angle;
            out.max_polar_angle = defaults.max_polar_angle;
        }
        if !(ordered(out.near, out.far) && out.near > 0.0 && out.near < out.far) {
            tracing::warn!(near = out.near, far = out.far, "invalid clip planes, using defaults");
            out.near = defaults.near;
            out.far = defaults.far;
        }
        if !(out.fov_deg.is_finite() && out.fov_deg > 0.0 && out.fov_deg < 180.0) {
            tracing::warn!(fov = out.fov_deg, "invalid field of view, using default");
            out.fov_deg = defaults.fov_deg;
        }

        for (name, value, fallback) in [
            ("camera_z", &mut out.camera_z, defaults.camera_z),
            ("zoom_step", &mut out.zoom_step, defaults.zoom_step),
            ("zoom_speed", &mut out.zoom_speed, defaults.zoom_speed),
            ("rotate_speed", &mut out.rotate_speed, defaults.rotate_speed),
            ("auto_rotate_speed", &mut out.auto_rotate_speed, defaults.auto_rotate_speed),
        ] {
            if !value.is_finite() {
                tracing::warn!(setting = name, value = *value, "non-finite viewport value, using default");
                *value = fallback;
            }
        }
        out
    }
}

/// Discrete zoom commands from the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Read-only camera snapshot for the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub position: DVec3,
    pub target: DVec3,
    pub fov_y: f64, // radians
    pub near: f64,
    pub far: f64,
}

/// Direction of a lat/lng on the globe, scaled to `radius`.
/// Longitude 0 faces +Z and the north pole is +Y.
pub fn polar_to_cartesian(lat: f64, lng: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (90.0 - lng).to_radians();
    DVec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// UI altitude in kilometres as a multiple of the globe radius
pub fn altitude_km_to_factor(km: f64) -> f64 {
    km / EARTH_RADIUS_KM
}

pub struct ViewportController {
    settings: ViewportSettings,
    position: DVec3,
    target: DVec3,
    dragging: bool,
    dragged_this_frame: bool,
}

impl ViewportController {
    pub fn new(settings: ViewportSettings) -> Self {
        let settings = settings.validated();
        let mut controller = Self {
            position: DVec3::new(0.0, 0.0, settings.camera_z),
            target: DVec3::ZERO,
            settings,
            dragging: false,
            dragged_this_frame: false,
        };
        controller.apply_constraints();
        controller
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    #[cfg(test)]
    pub fn camera_position(&self) -> DVec3 {
        self.position
    }

    #[cfg(test)]
    pub fn target(&self) -> DVec3 {
        self.target
    }

    pub fn current_zoom_distance(&self) -> f64 {
        self.position.distance(self.target)
    }

    pub fn camera_view(&self) -> CameraView {
        CameraView {
            position: self.position,
            target: self.target,
            fov_y: self.settings.fov_deg.to_radians(),
            near: self.settings.near,
            far: self.settings.far,
        }
    }

    pub fn set_auto_rotate(&mut self, on: bool) {
        self.settings.auto_rotate = on;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Rotate by a pointer delta in pixels. Panning is never applied.
    pub fn drag_by(&mut self, dx: f64, dy: f64, viewport_height: f64) {
        let height = viewport_height.max(1.0);
        let scale = TAU * self.settings.rotate_speed / height;
        self.rotate(-dx * scale, -dy * scale);
        self.dragged_this_frame = true;
    }

    /// Continuous wheel zoom; negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let scale = 0.95_f64.powf(self.settings.zoom_speed);
        let factor = if delta_y < 0.0 { scale } else { 1.0 / scale };
        let next = self.current_zoom_distance() * factor;
        self.set_distance(next);
    }

    /// Move the camera `delta` units along its current line of sight,
    /// staying within the zoom bounds. The viewing direction never changes.
    pub fn zoom_by(&mut self, delta: f64) {
        let next = self.current_zoom_distance() + delta;
        self.set_distance(next);
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        let step = self.settings.zoom_step;
        match direction {
            ZoomDirection::In => self.zoom_by(-step),
            ZoomDirection::Out => self.zoom_by(step),
        }
    }

    /// Jump to look at `lat`/`lng` from `altitude` globe radii above the surface.
    pub fn fly_to(&mut self, lat: f64, lng: f64, altitude: f64) {
        self.target = DVec3::ZERO;
        self.position = polar_to_cartesian(lat, lng, GLOBE_RADIUS * (1.0 + altitude));
        self.apply_constraints();
        tracing::debug!(lat, lng, altitude, distance = self.current_zoom_distance(), "point of view set");
    }

    /// Per-frame update; auto-rotation only runs when no drag happened.
    pub fn update(&mut self, dt: f64) {
        let dragged = self.dragging || self.dragged_this_frame;
        if self.settings.auto_rotate && !dragged {
            let angle = TAU / 60.0 * self.settings.auto_rotate_speed * dt;
            self.rotate(-angle, 0.0);
        }
        self.dragged_this_frame = false;
    }

    fn set_distance(&mut self, distance: f64) {
        let next = self.clamp_distance(distance);
        let direction = (self.position - self.target).normalize_or(DVec3::Z);
        self.position = self.target + direction * next;
    }

    fn clamp_distance(&self, distance: f64) -> f64 {
        distance.clamp(self.settings.min_zoom_distance, self.settings.max_zoom_distance)
    }

    /// Orbit by `d_theta` around the vertical axis and `d_phi` from the pole.
    fn rotate(&mut self, d_theta: f64, d_phi: f64) {
        let (radius, theta, phi) = self.spherical();
        self.set_spherical(radius, theta + d_theta, phi + d_phi);
    }

    fn apply_constraints(&mut self) {
        let (radius, theta, phi) = self.spherical();
        self.set_spherical(radius, theta, phi);
    }

    /// (radius, azimuth around +Y measured from +Z, polar angle from +Y)
    fn spherical(&self) -> (f64, f64, f64) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return (0.0, 0.0, PI / 2.0);
        }
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, theta, phi)
    }

    fn set_spherical(&mut self, radius: f64, theta: f64, phi: f64) {
        let phi = phi
            .clamp(self.settings.min_polar_angle, self.settings.max_polar_angle)
            .clamp(1e-6, PI - 1e-6);
        let radius = self.clamp_distance(radius);
        let offset = DVec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.position = self.target + offset;
    }
}

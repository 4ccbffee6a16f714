//! Braille terminal render engine.
//!
//! Every terminal cell holds a 2x4 grid of braille dots. The scene is
//! projected through the orbit camera onto that dot grid; each dot keeps the
//! color of the highest layer drawn on it.

use crate::colors::{Rgb, Rgba};
use crate::globe::params::{AnimationParams, ArcParams, OutlineParams, RingDatum, SurfaceMaterial};
use crate::globe::RenderEngine;
use crate::hud::Hud;
use crate::terminal::Terminal;
use crate::viewport::{polar_to_cartesian, CameraView, GLOBE_RADIUS};
use crossterm::style::Color;
use glam::DVec3;
use std::f64::consts::PI;

/// Coastline polylines in degrees (lat, lng)
const CONTINENTS: &[&[(f64, f64)]] = &[
    // North America
    &[
        (69.5, -90.5), (67.1, -81.4), (58.9, -94.7), (51.2, -79.9), (62.6, -77.4),
        (58.2, -67.6), (60.3, -64.6), (53.3, -55.8), (46.8, -71.1), (49.2, -65.1),
        (45.9, -59.8), (39.2, -76.3), (31.4, -81.3), (25.2, -80.4), (30.1, -84.1),
        (27.8, -97.1), (18.8, -95.9), (21.5, -87.1), (15.9, -88.9), (15.3, -83.4),
        (9.0, -82.2), (11.1, -74.9), (7.2, -80.9), (19.3, -105.0), (31.2, -113.1),
        (23.4, -109.4), (24.7, -112.2), (40.3, -124.4), (49.0, -122.8), (58.1, -134.1),
        (61.3, -150.6), (54.4, -164.8), (58.9, -157.0), (61.5, -166.1), (64.8, -160.8),
        (65.7, -168.1), (71.4, -156.6), (67.4, -108.9), (67.3, -96.1), (71.9, -95.2),
        (69.5, -90.5),
    ],
    // South America
    &[
        (11.1, -74.9), (10.7, -61.9), (4.2, -51.3), (-0.1, -50.4), (-7.3, -34.7),
        (-21.9, -40.9), (-24.9, -47.6), (-34.4, -53.8), (-33.9, -58.4), (-36.9, -56.8),
        (-41.1, -65.1), (-48.1, -66.0), (-53.8, -71.0), (-52.3, -74.9), (-46.6, -75.6),
        (-42.4, -72.7), (-18.3, -70.4), (-14.6, -76.0), (-4.7, -81.4), (3.8, -77.1),
        (9.0, -79.1), (11.1, -74.9),
    ],
    // Europe
    &[
        (31.2, 29.7), (31.2, 34.3), (36.7, 36.2), (36.7, 27.6), (39.5, 26.2),
        (41.5, 41.6), (45.2, 36.7), (47.3, 39.1), (44.4, 33.9), (46.6, 30.7),
        (41.1, 28.8), (40.3, 22.6), (36.4, 23.2), (45.6, 13.9), (40.2, 18.5),
        (37.9, 15.7), (44.4, 8.9), (36.0, -5.9), (36.9, -8.9), (43.0, -9.4),
        (43.4, -1.9), (48.7, -4.6), (53.5, 8.1), (57.1, 8.5), (54.0, 10.9),
        (54.4, 19.7), (59.2, 23.3), (60.0, 29.1), (60.7, 21.3), (65.1, 25.4),
        (65.7, 22.2), (55.4, 12.9), (59.5, 10.4), (58.6, 5.7), (62.6, 5.9),
        (69.8, 19.2), (70.5, 31.3), (69.3, 33.8), (31.2, 29.7),
    ],
    // Africa
    &[
        (29.9, 32.4), (11.7, 42.7), (10.6, 51.0), (-4.7, 39.2), (-14.7, 40.8),
        (-19.8, 34.8), (-24.1, 35.5), (-32.8, 28.2), (-34.8, 19.6), (-18.1, 11.8),
        (-10.7, 13.7), (3.7, 9.4), (6.3, 4.3), (4.4, -8.0), (14.7, -17.6),
        (29.9, 32.4),
    ],
    // Asia
    &[
        (77.0, 107.0), (70.8, 131.3), (69.4, 178.6), (62.3, 179.2), (59.9, 163.5),
        (51.0, 156.8), (56.8, 155.9), (62.6, 164.5), (54.7, 135.1), (52.2, 141.4),
        (39.8, 127.5), (35.1, 129.1), (40.9, 121.6), (39.2, 118.0), (37.5, 122.4),
        (34.9, 119.2), (28.2, 121.7), (19.8, 105.9), (13.4, 109.3), (8.6, 105.2),
        (13.4, 100.1), (1.3, 104.2), (22.8, 91.4), (15.9, 80.3), (8.0, 77.5),
        (21.4, 72.6), (30.3, 48.9), (24.0, 51.8), (26.4, 56.4), (22.3, 59.8),
        (12.6, 43.5), (21.3, 39.1), (69.3, 33.8), (67.5, 41.1), (66.6, 33.2),
        (63.8, 37.0), (68.6, 43.5), (68.1, 68.5), (71.0, 66.7), (73.0, 69.9),
        (66.2, 72.4), (72.8, 74.7), (77.0, 107.0),
    ],
    // Australia
    &[
        (-13.8, 143.6), (-26.1, 153.1), (-37.4, 150.0), (-38.0, 140.6), (-34.4, 138.2),
        (-35.3, 136.8), (-32.9, 137.8), (-34.9, 136.0), (-31.5, 131.3), (-34.2, 115.0),
        (-21.8, 114.1), (-19.7, 120.9), (-14.2, 125.7), (-15.0, 129.6), (-11.1, 132.4),
        (-11.9, 136.5), (-15.0, 135.5), (-17.7, 140.2), (-11.0, 142.1), (-13.8, 143.6),
    ],
    // Greenland
    &[
        (83.5, -27.1), (82.7, -20.8), (82.0, -31.4), (81.3, -12.2), (80.2, -20.0),
        (80.1, -17.7), (76.6, -21.7), (74.3, -19.4), (70.2, -26.4), (70.1, -22.3),
        (65.5, -39.8), (60.1, -43.4), (63.6, -51.6), (67.2, -54.0), (69.9, -50.9),
        (69.6, -54.7), (70.6, -51.4), (75.5, -58.6), (78.0, -73.3), (81.8, -62.7),
        (83.5, -27.1),
    ],
    // Japan
    &[
        (37.1, 141.0), (33.5, 135.8), (33.9, 131.0), (31.4, 130.2), (33.3, 129.4),
        (38.2, 139.4), (41.2, 140.3), (37.1, 141.0),
    ],
    // UK/Ireland
    &[(58.6, -3.0), (51.3, 1.4), (50.0, -5.2), (54.0, -2.9), (56.8, -6.1), (58.6, -3.0)],
];

/// Samples along one arc
const ARC_SAMPLES: usize = 64;
/// Samples around one ring circle
const RING_SAMPLES: usize = 36;
/// Rings sit just above the surface so they are not hidden by it
const RING_LIFT: f64 = 1.002;
/// Newest circles kept per ring; older ones are dropped
const MAX_RING_CIRCLES: usize = 16;
/// Upper bound on coastline samples per polyline segment
const MAX_OUTLINE_SAMPLES: usize = 96;

/// Draw order; a dot keeps the color of the highest layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Empty,
    Grid,
    Atmosphere,
    Outline,
    Point,
    Arc,
    Ring,
}

#[derive(Clone, Copy, Debug)]
struct Dot {
    layer: Layer,
    color: Color,
    bold: bool,
}

const EMPTY_DOT: Dot = Dot {
    layer: Layer::Empty,
    color: Color::Reset,
    bold: false,
};

/// Braille dot raster, two dots per column and four per row of cells
struct DotCanvas {
    width: usize,
    height: usize,
    dots: Vec<Dot>,
}

impl DotCanvas {
    fn new(cols: u16, rows: u16) -> Self {
        let width = cols as usize * 2;
        let height = rows as usize * 4;
        Self {
            width,
            height,
            dots: vec![EMPTY_DOT; width * height],
        }
    }

    fn clear(&mut self) {
        self.dots.fill(EMPTY_DOT);
    }

    fn plot(&mut self, x: i32, y: i32, layer: Layer, color: Color, bold: bool) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let dot = &mut self.dots[y as usize * self.width + x as usize];
        if layer >= dot.layer {
            *dot = Dot { layer, color, bold };
        }
    }

    fn blit(&self, term: &mut Terminal) {
        const BITS: [(usize, usize, u32); 8] = [
            (0, 0, 0x01), (0, 1, 0x02), (0, 2, 0x04), (1, 0, 0x08),
            (1, 1, 0x10), (1, 2, 0x20), (0, 3, 0x40), (1, 3, 0x80),
        ];

        for cy in 0..self.height / 4 {
            for cx in 0..self.width / 2 {
                let mut bits = 0u32;
                let mut top = EMPTY_DOT;
                for &(dx, dy, bit) in &BITS {
                    let dot = self.dots[(cy * 4 + dy) * self.width + cx * 2 + dx];
                    if dot.layer != Layer::Empty {
                        bits |= bit;
                        if dot.layer >= top.layer {
                            top = dot;
                        }
                    }
                }
                if bits > 0 {
                    let ch = char::from_u32(0x2800 + bits).unwrap_or(' ');
                    term.set(cx as i32, cy as i32, ch, Some(top.color), top.bold);
                }
            }
        }
    }
}

/// Perspective projection from scene space onto the dot canvas
struct Projector {
    eye: DVec3,
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    focal: f64,
    near: f64,
    far: f64,
    cx: f64,
    cy: f64,
}

impl Projector {
    fn new(view: &CameraView, canvas: &DotCanvas) -> Self {
        let forward = (view.target - view.position).normalize_or(DVec3::NEG_Z);
        let right = forward.cross(DVec3::Y).normalize_or(DVec3::X);
        let up = right.cross(forward);
        let half = canvas.height as f64 / 2.0;
        Self {
            eye: view.position,
            forward,
            right,
            up,
            focal: half / (view.fov_y / 2.0).tan(),
            near: view.near,
            far: view.far,
            cx: canvas.width as f64 / 2.0,
            cy: half,
        }
    }

    /// Dot coordinates, or `None` when clipped by the near/far planes
    fn project(&self, p: DVec3) -> Option<(i32, i32)> {
        let rel = p - self.eye;
        let depth = rel.dot(self.forward);
        if depth < self.near || depth > self.far {
            return None;
        }
        let x = self.cx + rel.dot(self.right) / depth * self.focal;
        let y = self.cy - rel.dot(self.up) / depth * self.focal;
        Some((x.round() as i32, y.round() as i32))
    }

    /// Whether the globe sphere blocks the line of sight to `p`
    fn occluded(&self, p: DVec3) -> bool {
        let d = p - self.eye;
        let a = d.length_squared();
        if a == 0.0 {
            return false;
        }
        let b = 2.0 * self.eye.dot(d);
        let c = self.eye.length_squared() - GLOBE_RADIUS * GLOBE_RADIUS;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return false;
        }
        let t = (-b - disc.sqrt()) / (2.0 * a);
        t > 0.0 && t < 1.0 - 1e-3
    }

    fn visible(&self, p: DVec3) -> Option<(i32, i32)> {
        if self.occluded(p) {
            None
        } else {
            self.project(p)
        }
    }
}

/// A ring datum plus the engine clock time it was attached at
#[derive(Clone, Debug)]
struct ActiveRing {
    datum: RingDatum,
    born: f64,
}

/// Terminal implementation of [`RenderEngine`]
pub struct TerminalEngine {
    canvas: Option<DotCanvas>,
    outline: Option<OutlineParams>,
    animation: Option<AnimationParams>,
    rings: Vec<ActiveRing>,
    material: SurfaceMaterial,
    clock: f64, // seconds
}

impl Default for TerminalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEngine {
    pub fn new() -> Self {
        Self {
            canvas: None,
            outline: None,
            animation: None,
            rings: Vec::new(),
            material: SurfaceMaterial::default(),
            clock: 0.0,
        }
    }

    /// Size the dot canvas; the engine is ready once it has one.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == 0 || rows == 0 {
            self.canvas = None;
            return;
        }
        let unchanged = self
            .canvas
            .as_ref()
            .is_some_and(|c| c.width == cols as usize * 2 && c.height == rows as usize * 4);
        if !unchanged {
            self.canvas = Some(DotCanvas::new(cols, rows));
        }
    }

    #[cfg(test)]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Render the current parameters into `term` from the camera's point of view.
    pub fn draw(&mut self, term: &mut Terminal, view: &CameraView, hud: &Hud) {
        let (cols, rows) = term.size();
        self.resize(cols, rows);
        term.clear();

        if let Some(mut canvas) = self.canvas.take() {
            canvas.clear();
            let proj = Projector::new(view, &canvas);

            self.draw_grid(&mut canvas, &proj);
            if let Some(outline) = &self.outline {
                draw_atmosphere(&mut canvas, &proj, view, outline);
                draw_outline(&mut canvas, &proj, outline);
            }
            if let Some(animation) = &self.animation {
                draw_points(&mut canvas, &proj, animation);
                for arc in &animation.arcs {
                    draw_arc(&mut canvas, &proj, arc, self.clock);
                }
                for ring in &self.rings {
                    draw_ring(&mut canvas, &proj, ring, animation, self.clock);
                }
            }

            canvas.blit(term);
            self.canvas = Some(canvas);
        }

        draw_hud(term, hud);
    }

    /// Latitude and longitude lines tinted by the surface material
    fn draw_grid(&self, canvas: &mut DotCanvas, proj: &Projector) {
        let color = surface_tone(&self.material).to_term();

        for lat in (-60..=60).step_by(30) {
            for lng in (-180..180).step_by(2) {
                let p = polar_to_cartesian(lat as f64, lng as f64, GLOBE_RADIUS);
                if let Some((x, y)) = proj.visible(p) {
                    canvas.plot(x, y, Layer::Grid, color, false);
                }
            }
        }
        for lng in (-180..180).step_by(30) {
            for lat in (-90..=90).step_by(2) {
                let p = polar_to_cartesian(lat as f64, lng as f64, GLOBE_RADIUS);
                if let Some((x, y)) = proj.visible(p) {
                    canvas.plot(x, y, Layer::Grid, color, false);
                }
            }
        }
    }
}

impl RenderEngine for TerminalEngine {
    fn is_ready(&self) -> bool {
        self.canvas.is_some()
    }

    fn apply_outline(&mut self, outline: &OutlineParams) {
        self.outline = Some(outline.clone());
    }

    fn apply_animation(&mut self, animation: &AnimationParams) {
        self.animation = Some(animation.clone());
        self.rings.clear();
    }

    fn apply_rings(&mut self, rings: &[RingDatum]) {
        let born = self.clock;
        self.rings = rings
            .iter()
            .map(|datum| ActiveRing { datum: datum.clone(), born })
            .collect();
    }

    fn apply_material(&mut self, material: &SurfaceMaterial) {
        self.material = *material;
    }

    fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
    }
}

/// Diffuse color at 60% plus the emissive glow
fn surface_tone(material: &SurfaceMaterial) -> Rgb {
    let (base, glow, k) = (material.color, material.emissive, material.emissive_intensity);
    Rgb {
        r: (base.r * 0.6 + glow.r * k).min(1.0),
        g: (base.g * 0.6 + glow.g * k).min(1.0),
        b: (base.b * 0.6 + glow.b * k).min(1.0),
    }
}

/// Limb circle of the atmosphere shell as seen from the camera
fn draw_atmosphere(canvas: &mut DotCanvas, proj: &Projector, view: &CameraView, outline: &OutlineParams) {
    if !outline.show_atmosphere {
        return;
    }
    let shell = GLOBE_RADIUS * (1.0 + outline.atmosphere_altitude.max(0.0));
    let toward = view.position - view.target;
    let distance = toward.length();
    if distance <= shell {
        return;
    }
    let axis = toward / distance;
    let center = view.target + axis * (shell * shell / distance);
    let radius = shell * (1.0 - (shell / distance).powi(2)).sqrt();
    let color = outline.atmosphere_color.to_term();

    let steps = (radius * 4.0).clamp(90.0, 720.0) as usize;
    for i in 0..steps {
        let a = i as f64 / steps as f64 * 2.0 * PI;
        let p = center + (proj.right * a.cos() + proj.up * a.sin()) * radius;
        if let Some((x, y)) = proj.project(p) {
            canvas.plot(x, y, Layer::Atmosphere, color, false);
        }
    }
}

/// Coastlines: resolution sets sample density, margin thins the dots out
fn draw_outline(canvas: &mut DotCanvas, proj: &Projector, outline: &OutlineParams) {
    let color = outline.polygon_color.to_term();
    let samples = outline_samples(outline);
    let stride = 1 + (outline.hex_polygon_margin.clamp(0.0, 1.0) * 2.0).round() as usize;

    for shape in CONTINENTS {
        let mut n = 0usize;
        for pair in shape.windows(2) {
            let ((lat1, lng1), (lat2, lng2)) = (pair[0], pair[1]);
            let a = polar_to_cartesian(lat1, lng1, 1.0);
            let b = polar_to_cartesian(lat2, lng2, 1.0);
            for s in 0..samples {
                n += 1;
                if n % stride != 0 {
                    continue;
                }
                let t = s as f64 / samples as f64;
                let p = slerp(a, b, t) * GLOBE_RADIUS;
                if let Some((x, y)) = proj.visible(p) {
                    canvas.plot(x, y, Layer::Outline, color, false);
                }
            }
        }
    }
}

/// Samples per coastline segment for the configured resolution
fn outline_samples(outline: &OutlineParams) -> usize {
    (6 * (outline.hex_polygon_resolution as usize).saturating_add(1)).min(MAX_OUTLINE_SAMPLES)
}

/// Point footprint radius in dots, never wider than the canvas
fn point_size(canvas: &DotCanvas, radius: f64) -> i32 {
    let extent = canvas.width.max(canvas.height) as f64;
    (radius * 4.0).round().clamp(0.0, extent) as i32
}

fn draw_points(canvas: &mut DotCanvas, proj: &Projector, animation: &AnimationParams) {
    let lift = GLOBE_RADIUS * (1.0 + animation.point_altitude.max(0.0));
    let size = point_size(canvas, animation.point_radius);

    for point in &animation.points {
        let p = polar_to_cartesian(point.lat, point.lng, lift);
        let Some((x, y)) = proj.visible(p) else {
            continue;
        };
        let color = point.rgb.to_term();
        for dy in -size..=size {
            for dx in -size..=size {
                if dx.abs() + dy.abs() <= size {
                    canvas.plot(x.saturating_add(dx), y.saturating_add(dy), Layer::Point, color, false);
                }
            }
        }
    }
}

/// Whether arc fraction `s` is inside a dash at engine time `clock`.
/// The dash pattern repeats every `dash_length + dash_gap` arc lengths and
/// travels one arc length per `dash_animate_time`.
fn in_dash(arc: &ArcParams, s: f64, clock: f64) -> bool {
    let period = arc.dash_length + arc.dash_gap;
    if arc.dash_length <= 0.0 || period <= 0.0 {
        return false;
    }
    let travel = if arc.dash_animate_time > 0.0 {
        clock * 1000.0 / arc.dash_animate_time
    } else {
        0.0
    };
    let head = travel - arc.dash_initial_gap;
    (s - head).rem_euclid(period) < arc.dash_length
}

fn draw_arc(canvas: &mut DotCanvas, proj: &Projector, arc: &ArcParams, clock: f64) {
    let a = polar_to_cartesian(arc.start_lat, arc.start_lng, 1.0);
    let b = polar_to_cartesian(arc.end_lat, arc.end_lng, 1.0);
    let color = arc.color.to_term();
    let bold = arc.stroke >= 0.3;

    for i in 0..=ARC_SAMPLES {
        let s = i as f64 / ARC_SAMPLES as f64;
        if !in_dash(arc, s, clock) {
            continue;
        }
        let height = 1.0 + arc.altitude.max(0.0) * (PI * s).sin();
        let p = slerp(a, b, s) * GLOBE_RADIUS * height;
        if let Some((x, y)) = proj.visible(p) {
            canvas.plot(x, y, Layer::Arc, color, bold);
        }
    }
}

/// Radii (degrees) of the circles a ring shows `age` seconds after it was attached.
/// A new circle starts every repeat period and grows until max radius;
/// at most `MAX_RING_CIRCLES` of the newest are returned.
fn ring_radii(age: f64, animation: &AnimationParams) -> Vec<f64> {
    let speed = animation.ring_propagation_speed;
    let max = animation.ring_max_radius;
    if age < 0.0 || speed <= 0.0 || max <= 0.0 {
        return Vec::new();
    }
    let period = animation.ring_repeat_period / 1000.0;
    if !period.is_finite() || period <= 0.0 {
        let r = age * speed;
        return if r < max { vec![r] } else { Vec::new() };
    }

    // circle k started at k * period; walk the newest ones oldest first
    let last = (age / period).floor();
    (0..MAX_RING_CIRCLES)
        .rev()
        .map(|back| last - back as f64)
        .filter(|&k| k >= 0.0)
        .map(|k| (age - k * period) * speed)
        .filter(|&r| r >= 0.0 && r < max)
        .collect()
}

fn draw_ring(canvas: &mut DotCanvas, proj: &Projector, ring: &ActiveRing, animation: &AnimationParams, clock: f64) {
    let center = polar_to_cartesian(ring.datum.lat, ring.datum.lng, 1.0);
    let east = DVec3::Y.cross(center).normalize_or(DVec3::X);
    let north = center.cross(east);

    for radius in ring_radii(clock - ring.born, animation) {
        let fade: Rgba = ring.datum.color(radius / animation.ring_max_radius);
        let color = fade.to_term();
        let (sin_r, cos_r) = radius.to_radians().sin_cos();
        for i in 0..RING_SAMPLES {
            let a = i as f64 / RING_SAMPLES as f64 * 2.0 * PI;
            let dir = center * cos_r + (east * a.cos() + north * a.sin()) * sin_r;
            if let Some((x, y)) = proj.visible(dir * GLOBE_RADIUS * RING_LIFT) {
                canvas.plot(x, y, Layer::Ring, color, false);
            }
        }
    }
}

fn slerp(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    let dot = a.dot(b).clamp(-1.0, 1.0);
    let omega = dot.acos();
    if omega.abs() < 1e-9 {
        return a;
    }
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-9 {
        // antipodal: go over the pole-ish perpendicular
        let mid = a.any_orthonormal_vector();
        return if t < 0.5 {
            slerp(a, mid, t * 2.0)
        } else {
            slerp(mid, b, (t - 0.5) * 2.0)
        };
    }
    (a * ((1.0 - t) * omega).sin() + b * (t * omega).sin()) / sin_omega
}

fn draw_hud(term: &mut Terminal, hud: &Hud) {
    if hud.is_empty() {
        return;
    }
    let mut row = 0;
    if let Some((rgb, label)) = &hud.swatch {
        term.set_str(1, row, "██", Some(rgb.to_term()), false);
        term.set_str(4, row, label, Some(Color::Grey), false);
        row += 1;
    }
    if let Some(mission) = &hud.mission {
        term.set_str(1, row, mission, Some(Color::White), true);
        row += 1;
    }
    if let Some(position) = &hud.position {
        term.set_str(1, row, position, Some(Color::Grey), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{arc, build};
    use crate::config::AnimationConfig;
    use crate::globe::params::{derive_animation, derive_outline};
    use crate::viewport::{ViewportController, ViewportSettings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn animation() -> AnimationParams {
        let flights = vec![arc((0.0, 0.0), (10.0, 20.0), 1)];
        let points = build(&flights);
        let mut rng = StdRng::seed_from_u64(3);
        derive_animation(&AnimationConfig::default(), &flights, &points, &mut rng)
    }

    fn front_view() -> CameraView {
        let mut vp = ViewportController::new(ViewportSettings {
            auto_rotate: false,
            ..Default::default()
        });
        vp.fly_to(0.0, 0.0, 2.0);
        vp.camera_view()
    }

    #[test]
    fn not_ready_until_sized() {
        let mut engine = TerminalEngine::new();
        assert!(!engine.is_ready());
        engine.resize(80, 24);
        assert!(engine.is_ready());
        engine.resize(0, 24);
        assert!(!engine.is_ready());
    }

    #[test]
    fn animation_clears_rings() {
        let mut engine = TerminalEngine::new();
        let anim = animation();
        engine.apply_rings(&[RingDatum::from_point(0, &anim.points[0])]);
        assert_eq!(engine.ring_count(), 1);
        engine.apply_animation(&anim);
        assert_eq!(engine.ring_count(), 0);
    }

    #[test]
    fn front_of_globe_is_visible_back_is_not() {
        let view = front_view();
        let canvas = DotCanvas::new(80, 24);
        let proj = Projector::new(&view, &canvas);

        let front = polar_to_cartesian(0.0, 0.0, GLOBE_RADIUS);
        let (x, y) = proj.visible(front).unwrap();
        assert_eq!((x, y), (canvas.width as i32 / 2, canvas.height as i32 / 2));

        let back = polar_to_cartesian(0.0, 180.0, GLOBE_RADIUS);
        assert!(proj.visible(back).is_none());
    }

    #[test]
    fn dash_moves_along_the_arc() {
        let arc = ArcParams {
            start_lat: 0.0,
            start_lng: 0.0,
            end_lat: 0.0,
            end_lng: 90.0,
            altitude: 0.1,
            color: Rgb::WHITE,
            stroke: 0.3,
            dash_length: 0.5,
            dash_initial_gap: 1.0,
            dash_gap: 15.0,
            dash_animate_time: 2000.0,
        };
        // held back by the initial gap
        assert!(!in_dash(&arc, 0.25, 0.0));
        // 1.25 arc lengths of travel puts the dash head at s = 0.25
        assert!(in_dash(&arc, 0.25, 2.5));
        assert!(!in_dash(&arc, 0.9, 2.5));
    }

    #[test]
    fn rings_expand_then_repeat() {
        let anim = AnimationParams {
            ring_max_radius: 3.0,
            ring_propagation_speed: 3.0,
            ring_repeat_period: 500.0,
            ..animation()
        };
        assert_eq!(ring_radii(0.0, &anim), vec![0.0]);
        let radii = ring_radii(0.75, &anim);
        assert_eq!(radii.len(), 2);
        assert!((radii[0] - 2.25).abs() < 1e-9);
        assert!((radii[1] - 0.75).abs() < 1e-9);
        assert!(ring_radii(10.0, &anim).iter().all(|&r| r < 3.0));

        let once = AnimationParams { ring_repeat_period: f64::INFINITY, ..anim };
        assert!(ring_radii(2.0, &once).is_empty());
    }

    #[test]
    fn ring_circles_are_capped() {
        let anim = AnimationParams {
            ring_max_radius: 3.0,
            ring_propagation_speed: 3.0,
            ring_repeat_period: 0.0018,
            ..animation()
        };
        let radii = ring_radii(5.0, &anim);
        assert_eq!(radii.len(), MAX_RING_CIRCLES);
        // newest circle is the smallest
        assert!(radii.last().is_some_and(|&r| r < 0.01));
        assert!(radii.iter().all(|&r| r < 3.0));
    }

    #[test]
    fn outline_samples_are_capped() {
        let mut outline = derive_outline(&AnimationConfig::default());
        outline.hex_polygon_resolution = 3;
        assert_eq!(outline_samples(&outline), 24);
        outline.hex_polygon_resolution = u32::MAX;
        assert_eq!(outline_samples(&outline), MAX_OUTLINE_SAMPLES);
    }

    #[test]
    fn huge_point_radius_stays_on_canvas() {
        let mut anim = animation();
        anim.point_radius = 1e9;
        let mut canvas = DotCanvas::new(80, 24);
        assert_eq!(point_size(&canvas, anim.point_radius), 160);
        assert_eq!(point_size(&canvas, -2.0), 0);

        let proj = Projector::new(&front_view(), &canvas);
        draw_points(&mut canvas, &proj, &anim);
        assert!(canvas.dots.iter().any(|d| d.layer == Layer::Point));
    }

    #[test]
    fn draw_puts_braille_and_hud_on_screen() {
        let mut engine = TerminalEngine::new();
        let mut term = Terminal::headless(80, 24);
        engine.resize(80, 24);
        engine.apply_outline(&derive_outline(&AnimationConfig::default()));
        engine.apply_animation(&animation());

        let hud = Hud {
            mission: Some("Recon".into()),
            ..Default::default()
        };
        engine.draw(&mut term, &front_view(), &hud);

        let braille = (0..24)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter_map(|(x, y)| term.cell(x, y))
            .filter(|c| ('\u{2801}'..='\u{28ff}').contains(&c.ch))
            .count();
        assert!(braille > 0);
        assert_eq!(term.cell(1, 0).map(|c| c.ch), Some('R'));
    }

    #[test]
    fn slerp_stays_on_sphere() {
        let a = polar_to_cartesian(0.0, 0.0, 1.0);
        let b = polar_to_cartesian(0.0, 180.0, 1.0);
        for i in 0..=10 {
            let p = slerp(a, b, i as f64 / 10.0);
            assert!((p.length() - 1.0).abs() < 1e-9);
        }
    }
}

//! CSS color parsing and HSL math for the globe material and fade colors.

use crossterm::style::Color;
use serde::{Serialize, Serializer};
use std::fmt;

/// An RGB color with channels in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// RGB plus alpha, displayed as a CSS `rgba()` string
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f64,
}

/// Hue (0..1 turns), saturation and lightness
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Color presets cycled with the `c` key
pub const GLOBE_PRESETS: [&str; 6] = [
    "#3b42ec", // indigo
    "#0f766e", // teal
    "#b91c1c", // crimson
    "#a16207", // amber
    "#6d28d9", // violet
    "#334155", // slate
];

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self::from_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_u8(self) -> (u8, u8, u8) {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { rgb: self, a }
    }

    pub fn hex_string(self) -> String {
        let (r, g, b) = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (min + max) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l <= 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };
        let h = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        Hsl { h: h / 6.0, s, l }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(1.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self { r: l, g: l, b: l };
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;
        Self {
            r: hue_to_channel(q, p, h + 1.0 / 3.0),
            g: hue_to_channel(q, p, h),
            b: hue_to_channel(q, p, h - 1.0 / 3.0),
        }
    }

    /// Shift hue, saturation and lightness; saturation and lightness clamp to 0..1.
    pub fn offset_hsl(self, dh: f64, ds: f64, dl: f64) -> Self {
        let hsl = self.to_hsl();
        Self::from_hsl(Hsl {
            h: hsl.h + dh,
            s: hsl.s + ds,
            l: hsl.l + dl,
        })
    }

    /// Terminal truecolor equivalent
    pub fn to_term(self) -> Color {
        let (r, g, b) = self.to_u8();
        Color::Rgb { r, g, b }
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

impl Rgba {
    /// Premultiply against a black background for terminal output
    pub fn to_term(self) -> Color {
        let a = self.a.clamp(0.0, 1.0);
        Rgb {
            r: self.rgb.r * a,
            g: self.rgb.g * a,
            b: self.rgb.b * a,
        }
        .to_term()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb.to_u8();
        write!(f, "rgba({}, {}, {}, {})", r, g, b, self.a)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex_string())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse `#rgb`, `#rrggbb`, bare `rrggbb`, `rgb()`, `rgba()` or a CSS color name.
pub fn parse_color(input: &str) -> Option<Rgba> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).map(|c| c.with_alpha(1.0));
    }

    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb(")) {
        return parse_functional(body.strip_suffix(')')?);
    }

    if let Some(rgb) = named_color(&lower) {
        return Some(rgb.with_alpha(1.0));
    }

    parse_hex(s).map(|c| c.with_alpha(1.0))
}

/// Parse an opaque color, dropping any alpha component.
pub fn parse_rgb(input: &str) -> Option<Rgb> {
    parse_color(input).map(|c| c.rgb)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(Rgb::from_hex),
        3 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            let expand = |n: u32| ((n & 0xf) * 17) as u8;
            Some(Rgb::from_u8(expand(v >> 8), expand(v >> 4), expand(v)))
        }
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v = s.parse::<f64>().ok()?;
        v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(s) => s.parse::<f64>().ok().filter(|a| a.is_finite())?.clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(Rgb::from_u8(r, g, b).with_alpha(a))
}

fn named_color(name: &str) -> Option<Rgb> {
    let hex = match name {
        "black" => 0x000000,
        "white" => 0xffffff,
        "red" => 0xff0000,
        "lime" => 0x00ff00,
        "green" => 0x008000,
        "blue" => 0x0000ff,
        "yellow" => 0xffff00,
        "cyan" | "aqua" => 0x00ffff,
        "magenta" | "fuchsia" => 0xff00ff,
        "orange" => 0xffa500,
        "purple" => 0x800080,
        "pink" => 0xffc0cb,
        "gray" | "grey" => 0x808080,
        "silver" => 0xc0c0c0,
        "navy" => 0x000080,
        "teal" => 0x008080,
        "maroon" => 0x800000,
        "olive" => 0x808000,
        "indigo" => 0x4b0082,
        "violet" => 0xee82ee,
        "gold" => 0xffd700,
        "crimson" => 0xdc143c,
        "royalblue" => 0x4169e1,
        "skyblue" => 0x87ceeb,
        "midnightblue" => 0x191970,
        _ => return None,
    };
    Some(Rgb::from_hex(hex))
}

//! Score-driven color themes
//!
//! The score picks one of seven palettes, cycling every
//! `PALETTES.len() * THEME_SCORE_GAP` points. Switching palettes animates
//! every color channel linearly over `THEME_TRANSITION_MS`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{THEME_SCORE_GAP, THEME_TRANSITION_MS};
use crate::lerp;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel interpolation, rounded to the nearest integer
    pub fn lerp(self, to: Rgb, t: f32) -> Rgb {
        let channel = |a: u8, b: u8| lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(self.r, to.r), channel(self.g, to.g), channel(self.b, to.b))
    }
}

/// How a color is written as a CSS value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorFormat {
    /// `#rrggbb`
    Hex,
    /// `r, g, b` (for use inside `rgba(...)`)
    Triple,
}

/// A theme color together with its CSS format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub rgb: Rgb,
    pub format: ColorFormat,
}

impl ThemeColor {
    pub const fn hex(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            format: ColorFormat::Hex,
        }
    }

    pub const fn triple(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            format: ColorFormat::Triple,
        }
    }

    /// Parse `#rgb`, `#rrggbb` or `r, g, b`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return None,
            };
            let value = u32::from_str_radix(&expanded, 16).ok()?;
            return Some(Self::hex(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ));
        }

        let mut parts = s.split(',').map(|p| p.trim().parse::<u8>().ok());
        let (r, g, b) = (parts.next()??, parts.next()??, parts.next()??);
        if parts.next().is_some() {
            return None;
        }
        Some(Self::triple(r, g, b))
    }

    /// Interpolate toward `to`, written in `to`'s format
    pub fn lerp(self, to: ThemeColor, t: f32) -> ThemeColor {
        ThemeColor {
            rgb: self.rgb.lerp(to.rgb, t),
            format: to.format,
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.rgb;
        match self.format {
            ColorFormat::Hex => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            ColorFormat::Triple => write!(f, "{}, {}, {}", r, g, b),
        }
    }
}

/// The six themed colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub bg_color: ThemeColor,
    pub platform_color: ThemeColor,
    pub particle_color: ThemeColor,
    pub arrow_primary: ThemeColor,
    pub arrow_secondary: ThemeColor,
    pub arrow_accent: ThemeColor,
}

impl ColorTheme {
    pub fn lerp(&self, to: &ColorTheme, t: f32) -> ColorTheme {
        ColorTheme {
            bg_color: self.bg_color.lerp(to.bg_color, t),
            platform_color: self.platform_color.lerp(to.platform_color, t),
            particle_color: self.particle_color.lerp(to.particle_color, t),
            arrow_primary: self.arrow_primary.lerp(to.arrow_primary, t),
            arrow_secondary: self.arrow_secondary.lerp(to.arrow_secondary, t),
            arrow_accent: self.arrow_accent.lerp(to.arrow_accent, t),
        }
    }

    /// CSS custom properties for this theme
    pub fn css_vars(&self) -> [(&'static str, String); 6] {
        [
            ("--bg-color", self.bg_color.to_string()),
            ("--platform-color", self.platform_color.to_string()),
            ("--particle-color", self.particle_color.to_string()),
            ("--arrow-primary", self.arrow_primary.to_string()),
            ("--arrow-secondary", self.arrow_secondary.to_string()),
            ("--arrow-accent", self.arrow_accent.to_string()),
        ]
    }
}

const fn palette(bg: Rgb, accent_dark: Rgb, primary: Rgb, bright: Rgb) -> ColorTheme {
    ColorTheme {
        bg_color: ThemeColor::hex(bg.r, bg.g, bg.b),
        platform_color: ThemeColor::hex(bright.r, bright.g, bright.b),
        particle_color: ThemeColor::triple(bright.r, bright.g, bright.b),
        arrow_primary: ThemeColor::hex(primary.r, primary.g, primary.b),
        arrow_secondary: ThemeColor::hex(bright.r, bright.g, bright.b),
        arrow_accent: ThemeColor::hex(accent_dark.r, accent_dark.g, accent_dark.b),
    }
}

/// Palettes in score order: green, blue, indigo, violet, red, orange, yellow
pub const PALETTES: [ColorTheme; 7] = [
    palette(Rgb::new(0x09, 0x1c, 0x1e), Rgb::new(0x0b, 0x50, 0x27), Rgb::new(0x34, 0xac, 0x80), Rgb::new(0x4b, 0xea, 0x69)),
    palette(Rgb::new(0x05, 0x1a, 0x2e), Rgb::new(0x0b, 0x27, 0x50), Rgb::new(0x34, 0x69, 0xac), Rgb::new(0x4b, 0x8a, 0xea)),
    palette(Rgb::new(0x13, 0x0a, 0x36), Rgb::new(0x1f, 0x0b, 0x50), Rgb::new(0x58, 0x34, 0xac), Rgb::new(0x7c, 0x4b, 0xea)),
    palette(Rgb::new(0x2e, 0x05, 0x33), Rgb::new(0x50, 0x0b, 0x50), Rgb::new(0xa4, 0x34, 0xac), Rgb::new(0xd4, 0x4b, 0xea)),
    palette(Rgb::new(0x35, 0x05, 0x05), Rgb::new(0x50, 0x0b, 0x0b), Rgb::new(0xac, 0x34, 0x34), Rgb::new(0xea, 0x4b, 0x4b)),
    palette(Rgb::new(0x36, 0x1a, 0x05), Rgb::new(0x50, 0x2d, 0x0b), Rgb::new(0xac, 0x72, 0x34), Rgb::new(0xea, 0x9a, 0x4b)),
    palette(Rgb::new(0x2e, 0x2e, 0x05), Rgb::new(0x50, 0x50, 0x0b), Rgb::new(0xac, 0xaa, 0x34), Rgb::new(0xea, 0xe4, 0x4b)),
];

/// Score span of one full pass through the palettes
pub const THEME_CYCLE_LENGTH: u64 = PALETTES.len() as u64 * THEME_SCORE_GAP;

/// Palette index for a score
pub fn theme_index(score: u64) -> usize {
    ((score % THEME_CYCLE_LENGTH) / THEME_SCORE_GAP) as usize
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: ColorTheme,
    to: ColorTheme,
    start_ms: f64,
}

/// Tracks the active palette and animates changes between palettes
///
/// At most one transition runs at a time; palette changes requested while
/// one is in flight are picked up on a later `update` once it finishes.
pub struct ThemeEngine {
    index: usize,
    current: ColorTheme,
    transition: Option<Transition>,
    instant: bool,
    on_complete: Option<Box<dyn FnMut(usize)>>,
}

impl Default for ThemeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeEngine {
    pub fn new() -> Self {
        Self {
            index: 0,
            current: PALETTES[0],
            transition: None,
            instant: false,
            on_complete: None,
        }
    }

    /// Skip animations and apply palette changes immediately
    pub fn set_instant(&mut self, instant: bool) {
        self.instant = instant;
    }

    /// Called with the palette index whenever a transition completes
    pub fn on_complete(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Index of the palette being shown or animated toward
    pub fn index(&self) -> usize {
        self.index
    }

    /// Colors as of the last `step`
    pub fn current(&self) -> &ColorTheme {
        &self.current
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// React to a new score; returns `true` if a transition started
    pub fn update(&mut self, score: u64, now_ms: f64) -> bool {
        let target = theme_index(score);
        if target == self.index || self.transition.is_some() {
            return false;
        }

        log::debug!("Theme {} -> {} at score {}", self.index, target, score);
        self.index = target;
        self.transition = Some(Transition {
            from: self.current,
            to: PALETTES[target],
            start_ms: now_ms,
        });
        if self.instant {
            self.finish();
        }
        true
    }

    /// Advance the running transition; returns `true` when it completes
    pub fn step(&mut self, now_ms: f64) -> bool {
        let Some(tr) = self.transition else {
            return false;
        };
        let t = ((now_ms - tr.start_ms) / THEME_TRANSITION_MS).clamp(0.0, 1.0);
        if t < 1.0 {
            self.current = tr.from.lerp(&tr.to, t as f32);
            false
        } else {
            self.finish();
            true
        }
    }

    fn finish(&mut self) {
        if let Some(tr) = self.transition.take() {
            self.current = tr.to;
            if let Some(cb) = self.on_complete.as_mut() {
                cb(self.index);
            }
        }
    }
}

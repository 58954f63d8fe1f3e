use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ConfiguratorError, Result};

/// Swatches offered by the color picker.
pub const PALETTE: [&str; 5] = ["#6366f1", "#ec4899", "#14b8a6", "#f59e0b", "#64748b"];

/// Product tier. Controls the material policy and the specification sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Standard,
    Premium,
    Enterprise,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Standard, Variant::Premium, Variant::Enterprise];

    /// Parses a variant name coming from the widget layer. Names are matched
    /// case-insensitively and anything unrecognised maps to
    /// [`Variant::Standard`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "premium" => Variant::Premium,
            "enterprise" => Variant::Enterprise,
            _ => Variant::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Premium => "premium",
            Variant::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color exactly as supplied by the caller, usually a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes `#rgb`, `#rrggbb` or `rgb(r, g, b)` into normalised RGB
    /// components. Functional channels are integers in `0..=255` or
    /// percentages.
    pub fn to_rgb(&self) -> Result<[f32; 3]> {
        let text = self.0.trim();
        let channels = match text.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => parse_functional(text),
        }
        .ok_or_else(|| ConfiguratorError::InvalidColor(self.0.clone()))?;

        Ok(channels.map(|channel| channel as f32 / 255.0))
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    if !hex.is_ascii() {
        return None;
    }
    let mut channels = [0u8; 3];
    match hex.len() {
        3 => {
            for (channel, digit) in channels.iter_mut().zip(hex.chars()) {
                *channel = (digit.to_digit(16)? * 17) as u8;
            }
        }
        6 => {
            for (i, channel) in channels.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
        }
        _ => return None,
    }
    Some(channels)
}

fn parse_functional(text: &str) -> Option<[u8; 3]> {
    let lower = text.to_ascii_lowercase();
    let body = lower.strip_prefix("rgb")?.trim_start();
    let body = body.strip_prefix('(')?.strip_suffix(')')?;

    let mut parts = body.split(',').map(str::trim);
    let mut channels = [0u8; 3];
    for channel in channels.iter_mut() {
        *channel = parse_channel(parts.next()?)?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(channels),
    }
}

fn parse_channel(part: &str) -> Option<u8> {
    match part.strip_suffix('%') {
        Some(percent) => {
            let value: f32 = percent.trim().parse().ok()?;
            (0.0..=100.0)
                .contains(&value)
                .then(|| (value * 2.55).round() as u8)
        }
        None => part.parse().ok(),
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(PALETTE[0])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Bounds of the size slider. Clamping belongs to the input surface; the
/// configuration holder stores whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ScaleRange {
    pub const SLIDER: ScaleRange = ScaleRange {
        min: 0.5,
        max: 1.5,
        step: 0.1,
    };

    /// Checks that the range is usable by a slider: finite, positive,
    /// `min <= max` and a non-negative step.
    pub fn validate(&self) -> Result<()> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.step.is_finite();
        if !finite || self.min <= 0.0 || self.min > self.max || self.step < 0.0 {
            return Err(ConfiguratorError::InvalidScaleRange {
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Clamps `value` into the range and snaps it to the nearest step.
    /// Never panics, even for a range that fails [`ScaleRange::validate`].
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let bounded = value.max(self.min).min(self.max);
        if self.step.is_nan() || self.step <= 0.0 {
            return bounded;
        }
        let steps = ((bounded - self.min) / self.step).round();
        (self.min + steps * self.step).max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::SLIDER
    }
}

/// The user's current choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub color: Color,
    pub scale: f32,
    pub variant: Variant,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            color: Color::default(),
            scale: 1.0,
            variant: Variant::Standard,
        }
    }
}

/// Discrete change notification emitted by an input widget.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    ColorChanged(String),
    ScaleChanged(f32),
    VariantChanged(String),
}

/// Holds the live [`Selection`]. Every setter takes effect immediately and
/// the three fields never constrain one another.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationState {
    selection: Selection,
}

impl ConfigurationState {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.selection.color = color.into();
    }

    /// Stores `scale` untouched; bounds are enforced by the slider.
    pub fn set_scale(&mut self, scale: f32) {
        self.selection.scale = scale;
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.selection.variant = variant;
    }

    pub fn apply(&mut self, event: SelectionEvent) {
        tracing::debug!(?event, "selection changed");
        match event {
            SelectionEvent::ColorChanged(color) => self.set_color(Color::new(color)),
            SelectionEvent::ScaleChanged(scale) => self.set_scale(scale),
            SelectionEvent::VariantChanged(variant) => {
                self.set_variant(Variant::parse_lenient(&variant))
            }
        }
    }

    pub fn on_color_change(&mut self, color: &str) {
        self.apply(SelectionEvent::ColorChanged(color.to_string()));
    }

    pub fn on_scale_change(&mut self, scale: f32) {
        self.apply(SelectionEvent::ScaleChanged(scale));
    }

    pub fn on_variant_change(&mut self, variant: &str) {
        self.apply(SelectionEvent::VariantChanged(variant.to_string()));
    }
}

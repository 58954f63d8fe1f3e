use serde::{Deserialize, Serialize};

use crate::{Color, Variant};

/// Surface properties handed to the renderer for shading the product mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialParameters {
    pub base_color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive_color: Option<Color>,
    pub emissive_intensity: f32,
}

impl MaterialParameters {
    /// Derives the material for a product tier. Every tier keeps the chosen
    /// color as its base color; only the enterprise tier glows.
    pub fn for_variant(variant: Variant, color: &Color) -> Self {
        let (metalness, roughness) = match variant {
            Variant::Standard => (0.1, 0.8),
            Variant::Premium => (0.7, 0.2),
            Variant::Enterprise => (0.9, 0.1),
        };

        let (emissive_color, emissive_intensity) = match variant {
            Variant::Enterprise => (Some(color.clone()), 0.2),
            Variant::Standard | Variant::Premium => (None, 0.0),
        };

        Self {
            base_color: color.clone(),
            metalness,
            roughness,
            emissive_color,
            emissive_intensity,
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive_color.is_some() && self.emissive_intensity > 0.0
    }
}

/// String-keyed entry point used by the widget layer. Unrecognised variant
/// names receive the standard material.
pub fn material_for(variant: &str, color: &str) -> MaterialParameters {
    MaterialParameters::for_variant(Variant::parse_lenient(variant), &Color::new(color))
}

/// Memoises [`MaterialParameters::for_variant`] for the most recent
/// `(variant, color)` pair. Only one entry is kept, so a stream of distinct
/// colors never grows the cache.
#[derive(Debug, Default, Clone)]
pub struct MaterialCache {
    last: Option<((Variant, Color), MaterialParameters)>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, variant: Variant, color: &Color) -> &MaterialParameters {
        let hit = matches!(
            &self.last,
            Some(((cached_variant, cached_color), _))
                if *cached_variant == variant && cached_color == color
        );
        if !hit {
            self.last = None;
        }

        &self
            .last
            .get_or_insert_with(|| {
                (
                    (variant, color.clone()),
                    MaterialParameters::for_variant(variant, color),
                )
            })
            .1
    }

    pub fn len(&self) -> usize {
        usize::from(self.last.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

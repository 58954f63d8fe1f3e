use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::assets::{DEFAULT_ASSET_PATH, DEFAULT_MESH_NODE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: [f32; 3],
    pub fov_degrees: f32,
}

/// Limits for the drag-to-rotate controls wrapped around the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationControls {
    pub zoom: f32,
    /// Allowed pitch range in radians.
    pub polar: [f32; 2],
    /// Allowed yaw range in radians.
    pub azimuth: [f32; 2],
}

impl PresentationControls {
    /// Clamps a user drag `(pitch, yaw)` to the allowed ranges.
    pub fn constrain(&self, pitch: f32, yaw: f32) -> (f32, f32) {
        (
            pitch.clamp(self.polar[0], self.polar[1]),
            yaw.clamp(self.azimuth[0], self.azimuth[1]),
        )
    }
}

/// Fixed staging of the configurator viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub name: String,
    pub camera: Camera,
    pub controls: PresentationControls,
    pub environment: String,
    pub asset_path: String,
    pub mesh_node: String,
    /// Euler rotation applied to the mesh beneath the animated turntable.
    pub mesh_rotation: [f32; 3],
}

impl SceneDescriptor {
    pub fn product_showcase() -> Self {
        Self {
            name: "Product Showcase".to_string(),
            camera: Camera {
                position: [0.0, 0.0, 5.0],
                fov_degrees: 45.0,
            },
            controls: PresentationControls {
                zoom: 0.8,
                polar: [-FRAC_PI_4, FRAC_PI_4],
                azimuth: [-FRAC_PI_4, FRAC_PI_4],
            },
            environment: "studio".to_string(),
            asset_path: DEFAULT_ASSET_PATH.to_string(),
            mesh_node: DEFAULT_MESH_NODE.to_string(),
            mesh_rotation: [FRAC_PI_2, 0.0, 0.0],
        }
    }
}

impl Default for SceneDescriptor {
    fn default() -> Self {
        Self::product_showcase()
    }
}

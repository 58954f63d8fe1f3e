//! Core library for the 3D product configurator.
//!
//! The crate turns a user's selection (color, size and product tier) into
//! what a renderer needs each frame: the shared product model, the material
//! derived from the selection, the requested scale and the turntable
//! orientation. Rendering, widgets and model decoding beyond the container
//! header are left to the host.

pub mod assets;
pub mod config;
pub mod error;
pub mod material;
pub mod render;
pub mod scene;
pub mod selection;
pub mod specs;
pub mod timeline;

pub use assets::{AssetLoader, AssetStore, FileAssetLoader, StaticAsset};
pub use config::{AppConfig, AssetConfig, RenderConfig, SelectionDefaults};
pub use error::{ConfiguratorError, Result};
pub use material::{material_for, MaterialCache, MaterialParameters};
pub use render::{Frame, RenderLoop, Renderer};
pub use scene::{Camera, PresentationControls, SceneDescriptor};
pub use selection::{Color, ConfigurationState, ScaleRange, Selection, SelectionEvent, Variant};
pub use specs::SpecSheet;
pub use timeline::{orientation_at, Orientation, SceneClock, ROTATION_RATE};

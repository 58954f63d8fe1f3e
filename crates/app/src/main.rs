use std::{path::PathBuf, thread, time::Duration};

use clap::{Parser, Subcommand};
use product_configurator_core::{
    material_for, AppConfig, AssetStore, ConfigurationState, FileAssetLoader, Frame,
    RenderLoop, Renderer, SceneClock, SceneDescriptor, SpecSheet, Variant,
};
use tracing_subscriber::EnvFilter;

fn main() -> product_configurator_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Preview {
            color,
            scale,
            variant,
            frames,
            fps,
            realtime,
        } => {
            let mut state = ConfigurationState::new(config.defaults.selection());
            if let Some(color) = color {
                state.on_color_change(&color);
            }
            if let Some(scale) = scale {
                // The CLI stands in for the size slider, so it owns the bounds.
                state.on_scale_change(config.defaults.scale_range.clamp(scale));
            }
            if let Some(variant) = variant {
                state.on_variant_change(&variant);
            }
            let fps = fps.unwrap_or(config.render.frames_per_second).max(1);
            run_preview(&config, &state, frames, fps, realtime)
        }
        Commands::Material { variant, color } => {
            let color = color.unwrap_or_else(|| config.defaults.color.to_string());
            let material = material_for(&variant, &color);
            println!("{}", serde_json::to_string_pretty(&material)?);
            Ok(())
        }
        Commands::Specs { variant } => {
            let sheet = SpecSheet::for_variant(Variant::parse_lenient(&variant));
            println!("{}", serde_json::to_string_pretty(&sheet)?);
            Ok(())
        }
    }
}

fn run_preview(
    config: &AppConfig,
    state: &ConfigurationState,
    frames: u32,
    fps: u32,
    realtime: bool,
) -> product_configurator_core::Result<()> {
    let selection = state.selection();
    tracing::info!(
        color = %selection.color,
        scale = selection.scale,
        variant = %selection.variant,
        frames,
        fps,
        "starting preview"
    );

    let mut scene = SceneDescriptor::product_showcase();
    scene.asset_path = config.asset.path.clone();

    let mut render_loop = RenderLoop::for_scene(&scene, config.render.rotation_rate);
    let mut assets = AssetStore::new(FileAssetLoader::new(&config.asset.root));
    match assets.resolve_scene_asset(&scene) {
        Ok(asset) => render_loop.attach_asset(asset),
        Err(err) => {
            tracing::warn!(%err, path = %scene.asset_path, "model unavailable, nothing will be drawn")
        }
    }

    let frame_time = 1.0 / fps as f32;
    let mut clock = SceneClock::new();
    let mut renderer = LogRenderer::default();

    for _ in 0..frames {
        render_loop.render(clock.elapsed(), selection, &mut renderer)?;
        if realtime {
            thread::sleep(Duration::from_secs_f32(frame_time));
        }
        clock.advance(frame_time);
    }

    render_loop.teardown();
    tracing::info!(
        drawn = renderer.frames,
        elapsed = clock.elapsed(),
        "preview finished"
    );
    Ok(())
}

/// Headless renderer that reports each frame through `tracing`.
#[derive(Debug, Default)]
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame) -> product_configurator_core::Result<()> {
        let rgb = frame.material.base_color.to_rgb()?;
        self.frames += 1;
        tracing::debug!(
            model = frame.asset.path(),
            elapsed = frame.elapsed,
            yaw = frame.orientation.wrapped(),
            scale = frame.scale,
            ?rgb,
            metalness = frame.material.metalness,
            roughness = frame.material.roughness,
            emissive = frame.material.emissive_intensity,
            "frame"
        );
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "3D product configurator", long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the turntable headless and log every frame.
    Preview {
        #[arg(long)]
        color: Option<String>,
        /// Model scale; clamped to the slider range.
        #[arg(long)]
        scale: Option<f32>,
        /// standard, premium or enterprise.
        #[arg(long)]
        variant: Option<String>,
        /// Number of frames to draw.
        #[arg(long, default_value_t = 120)]
        frames: u32,
        #[arg(long)]
        fps: Option<u32>,
        /// Pace frames against the wall clock instead of simulating time.
        #[arg(long)]
        realtime: bool,
    },
    /// Print the material derived for a variant and color.
    Material {
        #[arg(long, default_value = "standard")]
        variant: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Print the hardware specification sheet of a variant.
    Specs {
        #[arg(long, default_value = "standard")]
        variant: String,
    },
}

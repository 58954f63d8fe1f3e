use std::sync::Arc;

use crate::{
    assets::StaticAsset,
    material::{MaterialCache, MaterialParameters},
    scene::SceneDescriptor,
    timeline::{orientation_with_rate, Orientation, ROTATION_RATE},
    Result, Selection,
};

/// Everything a renderer needs to draw one frame of the configurator.
#[derive(Debug, Clone)]
pub struct Frame {
    pub asset: Arc<StaticAsset>,
    pub material: MaterialParameters,
    pub scale: f32,
    pub orientation: Orientation,
    /// Static rotation of the mesh inside the turntable group.
    pub mesh_rotation: [f32; 3],
    pub elapsed: f32,
}

impl Frame {
    /// Euler rotation of the turntable group.
    pub fn model_rotation(&self) -> [f32; 3] {
        [0.0, self.orientation.angle, 0.0]
    }
}

/// Scene-graph backend that turns frames into pixels.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<()>;
}

/// Drives the turntable animation. The loop produces nothing until a model
/// is attached and stops for good once torn down.
#[derive(Debug)]
pub struct RenderLoop {
    rate: f32,
    mesh_rotation: [f32; 3],
    asset: Option<Arc<StaticAsset>>,
    materials: MaterialCache,
    running: bool,
    frames_drawn: u64,
}

impl RenderLoop {
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            mesh_rotation: [0.0; 3],
            asset: None,
            materials: MaterialCache::new(),
            running: true,
            frames_drawn: 0,
        }
    }

    pub fn for_scene(scene: &SceneDescriptor, rate: f32) -> Self {
        let mut render_loop = Self::new(rate);
        render_loop.mesh_rotation = scene.mesh_rotation;
        render_loop
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn attach_asset(&mut self, asset: Arc<StaticAsset>) {
        if !self.running {
            tracing::warn!(path = asset.path(), "ignoring model for a torn down render loop");
            return;
        }
        tracing::debug!(path = asset.path(), "model attached to render loop");
        self.asset = Some(asset);
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Builds the frame for `elapsed` seconds after mount, or `None` while
    /// the model is still missing or after teardown.
    pub fn tick(&mut self, elapsed: f32, selection: &Selection) -> Option<Frame> {
        if !self.running {
            return None;
        }
        let asset = Arc::clone(self.asset.as_ref()?);
        let material = self
            .materials
            .get(selection.variant, &selection.color)
            .clone();

        Some(Frame {
            asset,
            material,
            scale: selection.scale,
            orientation: orientation_with_rate(elapsed, self.rate),
            mesh_rotation: self.mesh_rotation,
            elapsed,
        })
    }

    /// Ticks and hands the frame to `renderer`. Returns whether anything was
    /// drawn.
    pub fn render(
        &mut self,
        elapsed: f32,
        selection: &Selection,
        renderer: &mut dyn Renderer,
    ) -> Result<bool> {
        match self.tick(elapsed, selection) {
            Some(frame) => {
                renderer.draw(&frame)?;
                self.frames_drawn += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stops the loop and releases the model handle.
    pub fn teardown(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames_drawn, "render loop torn down");
        }
        self.running = false;
        self.asset = None;
        self.materials.clear();
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(ROTATION_RATE)
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{assets::sample_glb, ConfigurationState, ConfiguratorError};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Frame>,
    }

    impl Renderer for RecordingRenderer {
        fn draw(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn draw(&mut self, _frame: &Frame) -> Result<()> {
            Err(ConfiguratorError::msg("device lost"))
        }
    }

    /// Converts colors the way a GPU backend would before uploading uniforms.
    #[derive(Default)]
    struct ShadingRenderer {
        base_colors: Vec<[f32; 3]>,
    }

    impl Renderer for ShadingRenderer {
        fn draw(&mut self, frame: &Frame) -> Result<()> {
            self.base_colors.push(frame.material.base_color.to_rgb()?);
            Ok(())
        }
    }

    fn model() -> Arc<StaticAsset> {
        Arc::new(StaticAsset::from_glb("duck.glb", &sample_glb("{}", None)).unwrap())
    }

    #[test]
    fn renders_nothing_until_model_is_attached() {
        let mut render_loop = RenderLoop::default();
        let mut renderer = RecordingRenderer::default();
        let selection = Selection::default();

        assert!(!render_loop.render(0.5, &selection, &mut renderer).unwrap());
        assert!(renderer.frames.is_empty());

        render_loop.attach_asset(model());
        assert!(render_loop.render(0.6, &selection, &mut renderer).unwrap());
        assert_eq!(renderer.frames.len(), 1);
    }

    #[test]
    fn orientation_follows_elapsed_time_only() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());
        let mut state = ConfigurationState::default();

        let before = render_loop.tick(5.0, state.selection()).unwrap();
        state.on_variant_change("enterprise");
        state.on_color_change("#ff0000");
        let after = render_loop.tick(5.0, state.selection()).unwrap();

        assert_relative_eq!(before.orientation.angle, 1.0, epsilon = 1e-6);
        assert_eq!(before.orientation, after.orientation);
        assert_eq!(after.model_rotation()[1], after.orientation.angle);
    }

    #[test]
    fn selection_changes_show_up_on_next_frame() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());
        let mut state = ConfigurationState::default();

        state.on_variant_change("premium");
        state.on_color_change("#00ff00");
        let frame = render_loop.tick(0.0, state.selection()).unwrap();
        assert_eq!(frame.material, crate::material_for("premium", "#00ff00"));
    }

    #[test]
    fn boundary_scales_pass_through_unmodified() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());
        let mut renderer = RecordingRenderer::default();
        let mut state = ConfigurationState::default();

        for scale in [0.5, 1.5] {
            state.on_scale_change(scale);
            render_loop
                .render(1.0, state.selection(), &mut renderer)
                .unwrap();
        }

        let scales: Vec<f32> = renderer.frames.iter().map(|frame| frame.scale).collect();
        assert_eq!(scales, vec![0.5, 1.5]);
    }

    #[test]
    fn frames_share_one_model() {
        let asset = model();
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(Arc::clone(&asset));
        let selection = Selection::default();

        let a = render_loop.tick(0.0, &selection).unwrap();
        let b = render_loop.tick(1.0, &selection).unwrap();
        assert!(Arc::ptr_eq(&a.asset, &asset));
        assert!(Arc::ptr_eq(&a.asset, &b.asset));
    }

    #[test]
    fn teardown_stops_frames_and_releases_model() {
        let asset = model();
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(Arc::clone(&asset));
        let mut renderer = RecordingRenderer::default();
        let selection = Selection::default();

        render_loop.render(0.0, &selection, &mut renderer).unwrap();
        render_loop.teardown();

        assert!(!render_loop.is_running());
        assert!(!render_loop.render(1.0, &selection, &mut renderer).unwrap());
        assert_eq!(renderer.frames.len(), 1);
        drop(renderer);
        assert_eq!(Arc::strong_count(&asset), 1);

        render_loop.attach_asset(Arc::clone(&asset));
        assert!(!render_loop.has_asset());
    }

    #[test]
    fn renderer_errors_propagate() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());

        let err = render_loop
            .render(0.0, &Selection::default(), &mut FailingRenderer)
            .unwrap_err();
        assert!(format!("{err}").contains("device lost"));
        assert_eq!(render_loop.frames_drawn(), 0);
    }

    #[test]
    fn scene_supplies_mesh_rotation() {
        let scene = SceneDescriptor::product_showcase();
        let mut render_loop = RenderLoop::for_scene(&scene, ROTATION_RATE);
        render_loop.attach_asset(model());

        let frame = render_loop.tick(0.0, &Selection::default()).unwrap();
        assert_eq!(frame.mesh_rotation, scene.mesh_rotation);
        assert_eq!(render_loop.rate(), ROTATION_RATE);
    }

    #[test]
    fn functional_rgb_colors_reach_the_renderer() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());
        let mut renderer = ShadingRenderer::default();
        let mut state = ConfigurationState::default();

        state.on_color_change("rgb(255, 0, 0)");
        assert!(render_loop
            .render(0.0, state.selection(), &mut renderer)
            .unwrap());
        state.on_color_change("#00ff00");
        assert!(render_loop
            .render(0.1, state.selection(), &mut renderer)
            .unwrap());

        assert_eq!(renderer.base_colors, vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    }

    #[test]
    fn material_memo_stays_bounded_while_colors_change() {
        let mut render_loop = RenderLoop::default();
        render_loop.attach_asset(model());
        let mut state = ConfigurationState::default();

        for i in 0..5_000u32 {
            state.on_color_change(&format!("#{i:06x}"));
            let frame = render_loop.tick(i as f32 * 0.016, state.selection()).unwrap();
            assert_eq!(frame.material.base_color, state.selection().color);
        }

        assert!(render_loop.materials.len() <= 1);
    }
}

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{
    FPS_FAIR, FPS_GOOD, MAGNETIC_BUTTON_MARGIN, MAGNETIC_STRENGTH, TARGET_FPS,
};
use crate::effects::{CursorTrail, InteractiveRegistry, MagneticButton, PageLoader, Parallax};
use crate::gpu::{FrameBatch, GpuContext, RenderPipeline, SceneBuffers};
use crate::simulation::{FrameThrottle, ParticleField, PointerState};
use crate::viewport::Viewport;

const WINDOW_TITLE: &str = "Particle Field";

/// GPU side of the app, only present when a drawing surface was acquired
struct Renderer {
    gpu: GpuContext,
    buffers: SceneBuffers,
    pipeline: RenderPipeline,
    bind_group: wgpu::BindGroup,
    frame: FrameBatch,
}

impl Renderer {
    fn new(gpu: GpuContext, pixel_ratio: f32) -> Self {
        let grain_seed = rand::thread_rng().gen_range(0.0..1000.0);
        let buffers = SceneBuffers::new(&gpu.device, grain_seed);
        let pipeline = RenderPipeline::new(&gpu.device, gpu.format());
        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers.params_buffer);

        Self {
            gpu,
            buffers,
            pipeline,
            bind_group,
            frame: FrameBatch::new(pixel_ratio),
        }
    }

    /// Upload the recorded frame and present it
    fn present(&mut self, viewport: &Viewport) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let runs = self.buffers.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &self.frame,
            viewport,
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        self.pipeline
            .draw(&mut encoder, &view, &self.bind_group, &self.buffers, &runs);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Everything that animates. Owned by the app, created with the renderer
/// and dropped at teardown; handlers reach it only through `App`.
struct Scene {
    field: ParticleField,
    cursor: CursorTrail,
    parallax: Parallax,
    registry: InteractiveRegistry,
    button: MagneticButton,
    loader: PageLoader<StdRng>,
    throttle: FrameThrottle,
}

impl Scene {
    fn new(viewport: &Viewport, now: Instant) -> Self {
        let (width, height) = viewport.size();
        let mut registry = InteractiveRegistry::new();
        let button = MagneticButton::new(&mut registry, button_center(viewport), MAGNETIC_STRENGTH, now);

        Self {
            field: ParticleField::new(width, height),
            cursor: CursorTrail::new(now),
            parallax: Parallax::new(now),
            registry,
            button,
            loader: PageLoader::new(StdRng::from_entropy(), now),
            throttle: FrameThrottle::from_fps(TARGET_FPS, now),
        }
    }

    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.size();
        if self.field.resize(width, height) {
            log::info!(
                "Viewport {}x{}: {} particles",
                width,
                height,
                self.field.particles().len()
            );
        }
        self.button.move_to(&mut self.registry, button_center(viewport));
    }

    fn on_pointer_move(&mut self, x: f32, y: f32, viewport: &Viewport, now: Instant) {
        self.cursor.on_pointer_move(x, y, now);
        self.parallax.on_pointer_move(x, y, viewport.size(), now);
        self.button.on_pointer_move(&self.registry, x, y, now);
        self.cursor
            .set_hovering(self.registry.hit_test(x, y).is_some(), now);
    }

    fn on_pointer_leave(&mut self, now: Instant) {
        self.cursor.on_pointer_leave();
        self.cursor.set_hovering(false, now);
        self.button.release(now);
    }

    /// Step the simulation if the throttle admits a frame at `now`.
    /// Returns false for a skipped frame; `throttle.next_due()` says when to retry.
    fn advance(&mut self, pointer: Option<(f32, f32)>, now: Instant) -> bool {
        if !self.throttle.admit(now) {
            return false;
        }
        self.field.step(pointer);
        self.loader.update(now);
        true
    }

    fn draw(&self, frame: &mut FrameBatch, viewport: &Viewport, now: Instant) {
        self.field.draw(&mut frame.scene);
        self.parallax.draw(&mut frame.scene, viewport.size(), now);
        self.button.draw(&self.registry, &mut frame.scene, now);

        self.cursor.draw(&mut frame.overlay, now);
        if !self.loader.is_done(now) {
            self.loader.draw(&mut frame.overlay, viewport.size(), now);
        }
    }

    fn teardown(self) {
        let Self {
            button,
            mut registry,
            ..
        } = self;
        button.unregister(&mut registry);
        log::debug!("{} interactive regions left after teardown", registry.len());
    }
}

/// What one redraw callback did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameOutcome {
    Presented,
    /// Throttled, the next frame is due at this instant
    Deferred(Instant),
    /// No scene, or nothing to draw on
    Idle,
}

fn button_center(viewport: &Viewport) -> [f32; 2] {
    let (width, height) = viewport.size();
    [width / 2.0, (height - MAGNETIC_BUTTON_MARGIN).max(0.0)]
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: Option<Scene>,
    pointer: PointerState,
    viewport: Viewport,
    modifiers: ModifiersState,
    fps_counter: FpsCounter,
    show_fps: bool,
    /// Deadline of a throttled frame the loop is sleeping towards
    frame_due: Option<Instant>,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            renderer: None,
            scene: None,
            pointer: PointerState::new(),
            viewport: Viewport::new(1, 1, 1.0),
            modifiers: ModifiersState::empty(),
            fps_counter: FpsCounter::new(),
            show_fps: false,
            frame_due: None,
        }
    }

    /// One display refresh: step and draw if the throttle admits it
    fn render(&mut self) -> FrameOutcome {
        let (Some(renderer), Some(scene)) = (self.renderer.as_mut(), self.scene.as_mut()) else {
            return FrameOutcome::Idle;
        };
        if self.viewport.is_empty() {
            return FrameOutcome::Idle;
        }

        let now = Instant::now();
        if !scene.advance(self.pointer.position(), now) {
            return FrameOutcome::Deferred(scene.throttle.next_due());
        }

        renderer.frame.reset(self.viewport.pixel_ratio());
        scene.draw(&mut renderer.frame, &self.viewport, now);
        renderer.present(&self.viewport);

        // Update and display FPS
        if let Some(fps) = self.fps_counter.tick() {
            log::debug!("{:.0} FPS", fps);
            if self.show_fps {
                if let Some(window) = &self.window {
                    window.set_title(&format!(
                        "{} - {:.0} FPS ({})",
                        WINDOW_TITLE,
                        fps,
                        FpsRating::from_fps(fps).label()
                    ));
                }
            }
        }

        FrameOutcome::Presented
    }

    /// Ask for the next redraw while the scene is alive
    fn request_redraw(&self) {
        if self.scene.is_some() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn update_viewport(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        self.viewport = Viewport::new(size.width, size.height, window.scale_factor());

        if let Some(renderer) = &mut self.renderer {
            renderer.gpu.resize(self.viewport.surface_size());
        }
        if let Some(scene) = &mut self.scene {
            scene.resize(&self.viewport);
        }
        // an empty viewport parks the loop, so restart it here
        self.request_redraw();
    }

    fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
        log::info!("FPS counter: {}", if self.show_fps { "ON" } else { "OFF" });
        if !self.show_fps {
            if let Some(window) = &self.window {
                window.set_title(WINDOW_TITLE);
            }
        }
    }

    /// Stop the frame loop and release the scene and GPU resources
    fn teardown(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.teardown();
        }
        self.renderer = None;
        self.frame_due = None;
        if let Some(window) = self.window.take() {
            window.set_cursor_visible(true);
        }
        log::info!("Particle field torn down");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing particle field...");

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        self.update_viewport();

        // No drawing surface: stay an inert window, no field and no frame loop
        let gpu = match pollster::block_on(GpuContext::new(window.clone(), self.viewport.surface_size())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::warn!("Drawing surface unavailable, particle field disabled: {:#}", e);
                return;
            }
        };

        let now = Instant::now();
        let scene = Scene::new(&self.viewport, now);
        log::info!(
            "Viewport {}x{} at {:.2}x: {} particles, {:?} per frame",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio(),
            scene.field.particles().len(),
            scene.throttle.interval()
        );

        self.renderer = Some(Renderer::new(gpu, self.viewport.pixel_ratio()));
        self.scene = Some(scene);

        window.set_cursor_visible(false);
        window.request_redraw();
        log::info!("Initialization complete!");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            log::info!("Escape pressed, exiting...");
                            self.teardown();
                            event_loop.exit();
                        }
                        PhysicalKey::Code(KeyCode::KeyF) if self.modifiers.shift_key() => {
                            self.toggle_fps();
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                self.update_viewport();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed to {:.2}", scale_factor);
                self.update_viewport();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f32>(self.viewport.scale_factor());
                self.pointer.set(position.x, position.y);
                if let Some(scene) = &mut self.scene {
                    scene.on_pointer_move(position.x, position.y, &self.viewport, Instant::now());
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.clear();
                if let Some(scene) = &mut self.scene {
                    scene.on_pointer_leave(Instant::now());
                }
            }
            WindowEvent::RedrawRequested => match self.render() {
                // presenting blocks on vsync, which paces the next request
                FrameOutcome::Presented => self.request_redraw(),
                FrameOutcome::Deferred(due) => {
                    self.frame_due = Some(due);
                    event_loop.set_control_flow(ControlFlow::WaitUntil(due));
                }
                FrameOutcome::Idle => {}
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(due) = self.frame_due else {
            return;
        };
        if Instant::now() >= due {
            self.frame_due = None;
            event_loop.set_control_flow(ControlFlow::Wait);
            self.request_redraw();
        } else {
            // woken early by another event, keep sleeping towards the deadline
            event_loop.set_control_flow(ControlFlow::WaitUntil(due));
        }
    }
}

/// Colour band of the FPS readout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FpsRating {
    Good,
    Fair,
    Poor,
}

impl FpsRating {
    fn from_fps(fps: f64) -> Self {
        if fps >= FPS_GOOD {
            Self::Good
        } else if fps >= FPS_FAIR {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = now.saturating_duration_since(self.last_update);

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = now;
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fps_rating_bands() {
        assert_eq!(FpsRating::from_fps(60.0), FpsRating::Good);
        assert_eq!(FpsRating::from_fps(55.0), FpsRating::Good);
        assert_eq!(FpsRating::from_fps(40.0), FpsRating::Fair);
        assert_eq!(FpsRating::from_fps(12.0), FpsRating::Poor);
    }

    #[test]
    fn test_fps_counter_reports_each_second() {
        let mut counter = FpsCounter::new();
        let start = counter.last_update;
        for i in 1..60 {
            assert_eq!(counter.tick_at(start + Duration::from_millis(i * 16)), None);
        }
        let fps = counter.tick_at(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-9);
        assert_eq!(counter.frame_count, 0);
    }

    #[test]
    fn test_button_anchored_bottom_centre() {
        let viewport = Viewport::new(800, 600, 1.0);
        assert_eq!(button_center(&viewport), [400.0, 600.0 - MAGNETIC_BUTTON_MARGIN]);
    }

    #[test]
    fn test_scene_pointer_hover_and_teardown() {
        let now = Instant::now();
        let viewport = Viewport::new(800, 600, 1.0);
        let mut scene = Scene::new(&viewport, now);
        assert_eq!(scene.field.particles().len(), 80);

        let [bx, by] = button_center(&viewport);
        scene.on_pointer_move(bx + 10.0, by, &viewport, now);
        assert!(scene.registry.hit_test(bx, by).is_some());
        assert!(scene.cursor.is_visible());

        let mut frame = FrameBatch::new(1.0);
        let due = scene.throttle.next_due();
        assert!(scene.advance(Some((bx, by)), due));
        scene.draw(&mut frame, &viewport, now);
        assert!(!frame.scene.shapes.is_empty());
        assert!(!frame.overlay.shapes.is_empty());

        scene.on_pointer_leave(now);
        assert!(!scene.cursor.is_visible());
        scene.teardown();
    }

    #[test]
    fn test_skipped_frame_does_no_work() {
        let now = Instant::now();
        let viewport = Viewport::new(800, 600, 1.0);
        let mut scene = Scene::new(&viewport, now);
        let base = scene.field.particles()[5];

        // pointer right on a particle, but the frame arrives too early
        let early = now + Duration::from_millis(8);
        assert!(!scene.advance(Some((base.x + 1.0, base.y)), early));
        assert_eq!(scene.field.particles()[5], base);
        assert_eq!(scene.throttle.next_due(), now + scene.throttle.interval());

        assert!(scene.advance(Some((base.x + 1.0, base.y)), scene.throttle.next_due()));
        assert_ne!(scene.field.particles()[5], base);
    }

    #[test]
    fn test_scene_resize_rebuilds_field() {
        let now = Instant::now();
        let mut scene = Scene::new(&Viewport::new(800, 600, 1.0), now);
        let viewport = Viewport::new(400, 400, 1.0);
        scene.resize(&viewport);
        assert_eq!(scene.field.particles().len(), 25);
        assert!(scene.registry.hit_test(200.0, 400.0 - MAGNETIC_BUTTON_MARGIN).is_some());
    }
}

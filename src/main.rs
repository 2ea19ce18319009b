//! Lodview application: window, render loop, and streaming worker lifecycle

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use lodview::assets;
use lodview::core::camera::Camera;
use lodview::core::input::InputState;
use lodview::core::logging;
use lodview::core::time::FrameTimer;
use lodview::render::{GpuContext, MeshBuffers, ObjectPipeline, ObjectTexture};
use lodview::scene::object::build_grid;
use lodview::scene::updater::{self, SceneObject};
use lodview::scene::{ViewerConfig, convert_rgba_to_bgra};
use lodview::streaming::{LodConfig, SharedView, StreamingWorker};

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    pipeline: Option<ObjectPipeline>,
    mesh: Option<MeshBuffers>,
    objects: Vec<SceneObject>,
    camera: Camera,
    input: InputState,
    timer: FrameTimer,
    shared_view: Arc<SharedView>,
    worker: Option<StreamingWorker>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let camera = Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1000.0),
            config.fov_y_degrees,
            config.aspect(),
        );
        Self {
            config,
            window: None,
            gpu: None,
            pipeline: None,
            mesh: None,
            objects: Vec::new(),
            camera,
            input: InputState::new(),
            timer: FrameTimer::new(),
            shared_view: Arc::new(SharedView::new()),
            worker: None,
        }
    }

    fn frame(&mut self) {
        let Some(gpu) = self.gpu.as_ref() else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(mesh) = self.mesh.as_ref() else { return };

        self.timer.tick();

        // Fixed step per held flag, no delta-time scaling
        let flags = self.input.move_flags();
        let speed = self.config.move_speed;
        if flags.forward {
            self.camera.position.z += speed;
        }
        if flags.backward {
            self.camera.position.z -= speed;
        }
        if flags.left {
            self.camera.position.x -= speed;
        }
        if flags.right {
            self.camera.position.x += speed;
        }

        let view = self.camera.view_matrix();
        let proj = self.camera.projection_matrix();
        self.shared_view.store(&view);
        pipeline.write_camera(&gpu.queue, &view, &proj);

        // Adopt streamed textures before drawing
        let adopted = updater::adopt_pending(&gpu.device, &gpu.queue, pipeline, &mut self.objects);
        if adopted > 0 {
            log::debug!("{adopted} textures adopted this frame");
        }

        let output = match gpu.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::error!("Failed to get surface texture: {}", e);
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        pipeline.render(
            &mut encoder,
            &target,
            mesh,
            self.objects.iter().map(|o| &o.bind_group),
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.input.end_frame();

        if self.timer.frame_count() % 120 == 0 {
            if let Some(window) = &self.window {
                window.set_title(&format!("Lodview - {:.0} fps", self.timer.fps()));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Lodview")
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))
            .expect("Failed to create GPU context");

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);
        log::info!("Window created: {}x{}", size.width, size.height);
        log::info!("GPU: {}", gpu.adapter.get_info().name);

        let pipeline = ObjectPipeline::new(&gpu.device, gpu.format(), size.width, size.height);
        pipeline.write_camera(
            &gpu.queue,
            &self.camera.view_matrix(),
            &self.camera.projection_matrix(),
        );
        let mesh = MeshBuffers::new(&gpu.device);

        let sources = assets::ensure_streaming_images(&self.config.asset_dir)
            .expect("Failed to prepare streaming images");

        // Every object starts on the low tier showing the thumbnail
        let mut thumb = assets::decode(&sources.thumb).expect("Failed to decode thumbnail");
        convert_rgba_to_bgra(&mut thumb.data);

        let states = build_grid(self.config.grid_size, self.config.grid_spacing);
        self.objects = states
            .iter()
            .map(|state| {
                let texture = ObjectTexture::upload(
                    &gpu.device,
                    &gpu.queue,
                    thumb.width,
                    thumb.height,
                    &thumb.data,
                )
                .expect("Failed to upload initial texture");
                let model_buffer = pipeline.create_model_buffer(&gpu.device, state.transform());
                let bind_group =
                    pipeline.create_object_bind_group(&gpu.device, &model_buffer, &texture.view);
                SceneObject {
                    state: state.clone(),
                    texture,
                    model_buffer,
                    bind_group,
                }
            })
            .collect();
        log::info!("Scene ready: {} objects", self.objects.len());

        let policy = LodConfig::new(self.config.fov_y_degrees, self.camera.aspect);
        let worker = StreamingWorker::start(
            states,
            self.shared_view.clone(),
            policy,
            sources.into(),
            Duration::from_millis(self.config.stream_interval_ms),
        )
        .expect("Failed to start streaming worker");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.pipeline = Some(pipeline);
        self.mesh = Some(mesh);
        self.worker = Some(worker);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);
        if self.input.is_key_just_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.camera.set_aspect(size.width as f32, size.height as f32);
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(size.width, size.height);
                        if let Some(pipeline) = &mut self.pipeline {
                            pipeline.resize(&gpu.device, size.width, size.height);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
    }
}

fn main() {
    logging::init();
    log::info!("Lodview starting...");

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_config_arg(&args).unwrap_or_else(|| PathBuf::from("viewer.json"));
    let config = ViewerConfig::load_or_default(&config_path);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--config" || args[i] == "-c" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

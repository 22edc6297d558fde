use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::SetupError,
    frame::FrameClock,
    gfx::{FrameStatus, MeshData, RenderEngine},
    scene::{InputEvent, Scene},
    ui::{animation_panel, PanelStats, UiManager},
};

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Animate(InputEvent),
    ToggleOverlay,
    Exit,
}

fn key_action(key: KeyCode) -> Option<KeyAction> {
    match key {
        KeyCode::KeyX => Some(KeyAction::Animate(InputEvent::Step)),
        KeyCode::KeyR => Some(KeyAction::Animate(InputEvent::Reset)),
        KeyCode::Tab => Some(KeyAction::ToggleOverlay),
        KeyCode::Escape => Some(KeyAction::Exit),
        _ => None,
    }
}

pub struct TeapotRigApp {
    config: AppConfig,
}

struct AppState {
    config: AppConfig,
    mesh: MeshData,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    clock: FrameClock,
    show_overlay: bool,
    error: Option<SetupError>,
}

impl TeapotRigApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs until it is closed.
    ///
    /// The shared mesh is resolved before any window exists, so a bad asset
    /// path fails fast.
    pub fn run(self) -> Result<(), SetupError> {
        let mesh = MeshData::from_source(&self.config.mesh)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let scene = Scene::new(self.config.animation, self.config.camera);
        let mut app_state = AppState {
            show_overlay: self.config.show_overlay,
            config: self.config,
            mesh,
            window: None,
            render_engine: None,
            ui_manager: None,
            scene,
            clock: FrameClock::new(),
            error: None,
        };

        event_loop.run_app(&mut app_state)?;

        match app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SetupError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.title.as_str())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
        )?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            &self.config,
            &self.mesh,
            self.scene.instance_capacity(),
        ))?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        log::info!("Controls: X step, R reset, Tab overlay, Esc quit");
        Ok(())
    }

    /// Held X keeps stepping; other keys act once per press.
    fn apply_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, repeat: bool) {
        match key_action(key) {
            Some(KeyAction::Animate(input)) => self.scene.handle_input(input),
            Some(_) if repeat => {}
            Some(KeyAction::ToggleOverlay) => {
                self.show_overlay = !self.show_overlay;
                log::info!("Overlay {}", if self.show_overlay { "shown" } else { "hidden" });
            }
            Some(KeyAction::Exit) => event_loop.exit(),
            None => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        let frame_delta = self.clock.tick(Instant::now());

        // Build the overlay first so its buttons act on this frame
        let mut ui_ready = false;
        if self.show_overlay {
            if let Some(ui_manager) = self.ui_manager.as_mut() {
                let stats = PanelStats {
                    state: *self.scene.state(),
                    steps_in_cycle: self.scene.animator().steps_in_cycle(),
                    draw_count: self.scene.instances().len(),
                    fps: self.clock.fps(),
                    frame_delta,
                };
                if let Some(pressed) = ui_manager.update_logic(window, |ui| animation_panel(ui, &stats)) {
                    ui_ready = true;
                    if let Some(input) = pressed {
                        self.scene.handle_input(input);
                    }
                }
            }
        }

        let (width, height) = render_engine.get_surface_size();
        let camera = self.scene.camera_uniform(width, height);
        let instances = self.scene.evaluate();

        let result = match self.ui_manager.as_mut().filter(|_| ui_ready) {
            Some(ui_manager) => render_engine.render_frame(
                instances,
                camera,
                Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui_manager.render_display_only(device, queue, encoder, view);
                    },
                ),
            ),
            None => render_engine.render_frame(
                instances,
                camera,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        };

        match result {
            Ok(FrameStatus::Presented) => {}
            Ok(FrameStatus::Skipped) => log::trace!("frame skipped"),
            Err(error) => self.fail(event_loop, error.into()),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if self.show_overlay {
            if let Some(ui_manager) = self.ui_manager.as_mut() {
                if ui_manager.handle_input(&window, window_id, &event) {
                    window.request_redraw();
                    return;
                }
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat,
                        ..
                    },
                ..
            } => self.apply_key(event_loop, key_code, repeat),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!(
            "Exiting after {} frames, {} steps in current cycle",
            self.clock.frames(),
            self.scene.animator().steps_in_cycle()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            key_action(KeyCode::KeyX),
            Some(KeyAction::Animate(InputEvent::Step))
        );
        assert_eq!(
            key_action(KeyCode::KeyR),
            Some(KeyAction::Animate(InputEvent::Reset))
        );
        assert_eq!(key_action(KeyCode::Tab), Some(KeyAction::ToggleOverlay));
        assert_eq!(key_action(KeyCode::Escape), Some(KeyAction::Exit));
        assert_eq!(key_action(KeyCode::KeyZ), None);
    }
}

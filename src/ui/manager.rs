//! Dear ImGui glue: winit input in, wgpu draw commands out.
//!
//! A frame is split in two so the UI can change the scene before it is
//! drawn: [`UiManager::update_logic`] builds the widgets and returns what
//! they reported, then [`UiManager::render_display_only`] records them on top
//! of the finished scene.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    cursor: Option<MouseCursor>,
    /// A frame was built and not yet rendered
    pending: bool,
}

fn add_default_font(context: &mut Context) {
    context.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            oversample_h: 1,
            pixel_snap_h: true,
            size_pixels: FONT_SIZE,
            ..Default::default()
        }),
    }]);
}

impl UiManager {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        // Display size stays in physical pixels, matching the surface
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));
        add_default_font(&mut context);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: format,
                ..Default::default()
            },
        );

        let size = window.inner_size();
        context.io_mut().display_size = [size.width as f32, size.height as f32];
        log::debug!(
            "UI ready: display {:?}, scale factor {}",
            context.io().display_size,
            window.scale_factor()
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            cursor: None,
            pending: false,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Feeds pointer, keyboard and focus events to ImGui.
    ///
    /// Returns true when ImGui wants to keep the event for itself.
    pub fn handle_input(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        let relevant = matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::Focused(_)
        );
        if !relevant {
            return false;
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &wrapped);

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Builds this frame's widgets and returns what `run_ui` produced.
    ///
    /// `None` means the platform could not prepare a frame; `run_ui` did not
    /// run and nothing will be drawn.
    pub fn update_logic<F, R>(&mut self, window: &Window, run_ui: F) -> Option<R>
    where
        F: FnOnce(&imgui::Ui) -> R,
    {
        // A frame built for a skipped present still has to be closed
        if std::mem::take(&mut self.pending) {
            self.context.render();
        }

        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {}", e);
            return None;
        }

        let ui = self.context.frame();
        let output = run_ui(ui);

        let cursor = ui.mouse_cursor();
        if cursor != self.cursor {
            self.cursor = cursor;
            self.platform.prepare_render(ui, window);
        }

        self.pending = true;
        Some(output)
    }

    /// Records the widgets built by the last [`UiManager::update_logic`].
    pub fn render_display_only(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        if !std::mem::take(&mut self.pending) {
            return;
        }

        let draw_data = self.context.render();
        let [width, height] = draw_data.display_size;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("Failed to render UI: {:?}", e);
        }
    }
}

//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the depth buffer, the scene pipeline
//! and the uniform buffers it reads. Each frame draws every [`DrawInstance`]
//! with the shared mesh, then hands the encoder to an optional UI overlay.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    config::AppConfig,
    error::{RenderError, SetupError},
    gfx::{
        mesh::{GpuMesh, MeshData},
        resources::{CameraBindings, ModelBindings, TextureResource},
    },
    scene::{CameraUniform, DrawInstance},
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SCENE_SHADER: &str = "scene.wgsl";
const SCENE_PIPELINE: &str = "Scene";

/// What happened to a frame handed to [`RenderEngine::render_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// No frame was produced; the next redraw tries again
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceAction {
    Reconfigure,
    Skip,
    Fatal,
}

fn surface_error_action(error: &wgpu::SurfaceError) -> SurfaceAction {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceAction::Skip,
        wgpu::SurfaceError::OutOfMemory => SurfaceAction::Fatal,
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pipeline_manager: PipelineManager,
    camera_bindings: CameraBindings,
    model_bindings: ModelBindings,
    meshes: Vec<GpuMesh>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Uploads `mesh` once and sizes the per-instance uniform buffer for
    /// `instance_capacity` draws per frame.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        app_config: &AppConfig,
        mesh: &MeshData,
        instance_capacity: usize,
    ) -> Result<RenderEngine, SetupError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(SetupError::NoSurfaceFormat)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(app_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let camera_bindings = CameraBindings::new(&device);
        let model_bindings = ModelBindings::new(&device, instance_capacity);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(SCENE_SHADER, include_str!("scene.wgsl"));
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default_with_shader(SCENE_SHADER)
                .with_label("Scene Pipeline")
                .with_bind_group_layouts(vec![
                    camera_bindings.bind_group_layout().clone(),
                    model_bindings.bind_group_layout().clone(),
                ])
                // Loaded meshes have no guaranteed winding
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );
        pipeline_manager.create_all_pipelines()?;

        let meshes = vec![GpuMesh::upload(&device, mesh, "Shared Mesh")];

        let [r, g, b, a] = app_config.clear_color;
        log::info!(
            "Render engine ready: {}x{} {:?}, {} vertices per instance",
            config.width,
            config.height,
            format,
            mesh.vertex_count()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color { r, g, b, a },
            pipeline_manager,
            camera_bindings,
            model_bindings,
            meshes,
        })
    }

    /// Renders one frame with an optional UI overlay
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped,
    /// as are timeouts. Only running out of memory is an error.
    ///
    /// # Arguments
    /// * `instances` - Draws in order; each selects its model matrix slot
    /// * `camera` - View and projection for this frame
    /// * `ui_callback` - Optional function that records UI draw commands
    pub fn render_frame<F>(
        &mut self,
        instances: &[DrawInstance],
        camera: CameraUniform,
        ui_callback: Option<F>,
    ) -> Result<FrameStatus, RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(error) => {
                return match surface_error_action(&error) {
                    SurfaceAction::Reconfigure => {
                        log::debug!("Surface {:?}, reconfiguring", error);
                        self.surface.configure(&self.device, &self.config);
                        Ok(FrameStatus::Skipped)
                    }
                    SurfaceAction::Skip => {
                        log::warn!("Skipping frame: {}", error);
                        Ok(FrameStatus::Skipped)
                    }
                    SurfaceAction::Fatal => Err(RenderError::OutOfMemory),
                };
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.camera_bindings.update(&self.queue, camera);
        let drawn = self.model_bindings.upload(&self.queue, instances);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.camera_bindings.bind_group(), &[]);

                for (slot, instance) in instances[..drawn].iter().enumerate() {
                    let Some(mesh) = self.meshes.get(instance.mesh.0) else {
                        log::debug!("Skipping '{}': no mesh {:?}", instance.name, instance.mesh);
                        continue;
                    };
                    render_pass.set_bind_group(
                        1,
                        self.model_bindings.bind_group(),
                        &[self.model_bindings.offset(slot)],
                    );
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.draw(0..mesh.vertex_count, 0..1);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(FrameStatus::Presented)
    }

    /// Resizes the surface and depth buffer
    ///
    /// Zero dimensions (a minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Returns current surface dimensions in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_actions() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Lost),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Outdated),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Timeout),
            SurfaceAction::Skip
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            SurfaceAction::Fatal
        );
    }

    #[test]
    fn test_present_mode_follows_vsync() {
        assert_eq!(present_mode(true), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(false), wgpu::PresentMode::AutoNoVsync);
    }
}

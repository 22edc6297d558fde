//! Named render pipelines
//!
//! Shaders are compiled once and pipelines are registered by name as a
//! [`PipelineConfig`], then built on first use (or all at once at start-up
//! with [`PipelineManager::create_all_pipelines`]). Every pipeline draws
//! [`Vertex3D`] triangle lists with `vs_main` / `fs_main` entry points.

use std::{collections::HashMap, sync::Arc};

use crate::{error::PipelineError, gfx::vertex::Vertex3D};

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

/// Everything needed to build one render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    /// Layouts in bind group order
    pub bind_group_layouts: Vec<wgpu::BindGroupLayout>,
    pub cull_mode: Option<wgpu::Face>,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub color_format: wgpu::TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Pipeline".to_string(),
            shader: String::new(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(wgpu::Face::Back),
            depth_format: None,
            color_format: wgpu::TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<wgpu::Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<wgpu::BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Depth-tested, depth-writing, nearer fragments win
    pub fn with_depth_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull_mode,
            ..Default::default()
        }
    }

    fn depth_stencil_state(&self) -> Option<wgpu::DepthStencilState> {
        self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }

    fn color_targets(&self) -> [Option<wgpu::ColorTargetState>; 1] {
        [Some(wgpu::ColorTargetState {
            format: self.color_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })]
    }
}

pub struct PipelineManager {
    device: Arc<wgpu::Device>,
    shaders: HashMap<String, wgpu::ShaderModule>,
    configs: HashMap<String, PipelineConfig>,
    built: HashMap<String, wgpu::RenderPipeline>,
}

impl PipelineManager {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            shaders: HashMap::new(),
            configs: HashMap::new(),
            built: HashMap::new(),
        }
    }

    /// Compiles WGSL `source` and stores it under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(name),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        log::debug!("Loaded shader '{}'", name);
        self.shaders.insert(name.to_string(), module);
    }

    /// Registers `config` under `name`; any previously built pipeline of that
    /// name is discarded and rebuilt on next use.
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.built.remove(name);
        self.configs.insert(name.to_string(), config);
    }

    /// Returns the pipeline, building it on first request.
    ///
    /// Build failures are logged and yield `None`.
    pub fn get_pipeline(&mut self, name: &str) -> Option<&wgpu::RenderPipeline> {
        if !self.built.contains_key(name) {
            if let Err(e) = self.build(name) {
                log::error!("Failed to create pipeline '{}': {}", name, e);
                return None;
            }
        }
        self.built.get(name)
    }

    /// Builds every registered pipeline not built yet
    pub fn create_all_pipelines(&mut self) -> Result<(), PipelineError> {
        let pending: Vec<String> = self
            .configs
            .keys()
            .filter(|name| !self.built.contains_key(*name))
            .cloned()
            .collect();
        for name in pending {
            self.build(&name)?;
        }
        Ok(())
    }

    fn build(&mut self, name: &str) -> Result<(), PipelineError> {
        let config = self
            .configs
            .get(name)
            .ok_or_else(|| PipelineError::PipelineNotFound(name.to_string()))?;
        let shader = self
            .shaders
            .get(&config.shader)
            .ok_or_else(|| PipelineError::ShaderNotFound(config.shader.clone()))?;

        let layouts: Vec<&wgpu::BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", config.label)),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let targets = config.color_targets();
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &targets,
                    compilation_options: Default::default(),
                }),
                primitive: config.primitive_state(),
                depth_stencil: config.depth_stencil_state(),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        log::debug!("Created pipeline '{}' from shader '{}'", name, config.shader);
        self.built.insert(name.to_string(), pipeline);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = PipelineConfig::default_with_shader("scene.wgsl")
            .with_label("Scene")
            .with_cull_mode(None)
            .with_depth_format(wgpu::TextureFormat::Depth32Float)
            .with_color_format(wgpu::TextureFormat::Rgba8Unorm);

        assert_eq!(config.label, "Scene");
        assert_eq!(config.shader, "scene.wgsl");
        assert_eq!(config.primitive_state().cull_mode, None);
        assert_eq!(
            config.primitive_state().topology,
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(
            config.color_targets()[0].as_ref().map(|t| t.format),
            Some(wgpu::TextureFormat::Rgba8Unorm)
        );
    }

    #[test]
    fn test_depth_state_only_with_format() {
        let plain = PipelineConfig::default();
        assert!(plain.depth_stencil_state().is_none());

        let depth = plain
            .with_depth_format(wgpu::TextureFormat::Depth32Float)
            .depth_stencil_state()
            .expect("depth state");
        assert_eq!(depth.format, wgpu::TextureFormat::Depth32Float);
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Less);
        assert!(depth.depth_write_enabled);
    }
}

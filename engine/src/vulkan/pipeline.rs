use log::*;
use vulkanalia::vk;

use super::backend::RenderDevice;
use super::shader::ShaderSet;
use crate::error::PipelineError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShaderStage {
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexBinding {
    pub binding: u32,
    pub stride: u32,
    pub input_rate: vk::VertexInputRate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub binding: u32,
    pub format: vk::Format,
    pub offset: u32,
}

/// Empty for the built-in triangle, whose vertices come from the shader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexInputDescription {
    pub bindings: Vec<VertexBinding>,
    pub attributes: Vec<VertexAttribute>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scissor {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterizationState {
    pub polygon_mode: vk::PolygonMode,
    pub cull_mode: vk::CullModeFlags,
    pub front_face: vk::FrontFace,
    pub line_width: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MultisampleState {
    pub samples: vk::SampleCountFlags,
    pub sample_shading: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorBlendAttachment {
    pub blend_enable: bool,
    pub src_color_blend_factor: vk::BlendFactor,
    pub dst_color_blend_factor: vk::BlendFactor,
    pub color_blend_op: vk::BlendOp,
    pub src_alpha_blend_factor: vk::BlendFactor,
    pub dst_alpha_blend_factor: vk::BlendFactor,
    pub alpha_blend_op: vk::BlendOp,
    pub color_write_mask: vk::ColorComponentFlags,
}

/// Everything needed to create a graphics pipeline, short of the render pass
/// it is bound to.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub shader_stages: Vec<ShaderStage>,
    pub vertex_input: VertexInputDescription,
    pub topology: vk::PrimitiveTopology,
    pub viewport: Viewport,
    pub scissor: Scissor,
    pub color_blend_attachment: ColorBlendAttachment,
    pub rasterization: RasterizationState,
    pub multisample: MultisampleState,
    pub layout: vk::PipelineLayout,
}

impl PipelineConfig {
    /// Alpha-blended, back-face culled triangles covering the whole extent.
    pub fn triangle(
        shader_stages: Vec<ShaderStage>,
        layout: vk::PipelineLayout,
        extent: vk::Extent2D,
    ) -> Self {
        Self {
            shader_stages,
            vertex_input: VertexInputDescription::default(),
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            viewport: Viewport {
                x: 0.0,
                y: 0.0,
                width: extent.width as f32,
                height: extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            },
            scissor: Scissor {
                x: 0,
                y: 0,
                width: extent.width,
                height: extent.height,
            },
            color_blend_attachment: ColorBlendAttachment {
                blend_enable: true,
                src_color_blend_factor: vk::BlendFactor::SRC_ALPHA,
                dst_color_blend_factor: vk::BlendFactor::ONE_MINUS_SRC_ALPHA,
                color_blend_op: vk::BlendOp::ADD,
                src_alpha_blend_factor: vk::BlendFactor::ONE,
                dst_alpha_blend_factor: vk::BlendFactor::ZERO,
                alpha_blend_op: vk::BlendOp::ADD,
                color_write_mask: vk::ColorComponentFlags::all(),
            },
            rasterization: RasterizationState {
                polygon_mode: vk::PolygonMode::FILL,
                cull_mode: vk::CullModeFlags::BACK,
                front_face: vk::FrontFace::CLOCKWISE,
                line_width: 1.0,
            },
            multisample: MultisampleState {
                samples: vk::SampleCountFlags::_1,
                sample_shading: false,
            },
            layout,
        }
    }
}

/// Creates a pipeline from `config` for `render_pass`. Holds no state of its
/// own, so identical inputs always describe the same pipeline.
pub unsafe fn build_pipeline<D: RenderDevice>(
    device: &D,
    config: &PipelineConfig,
    render_pass: vk::RenderPass,
) -> Result<vk::Pipeline, PipelineError> {
    Ok(device.create_graphics_pipeline(config, render_pass)?)
}

/// A built pipeline together with the layout and shader modules it was made
/// from. Never mutated; a rebuild replaces the whole value.
#[derive(Debug)]
pub struct PipelineState {
    pub pipeline: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    pub shader_modules: Vec<vk::ShaderModule>,
    pub config: PipelineConfig,
}

impl PipelineState {
    pub unsafe fn build<D: RenderDevice>(
        device: &D,
        shaders: &ShaderSet,
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
    ) -> Result<PipelineState, PipelineError> {
        let layout = device.create_pipeline_layout()?;

        let mut stages = Vec::new();
        for (stage, bytecode) in shaders.stages() {
            match device.create_shader_module(&bytecode.words) {
                Ok(module) => stages.push(ShaderStage { stage, module }),
                Err(error) => {
                    destroy_partial(device, &stages, layout);
                    return Err(error.into());
                }
            }
        }

        let config = PipelineConfig::triangle(stages, layout, extent);

        let pipeline = match build_pipeline(device, &config, render_pass) {
            Ok(pipeline) => pipeline,
            Err(error) => {
                destroy_partial(device, &config.shader_stages, layout);
                return Err(error);
            }
        };

        debug!("Built graphics pipeline for {}x{}.", extent.width, extent.height);

        Ok(PipelineState {
            pipeline,
            layout,
            shader_modules: config.shader_stages.iter().map(|s| s.module).collect(),
            config,
        })
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        device.destroy_pipeline(self.pipeline);
        self.shader_modules
            .iter()
            .rev()
            .for_each(|m| device.destroy_shader_module(*m));
        device.destroy_pipeline_layout(self.layout);
    }
}

unsafe fn destroy_partial<D: RenderDevice>(
    device: &D,
    stages: &[ShaderStage],
    layout: vk::PipelineLayout,
) {
    stages
        .iter()
        .rev()
        .for_each(|s| device.destroy_shader_module(s.module));
    device.destroy_pipeline_layout(layout);
}

use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline as WgpuRenderPipeline,
    TextureFormat, TextureView,
};

use crate::config::BACKGROUND_COLOR;
use crate::gpu::batch::{DrawRun, LineVertex, Primitive, ShapeInstance};
use crate::gpu::buffers::{FrameRuns, SceneBuffers};

/// Pipelines for the scene: instanced shapes, connective lines and the
/// full-screen grain pass. All share one view-params bind group.
pub struct RenderPipeline {
    shape_pipeline: WgpuRenderPipeline,
    line_pipeline: WgpuRenderPipeline,
    grain_pipeline: WgpuRenderPipeline,
    bind_group_layout: BindGroupLayout,
}

impl RenderPipeline {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });
        let grain_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grain-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/grain.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("view-bind-group-layout"),
            entries: &[
                // View parameters (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shape_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineDesc {
                label: "shape-pipeline",
                module: &scene_shader,
                vertex_entry: "vs_shape",
                fragment_entry: "fs_shape",
                buffers: &[ShapeInstance::layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineDesc {
                label: "line-pipeline",
                module: &scene_shader,
                vertex_entry: "vs_line",
                fragment_entry: "fs_line",
                buffers: &[LineVertex::layout()],
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );
        let grain_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineDesc {
                label: "grain-pipeline",
                module: &grain_shader,
                vertex_entry: "vs_main",
                fragment_entry: "fs_main",
                buffers: &[],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        Self {
            shape_pipeline,
            line_pipeline,
            grain_pipeline,
            bind_group_layout,
        }
    }

    /// Create a bind group for the view params buffer
    pub fn create_bind_group(&self, device: &Device, params_buffer: &Buffer) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("view-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            }],
        })
    }

    /// Clear and draw one frame: scene, grain, then overlay
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        bind_group: &BindGroup,
        buffers: &SceneBuffers,
        runs: &FrameRuns,
    ) {
        let [r, g, b, a] = BACKGROUND_COLOR.to_array();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, bind_group, &[]);

        self.draw_layer(&mut pass, buffers, &runs.scene);

        pass.set_pipeline(&self.grain_pipeline);
        pass.draw(0..3, 0..1); // Draw fullscreen triangle

        self.draw_layer(&mut pass, buffers, &runs.overlay);
    }

    /// Replay a layer's runs in recording order
    fn draw_layer(&self, pass: &mut wgpu::RenderPass<'_>, buffers: &SceneBuffers, runs: &[DrawRun]) {
        for run in runs.iter().filter(|run| run.end > run.start) {
            match run.primitive {
                Primitive::Lines => {
                    pass.set_pipeline(&self.line_pipeline);
                    pass.set_vertex_buffer(0, buffers.line_buffer.slice(..));
                    pass.draw(run.start..run.end, 0..1);
                }
                Primitive::Shapes => {
                    pass.set_pipeline(&self.shape_pipeline);
                    pass.set_vertex_buffer(0, buffers.shape_buffer.slice(..));
                    // six quad corners per instance
                    pass.draw(0..6, run.start..run.end);
                }
            }
        }
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    format: TextureFormat,
    desc: PipelineDesc<'_>,
) -> WgpuRenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: Some(desc.vertex_entry),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

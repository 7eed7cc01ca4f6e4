use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::GRAIN_OPACITY;
use crate::viewport::Viewport;
use crate::gpu::batch::{DrawRun, FrameBatch, LineVertex, ShapeInstance};

/// Per-frame view parameters shared by every pipeline (32 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    /// Logical viewport size
    pub viewport: [f32; 2],
    pub pixel_ratio: f32,
    pub grain_opacity: f32,

    pub grain_seed: f32,
    /// Uncapped window scale, physical pixels per logical pixel
    pub scale_factor: f32,
    pub _padding: [f32; 2],
}

impl ViewParams {
    pub fn new(viewport: &Viewport, grain_seed: f32) -> Self {
        Self {
            viewport: [viewport.width, viewport.height],
            pixel_ratio: viewport.pixel_ratio(),
            grain_opacity: GRAIN_OPACITY,
            grain_seed,
            scale_factor: viewport.scale_factor() as f32,
            _padding: [0.0; 2],
        }
    }
}

/// Draw runs of one uploaded frame, indexing the shared buffers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameRuns {
    pub scene: Vec<DrawRun>,
    pub overlay: Vec<DrawRun>,
}

impl FrameRuns {
    fn new(frame: &FrameBatch) -> Self {
        // overlay geometry is uploaded after the scene's
        let shapes = frame.scene.shapes.len() as u32;
        let lines = frame.scene.lines.len() as u32;
        Self {
            scene: frame.scene.runs.clone(),
            overlay: frame
                .overlay
                .runs
                .iter()
                .map(|run| run.offset(shapes, lines))
                .collect(),
        }
    }
}

/// Growable vertex buffers plus the view uniform
pub struct SceneBuffers {
    pub shape_buffer: Buffer,
    pub line_buffer: Buffer,
    pub params_buffer: Buffer,
    shape_capacity: usize,
    line_capacity: usize,
    grain_seed: f32,
    shape_staging: Vec<ShapeInstance>,
    line_staging: Vec<LineVertex>,
}

impl SceneBuffers {
    const INITIAL_CAPACITY: usize = 1024;

    pub fn new(device: &Device, grain_seed: f32) -> Self {
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let capacity = Self::INITIAL_CAPACITY;
        Self {
            shape_buffer: create_vertex_buffer::<ShapeInstance>(device, "shape-instance-buffer", capacity),
            line_buffer: create_vertex_buffer::<LineVertex>(device, "line-vertex-buffer", capacity),
            params_buffer,
            shape_capacity: capacity,
            line_capacity: capacity,
            grain_seed,
            shape_staging: Vec::new(),
            line_staging: Vec::new(),
        }
    }

    /// Upload a frame's geometry, growing buffers if needed, and return the
    /// draw runs for each layer
    pub fn upload(
        &mut self,
        device: &Device,
        queue: &Queue,
        frame: &FrameBatch,
        viewport: &Viewport,
    ) -> FrameRuns {
        self.shape_staging.clear();
        self.shape_staging.extend_from_slice(&frame.scene.shapes);
        self.shape_staging.extend_from_slice(&frame.overlay.shapes);

        self.line_staging.clear();
        self.line_staging.extend_from_slice(&frame.scene.lines);
        self.line_staging.extend_from_slice(&frame.overlay.lines);

        if self.shape_staging.len() > self.shape_capacity {
            self.shape_capacity = grown_capacity(self.shape_capacity, self.shape_staging.len());
            self.shape_buffer =
                create_vertex_buffer::<ShapeInstance>(device, "shape-instance-buffer", self.shape_capacity);
            log::debug!("Shape buffer grown to {} instances", self.shape_capacity);
        }
        if self.line_staging.len() > self.line_capacity {
            self.line_capacity = grown_capacity(self.line_capacity, self.line_staging.len());
            self.line_buffer =
                create_vertex_buffer::<LineVertex>(device, "line-vertex-buffer", self.line_capacity);
            log::debug!("Line buffer grown to {} vertices", self.line_capacity);
        }

        if !self.shape_staging.is_empty() {
            queue.write_buffer(&self.shape_buffer, 0, bytemuck::cast_slice(&self.shape_staging));
        }
        if !self.line_staging.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&self.line_staging));
        }

        let params = ViewParams::new(viewport, self.grain_seed);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        FrameRuns::new(frame)
    }
}

fn create_vertex_buffer<T>(device: &Device, label: &str, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Next power of two that fits `needed`, never shrinking
fn grown_capacity(current: usize, needed: usize) -> usize {
    needed.next_power_of_two().max(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::config::PARTICLE_COLOR;
    use crate::gpu::batch::Primitive;

    #[test]
    fn test_params_size() {
        assert_eq!(std::mem::size_of::<ViewParams>(), 32);
    }

    #[test]
    fn test_params_cap_ratio_not_scale() {
        let params = ViewParams::new(&Viewport::new(2400, 1800, 3.0), 7.0);
        assert_eq!(params.viewport, [800.0, 600.0]);
        assert_eq!(params.pixel_ratio, 2.0);
        assert_eq!(params.scale_factor, 3.0);
        assert_eq!(params.grain_opacity, GRAIN_OPACITY);
    }

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(1024, 1025), 2048);
        assert_eq!(grown_capacity(1024, 5000), 8192);
        assert_eq!(grown_capacity(4096, 10), 4096);
    }

    #[test]
    fn test_overlay_runs_follow_scene() {
        let mut frame = FrameBatch::new(1.0);
        frame.scene.fill_disc([0.0, 0.0], 1.0, PARTICLE_COLOR);
        frame.scene.fill_disc([5.0, 0.0], 1.0, PARTICLE_COLOR);
        frame.scene.stroke_line([0.0, 0.0], [5.0, 0.0], 1.0, PARTICLE_COLOR);
        frame.overlay.stroke_line([0.0, 9.0], [5.0, 9.0], 1.0, PARTICLE_COLOR);
        frame.overlay.fill_disc([9.0, 9.0], 5.0, PARTICLE_COLOR);

        fn bounds(runs: &[DrawRun]) -> Vec<(Primitive, u32, u32)> {
            runs.iter().map(|r| (r.primitive, r.start, r.end)).collect()
        }

        let runs = FrameRuns::new(&frame);
        assert_eq!(
            bounds(&runs.scene),
            vec![(Primitive::Shapes, 0, 2), (Primitive::Lines, 0, 2)]
        );
        assert_eq!(
            bounds(&runs.overlay),
            vec![(Primitive::Lines, 2, 4), (Primitive::Shapes, 2, 3)]
        );
    }
}

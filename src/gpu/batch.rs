use crate::canvas::Canvas;
use crate::config::Rgba;

/// One instanced shape: a rounded rectangle described by its signed
/// distance field. A disc is a square whose corner radius equals its half
/// size. `softness` 0 gives a crisp anti-aliased edge, 1 fades alpha all
/// the way from the centre.
///
/// Layout: 40 bytes, matching `ShapeInput` in scene.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub center: [f32; 2],
    pub half_size: [f32; 2],
    pub corner_radius: f32,
    pub softness: f32,
    pub color: [f32; 4],
}

impl ShapeInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32,
        3 => Float32,
        4 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Line-list vertex; lines are one device pixel wide
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Pipeline used by a run of draw calls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Shapes,
    Lines,
}

/// Consecutive draw calls of one primitive: instances `start..end` of the
/// shape buffer, or vertices `start..end` of the line buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawRun {
    pub primitive: Primitive,
    pub start: u32,
    pub end: u32,
}

impl DrawRun {
    /// Shift the run past `shapes` instances and `lines` vertices uploaded before it
    pub fn offset(self, shapes: u32, lines: u32) -> Self {
        let by = match self.primitive {
            Primitive::Shapes => shapes,
            Primitive::Lines => lines,
        };
        Self {
            start: self.start + by,
            end: self.end + by,
            ..self
        }
    }
}

/// CPU-side recording of one layer's draw calls, ready for upload.
///
/// `runs` keeps call order across the two primitives so the layer is
/// painted exactly as it was recorded.
#[derive(Debug)]
pub struct ShapeBatch {
    pixel_ratio: f32,
    pub shapes: Vec<ShapeInstance>,
    pub lines: Vec<LineVertex>,
    pub runs: Vec<DrawRun>,
}

impl ShapeBatch {
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            shapes: Vec::new(),
            lines: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Empty the batch, keeping its allocations
    pub fn reset(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
        self.shapes.clear();
        self.lines.clear();
        self.runs.clear();
    }

    fn extend_run(&mut self, primitive: Primitive, start: u32, end: u32) {
        match self.runs.last_mut() {
            Some(run) if run.primitive == primitive && run.end == start => run.end = end,
            _ => self.runs.push(DrawRun {
                primitive,
                start,
                end,
            }),
        }
    }

    fn push_shape(
        &mut self,
        center: [f32; 2],
        half_size: [f32; 2],
        corner_radius: f32,
        softness: f32,
        color: Rgba,
    ) {
        if color.a <= 0.0 || half_size[0] <= 0.0 || half_size[1] <= 0.0 {
            return;
        }
        self.shapes.push(ShapeInstance {
            center,
            half_size,
            corner_radius,
            softness,
            color: color.to_array(),
        });
        let end = self.shapes.len() as u32;
        self.extend_run(Primitive::Shapes, end - 1, end);
    }
}

impl Canvas for ShapeBatch {
    fn fill_disc(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.push_shape(center, [radius, radius], radius, 0.0, color);
    }

    fn fill_glow(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.push_shape(center, [radius, radius], radius, 1.0, color);
    }

    fn fill_rect(&mut self, origin: [f32; 2], size: [f32; 2], corner_radius: f32, color: Rgba) {
        let half = [size[0] / 2.0, size[1] / 2.0];
        let corner = corner_radius.min(half[0]).min(half[1]).max(0.0);
        self.push_shape([origin[0] + half[0], origin[1] + half[1]], half, corner, 0.0, color);
    }

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        // hairlines are approximated by fading a one-pixel line
        let coverage = (width * self.pixel_ratio).min(1.0);
        let color = color.with_alpha(color.a * coverage).to_array();
        if color[3] <= 0.0 {
            return;
        }
        self.lines.push(LineVertex { position: from, color });
        self.lines.push(LineVertex { position: to, color });
        let end = self.lines.len() as u32;
        self.extend_run(Primitive::Lines, end - 2, end);
    }
}

/// Everything drawn in one frame. Scene is painted first, then the grain
/// overlay, then the overlay layer on top.
#[derive(Debug)]
pub struct FrameBatch {
    pub scene: ShapeBatch,
    pub overlay: ShapeBatch,
}

impl FrameBatch {
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            scene: ShapeBatch::new(pixel_ratio),
            overlay: ShapeBatch::new(pixel_ratio),
        }
    }

    pub fn reset(&mut self, pixel_ratio: f32) {
        self.scene.reset(pixel_ratio);
        self.overlay.reset(pixel_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgba = Rgba::from_rgb8(37, 99, 235, 0.5);

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 40);
        assert_eq!(std::mem::size_of::<LineVertex>(), 24);
    }

    #[test]
    fn test_disc_is_round_square() {
        let mut batch = ShapeBatch::new(1.0);
        batch.fill_disc([10.0, 20.0], 3.0, BLUE);
        let shape = batch.shapes[0];
        assert_eq!(shape.center, [10.0, 20.0]);
        assert_eq!(shape.half_size, [3.0, 3.0]);
        assert_eq!(shape.corner_radius, 3.0);
        assert_eq!(shape.softness, 0.0);
    }

    #[test]
    fn test_rect_centre_and_corner_clamp() {
        let mut batch = ShapeBatch::new(1.0);
        batch.fill_rect([0.0, 0.0], [100.0, 4.0], 10.0, BLUE);
        let shape = batch.shapes[0];
        assert_eq!(shape.center, [50.0, 2.0]);
        assert_eq!(shape.half_size, [50.0, 2.0]);
        assert_eq!(shape.corner_radius, 2.0);
    }

    #[test]
    fn test_invisible_shapes_dropped() {
        let mut batch = ShapeBatch::new(1.0);
        batch.fill_disc([0.0, 0.0], 3.0, BLUE.with_alpha(0.0));
        batch.fill_rect([0.0, 0.0], [0.0, 10.0], 0.0, BLUE);
        assert!(batch.shapes.is_empty());
    }

    #[test]
    fn test_runs_keep_call_order() {
        let mut batch = ShapeBatch::new(1.0);
        batch.fill_disc([0.0, 0.0], 1.0, BLUE);
        batch.fill_disc([5.0, 0.0], 1.0, BLUE);
        batch.stroke_line([0.0, 0.0], [5.0, 0.0], 1.0, BLUE);
        batch.stroke_line([5.0, 0.0], [9.0, 0.0], 1.0, BLUE);
        batch.fill_glow([9.0, 9.0], 4.0, BLUE);
        // invisible calls do not split runs
        batch.fill_disc([1.0, 1.0], 1.0, BLUE.with_alpha(0.0));
        batch.fill_disc([2.0, 2.0], 1.0, BLUE);

        let runs: Vec<(Primitive, u32, u32)> =
            batch.runs.iter().map(|r| (r.primitive, r.start, r.end)).collect();
        assert_eq!(
            runs,
            vec![
                (Primitive::Shapes, 0, 2),
                (Primitive::Lines, 0, 4),
                (Primitive::Shapes, 2, 4),
            ]
        );

        batch.reset(1.0);
        assert!(batch.runs.is_empty());
    }

    #[test]
    fn test_field_lines_paint_over_particles() {
        let field = crate::simulation::ParticleField::new(400.0, 400.0);
        let mut batch = ShapeBatch::new(1.0);
        field.draw(&mut batch);

        let order: Vec<Primitive> = batch.runs.iter().map(|r| r.primitive).collect();
        assert_eq!(order, vec![Primitive::Shapes, Primitive::Lines]);
        assert_eq!(batch.runs[1].end as usize, batch.lines.len());
    }

    #[test]
    fn test_hairline_alpha_scales_with_pixel_ratio() {
        let mut batch = ShapeBatch::new(1.0);
        batch.stroke_line([0.0, 0.0], [10.0, 0.0], 0.5, BLUE);
        assert_eq!(batch.lines.len(), 2);
        assert!((batch.lines[0].color[3] - 0.25).abs() < 1e-6);

        batch.reset(2.0);
        assert!(batch.lines.is_empty());
        batch.stroke_line([0.0, 0.0], [10.0, 0.0], 0.5, BLUE);
        assert!((batch.lines[1].color[3] - 0.5).abs() < 1e-6);
    }
}

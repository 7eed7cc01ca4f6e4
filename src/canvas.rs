use crate::config::Rgba;

/// 2D drawing surface in logical pixels, origin top-left, y down.
///
/// Draw calls are painted in call order with alpha blending.
pub trait Canvas {
    /// Filled disc with an anti-aliased edge
    fn fill_disc(&mut self, center: [f32; 2], radius: f32, color: Rgba);

    /// Disc whose alpha falls off smoothly from the centre to `radius`
    fn fill_glow(&mut self, center: [f32; 2], radius: f32, color: Rgba);

    /// Axis-aligned rectangle given by its top-left corner and size
    fn fill_rect(&mut self, origin: [f32; 2], size: [f32; 2], corner_radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba);
}

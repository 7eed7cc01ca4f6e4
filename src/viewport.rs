use crate::config::MAX_PIXEL_RATIO;

/// Window size in logical (CSS-like) pixels, the window's physical size and
/// its scale factor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    physical: (u32, u32),
    scale_factor: f64,
}

impl Viewport {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width: (physical_width as f64 / scale_factor) as f32,
            height: (physical_height as f64 / scale_factor) as f32,
            physical: (physical_width, physical_height),
            scale_factor,
        }
    }

    /// Device pixel ratio used for hairline coverage and edge anti-aliasing,
    /// capped at 2
    pub fn pixel_ratio(&self) -> f32 {
        self.scale_factor.min(MAX_PIXEL_RATIO) as f32
    }

    /// Drawing surface size: the window's physical size, never zero.
    /// Surfaces must match the window extent on some backends.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.physical.0.max(1), self.physical.1.max(1))
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_size_divides_scale() {
        let viewport = Viewport::new(1600, 1200, 2.0);
        assert_eq!(viewport.size(), (800.0, 600.0));
        assert_eq!(viewport.surface_size(), (1600, 1200));
    }

    #[test]
    fn test_pixel_ratio_capped() {
        let viewport = Viewport::new(2400, 1800, 3.0);
        assert_eq!(viewport.size(), (800.0, 600.0));
        assert_eq!(viewport.pixel_ratio(), 2.0);
        // the surface still covers every physical pixel of the window
        assert_eq!(viewport.surface_size(), (2400, 1800));
        assert_eq!(viewport.scale_factor(), 3.0);
    }

    #[test]
    fn test_fractional_scale_keeps_physical_size() {
        let viewport = Viewport::new(1001, 751, 1.25);
        assert_eq!(viewport.surface_size(), (1001, 751));
        assert_eq!(viewport.pixel_ratio(), 1.25);
    }

    #[test]
    fn test_minimised_window() {
        let viewport = Viewport::new(0, 0, 1.0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.surface_size(), (1, 1));
    }
}

use crate::config::GRID_CELL_SIZE;

/// A point mass anchored to a rest position on the layout grid.
///
/// `base_x`/`base_y` are fixed at creation; the spring force always pulls
/// the particle back towards them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub base_x: f32,
    pub base_y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Spatial grid cell the particle was last bucketed into
    pub grid_x: i32,
    pub grid_y: i32,
}

impl Particle {
    /// Create a particle at rest on its base position
    pub fn at_rest(x: f32, y: f32) -> Self {
        let (grid_x, grid_y) = cell_coords(x, y, GRID_CELL_SIZE);
        Self {
            x,
            y,
            base_x: x,
            base_y: y,
            vx: 0.0,
            vy: 0.0,
            grid_x,
            grid_y,
        }
    }

    pub fn distance_to(&self, other: &Particle) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[cfg(test)]
impl Particle {
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    /// Distance from the rest position
    pub fn displacement(&self) -> f32 {
        (self.x - self.base_x).hypot(self.y - self.base_y)
    }
}

/// Cell coordinates containing (x, y) for square cells of `cell_size`
pub fn cell_coords(x: f32, y: f32, cell_size: f32) -> (i32, i32) {
    ((x / cell_size).floor() as i32, (y / cell_size).floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_rest_anchors_base() {
        let p = Particle::at_rest(160.0, 240.0);
        assert_eq!((p.base_x, p.base_y), (160.0, 240.0));
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
        assert_eq!(p.displacement(), 0.0);
    }

    #[test]
    fn test_cell_coords_floor_negative() {
        assert_eq!(cell_coords(-0.5, 99.9, 100.0), (-1, 0));
        assert_eq!(cell_coords(100.0, 250.0, 100.0), (1, 2));
    }
}

use crate::canvas::Canvas;
use crate::config::{
    CONNECTION_RADIUS, DAMPING, GRID_CELL_SIZE, LINE_OPACITY, LINE_WIDTH, PARTICLE_COLOR,
    PARTICLE_RADIUS, PARTICLE_SPACING, REPULSION_RADIUS, REPULSION_SCALE, REPULSION_STRENGTH,
    SPRING_CONSTANT,
};
use crate::simulation::particle::Particle;
use crate::simulation::spatial::SpatialGrid;

/// Grid of spring-anchored particles pushed around by the pointer
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    grid: SpatialGrid,
    width: f32,
    height: f32,
    spacing: f32,
}

impl ParticleField {
    /// Lay out a particle on every grid point covering `width` x `height`
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_spacing(width, height, PARTICLE_SPACING)
    }

    pub fn with_spacing(width: f32, height: f32, spacing: f32) -> Self {
        debug_assert!(GRID_CELL_SIZE >= CONNECTION_RADIUS);
        let mut field = Self {
            particles: Vec::new(),
            grid: SpatialGrid::new(GRID_CELL_SIZE),
            width,
            height,
            spacing,
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        let cols = (self.width / self.spacing).ceil().max(0.0) as usize;
        let rows = (self.height / self.spacing).ceil().max(0.0) as usize;

        self.particles.clear();
        self.particles.reserve(cols * rows);
        for i in 0..cols {
            for j in 0..rows {
                self.particles
                    .push(Particle::at_rest(i as f32 * self.spacing, j as f32 * self.spacing));
            }
        }

        self.grid = SpatialGrid::new(GRID_CELL_SIZE);
        self.grid.rebuild(&mut self.particles);
    }

    /// Replace the whole field if the viewport size changed.
    /// Returns whether the particles were rebuilt.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.populate();
        log::debug!(
            "Particle field rebuilt for {}x{}: {} particles",
            width,
            height,
            self.grid.len()
        );
        true
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance one frame of physics
    pub fn step(&mut self, pointer: Option<(f32, f32)>) {
        for particle in &mut self.particles {
            if let Some((px, py)) = pointer {
                let dx = particle.x - px;
                let dy = particle.y - py;
                let distance = dx.hypot(dy);
                let force = repulsion(distance) * REPULSION_SCALE;
                if force > 0.0 {
                    // pointer -> particle
                    let angle = dy.atan2(dx);
                    particle.vx += angle.cos() * force;
                    particle.vy += angle.sin() * force;
                }
            }

            particle.vx += (particle.base_x - particle.x) * SPRING_CONSTANT;
            particle.vy += (particle.base_y - particle.y) * SPRING_CONSTANT;

            particle.vx *= DAMPING;
            particle.vy *= DAMPING;

            particle.x += particle.vx;
            particle.y += particle.vy;
        }

        self.grid.rebuild(&mut self.particles);
    }

    /// Draw particles, then a line for every pair inside the connection radius
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for particle in &self.particles {
            canvas.fill_disc([particle.x, particle.y], PARTICLE_RADIUS, PARTICLE_COLOR);
        }

        for (i, particle) in self.particles.iter().enumerate() {
            for j in self.grid.neighbors_of(particle) {
                // each unordered pair once
                if j <= i {
                    continue;
                }
                let other = &self.particles[j];
                if let Some(opacity) = connection_opacity(particle.distance_to(other)) {
                    canvas.stroke_line(
                        [particle.x, particle.y],
                        [other.x, other.y],
                        LINE_WIDTH,
                        PARTICLE_COLOR.with_alpha(opacity),
                    );
                }
            }
        }
    }
}

/// Unscaled pointer push at `distance`: linear from REPULSION_STRENGTH at
/// the pointer down to zero at REPULSION_RADIUS
pub fn repulsion(distance: f32) -> f32 {
    if distance >= REPULSION_RADIUS {
        return 0.0;
    }
    (REPULSION_RADIUS - distance) / REPULSION_RADIUS * REPULSION_STRENGTH
}

/// Line opacity for two particles `distance` apart, `None` if no line is drawn
pub fn connection_opacity(distance: f32) -> Option<f32> {
    if distance > 0.0 && distance < CONNECTION_RADIUS {
        Some((1.0 - distance / CONNECTION_RADIUS) * LINE_OPACITY)
    } else {
        None
    }
}

#[cfg(test)]
impl ParticleField {
    fn from_particles(mut particles: Vec<Particle>, width: f32, height: f32) -> Self {
        let mut grid = SpatialGrid::new(GRID_CELL_SIZE);
        grid.rebuild(&mut particles);
        Self {
            particles,
            grid,
            width,
            height,
            spacing: PARTICLE_SPACING,
        }
    }
}

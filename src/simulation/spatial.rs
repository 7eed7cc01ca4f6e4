use std::collections::HashMap;

use crate::simulation::particle::{cell_coords, Particle};

/// Key of a square grid cell: (floor(x / cell), floor(y / cell))
pub type CellKey = (i32, i32);

/// Buckets particle indices by fixed-size square cells so neighbour lookup
/// only has to visit a 3x3 window of cells.
///
/// The grid does not support removal; it is cleared and refilled whole.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    buckets: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            buckets: HashMap::new(),
        }
    }

    pub fn cell_key_of(&self, x: f32, y: f32) -> CellKey {
        cell_coords(x, y, self.cell_size)
    }

    /// Append `index` to the bucket of the particle's current position and
    /// record that cell on the particle
    pub fn insert(&mut self, index: usize, particle: &mut Particle) {
        let key = self.cell_key_of(particle.x, particle.y);
        particle.grid_x = key.0;
        particle.grid_y = key.1;
        self.buckets.entry(key).or_default().push(index);
    }

    /// Indices of every particle in the 3x3 cell window around `particle`,
    /// including the particle itself. Callers filter by exact distance.
    pub fn neighbors_of(&self, particle: &Particle) -> impl Iterator<Item = usize> + '_ {
        let (gx, gy) = (particle.grid_x, particle.grid_y);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (gx + dx, gy + dy)))
            .filter_map(|key| self.buckets.get(&key))
            .flat_map(|bucket| bucket.iter().copied())
    }

    pub fn clear(&mut self) {
        // keep bucket allocations for the next rebuild
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Clear and re-insert every particle at its current position
    pub fn rebuild(&mut self, particles: &mut [Particle]) {
        self.clear();
        for (index, particle) in particles.iter_mut().enumerate() {
            self.insert(index, particle);
        }
    }

    /// Number of indexed particles
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grid_with(particles: &mut [Particle], cell_size: f32) -> SpatialGrid {
        let mut grid = SpatialGrid::new(cell_size);
        grid.rebuild(particles);
        grid
    }

    #[test]
    fn test_cell_key_is_floor_division() {
        let grid = SpatialGrid::new(100.0);
        assert_eq!(grid.cell_key_of(0.0, 0.0), (0, 0));
        assert_eq!(grid.cell_key_of(99.99, 100.0), (0, 1));
        assert_eq!(grid.cell_key_of(-1.0, -101.0), (-1, -2));
    }

    #[test]
    fn test_insert_records_cell() {
        let mut grid = SpatialGrid::new(100.0);
        let mut p = Particle::at_rest(10.0, 10.0);
        p.x = 250.0;
        p.y = 120.0;
        grid.insert(0, &mut p);
        assert_eq!((p.grid_x, p.grid_y), (2, 1));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_neighbors_cover_3x3_window() {
        let mut particles = vec![
            Particle::at_rest(150.0, 150.0), // centre cell (1, 1)
            Particle::at_rest(50.0, 50.0),   // (0, 0)
            Particle::at_rest(250.0, 250.0), // (2, 2)
            Particle::at_rest(350.0, 150.0), // (3, 1), outside the window
        ];
        let grid = grid_with(&mut particles, 100.0);

        let mut found: Vec<usize> = grid.neighbors_of(&particles[0]).collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_rebuild_follows_moved_particles() {
        let mut particles = vec![Particle::at_rest(50.0, 50.0), Particle::at_rest(450.0, 50.0)];
        let mut grid = grid_with(&mut particles, 100.0);
        assert_eq!(grid.neighbors_of(&particles[0]).count(), 1);

        particles[1].x = 120.0;
        grid.rebuild(&mut particles);
        assert_eq!(grid.neighbors_of(&particles[0]).count(), 2);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_no_false_negatives_within_cell_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let radius = 100.0;
        let mut particles: Vec<Particle> = (0..400)
            .map(|_| Particle::at_rest(rng.gen_range(-300.0..900.0), rng.gen_range(-300.0..700.0)))
            .collect();
        let grid = grid_with(&mut particles, radius);

        for (i, p) in particles.iter().enumerate() {
            let candidates: Vec<usize> = grid.neighbors_of(p).collect();
            assert!(candidates.contains(&i));
            for (j, q) in particles.iter().enumerate() {
                if p.distance_to(q) < radius {
                    assert!(
                        candidates.contains(&j),
                        "particle {} missing neighbour {} at distance {}",
                        i,
                        j,
                        p.distance_to(q)
                    );
                }
            }
        }
    }
}

/// Axis-aligned rectangle in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side 2 * `half` centred on `center`
    pub fn around(center: [f32; 2], half: f32) -> Self {
        Self::new(center[0] - half, center[1] - half, half * 2.0, half * 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.width / 2.0, self.y + self.height / 2.0]
    }
}

/// How a region reacts to the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    /// Region leans towards the pointer by `strength`; the cursor
    /// highlights while over it
    Magnetic { strength: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

#[derive(Clone, Copy, Debug)]
struct Region {
    id: RegionId,
    bounds: Rect,
    interaction: Interaction,
}

/// Regions that components have declared interactive.
///
/// Components register themselves here instead of being discovered; the
/// cursor asks the registry what the pointer is over.
#[derive(Debug, Default)]
pub struct InteractiveRegistry {
    regions: Vec<Region>,
    next_id: u32,
}

impl InteractiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, bounds: Rect, interaction: Interaction) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push(Region {
            id,
            bounds,
            interaction,
        });
        id
    }

    /// Returns false if the region was not registered
    pub fn unregister(&mut self, id: RegionId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|r| r.id != id);
        self.regions.len() != before
    }

    pub fn set_bounds(&mut self, id: RegionId, bounds: Rect) {
        if let Some(region) = self.regions.iter_mut().find(|r| r.id == id) {
            region.bounds = bounds;
        }
    }

    pub fn bounds(&self, id: RegionId) -> Option<Rect> {
        self.find(id).map(|r| r.bounds)
    }

    pub fn interaction(&self, id: RegionId) -> Option<Interaction> {
        self.find(id).map(|r| r.interaction)
    }

    /// Topmost (latest registered) region under the point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<RegionId> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.bounds.contains(x, y))
            .map(|r| r.id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    fn find(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}

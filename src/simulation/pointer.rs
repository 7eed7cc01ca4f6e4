/// Most recent pointer position in logical pixels.
///
/// Written by pointer events, read once per frame. No queueing: the last
/// write wins. `None` means the pointer is not over the surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    position: Option<(f32, f32)>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    /// Pointer left the surface
    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.position(), None);

        pointer.set(10.0, 20.0);
        pointer.set(30.0, 40.0);
        assert_eq!(pointer.position(), Some((30.0, 40.0)));

        pointer.clear();
        assert_eq!(pointer.position(), None);
    }
}

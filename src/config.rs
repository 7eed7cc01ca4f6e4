// ============================================
// Particle Field
// ============================================

/// Distance between particles of the rest grid, in logical pixels
pub const PARTICLE_SPACING: f32 = 80.0;

/// Radius of a rendered particle disc
pub const PARTICLE_RADIUS: f32 = 1.2;

/// Particle fill: rgba(37, 99, 235, 0.25)
pub const PARTICLE_COLOR: Rgba = Rgba::from_rgb8(37, 99, 235, 0.25);

// ============================================
// Particle Physics
// ============================================

/// Distance within which the pointer pushes particles away
pub const REPULSION_RADIUS: f32 = 150.0;

/// Peak repulsion at zero distance, before scaling
pub const REPULSION_STRENGTH: f32 = 0.5;

/// Scale applied to the repulsion when it is added to velocity
pub const REPULSION_SCALE: f32 = 0.2;

/// Pull towards the rest position, per frame
pub const SPRING_CONSTANT: f32 = 0.03;

/// Velocity multiplier applied every frame (< 1)
pub const DAMPING: f32 = 0.92;

// ============================================
// Connective Lines
// ============================================

/// Particles closer than this are joined by a line
pub const CONNECTION_RADIUS: f32 = 100.0;

/// Opacity of a line between two coincident particles
pub const LINE_OPACITY: f32 = 0.1;

pub const LINE_WIDTH: f32 = 0.5;

/// Spatial grid cell size. Must be >= CONNECTION_RADIUS so the 3x3 window
/// covers every neighbour inside the connection radius.
pub const GRID_CELL_SIZE: f32 = CONNECTION_RADIUS;

// ============================================
// Render Loop
// ============================================

pub const TARGET_FPS: u32 = 60;

/// Device pixel ratio cap for the drawing surface
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Page background (#050505)
pub const BACKGROUND_COLOR: Rgba = Rgba::from_rgb8(5, 5, 5, 1.0);

// ============================================
// Cursor
// ============================================

pub const CURSOR_DOT_RADIUS: f32 = 5.0;
pub const CURSOR_DOT_COLOR: Rgba = Rgba::from_rgb8(59, 130, 246, 1.0);
pub const CURSOR_DOT_HOVER_COLOR: Rgba = Rgba::from_rgb8(96, 165, 250, 1.0);
pub const CURSOR_DOT_HOVER_SCALE: f32 = 0.7;
pub const CURSOR_HOVER_SECS: f32 = 0.2;
pub const CURSOR_GLOW_RADIUS: f32 = 10.0;
pub const CURSOR_GLOW_COLOR: Rgba = Rgba::from_rgb8(59, 130, 246, 0.5);

pub const TRAIL_LENGTH: usize = 5;
pub const TRAIL_SECS: f32 = 0.4;
/// Extra delay per trail segment
pub const TRAIL_STAGGER_SECS: f32 = 0.035;

// ============================================
// Magnetic Buttons
// ============================================

pub const MAGNETIC_STRENGTH: f32 = 0.4;
pub const MAGNETIC_FOLLOW_SECS: f32 = 0.4;
pub const MAGNETIC_RELEASE_SECS: f32 = 0.6;
pub const MAGNETIC_BUTTON_RADIUS: f32 = 28.0;
/// Distance of the button centre from the bottom edge
pub const MAGNETIC_BUTTON_MARGIN: f32 = 96.0;
pub const MAGNETIC_BUTTON_COLOR: Rgba = Rgba::from_rgb8(37, 99, 235, 0.9);

// ============================================
// Parallax Gradients
// ============================================

pub const TOP_BLOB_RADIUS: f32 = 400.0;
pub const TOP_BLOB_COLOR: Rgba = Rgba::from_rgb8(37, 99, 235, 0.15);
pub const TOP_BLOB_TRAVEL: [f32; 2] = [50.0, 30.0];
pub const TOP_BLOB_SECS: f32 = 2.0;

pub const BOTTOM_BLOB_RADIUS: f32 = 300.0;
pub const BOTTOM_BLOB_COLOR: Rgba = Rgba::from_rgb8(15, 23, 42, 0.6);
pub const BOTTOM_BLOB_TRAVEL: [f32; 2] = [-40.0, -25.0];
pub const BOTTOM_BLOB_SECS: f32 = 2.5;

// ============================================
// Grain Overlay
// ============================================

pub const GRAIN_OPACITY: f32 = 0.04;

// ============================================
// Page Loader
// ============================================

pub const LOADER_TICK_MS: u64 = 200;
/// Upper bound of the random progress added per tick
pub const LOADER_MAX_STEP: f32 = 30.0;
pub const LOADER_HOLD_MS: u64 = 500;
pub const LOADER_FADE_SECS: f32 = 0.8;
pub const LOADER_LIFT: f32 = 100.0;
pub const LOADER_BAR_SECS: f32 = 0.3;
pub const LOADER_BAR_SIZE: [f32; 2] = [256.0, 4.0];
pub const LOADER_TRACK_COLOR: Rgba = Rgba::from_rgb8(30, 41, 59, 0.5);
pub const LOADER_BAR_COLOR: Rgba = Rgba::from_rgb8(59, 130, 246, 1.0);
pub const LOADER_LOGO_SIZE: f32 = 80.0;
pub const LOADER_LOGO_COLOR: Rgba = Rgba::from_rgb8(37, 99, 235, 1.0);

// ============================================
// FPS Counter
// ============================================

pub const FPS_GOOD: f64 = 55.0;
pub const FPS_FAIR: f64 = 30.0;

/// Straight (non-premultiplied) colour with components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise blend towards `other`
    pub fn mix(self, other: Rgba, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

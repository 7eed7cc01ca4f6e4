pub mod cursor;
pub mod interactive;
pub mod loader;
pub mod magnetic;
pub mod parallax;
pub mod tween;

pub use cursor::CursorTrail;
pub use interactive::InteractiveRegistry;
pub use loader::PageLoader;
pub use magnetic::MagneticButton;
pub use parallax::Parallax;

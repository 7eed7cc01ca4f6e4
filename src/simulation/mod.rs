mod field;
mod particle;
mod pointer;
mod spatial;
mod throttle;

pub use field::ParticleField;
pub use pointer::PointerState;
pub use throttle::FrameThrottle;

//! Numerical primitives for persistence diagram intensity estimation.

pub mod math;

pub use math::gamma::*;
pub use math::moments::*;
pub use math::stable::*;

mod cycle;
mod geometry;
mod scheduler;

pub use cycle::*;
pub use geometry::*;
pub use scheduler::*;

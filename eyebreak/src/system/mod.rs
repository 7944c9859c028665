mod lock;
mod sound;

pub use lock::*;
pub use sound::*;

pub mod constants;
pub mod errors;
pub mod geodesy;
pub mod math;
pub mod rng;

pub use constants::*;
pub use errors::*;
pub use geodesy::*;
pub use math::*;
pub use rng::RngManager;

mod clock;
pub mod config;

pub use clock::{SystemClock, VirtualClock, WallClock};
pub use config::{ReplayConfig, SyntheticConfig, TimingConfig};

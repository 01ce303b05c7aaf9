pub mod replay;

pub use replay::{ReplayConfig, SyntheticConfig, TimingConfig};

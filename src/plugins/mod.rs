mod replay;

pub use replay::{ReplayPlugin, ReplaySet};

mod logs;

// Re-export test fixtures
pub use logs::*;

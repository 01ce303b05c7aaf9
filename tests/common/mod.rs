mod assertions;
mod fixtures;
mod helpers;
mod test_app;

// Re-export
pub use assertions::{assert_non_decreasing, assert_record_valid};

pub use helpers::*;

pub use fixtures::*;
pub use test_app::{PublishedRecords, TestApp, TestAppBuilder};

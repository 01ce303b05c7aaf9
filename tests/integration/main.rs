#[path = "../common/mod.rs"]
mod common;

mod replay_tests;

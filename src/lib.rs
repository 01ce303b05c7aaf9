pub mod components;
pub mod plugins;
pub mod replay;
pub mod resources;
pub mod systems;
pub mod utils;

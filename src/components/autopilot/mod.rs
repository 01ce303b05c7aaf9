mod controller;
mod mode;
mod params;

pub use controller::{AutopilotCommand, AutopilotController, StartPoint};
pub use mode::{FlightMode, ModeInputs};
pub use params::AutopilotParameters;

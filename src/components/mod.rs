pub mod aircraft;
pub mod autopilot;
pub mod task;

pub use aircraft::{AircraftKinematics, AircraftState, WindVector};
pub use autopilot::{
    AutopilotCommand, AutopilotController, AutopilotParameters, FlightMode, StartPoint,
};
pub use task::{
    share_task, GlidePolar, LegStats, SharedTask, StaticTask, TaskPoint, TaskProgressView,
};

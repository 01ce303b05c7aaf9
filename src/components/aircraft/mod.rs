mod kinematics;
mod state;

pub use kinematics::AircraftKinematics;
pub use state::{AircraftState, WindVector};

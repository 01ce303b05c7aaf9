use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{CLIMB_CEILING, FINAL_GLIDE_MARGIN};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightMode {
    Climb,
    #[default]
    Cruise,
    FinalGlide,
}

/// Values the mode transitions are decided on, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeInputs {
    pub altitude: f64,
    pub target_height: f64,
    pub remaining_altitude_diff: f64,
    pub active_point: usize,
}

impl ModeInputs {
    fn final_glide_reachable(&self) -> bool {
        self.active_point > 0 && self.remaining_altitude_diff >= 0.0
    }
}

impl FlightMode {
    pub fn next(self, inputs: &ModeInputs) -> FlightMode {
        match self {
            FlightMode::Cruise if inputs.final_glide_reachable() => FlightMode::FinalGlide,
            FlightMode::Cruise if inputs.altitude <= inputs.target_height => FlightMode::Climb,
            FlightMode::FinalGlide if inputs.remaining_altitude_diff < FINAL_GLIDE_MARGIN => {
                FlightMode::Climb
            }
            FlightMode::Climb if inputs.final_glide_reachable() => FlightMode::FinalGlide,
            FlightMode::Climb if inputs.altitude > CLIMB_CEILING => FlightMode::Cruise,
            mode => mode,
        }
    }

    pub fn is_climbing(self) -> bool {
        self == FlightMode::Climb
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightMode::Climb => "climb",
            FlightMode::Cruise => "cruise",
            FlightMode::FinalGlide => "final glide",
        };
        f.write_str(name)
    }
}

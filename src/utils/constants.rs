// Synthetic flight
pub const SYNTHETIC_TIMESTEP: f64 = 1.0; // s, one autopilot/kinematics step per sample
pub const SEED_GROUND_SPEED: f64 = 16.0; // m/s, ground speed at tick zero
pub const START_RUNUP_DISTANCE: f64 = 200.0; // m behind the start point

// Flight mode thresholds
pub const CLIMB_CEILING: f64 = 1500.0; // m, climb ends above this altitude
pub const FINAL_GLIDE_MARGIN: f64 = -20.0; // m, final glide abandoned below this
pub const MIN_TARGET_HEIGHT: f64 = 300.0; // m, floor for the climb trigger
pub const BEST_CRUISE_TRACK_MIN_DISTANCE: f64 = 1000.0; // m

// Heading noise
pub const HEADING_FILTER_PERIOD: f64 = 8.0; // ticks
pub const MIN_WIND_CORRECTION: f64 = 0.0001; // |sin| below which no crab is applied

// Trajectory interpolation
pub const INTERPOLATION_WINDOW: usize = 4;
pub const CATMULL_ROM_TENSION: f64 = 0.98;
pub const LOOKAHEAD_MARGIN: f64 = 0.1; // s
pub const TANGENT_INTERVAL: f64 = 0.1; // s

// Playback speed
pub const SPEED_RAMP_STEP: f64 = 1.0; // speed factor added per key press
pub const SPEED_RAMP_MAX_REPEATS: u32 = 9;
pub const MAX_PLAYBACK_SPEED: f64 = 100.0;

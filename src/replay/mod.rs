mod blackboard;
mod engine;
mod igc;
mod interpolator;
mod nmea;
mod source;
mod speed_ramp;

pub use blackboard::{BlackboardRecord, Freshness, Provenance, SharedBlackboard};
pub use engine::{ReplayEngine, TickOutcome};
pub use igc::{parse_b_record, BRecord, IgcParser};
pub use interpolator::{InterpolatedFix, TrajectoryInterpolator};
pub use nmea::NmeaParser;
pub use source::{LogFileSource, LogFix, LogFormat, ReplaySource, SyntheticSource};
pub use speed_ramp::{SpeedDirection, SpeedRamp};

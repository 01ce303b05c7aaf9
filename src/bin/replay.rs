use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

use soar_replay::{
    plugins::ReplayPlugin,
    replay::ReplayEngine,
    resources::ReplayConfig,
    systems::{FastForwardReplay, ReplayFinished},
};

#[derive(Parser, Debug, Default, PartialEq)]
#[command(version, about, long_about = "replay an IGC or NMEA log, or fly a synthetic task")]
struct CliArgs {
    /// Flight log to replay
    file: Option<PathBuf>,

    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// YAML replay configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds to skip once the replay has started
    #[arg(long)]
    fast_forward: Option<f64>,
}

/// Fast-forward requested on the command line, sent once virtual time exists
#[derive(Resource)]
struct PendingFastForward(Option<f64>);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => ReplayConfig::load(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.playback_speed = speed;
    }
    config.validate()?;

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(10))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(ReplayPlugin::new(config).with_autostart(args.file))
        .insert_resource(PendingFastForward(args.fast_forward))
        .add_systems(
            Update,
            (request_fast_forward, print_new_records, exit_when_finished),
        )
        .run();

    Ok(())
}

fn request_fast_forward(
    mut pending: ResMut<PendingFastForward>,
    engine: Res<ReplayEngine>,
    mut requests: EventWriter<FastForwardReplay>,
) {
    if pending.0.is_some() && engine.virtual_time().is_some() {
        if let Some(seconds) = pending.0.take() {
            requests.send(FastForwardReplay { seconds });
        }
    }
}

/// Writes every newly published record to stdout as a JSON line
fn print_new_records(engine: Res<ReplayEngine>, mut last_sequence: Local<u64>) {
    let record = engine.blackboard().snapshot();
    if record.sequence == *last_sequence {
        return;
    }
    *last_sequence = record.sequence;
    match serde_json::to_string(&record) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Failed to encode record: {}", e),
    }
}

fn exit_when_finished(mut finished: EventReader<ReplayFinished>, mut exit: EventWriter<AppExit>) {
    if finished.read().next().is_some() {
        info!("Replay finished");
        exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("soar_replay").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_arguments() {
        let args = parse(&["flight.igc", "--speed", "4", "--fast-forward", "600"]).unwrap();
        assert_eq!(
            args,
            CliArgs {
                file: Some(PathBuf::from("flight.igc")),
                speed: Some(4.0),
                config: None,
                fast_forward: Some(600.0),
            }
        );
        assert_eq!(parse(&[]).unwrap(), CliArgs::default());

        let args = parse(&["--config", "replay.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("replay.yaml")));
        assert_eq!(args.file, None);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(parse(&["--speed"]).is_err());
        assert!(parse(&["--speed", "fast"]).is_err());
        assert!(parse(&["--loop"]).is_err());
        assert!(parse(&["a.igc", "b.igc"]).is_err());
    }
}

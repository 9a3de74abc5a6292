//! IKEA desk demo CLI.
//!
//! Expands the linear desk assembly into a branching world, materializes
//! placeholder media for it and prints the video overlay as JSON.
//!
//! # Usage
//!
//! ```bash
//! ikea_desk [states] [endings] [branch_points]
//! ```
//!
//! # Example
//!
//! ```bash
//! WORLDBENCH_LOG=worldbench_expand=debug ikea_desk 20 5 3
//! ```

use std::process::ExitCode;

use example::{DemoError, run};
use worldbench_core::TracingConfig;
use worldbench_expand::ExpansionConfig;

fn parse_targets(args: &[String]) -> Result<ExpansionConfig, String> {
    let defaults = ExpansionConfig::default();
    let mut targets = [
        defaults.target_state_count(),
        defaults.target_ending_count(),
        defaults.branch_point_count(),
    ];
    if args.len() > targets.len() {
        return Err(format!("expected at most {} arguments", targets.len()));
    }
    for (slot, arg) in targets.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|e| format!("invalid count '{arg}': {e}"))?;
    }
    Ok(ExpansionConfig::new(targets[0], targets[1], targets[2]))
}

#[expect(clippy::print_stdout, reason = "the overlay JSON is the program's output")]
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let logging = match TracingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            TracingConfig::default().init();
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logging.init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_targets(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}. Usage: ikea_desk [states] [endings] [branch_points]");
            return ExitCode::FAILURE;
        }
    };

    let demo = match run(&config) {
        Ok(demo) => demo,
        Err(DemoError::Invalid(report)) => {
            for problem in report.errors() {
                tracing::error!(%problem, "validation");
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("\n{}", demo.world.summary());
    tracing::info!(walk = %demo.walk, clips = %demo.clips, "materialization finished");

    match demo.video.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn missing_targets_use_defaults() {
        let config = parse_targets(&args(&["12"])).unwrap();
        assert_eq!(config.target_state_count(), 12);
        assert_eq!(config.target_ending_count(), 5);
        assert_eq!(config.branch_point_count(), 3);
    }

    #[test]
    fn bad_targets_are_reported() {
        assert!(parse_targets(&args(&["twenty"])).unwrap_err().starts_with("invalid count 'twenty'"));
        assert!(parse_targets(&args(&["1", "2", "3", "4"])).is_err());
    }
}

use crate::core::sequencer::StepSpec;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{validate_bind_address, validate_path, Validate};
use clap::Parser;
use std::path::PathBuf;

/// Configuration for the startup sequencer. The sequencer itself has no
/// behavior knobs; these flags parameterize the two child invocations.
#[derive(Debug, Clone, Parser)]
#[command(name = "crypto-forecast")]
#[command(about = "Runs the daily analysis, then launches the dashboard server")]
pub struct SequencerConfig {
    /// Address the dashboard binds; passed through as --server.address
    #[arg(long, default_value = "0.0.0.0")]
    pub server_address: String,

    /// Port the dashboard binds; passed through as --server.port
    #[arg(long, default_value = "8501")]
    pub server_port: u16,

    /// Output directory shared by both steps
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Override the daily analysis executable (defaults to the sibling daily-runner)
    #[arg(long)]
    pub runner_bin: Option<PathBuf>,

    /// Override the dashboard executable (defaults to the sibling dashboard)
    #[arg(long)]
    pub dashboard_bin: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl SequencerConfig {
    pub fn analysis_step(&self) -> Result<StepSpec> {
        let program = match &self.runner_bin {
            Some(path) => path.clone(),
            None => sibling_binary("daily-runner")?,
        };
        Ok(StepSpec::new(
            "daily analysis",
            program,
            vec!["--output-path".to_string(), self.output_path.clone()],
        ))
    }

    pub fn dashboard_step(&self) -> Result<StepSpec> {
        let program = match &self.dashboard_bin {
            Some(path) => path.clone(),
            None => sibling_binary("dashboard")?,
        };
        Ok(StepSpec::new(
            "dashboard",
            program,
            vec![
                "--server.address".to_string(),
                self.server_address.clone(),
                "--server.port".to_string(),
                self.server_port.to_string(),
                "--data-dir".to_string(),
                self.output_path.clone(),
            ],
        ))
    }
}

impl Validate for SequencerConfig {
    fn validate(&self) -> Result<()> {
        validate_bind_address("server-address", &self.server_address)?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

/// Resolves a step binary installed next to the sequencer executable.
fn sibling_binary(name: &str) -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| ForecastError::ConfigError {
        message: "Cannot determine the sequencer's executable directory".to_string(),
    })?;
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_step_carries_explicit_bind_arguments() {
        let config = SequencerConfig::try_parse_from(["crypto-forecast"]).unwrap();
        let step = config.dashboard_step().unwrap();
        // The explicit-bind invocation: all interfaces, fixed port.
        assert!(step.args.contains(&"0.0.0.0".to_string()));
        assert!(step.args.contains(&"8501".to_string()));
        let addr_pos = step
            .args
            .iter()
            .position(|a| a == "--server.address")
            .unwrap();
        assert_eq!(step.args[addr_pos + 1], "0.0.0.0");
    }

    #[test]
    fn test_step_binaries_can_be_overridden() {
        let config = SequencerConfig::try_parse_from([
            "crypto-forecast",
            "--runner-bin",
            "/usr/bin/true",
            "--dashboard-bin",
            "/usr/bin/false",
        ])
        .unwrap();
        assert_eq!(
            config.analysis_step().unwrap().program,
            PathBuf::from("/usr/bin/true")
        );
        assert_eq!(
            config.dashboard_step().unwrap().program,
            PathBuf::from("/usr/bin/false")
        );
    }

    #[test]
    fn test_output_path_flows_to_both_steps() {
        let config =
            SequencerConfig::try_parse_from(["crypto-forecast", "--output-path", "/srv/forecasts"])
                .unwrap();
        assert!(config
            .analysis_step()
            .unwrap()
            .args
            .contains(&"/srv/forecasts".to_string()));
        assert!(config
            .dashboard_step()
            .unwrap()
            .args
            .contains(&"/srv/forecasts".to_string()));
    }

    #[test]
    fn test_validate_rejects_hostname_bind() {
        let config =
            SequencerConfig::try_parse_from(["crypto-forecast", "--server-address", "localhost"])
                .unwrap();
        assert!(config.validate().is_err());
    }
}

use crate::utils::error::{ForecastError, Result};
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;

pub const ANALYSIS_BANNER: &str = "--- Running daily analysis ---";
pub const DASHBOARD_BANNER: &str = "--- Starting dashboard server ---";

/// One child invocation: a program and its fixed argument list.
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl StepSpec {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }
}

/// Runs the two startup steps in strict sequence with fail-fast semantics.
///
/// The analysis step must exit 0 before the dashboard step is attempted; a
/// non-zero exit aborts the whole sequence and the failing child's exit code
/// becomes the sequencer's. The dashboard step is long-running: the sequencer
/// blocks on it and only returns when it terminates. Child stdio is inherited,
/// so step diagnostics land in the sequencer's own output.
pub struct Sequencer {
    analysis: StepSpec,
    dashboard: StepSpec,
}

impl Sequencer {
    pub fn new(analysis: StepSpec, dashboard: StepSpec) -> Self {
        Self {
            analysis,
            dashboard,
        }
    }

    pub async fn run(&self) -> Result<()> {
        println!("{}", ANALYSIS_BANNER);
        run_step(&self.analysis).await?;

        println!("{}", DASHBOARD_BANNER);
        run_step(&self.dashboard).await
    }
}

async fn run_step(step: &StepSpec) -> Result<()> {
    tracing::info!(
        "Launching {} step: {} {}",
        step.name,
        step.program.display(),
        step.args.join(" ")
    );
    let status = Command::new(&step.program)
        .args(&step.args)
        .status()
        .await
        .map_err(|source| ForecastError::StepLaunch {
            step: step.name.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ForecastError::StepFailed {
            step: step.name.clone(),
            code: exit_code_of(status),
        })
    }
}

/// Children killed by a signal have no exit code; treat that as a plain
/// failure.
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

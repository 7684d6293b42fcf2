// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `xrdbatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "xrdbatch",
    version,
    about = "Batch-run TOPAS refinements over diffraction patterns and collect the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory holding config.toml, app.log, app.pid and scratch files.
    ///
    /// Default: the directory containing the executable.
    #[arg(long, value_name = "DIR", global = true)]
    pub app_dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `XRDBATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Process the tasks described in a batch plan file.
    Run(RunArgs),
    /// Process a single ad-hoc task.
    Process(ProcessArgs),
    /// List the template catalog.
    Templates(TemplatesArgs),
    /// Show or update the settings file.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the batch plan (TOML).
    #[arg(long, value_name = "PATH")]
    pub plan: PathBuf,

    /// Process only the task with this name.
    #[arg(long, value_name = "NAME")]
    pub task: Option<String>,

    /// Parse the plan and print the tasks, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ProcessArgs {
    /// Template display name or path.
    #[arg(long, value_name = "NAME|PATH")]
    pub template: String,

    /// Pattern file to process (repeatable).
    #[arg(long = "pattern", value_name = "FILE")]
    pub patterns: Vec<PathBuf>,

    /// Directory whose `*.raw` files are added as patterns (repeatable).
    #[arg(long = "pattern-dir", value_name = "DIR")]
    pub pattern_dirs: Vec<PathBuf>,

    /// Report file to append results to.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Refinement executable (default: the configured tc_location).
    #[arg(long, value_name = "EXE")]
    pub program: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Options shared by the commands that run the refinement tool.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Per-pattern timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Never prompt for an output file; tasks without one fail.
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TemplatesArgs {
    /// Extra template file to add to the listing (repeatable).
    #[arg(long = "import", value_name = "FILE")]
    pub imports: Vec<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Path of the TOPAS command-line kernel (tc.exe).
    #[arg(long, value_name = "PATH")]
    pub tc: Option<PathBuf>,

    /// Path of the TOPAS GUI executable.
    #[arg(long, value_name = "PATH")]
    pub topas: Option<PathBuf>,

    /// Template directory.
    #[arg(long, value_name = "DIR")]
    pub inp_path: Option<PathBuf>,

    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,
}

impl ConfigArgs {
    pub fn has_updates(&self) -> bool {
        self.tc.is_some() || self.topas.is_some() || self.inp_path.is_some() || self.theme.is_some()
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_accepts_repeated_patterns() {
        let args = CliArgs::try_parse_from([
            "xrdbatch",
            "--log-level",
            "debug",
            "process",
            "--template",
            "quartz.inp",
            "--pattern",
            "a.raw",
            "--pattern",
            "b.raw",
            "--timeout",
            "30",
        ])
        .unwrap();

        match args.command {
            Command::Process(p) => {
                assert_eq!(p.template, "quartz.inp");
                assert_eq!(p.patterns, vec![PathBuf::from("a.raw"), PathBuf::from("b.raw")]);
                assert_eq!(p.session.timeout, Some(30));
                assert!(!p.session.no_prompt);
            }
            other => panic!("expected process command, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_plan() {
        assert!(CliArgs::try_parse_from(["xrdbatch", "run"]).is_err());
    }
}

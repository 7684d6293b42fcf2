use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use xrdbatch::config::Config;
use xrdbatch::engine::{Orchestrator, OrchestratorOptions};
use xrdbatch::fs::mock::MockFileSystem;

use crate::fake_runner::FakeToolRunner;

pub const TC: &str = "/opt/topas/tc";
pub const TOPAS: &str = "/opt/topas/topas";
pub const SCRATCH: &str = "/work";

/// A minimal TOPAS template with one directive clause.
pub const TEMPLATE: &str = "r_wp 0\niters 1000\nxdd \"old.raw\"\n\tx_calculation_step 0.02\n\tstr\n\t\tphase_name \"Quartz\"\n";

/// Typical refinement output for one pattern.
pub fn refinement_output(r_wp: &str, phases: &[(&str, &str)]) -> String {
    let mut text = format!("r_exp  3.21 r_wp  {r_wp} gof  1.5\n");
    for (name, weight) in phases {
        text.push_str(&format!(
            "\tstr\n\t\tphase_name \"{name}\"\n\t\tMVW( 60.08, 113.0`, {weight}`)\n"
        ));
    }
    text
}

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.path.tc_location = PathBuf::from(TC);
        config.path.topas_location = PathBuf::from(TOPAS);
        Self { config }
    }

    pub fn tc(mut self, path: &str) -> Self {
        self.config.path.tc_location = PathBuf::from(path);
        self
    }

    pub fn topas(mut self, path: &str) -> Self {
        self.config.path.topas_location = PathBuf::from(path);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrator over a mock filesystem and a fake tool.
pub fn orchestrator(fs: &MockFileSystem, runner: FakeToolRunner) -> Orchestrator {
    Orchestrator::new(
        ConfigBuilder::new().build(),
        Arc::new(fs.clone()),
        Box::new(runner),
        OrchestratorOptions {
            timeout: Duration::from_secs(150),
            scratch_dir: PathBuf::from(SCRATCH),
        },
    )
}

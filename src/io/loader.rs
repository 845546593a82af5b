use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::ProcessSpec;

use crate::config::{InterruptSourceConfig, KernelConfig, RunConfig};
use crate::error::SimError;
use crate::kernel::{InterruptEvent, InterruptKind, ProcessControlBlock};

pub const DEFAULT_WORKLOAD_PATH: &str = "data/workload.toml";

/// An interrupt the driver raises at a fixed tick, before that tick runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedInterrupt {
    pub at_tick: u64,
    pub kind: InterruptKind,
    #[serde(default)]
    pub description: Option<String>,
}

impl ScriptedInterrupt {
    pub fn to_event(&self) -> InterruptEvent {
        let event = InterruptEvent::new(self.kind, self.at_tick);
        match &self.description {
            Some(description) => event.with_description(description),
            None => event,
        }
    }
}

/// Everything one simulation run needs, as read from a TOML workload file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Workload {
    pub kernel: KernelConfig,
    pub interrupts: InterruptSourceConfig,
    pub run: RunConfig,
    pub process: Vec<ProcessSpec>,
    pub interrupt: Vec<ScriptedInterrupt>,
}

impl Workload {
    /// Builds every process in file order. Entries without a pid get their
    /// one-based position in the file.
    pub fn build_processes(&self) -> Result<Vec<ProcessControlBlock>, SimError> {
        let mut seen = HashSet::new();
        let mut pcbs = Vec::with_capacity(self.process.len());

        for (idx, spec) in self.process.iter().enumerate() {
            let pid = spec.pid.unwrap_or(idx as u32 + 1);
            if !seen.insert(pid) {
                return Err(SimError::validation(&spec.name, format!("duplicate pid {}", pid)));
            }
            pcbs.push(spec.build(pid)?);
        }

        Ok(pcbs)
    }

    /// Scripted interrupts ordered by the tick they fire on.
    pub fn scripted_interrupts(&self) -> Vec<ScriptedInterrupt> {
        let mut scripted = self.interrupt.clone();
        scripted.sort_by_key(|interrupt| interrupt.at_tick);
        scripted
    }

    fn validate(&self) -> Result<(), SimError> {
        self.kernel.validate()?;
        self.interrupts.validate()?;
        self.build_processes().map(|_| ())
    }
}

pub fn load_workload(path: &Path) -> Result<Workload, SimError> {
    let contents = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let workload = parse_workload(&contents)?;
    log::info!(
        "Loaded {} processes and {} scripted interrupts from {}",
        workload.process.len(),
        workload.interrupt.len(),
        path.display()
    );

    Ok(workload)
}

pub fn parse_workload(contents: &str) -> Result<Workload, SimError> {
    let workload: Workload = toml::from_str(contents)?;
    workload.validate()?;
    Ok(workload)
}

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::SimError;
use crate::kernel::Policy;

const DEFAULT_POLICY: Policy = Policy::Fcfs;
const DEFAULT_QUANTUM: u32 = 3;
const DEFAULT_RAM_LIMIT: usize = 10;

/// Scheduling knobs the kernel starts with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub policy: Policy,
    pub quantum: u32,
    pub ram_limit: usize,
}

impl Default for KernelConfig {
    fn default() -> KernelConfig {
        KernelConfig {
            policy: DEFAULT_POLICY,
            quantum: DEFAULT_QUANTUM,
            ram_limit: DEFAULT_RAM_LIMIT,
        }
    }
}

impl KernelConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        validate_quantum(self.quantum)?;
        validate_ram_limit(self.ram_limit)
    }
}

pub(crate) fn validate_quantum(quantum: u32) -> Result<(), SimError> {
    if quantum == 0 {
        return Err(SimError::Configuration("quantum must be at least one tick".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_ram_limit(ram_limit: usize) -> Result<(), SimError> {
    if ram_limit == 0 {
        return Err(SimError::Configuration("ram_limit must allow at least one process".to_string()));
    }
    Ok(())
}

/// Background interrupt generation. Intervals are wall-clock milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterruptSourceConfig {
    pub enabled: bool,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub seed: u64,
}

impl Default for InterruptSourceConfig {
    fn default() -> InterruptSourceConfig {
        InterruptSourceConfig {
            enabled: false,
            min_interval_ms: 500,
            max_interval_ms: 2000,
            seed: 0,
        }
    }
}

impl InterruptSourceConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_interval_ms == 0 {
            return Err(SimError::Configuration("max_interval_ms must be positive".to_string()));
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(SimError::Configuration(format!(
                "min_interval_ms ({}) exceeds max_interval_ms ({})",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        Ok(())
    }
}

/// How the driver runs the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Upper bound on ticks to simulate.
    pub ticks: u64,
    /// Wall-clock pause between ticks.
    pub tick_interval_ms: u64,
    /// Stop early once every submitted process has terminated.
    pub stop_when_idle: bool,
    /// Where to write the final snapshot as JSON, if anywhere.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            ticks: 100,
            tick_interval_ms: 0,
            stop_when_idle: true,
            snapshot_path: None,
        }
    }
}

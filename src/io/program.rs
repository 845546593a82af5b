use serde::Deserialize;

use crate::error::SimError;
use crate::kernel::{IoBehavior, ProcessControlBlock, ISR_PID};

/// One I/O episode as written in a workload file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoSpec {
    /// Instructions executed before the request is generated.
    pub after: i64,
    /// Blocked ticks needed to satisfy it.
    pub duration: i64,
}

/// A process as written in a workload file. Numbers are kept signed so bad
/// input reaches `build` and is rejected there with a useful message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSpec {
    #[serde(default)]
    pub pid: Option<u32>,
    pub name: String,
    pub instructions: i64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub arrival: i64,
    pub deadline: i64,
    #[serde(default)]
    pub io: Option<IoSpec>,
}

impl ProcessSpec {
    /// Validates the entry and builds the process block the kernel admits.
    pub fn build(&self, pid: u32) -> Result<ProcessControlBlock, SimError> {
        if pid == ISR_PID {
            return Err(SimError::validation(
                &self.name,
                format!("pid {} is reserved for interrupt service routines", ISR_PID),
            ));
        }
        if self.instructions <= 0 {
            return Err(SimError::validation(&self.name, "needs at least one instruction"));
        }
        if self.arrival < 0 {
            return Err(SimError::validation(&self.name, "arrival tick cannot be negative"));
        }
        if self.deadline < 0 {
            return Err(SimError::validation(&self.name, "deadline falls before arrival"));
        }

        let instructions = to_u32(&self.name, "instructions", self.instructions)?;
        let mut pcb = ProcessControlBlock::new(
            pid,
            &self.name,
            instructions,
            self.priority,
            self.arrival as u64,
            self.deadline as u64,
        );

        if let Some(io) = &self.io {
            if io.after <= 0 || io.duration <= 0 {
                return Err(SimError::validation(
                    &self.name,
                    "I/O generation and service times must be positive",
                ));
            }
            let after = to_u32(&self.name, "io.after", io.after)?;
            let duration = to_u32(&self.name, "io.duration", io.duration)?;
            pcb = pcb.with_io(IoBehavior::new(after, duration));
        }

        Ok(pcb)
    }
}

fn to_u32(name: &str, field: &str, value: i64) -> Result<u32, SimError> {
    u32::try_from(value).map_err(|_| SimError::validation(name, format!("{} is out of range: {}", field, value)))
}

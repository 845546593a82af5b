use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::pipeline::KernelCore;
use super::{InterruptEvent, Policy, ProcessControlBlock, Snapshot};

use crate::config::{self, KernelConfig};
use crate::error::SimError;

/// The simulated kernel, shared between the tick driver, workload
/// submitters, interrupt sources and snapshot readers.
///
/// Every mutation goes through one lock, so a tick always sees the queues
/// in a consistent state and submissions land between ticks. Readers never
/// take that lock: they get the snapshot published by the last tick.
pub struct Kernel {
    core: Mutex<KernelCore>,
    published: RwLock<Arc<Snapshot>>,
    clock: AtomicU64,
}

impl Kernel {
    pub fn new(config: &KernelConfig) -> Result<Kernel, SimError> {
        config.validate()?;

        Ok(Kernel {
            core: Mutex::new(KernelCore::new(config)),
            published: RwLock::new(Arc::new(Snapshot::empty(config.policy, config.quantum, config.ram_limit))),
            clock: AtomicU64::new(0),
        })
    }

    /// Queues a process in NEW. It is admitted on the first tick at or after
    /// its arrival tick that has a free RAM slot.
    pub fn add_process(&self, pcb: ProcessControlBlock) {
        if let Some(mut core) = self.lock_core("add_process") {
            core.add_process(pcb);
        }
    }

    /// Queues an interrupt. Interrupts are handled one per tick, oldest first.
    pub fn add_interrupt(&self, event: InterruptEvent) {
        if let Some(mut core) = self.lock_core("add_interrupt") {
            core.add_interrupt(event);
        }
    }

    /// Advances the simulation by one tick and publishes the resulting snapshot.
    pub fn tick(&self) -> Arc<Snapshot> {
        let Some(mut core) = self.lock_core("tick") else {
            return self.get_snapshot();
        };

        let snapshot = Arc::new(core.tick());

        // Publish before releasing the core so readers never observe a tick
        // older than one a later submitter already saw.
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        self.clock.store(core.get_clock(), Ordering::Release);

        snapshot
    }

    pub fn set_policy(&self, policy: Policy) {
        if let Some(mut core) = self.lock_core("set_policy") {
            core.set_policy(policy);
        }
    }

    pub fn set_quantum(&self, quantum: u32) -> Result<(), SimError> {
        config::validate_quantum(quantum)?;
        if let Some(mut core) = self.lock_core("set_quantum") {
            core.set_quantum(quantum);
        }
        Ok(())
    }

    pub fn set_ram_limit(&self, ram_limit: usize) -> Result<(), SimError> {
        config::validate_ram_limit(ram_limit)?;
        if let Some(mut core) = self.lock_core("set_ram_limit") {
            core.set_ram_limit(ram_limit);
        }
        Ok(())
    }

    /// The most recently published snapshot.
    pub fn get_snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The tick the next call to `tick` will run.
    pub fn current_tick(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Total instructions the CPU has executed, ISRs included.
    pub fn instructions_executed(&self) -> u64 {
        self.lock_core("instructions_executed")
            .map(|core| core.get_instructions_executed())
            .unwrap_or_default()
    }

    fn lock_core(&self, operation: &str) -> Option<MutexGuard<'_, KernelCore>> {
        match self.core.lock() {
            Ok(core) => Some(core),
            Err(_) => {
                log::error!("kernel state poisoned, skipping {}", operation);
                None
            }
        }
    }
}

mod cpu;
mod event_log;
mod interrupt;
mod interrupt_source;
mod io_behavior;
mod long_term_scheduler;
mod memory;
mod metrics;
mod pipeline;
mod process_control_block;
mod queues;
mod rng;
mod shared;
mod short_term_scheduler;
mod snapshot;

use memory::Memory;
use queues::ProcessQueues;

pub mod driver;

pub use driver::Driver;
pub use event_log::DEFAULT_LOG_CAPACITY;
pub use interrupt::{InterruptEvent, InterruptKind};
pub use interrupt_source::InterruptSource;
pub use io_behavior::IoBehavior;
pub use metrics::MetricsSummary;
pub use process_control_block::{ProcessControlBlock, ProcessState, ISR_INSTRUCTIONS, ISR_PID};
pub use shared::Kernel;
pub use short_term_scheduler::{Policy, PreemptReason};
pub use snapshot::{ProcessSummary, Snapshot};

#[cfg(test)]
mod properties;

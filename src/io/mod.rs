pub mod core_dump;
pub mod loader;
pub mod program;

pub use loader::{load_workload, parse_workload, ScriptedInterrupt, Workload, DEFAULT_WORKLOAD_PATH};
pub use program::{IoSpec, ProcessSpec};

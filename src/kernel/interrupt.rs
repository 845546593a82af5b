use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed catalog of external stimuli the simulated spacecraft reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterruptKind {
    SensorData,
    CommSignal,
    TimerTick,
    ErrorDetected,
    BatteryLow,
}

impl InterruptKind {
    pub const ALL: [InterruptKind; 5] = [
        InterruptKind::SensorData,
        InterruptKind::CommSignal,
        InterruptKind::TimerTick,
        InterruptKind::ErrorDetected,
        InterruptKind::BatteryLow,
    ];

    /// Higher is more urgent.
    pub fn priority(self) -> i32 {
        match self {
            InterruptKind::SensorData => 5,
            InterruptKind::CommSignal => 7,
            InterruptKind::TimerTick => 3,
            InterruptKind::ErrorDetected => 9,
            InterruptKind::BatteryLow => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InterruptKind::SensorData => "SENSOR_DATA",
            InterruptKind::CommSignal => "COMM_SIGNAL",
            InterruptKind::TimerTick => "TIMER_TICK",
            InterruptKind::ErrorDetected => "ERROR_DETECTED",
            InterruptKind::BatteryLow => "BATTERY_LOW",
        }
    }
}

impl fmt::Display for InterruptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An asynchronous stimulus waiting in the kernel's inbox. Consumed at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptEvent {
    kind: InterruptKind,
    priority: i32,
    tick_generated: u64,
    description: String,
}

impl InterruptEvent {
    pub fn new(kind: InterruptKind, tick_generated: u64) -> InterruptEvent {
        InterruptEvent {
            kind,
            priority: kind.priority(),
            tick_generated,
            description: format!("External event: {}", kind),
        }
    }

    pub fn with_description(mut self, description: &str) -> InterruptEvent {
        self.description = description.to_string();
        self
    }

    pub fn get_kind(&self) -> InterruptKind {
        self.kind
    }

    pub fn get_priority(&self) -> i32 {
        self.priority
    }

    pub fn get_tick_generated(&self) -> u64 {
        self.tick_generated
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for InterruptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interrupt[{}, priority={}, tick={}]",
            self.kind, self.priority, self.tick_generated
        )
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::rng::SimRng;
use super::{InterruptEvent, InterruptKind, Kernel};

use crate::config::InterruptSourceConfig;
use crate::error::SimError;

/// Background thread that raises random external interrupts against a kernel
/// at random wall-clock intervals.
pub struct InterruptSource {
    kernel: Arc<Kernel>,
    config: InterruptSourceConfig,
    stop_signal: Arc<(Mutex<bool>, Condvar)>,
    generated: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl InterruptSource {
    pub fn new(kernel: Arc<Kernel>, config: InterruptSourceConfig) -> Result<InterruptSource, SimError> {
        config.validate()?;

        Ok(InterruptSource {
            kernel,
            config,
            stop_signal: Arc::new((Mutex::new(false), Condvar::new())),
            generated: Arc::new(AtomicU64::new(0)),
            handle: None,
        })
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        {
            let (stopped, _) = &*self.stop_signal;
            *stopped.lock().unwrap_or_else(PoisonError::into_inner) = false;
        }

        let kernel = Arc::clone(&self.kernel);
        let stop_signal = Arc::clone(&self.stop_signal);
        let generated = Arc::clone(&self.generated);
        let config = self.config.clone();

        log::info!(
            "Interrupt source started ({}-{} ms)",
            config.min_interval_ms,
            config.max_interval_ms
        );
        self.handle = Some(thread::spawn(move || {
            run_source(&kernel, &config, &stop_signal, &generated);
        }));
    }

    /// Signals the thread and waits for it. Safe to call more than once.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        {
            let (stopped, condvar) = &*self.stop_signal;
            *stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
            condvar.notify_all();
        }

        if handle.join().is_err() {
            log::error!("Interrupt source thread panicked");
        }
        log::info!("Interrupt source stopped after {} interrupts", self.generated());
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }
}

impl Drop for InterruptSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_source(
    kernel: &Kernel,
    config: &InterruptSourceConfig,
    stop_signal: &(Mutex<bool>, Condvar),
    generated: &AtomicU64,
) {
    let mut rng = SimRng::new(config.seed);
    let (stopped, condvar) = stop_signal;

    loop {
        let interval = Duration::from_millis(rng.gen_inclusive(config.min_interval_ms, config.max_interval_ms));
        let deadline = Instant::now() + interval;

        // Sleep out the interval unless stop is signalled first.
        let mut is_stopped = stopped.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if *is_stopped {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            is_stopped = condvar
                .wait_timeout(is_stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        drop(is_stopped);

        let kind = InterruptKind::ALL[rng.gen_index(InterruptKind::ALL.len())];
        kernel.add_interrupt(InterruptEvent::new(kind, kernel.current_tick()));
        generated.fetch_add(1, Ordering::Relaxed);
        log::debug!("Interrupt source raised {}", kind);
    }
}

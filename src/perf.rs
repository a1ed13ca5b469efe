//! Diagnostic timing and event logging.
//!
//! Two independent channels: `--perf` prints coarse startup timings to
//! stderr through [`Scope`] guards, and `--debug-log` streams fine-
//! grained events (frames, fetches, input) to a file for offline
//! inspection. Both are off unless asked for.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static TIMINGS_ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<Option<EventLog>>> = LazyLock::new(|| Mutex::new(None));

struct EventLog {
    started: Instant,
    writer: BufWriter<File>,
}

/// Guard that reports its lifetime on drop when timings are enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.2} ms", self.name, elapsed_ms);
    }
}

pub fn set_enabled(enabled: bool) {
    TIMINGS_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    TIMINGS_ENABLED.load(Ordering::Relaxed)
}

/// Time a named region; the measurement is printed when the guard
/// drops.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Route event logging to a file, or disable it with `None`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut slot = EVENT_LOG.lock().expect("event log lock poisoned");
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "blogless event log")?;
            writer.flush()?;
            *slot = Some(EventLog {
                started: Instant::now(),
                writer,
            });
        }
        None => *slot = None,
    }
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    EVENT_LOG
        .lock()
        .expect("event log lock poisoned")
        .is_some()
}

/// Append one event line; a no-op unless a log file is active.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut slot = EVENT_LOG.lock().expect("event log lock poisoned");
    let Some(log) = slot.as_mut() else {
        return;
    };
    let elapsed_ms = log.started.elapsed().as_secs_f64() * 1000.0;
    let _ = writeln!(log.writer, "{elapsed_ms:>10.3}ms {name} {}", detail.as_ref());
    let _ = log.writer.flush();
}

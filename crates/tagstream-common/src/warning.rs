//! Deduplicated diagnostics on stderr.
//!
//! Each distinct `(component, message)` pair is reported once per process,
//! until [`clear_warnings`]. The record is bounded: messages are cut to
//! [`MAX_MESSAGE_CHARS`] characters, and once [`MAX_RECORDED`] distinct
//! warnings are held, new ones are only counted. A single notice is printed
//! when that happens.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Distinct warnings kept for deduplication before new ones are suppressed.
pub const MAX_RECORDED: usize = 256;

/// Longest message, in characters, that is printed and recorded.
pub const MAX_MESSAGE_CHARS: usize = 120;

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Default)]
struct Record {
    seen: HashSet<String>,
    suppressed: usize,
}

static RECORD: Mutex<Option<Record>> = Mutex::new(None);

/// Output switch, on by default.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// A panic while holding the lock cannot leave the record inconsistent, so
/// poisoning is ignored.
fn record() -> MutexGuard<'static, Option<Record>> {
    RECORD.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Report markup that was recovered from, once per unique message.
///
/// Messages are recorded even while output is disabled, so re-enabling
/// output does not replay them.
///
/// ```ignore
/// warn_once("Dom", "ignoring unmatched end tag </b>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let message = truncate(message);
    let key = format!("[{component}] {message}");

    let mut guard = record();
    let record = guard.get_or_insert_with(Record::default);
    if record.seen.contains(&key) {
        return;
    }
    if record.seen.len() >= MAX_RECORDED {
        record.suppressed += 1;
        if record.suppressed == 1 {
            emit("Warnings", "too many distinct warnings, suppressing the rest");
        }
        return;
    }
    let _ = record.seen.insert(key);
    drop(guard);

    emit(component, &message);
}

fn emit(component: &str, message: &str) {
    if ENABLED.load(Ordering::Relaxed) {
        eprintln!("{YELLOW}[tagstream {component}] ⚠ {message}{RESET}");
    }
}

fn truncate(message: &str) -> Cow<'_, str> {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((end, _)) => Cow::Owned(format!("{}…", &message[..end])),
        None => Cow::Borrowed(message),
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    record().as_ref().map_or(0, |record| record.seen.len())
}

/// Number of warnings dropped because the record was full.
#[must_use]
pub fn suppressed_count() -> usize {
    record().as_ref().map_or(0, |record| record.suppressed)
}

/// Turn warning output on or off for the whole process.
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Returns whether warnings are currently printed.
#[must_use]
pub fn warnings_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Forget every recorded warning, e.g. before processing another document.
pub fn clear_warnings() {
    *record() = None;
}

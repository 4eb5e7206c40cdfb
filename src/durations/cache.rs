use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use super::probe::{MetadataProbe, ProbeError};

/// Label used for tracks whose length could not be determined.
pub const UNKNOWN_DURATION: &str = "—:—";
/// Label shown for an unlocked track while its probe is still running.
pub const PENDING_DURATION: &str = "…";

/// A probed duration, stored once per file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDuration {
    pub length: Option<Duration>,
    pub label: String,
}

impl CachedDuration {
    fn from_probe(result: Result<Duration, ProbeError>) -> Self {
        match result {
            Ok(d) if !d.is_zero() => Self {
                length: Some(d),
                label: format_duration(d),
            },
            _ => Self {
                length: None,
                label: UNKNOWN_DURATION.to_string(),
            },
        }
    }
}

/// `m:ss`, rounded to the nearest second.
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return UNKNOWN_DURATION.to_string();
    }
    let secs = (d.as_millis() + 500) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `m:ss`, truncated; used for the elapsed side of the position bar.
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

pub type Waiter = Box<dyn FnOnce(&CachedDuration)>;

struct ProbeDone {
    file_id: String,
    result: Result<Duration, ProbeError>,
}

/// Memoized track durations.
///
/// Each file id is probed at most once. Requests that arrive while a probe is
/// running are queued and all of them are notified when it completes.
/// Completions are applied on the owning thread by [`DurationCache::poll`].
pub struct DurationCache {
    entries: HashMap<String, CachedDuration>,
    pending: HashMap<String, Vec<Waiter>>,
    probe: Arc<dyn MetadataProbe>,
    done_tx: Sender<ProbeDone>,
    done_rx: Receiver<ProbeDone>,
    probes_started: usize,
}

impl DurationCache {
    pub fn new(probe: Arc<dyn MetadataProbe>) -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            probe,
            done_tx,
            done_rx,
            probes_started: 0,
        }
    }

    /// Make sure a duration for `file_id` is (or will be) cached, then call `on_ready`.
    ///
    /// Cached values invoke `on_ready` before returning.
    pub fn ensure_duration(
        &mut self,
        file_id: &str,
        on_ready: impl FnOnce(&CachedDuration) + 'static,
    ) {
        if let Some(entry) = self.entries.get(file_id) {
            on_ready(entry);
            return;
        }
        if let Some(waiters) = self.pending.get_mut(file_id) {
            waiters.push(Box::new(on_ready));
            return;
        }

        self.pending.insert(file_id.to_string(), vec![Box::new(on_ready)]);
        self.probes_started += 1;

        let probe = Arc::clone(&self.probe);
        let tx = self.done_tx.clone();
        let id = file_id.to_string();
        let spawned = thread::Builder::new()
            .name("duration-probe".to_string())
            .spawn(move || {
                // A panicking probe must still complete, or its waiters hang forever.
                let result = panic::catch_unwind(AssertUnwindSafe(|| probe.probe(&id)))
                    .unwrap_or_else(|payload| {
                        Err(ProbeError::Panicked(panic_message(&*payload)))
                    });
                let _ = tx.send(ProbeDone { file_id: id, result });
            });

        if let Err(e) = spawned {
            self.complete(file_id.to_string(), Err(ProbeError::Spawn(e)));
        }
    }

    /// Apply finished probes. Returns how many completed.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.done_rx.try_recv() {
            self.complete(done.file_id, done.result);
            applied += 1;
        }
        applied
    }

    fn complete(&mut self, file_id: String, result: Result<Duration, ProbeError>) {
        if let Err(e) = &result {
            tracing::debug!(file = %file_id, error = %e, "duration probe failed");
        }
        // Write-once: a value that already landed is never replaced.
        let entry = self
            .entries
            .entry(file_id.clone())
            .or_insert_with(|| CachedDuration::from_probe(result))
            .clone();

        for waiter in self.pending.remove(&file_id).unwrap_or_default() {
            waiter(&entry);
        }
    }

    pub fn get(&self, file_id: &str) -> Option<&CachedDuration> {
        self.entries.get(file_id)
    }

    pub fn length(&self, file_id: &str) -> Option<Duration> {
        self.entries.get(file_id).and_then(|e| e.length)
    }

    /// Duration text for a row: the label when known, `…` while probing.
    pub fn display_label(&self, file_id: &str, unlocked: bool) -> &str {
        if !unlocked {
            return "";
        }
        self.entries
            .get(file_id)
            .map(|e| e.label.as_str())
            .unwrap_or(PENDING_DURATION)
    }

    pub fn is_pending(&self, file_id: &str) -> bool {
        self.pending.contains_key(file_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of probes issued over the cache's lifetime.
    pub fn probes_started(&self) -> usize {
        self.probes_started
    }
}

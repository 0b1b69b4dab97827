//! Scripted in-memory `TableSource` for cache harnesses.
//!
//! Clone the `Arc<FakeSource>` before handing it to the cache to keep control
//! over what the next read returns. A gated source blocks inside
//! `read_table` until the test releases it, which is how the harnesses hold a
//! reload open while poking at the cache from another thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pantry_core::{LoadError, RawTable, TableSource};

pub struct FakeSource {
    next: Mutex<Option<RawTable>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Gate>>,
}

struct Gate {
    entered: Sender<()>,
    release: Receiver<()>,
}

/// Test-side end of a gated source.
pub struct GateHandle {
    entered: Receiver<()>,
    release: Sender<()>,
}

impl GateHandle {
    /// Block until a reload is inside `read_table`.
    pub fn wait_entered(&self) {
        self.entered
            .recv_timeout(Duration::from_secs(5))
            .expect("reload never reached the source");
    }

    /// Let the blocked reload finish.
    pub fn release(&self) {
        self.release.send(()).expect("source dropped");
    }
}

impl FakeSource {
    pub fn with_table(table: RawTable) -> Arc<Self> {
        Arc::new(Self {
            next: Mutex::new(Some(table)),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    /// Every read fails until [`FakeSource::set_table`] is called.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            next: Mutex::new(None),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        })
    }

    pub fn set_table(&self, table: RawTable) {
        *self.next.lock().unwrap() = Some(table);
    }

    pub fn set_failing(&self) {
        *self.next.lock().unwrap() = None;
    }

    /// Block the next read until the returned handle releases it.
    pub fn gate(&self) -> GateHandle {
        let (entered_tx, entered_rx) = channel();
        let (release_tx, release_rx) = channel();
        *self.gate.lock().unwrap() = Some(Gate {
            entered: entered_tx,
            release: release_rx,
        });
        GateHandle {
            entered: entered_rx,
            release: release_tx,
        }
    }

    /// Number of times `read_table` has been entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TableSource for FakeSource {
    fn read_table(&self) -> Result<RawTable, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.send(()).ok();
            gate.release
                .recv_timeout(Duration::from_secs(5))
                .expect("test never released the gate");
        }

        self.next
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LoadError::MissingHeader {
                path: "fake".into(),
            })
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, PoisonError, RwLock},
    thread::JoinHandle,
};
use duck_lang::{Token, TypedValue};
use tracing::debug;

use crate::{console::Console, loader::Program};

/// Run-flag gating the main scan. Labels share the flag namespace, so a
/// label with this name aliases the gate.
pub const EXECUTING: &str = "EXECUTING";

// A Context is everything a running program shares between its units of
// control: the statements and labels fixed at load time, plus the symbol
// table, run-flags and console that every unit reads and writes.
//
// Each accessor takes its lock for a single read or write and releases it
// before returning. Nothing is held across the execution of a statement, so
// a read-modify-write like `set x = x + 1` running in two units races the
// same way it would over unguarded maps; only the individual accesses are
// atomic.
pub struct Context {
    program: Program,
    symbols: RwLock<HashMap<String, TypedValue>>,
    flags: Mutex<HashMap<String, bool>>,
    console: Console,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl Context {
    pub fn new(program: Program, console: Console) -> Self {
        Context {
            program,
            symbols: RwLock::new(HashMap::new()),
            flags: Mutex::new(HashMap::new()),
            console,
            threads: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> &[Vec<Token>] {
        &self.program.statements
    }

    pub fn statement(&self, index: usize) -> Option<&[Token]> {
        self.program.statements.get(index).map(Vec::as_slice)
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.program.labels.get(name).copied()
    }

    pub fn symbol(&self, name: &str) -> Option<TypedValue> {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set_symbol(&self, name: &str, value: TypedValue) {
        self.symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    /// Flags that were never set read as false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_flag(&self, name: &str, running: bool) {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), running);
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub(crate) fn push_thread(&self, handle: JoinHandle<()>) {
        let mut threads = self.threads.lock().unwrap_or_else(PoisonError::into_inner);
        threads.retain(|h| !h.is_finished());
        threads.push(handle);
    }

    /// Handles of spawned units not yet joined. Finished units are released
    /// whenever a new one is spawned.
    pub fn pending_threads(&self) -> usize {
        self.threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Waits for spawned units, including any they spawn in turn.
    pub fn join_threads(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = self
                .threads
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect();
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if handle.join().is_err() {
                    debug!(target: "duck", "thread unit panicked");
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let symbols = self
            .symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let flags = self
            .flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let labels = self
            .program
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Snapshot {
            symbols,
            labels,
            flags,
        }
    }
}

/// A point-in-time copy of a context's global state, ordered for stable
/// output.
#[derive(Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbols: BTreeMap<String, TypedValue>,
    pub labels: BTreeMap<String, usize>,
    pub flags: BTreeMap<String, bool>,
}

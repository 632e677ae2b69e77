//! Event bus between the host and its extensions.
//!
//! The bus owns the host's readiness state machine:
//!
//! ```text
//! Uninitialized ──initialize──▶ Loading ──all extensions settled──▶ Ready
//!        │                         │                                 │
//!        └─────────────────────────┴──────────destroy────────────────┴──▶ Destroyed
//! ```
//!
//! Events emitted before `Ready` are queued and flushed in emission order
//! once loading completes. After `Ready`, events are dispatched right away.

use crate::config::{DispatchMode, HostConfig};
use crate::hooks::Callback;
use crate::log::{HostLog, LogLevel};
use crate::scheduler::Scheduler;
use panelforge_runtime::{EventType, Payload};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle phase of a host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Destroyed,
}

/// An event accepted before the host was ready.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEmission {
    pub event: EventType,
    pub payload: Payload,
}

struct Lifecycle {
    phase: Phase,
    pending: VecDeque<PendingEmission>,
}

/// Listeners for one event type, keyed by extension identity.
type ListenerSlot = BTreeMap<String, Callback>;

/// Registry of event listeners plus the pending-emission queue.
pub struct EventBus {
    mode: DispatchMode,
    delay: Duration,
    scheduler: Arc<dyn Scheduler>,
    listeners: Mutex<HashMap<EventType, ListenerSlot>>,
    lifecycle: Mutex<Lifecycle>,
    log: HostLog,
}

impl EventBus {
    pub fn new(config: &HostConfig, scheduler: Arc<dyn Scheduler>, log: HostLog) -> Self {
        Self {
            mode: config.dispatch_mode,
            delay: config.dispatch_delay(),
            scheduler,
            listeners: Mutex::new(HashMap::new()),
            lifecycle: Mutex::new(Lifecycle {
                phase: Phase::Uninitialized,
                pending: VecDeque::new(),
            }),
            log,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.lock().phase
    }

    /// Number of events waiting for readiness.
    pub fn pending_len(&self) -> usize {
        self.lifecycle.lock().pending.len()
    }

    /// Snapshot of the pending queue, oldest first.
    pub fn pending(&self) -> Vec<PendingEmission> {
        self.lifecycle.lock().pending.iter().cloned().collect()
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: EventType) -> usize {
        self.listeners.lock().get(&event).map_or(0, |slot| slot.len())
    }

    /// Register `listener` for `event` on behalf of `identity`.
    ///
    /// In `PerExtension` mode this replaces only that identity's previous
    /// listener. In `Single` mode it replaces whatever was registered.
    pub fn add_listener(
        &self,
        event: EventType,
        identity: &str,
        listener: Callback,
        log: &HostLog,
    ) -> bool {
        if self.phase() == Phase::Destroyed {
            log.warn(format_args!(
                "Host destroyed, ignoring listener for '{}'",
                event
            ));
            return false;
        }

        let mut listeners = self.listeners.lock();
        let slot = listeners.entry(event).or_default();
        if self.mode == DispatchMode::Single {
            slot.clear();
        }
        slot.insert(identity.to_string(), listener);
        drop(listeners);

        log.debug(format_args!("Listening for '{}'", event));
        true
    }

    /// Remove the listener `identity` registered for `event`.
    ///
    /// In `Single` mode the sole listener is removed regardless of who
    /// registered it. Removing an absent listener is a no-op.
    pub fn remove_listener(&self, event: EventType, identity: &str, log: &HostLog) -> bool {
        let mut listeners = self.listeners.lock();
        let removed = match listeners.get_mut(&event) {
            Some(slot) => {
                let removed = match self.mode {
                    DispatchMode::PerExtension => slot.remove(identity).is_some(),
                    DispatchMode::Single => {
                        let had_listener = !slot.is_empty();
                        slot.clear();
                        had_listener
                    }
                };
                if slot.is_empty() {
                    listeners.remove(&event);
                }
                removed
            }
            None => false,
        };
        drop(listeners);

        if removed {
            log.debug(format_args!("Stopped listening for '{}'", event));
        } else {
            log.debug(format_args!("No listener for '{}' to remove", event));
        }
        removed
    }

    /// Emit an event.
    ///
    /// Before readiness the event is queued; afterwards it is dispatched to
    /// every listener for its type through the scheduler, so no listener
    /// runs inside `emit`. A destroyed bus drops events.
    pub fn emit(&self, event: EventType, payload: Payload) {
        let mut lifecycle = self.lifecycle.lock();
        let phase = lifecycle.phase;
        match phase {
            Phase::Ready => {
                drop(lifecycle);
                self.dispatch(event, payload);
            }
            Phase::Destroyed => {
                drop(lifecycle);
                self.log
                    .warn(format_args!("Host destroyed, dropping event '{}'", event));
            }
            Phase::Uninitialized | Phase::Loading => {
                lifecycle.pending.push_back(PendingEmission { event, payload });
                let queued = lifecycle.pending.len();
                drop(lifecycle);
                self.log.warn(format_args!(
                    "Host not ready, queued event '{}' ({} pending)",
                    event, queued
                ));
            }
        }
    }

    /// Move from `Uninitialized` to `Loading`. Fails with the current phase
    /// if loading already started.
    pub(crate) fn begin_loading(&self) -> Result<(), Phase> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.phase != Phase::Uninitialized {
            return Err(lifecycle.phase);
        }
        lifecycle.phase = Phase::Loading;
        Ok(())
    }

    /// Flush the pending queue in FIFO order and become `Ready`.
    ///
    /// Events emitted while the flush runs are queued behind the ones being
    /// flushed, so emission order is preserved. Returns the number of
    /// events flushed.
    pub(crate) fn mark_ready(&self) -> usize {
        let mut flushed = 0;
        loop {
            let batch = {
                let mut lifecycle = self.lifecycle.lock();
                if lifecycle.phase == Phase::Destroyed {
                    return flushed;
                }
                if lifecycle.pending.is_empty() {
                    lifecycle.phase = Phase::Ready;
                    return flushed;
                }
                std::mem::take(&mut lifecycle.pending)
            };

            for emission in batch {
                self.dispatch(emission.event, emission.payload);
                flushed += 1;
            }
        }
    }

    /// Drop every listener and pending event and refuse further work.
    pub(crate) fn destroy(&self) {
        {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.phase = Phase::Destroyed;
            lifecycle.pending.clear();
        }
        self.listeners.lock().clear();
    }

    fn trace_dispatch(&self, event: EventType, identity: &str) {
        self.log.log(
            LogLevel::Trace,
            format_args!("Dispatching '{}' to {}", event, identity),
        );
    }

    fn dispatch(&self, event: EventType, payload: Payload) {
        // Snapshot so listeners may (un)register without deadlocking.
        let targets: Vec<(String, Callback)> = self
            .listeners
            .lock()
            .get(&event)
            .map(|slot| {
                slot.iter()
                    .map(|(identity, listener)| (identity.clone(), Arc::clone(listener)))
                    .collect()
            })
            .unwrap_or_default();

        if targets.is_empty() {
            self.log
                .debug(format_args!("No listeners for event '{}'", event));
            return;
        }

        match self.mode {
            DispatchMode::PerExtension => {
                for (identity, listener) in targets {
                    self.trace_dispatch(event, &identity);
                    let payload = payload.clone();
                    self.scheduler
                        .schedule(self.delay, Box::new(move || listener(payload)));
                }
            }
            DispatchMode::Single => {
                for (identity, listener) in targets {
                    self.trace_dispatch(event, &identity);
                    let payload = payload.clone();
                    self.scheduler
                        .schedule(Duration::ZERO, Box::new(move || listener(payload)));
                }
            }
        }
    }
}

//! Readiness gate: joins a set of named startup sources and releases one callback when all are satisfied.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Mutex;

use burger_core::Logger;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Source satisfied by the platform connection handshake.
pub const CONNECTION: &str = "connection";
/// Source satisfied once the optional storage connection is up.
pub const STORAGE: &str = "storage";

type ReadyCallback = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct GateState {
    pending: BTreeSet<String>,
    callback: Option<ReadyCallback>,
    fired: bool,
}

/// N-way join over named readiness sources. The callback runs at most once, when nothing is pending.
pub struct ReadinessGate {
    state: Mutex<GateState>,
    logger: Logger,
}

impl ReadinessGate {
    pub fn new<I, S>(sources: I, logger: Logger) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new(GateState {
                pending: sources.into_iter().map(Into::into).collect(),
                callback: None,
                fired: false,
            }),
            logger,
        }
    }

    /// Sets the callback. Runs it right away when every source is already satisfied.
    /// A second call before the gate opens replaces the first callback.
    pub async fn on_ready<F, Fut>(&self, callback: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        {
            let mut state = self.lock();
            if state.fired {
                self.logger
                    .warn("Ready callback set after the client was already ready; ignoring it.");
                return;
            }
            state.callback = Some(Box::new(move || callback().boxed()));
        }
        self.try_fire().await;
    }

    /// Marks `source` satisfied. Returns true when this call released the callback.
    pub async fn satisfy(&self, source: &str) -> bool {
        {
            let mut state = self.lock();
            if !state.pending.remove(source) {
                self.logger
                    .debug(&format!("Readiness source {} already satisfied or unknown.", source));
                return false;
            }
            self.logger.debug(&format!(
                "Readiness source {} satisfied, {} remaining.",
                source,
                state.pending.len()
            ));
        }
        self.try_fire().await
    }

    pub fn has_fired(&self) -> bool {
        self.lock().fired
    }

    async fn try_fire(&self) -> bool {
        let callback = {
            let mut state = self.lock();
            if state.fired || !state.pending.is_empty() {
                return false;
            }
            match state.callback.take() {
                Some(cb) => {
                    state.fired = true;
                    cb
                }
                None => return false,
            }
        };
        self.logger.info("All readiness sources satisfied.");
        callback().await;
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Schedulers that drive subscriptions

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;

lazy_static::lazy_static! {
    /// Shared default scheduler, started on first use
    static ref PARALLEL: Scheduler = Scheduler::new(&SchedulerConfig::default())
        .unwrap_or_else(|e| panic!("failed to start the rx-parallel runtime: {e}"));
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker threads; `None` uses one per core
    pub worker_threads: Option<usize>,
    pub thread_name: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "rx-parallel".to_string(),
        }
    }
}

/// Where pipeline tasks and their callbacks run
///
/// Cloning is cheap; clones share the same runtime.
#[derive(Clone)]
pub struct Scheduler {
    handle: Handle,
    // Keeps a dedicated runtime alive; `None` when borrowing someone else's
    runtime: Option<Arc<OwnedRuntime>>,
}

/// Dedicated runtime that shuts down without blocking when the last clone goes
///
/// The last reference may be released on one of the runtime's own workers or
/// inside another runtime, where a plain `Runtime` drop panics.
struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            debug!("Scheduler shutting down");
            runtime.shutdown_background();
        }
    }
}

impl Scheduler {
    /// The shared default scheduler, started on first use
    pub fn parallel() -> Scheduler {
        PARALLEL.clone()
    }

    /// Start a dedicated multi-threaded runtime
    pub fn new(config: &SchedulerConfig) -> Result<Scheduler> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(config.thread_name.clone());
        if let Some(workers) = config.worker_threads {
            builder.worker_threads(workers.max(1));
        }
        let runtime = builder.build()?;

        debug!(
            thread_name = %config.thread_name,
            worker_threads = ?config.worker_threads,
            "Scheduler started"
        );

        Ok(Scheduler {
            handle: runtime.handle().clone(),
            runtime: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Run on an existing runtime, e.g. the one a `#[tokio::main]` built
    pub fn from_handle(handle: Handle) -> Scheduler {
        Scheduler {
            handle,
            runtime: None,
        }
    }

    /// Spawn a pipeline task; the task keeps this scheduler's runtime alive
    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let keep_alive = self.clone();
        self.handle.spawn(async move {
            let output = future.await;
            drop(keep_alive);
            output
        })
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("dedicated", &self.runtime.is_some())
            .finish()
    }
}

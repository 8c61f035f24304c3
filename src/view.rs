//! Mount/unmount lifecycle for asynchronously populated views.
//!
//! A [`ViewSlot`] owns the task that fills it. Unmounting aborts the task and
//! closes the slot; a result that still arrives afterwards is dropped instead
//! of being written into a view nobody is looking at.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use tokio::task::JoinHandle;

use crate::error::PriceDeskError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
    Unmounted,
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Settle into a `Result`, turning a failed load into an error for `view`.
    ///
    /// `Loading` and `Unmounted` carry no value and map to `Ok(None)`.
    pub fn into_result(self, view: &'static str) -> crate::Result<Option<T>> {
        match self {
            ViewState::Ready(value) => Ok(Some(value)),
            ViewState::Failed(reason) => Err(PriceDeskError::ViewFailed { view, reason }),
            ViewState::Loading | ViewState::Unmounted => Ok(None),
        }
    }
}

struct Shared<T> {
    state: ViewState<T>,
    mounted: bool,
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ViewSlot<T> {
    shared: Arc<Mutex<Shared<T>>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> ViewSlot<T> {
    /// Spawn `load` on the current runtime and start in [`ViewState::Loading`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount<F, E>(load: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display,
    {
        let shared = Arc::new(Mutex::new(Shared {
            state: ViewState::Loading,
            mounted: true,
        }));

        let slot = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            let outcome = load.await;
            let mut guard = lock(&slot);
            if !guard.mounted {
                debug!("View unmounted before its data arrived; discarding result");
                return;
            }
            guard.state = match outcome {
                Ok(value) => ViewState::Ready(value),
                Err(e) => ViewState::Failed(e.to_string()),
            };
        });

        Self {
            shared,
            task: Some(task),
        }
    }

    /// Wait for the load task to finish (or be aborted) and return the state.
    pub async fn settled(&mut self) -> ViewState<T>
    where
        T: Clone,
    {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.state()
    }

    pub fn state(&self) -> ViewState<T>
    where
        T: Clone,
    {
        lock(&self.shared).state.clone()
    }

    /// Apply `f` to the ready value without cloning it.
    pub fn with_ready<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        lock(&self.shared).state.ready().map(f)
    }

    pub fn is_mounted(&self) -> bool {
        lock(&self.shared).mounted
    }

    pub fn unmount(&mut self) {
        {
            let mut guard = lock(&self.shared);
            guard.mounted = false;
            guard.state = ViewState::Unmounted;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for ViewSlot<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

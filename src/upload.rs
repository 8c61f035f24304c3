//! Report upload and handoff to the dashboard.
//!
//! The flow is `Idle -> Submitting -> {Succeeded -> navigate, Failed -> Idle}`.
//! While a submission is in flight the trigger is disabled and further submits
//! are no-ops. The trigger is re-enabled when the submission settles, whether
//! it succeeded, failed, or was dropped mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use crate::error::UploadError;
use crate::gateway::ApiGateway;
use crate::models::{ReportFile, UploadResult};
use crate::store::{HandoffReader, HandoffStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Submitting,
}

/// What the caller should do after [`UploadHandoff::submit`] returns `Ok`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The report was parsed and stored; switch to the dashboard.
    NavigateToDashboard(UploadResult),
    /// Another submission is still in flight; nothing was sent.
    AlreadySubmitting,
}

/// Re-enables the trigger on every exit path.
struct TriggerGuard<'a>(&'a AtomicBool);

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the handoff store and is its only writer.
pub struct UploadHandoff {
    gateway: Arc<dyn ApiGateway>,
    store: HandoffStore,
    submitting: AtomicBool,
}

impl UploadHandoff {
    pub fn new(gateway: Arc<dyn ApiGateway>, store: HandoffStore) -> Self {
        Self {
            gateway,
            store,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> UploadPhase {
        if self.submitting.load(Ordering::Acquire) {
            UploadPhase::Submitting
        } else {
            UploadPhase::Idle
        }
    }

    /// Whether the submit control should be enabled.
    pub fn trigger_enabled(&self) -> bool {
        self.phase() == UploadPhase::Idle
    }

    /// Accessor for the dashboard's read-on-mount.
    pub fn reader(&self) -> HandoffReader {
        self.store.reader()
    }

    /// Upload `file` and, on success, replace the persisted handoff slot with
    /// the backend's response.
    ///
    /// On any failure the slot keeps its previous value. Nothing is retried;
    /// the user re-selects and re-submits.
    pub async fn submit(&self, file: Option<&ReportFile>) -> Result<SubmitOutcome, UploadError> {
        let file = file.ok_or(UploadError::NoFile)?;
        if !file.is_pdf() {
            return Err(UploadError::NotPdf(file.name.clone()));
        }

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Upload of {} ignored: a submission is already in flight", file.name);
            return Ok(SubmitOutcome::AlreadySubmitting);
        }
        let _guard = TriggerGuard(&self.submitting);

        let body = match self.gateway.upload(file).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Upload of {} failed: {}", file.name, e);
                return Err(UploadError::Transport(e));
            }
        };

        let result = UploadResult(body);
        self.store.write(&result).map_err(|e| {
            warn!("Could not persist upload result: {}", e);
            UploadError::Persist(e.to_string())
        })?;

        info!("Uploaded {}; handing off to dashboard", file.name);
        Ok(SubmitOutcome::NavigateToDashboard(result))
    }
}

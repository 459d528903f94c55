use crate::auth::AuthGate;
use crate::download::{DownloadError, DownloadOrchestrator};
use crate::metadata::{FetchError, MetadataFetcher};
use crate::types::{FormatId, Generation};
use crate::workflow::{TransitionError, WorkflowEvent, WorkflowSession, WorkflowState};
use async_lock::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The result was applied and the session is now in this state.
    Applied(WorkflowState),
    /// The session moved on while the call was in flight; nothing changed.
    Stale,
}

/// Drives the per-URL workflow: submit, choose a format, download.
///
/// Every submitted URL gets a new generation. Results of network calls are
/// applied only while the generation they were issued under is still the
/// current one.
pub struct SessionStateMachine {
    auth_gate: Arc<AuthGate>,
    metadata_fetcher: MetadataFetcher,
    download_orchestrator: DownloadOrchestrator,
    generation: AtomicU64,
    session: Mutex<WorkflowSession>,
}

impl SessionStateMachine {
    pub fn new(
        auth_gate: Arc<AuthGate>,
        metadata_fetcher: MetadataFetcher,
        download_orchestrator: DownloadOrchestrator,
    ) -> Self {
        Self {
            auth_gate,
            metadata_fetcher,
            download_orchestrator,
            generation: AtomicU64::new(0),
            session: Mutex::new(WorkflowSession::idle(Generation(0))),
        }
    }

    pub async fn snapshot(&self) -> WorkflowSession {
        self.session.lock().await.clone()
    }

    /// Abandons whatever is in progress and goes back to idle.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        let generation = self.next_generation();

        debug!(%generation, "Session reset");

        *session = WorkflowSession::idle(generation);
    }

    pub async fn submit(&self, url: &str) -> Result<StepOutcome, TransitionError> {
        let generation = {
            let mut session = self.session.lock().await;
            let generation = self.next_generation();
            *session = WorkflowSession::submitted(generation, url);
            generation
        };

        info!(%generation, url, "Fetching media metadata");

        let credential = self.auth_gate.credential().await;
        let result = self
            .metadata_fetcher
            .fetch_info(url, credential.as_ref())
            .await;

        let rejected =
            credential.filter(|_| matches!(result, Err(FetchError::NotAuthenticated(_))));
        let event = match result {
            Ok(metadata) => WorkflowEvent::MetadataFetched(metadata),
            Err(error) => WorkflowEvent::Fail(error.detail().to_string()),
        };

        let outcome = self.complete(generation, event).await?;

        if let (Some(rejected), StepOutcome::Applied(_)) = (rejected, &outcome) {
            self.auth_gate.invalidate(&rejected).await;
        }

        Ok(outcome)
    }

    pub async fn choose_format(&self, format_id: FormatId) -> Result<(), TransitionError> {
        let mut session = self.session.lock().await;

        session.apply(WorkflowEvent::ChooseFormat(format_id.clone()))?;

        debug!(generation = %session.generation(), %format_id, "Format selected");

        Ok(())
    }

    /// Downloads the selected format of the current media.
    pub async fn download(&self) -> Result<StepOutcome, TransitionError> {
        let (generation, request) = {
            let mut session = self.session.lock().await;
            let request = session.download_request().ok_or_else(|| {
                TransitionError::NotAllowed {
                    state: session.state().clone(),
                    event: "StartDownload",
                }
            })?;
            session.apply(WorkflowEvent::StartDownload)?;

            (session.generation(), request)
        };

        info!(%generation, format_id = %request.format_id, "Downloading artifact");

        let credential = self.auth_gate.credential().await;
        let result = match self
            .download_orchestrator
            .fetch_artifact(&request, credential.as_ref())
            .await
        {
            Ok(artifact) => {
                if !self.is_current(generation).await {
                    debug!(%generation, "Dropping artifact of a superseded session");
                    return Ok(StepOutcome::Stale);
                }
                self.download_orchestrator.commit(artifact).await
            }
            Err(error) => Err(error),
        };

        let rejected =
            credential.filter(|_| matches!(result, Err(DownloadError::NotAuthenticated(_))));
        let saved_location = result.as_ref().ok().map(|artifact| artifact.location.clone());
        let event = match result {
            Ok(artifact) => WorkflowEvent::DownloadSaved(artifact),
            Err(error) => WorkflowEvent::Fail(error.to_string()),
        };

        let outcome = self.complete(generation, event).await?;

        match (rejected, saved_location, &outcome) {
            (Some(rejected), _, StepOutcome::Applied(_)) => {
                self.auth_gate.invalidate(&rejected).await;
            }
            // The session moved on while the artifact was being written.
            (_, Some(location), StepOutcome::Stale) => {
                info!(
                    %generation,
                    location = %location.display(),
                    "Kept artifact saved for a superseded session"
                );
            }
            _ => {}
        }

        Ok(outcome)
    }

    async fn complete(
        &self,
        generation: Generation,
        event: WorkflowEvent,
    ) -> Result<StepOutcome, TransitionError> {
        let mut session = self.session.lock().await;

        if session.generation() != generation {
            debug!(
                %generation,
                current = %session.generation(),
                "Discarding result of a superseded session"
            );
            return Ok(StepOutcome::Stale);
        }

        session.apply(event)?;

        if let WorkflowState::Failed(reason) = session.state() {
            warn!(%generation, %reason, "Session step failed");
        }

        Ok(StepOutcome::Applied(session.state().clone()))
    }

    async fn is_current(&self, generation: Generation) -> bool {
        self.session.lock().await.generation() == generation
    }

    fn next_generation(&self) -> Generation {
        Generation(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

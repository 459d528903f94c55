use crate::types::{DownloadRequest, FormatId, Generation, MediaMetadata, SavedArtifact};

#[derive(Clone, Debug, PartialEq)]
pub enum WorkflowState {
    Idle,
    FetchingMetadata,
    MetadataReady,
    Downloading,
    DownloadSucceeded,
    Failed(String),
}

impl WorkflowState {
    pub fn is_failed(&self) -> bool {
        matches!(self, WorkflowState::Failed(_))
    }
}

#[derive(Clone, Debug)]
pub enum WorkflowEvent {
    MetadataFetched(MediaMetadata),
    ChooseFormat(FormatId),
    StartDownload,
    DownloadSaved(SavedArtifact),
    Fail(String),
}

impl WorkflowEvent {
    fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::MetadataFetched(_) => "MetadataFetched",
            WorkflowEvent::ChooseFormat(_) => "ChooseFormat",
            WorkflowEvent::StartDownload => "StartDownload",
            WorkflowEvent::DownloadSaved(_) => "DownloadSaved",
            WorkflowEvent::Fail(_) => "Fail",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransitionError {
    #[error("{event} is not allowed while in state {state:?}")]
    NotAllowed {
        state: WorkflowState,
        event: &'static str,
    },
    #[error("Format {0} is not offered for the current media")]
    UnknownFormat(FormatId),
}

/// Everything the client knows about the URL currently being worked on.
///
/// Transitions are plain functions over this value: no I/O happens here and
/// a rejected event leaves the session exactly as it was.
#[derive(Clone, Debug)]
pub struct WorkflowSession {
    generation: Generation,
    state: WorkflowState,
    source_url: Option<String>,
    metadata: Option<MediaMetadata>,
    selected_format: FormatId,
    last_artifact: Option<SavedArtifact>,
}

impl WorkflowSession {
    pub fn idle(generation: Generation) -> Self {
        Self {
            generation,
            state: WorkflowState::Idle,
            source_url: None,
            metadata: None,
            selected_format: FormatId::default(),
            last_artifact: None,
        }
    }

    /// A fresh session for a newly submitted URL. Nothing carries over from
    /// whatever session came before.
    pub fn submitted(generation: Generation, source_url: &str) -> Self {
        Self {
            state: WorkflowState::FetchingMetadata,
            source_url: Some(source_url.trim().to_string()),
            ..Self::idle(generation)
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn metadata(&self) -> Option<&MediaMetadata> {
        self.metadata.as_ref()
    }

    pub fn selected_format(&self) -> &FormatId {
        &self.selected_format
    }

    pub fn last_artifact(&self) -> Option<&SavedArtifact> {
        self.last_artifact.as_ref()
    }

    /// Request for the currently selected format, if the session has
    /// anything to download.
    pub fn download_request(&self) -> Option<DownloadRequest> {
        self.metadata.as_ref()?;
        let source_url = self.source_url.as_ref()?;

        Some(DownloadRequest::new(
            source_url.clone(),
            self.selected_format.clone(),
        ))
    }

    pub fn apply(&mut self, event: WorkflowEvent) -> Result<(), TransitionError> {
        match (self.state.clone(), event) {
            (WorkflowState::FetchingMetadata, WorkflowEvent::MetadataFetched(metadata)) => {
                self.metadata = Some(metadata);
                self.selected_format = FormatId::default();
                self.state = WorkflowState::MetadataReady;
            }
            (
                WorkflowState::MetadataReady | WorkflowState::DownloadSucceeded,
                WorkflowEvent::ChooseFormat(format_id),
            ) => {
                let offered = self
                    .metadata
                    .as_ref()
                    .map_or(false, |m| m.find_format(&format_id).is_some());

                if !offered {
                    return Err(TransitionError::UnknownFormat(format_id));
                }

                self.selected_format = format_id;
            }
            (
                WorkflowState::MetadataReady | WorkflowState::DownloadSucceeded,
                WorkflowEvent::StartDownload,
            ) if self.download_request().is_some() => {
                self.state = WorkflowState::Downloading;
            }
            (WorkflowState::Downloading, WorkflowEvent::DownloadSaved(artifact)) => {
                self.last_artifact = Some(artifact);
                self.state = WorkflowState::DownloadSucceeded;
            }
            (
                WorkflowState::FetchingMetadata | WorkflowState::Downloading,
                WorkflowEvent::Fail(reason),
            ) => {
                self.state = WorkflowState::Failed(reason);
            }
            (state, event) => {
                return Err(TransitionError::NotAllowed {
                    state,
                    event: event.name(),
                });
            }
        }

        Ok(())
    }
}

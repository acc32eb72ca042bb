use std::fmt;

/// Where a bound form is in its submission pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Generating,
    Restoring,
    Downloading,
    Submitting,
    Success,
    RecoverableFailure,
    FatalFallback,
}

impl PipelineState {
    /// The transition table.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Generating)
                | (RecoverableFailure, Generating)
                | (Generating, Restoring)
                | (Generating, FatalFallback)
                | (Restoring, Downloading)
                | (Downloading, Submitting)
                | (Submitting, Success)
                | (Submitting, RecoverableFailure)
                | (FatalFallback, Idle)
                // an abandoned run
                | (Generating, Idle)
                | (Submitting, Idle)
        )
    }

    /// States from which a new submission intent starts a run.
    pub fn accepts_intent(self) -> bool {
        matches!(
            self,
            PipelineState::Idle | PipelineState::RecoverableFailure
        )
    }

    /// A run is between its intent and its outcome.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            PipelineState::Generating
                | PipelineState::Restoring
                | PipelineState::Downloading
                | PipelineState::Submitting
                | PipelineState::FatalFallback
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Generating => "generating",
            PipelineState::Restoring => "restoring",
            PipelineState::Downloading => "downloading",
            PipelineState::Submitting => "submitting",
            PipelineState::Success => "success",
            PipelineState::RecoverableFailure => "recoverable-failure",
            PipelineState::FatalFallback => "fatal-fallback",
        };
        f.write_str(name)
    }
}

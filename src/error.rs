use thiserror::Error;

use crate::ai::AiError;
use crate::capture::CaptureError;
use crate::export::ExportError;
use crate::wizard::{Activity, Step};

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("please enter some text first")]
    EmptyText,

    #[error("no image captured yet; load one with `image <path>`")]
    NoImageCaptured,

    #[error("busy: {0}")]
    Busy(Activity),

    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: Step, to: Step },

    #[error("there is no step {direction} {from}")]
    EndOfWizard { from: Step, direction: &'static str },

    #[error("{section} entry {index} does not exist ({len} entries)")]
    IndexOutOfRange {
        section: &'static str,
        index: usize,
        len: usize,
    },

    #[error("already recording")]
    AlreadyRecording,

    #[error("not recording")]
    NotRecording,

    #[error("AI request failed: {0}")]
    Ai(#[from] AiError),

    #[error("microphone error: {0}")]
    Capture(#[from] CaptureError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Coarse classification of a [`WizardError`] for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any external call was made.
    Validation,
    /// The AI service or the exporter failed.
    External,
    /// The audio device could not be acquired or recorded from.
    Device,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::External => write!(f, "External"),
            ErrorKind::Device => write!(f, "Device"),
        }
    }
}

impl WizardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WizardError::EmptyText
            | WizardError::NoImageCaptured
            | WizardError::Busy(_)
            | WizardError::InvalidTransition { .. }
            | WizardError::EndOfWizard { .. }
            | WizardError::IndexOutOfRange { .. }
            | WizardError::AlreadyRecording
            | WizardError::NotRecording => ErrorKind::Validation,
            WizardError::Ai(_) | WizardError::Export(_) => ErrorKind::External,
            WizardError::Capture(_) => ErrorKind::Device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GeminiError;

    #[test]
    fn classifies_errors() {
        assert_eq!(WizardError::EmptyText.kind(), ErrorKind::Validation);
        assert_eq!(
            WizardError::Busy(Activity::ImproveText).kind(),
            ErrorKind::Validation
        );
        let ai = WizardError::from(AiError::Service(GeminiError::ApiError {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(ai.kind(), ErrorKind::External);
        let device = WizardError::from(CaptureError::DeviceUnavailable("denied".into()));
        assert_eq!(device.kind(), ErrorKind::Device);
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            WizardError::InvalidTransition {
                from: Step::Input,
                to: Step::Photo
            }
            .to_string(),
            "cannot go from 1 Input to 3 Photo"
        );
        assert_eq!(
            WizardError::IndexOutOfRange {
                section: "experience",
                index: 4,
                len: 2
            }
            .to_string(),
            "experience entry 4 does not exist (2 entries)"
        );
        assert_eq!(
            WizardError::Busy(Activity::ExtractText).to_string(),
            "busy: Analyzing your data with AI..."
        );
    }
}

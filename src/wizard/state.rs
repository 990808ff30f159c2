use std::fmt;

use super::step::Step;
use crate::resume::ResumeData;
use crate::template::TemplateId;

/// A long-running operation; its `Display` is the status shown while busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    ExtractText,
    ExtractImage,
    ExtractAudio,
    ImproveText,
    ProcessPhoto,
    ExportImage,
    ExportDocument,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Activity::ExtractText => "Analyzing your data with AI...",
            Activity::ExtractImage => "Extracting information from the image...",
            Activity::ExtractAudio => "The AI is listening to and processing your audio...",
            Activity::ImproveText => "Improving content with AI...",
            Activity::ProcessPhoto => "Turning your photo into a professional portrait...",
            Activity::ExportImage => "Generating image...",
            Activity::ExportDocument => "Generating document...",
        };
        f.write_str(message)
    }
}

/// Everything the presentation layer needs to draw the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: Step,
    pub resume: ResumeData,
    pub template: TemplateId,
    /// `Some` while an AI or export call is outstanding.
    pub processing: Option<Activity>,
}

impl WizardState {
    pub fn new(template: TemplateId) -> Self {
        Self {
            step: Step::Input,
            resume: ResumeData::default(),
            template,
            processing: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_some()
    }

    /// The status line for the busy indicator, empty when idle.
    pub fn processing_message(&self) -> String {
        self.processing.map(|a| a.to_string()).unwrap_or_default()
    }
}

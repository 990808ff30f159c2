use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four wizard steps, in order: Input → Edit → Photo → Export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Input,
    Edit,
    Photo,
    Export,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Input, Step::Edit, Step::Photo, Step::Export];

    /// 1-based position shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::Input => 1,
            Step::Edit => 2,
            Step::Photo => 3,
            Step::Export => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Input => "Input",
            Step::Edit => "Edit",
            Step::Photo => "Photo",
            Step::Export => "Export",
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Input => Some(Step::Edit),
            Step::Edit => Some(Step::Photo),
            Step::Photo => Some(Step::Export),
            Step::Export => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Input => None,
            Step::Edit => Some(Step::Input),
            Step::Photo => Some(Step::Edit),
            Step::Export => Some(Step::Photo),
        }
    }

    /// Whether plain navigation may move from `self` to `to`.
    ///
    /// Leaving Input requires a successful extraction, so navigation can
    /// never go forward from it. Every other move is unconditional.
    pub fn can_navigate_to(self, to: Step) -> bool {
        self != Step::Input || to == Step::Input
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number(), self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step '{0}' (use 1-4 or input/edit/photo/export)")]
pub struct UnknownStep(pub String);

impl FromStr for Step {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Step::ALL
            .into_iter()
            .find(|step| step.number().to_string() == s || step.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

use k8s_openapi::jiff::Timestamp;
use std::fmt::{Display, Formatter};

use crate::paint::StyledText;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Pod,
}

impl ResourceKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Pod => "pod",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "po" | "pod" | "pods" => Some(Self::Pod),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ContainerState {
    Waiting { reason: String },
    Running,
    Terminated { exit_code: i32 },
    Unknown,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HealthBucket {
    Failed,
    Waiting,
    Running,
    Good,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PhaseLabel {
    Running,
    Pending,
    Failed,
    Succeeded,
    Unknown,
}

impl PhaseLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_api(phase: &str) -> Self {
        match phase.trim() {
            "Running" => Self::Running,
            "Pending" => Self::Pending,
            "Failed" => Self::Failed,
            "Succeeded" => Self::Succeeded,
            _ => Self::Unknown,
        }
    }
}

impl Display for PhaseLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PodSummary {
    pub name: String,
    pub created_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub containers: Vec<ContainerState>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PickerRow {
    pub key: String,
    pub created: String,
    pub phase: StyledText,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SelectionOutcome {
    /// Key of the highlighted row. Empty when the table had no rows.
    Selected(String),
    Cancelled,
}

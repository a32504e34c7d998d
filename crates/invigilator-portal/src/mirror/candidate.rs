use crate::applications::domain::{ApplicationStatus, ApplicationView};

/// The signed-in candidate's own submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateState {
    pub record: Option<ApplicationView>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateAction {
    Requested,
    Loaded(ApplicationView),
    Failed(String),
    Cleared,
}

impl CandidateState {
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.record.as_ref().and_then(|record| record.status)
    }

    /// A first submission is possible until the record carries a status.
    pub fn can_apply(&self) -> bool {
        self.record.is_some() && self.status().is_none()
    }

    pub fn can_edit(&self) -> bool {
        matches!(
            self.status(),
            Some(ApplicationStatus::Pending) | Some(ApplicationStatus::Reject)
        )
    }

    pub fn reduce(&mut self, action: CandidateAction) {
        match action {
            CandidateAction::Requested => {
                self.loading = true;
                self.error = None;
            }
            CandidateAction::Loaded(record) => {
                self.loading = false;
                self.record = Some(record);
            }
            CandidateAction::Failed(error) => {
                self.loading = false;
                self.error = Some(error);
            }
            CandidateAction::Cleared => *self = Self::default(),
        }
    }
}

use crate::exam::domain::ExamConfiguration;

/// Mirror of the exam singleton used by the configuration screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamFormState {
    pub current: Option<ExamConfiguration>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExamFormAction {
    Requested,
    Fetched(Option<ExamConfiguration>),
    Replaced(ExamConfiguration),
    Failed(String),
}

impl ExamFormState {
    pub fn reduce(&mut self, action: ExamFormAction) {
        match action {
            ExamFormAction::Requested => {
                self.loading = true;
                self.error = None;
            }
            ExamFormAction::Fetched(current) => {
                self.loading = false;
                self.current = current;
            }
            ExamFormAction::Replaced(config) => {
                self.loading = false;
                self.current = Some(config);
            }
            ExamFormAction::Failed(error) => {
                self.loading = false;
                self.error = Some(error);
            }
        }
    }
}

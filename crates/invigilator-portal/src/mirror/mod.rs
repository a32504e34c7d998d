//! Client-side state containers for the portal screens.
//!
//! Each store is a plain struct with a typed action enum and a `reduce` method. Status changes
//! are applied optimistically and settled by `StatusUpdateFlow` once the backend answers.

pub mod admin;
pub mod candidate;
pub mod exam_form;
pub mod flow;
pub mod session;

pub use admin::{AdminAction, AdminState};
pub use candidate::{CandidateAction, CandidateState};
pub use exam_form::{ExamFormAction, ExamFormState};
pub use flow::{AdminSync, BackendError, ReviewBackend, StatusUpdate, StatusUpdateFlow};
pub use session::{SessionAction, SessionState};

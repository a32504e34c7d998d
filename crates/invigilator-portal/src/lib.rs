//! Candidate intake and review portal for exam invigilators.

pub mod accounts;
pub mod applications;
pub mod config;
pub mod error;
pub mod exam;
pub mod export;
pub mod extract;
pub mod memory;
pub mod mirror;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use state::{portal_router, PortalState};

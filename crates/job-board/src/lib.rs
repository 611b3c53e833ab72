//! Applicant-side client for the job board: multi-step application workflow,
//! applied-jobs tracking and the REST client they run against.

pub mod config;
pub mod error;
pub mod remote;
pub mod session;
pub mod telemetry;
pub mod workflows;

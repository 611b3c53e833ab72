//! Tracking of the postings the signed-in user has applied to.

pub mod cache;
pub mod tracker;

pub use cache::{AppliedJobsCache, CacheError, FileAppliedJobsCache, InMemoryAppliedJobsCache};
pub use tracker::{AppliedJobsSource, AppliedJobsTracker, ApplyGate};

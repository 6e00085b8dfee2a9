pub mod age_group;
pub mod feedback;
pub mod health_record;
pub mod topic;

pub use age_group::AgeGroup;
pub use feedback::{FeedbackKind, NewFeedback};
pub use health_record::{HealthRecord, Measurement, MeasurementError};
pub use topic::Topic;

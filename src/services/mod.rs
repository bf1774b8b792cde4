// Time-series store
pub mod observations;

// Facility registry and live queue state
pub mod facilities;
pub mod queue;

// Operator-facing state
pub mod facility_status;
pub mod working_log;

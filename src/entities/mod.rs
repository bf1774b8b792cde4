pub mod facility_status;
pub mod fixed_data;
pub mod predict_data;
pub mod raw_data;
pub mod time_wait_data;
pub mod working_log;

pub use facility_status::FacilityStatusKind;

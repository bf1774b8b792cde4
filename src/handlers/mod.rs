pub mod extract;
pub mod facilities;
pub mod facility_status;
pub mod health;
pub mod logs;
pub mod observations;

use crate::{
    db::DatabaseAccess,
    logging::component_logger,
    services::{
        facilities::FacilityRegistryService, facility_status::FacilityStatusService,
        observations::ObservationService, queue::QueueTracker, working_log::WorkingLogService,
    },
};
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer used by the HTTP handlers; every service shares one store handle
#[derive(Clone)]
pub struct AppServices {
    pub observations: Arc<ObservationService>,
    pub facilities: Arc<FacilityRegistryService>,
    pub queue: Arc<QueueTracker>,
    pub facility_status: Arc<FacilityStatusService>,
    pub working_log: Arc<WorkingLogService>,
}

impl AppServices {
    pub fn new(db: DatabaseAccess, base_logger: &Logger) -> Self {
        Self {
            observations: Arc::new(ObservationService::new(db.clone())),
            facilities: Arc::new(FacilityRegistryService::new(db.clone())),
            queue: Arc::new(QueueTracker::new(db.clone())),
            facility_status: Arc::new(FacilityStatusService::new(
                db.clone(),
                component_logger(base_logger, "facility_status_service"),
            )),
            working_log: Arc::new(WorkingLogService::new(
                db,
                component_logger(base_logger, "working_log_service"),
            )),
        }
    }
}

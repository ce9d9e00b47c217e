use crate::config::Config;
use crate::services::EntityService;

pub struct AppState {
    pub entities: EntityService,
    pub config: Config,
}

use std::sync::Arc;

use crate::application::admin::contacts::AdminContactService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct AdminState {
    pub health: Arc<dyn HealthRepo>,
    pub contacts: Arc<AdminContactService>,
}

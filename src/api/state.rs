use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub config: Arc<Config>,
}

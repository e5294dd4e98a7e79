pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use crate::infra::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub paseto_access_key: [u8; 32],
    pub max_page_limit: u32,
}

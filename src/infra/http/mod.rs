mod middleware;
mod public;
mod session;
mod ui;

use std::sync::Arc;

pub use public::build_router;
pub use session::SESSION_COOKIE;

use crate::application::{mounts::MountRegistry, provider::PostProvider};

#[derive(Clone)]
pub struct HttpState {
    pub provider: Arc<PostProvider>,
    pub mounts: Arc<MountRegistry>,
}

impl HttpState {
    pub fn new(provider: Arc<PostProvider>, mounts: Arc<MountRegistry>) -> Self {
        Self { provider, mounts }
    }
}

use std::ops::Deref;
use std::sync::Arc;

use api::backend::RpcBackend;
use api::prefs::user_prefs::UserPrefs;

#[derive(Debug, PartialEq)]
pub struct AppStateData {
    pub backend: RpcBackend,
    pub prefs: UserPrefs,
}

/// The stable, non-reactive state shared by every screen.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState(Arc<AppStateData>);

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AppState {
    pub fn new(prefs: UserPrefs) -> Self {
        Self(Arc::new(AppStateData {
            backend: RpcBackend::new(prefs.connection()),
            prefs,
        }))
    }
}

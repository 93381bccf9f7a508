use serde::Deserialize;
use serde::Serialize;

use super::connection_prefs::ConnectionPrefs;
use super::display_preference::DisplayPreference;

/// Represents all local prefs. Intended for saving to a file, editing in a
/// settings dialog, etc.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct UserPrefs {
    connection: ConnectionPrefs,
    display_preference: DisplayPreference,
}

impl UserPrefs {
    pub fn new(connection: ConnectionPrefs, display_preference: DisplayPreference) -> Self {
        Self {
            connection,
            display_preference,
        }
    }

    pub fn connection(&self) -> &ConnectionPrefs {
        &self.connection
    }

    pub fn display_preference(&self) -> &DisplayPreference {
        &self.display_preference
    }
}

//! Environment check: every required setting must be present.

use tracing::{debug, warn};

use crate::error::CheckError;
use crate::settings::{EnvSnapshot, Settings};

/// Validate the snapshot and produce [`Settings`].
///
/// Fails with the exact list of missing names, in declared order.
pub fn validate_environment(snapshot: &EnvSnapshot) -> Result<Settings, CheckError> {
    match Settings::from_snapshot(snapshot) {
        Ok(settings) => {
            debug!(settings = ?settings, "All required settings present");
            Ok(settings)
        }
        Err(missing) => {
            warn!(missing = ?missing, "Required settings missing");
            Err(CheckError::MissingSettings { missing })
        }
    }
}

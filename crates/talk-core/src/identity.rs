//! Local user and host names

use crate::error::SetupError;

/// Login name of the user running this process, sent as the handshake identity
pub fn local_username() -> Result<String, SetupError> {
    let name = whoami::fallible::username().map_err(|e| SetupError::Identity(e.to_string()))?;
    if name.is_empty() {
        return Err(SetupError::Identity("empty login name".to_string()));
    }
    Ok(name)
}

/// Hostname of this machine, for log lines
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

use std::path::{Component, Path};

use crate::TransferError;

/// Validates the file name sent to the server.
///
/// The name scopes chunk bookkeeping server-side, so it must be a single
/// plain path component. Rejects:
/// - Empty names
/// - Path separators (`/`, `\`)
/// - `.` and `..`
/// - Control characters
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidFileName("empty name".into()));
    }

    if name.contains(['/', '\\']) {
        return Err(TransferError::InvalidFileName(format!(
            "path separators not allowed: {name}"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(TransferError::InvalidFileName(format!(
            "control characters not allowed: {name:?}"
        )));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TransferError::InvalidFileName(format!(
            "not a plain file name: {name}"
        ))),
    }
}

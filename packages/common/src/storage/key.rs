use uuid::Uuid;

use super::error::StorageError;

/// Namespace every complaint media object is stored under.
pub const OBJECT_PREFIX: &str = "complaints/";

const MAX_NAME_LEN: usize = 100;

/// Generate a fresh object id for an upload.
///
/// The UUIDv7 component makes ids unique per upload even when two
/// complaints attach byte-identical files with the same name.
pub fn new_object_id(file_name: &str) -> String {
    format!("{OBJECT_PREFIX}{}-{}", Uuid::now_v7(), sanitize_file_name(file_name))
}

/// Reduce a client-supplied filename to a safe key suffix.
pub fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Validate an object id before it is used to address storage.
pub fn validate_object_id(object_id: &str) -> Result<&str, StorageError> {
    let Some(name) = object_id.strip_prefix(OBJECT_PREFIX) else {
        return Err(StorageError::InvalidObjectId(format!(
            "expected prefix '{OBJECT_PREFIX}': {object_id}"
        )));
    };

    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name.starts_with('.')
    {
        return Err(StorageError::InvalidObjectId(object_id.to_string()));
    }

    Ok(name)
}

use std::borrow::Cow;

use mongodb::bson::{Bson, Document, oid::ObjectId};

use super::RepositoryError;

/// Name of the identifier field on every stored document.
pub const ID_FIELD: &str = "_id";

/// Parse the string form of an identifier.
pub fn parse_object_id(id: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidIdentifier(id.to_string()))
}

/// Convert a string `_id` in `filter` to the native `ObjectId`.
///
/// The input is never modified. A filter without a string `_id` is returned
/// borrowed; otherwise an owned copy with only `_id` replaced is returned.
pub fn normalize_filter(filter: &Document) -> Result<Cow<'_, Document>, RepositoryError> {
    match filter.get(ID_FIELD) {
        Some(Bson::String(id)) => {
            let object_id = parse_object_id(id)?;
            let mut normalized = filter.clone();
            normalized.insert(ID_FIELD, object_id);
            Ok(Cow::Owned(normalized))
        }
        _ => Ok(Cow::Borrowed(filter)),
    }
}

use tally_core::entities::{CheckItem, Document};
use tally_core::errors::CoreError;
use tally_core::ids::{PREFIX_CHECK_ITEM, PREFIX_DOCUMENT};
use tally_db::error::DatabaseError;

use crate::context::AppContext;

fn looks_like_id(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn not_found(entity_type: &str, key: &str) -> anyhow::Error {
    CoreError::NotFound {
        entity_type: entity_type.to_string(),
        id: key.to_string(),
    }
    .into()
}

/// Look up a check item by ID or by path.
pub async fn resolve_item(ctx: &AppContext, key: &str) -> anyhow::Result<CheckItem> {
    let found = if looks_like_id(key, PREFIX_CHECK_ITEM) {
        ctx.service.get_check_item(key).await
    } else {
        ctx.service.get_check_item_by_path(key).await
    };
    match found {
        Ok(item) => Ok(item),
        Err(DatabaseError::NoResult) => Err(not_found("check item", key)),
        Err(error) => Err(error.into()),
    }
}

/// Look up a document by ID or by path relative to the documents folder.
pub async fn resolve_document(ctx: &AppContext, key: &str) -> anyhow::Result<Document> {
    let found = if looks_like_id(key, PREFIX_DOCUMENT) {
        ctx.service.get_document(key).await
    } else {
        ctx.service.get_document_by_path(key).await
    };
    match found {
        Ok(document) => Ok(document),
        Err(DatabaseError::NoResult) => Err(not_found("document", key)),
        Err(error) => Err(error.into()),
    }
}

//! Shared test utilities for tally-db tests.

use tally_core::enums::ItemType;

use crate::TallyDb;
use crate::service::TallyService;

/// Create an in-memory `TallyService`.
pub async fn test_service() -> TallyService {
    let db = TallyDb::open_local(":memory:").await.unwrap();
    TallyService::from_db(db)
}

/// Create a root category holding one item; returns `(category_id, item_id)`.
pub async fn seed_item(svc: &TallyService) -> (String, String) {
    let category = svc
        .create_check_item(None, "Structure", ItemType::Category)
        .await
        .unwrap();
    let item = svc
        .create_check_item(Some(&category.id), "Footings", ItemType::Item)
        .await
        .unwrap();
    (category.id, item.id)
}

/// Register a document and return its ID.
pub async fn seed_document(svc: &TallyService, path: &str) -> String {
    svc.register_document(path).await.unwrap().id
}

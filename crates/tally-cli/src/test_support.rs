//! Shared fixtures for command tests.

use tally_config::PathSettings;
use tally_core::entities::{CheckItem, Document};
use tally_core::enums::ItemType;
use tally_db::service::TallyService;
use tempfile::TempDir;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;

/// A fresh workspace with default folders and an empty database.
pub async fn test_context() -> (TempDir, AppContext) {
    let temp = TempDir::new().expect("tempdir should create");
    let paths = PathSettings::default()
        .resolve(temp.path())
        .expect("default paths should resolve");
    for folder in paths.folders() {
        std::fs::create_dir_all(folder).expect("workspace folder should create");
    }
    TallyService::new_local(&paths.database.to_string_lossy())
        .await
        .expect("database should create");

    let ctx = AppContext::init(paths).await.expect("context should open");
    (temp, ctx)
}

pub fn json_flags() -> GlobalFlags {
    GlobalFlags {
        format: OutputFormat::Json,
        limit: None,
        quiet: true,
        verbose: false,
        root: None,
    }
}

/// `Structure/Footings` plus a registered `plan.pdf`.
pub async fn seed_pair(ctx: &AppContext) -> (CheckItem, Document) {
    let category = ctx
        .service
        .create_check_item(None, "Structure", ItemType::Category)
        .await
        .unwrap();
    let item = ctx
        .service
        .create_check_item(Some(&category.id), "Footings", ItemType::Item)
        .await
        .unwrap();
    let document = ctx.service.register_document("plan.pdf").await.unwrap();
    (item, document)
}

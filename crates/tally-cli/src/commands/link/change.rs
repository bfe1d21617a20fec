use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tally_core::entities::{CheckItem, CheckItemDocument, Document};
use tally_core::enums::LinkState;
use tally_core::responses::LinkChangeResponse;
use tally_core::transition::{CaptureDecision, CheckItemTransition, ChecklistStateManager, LinkEvent};

use crate::cli::GlobalFlags;
use crate::commands::shared::prompt::{CaptureAnswer, ask_capture};
use crate::commands::shared::resolve::{resolve_document, resolve_item};
use crate::context::AppContext;
use crate::files;
use crate::output::output;

/// Where the answer to "attach a capture?" comes from.
#[derive(Debug, Clone)]
pub enum CaptureSource {
    Image(String),
    Skip,
    Ask,
}

pub async fn run(
    item: &str,
    document: &str,
    event: LinkEvent,
    source: CaptureSource,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let item = resolve_item(ctx, item).await?;
    let document = resolve_document(ctx, document).await?;

    let from = ctx.service.link_state(&item.id, &document.id).await?;
    let mut transition = ChecklistStateManager::begin(&item.id, &document.id, from, event)?;

    let mut stored_capture = None;
    if transition.needs_capture() {
        let answer = match source {
            CaptureSource::Image(image) => CaptureAnswer::Image(image),
            CaptureSource::Skip => CaptureAnswer::Skip,
            CaptureSource::Ask => ask_capture(
                &mut std::io::stdin().lock(),
                &mut std::io::stderr(),
                &item.path,
                &document.relative_path,
            )?,
        };
        let decision = match answer {
            CaptureAnswer::Image(image) => {
                let name = files::store_capture(
                    Path::new(&image),
                    &ctx.paths.captures,
                    &item.id,
                    &document.id,
                    Utc::now(),
                )?;
                stored_capture = Some(ctx.paths.captures.join(&name));
                CaptureDecision::Attach(name)
            }
            CaptureAnswer::Skip => CaptureDecision::Skip,
            CaptureAnswer::Cancel => CaptureDecision::Cancel,
        };
        transition.resolve(decision)?;
    } else if matches!(source, CaptureSource::Image(_)) {
        tracing::warn!(
            state = %from,
            "no capture needed in this state; use 'tally capture attach' to set one"
        );
    }

    commit_change(ctx, &item, &document, transition, stored_capture, flags).await
}

/// The capture held before a commit that the committed link no longer
/// references.
fn superseded_capture<'a>(
    before: Option<&'a CheckItemDocument>,
    after: Option<&CheckItemDocument>,
) -> Option<&'a str> {
    let old = before?.capture_file.as_deref()?;
    let current = after.and_then(|link| link.capture_file.as_deref());
    (current != Some(old)).then_some(old)
}

/// Commit a resolved transition and print the outcome. A capture file copied
/// for this transition is removed again if the commit fails; a capture the
/// link stops referencing is removed once the commit succeeds.
pub async fn commit_change(
    ctx: &AppContext,
    item: &CheckItem,
    document: &Document,
    transition: CheckItemTransition,
    stored_capture: Option<PathBuf>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let committed = transition.should_commit();
    let outcome = match ctx.service.get_link(&item.id, &document.id).await {
        Ok(before) => ctx
            .service
            .commit_transition(&transition)
            .await
            .map(|link| (before, link)),
        Err(error) => Err(error),
    };
    let (before, link) = match outcome {
        Ok(pair) => pair,
        Err(error) => {
            if let Some(path) = stored_capture
                && let Err(cleanup) = fs::remove_file(&path)
            {
                tracing::warn!(path = %path.display(), %cleanup, "failed to remove orphaned capture");
            }
            return Err(error.into());
        }
    };

    if let Some(old) = superseded_capture(before.as_ref(), link.as_ref()) {
        files::remove_captures(&ctx.paths.captures, [old]);
    }

    if transition.is_rolled_back() {
        tracing::info!(item = %item.path, document = %document.relative_path, "change cancelled");
    }

    output(
        &LinkChangeResponse {
            item_path: item.path.clone(),
            document_path: document.relative_path.clone(),
            state: LinkState::of(link.as_ref()),
            transition,
            committed,
            link,
        },
        flags.format,
    )
}

//! Commit of state-machine transitions on a (check item, document) pair.

use chrono::Utc;

use tally_core::entities::CheckItemDocument;
use tally_core::enums::LinkState;
use tally_core::ids::PREFIX_LINK;
use tally_core::transition::CheckItemTransition;

use crate::error::DatabaseError;
use crate::repos::link::fetch_link;
use crate::service::TallyService;

impl TallyService {
    /// Apply a settled transition in one SQL transaction.
    ///
    /// Transitions still awaiting a capture decision are rejected. Rolled
    /// back transitions and no-ops write nothing. The stored state must
    /// still equal `transition.from`, otherwise the transition is stale and
    /// `DatabaseError::InvalidState` is returned.
    ///
    /// Returns the link row as it stands afterwards.
    pub async fn commit_transition(
        &self,
        transition: &CheckItemTransition,
    ) -> Result<Option<CheckItemDocument>, DatabaseError> {
        let item_id = transition.check_item_id.as_str();
        let doc_id = transition.document_id.as_str();

        if transition.needs_capture() {
            return Err(DatabaseError::InvalidState(format!(
                "transition {} -> ? on {item_id}/{doc_id} is still awaiting a capture decision",
                transition.from
            )));
        }
        if !transition.should_commit() {
            tracing::debug!(
                item_id,
                doc_id,
                state = %transition.from,
                rolled_back = transition.is_rolled_back(),
                "transition not written"
            );
            return self.get_link(item_id, doc_id).await;
        }

        // Allocate outside the transaction; the ID query needs no isolation.
        let new_id = if transition.from.is_linked() {
            None
        } else {
            Some(self.db().generate_id(PREFIX_LINK).await?)
        };

        let tx = self.db().conn().transaction().await?;

        let current = fetch_link(&tx, item_id, doc_id).await?;
        let stored = LinkState::of(current.as_ref());
        if stored != transition.from {
            tx.rollback().await?;
            return Err(DatabaseError::InvalidState(format!(
                "stale transition on {item_id}/{doc_id}: expected state {}, found {stored}",
                transition.from
            )));
        }

        match (current, new_id) {
            (None, Some(id)) => {
                tx.execute(
                    "INSERT INTO check_item_documents (id, check_item_id, document_id, checked, linked_at, capture_file)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    libsql::params![
                        id.as_str(),
                        item_id,
                        doc_id,
                        transition.to.is_checked(),
                        Utc::now().to_rfc3339(),
                        transition.capture_file.as_deref()
                    ],
                )
                .await?;
            }
            (Some(link), _) if !transition.to.is_linked() => {
                tx.execute(
                    "DELETE FROM check_item_documents WHERE id = ?1",
                    [link.id.as_str()],
                )
                .await?;
            }
            (Some(link), _) => {
                tx.execute(
                    "UPDATE check_item_documents SET checked = ?1 WHERE id = ?2",
                    libsql::params![transition.to.is_checked(), link.id.as_str()],
                )
                .await?;
                if let Some(capture) = transition.capture_file.as_deref() {
                    tx.execute(
                        "UPDATE check_item_documents SET capture_file = ?1 WHERE id = ?2",
                        libsql::params![capture, link.id.as_str()],
                    )
                    .await?;
                }
            }
            (None, None) => {
                return Err(DatabaseError::InvalidState(format!(
                    "no link row to update for {item_id}/{doc_id}"
                )));
            }
        }

        tx.commit().await?;
        tracing::info!(
            item_id,
            doc_id,
            from = %transition.from,
            to = %transition.to,
            "committed link transition"
        );
        self.get_link(item_id, doc_id).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tally_core::enums::LinkState;
    use tally_core::transition::{CaptureDecision, ChecklistStateManager, LinkEvent};

    use crate::error::DatabaseError;
    use crate::service::TallyService;
    use crate::test_support::{seed_document, seed_item, test_service};

    async fn pair(svc: &TallyService) -> (String, String) {
        let (_, item_id) = seed_item(svc).await;
        let doc_id = seed_document(svc, "plan.pdf").await;
        (item_id, doc_id)
    }

    async fn fire(
        svc: &TallyService,
        item: &str,
        doc: &str,
        event: LinkEvent,
        decision: Option<CaptureDecision>,
    ) -> LinkState {
        let from = svc.link_state(item, doc).await.unwrap();
        let mut transition = ChecklistStateManager::begin(item, doc, from, event).unwrap();
        if let Some(decision) = decision {
            transition.resolve(decision).unwrap();
        }
        svc.commit_transition(&transition).await.unwrap();
        svc.link_state(item, doc).await.unwrap()
    }

    #[tokio::test]
    async fn check_with_capture_creates_link() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;

        let state = fire(
            &svc,
            &item,
            &doc,
            LinkEvent::Check,
            Some(CaptureDecision::Attach("itm_doc_1.png".into())),
        )
        .await;
        assert_eq!(state, LinkState::CheckedWithCapture);

        let link = svc.get_link(&item, &doc).await.unwrap().unwrap();
        assert_eq!(link.capture_file.as_deref(), Some("itm_doc_1.png"));
    }

    #[tokio::test]
    async fn full_cycle_through_states() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;

        let s = fire(&svc, &item, &doc, LinkEvent::Check, Some(CaptureDecision::Skip)).await;
        assert_eq!(s, LinkState::CheckedNoCapture);
        let s = fire(&svc, &item, &doc, LinkEvent::Uncheck, None).await;
        assert_eq!(s, LinkState::UncheckedNoCapture);
        let s = fire(
            &svc,
            &item,
            &doc,
            LinkEvent::Check,
            Some(CaptureDecision::Attach("c.png".into())),
        )
        .await;
        assert_eq!(s, LinkState::CheckedWithCapture);
        let s = fire(&svc, &item, &doc, LinkEvent::Uncheck, None).await;
        assert_eq!(s, LinkState::UncheckedWithCapture);
        let s = fire(&svc, &item, &doc, LinkEvent::Check, None).await;
        assert_eq!(s, LinkState::CheckedWithCapture);
        let link = svc.get_link(&item, &doc).await.unwrap().unwrap();
        assert_eq!(link.capture_file.as_deref(), Some("c.png"));
        let s = fire(&svc, &item, &doc, LinkEvent::Unlink, None).await;
        assert_eq!(s, LinkState::Unlinked);
    }

    #[tokio::test]
    async fn cancelled_check_writes_nothing() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;

        let mut transition =
            ChecklistStateManager::begin(&item, &doc, LinkState::Unlinked, LinkEvent::Check)
                .unwrap();
        transition.resolve(CaptureDecision::Cancel).unwrap();

        let link = svc.commit_transition(&transition).await.unwrap();
        assert!(link.is_none());
        assert!(svc.links_for_item(&item).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn awaiting_capture_is_rejected() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;
        let transition =
            ChecklistStateManager::begin(&item, &doc, LinkState::Unlinked, LinkEvent::Check)
                .unwrap();
        assert!(matches!(
            svc.commit_transition(&transition).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn stale_transition_is_rejected() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;

        let mut transition =
            ChecklistStateManager::begin(&item, &doc, LinkState::Unlinked, LinkEvent::Check)
                .unwrap();
        transition.resolve(CaptureDecision::Skip).unwrap();

        svc.link_document(&item, &doc, false).await.unwrap();
        let err = svc.commit_transition(&transition).await.unwrap_err();
        assert!(err.to_string().contains("expected state 00, found 20"));

        let link = svc.get_link(&item, &doc).await.unwrap().unwrap();
        assert!(!link.checked, "stale commit must not change the row");
    }

    #[tokio::test]
    async fn attach_capture_to_checked_link() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;
        svc.link_document(&item, &doc, true).await.unwrap();

        let transition = ChecklistStateManager::attach_capture(
            &item,
            &doc,
            LinkState::CheckedNoCapture,
            "late.png",
        )
        .unwrap();
        let link = svc.commit_transition(&transition).await.unwrap().unwrap();
        assert_eq!(link.state(), LinkState::CheckedWithCapture);
        assert_eq!(link.capture_file.as_deref(), Some("late.png"));
    }

    #[tokio::test]
    async fn noop_check_keeps_row() {
        let svc = test_service().await;
        let (item, doc) = pair(&svc).await;
        let before = svc.link_document(&item, &doc, true).await.unwrap();

        let state = fire(&svc, &item, &doc, LinkEvent::Check, None).await;
        assert_eq!(state, LinkState::CheckedNoCapture);
        let after = svc.get_link(&item, &doc).await.unwrap().unwrap();
        assert_eq!(after.id, before.id);
    }
}

//! Check-item/document link state machine.
//!
//! A user action on a (check item, document) pair becomes a
//! [`CheckItemTransition`]: a buffered change from the current [`LinkState`]
//! to the next one. Checking an uncaptured pair first asks whether to attach
//! a capture; until that question is answered the transition holds nothing
//! but the intent, so cancelling leaves the database untouched.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LinkState;
use crate::errors::CoreError;

/// User action on a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkEvent {
    Check,
    Uncheck,
    Unlink,
}

impl LinkEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::Unlink => "unlink",
        }
    }
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to the capture confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureDecision {
    /// Attach the capture stored under this name in the captures folder.
    Attach(String),
    /// Check without evidence.
    Skip,
    /// Abandon the whole action.
    Cancel,
}

/// Where a transition stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    AwaitingCapture,
    Ready,
    RolledBack,
}

/// Outcome of applying an event to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Settled(LinkState),
    NeedsCapture,
}

/// A pending change to one link, committed by the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckItemTransition {
    pub check_item_id: String,
    pub document_id: String,
    pub from: LinkState,
    pub to: LinkState,
    /// Capture to record on commit. `None` leaves any stored capture as is.
    pub capture_file: Option<String>,
    pub phase: TransitionPhase,
}

impl CheckItemTransition {
    #[must_use]
    pub const fn needs_capture(&self) -> bool {
        matches!(self.phase, TransitionPhase::AwaitingCapture)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.phase, TransitionPhase::Ready)
    }

    #[must_use]
    pub const fn is_rolled_back(&self) -> bool {
        matches!(self.phase, TransitionPhase::RolledBack)
    }

    /// Ready, but leaves the link exactly as it is.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.is_ready()
            && self.from == self.to
            && self.capture_file.is_none()
    }

    /// Whether committing this transition writes anything.
    #[must_use]
    pub fn should_commit(&self) -> bool {
        self.is_ready() && !self.is_noop()
    }

    /// Settle a transition that is waiting on the capture question.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the transition is not awaiting a
    /// capture, or if an attached capture name is blank.
    pub fn resolve(&mut self, decision: CaptureDecision) -> Result<(), CoreError> {
        if !self.needs_capture() {
            return Err(CoreError::Validation(format!(
                "transition {} -> {} is not awaiting a capture",
                self.from, self.to
            )));
        }
        match decision {
            CaptureDecision::Attach(capture) => {
                if capture.trim().is_empty() {
                    return Err(CoreError::Validation("capture file name is empty".into()));
                }
                self.to = LinkState::CheckedWithCapture;
                self.capture_file = Some(capture);
                self.phase = TransitionPhase::Ready;
            }
            CaptureDecision::Skip => {
                self.to = LinkState::CheckedNoCapture;
                self.phase = TransitionPhase::Ready;
            }
            CaptureDecision::Cancel => self.rollback(),
        }
        Ok(())
    }

    /// Drop the pending change; the link stays in its original state.
    pub fn rollback(&mut self) {
        self.to = self.from;
        self.capture_file = None;
        self.phase = TransitionPhase::RolledBack;
    }
}

/// Transition table for link states.
pub struct ChecklistStateManager;

impl ChecklistStateManager {
    /// Apply `event` to `from`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` for `uncheck`/`unlink` on an
    /// unlinked pair.
    pub fn next_state(from: LinkState, event: LinkEvent) -> Result<NextState, CoreError> {
        use LinkState::{
            CheckedNoCapture, CheckedWithCapture, Unlinked, UncheckedNoCapture,
            UncheckedWithCapture,
        };
        use NextState::{NeedsCapture, Settled};

        let next = match (from, event) {
            (Unlinked | UncheckedNoCapture, LinkEvent::Check) => NeedsCapture,
            (CheckedNoCapture | CheckedWithCapture, LinkEvent::Check) => Settled(from),
            (UncheckedWithCapture, LinkEvent::Check) => Settled(CheckedWithCapture),

            (CheckedNoCapture, LinkEvent::Uncheck) => Settled(UncheckedNoCapture),
            (CheckedWithCapture, LinkEvent::Uncheck) => Settled(UncheckedWithCapture),
            (UncheckedNoCapture | UncheckedWithCapture, LinkEvent::Uncheck) => Settled(from),

            (
                CheckedNoCapture | CheckedWithCapture | UncheckedNoCapture | UncheckedWithCapture,
                LinkEvent::Unlink,
            ) => Settled(Unlinked),

            (Unlinked, LinkEvent::Uncheck | LinkEvent::Unlink) => {
                return Err(CoreError::InvalidTransition {
                    event: event.to_string(),
                    from: from.to_string(),
                });
            }
        };
        Ok(next)
    }

    /// Start a transition for `event` on the pair currently in `from`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_state`].
    pub fn begin(
        check_item_id: &str,
        document_id: &str,
        from: LinkState,
        event: LinkEvent,
    ) -> Result<CheckItemTransition, CoreError> {
        let (to, phase) = match Self::next_state(from, event)? {
            NextState::Settled(to) => (to, TransitionPhase::Ready),
            NextState::NeedsCapture => (from, TransitionPhase::AwaitingCapture),
        };
        Ok(CheckItemTransition {
            check_item_id: check_item_id.to_string(),
            document_id: document_id.to_string(),
            from,
            to,
            capture_file: None,
            phase,
        })
    }

    /// Transition that checks the pair and records `capture_file` as its
    /// evidence, whatever state it is in. Replaces an existing capture.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the capture name is blank.
    pub fn attach_capture(
        check_item_id: &str,
        document_id: &str,
        from: LinkState,
        capture_file: &str,
    ) -> Result<CheckItemTransition, CoreError> {
        let mut transition = CheckItemTransition {
            check_item_id: check_item_id.to_string(),
            document_id: document_id.to_string(),
            from,
            to: from,
            capture_file: None,
            phase: TransitionPhase::AwaitingCapture,
        };
        transition.resolve(CaptureDecision::Attach(capture_file.to_string()))?;
        Ok(transition)
    }
}

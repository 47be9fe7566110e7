use std::collections::BTreeMap;

use crate::{EpochMillis, JobId};

/// Per-row controls that carry transient UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlRole {
    Cancel,
    Delete,
    Copy,
}

/// Temporary label shown on a control instead of its resting label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Cancelling,
    Copied,
    CopyFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub disabled: bool,
    pub feedback: Option<Feedback>,
    /// When set, the control returns to its resting state at this instant.
    pub revert_at: Option<EpochMillis>,
}

/// Transient state of row controls, keyed by role and job.
///
/// The list region is re-rendered from scratch on every refresh, so this map is
/// what carries "disabled while in flight" and timed labels across renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    states: BTreeMap<(ControlRole, JobId), ControlState>,
}

impl Controls {
    pub fn get(&self, role: ControlRole, job_id: &JobId) -> Option<&ControlState> {
        self.states.get(&(role, job_id.clone()))
    }

    pub fn begin(&mut self, role: ControlRole, job_id: &JobId, feedback: Option<Feedback>) {
        self.states.insert(
            (role, job_id.clone()),
            ControlState {
                disabled: true,
                feedback,
                revert_at: None,
            },
        );
    }

    /// Shows `feedback` on an enabled control until `revert_at`.
    pub fn flash(&mut self, role: ControlRole, job_id: &JobId, feedback: Feedback, revert_at: EpochMillis) {
        self.states.insert(
            (role, job_id.clone()),
            ControlState {
                disabled: false,
                feedback: Some(feedback),
                revert_at: Some(revert_at),
            },
        );
    }

    pub fn restore(&mut self, role: ControlRole, job_id: &JobId) -> bool {
        self.states.remove(&(role, job_id.clone())).is_some()
    }

    /// Drops every timed state whose deadline has passed. Returns `true` if any reverted.
    pub fn expire(&mut self, now: EpochMillis) -> bool {
        let before = self.states.len();
        self.states
            .retain(|_, state| state.revert_at.is_none_or(|at| at > now));
        before != self.states.len()
    }

    pub fn next_deadline(&self) -> Option<EpochMillis> {
        self.states.values().filter_map(|state| state.revert_at).min()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flashed_feedback_expires_at_its_deadline() {
        let mut controls = Controls::default();
        let id = JobId::new("1");
        controls.flash(ControlRole::Copy, &id, Feedback::Copied, 2_000);
        assert_eq!(controls.next_deadline(), Some(2_000));
        assert!(!controls.expire(1_999));
        assert!(controls.get(ControlRole::Copy, &id).is_some());
        assert!(controls.expire(2_000));
        assert!(controls.is_empty());
    }

    #[test]
    fn in_flight_state_waits_for_restore() {
        let mut controls = Controls::default();
        let id = JobId::new("1");
        controls.begin(ControlRole::Cancel, &id, Some(Feedback::Cancelling));
        assert!(!controls.expire(i64::MAX));
        assert!(controls.get(ControlRole::Cancel, &id).unwrap().disabled);
        assert!(controls.restore(ControlRole::Cancel, &id));
        assert!(controls.get(ControlRole::Cancel, &id).is_none());
    }
}

use vadose_core::State;

use super::{RejectReason, StepRecord, record::Outcome};

/// Events emitted by the implicit solver, one per step attempt.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// The step converged and the run advanced.
    Accepted {
        record: &'a StepRecord,

        /// Time at the end of the step.
        time: f64,

        /// The newly accepted state.
        state: &'a State,

        /// Total content of the new state.
        content: f64,
    },

    /// The step was discarded; `state` is the unchanged start state.
    Rejected {
        record: &'a StepRecord,
        reason: RejectReason,
        state: &'a State,
    },
}

impl<'a> Event<'a> {
    /// Creates the event for `record`; `time` and `content` describe `state`.
    pub(super) fn new(record: &'a StepRecord, time: f64, state: &'a State, content: f64) -> Self {
        match record.outcome {
            Outcome::Accepted => Self::Accepted {
                record,
                time,
                state,
                content,
            },
            Outcome::Rejected(reason) => Self::Rejected {
                record,
                reason,
                state,
            },
        }
    }

    #[must_use]
    pub fn record(&self) -> &'a StepRecord {
        match self {
            Self::Accepted { record, .. } | Self::Rejected { record, .. } => record,
        }
    }

    /// Returns the state the run holds after this attempt.
    #[must_use]
    pub fn state(&self) -> &'a State {
        match self {
            Self::Accepted { state, .. } | Self::Rejected { state, .. } => state,
        }
    }
}

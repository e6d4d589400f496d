//! Job phase tracking

use tracing::debug;

use crate::errors::WorkerError;

/// Phases one deployment job moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Polling for the single message
    Waiting,

    /// Message pulled, polling stopped, task marked running
    Intake,

    /// Hosting service told the deployment is pending
    NotifyPending,

    /// Deploy executor running
    Executing,

    /// Outcome being classified
    Classifying,

    /// Finished report being delivered
    Reporting,

    /// Payment service being invoked
    Billing,

    /// Terminal: desired state flipped to stopped
    Stopped,

    /// Terminal: contained failure
    Failed,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Stopped | JobPhase::Failed)
    }
}

/// Tracks the current phase and rejects illegal jumps.
///
/// Failure is reachable from every phase after intake; billing is optional,
/// so reporting may step straight to stopped.
#[derive(Debug, Clone)]
pub struct JobFsm {
    phase: JobPhase,
}

impl JobFsm {
    pub fn new() -> Self {
        Self {
            phase: JobPhase::Waiting,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    /// Move to the next phase
    pub fn advance(&mut self, next: JobPhase) -> Result<(), WorkerError> {
        let legal = matches!(
            (self.phase, next),
            (JobPhase::Waiting, JobPhase::Intake)
                | (JobPhase::Intake, JobPhase::NotifyPending)
                | (JobPhase::NotifyPending, JobPhase::Executing)
                | (JobPhase::Executing, JobPhase::Classifying)
                | (JobPhase::Classifying, JobPhase::Reporting)
                | (JobPhase::Reporting, JobPhase::Billing)
                | (JobPhase::Reporting, JobPhase::Stopped)
                | (JobPhase::Billing, JobPhase::Stopped)
        ) || (next == JobPhase::Failed
            && self.phase != JobPhase::Waiting
            && !self.phase.is_terminal());

        if !legal {
            return Err(WorkerError::InternalError(format!(
                "illegal phase transition: {:?} -> {:?}",
                self.phase, next
            )));
        }

        debug!("Job phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

impl Default for JobFsm {
    fn default() -> Self {
        Self::new()
    }
}

//! Outcome classification

use crate::deploy::link::valid_link_captured;
use crate::models::outcome::DeploymentOutcome;
use crate::models::report::DeploymentStatus;

/// Combine exit status and link validity into the final verdict.
///
/// A non-zero exit fails the deployment even when the link validates, and an
/// invalid link fails it even on a clean exit.
pub fn classify(outcome: &DeploymentOutcome, protocol: &str) -> DeploymentStatus {
    let link_ok = valid_link_captured(&outcome.logs_to_capture.site_preview, protocol);

    if outcome.exit_code != 0 || !link_ok {
        DeploymentStatus::Failed
    } else {
        DeploymentStatus::Deployed
    }
}

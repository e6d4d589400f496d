//! Deployment channel naming

/// Channel carrying lifecycle events for one deployment topic
pub fn deployment(topic: &str) -> String {
    format!("deployment.{topic}")
}

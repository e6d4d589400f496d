//! Deployment execution

pub mod executor;
pub mod link;
pub mod process;

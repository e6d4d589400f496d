//! Deployment runner library
//!
//! Core modules for the single-shot deployment worker: one container, one
//! queue message, one deployment, then the container asks to be recycled.

pub mod app;
pub mod controller;
pub mod deploy;
pub mod errors;
pub mod events;
pub mod http;
pub mod logs;
pub mod models;
pub mod queue;
pub mod settings;
pub mod task;
pub mod utils;

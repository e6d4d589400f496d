//! HTTP boundaries to collaborating services

pub mod client;
pub mod hosting;
pub mod payment;

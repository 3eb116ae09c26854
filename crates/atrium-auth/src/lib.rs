#![doc = include_str!("../README.md")]

mod auth_client;

pub mod capture;
pub mod challenge;
pub mod gateway;
pub mod orchestrator;
pub mod session;

pub use auth_client::{AuthClient, ClientAuthExt};

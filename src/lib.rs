//! Virtual Stylist API
//!
//! This library provides the core functionality for the virtual-stylist
//! service: outfit analysis through the Anthropic Messages API (vision)
//! and virtual try-on through the VModel asynchronous job API, fronted by
//! a bounded-retry polling client.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

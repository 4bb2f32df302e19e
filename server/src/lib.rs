//! Wallet Registry Backend Library
//!
//! Stores a one-to-one mapping from email address to wallet identifier and
//! serves it over HTTP.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod wallet;

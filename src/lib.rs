//! Field case reporting for priority zoonotic diseases.
//!
//! The client core (wizard engine, validation, local store, case ids,
//! referral notification, location capture, SOP registry, aggregation)
//! lives in this library; the `epicase-server` binary exposes the
//! authoritative REST registry over SQLite.

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod referral;
pub mod session;
pub mod sop;
pub mod store;
pub mod wizard;

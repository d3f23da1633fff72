//! Core library for Ventra, the 23Ventures outreach CRM client.
//!
//! Everything durable lives in external collaborators: Supabase holds
//! identity, the relational tables, and CSV blobs; a separate processing
//! API parses CSVs and delivers email. This crate is the client of those
//! contracts plus the small amount of workflow that sits in front of
//! them: form validation, the selection/bulk-send sequence, the CSV
//! ingestion trigger, and the email-history relation resolver.

pub mod api;
pub mod auth;
pub mod blob;
pub mod config;
pub mod error;
pub mod history;
pub mod ingest;
pub mod model;
pub mod resource;
pub mod send;
pub mod store;

pub use error::{Result, VentraError};

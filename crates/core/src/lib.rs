//! Core business logic for Kudos.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain rules, validation, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Capability resolution, principals, scope rules, password hashing
//! - `ledger` - Balance derivation, initial grants, mutation validation
//! - `currency` - Reporting-currency conversion with degraded fallback

pub mod auth;
pub mod currency;
pub mod ledger;

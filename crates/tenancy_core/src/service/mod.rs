//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into tenancy use-cases.
//! - Keep callers decoupled from storage details.

pub mod account_service;

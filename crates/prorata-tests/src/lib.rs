//! Shared fixtures for the Prorata integration and adversarial tests.

pub mod helpers;

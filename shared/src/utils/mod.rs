//! Common utility functions

pub mod redact;

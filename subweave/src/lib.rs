//! subweave: command-line front end for subweave-core.
//!
//! Provides concrete adapters for the capabilities the core consumes:
//! a sidecar-file recognizer, a subprocess correction service, and a
//! session-keyed artifact store.

pub mod cli;
pub mod config;
pub mod correct;
pub mod recognizer;
pub mod run;
pub mod service;
pub mod stitch;
pub mod store;

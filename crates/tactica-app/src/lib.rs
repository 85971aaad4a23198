//! Shared library module for the Tactica app crate.
#![allow(missing_docs, clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod board_view;
pub mod scheduler;
pub mod settings;
pub mod trainer;

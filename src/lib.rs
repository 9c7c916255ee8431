//! Formclerk - Conversational Form-Completion Assistant
//!
//! This crate implements an incremental field-completion engine that fills
//! structured government forms from multi-turn dialogue and document scans.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Panelforge daemon library
//!
//! This module exports the internal components of the daemon for testing purposes.

pub mod builtin;
pub mod config;
pub mod hooks;

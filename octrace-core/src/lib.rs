//! Octrace Core
//!
//! Core types and validation for the octrace distributed log trace tool.
//!
//! This crate contains:
//! - Domain types: validated requests, fetch tasks, run metadata
//! - DTOs: the wire format accepted by the trace API
//! - Hour-window expansion for rotated hourly logs

pub mod domain;
pub mod dto;
pub mod error;
pub mod hours;

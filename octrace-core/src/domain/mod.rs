//! Core domain types
//!
//! These structures represent one validated trace request and the units
//! of work derived from it. They are shared between the engine (which
//! executes them) and the server (which reports on them).

pub mod request;
pub mod run;
pub mod task;

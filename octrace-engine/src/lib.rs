//! Octrace Engine
//!
//! Request-decomposition and concurrent remote-fetch engine. A validated
//! trace request is expanded into one fetch task per `(app, host, hour)`,
//! the result tree is prepared up front, and the tasks are fanned out to
//! bounded concurrent workers, each streaming one remote filtered search
//! into its own result file.

pub mod config;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod results;
pub mod scheduler;

pub use config::Config;
pub use scheduler::Tracer;

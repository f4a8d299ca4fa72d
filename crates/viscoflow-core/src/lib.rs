//! Parameter and result pipeline for a non-isothermal channel-flow solver
//! console: input normalization, material mapping, solver invocation, result
//! sampling and report export.

pub mod config;
pub mod domain;
pub mod modules;

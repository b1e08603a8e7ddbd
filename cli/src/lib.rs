//! Interactive terminal front-end for the phone verification flow.
//!
//! The front-end never owns flow state: it reads input, dispatches flow
//! operations on their own tasks, and renders results and stage changes
//! published by the flow.

pub mod args;
pub mod commands;
pub mod logging;
pub mod presenter;
pub mod repl;

//! Domain layer containing the verification session and its stages.

pub mod operation;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export commonly used domain types
pub use operation::Operation;
pub use session::{Session, Stage};

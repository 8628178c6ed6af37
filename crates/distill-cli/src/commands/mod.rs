//! Command implementations.

mod classes;
mod extract;

pub use classes::execute_classes;
pub use extract::execute_extract;

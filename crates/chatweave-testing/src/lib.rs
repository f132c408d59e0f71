//! Testing infrastructure for chatweave test suites.
//!
//! - `fixtures`: entry builders and sample-file access
//! - `assertions`: checks for the invariants every merged history must hold

pub mod assertions;
pub mod fixtures;

pub use assertions::assert_history_invariants;
pub use fixtures::{assistant, file, swiped, system, user};

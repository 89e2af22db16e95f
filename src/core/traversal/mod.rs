mod engine;
mod report;

pub use engine::{is_auth_location, Traversal};
pub use report::{Phase, RunOutcome, RunReport};

#[cfg(test)]
mod tests;

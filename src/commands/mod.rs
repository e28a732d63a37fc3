//! CLI command implementations

mod compare;
mod locations;
mod parse;
mod resolve;

pub use compare::compare;
pub use locations::locations;
pub use parse::parse;
pub use resolve::resolve;

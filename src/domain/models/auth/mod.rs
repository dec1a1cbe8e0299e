pub mod identity;
pub mod outcome;

pub use identity::*;
pub use outcome::*;

pub mod platform;
pub mod profile;
pub mod outcome;

pub use platform::*;
pub use profile::*;
pub use outcome::*;

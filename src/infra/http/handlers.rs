mod admin;
mod public;
mod system;

pub use admin::*;
pub use public::*;
pub use system::*;

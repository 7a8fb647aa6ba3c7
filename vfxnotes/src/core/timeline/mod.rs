//! Timeline Module
//!
//! Picture track selection, timeline walking, component classification and
//! clip name resolution.

mod outline;
mod resolver;
mod selector;
mod walker;

pub use outline::*;
pub use resolver::*;
pub use selector::*;
pub use walker::*;

//! Input interception ("airlock").
//!
//! # Module Structure
//!
//! - `selector` - allow-list selectors matched against an event's path
//! - `airlock` - activation handle, capture-phase filter, surface hooks

mod airlock;
mod selector;

pub use airlock::{Airlock, AirlockHandle, InterceptSurface, InterceptVerdict};
pub use selector::{AllowList, ElementSelector, SelectorParseError};

//! Entity records and change tracking.

mod record;
mod state;

pub use record::{Entity, Related};
pub use state::EntityStateTracker;

pub mod bus;
pub mod events;
pub mod topics;

pub use bus::{EventBus, SubscriberId};
pub use events::Event;

//! Background refresh of backend-owned view state

pub mod poller;

pub use poller::{Poller, Subscription, Visibility};

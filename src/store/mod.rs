//! Host and monitor storage.
//!
//! [`TopologyStore`] is the contract; [`ConfigurationStore`] is the in-memory
//! implementation loaded from the configuration file.

mod configuration;
mod loader;
mod traits;

pub use configuration::ConfigurationStore;
pub use traits::TopologyStore;

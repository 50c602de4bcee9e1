//! Load generator for litess workers with hot-reloaded settings.

pub mod lifecycle;
pub mod loadgen;
pub mod observability;
pub mod settings;
pub mod state;

pub use lifecycle::Shutdown;
pub use settings::{get_instance, Manager, ManagerOptions, Settings, Snapshot};
pub use state::StateStore;

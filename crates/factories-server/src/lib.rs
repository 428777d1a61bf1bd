//! factories-server — REST boundary for the factory/children service.

pub mod error;
pub mod handlers;
pub mod notifier;
pub mod router;

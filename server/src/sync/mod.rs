mod sync_tracker;
mod synchronizer;
mod transport;

pub use sync_tracker::SyncTracker;
pub use synchronizer::Synchronizer;
pub use transport::{ObserverResolver, Transport};

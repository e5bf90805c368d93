pub mod recording_transport;
pub mod test_capabilities;

pub use recording_transport::{RecordingTransport, Sent};
pub use test_capabilities::{Hook, TestCapabilities};
pub use test_item::TestItem;
pub use test_observers::TestObservers;
pub use test_server::{TestServer, OWNER};

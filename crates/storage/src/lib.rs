pub mod artifacts;
pub mod signal_log;

pub use artifacts::ArtifactStore;
pub use signal_log::SignalLog;

/// Harness for driving a whole context in tests.
pub mod harness;
/// A widget that records every hook it receives.
pub mod recorder;

pub use harness::Harness;
pub use recorder::{Recorder, RecorderLog};

pub use crate::backend::test::{TestBackend, TestLog};

//! Remote check-run verification
//!
//! - [`source`]: the [`CheckRunSource`] seam and its GitHub implementation
//! - [`poller`]: the polling state machine that waits for a terminal conclusion

pub mod poller;
pub mod source;

pub use checkpush_github::{CheckConclusion, CheckRun, CheckRunList, CheckStatus};
pub use poller::{CheckStatusPoller, PollSettings};
pub use source::CheckRunSource;

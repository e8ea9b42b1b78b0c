//! Cancellation of an in-flight walk.
//!
//! Clones of a token observe the same state. A child token is cancelled when
//! its parent is, but cancelling the child leaves the parent untouched; the
//! engine hands the walk a child so that a fail-fast error stops sibling tasks
//! without cancelling the caller's token.
//!
//! The walker checks the token on entry to every directory and before every
//! file, the line producer checks it before each hand-off, and line workers
//! check it after each receive. Only the synchronous half of the token is
//! used, so no async runtime is involved.
pub use tokio_util::sync::CancellationToken;

//! Process layer: launching the external tagger and reading its output.
//! Provides the `invoker` (argument building, child process, lazy stdout
//! lines) and the `presence` diagnostic.
pub mod invoker;
pub use invoker::{CONLL_FLAGS, CancelHandle, InvocationSpec, TaggerLines, split_command};

pub mod presence;
pub use presence::{USAGE_BANNER, check_tagger_present};

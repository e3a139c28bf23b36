//! Accessor Code Generation
//!
//! Emits the instruction shortcut methods spliced into a generated driver.
//! Every instruction gets a plain and a timed accessor; every parameter
//! group additionally gets its dense lookup table and N-argument
//! accessors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────┐
//! │         AliasTable          │
//! └──────────────┬──────────────┘
//!                │
//!                ▼
//! ┌─────────────────────────────┐
//! │     ShortcutGenerator       │  accessors, maps, offset arithmetic
//! └──────────────┬──────────────┘
//!                │ index expression
//!                ▼
//! ┌─────────────────────────────┐
//! │       Dispatch trait        │  invoke / invoke_timed
//! └─────────────────────────────┘
//! ```
//!
//! Generated code never calls a hard-wired runtime function: every call
//! site is produced by a [`Dispatch`] implementation.

pub mod common;
pub mod shortcuts;

pub use common::{join_ints, CodeGenOptions, IndentWriter};
pub use shortcuts::{ShortcutGenerator, SHORTCUTS_BEGIN, SHORTCUTS_END};

/// Default name of the runtime entry point that runs an instruction.
pub const DEFAULT_DISPATCH_FUNCTION: &str = "RunInstruction";

/// Default name of the run-time parameter on timed accessors.
pub const DEFAULT_RUN_TIME_PARAM: &str = "runTime";

/// Capability the generated code uses to run an instruction.
///
/// Both operations receive target-language expressions and return a
/// complete statement.
pub trait Dispatch {
    /// Run the instruction whose index is `index`.
    fn invoke(&self, index: &str) -> String;

    /// Run the instruction whose index is `index` for `run_time`.
    fn invoke_timed(&self, index: &str, run_time: &str) -> String;
}

/// Dispatch through an overloaded static function, e.g.
/// `RunInstruction(i)` and `RunInstruction(i, runTime)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDispatch {
    function: String,
}

impl NamedDispatch {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl Default for NamedDispatch {
    fn default() -> Self {
        Self::new(DEFAULT_DISPATCH_FUNCTION)
    }
}

impl Dispatch for NamedDispatch {
    fn invoke(&self, index: &str) -> String {
        format!("{}({});", self.function, index)
    }

    fn invoke_timed(&self, index: &str, run_time: &str) -> String {
        format!("{}({}, {});", self.function, index, run_time)
    }
}

//! Flowgen - Application generator for microfluidic control software
//!
//! Turns a template application plus a device data file exported by a chip
//! design tool into a ready-to-build control application.
//!
//! # Features
//!
//! - **Instruction aliasing**: every instruction gets named accessors;
//!   families such as `Pump_0_1`, `Pump_2_0` get an N-argument accessor
//!   backed by a dense lookup table
//! - **Anchor patching**: generated code and device values are spliced into
//!   marked regions of the template sources
//! - **All-or-nothing output**: every file is generated and validated in
//!   memory before any of them is written
//!
//! # Example
//!
//! ```rust
//! use flowgen::alias::AliasTable;
//! use flowgen::codegen::{NamedDispatch, ShortcutGenerator};
//!
//! let table = AliasTable::from_names(&["Pump_0", "Pump_1", "Mix"]);
//! let code = ShortcutGenerator::new(NamedDispatch::default()).generate(&table);
//!
//! assert!(code.contains("Pump_instruction_map = {0,1};"));
//! assert!(code.contains("public static void Mix() {"));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │  Data file      │      │  Template files │
//! └────────┬────────┘      └────────┬────────┘
//!          │ datafile               │ rename prefix
//!          ▼                        │
//! ┌─────────────────┐               │
//! │  AliasTable     │  names, groups, dense maps
//! └────────┬────────┘               │
//!          │ codegen                │
//!          ▼                        ▼
//! ┌──────────────────────────────────────────┐
//! │  template::TemplatePatch (per module)    │
//! └────────────────────┬─────────────────────┘
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │  app::StagedApp  ->  commit              │
//! └──────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]

pub mod alias;
pub mod app;
pub mod codegen;
pub mod config;
pub mod datafile;
pub mod template;

// Re-export commonly used types
pub use alias::{AliasTable, Diagnostic, Instruction, ParameterGroup};
pub use app::{AppGenerator, AppSpec, MakeError, StagedApp};
pub use codegen::{Dispatch, NamedDispatch, ShortcutGenerator};
pub use config::{ConfigError, FlowgenConfig};
pub use datafile::{DataFileError, DeviceData};
pub use template::{Anchor, Document, PatchError, TemplatePatch};

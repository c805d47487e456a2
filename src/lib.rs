//! Stochastic-computing matrix-multiply Verilog generator.
//!
//! The core is [`plan::TreePlan`], which lays out a tree of two-input
//! adders over any number of inputs. The [`hdl`] layer turns plans and
//! dimensions into Verilog modules and testbenches, [`stimulus`] produces
//! the matching data files, and [`generate::generate`] assembles both into
//! a [`generate::Bundle`] ready to be written out.

pub mod bits;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod generate;
pub mod hdl;
pub mod lfsr;
pub mod plan;
pub mod span;
pub mod stimulus;

pub use config::Options;
pub use error::{Error, Result};
pub use generate::{generate, Bundle, GeneratedFile};
pub use plan::{plan_signals, NamedPlan, PrefixNaming, TreePlan};

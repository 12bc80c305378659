//! Crate for the `filtermatcher` project
//!
//! Compiles attribute criteria once and evaluates them against the
//! attributes of each telemetry record.
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_copy_implementations)]
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod filterset;
pub mod logger;
pub mod matcher;
pub mod value;

pub use matcher::{AttributeMap, AttributeMatcher, AttributeSpec, AttributesMatcher, MatchMode};
pub use value::{Value, ValueType};

//! Swap the skeleton proportions of .bvh files.
//!
//! The OFFSET values of a source hierarchy are replaced with the ones of a reference
//! skeleton, while the root joint's placement and the MOTION section stay untouched.
//!
//! ```
//! use bvh_skeleton_swap::parse::load_offsets_from_string;
//! use bvh_skeleton_swap::rewrite::rewrite_offsets;
//!
//! let reference = load_offsets_from_string("ROOT Hips\n{\n  OFFSET 1 1 1\n  JOINT Spine\n  {\n    OFFSET 0 9 0\n  }\n}\n").unwrap();
//! let source = "ROOT Hips\n{\n  OFFSET 0 10 0\n  JOINT Spine\n  {\n    OFFSET 0 5 0\n  }\n}\nMOTION\n";
//!
//! let outcome = rewrite_offsets(source, &reference, true);
//! assert!(outcome.text.contains("  OFFSET 0 10 0\n"));
//! assert!(outcome.text.contains("    OFFSET 0.0 9.0 0.0\n"));
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod errors;
pub mod parse;
pub mod report;
pub mod rewrite;
pub mod types;
pub mod utils;
pub mod verify;

pub use errors::{Error, Result};
pub use types::{JointOffset, OffsetTable};

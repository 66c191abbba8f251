use crate::classify::{classify, LineKind, PassState};
use crate::errors::Result;
use crate::types::OffsetTable;
use crate::utils::{format_offset_line, read_text, split_lines, write_atomic};
use std::path::Path;
use tracing::{debug, warn};

/// What a rewrite pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Number of OFFSET lines that received a value from the replacement table.
    pub replaced: usize,
    /// Root joint whose OFFSET line was kept because of root preservation.
    pub preserved_root: Option<String>,
    /// Joints of the source hierarchy that the replacement table does not know.
    pub missing_joints: Vec<String>,
}

/// Substitute the OFFSET values of `source` with the ones in `table`.
///
/// Only the hierarchy section is touched: the MOTION line and everything after it are
/// copied as is. Line count, order, indentation and line endings are preserved.
pub fn rewrite_offsets(source: &str, table: &OffsetTable, preserve_root_offset: bool) -> RewriteOutcome {
    let mut outcome = RewriteOutcome {
        text: String::with_capacity(source.len()),
        ..RewriteOutcome::default()
    };
    let mut state = PassState::default();
    let mut in_hierarchy = true;

    for line in split_lines(source) {
        if !in_hierarchy {
            outcome.text.push_str(line.body);
            outcome.text.push_str(line.ending);
            continue;
        }

        let replacement = match classify(line.body) {
            LineKind::Motion => {
                in_hierarchy = false;
                None
            }
            LineKind::Root(name) => {
                state.declare(name, true);
                None
            }
            LineKind::Joint(name) => {
                state.declare(name, false);
                None
            }
            LineKind::Offset { indent, .. } => match state.take() {
                Some((joint, true)) if preserve_root_offset => {
                    debug!("keeping ROOT {:?} offset", joint);
                    outcome.preserved_root = Some(joint);
                    None
                }
                Some((joint, _)) => match table.get(&joint) {
                    Some(offset) => {
                        outcome.replaced += 1;
                        Some(format_offset_line(indent, offset, line.ending))
                    }
                    None => {
                        warn!("joint {:?} not found in reference skeleton, keeping original offset", joint);
                        outcome.missing_joints.push(joint);
                        None
                    }
                },
                //// End Site offsets
                None => None,
            },
            LineKind::Other(_) => None,
        };

        match replacement {
            Some(new_line) => outcome.text.push_str(&new_line),
            None => {
                outcome.text.push_str(line.body);
                outcome.text.push_str(line.ending);
            }
        }
    }

    outcome
}

/// Rewrite `input` into `output` (which may be the same path).
/// The destination is replaced atomically.
pub fn rewrite_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    table: &OffsetTable,
    preserve_root_offset: bool,
) -> Result<RewriteOutcome> {
    let source = read_text(input.as_ref())?;
    let outcome = rewrite_offsets(&source, table, preserve_root_offset);
    write_atomic(output.as_ref(), outcome.text.as_bytes())?;
    Ok(outcome)
}

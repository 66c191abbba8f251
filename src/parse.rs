use crate::classify::{classify, parse_offset_tokens, LineKind, PassState};
use crate::errors::Result;
use crate::types::*;
use crate::utils::{read_text, split_lines};
use std::path::Path;
use tracing::debug;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn __declare(state: &mut PassState, name: &str, is_root: bool) {
    if let Some(dropped) = state.declare(name, is_root) {
        debug!("joint {:?} has no OFFSET before {:?}, ignoring it", dropped, name);
    }
}

/// Collect the OFFSET of every ROOT/JOINT declaration.
/// End Site offsets are skipped because no declaration is pending when they appear.
fn parse_offsets(text: &str) -> Result<OffsetTable> {
    let mut table = OffsetTable::new();
    let mut state = PassState::default();

    for (i, line) in split_lines(text).enumerate() {
        match classify(line.body) {
            LineKind::Root(name) => __declare(&mut state, name, true),
            LineKind::Joint(name) => __declare(&mut state, name, false),
            LineKind::Offset { tokens, .. } if state.is_pending() => {
                let offset = parse_offset_tokens(tokens, i + 1)?;
                if let Some((joint, is_root)) = state.take() {
                    if table.contains(&joint) {
                        debug!("joint {:?} declared more than once, keeping the last OFFSET", joint);
                    }
                    if is_root {
                        table.insert_root(&joint, offset);
                    } else {
                        table.insert(&joint, offset);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(table)
}

//////////////////////////////////////////////////////////////// PUBLIC ///////////////////////////////////////////////////////////////

/// load joint offsets from a file path
pub fn load_offsets_from_file(file_path: impl AsRef<Path>) -> Result<OffsetTable> {
    let contents = read_text(file_path.as_ref())?;
    return parse_offsets(&contents);
}

/// load joint offsets from a string
pub fn load_offsets_from_string(bvh_string: &str) -> Result<OffsetTable> {
    return parse_offsets(bvh_string);
}

use crate::errors::{io_err, Error, Result};
use crate::types::JointOffset;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A line of text split from its terminator (`"\n"`, `"\r\n"` or `""` for an unterminated last line).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line<'a> {
    pub body: &'a str,
    pub ending: &'a str,
}

/// Split `text` into lines without losing anything: concatenating `body + ending` of
/// every line gives back `text`.
pub fn split_lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.split_inclusive('\n').map(|raw| {
        let body = match raw.strip_suffix('\n') {
            Some(stripped) => stripped.strip_suffix('\r').unwrap_or(stripped),
            None => raw,
        };
        Line {
            body,
            ending: &raw[body.len()..],
        }
    })
}

/// `(x, y, z)` with the same number formatting as regenerated OFFSET lines.
pub fn format_offset(offset: &JointOffset) -> String {
    format!("({:?}, {:?}, {:?})", offset.x, offset.y, offset.z)
}

/// Build an OFFSET line. Values use the shortest representation that parses back
/// to the same `f64` (`0.0`, `9.0`, `1e-7`).
pub fn format_offset_line(indent: &str, offset: &JointOffset, ending: &str) -> String {
    format!(
        "{}OFFSET {:?} {:?} {:?}{}",
        indent, offset.x, offset.y, offset.z, ending
    )
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(io_err(path))
}

/// Replace `path` with `contents` through a temporary file in the same directory.
/// The destination is either untouched or fully written; the temporary file is
/// removed when anything fails before the rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    tmp.write_all(contents).map_err(io_err(path))?;
    tmp.as_file().sync_all().map_err(io_err(path))?;

    //// keep the permissions of a file we are overwriting
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_err(path))?;
    }

    tmp.persist(path).map_err(|source| Error::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

use crate::types::{JointOffset, OffsetTable};
use crate::utils::format_offset;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub joint: String,
    pub expected: JointOffset,
    /// `None` when the joint is absent from the rewritten file.
    pub actual: Option<JointOffset>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    RootPreserved(String),
    Updated(String),
    Failed(Mismatch),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    pub checks: Vec<Check>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.mismatches().next().is_none()
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &Mismatch> {
        self.checks.iter().filter_map(|check| match check {
            Check::Failed(mismatch) => Some(mismatch),
            _ => None,
        })
    }

    fn compare(&mut self, joint: &str, expected: &JointOffset, actual: Option<&JointOffset>, is_root: bool) {
        let check = match actual {
            Some(actual) if actual == expected && is_root => Check::RootPreserved(joint.to_string()),
            Some(actual) if actual == expected => Check::Updated(joint.to_string()),
            _ => Check::Failed(Mismatch {
                joint: joint.to_string(),
                expected: *expected,
                actual: actual.copied(),
            }),
        };
        self.checks.push(check);
    }
}

/// Check a rewritten file against the tables it was built from.
///
/// The root joint (taken from `original`) must keep its original offset when
/// `preserve_root_offset` is set, otherwise it must match `reference` like any other
/// joint. Every other joint of `reference` must appear in `output` with exactly the
/// reference value. All joints are checked even after a mismatch.
pub fn verify_rewrite(
    original: &OffsetTable,
    reference: &OffsetTable,
    output: &OffsetTable,
    preserve_root_offset: bool,
) -> VerificationReport {
    let mut report = VerificationReport::default();
    let root = original.root_name();

    if let (Some(root), Some(root_offset)) = (root, original.root_offset()) {
        if preserve_root_offset {
            report.compare(root, root_offset, output.get(root), true);
        } else if let Some(expected) = reference.get(root) {
            report.compare(root, expected, output.get(root), false);
        }
    }

    for entry in reference.iter() {
        if Some(entry.name.as_str()) == root {
            continue;
        }
        report.compare(&entry.name, &entry.offset, output.get(&entry.name), false);
    }

    report
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(actual) => write!(
                f,
                "{} mismatch: expected {}, got {}",
                self.joint,
                format_offset(&self.expected),
                format_offset(actual)
            ),
            None => write!(f, "{} not found in output", self.joint),
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            match check {
                Check::RootPreserved(joint) => writeln!(f, "  ✓ ROOT {} OFFSET preserved", joint)?,
                Check::Updated(joint) => writeln!(f, "  ✓ {} updated correctly", joint)?,
                Check::Failed(mismatch) => writeln!(f, "  ✗ {}", mismatch)?,
            }
        }
        Ok(())
    }
}

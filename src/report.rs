use crate::classify::{classify, is_hierarchy_marker, LineKind};
use crate::types::{JointOffset, OffsetTable};
use crate::utils::{format_offset, split_lines};
use std::fmt;

const RULE_WIDTH: usize = 100;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub joint: String,
    pub original: Option<JointOffset>,
    pub reference: JointOffset,
    pub preserved: bool,
}

/// Side-by-side listing of the offsets a rewrite is about to change, sorted by joint name.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetComparison {
    pub rows: Vec<ComparisonRow>,
}

impl OffsetComparison {
    /// `preserved_root` names the joint whose offset will be kept, if any.
    pub fn new(original: &OffsetTable, reference: &OffsetTable, preserved_root: Option<&str>) -> Self {
        let mut rows: Vec<ComparisonRow> = reference
            .iter()
            .map(|entry| ComparisonRow {
                joint: entry.name.clone(),
                original: original.get(&entry.name).copied(),
                reference: entry.offset,
                preserved: preserved_root == Some(entry.name.as_str()),
            })
            .collect();
        rows.sort_by(|a, b| a.joint.cmp(&b.joint));
        OffsetComparison { rows }
    }
}

fn fmt_offset(offset: Option<&JointOffset>) -> String {
    offset.map_or_else(|| "-".to_string(), format_offset)
}

impl fmt::Display for OffsetComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(80);
        writeln!(f, "{}", rule)?;
        writeln!(f, "{:<20} {:<30} {:<30}", "Joint", "Original Offset", "Reference Offset")?;
        writeln!(f, "{}", rule)?;
        for row in &self.rows {
            let line = format!(
                "{:<20} {:<30} {:<30}",
                row.joint,
                fmt_offset(row.original.as_ref()),
                fmt_offset(Some(&row.reference))
            );
            if row.preserved {
                writeln!(f, "{} [PRESERVED]", line)?;
            } else {
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        writeln!(f, "{}", rule)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Lines from the first one mentioning HIERARCHY up to, not including, the MOTION marker.
/// Trailing whitespace is stripped.
pub fn extract_hierarchy(text: &str) -> Vec<&str> {
    split_lines(text)
        .map(|line| line.body)
        .skip_while(|body| !is_hierarchy_marker(body))
        .take_while(|body| classify(body) != LineKind::Motion)
        .map(str::trim_end)
        .collect()
}

/// Hierarchy sections of two files and the indices where they differ.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyDiff<'a> {
    pub original: Vec<&'a str>,
    pub updated: Vec<&'a str>,
    /// Compared pairwise up to the shorter section.
    pub differences: Vec<usize>,
}

impl<'a> HierarchyDiff<'a> {
    pub fn new(original_text: &'a str, updated_text: &'a str) -> Self {
        let original = extract_hierarchy(original_text);
        let updated = extract_hierarchy(updated_text);
        let differences = original
            .iter()
            .zip(updated.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        HierarchyDiff {
            original,
            updated,
            differences,
        }
    }
}

impl fmt::Display for HierarchyDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(f, "Found {} lines with differences", self.differences.len())?;
        writeln!(f, "{}", rule)?;
        for &i in &self.differences {
            writeln!(f, "[Line {}]", i)?;
            writeln!(f, "  ORIGINAL: {}", self.original[i])?;
            writeln!(f, "  UPDATED:  {}", self.updated[i])?;
        }
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "Full HIERARCHY section of updated file:")?;
        writeln!(f, "{}", rule)?;
        for line in &self.updated {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

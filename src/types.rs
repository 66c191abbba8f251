use cgmath::Vector3;
use std::collections::HashMap;

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
/// Translation of a joint relative to its parent, exactly as written in the OFFSET line.
pub type JointOffset = Vector3<f64>;

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct JointEntry {
    pub name: String,
    pub offset: JointOffset,
}

/// Joint name -> offset mapping built by one parse pass.
///
/// Iteration follows the order in which joints first received an offset. Assigning
/// an offset to a name that is already present overwrites the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetTable {
    entries: Vec<JointEntry>,
    index: HashMap<String, Index>,
    root: Option<Index>,
}

impl OffsetTable {
    pub fn new() -> Self {
        OffsetTable::default()
    }

    /// Insert or overwrite the offset of `name`.
    pub fn insert(&mut self, name: &str, offset: JointOffset) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].offset = offset,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(JointEntry {
                    name: name.to_string(),
                    offset,
                });
            }
        }
    }

    /// Same as [`OffsetTable::insert`] but also remembers `name` as the root joint,
    /// unless a root was already recorded.
    pub fn insert_root(&mut self, name: &str, offset: JointOffset) {
        self.insert(name, offset);
        if self.root.is_none() {
            self.root = self.index.get(name).copied();
        }
    }

    pub fn get(&self, name: &str) -> Option<&JointOffset> {
        self.index.get(name).map(|&i| &self.entries[i].offset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of the first ROOT joint that received an offset.
    pub fn root_name(&self) -> Option<&str> {
        self.root.map(|i| self.entries[i].name.as_str())
    }

    pub fn root_offset(&self) -> Option<&JointOffset> {
        self.root.map(|i| &self.entries[i].offset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_first_position() {
        let mut table = OffsetTable::new();
        table.insert("Hips", JointOffset::new(0.0, 1.0, 0.0));
        table.insert("Spine", JointOffset::new(0.0, 2.0, 0.0));
        table.insert("Hips", JointOffset::new(5.0, 5.0, 5.0));

        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Hips", "Spine"]);
        assert_eq!(table.get("Hips"), Some(&JointOffset::new(5.0, 5.0, 5.0)));
    }

    #[test]
    fn first_root_wins() {
        let mut table = OffsetTable::new();
        assert_eq!(table.root_name(), None);
        table.insert_root("Hips", JointOffset::new(0.0, 10.0, 0.0));
        table.insert_root("Other", JointOffset::new(1.0, 1.0, 1.0));

        assert_eq!(table.root_name(), Some("Hips"));
        assert_eq!(table.root_offset(), Some(&JointOffset::new(0.0, 10.0, 0.0)));
        assert!(table.contains("Other"));
    }
}

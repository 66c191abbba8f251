use crate::errors::{Error, Result};
use crate::utils::read_text;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "bvh";
pub const DEFAULT_BACKUP_DIR_NAME: &str = "backup_original_skeleton";

/// Settings of a batch skeleton update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// .bvh file whose joint offsets are copied into every source file
    pub reference: PathBuf,

    /// Directory scanned (non-recursively) for source files
    pub source_dir: PathBuf,

    /// File extension of source files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Where originals are copied before being overwritten.
    /// Defaults to `<source_dir>/backup_original_skeleton`.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Write rewritten files here instead of overwriting the sources
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub preserve_root_offset: bool,

    /// Nothing is modified unless this is set
    #[serde(default)]
    pub confirm: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
fn default_true() -> bool {
    true
}

impl BatchConfig {
    pub fn new(reference: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        BatchConfig {
            reference: reference.into(),
            source_dir: source_dir.into(),
            extension: default_extension(),
            backup_dir: None,
            output_dir: None,
            preserve_root_offset: true,
            confirm: false,
        }
    }

    pub fn parse(toml_str: &str, path: &Path) -> Result<Self> {
        toml::from_str(toml_str).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_text(path)?;
        BatchConfig::parse(&contents, path)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| self.source_dir.join(DEFAULT_BACKUP_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = BatchConfig::parse(
            r#"
reference = "demo/go2.bvh"
source_dir = "data/DogSet"
"#,
            Path::new("batch.toml"),
        )
        .unwrap();

        assert_eq!(config, BatchConfig::new("demo/go2.bvh", "data/DogSet"));
        assert_eq!(config.extension, "bvh");
        assert!(config.preserve_root_offset);
        assert!(!config.confirm);
        assert_eq!(
            config.backup_dir(),
            PathBuf::from("data/DogSet").join("backup_original_skeleton")
        );
    }

    #[test]
    fn full_config() {
        let config = BatchConfig::parse(
            r#"
reference = "go2.bvh"
source_dir = "in"
extension = "BVH"
backup_dir = "backups"
output_dir = "out"
preserve_root_offset = false
confirm = true
"#,
            Path::new("batch.toml"),
        )
        .unwrap();

        assert_eq!(config.extension, "BVH");
        assert_eq!(config.backup_dir(), PathBuf::from("backups"));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(!config.preserve_root_offset);
        assert!(config.confirm);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = BatchConfig::parse(
            "reference = \"a\"\nsource_dir = \"b\"\nconfrim = true\n",
            Path::new("batch.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn missing_reference_is_rejected() {
        let err = BatchConfig::parse("source_dir = \"b\"\n", Path::new("batch.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}

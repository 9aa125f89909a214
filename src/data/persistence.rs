use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

pub fn get_file_path(name: &str) -> Result<PathBuf> {
    Ok(get_data_dir()?.join(name))
}

/// A document stored as one YAML or JSON file in the data directory.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    fn load() -> Result<Self> {
        read_document(&get_file_path(Self::filename())?)
    }

    fn save(&self) -> Result<()> {
        write_document(self, &get_file_path(Self::filename())?)
    }

    /// Load from an explicit directory, bypassing the global `DATA_DIR`.
    fn load_from(dir: &Path) -> Result<Self> {
        read_document(&dir.join(Self::filename()))
    }

    /// Save to an explicit directory, bypassing the global `DATA_DIR`.
    fn save_to(&self, dir: &Path) -> Result<()> {
        write_document(self, &dir.join(Self::filename()))
    }
}

fn read_document<T: Persistable>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "no file, using defaults");
        return Ok(T::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if T::is_json() {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON from {}", path.display()))
    } else {
        serde_norway::from_str(&contents)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }
}

fn write_document<T: Persistable>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }
    let contents = if T::is_json() {
        serde_json::to_string_pretty(value).context("failed to serialize JSON")?
    } else {
        serde_norway::to_string(value).context("failed to serialize YAML")?
    };
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct JsonDoc {
        value: String,
    }

    impl Persistable for JsonDoc {
        fn filename() -> &'static str {
            "doc.json"
        }
        fn is_json() -> bool {
            true
        }
    }

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct YamlDoc {
        count: u32,
    }

    impl Persistable for YamlDoc {
        fn filename() -> &'static str {
            "doc.yaml"
        }
        fn is_json() -> bool {
            false
        }
    }

    #[test]
    fn test_get_file_path_appends_filename() {
        let path = get_file_path("selection.json").unwrap();
        assert!(path.ends_with("selection.json"));
    }

    #[test]
    fn test_load_from_returns_default_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(JsonDoc::load_from(tmp.path()).unwrap(), JsonDoc::default());
    }

    #[test]
    fn test_json_save_to_and_load_from_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let doc = JsonDoc {
            value: "round-trip".to_string(),
        };
        doc.save_to(tmp.path()).unwrap();
        assert_eq!(JsonDoc::load_from(tmp.path()).unwrap(), doc);
        let raw = fs::read_to_string(tmp.path().join("doc.json")).unwrap();
        assert!(raw.contains("\"value\": \"round-trip\""));
    }

    #[test]
    fn test_yaml_save_to_and_load_from_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let doc = YamlDoc { count: 99 };
        doc.save_to(tmp.path()).unwrap();
        assert_eq!(YamlDoc::load_from(tmp.path()).unwrap(), doc);
    }

    #[test]
    fn test_save_to_creates_directory_if_missing() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let doc = JsonDoc {
            value: "nested".to_string(),
        };
        doc.save_to(&nested).unwrap();
        assert_eq!(JsonDoc::load_from(&nested).unwrap(), doc);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.yaml"), "count: [not a number").unwrap();
        let err = YamlDoc::load_from(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("doc.yaml"));
    }
}

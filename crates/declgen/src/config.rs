//! Configuration for declgen.
//!
//! Loaded from `declgen.toml` (or the path given with `--config`). Every
//! section is optional; relative paths resolve against the directory that
//! holds the file.
//!
//! Example declgen.toml:
//! ```toml
//! [source]
//! url = "https://example.com/schema.json"
//!
//! [output]
//! path = "index.d.ts"
//! type_name = "Configuration"
//!
//! [publish]
//! command = ["npm", "publish", "--access", "public"]
//! ```

use declgen_syntax::FormatOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "declgen.toml";

/// Where the schema comes from.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// `http(s)://` URL, `file://` URL, or filesystem path.
    pub url: Option<String>,
}

/// Generated declaration module settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Name of the root declaration.
    pub type_name: String,
    /// Banner comment text; an empty string omits the banner.
    pub banner: Option<String>,
    /// Give open objects a `[k: string]: unknown` signature before rewriting.
    pub additional_properties: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("index.d.ts"),
            type_name: "Configuration".to_string(),
            banner: None,
            additional_properties: true,
        }
    }
}

/// Persisted run state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// File holding the fingerprint of the last schema that was generated.
    pub fingerprint: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            fingerprint: PathBuf::from(".declgen/fingerprint"),
        }
    }
}

/// Post-generation publish step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Program and arguments; empty disables publishing.
    pub command: Vec<String>,
    /// Working directory for `command`.
    pub dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            dir: PathBuf::from("."),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub state: StateConfig,
    pub format: FormatOptions,
    pub publish: PublishConfig,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A missing file yields the defaults, rooted at the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self {
                    root,
                    ..Self::default()
                });
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.root = root;
        Ok(config)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output.path)
    }

    pub fn fingerprint_path(&self) -> PathBuf {
        self.resolve(&self.state.fingerprint)
    }

    pub fn publish_dir(&self) -> PathBuf {
        self.resolve(&self.publish.dir)
    }

    /// The schema location, with relative filesystem paths resolved.
    pub fn source(&self) -> Option<String> {
        let url = self.source.url.as_deref()?;
        if url.contains("://") {
            return Some(url.to_string());
        }
        Some(self.resolve(Path::new(url)).to_string_lossy().into_owned())
    }

    /// Banner for compiled output; `None` means no banner.
    pub fn banner(&self) -> Option<String> {
        match self.output.banner.as_deref() {
            None => Some(declgen_typegen::DEFAULT_BANNER.to_string()),
            Some("") => None,
            Some(text) => Some(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.source.url, None);
        assert_eq!(config.output.type_name, "Configuration");
        assert!(config.output.additional_properties);
        assert_eq!(config.format, FormatOptions::default());
        assert_eq!(config.output_path(), dir.path().join("index.d.ts"));
        assert_eq!(
            config.fingerprint_path(),
            dir.path().join(".declgen/fingerprint")
        );
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[source]
url = "schema.json"

[output]
path = "types/index.d.ts"
type_name = "Linter"
banner = ""

[format]
use_tabs = true

[publish]
command = ["npm", "publish"]
dir = "types"
"#
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.source(),
            Some(dir.path().join("schema.json").to_string_lossy().into_owned())
        );
        assert_eq!(config.output.type_name, "Linter");
        assert_eq!(config.output_path(), dir.path().join("types/index.d.ts"));
        assert_eq!(config.banner(), None);
        assert!(config.format.use_tabs);
        assert_eq!(config.format.indent_width, 2);
        assert_eq!(config.publish.command, ["npm", "publish"]);
        assert_eq!(config.publish_dir(), dir.path().join("types"));
    }

    #[test]
    fn test_urls_are_not_resolved() {
        let config = Config {
            source: SourceConfig {
                url: Some("https://example.com/schema.json".into()),
            },
            root: PathBuf::from("/project"),
            ..Config::default()
        };
        assert_eq!(
            config.source().as_deref(),
            Some("https://example.com/schema.json")
        );
        assert_eq!(
            config.banner().as_deref(),
            Some(declgen_typegen::DEFAULT_BANNER)
        );
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[output\npath = 3").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

// Configuration loading and parsing (draft.toml, credentials.toml).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Position;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing `config/`; relative data paths resolve here.
    pub base_dir: PathBuf,
    pub data: DataPaths,
    /// Top-tier size per tracked position.
    pub tiers: BTreeMap<Position, usize>,
    pub display: DisplayConfig,
    pub photos: PhotoConfig,
    pub viewer: ViewerConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Data source paths with relative entries anchored at `base_dir`.
    pub fn resolved_data_paths(&self) -> DataPaths {
        self.data.resolved(&self.base_dir)
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    data: DataPaths,
    tiers: BTreeMap<String, usize>,
    display: DisplaySection,
    #[serde(default)]
    photos: PhotoConfig,
    #[serde(default)]
    viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub adp: String,
    pub performance: String,
}

impl DataPaths {
    pub fn resolved(&self, base_dir: &Path) -> DataPaths {
        let anchor = |p: &str| {
            let path = Path::new(p);
            if path.is_absolute() {
                p.to_string()
            } else {
                base_dir.join(path).to_string_lossy().into_owned()
            }
        };
        DataPaths {
            adp: anchor(&self.adp),
            performance: anchor(&self.performance),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DisplaySection {
    mode: String,
    top_n: usize,
    page_size: usize,
    low_tier_warning: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Text,
    Dashboard,
}

impl DisplayMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(DisplayMode::Text),
            "dashboard" => Some(DisplayMode::Dashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Rows in the text-mode ranking table.
    pub top_n: usize,
    /// Rows per dashboard page.
    pub page_size: usize,
    /// Warn when a tier's remaining count is at or below this.
    pub low_tier_warning: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    pub enabled: bool,
    /// Search endpoint; `{key}` is replaced with the API key.
    pub base_url: String,
    pub placeholder: String,
    pub timeout_secs: u64,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        PhotoConfig {
            enabled: false,
            base_url: "https://www.thesportsdb.com/api/v1/json/{key}/searchplayers.php".into(),
            placeholder: "https://www.thesportsdb.com/images/media/player/placeholder.png"
                .into(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            enabled: false,
            port: 9002,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub photo_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draft.toml` and
/// (optionally) `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- draft.toml (required) ---
    let draft_path = config_dir.join("draft.toml");
    let draft_text = read_file(&draft_path)?;
    let draft_file: DraftFile =
        toml::from_str(&draft_text).map_err(|e| ConfigError::ParseError {
            path: draft_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let tiers = parse_tiers(&draft_file.tiers)?;

    let mode =
        DisplayMode::parse(&draft_file.display.mode).ok_or_else(|| ConfigError::ValidationError {
            field: "display.mode".into(),
            message: format!(
                "expected \"text\" or \"dashboard\", got {:?}",
                draft_file.display.mode
            ),
        })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        data: draft_file.data,
        tiers,
        display: DisplayConfig {
            mode,
            top_n: draft_file.display.top_n,
            page_size: draft_file.display.page_size,
            low_tier_warning: draft_file.display.low_tier_warning,
        },
        photos: draft_file.photos,
        viewer: draft_file.viewer,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Config files seeded on first run. The built-in copy is used when the
/// base directory has no `defaults/` of its own (per-user config dir).
const SEEDED_FILES: &[(&str, &str)] = &[(
    "draft.toml",
    include_str!("../../../defaults/draft.toml"),
)];

/// Write any missing file from `SEEDED_FILES` into `config/`.
///
/// Content comes from `defaults/<name>` under `base_dir` when present,
/// otherwise from the built-in copy. Existing files are never replaced.
/// Returns the files that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| seed_error("create", &config_dir, e))?;

    let mut seeded = Vec::new();
    for &(name, built_in) in SEEDED_FILES {
        let target = config_dir.join(name);
        if target.exists() {
            continue;
        }

        let shipped = base_dir.join("defaults").join(name);
        let content = if shipped.is_file() {
            std::fs::read_to_string(&shipped).map_err(|e| seed_error("read", &shipped, e))?
        } else {
            debug!("No {} on disk; using built-in defaults", shipped.display());
            built_in.to_string()
        };

        std::fs::write(&target, content).map_err(|e| seed_error("write", &target, e))?;
        seeded.push(target);
    }

    Ok(seeded)
}

fn seed_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::DefaultsCopyError {
        message: format!("failed to {action} {}: {e}", path.display()),
    }
}

/// Pick the directory to load from: the working directory when it holds
/// `config/` or `defaults/`, otherwise the per-user config directory.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    match ProjectDirs::from("", "", "draftpick") {
        Some(dirs) => {
            let base = dirs.config_dir().to_path_buf();
            info!(
                "No config/ in working directory; using {} (relative data paths resolve there)",
                base.display()
            );
            Ok(base)
        }
        None => Ok(cwd),
    }
}

/// Resolve the base directory, copy any missing defaults, and load.
pub fn load_config() -> Result<Config, ConfigError> {
    let base = resolve_base_dir()?;
    let copied = ensure_config_files(&base)?;
    for path in &copied {
        info!("Initialized {} from defaults", path.display());
    }
    load_config_from(&base)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_tiers(raw: &BTreeMap<String, usize>) -> Result<BTreeMap<Position, usize>, ConfigError> {
    let mut tiers = BTreeMap::new();
    for (key, &size) in raw {
        let position = Position::from_str_pos(key).ok_or_else(|| ConfigError::ValidationError {
            field: format!("tiers.{key}"),
            message: "not a recognized position".into(),
        })?;
        if tiers.insert(position, size).is_some() {
            return Err(ConfigError::ValidationError {
                field: format!("tiers.{key}"),
                message: format!("{position} listed more than once"),
            });
        }
    }
    Ok(tiers)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tiers.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "tiers".into(),
            message: "at least one position must be tracked".into(),
        });
    }
    for (position, size) in &config.tiers {
        if *size == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("tiers.{position}"),
                message: "must be > 0".into(),
            });
        }
    }

    let display_fields: &[(&str, usize)] = &[
        ("display.top_n", config.display.top_n),
        ("display.page_size", config.display.page_size),
    ];
    for (name, val) in display_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.photos.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "photos.timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    if config.data.adp.trim().is_empty() || config.data.performance.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data".into(),
            message: "adp and performance paths must be set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Repository root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        assert!(
            root.join("defaults").exists(),
            "Cannot locate defaults/ from {:?}",
            root
        );
        root
    }

    /// Fresh temp dir with `config/draft.toml` holding `draft_toml`.
    fn temp_base(name: &str, draft_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/draft.toml"), draft_toml).unwrap();
        tmp
    }

    fn default_draft_toml() -> String {
        fs::read_to_string(project_root().join("defaults/draft.toml")).unwrap()
    }

    fn expect_validation_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_defaults() {
        let tmp = temp_base("draftpick_config_defaults", &default_draft_toml());
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.data.adp, "data/2025ADP.csv");
        assert_eq!(config.data.performance, "data/2024PPR.csv");
        assert_eq!(config.tiers.get(&Position::Quarterback), Some(&12));
        assert_eq!(config.tiers.get(&Position::RunningBack), Some(&25));
        assert_eq!(config.tiers.get(&Position::WideReceiver), Some(&25));
        assert_eq!(config.tiers.get(&Position::TightEnd), Some(&12));
        assert_eq!(config.tiers.len(), 4);
        assert_eq!(config.display.mode, DisplayMode::Dashboard);
        assert_eq!(config.display.top_n, 15);
        assert_eq!(config.display.page_size, 20);
        assert_eq!(config.display.low_tier_warning, 3);
        assert!(config.photos.enabled);
        assert!(config.photos.base_url.contains("{key}"));
        assert!(!config.viewer.enabled);
        assert_eq!(config.viewer.port, 9002);
        assert!(config.credentials.photo_api_key.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_api_key() {
        let tmp = temp_base("draftpick_config_creds", &default_draft_toml());
        fs::write(
            tmp.join("config/credentials.toml"),
            "photo_api_key = \"abc123\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.credentials.photo_api_key.as_deref(), Some("abc123"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let toml = r#"
[data]
adp = "a.csv"
performance = "p.csv"

[tiers]
RB = 10

[display]
mode = "text"
top_n = 10
page_size = 10
low_tier_warning = 2
"#;
        let tmp = temp_base("draftpick_config_minimal", toml);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.display.mode, DisplayMode::Text);
        assert!(!config.photos.enabled);
        assert_eq!(config.photos.timeout_secs, 5);
        assert!(!config.viewer.enabled);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_draft_toml_is_file_not_found() {
        let tmp = std::env::temp_dir().join("draftpick_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = temp_base("draftpick_config_malformed", "[data\nadp = ");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_mode() {
        let toml = default_draft_toml().replace("mode = \"dashboard\"", "mode = \"web\"");
        let tmp = temp_base("draftpick_config_bad_mode", &toml);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "display.mode");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_tier_size() {
        let toml = default_draft_toml().replace("TE = 12", "TE = 0");
        let tmp = temp_base("draftpick_config_zero_tier", &toml);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "tiers.TE");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_tier_position() {
        let toml = default_draft_toml().replace("TE = 12", "LB = 12");
        let tmp = temp_base("draftpick_config_bad_pos", &toml);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "tiers.LB");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_page_size() {
        let toml = default_draft_toml().replace("page_size = 20", "page_size = 0");
        let tmp = temp_base("draftpick_config_zero_page", &toml);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "display.page_size");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let toml = default_draft_toml().replace("timeout_secs = 5", "timeout_secs = 0");
        let tmp = temp_base("draftpick_config_zero_timeout", &toml);
        expect_validation_field(
            load_config_from(&tmp).unwrap_err(),
            "photos.timeout_secs",
        );
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_tiers() {
        let toml = r#"
[data]
adp = "a.csv"
performance = "p.csv"

[tiers]

[display]
mode = "text"
top_n = 10
page_size = 10
low_tier_warning = 2
"#;
        let tmp = temp_base("draftpick_config_no_tiers", toml);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "tiers");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn resolved_paths_anchor_relative_entries() {
        let paths = DataPaths {
            adp: "data/adp.csv".into(),
            performance: "/abs/ppr.csv".into(),
        };
        let resolved = paths.resolved(Path::new("/srv/draft"));
        assert_eq!(
            Path::new(&resolved.adp),
            Path::new("/srv/draft/data/adp.csv")
        );
        assert_eq!(resolved.performance, "/abs/ppr.csv");
    }

    #[test]
    fn display_mode_parse() {
        assert_eq!(DisplayMode::parse("Text"), Some(DisplayMode::Text));
        assert_eq!(DisplayMode::parse(" DASHBOARD "), Some(DisplayMode::Dashboard));
        assert_eq!(DisplayMode::parse("gui"), None);
    }

    #[test]
    fn ensure_config_files_prefers_shipped_defaults() {
        let tmp = std::env::temp_dir().join("draftpick_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults = tmp.join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join("draft.toml"), "x = 1\n").unwrap();
        fs::write(defaults.join("credentials.toml.example"), "k = 1\n").unwrap();

        let seeded = ensure_config_files(&tmp).unwrap();
        assert_eq!(seeded, vec![tmp.join("config/draft.toml")]);
        assert_eq!(
            fs::read_to_string(tmp.join("config/draft.toml")).unwrap(),
            "x = 1\n"
        );
        assert!(!tmp.join("config/credentials.toml.example").exists());
        assert!(!tmp.join("config/credentials.toml").exists());

        // An edited copy is left alone
        fs::write(tmp.join("config/draft.toml"), "edited = true\n").unwrap();
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/draft.toml")).unwrap(),
            "edited = true\n"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_base_dir_is_seeded_with_built_in_defaults() {
        let tmp = std::env::temp_dir().join("draftpick_config_ensure_fresh");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let seeded = ensure_config_files(&tmp).unwrap();
        assert_eq!(seeded.len(), 1);
        assert_eq!(
            fs::read_to_string(tmp.join("config/draft.toml")).unwrap(),
            default_draft_toml()
        );

        let config = load_config_from(&tmp).expect("seeded config should load");
        assert_eq!(config.tiers.len(), 4);
        assert_eq!(
            Path::new(&config.resolved_data_paths().adp),
            tmp.join("data/2025ADP.csv")
        );

        let _ = fs::remove_dir_all(&tmp);
    }
}

// Configuration loading and parsing (arenadraft.toml).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::card::Language;
use crate::draft::order::CardOrder;

const CONFIG_FILE: &str = "arenadraft.toml";

const APP_QUALIFIER: &str = "org";
const APP_AUTHOR: &str = "arenadraft";
const APP_NAME: &str = "arenadraft";

const DB_FILE: &str = "arenadraft.db";

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
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the session service, always ending in `/`.
    pub base_url: String,
    /// Local catalog file; `None` fetches `data/MTGACards.json` from the server.
    pub catalog_path: Option<PathBuf>,
    pub db_path: PathBuf,
    pub registration: RegistrationMode,
    /// Name used when registering without an explicit one.
    pub player_name: String,
    pub language: Language,
    pub card_order: CardOrder,
    pub export_path: PathBuf,
}

/// How the player registers with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMode {
    /// `POST .../players`, then open the lobby socket for the new id.
    #[default]
    Http,
    /// Open the lobby socket and register with its first frame.
    Socket,
}

// ---------------------------------------------------------------------------
// arenadraft.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    server: ServerSection,
    #[serde(default)]
    catalog: CatalogSection,
    #[serde(default)]
    storage: StorageSection,
    #[serde(default)]
    session: SessionSection,
    #[serde(default)]
    view: ViewSection,
    #[serde(default)]
    export: ExportSection,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    base_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogSection {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorageSection {
    #[serde(default)]
    db_path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionSection {
    #[serde(default)]
    registration: RegistrationMode,
    #[serde(default = "default_player_name")]
    player_name: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            registration: RegistrationMode::default(),
            player_name: default_player_name(),
        }
    }
}

fn default_player_name() -> String {
    "Player".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct ViewSection {
    #[serde(default = "default_language")]
    language: String,
    #[serde(default = "default_card_order")]
    card_order: String,
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            language: default_language(),
            card_order: default_card_order(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_card_order() -> String {
    "color".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct ExportSection {
    #[serde(default = "default_export_path")]
    path: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

fn default_export_path() -> String {
    "deck.txt".to_string()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `config/arenadraft.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let language = Language::from_code(&file.view.language).unwrap_or_default();
    let card_order = CardOrder::parse(&file.view.card_order).unwrap_or_default();

    let mut base_url = file.server.base_url.trim().to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }

    let catalog_path = non_empty(&file.catalog.path).map(|p| resolve(base_dir, p));
    let db_path = match non_empty(&file.storage.db_path) {
        Some(p) => resolve(base_dir, p),
        None => default_db_path()?,
    };
    let export_path = resolve(base_dir, &file.export.path);

    Ok(Config {
        base_url,
        catalog_path,
        db_path,
        registration: file.session.registration,
        player_name: file.session.player_name,
        language,
        card_order,
        export_path,
    })
}

/// Copy `defaults/arenadraft.toml` into `config/` unless a config file is
/// already there. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/{CONFIG_FILE} nor config/{CONFIG_FILE} found in {}",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;
    Ok(Some(target))
}

/// Load the config relative to `base_dir` (the working directory when
/// `None`), copying defaults first.
pub fn load_config(base_dir: Option<&Path>) -> Result<Config, ConfigError> {
    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
            path: PathBuf::from("."),
        })?,
    };
    ensure_config_file(&base)?;
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

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Relative paths are taken relative to the base directory.
fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_AUTHOR, APP_NAME).ok_or_else(|| {
        ConfigError::ValidationError {
            field: "storage.db_path".into(),
            message: "no home directory; set an explicit path".into(),
        }
    })?;
    Ok(dirs.data_local_dir().join(DB_FILE))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &ConfigFile) -> Result<(), ConfigError> {
    let url = file.server.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "server.base_url".into(),
            message: format!("must start with http:// or https://, got {url:?}"),
        });
    }

    if Language::from_code(&file.view.language).is_none() {
        let known: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        return Err(ConfigError::ValidationError {
            field: "view.language".into(),
            message: format!(
                "unknown language {:?}; expected one of {}",
                file.view.language,
                known.join(", ")
            ),
        });
    }

    if CardOrder::parse(&file.view.card_order).is_none() {
        return Err(ConfigError::ValidationError {
            field: "view.card_order".into(),
            message: format!("must be \"color\" or \"cmc\", got {:?}", file.view.card_order),
        });
    }

    if file.session.player_name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "session.player_name".into(),
            message: "must not be empty".into(),
        });
    }

    if non_empty(&file.export.path).is_none() {
        return Err(ConfigError::ValidationError {
            field: "export.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Config command implementation.
//!
//! View and create configuration settings.
//! Config file is located at ~/.config/gbak/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use gdrive_api::auth::OAuthConfig;
use gdrive_api::query::ParseMode;
use gdrive_cache::FolderPath;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "GBAK_CONFIG";

/// Minimum secret length to apply masking (show first and last N characters).
const SECRET_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked secret.
const SECRET_MASK_VISIBLE_CHARS: usize = 4;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# gbak - Google Drive backup configuration

# Config schema version (do not modify)
version = 1

# OAuth client from the Google Cloud console (installed application)
# client_id = "1234567890.apps.googleusercontent.com"
# client_secret = "your-client-secret"

# Where to keep OAuth credentials: "file" or "keyring"
# credential_storage = "file"

# Write logs to a file instead of stderr
# log_file = "/home/me/.local/state/gbak/gdrive_backup.log"

[query]
# strict = false      # Reject unknown filter fields
# page_size = 100     # Files per request (1-1000)

# Folders to back up
# [[paths]]
# gdrive_path = "Grad School"
# local_path = "/home/me/grad"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// OAuth client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// OAuth client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Credential storage method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_storage: Option<String>,

    /// Log file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Backup folders.
    #[serde(default)]
    pub paths: Vec<PathConfig>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            client_id: None,
            client_secret: None,
            credential_storage: None,
            log_file: None,
            query: QueryConfig::default(),
            paths: Vec::new(),
        }
    }
}

/// Query configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Reject unknown filter fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Files per list request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// A backup folder entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Folder title on Drive.
    pub gdrive_path: String,

    /// Local directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl Config {
    /// Returns the OAuth client configuration.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Config` if the client ID or secret is missing.
    pub fn oauth_config(&self) -> Result<OAuthConfig> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Ok(OAuthConfig::new(id.clone(), secret.clone()))
            }
            _ => Err(CommandError::Config(
                "client_id and client_secret must be set in the config file (run 'gbak config init')"
                    .to_string(),
            )),
        }
    }

    /// Returns true if credentials are kept in the OS keyring.
    pub fn uses_keyring(&self) -> bool {
        self.credential_storage.as_deref() == Some("keyring")
    }

    /// Returns the filter parse mode, with `strict_flag` taking precedence.
    pub fn parse_mode(&self, strict_flag: bool) -> ParseMode {
        if strict_flag || self.query.strict.unwrap_or(false) {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Returns the configured backup folders as path store entries.
    pub fn folder_paths(&self) -> Vec<FolderPath> {
        self.paths
            .iter()
            .map(|p| {
                let entry = FolderPath::new(p.gdrive_path.clone());
                match &p.local_path {
                    Some(local) => entry.with_local_path(local.clone()),
                    None => entry,
                }
            })
            .collect()
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/gbak/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("gbak"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("gbak"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than this gbak supports ({})",
            config.version, CONFIG_VERSION
        )));
    }

    // Version 1 is the initial schema; later versions migrate step by step here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Masks a secret, showing only its first and last characters.
fn mask_secret(secret: &str) -> String {
    if secret.len() < SECRET_MASK_MIN_LENGTH || !secret.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &secret[..SECRET_MASK_VISIBLE_CHARS],
        &secret[secret.len() - SECRET_MASK_VISIBLE_CHARS..]
    )
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": {
                "version": config.version,
                "client_id": config.client_id,
                "client_secret": config.client_secret.as_deref().map(mask_secret),
                "credential_storage": config.credential_storage,
                "log_file": config.log_file,
                "query": config.query,
                "paths": config.paths,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref id) = config.client_id {
                println!("  client_id: {}", id);
            }
            if let Some(ref secret) = config.client_secret {
                println!("  client_secret: {}", mask_secret(secret));
            }
            if let Some(ref storage) = config.credential_storage {
                println!("  credential_storage: {}", storage);
            }
            if let Some(ref log_file) = config.log_file {
                println!("  log_file: {}", log_file.display());
            }

            println!("\n[query]");
            if let Some(strict) = config.query.strict {
                println!("  strict: {}", strict);
            }
            if let Some(page_size) = config.query.page_size {
                println!("  page_size: {}", page_size);
            }

            for entry in &config.paths {
                println!("\n[[paths]]");
                println!("  gdrive_path: {}", entry.gdrive_path);
                if let Some(ref local) = entry.local_path {
                    println!("  local_path: {}", local.display());
                }
            }
        } else {
            println!("(No config file exists. Run 'gbak config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Runs `f` with GBAK_CONFIG pointing at `path`, restoring it afterwards.
    fn with_config_path<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, path);
        let result = f();
        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }
        result
    }

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
        }
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.client_id.is_none());
        assert!(config.paths.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            client_id = "id.apps.googleusercontent.com"
            client_secret = "shhh-secret"
            credential_storage = "keyring"
            log_file = "/tmp/gdrive_backup.log"

            [query]
            strict = true
            page_size = 50

            [[paths]]
            gdrive_path = "Grad School"
            local_path = "/home/me/grad"

            [[paths]]
            gdrive_path = "Photos"
            "#,
        )
        .unwrap();

        assert!(config.uses_keyring());
        assert_eq!(config.query.page_size, Some(50));
        assert_eq!(config.parse_mode(false), ParseMode::Strict);
        let paths = config.folder_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].local_path, Some(PathBuf::from("/home/me/grad")));
        assert_eq!(paths[1].local_path, None);
        assert!(config.oauth_config().is_ok());
    }

    #[test]
    fn test_parse_mode_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(config.parse_mode(false), ParseMode::Lenient);
        assert_eq!(config.parse_mode(true), ParseMode::Strict);
    }

    #[test]
    fn test_oauth_config_requires_client() {
        let config = Config {
            client_id: Some("id".to_string()),
            ..Config::default()
        };
        assert!(matches!(config.oauth_config(), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_migrate_rejects_future_version() {
        let config = Config {
            version: CONFIG_VERSION + 1,
            ..Config::default()
        };
        assert!(migrate_config(config).is_err());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcd1234wxyz"), "abcd...wxyz");
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = with_config_path(&path, load_config).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.client_id.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "client_id = ").unwrap();

        let result = with_config_path(&path, load_config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_init_writes_default_and_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let ctx = quiet_ctx();

        with_config_path(&path, || execute_init(&ctx, false)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        let again = with_config_path(&path, || execute_init(&ctx, false));
        assert!(matches!(again, Err(CommandError::Config(_))));

        fs::write(&path, "version = 1\n").unwrap();
        with_config_path(&path, || execute_init(&ctx, true)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}

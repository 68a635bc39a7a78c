use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed settings filename, used for both the local and the global location.
pub const CONFIG_FILE_NAME: &str = "pling-config.json";

/// Display name used when the configuration does not set one.
pub const DEFAULT_USERNAME: &str = "Pling";

/// Number of trailing characters of the webhook URL left visible when the
/// configuration is shown on a terminal.
const MASK_SUFFIX_LEN: usize = 10;

/// Persisted settings record.
///
/// All fields are optional in the file and default to the empty string;
/// unknown keys are ignored on read and never written back. Validity (e.g.
/// a non-empty webhook URL) is the caller's concern, not the manager's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub webhook_url: String,
    pub username: String,
    pub avatar_url: String,
}

impl Settings {
    /// Webhook URL with all but the last few characters hidden, so the full
    /// URL never ends up in terminal scrollback or screenshots.
    pub fn masked_webhook_url(&self) -> String {
        let chars: Vec<char> = self.webhook_url.chars().collect();
        if chars.len() > MASK_SUFFIX_LEN {
            let tail: String = chars[chars.len() - MASK_SUFFIX_LEN..].iter().collect();
            format!("...{tail}")
        } else {
            self.webhook_url.clone()
        }
    }
}

/// Resolves, loads, and persists the settings file.
///
/// The manager is stateless between calls: callers always pass an explicit
/// local/global selector, and settings are re-read on every operation. Both
/// directories are injected at construction so tests can point the manager
/// at temporary locations instead of swapping process-global state.
pub struct Manager {
    working_dir: PathBuf,
    global_dir: Box<dyn Fn() -> Option<PathBuf>>,
}

impl Manager {
    /// Creates a manager rooted at the current working directory, using the
    /// platform per-user configuration directory for the global location.
    pub fn new() -> Result<Self, AppError> {
        let working_dir = env::current_dir().map_err(AppError::WorkingDirUnavailable)?;
        Ok(Self {
            working_dir,
            global_dir: Box::new(dirs::config_dir),
        })
    }

    /// Creates a manager with fixed directories. `global_dir: None` models a
    /// platform where the user configuration directory cannot be determined.
    #[cfg(test)]
    pub fn with_dirs(working_dir: PathBuf, global_dir: Option<PathBuf>) -> Self {
        Self {
            working_dir,
            global_dir: Box::new(move || global_dir.clone()),
        }
    }

    /// Resolves the settings file path for the requested location.
    ///
    /// The local path always resolves; the global path fails when the
    /// platform configuration directory cannot be determined, which callers
    /// must distinguish from "file not found".
    pub fn resolve_path(&self, global: bool) -> Result<PathBuf, AppError> {
        if global {
            let dir = (self.global_dir)().ok_or(AppError::ConfigDirUnavailable)?;
            Ok(dir.join(CONFIG_FILE_NAME))
        } else {
            Ok(self.working_dir.join(CONFIG_FILE_NAME))
        }
    }

    /// Loads and parses the settings file at `path`.
    ///
    /// A missing path, or a path that is not a regular file, is `NotFound`.
    /// Parsing is tolerant: absent fields default to empty strings and
    /// unknown fields are ignored.
    pub fn load_from(&self, path: &Path) -> Result<Settings, AppError> {
        if !path.is_file() {
            return Err(AppError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AppError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings from the preferred location and reports which file won.
    ///
    /// Decision table over `(prefer_global, local exists, global exists)`:
    ///
    /// | prefer_global | local | global | outcome               |
    /// |---------------|-------|--------|-----------------------|
    /// | true          | any   | yes    | global                |
    /// | true          | any   | no     | NotFound (no fallback)|
    /// | false         | yes   | any    | local                 |
    /// | false         | no    | yes    | global                |
    /// | false         | no    | no     | NoConfigFound         |
    ///
    /// An explicit global request is strict: global path resolution failures
    /// surface immediately, and an absent global file is an error even when
    /// a local file exists.
    pub fn load_preferred(&self, prefer_global: bool) -> Result<(Settings, PathBuf), AppError> {
        let local = self.resolve_path(false)?;

        if prefer_global {
            let global = self.resolve_path(true)?;
            if !global.is_file() {
                return Err(AppError::NotFound { path: global });
            }
            let settings = self.load_from(&global)?;
            return Ok((settings, global));
        }

        // Default mode: local wins, global is the silent fallback. A global
        // location that cannot even be resolved counts as nonexistent here.
        let global = self.resolve_path(true).ok();
        let chosen = if local.is_file() {
            local
        } else {
            match global {
                Some(global) if global.is_file() => global,
                global => {
                    return Err(AppError::NoConfigFound {
                        local,
                        global: global.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
                    });
                }
            }
        };

        let settings = self.load_from(&chosen)?;
        Ok((settings, chosen))
    }

    /// Serializes `settings` to `path`, overwriting any existing file.
    ///
    /// Serialization is deterministic (fixed field order, pretty-printed) so
    /// saved files diff cleanly.
    pub fn save_to(&self, settings: &Settings, path: &Path) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(settings).map_err(AppError::Serialize)?;
        fs::write(path, content).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves `settings` to the requested location, returning the path used.
    ///
    /// Parent directories are created for the global location only; the
    /// working directory is assumed to exist.
    pub fn save(&self, settings: &Settings, global: bool) -> Result<PathBuf, AppError> {
        let path = self.resolve_path(global)?;
        if global {
            ensure_parent_dir(&path)?;
        }
        self.save_to(settings, &path)?;
        Ok(path)
    }

    /// Creates an all-empty settings template at the requested location.
    ///
    /// Idempotent: an existing file is left untouched and reported with
    /// `created = false`.
    pub fn create_template(&self, global: bool) -> Result<(PathBuf, bool), AppError> {
        let path = self.resolve_path(global)?;
        if global {
            ensure_parent_dir(&path)?;
        }
        if path.is_file() {
            return Ok((path, false));
        }
        self.save_to(&Settings::default(), &path)?;
        Ok((path, true))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AppError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_settings() -> Settings {
        Settings {
            webhook_url: "https://example.com/webhook/abc123".to_string(),
            username: "TestUser".to_string(),
            avatar_url: "https://example.com/avatar.png".to_string(),
        }
    }

    /// Manager with an isolated working directory and global directory.
    fn test_manager(tmp: &TempDir) -> Manager {
        Manager::with_dirs(
            tmp.path().join("work"),
            Some(tmp.path().join("global-config")),
        )
    }

    fn write_settings(manager: &Manager, global: bool, settings: &Settings) -> PathBuf {
        manager
            .save(settings, global)
            .expect("failed to save settings fixture")
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        fs::create_dir_all(tmp.path().join("work")).unwrap();

        let settings = sample_settings();
        let path = write_settings(&manager, false, &settings);
        let loaded = manager.load_from(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);

        let err = manager
            .load_from(&tmp.path().join("nonexistent.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn load_directory_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        let dir_path = tmp.path().join("a-directory");
        fs::create_dir(&dir_path).unwrap();

        let err = manager.load_from(&dir_path).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn load_malformed_content_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        let path = tmp.path().join("invalid.json");
        fs::write(&path, "not json at all").unwrap();

        let err = manager.load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn load_tolerates_missing_and_unknown_fields() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        let path = tmp.path().join("partial.json");
        fs::write(
            &path,
            r#"{"webhook_url": "https://example.com/w", "color_scheme": "dark"}"#,
        )
        .unwrap();

        let loaded = manager.load_from(&path).unwrap();
        assert_eq!(loaded.webhook_url, "https://example.com/w");
        assert_eq!(loaded.username, "");
        assert_eq!(loaded.avatar_url, "");
    }

    #[test]
    fn resolve_global_fails_without_config_dir() {
        let tmp = TempDir::new().unwrap();
        let manager = Manager::with_dirs(tmp.path().to_path_buf(), None);

        let err = manager.resolve_path(true).unwrap_err();
        assert!(matches!(err, AppError::ConfigDirUnavailable), "got {err:?}");
    }

    #[test]
    fn create_template_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        fs::create_dir_all(tmp.path().join("work")).unwrap();

        let (first_path, created) = manager.create_template(false).unwrap();
        assert!(created);
        let content_after_first = fs::read_to_string(&first_path).unwrap();

        let (second_path, created) = manager.create_template(false).unwrap();
        assert!(!created);
        assert_eq!(first_path, second_path);
        assert_eq!(fs::read_to_string(&second_path).unwrap(), content_after_first);
    }

    #[test]
    fn template_has_all_fields_empty() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);

        let (path, created) = manager.create_template(true).unwrap();
        assert!(created);

        let loaded = manager.load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn save_global_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let manager = Manager::with_dirs(
            tmp.path().join("work"),
            Some(tmp.path().join("deeply").join("nested").join("config")),
        );

        let path = manager.save(&sample_settings(), true).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn prefer_global_fails_when_global_file_absent() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        fs::create_dir_all(tmp.path().join("work")).unwrap();
        write_settings(&manager, false, &sample_settings());

        // A local file alone must not satisfy an explicit global request.
        let err = manager.load_preferred(true).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn prefer_global_surfaces_resolution_failure_first() {
        let tmp = TempDir::new().unwrap();
        let manager = Manager::with_dirs(tmp.path().to_path_buf(), None);
        write_settings(&manager, false, &sample_settings());

        let err = manager.load_preferred(true).unwrap_err();
        assert!(matches!(err, AppError::ConfigDirUnavailable), "got {err:?}");
    }

    #[test]
    fn load_preferred_fails_when_neither_exists() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);

        let err = manager.load_preferred(false).unwrap_err();
        assert!(matches!(err, AppError::NoConfigFound { .. }), "got {err:?}");
    }

    #[test]
    fn precedence_scenario_local_then_global_fallback() {
        let tmp = TempDir::new().unwrap();
        let manager = test_manager(&tmp);
        fs::create_dir_all(tmp.path().join("work")).unwrap();

        let local_settings = Settings {
            webhook_url: "https://x/e".to_string(),
            ..Settings::default()
        };
        let global_settings = Settings {
            webhook_url: "https://x/g".to_string(),
            username: "G".to_string(),
            ..Settings::default()
        };
        let local_path = write_settings(&manager, false, &local_settings);
        let global_path = write_settings(&manager, true, &global_settings);

        // Both exist: default mode picks local, explicit global picks global.
        let (settings, path) = manager.load_preferred(false).unwrap();
        assert_eq!(path, local_path);
        assert_eq!(settings, local_settings);

        let (settings, path) = manager.load_preferred(true).unwrap();
        assert_eq!(path, global_path);
        assert_eq!(settings, global_settings);

        // Local removed: default mode falls back to global.
        fs::remove_file(&local_path).unwrap();
        let (settings, path) = manager.load_preferred(false).unwrap();
        assert_eq!(path, global_path);
        assert_eq!(settings, global_settings);
    }

    #[test]
    fn masked_webhook_url_keeps_short_suffix() {
        let settings = Settings {
            webhook_url: "https://discord.com/api/webhooks/1234567890/token".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.masked_webhook_url(), "...7890/token");
    }

    #[test]
    fn masked_webhook_url_passes_short_values_through() {
        let settings = Settings {
            webhook_url: "short".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.masked_webhook_url(), "short");
        assert_eq!(Settings::default().masked_webhook_url(), "");
    }
}

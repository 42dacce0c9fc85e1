//! # Settings Store
//!
//! Persists [`Settings`] as a JSON file:
//! - **Atomic saves**: write `settings.json.tmp`, fsync, rename over the target
//! - **Locking**: an fs2 exclusive lock on `settings.json.lock` while writing
//! - **Version check**: files from a newer schema are refused, older ones
//!   merge with the current defaults
//!
//! The location defaults to `landed/settings.json` under the platform config
//! directory (`dirs::config_dir`). `LANDED_SETTINGS` or `--settings` override it.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use landed_core::errors::{CalcError, CalcResult};
use landed_core::settings::{Settings, SCHEMA_VERSION};

/// Environment variable that overrides the settings location
pub const SETTINGS_ENV: &str = "LANDED_SETTINGS";

/// Who holds a settings lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

/// Exclusive lock on a settings file, released on drop.
///
/// The OS lock (fs2) is what excludes other writers; the JSON written into
/// the lock file only tells the user who holds it. A crashed process leaves
/// a lock file behind but no OS lock, so the next writer simply takes over.
pub struct SettingsLock {
    lock_path: PathBuf,
    _lock_file: File,
    pub info: LockInfo,
}

impl SettingsLock {
    pub fn acquire(path: &Path) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("open lock", lock_path.display().to_string(), e.to_string()))?;

        if lock_file.try_lock_exclusive().is_err() {
            let holder = read_lock_info(&mut lock_file);
            return Err(CalcError::file_locked(
                path.display().to_string(),
                holder
                    .as_ref()
                    .map(|h| format!("process {}", h.pid))
                    .unwrap_or_else(|| "another process".to_string()),
                holder
                    .map(|h| h.locked_at.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        let info = LockInfo {
            pid: std::process::id(),
            locked_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .set_len(0)
            .and_then(|_| lock_file.seek(SeekFrom::Start(0)))
            .and_then(|_| lock_file.write_all(json.as_bytes()))
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %lock_path.display(), "acquired settings lock");
        Ok(SettingsLock {
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }
}

impl Drop for SettingsLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        tracing::debug!(pid = self.info.pid, "released settings lock");
    }
}

fn read_lock_info(file: &mut File) -> Option<LockInfo> {
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

fn lock_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "lock")
}

fn tmp_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "tmp")
}

/// `settings.json` -> `settings.json.<suffix>`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Settings file location: `LANDED_SETTINGS`, else the user config dir.
pub fn default_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("landed")
        .join("settings.json")
}

/// Save settings atomically under an exclusive lock.
pub fn save_settings(settings: &Settings, path: &Path) -> CalcResult<()> {
    settings.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CalcError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
    }
    let _lock = SettingsLock::acquire(path)?;

    let json = serde_json::to_string_pretty(settings).map_err(CalcError::serialization)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), "saved settings");
    Ok(())
}

/// Load and validate a settings file.
pub fn load_settings(path: &Path) -> CalcResult<Settings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let settings: Settings = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&settings.version)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings, or the defaults when the file does not exist yet.
pub fn load_or_default(path: &Path) -> CalcResult<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }
    load_settings(path)
}

/// Accept files with the same major version and, while on 0.x, no newer
/// minor version than this build knows.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.as_slice(), current.as_slice()) {
        ([file_major, rest @ ..], [current_major, current_rest @ ..]) => {
            if file_major != current_major {
                return Err(mismatch());
            }
            if *current_major == 0 {
                if let (Some(file_minor), Some(current_minor)) = (rest.first(), current_rest.first()) {
                    if file_minor > current_minor {
                        return Err(mismatch());
                    }
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landed_core::rates::RateTable;
    use std::env::temp_dir;

    fn temp_settings_path(name: &str) -> PathBuf {
        temp_dir()
            .join(format!("landed_test_{}_{}", name, std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_suffix_paths() {
        let path = Path::new("/etc/landed/settings.json");
        assert_eq!(lock_path_for(path), Path::new("/etc/landed/settings.json.lock"));
        assert_eq!(tmp_path_for(path), Path::new("/etc/landed/settings.json.tmp"));
    }

    #[test]
    fn test_default_path_file_name() {
        let path = default_settings_path();
        if std::env::var_os(SETTINGS_ENV).is_none() {
            assert!(path.ends_with("landed/settings.json"));
            if let Some(config) = dirs::config_dir() {
                assert!(path.starts_with(config));
            }
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_settings_path("roundtrip");
        let mut settings = Settings::default();
        settings
            .update_rates(RateTable {
                docs_fee_krw: 90_000.0,
                ..RateTable::default()
            })
            .unwrap();

        save_settings(&settings, &path).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.rates.docs_fee_krw, 90_000.0);
        assert_eq!(loaded.import, settings.import);

        // No leftovers from the atomic write or the lock
        assert!(!tmp_path_for(&path).exists());
        assert!(!lock_path_for(&path).exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_settings_path("missing");
        let settings = load_or_default(&path).unwrap();
        assert_eq!(settings.rates, RateTable::default());
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_settings_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_newer_file_refused() {
        let path = temp_settings_path("newer");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "version": "0.9.0" }"#).unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, CalcError::VersionMismatch { .. }));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_lock_is_exclusive() {
        let path = temp_settings_path("lock");
        fs::create_dir_all(path.parent().unwrap()).unwrap();

        let lock = SettingsLock::acquire(&path).unwrap();
        assert_eq!(lock.info.pid, std::process::id());
        assert!(lock_path_for(&path).exists());

        drop(lock);
        assert!(!lock_path_for(&path).exists());
        assert!(SettingsLock::acquire(&path).is_ok());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.1").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}

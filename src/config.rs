use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const PLAYER_KEY: &str = "player";
pub const SOUND_FILE_KEY: &str = "sound_file";

pub const DEFAULT_PLAYER: &str = "aplay";

/// Plugin options and the value written when an option is unset or empty.
pub const DEFAULTS: &[(&str, &str)] = &[(PLAYER_KEY, DEFAULT_PLAYER), (SOUND_FILE_KEY, "")];

#[derive(Debug)]
pub enum ConfigError {
    PlayerNotSet,
    SoundFileNotSet,
    Unreadable(PathBuf),
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PlayerNotSet => write!(f, "Cannot play sound: player was not set"),
            ConfigError::SoundFileNotSet => {
                write!(f, "Cannot play sound: sound file was not set")
            }
            ConfigError::Unreadable(path) => write!(
                f,
                "Sound file ({}) does not exist or is not readable.",
                path.display()
            ),
            ConfigError::Io(path, err) => write!(f, "{}: {err}", path.display()),
            ConfigError::Parse(path, err) => {
                write!(f, "invalid config {}: {err}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key/value option storage owned by the host.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Write the default of every option that is unset or empty.
pub fn apply_defaults(store: &mut dyn ConfigStore) -> Result<(), ConfigError> {
    for (key, default) in DEFAULTS {
        let current = store.get(key);
        if current.as_deref().map_or(true, str::is_empty) {
            store.set(key, default)?;
        }
    }
    Ok(())
}

/// Player and sound file, read fresh for every playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub player: String,
    pub sound_file: PathBuf,
}

impl PlaybackConfig {
    pub fn load(store: &dyn ConfigStore) -> Result<Self, ConfigError> {
        let player = non_empty(store.get(PLAYER_KEY)).ok_or(ConfigError::PlayerNotSet)?;
        let sound_file =
            non_empty(store.get(SOUND_FILE_KEY)).ok_or(ConfigError::SoundFileNotSet)?;
        Ok(Self {
            player,
            sound_file: PathBuf::from(sound_file),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Options kept as a flat TOML table on disk.
///
/// The file is read on every `get`, so edits made while the plugin runs are
/// picked up by the next playback.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/psound/psound.toml`, or `psound.toml` when the platform
    /// has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("psound").join("psound.toml"))
            .unwrap_or_else(|| PathBuf::from("psound.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(ConfigError::Io(self.path.clone(), e)),
        };
        contents
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::Parse(self.path.clone(), e.to_string()))
    }
}

impl ConfigStore for TomlStore {
    fn get(&self, key: &str) -> Option<String> {
        let table = match self.read_table() {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable config");
                return None;
            }
        };
        match table.get(key)? {
            toml::Value::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let contents = toml::to_string(&table)
            .map_err(|e| ConfigError::Parse(self.path.clone(), e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(parent.to_path_buf(), e))?;
        }
        fs::write(&self.path, contents).map_err(|e| ConfigError::Io(self.path.clone(), e))?;
        tracing::debug!(key, value, path = %self.path.display(), "option written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::ffi::OsString;

    struct EnvGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn default_path_follows_xdg_config_home() {
        let _guard = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/psound-xdg");
        assert_eq!(
            TomlStore::default_path(),
            PathBuf::from("/tmp/psound-xdg/psound/psound.toml")
        );
    }

    #[test]
    fn defaults_fill_unset_and_empty_options() {
        let mut store = MemoryStore::new().with(PLAYER_KEY, "");
        apply_defaults(&mut store).unwrap();
        assert_eq!(store.get(PLAYER_KEY).as_deref(), Some("aplay"));
        assert_eq!(store.get(SOUND_FILE_KEY).as_deref(), Some(""));
    }

    #[test]
    fn defaults_keep_configured_values() {
        let mut store = MemoryStore::new()
            .with(PLAYER_KEY, "paplay")
            .with(SOUND_FILE_KEY, "/tmp/ding.wav");
        apply_defaults(&mut store).unwrap();
        assert_eq!(store.get(PLAYER_KEY).as_deref(), Some("paplay"));
        assert_eq!(store.get(SOUND_FILE_KEY).as_deref(), Some("/tmp/ding.wav"));
    }

    #[test]
    fn load_requires_player_then_sound_file() {
        let store = MemoryStore::new().with(SOUND_FILE_KEY, "/tmp/ding.wav");
        assert!(matches!(
            PlaybackConfig::load(&store),
            Err(ConfigError::PlayerNotSet)
        ));

        let store = MemoryStore::new().with(PLAYER_KEY, "aplay").with(SOUND_FILE_KEY, "");
        assert!(matches!(
            PlaybackConfig::load(&store),
            Err(ConfigError::SoundFileNotSet)
        ));

        let store = MemoryStore::new()
            .with(PLAYER_KEY, "aplay")
            .with(SOUND_FILE_KEY, "/tmp/ding.wav");
        let config = PlaybackConfig::load(&store).unwrap();
        assert_eq!(config.player, "aplay");
        assert_eq!(config.sound_file, PathBuf::from("/tmp/ding.wav"));
    }

    #[test]
    fn error_messages_match_user_text() {
        assert_eq!(
            ConfigError::PlayerNotSet.to_string(),
            "Cannot play sound: player was not set"
        );
        assert_eq!(
            ConfigError::Unreadable(PathBuf::from("/nope.wav")).to_string(),
            "Sound file (/nope.wav) does not exist or is not readable."
        );
    }

    #[test]
    fn toml_store_missing_file_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlStore::new(dir.path().join("absent.toml"));
        assert_eq!(store.get(PLAYER_KEY), None);
    }

    #[test]
    fn toml_store_writes_and_rereads_live_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("psound.toml");
        let mut store = TomlStore::new(&path);
        apply_defaults(&mut store).unwrap();
        assert_eq!(store.get(PLAYER_KEY).as_deref(), Some("aplay"));

        fs::write(&path, "player = \"paplay\"\nsound_file = \"/tmp/ding.oga\"\n").unwrap();
        assert_eq!(store.get(PLAYER_KEY).as_deref(), Some("paplay"));
        assert_eq!(store.get(SOUND_FILE_KEY).as_deref(), Some("/tmp/ding.oga"));
    }

    #[test]
    fn toml_store_set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psound.toml");
        fs::write(&path, "player = \"mpv\"\n").unwrap();
        let mut store = TomlStore::new(&path);
        store.set(SOUND_FILE_KEY, "/tmp/x.wav").unwrap();
        assert_eq!(store.get(PLAYER_KEY).as_deref(), Some("mpv"));
        assert_eq!(store.get(SOUND_FILE_KEY).as_deref(), Some("/tmp/x.wav"));
    }

    #[test]
    fn toml_store_rejects_garbage_on_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psound.toml");
        fs::write(&path, "this is = = not toml").unwrap();
        let mut store = TomlStore::new(&path);
        assert_eq!(store.get(PLAYER_KEY), None);
        assert!(matches!(
            store.set(PLAYER_KEY, "aplay"),
            Err(ConfigError::Parse(..))
        ));
    }
}

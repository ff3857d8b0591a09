use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Keys the run pipeline reads from the store.
pub const KEY_COMMAND: &str = "command";
pub const KEY_HOME: &str = "home";
pub const KEY_OUT_FILENAME: &str = "outFilename";
pub const KEY_MAX_LINES: &str = "maxFileLineToRead";

const DEFAULT_MAX_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    AlwaysVisible,
    OnDemand,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    pub key: String,
    pub display_name: String,
    pub default_value: String,
    pub description: String,
    pub visibility: Visibility,
    pub current_value: String,
}

impl CommandOption {
    pub fn new(
        key: &str,
        display_name: &str,
        default_value: &str,
        description: &str,
        visibility: Visibility,
    ) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            default_value: default_value.to_string(),
            description: description.to_string(),
            visibility,
            current_value: default_value.to_string(),
        }
    }
}

/// Flat list of options keyed by string. Duplicate keys are a caller error;
/// lookups return the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionStore {
    options: Vec<CommandOption>,
}

impl OptionStore {
    pub fn new(options: Vec<CommandOption>) -> Self {
        Self { options }
    }

    /// The grep schema the original tool ships with.
    pub fn defaults() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());

        Self::new(vec![
            CommandOption::new(
                "pattern",
                "Pattern",
                "",
                "The pattern to use in the grep command",
                Visibility::AlwaysVisible,
            ),
            CommandOption::new(
                "filename",
                "Filename",
                "",
                "The file/s to grep, accepts the wildcard * to select multiple files",
                Visibility::AlwaysVisible,
            ),
            CommandOption::new(
                "additionalOption",
                "Additional option",
                "",
                "Grep additional option",
                Visibility::OnDemand,
            ),
            CommandOption::new(
                KEY_COMMAND,
                "Command",
                "grep \"${pattern}\" ${additionalOption} ${filename} ",
                "",
                Visibility::OnDemand,
            ),
            CommandOption::new(KEY_HOME, "Home", &home, "", Visibility::OnDemand),
            CommandOption::new(
                KEY_OUT_FILENAME,
                "Output file",
                "grepui.out",
                "",
                Visibility::OnDemand,
            ),
            CommandOption::new(
                KEY_MAX_LINES,
                "Max line",
                "5000",
                "Maximum number of lines to read from output",
                Visibility::OnDemand,
            ),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Current value lookup used by the template resolver.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(|o| o.current_value.as_str())
    }

    /// Returns false when the key is unknown.
    pub fn set_current_value(&mut self, key: &str, value: &str) -> bool {
        match self.options.iter_mut().find(|o| o.key == key) {
            Some(option) => {
                option.current_value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandOption> {
        self.options.iter()
    }

    /// `maxFileLineToRead` parsed as a line cap, falling back to the default
    /// on a missing or malformed value.
    pub fn max_lines(&self) -> usize {
        match self.value(KEY_MAX_LINES).map(str::parse) {
            Some(Ok(n)) => n,
            _ => {
                warn!(
                    "{} is missing or not a number, using {}",
                    KEY_MAX_LINES, DEFAULT_MAX_LINES
                );
                DEFAULT_MAX_LINES
            }
        }
    }

    /// Capture file location: `home` joined with `outFilename`.
    pub fn output_path(&self) -> PathBuf {
        let mut path = PathBuf::from(self.value(KEY_HOME).unwrap_or("."));
        path.push(self.value(KEY_OUT_FILENAME).unwrap_or("grepui.out"));
        path
    }

    /// Get the options file path (~/.config/grepui/options.yaml)
    pub fn config_path() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push(".config");
            path.push("grepui");
            path.push("options.yaml");
            Some(path)
        } else {
            None
        }
    }

    /// Load the store from file, or build the defaults if not present.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match serde_yaml::from_str(&content) {
                        Ok(store) => {
                            info!("Loaded options from {:?}", path);
                            return store;
                        }
                        Err(e) => {
                            warn!("Failed to parse options file: {}", e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read options file: {}", e);
                    }
                }
            } else {
                info!("Options file not found at {:?}, using defaults", path);
            }
        }

        Self::defaults()
    }

    /// Save the store to file
    pub fn save(&self) -> Result<(), String> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create options directory: {}", e))?;
            }

            let yaml = serde_yaml::to_string(self)
                .map_err(|e| format!("Failed to serialize options: {}", e))?;

            fs::write(&path, yaml).map_err(|e| format!("Failed to write options file: {}", e))?;

            info!("Saved options to {:?}", path);
            Ok(())
        } else {
            Err("Could not determine options path".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_option_starts_at_default() {
        let option = CommandOption::new("pattern", "Pattern", "ERROR", "", Visibility::AlwaysVisible);
        assert_eq!(option.current_value, "ERROR");
        assert_eq!(option.default_value, "ERROR");
    }

    #[test]
    fn test_get_and_set_current_value() {
        let mut store = OptionStore::defaults();

        assert!(store.set_current_value("pattern", "WARN"));
        assert_eq!(store.value("pattern"), Some("WARN"));

        // Unknown keys are reported, not inserted
        assert!(!store.set_current_value("no-such-key", "x"));
        assert!(store.get("no-such-key").is_none());
    }

    #[test]
    fn test_defaults_carry_grep_schema() {
        let store = OptionStore::defaults();

        assert_eq!(
            store.value(KEY_COMMAND),
            Some("grep \"${pattern}\" ${additionalOption} ${filename} ")
        );
        assert_eq!(store.value(KEY_OUT_FILENAME), Some("grepui.out"));
        assert_eq!(store.max_lines(), 5000);
    }

    #[test]
    fn test_max_lines_falls_back_on_garbage() {
        let mut store = OptionStore::defaults();
        store.set_current_value(KEY_MAX_LINES, "not-a-number");
        assert_eq!(store.max_lines(), 5000);

        store.set_current_value(KEY_MAX_LINES, "25");
        assert_eq!(store.max_lines(), 25);
    }

    #[test]
    fn test_output_path_joins_home_and_filename() {
        let mut store = OptionStore::defaults();
        store.set_current_value(KEY_HOME, "/tmp/logs");
        store.set_current_value(KEY_OUT_FILENAME, "run.out");
        assert_eq!(store.output_path(), PathBuf::from("/tmp/logs/run.out"));
    }

    #[test]
    fn test_store_roundtrips_through_yaml() {
        let mut store = OptionStore::defaults();
        store.set_current_value("pattern", "timeout");

        let yaml = serde_yaml::to_string(&store).unwrap();
        let restored: OptionStore = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored.value("pattern"), Some("timeout"));
    }
}

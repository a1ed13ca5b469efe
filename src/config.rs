use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

/// Flags accepted both on the command line and in the config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub theme: Option<ThemeMode>,
    pub manifest: Option<String>,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self` (later sources win for options).
    pub fn union(&self, other: &Self) -> Self {
        Self {
            theme: other.theme.or(self.theme),
            manifest: other.manifest.clone().or_else(|| self.manifest.clone()),
            perf: self.perf || other.perf,
            debug_log: other
                .debug_log
                .clone()
                .or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("blogless").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("blogless")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("blogless").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("blogless")
                .join("config");
        }
    }

    PathBuf::from(".bloglessrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".bloglessrc")
}

/// Load flags from a config file; a missing file is an empty config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Save flags as defaults.
///
/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# blogless defaults (saved with --save)".to_string());
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme_token(theme)));
    }
    if let Some(manifest) = &flags.manifest {
        lines.push(format!("--manifest {manifest}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Clear saved defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Persist only the theme choice, keeping other saved flags intact.
/// Backs the runtime theme toggle.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
pub fn save_theme_pref(path: &Path, theme: ThemeMode) -> Result<()> {
    let mut flags = load_config_flags(path)?;
    flags.theme = Some(theme);
    save_config_flags(path, &flags)
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--perf" {
            flags.perf = true;
        } else if token == "--theme" {
            if let Some(next) = tokens.get(i + 1) {
                flags.theme = parse_theme(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--theme=") {
            flags.theme = parse_theme(value);
        } else if token == "--manifest" {
            if let Some(next) = tokens.get(i + 1) {
                flags.manifest = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--manifest=") {
            flags.manifest = Some(value.to_string());
        } else if token == "--debug-log" {
            if let Some(next) = tokens.get(i + 1) {
                flags.debug_log = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--debug-log=") {
            flags.debug_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

const fn theme_token(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Auto => "auto",
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "blogless".to_string(),
            "https://blog.example.net".to_string(),
            "--theme".to_string(),
            "dark".to_string(),
            "--manifest=assets/index.json".to_string(),
            "--perf".to_string(),
            "--debug-log=render.log".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(flags.manifest.as_deref(), Some("assets/index.json"));
        assert!(flags.perf);
        assert_eq!(flags.debug_log, Some(PathBuf::from("render.log")));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            theme: Some(ThemeMode::Light),
            manifest: Some("assets/posts.json".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            perf: true,
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert_eq!(merged.manifest.as_deref(), Some("assets/posts.json"));
        assert!(merged.perf);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".bloglessrc");
        let flags = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            manifest: Some("assets/index.json".to_string()),
            perf: true,
            debug_log: Some(PathBuf::from("render.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_theme_pref_keeps_other_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        save_config_flags(
            &path,
            &ConfigFlags {
                manifest: Some("assets/posts.json".to_string()),
                ..ConfigFlags::default()
            },
        )
        .unwrap();

        save_theme_pref(&path, ThemeMode::Light).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded.theme, Some(ThemeMode::Light));
        assert_eq!(loaded.manifest.as_deref(), Some("assets/posts.json"));
    }
}

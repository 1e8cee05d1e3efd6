use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be persisted as defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub output: Option<PathBuf>,
    pub fields: Vec<String>,
    pub log_file: Option<PathBuf>,
    pub no_mouse: bool,
}

impl ConfigFlags {
    /// Merge `other` over `self`: booleans are or-ed, valued options from
    /// `other` win, and a non-empty field list in `other` replaces ours.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            output: other.output.clone().or_else(|| self.output.clone()),
            fields: if other.fields.is_empty() {
                self.fields.clone()
            } else {
                other.fields.clone()
            },
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            no_mouse: self.no_mouse || other.no_mouse,
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("recedit").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("recedit")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("recedit").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("recedit")
                .join("config");
        }
    }

    PathBuf::from(".receditrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".receditrc")
}

/// Load saved flags. A missing file yields the defaults.
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
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

// One flag per line; the value is the rest of the line so field names may
// contain spaces.
fn line_tokens(line: &str) -> Vec<String> {
    if let Some((flag, _)) = line.split_once('=')
        && !flag.contains(char::is_whitespace)
    {
        return vec![line.to_owned()];
    }
    match line.split_once(char::is_whitespace) {
        Some((flag, value)) => vec![flag.to_owned(), value.trim().to_owned()],
        None => vec![line.to_owned()],
    }
}

/// Write flags as one `--flag value` line each.
///
/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# recedit defaults (saved with --save)".to_string());
    if let Some(output) = &flags.output {
        lines.push(format!("--output {}", output.display()));
    }
    for field in &flags.fields {
        lines.push(format!("--field {field}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if flags.no_mouse {
        lines.push("--no-mouse".to_string());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved flags.
///
/// # Errors
///
/// Returns an error if the file exists and cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw argument tokens, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--no-mouse" {
            flags.no_mouse = true;
        } else if token == "--output" || token == "-o" {
            if let Some(next) = tokens.get(i + 1) {
                flags.output = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--output=") {
            flags.output = Some(PathBuf::from(value));
        } else if token == "--field" || token == "-f" {
            if let Some(next) = tokens.get(i + 1) {
                flags.fields.push(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--field=") {
            flags.fields.push(value.to_owned());
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

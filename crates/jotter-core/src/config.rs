use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, info, trace, warn};

pub const DEFAULT_TITLE: &str = "Today's To-Do";
pub const DEFAULT_EMPTY_MESSAGE: &str = "Nothing to do... maybe put on some jazz?";

/// Settings read from a jotterrc file and `--rc` overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub color: bool,
    pub seed: bool,
    pub title: String,
    pub empty_message: String,
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: true,
            seed: true,
            title: DEFAULT_TITLE.to_string(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            source: None,
        }
    }
}

impl Config {
    #[tracing::instrument(skip(rc_override))]
    pub fn load(rc_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config::default();

        let Some(path) = resolve_rc_path(rc_override) else {
            debug!("no jotterrc found; using defaults");
            return Ok(cfg);
        };

        info!(rc = %path.display(), "loading jotterrc");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        cfg.apply_text(&text)
            .with_context(|| format!("in {}", path.display()))?;
        cfg.source = Some(path);
        Ok(cfg)
    }

    /// Applies `key = value` lines. `#` starts a comment.
    pub fn apply_text(&mut self, text: &str) -> anyhow::Result<()> {
        for (line_num, raw_line) in text.lines().enumerate() {
            let line = raw_line
                .split_once('#')
                .map_or(raw_line, |(before, _)| before)
                .trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid config line {}: {}", line_num + 1, raw_line))?;
            self.set(key.trim(), value.trim())
                .with_context(|| format!("config line {}", line_num + 1))?;
        }
        Ok(())
    }

    /// Applies `--rc` overrides on top of whatever the file set. A leading
    /// `rc.` on the key is accepted.
    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in overrides {
            let key = key.strip_prefix("rc.").unwrap_or(&key);
            debug!(key, value = %value, "applying override");
            self.set(key, &value)
                .with_context(|| format!("invalid override {key}={value}"))?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        trace!(key, value, "config key");
        match key {
            "color" => self.color = parse_switch(value)?,
            "seed" => self.seed = parse_switch(value)?,
            "title" => self.title = value.to_string(),
            "empty.message" => self.empty_message = value.to_string(),
            other => warn!(key = other, "unknown config key ignored"),
        }
        Ok(())
    }
}

fn resolve_rc_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }

    if let Ok(rc_env) = std::env::var("JOTTERRC") {
        if rc_env == "/dev/null" {
            return None;
        }
        return Some(PathBuf::from(rc_env));
    }

    let Some(home) = dirs::home_dir() else {
        warn!("cannot determine home directory; skipping jotterrc");
        return None;
    };
    let candidate = home.join(".jotterrc");
    candidate.exists().then_some(candidate)
}

fn parse_switch(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "on" | "true" => Ok(true),
        "0" | "n" | "no" | "off" | "false" => Ok(false),
        other => Err(anyhow!("expected on/off, got: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{Config, DEFAULT_EMPTY_MESSAGE};

    #[test]
    fn defaults_without_rc_file() {
        let cfg = Config::default();
        assert!(cfg.seed);
        assert!(cfg.color);
        assert_eq!(cfg.empty_message, DEFAULT_EMPTY_MESSAGE);
        assert_eq!(cfg.source, None);
    }

    #[test]
    fn rc_file_with_comments() {
        let dir = tempdir().expect("tempdir");
        let rc = dir.path().join("jotterrc");
        fs::write(
            &rc,
            "# jotter settings\n\
             seed = off   # start empty\n\
             color=no\n\
             empty.message = All clear\n\
             \n\
             theme = dark\n",
        )
        .expect("write rc");

        let cfg = Config::load(Some(rc.as_path())).expect("load rc");
        assert!(!cfg.seed);
        assert!(!cfg.color);
        assert_eq!(cfg.empty_message, "All clear");
        assert_eq!(cfg.source.as_deref(), Some(rc.as_path()));
    }

    #[test]
    fn include_lines_are_rejected_not_followed() {
        let dir = tempdir().expect("tempdir");
        let sub = dir.path().join("x");
        fs::create_dir(&sub).expect("mkdir");
        let rc = sub.join("jotterrc");
        fs::write(&rc, "seed = off\ninclude ../x/jotterrc\n").expect("write rc");

        let err = Config::load(Some(rc.as_path())).expect_err("include is not a setting");
        assert!(format!("{err:#}").contains("invalid config line 2"));
    }

    #[test]
    fn bad_switch_value_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let rc = dir.path().join("jotterrc");
        fs::write(&rc, "color = sometimes\n").expect("write rc");

        let err = Config::load(Some(rc.as_path())).expect_err("not a switch");
        assert!(format!("{err:#}").contains("expected on/off"));
    }

    #[test]
    fn missing_rc_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let rc = dir.path().join("absent");
        assert!(Config::load(Some(rc.as_path())).is_err());
    }

    #[test]
    fn overrides_strip_rc_prefix() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vec![
            ("rc.title".to_string(), "Chores".to_string()),
            ("seed".to_string(), "0".to_string()),
        ])
        .expect("valid overrides");
        assert_eq!(cfg.title, "Chores");
        assert!(!cfg.seed);

        assert!(
            cfg.apply_overrides(vec![("color".to_string(), "maybe".to_string())])
                .is_err()
        );
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use config::{Config, File};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use super::error::SetsumeiError;

/// Default ban pattern: flag plans that sort through a temporary file
pub const DEFAULT_BAN_PATTERN: &str = r"\bfilesort\b";

/// Config file looked up in the working directory when `--config` is absent
pub const LOCAL_CONFIG_FILE: &str = "setsumei.toml";

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl ColorMode {
    /// `is_terminal` describes the output destination
    pub const fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Auto => is_terminal,
            Self::Never => false,
        }
    }
}

/// Exact replacement for one placeholder, addressed by (entry row, placeholder column)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecialOverride {
    pub row: usize,
    pub column: usize,
    pub value: String,
}

impl FromStr for SpecialOverride {
    type Err = SetsumeiError;

    /// Parses `ROW,COL,VAL`. Everything after the second comma is the value, kept verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            SetsumeiError::InvalidArgument(format!(
                "special replacement must look like ROW,COL,VAL: {s:?}"
            ))
        };

        let mut parts = s.splitn(3, ',');
        let (Some(row), Some(column), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if value.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            row: parse_index(row).ok_or_else(invalid)?,
            column: parse_index(column).ok_or_else(invalid)?,
            value: value.to_string(),
        })
    }
}

fn parse_index(raw: &str) -> Option<usize> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The pattern runs over the whole multi-line table, so `^` and `$` match at
/// every line.
pub fn compile_ban(pattern: &str) -> Result<Regex, SetsumeiError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|e| SetsumeiError::InvalidArgument(format!("invalid ban pattern {pattern:?}: {e}")))
}

/// Replacement values and output toggles shared by the resolver and the formatter.
///
/// Built once at startup (defaults, then config file, then CLI flags) and
/// only read afterwards. Values left as `None` derive from `number` or
/// `string`; see the `effective_*` accessors.
#[derive(Debug, Clone)]
pub struct ExplainConfig {
    pub number: i64,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub upper_bound: Option<i64>,
    pub lower_bound: Option<i64>,
    pub string: String,
    pub like: Option<String>,
    pub output_queries: bool,
    pub compact: bool,
    pub color: ColorMode,
    pub ban: Regex,
    specials: HashMap<(usize, usize), String>,
}

impl ExplainConfig {
    pub fn new() -> Self {
        Self {
            number: 1,
            limit: None,
            offset: None,
            upper_bound: None,
            lower_bound: None,
            string: "a%a".to_string(),
            like: None,
            output_queries: false,
            compact: false,
            color: ColorMode::Auto,
            ban: compile_ban(DEFAULT_BAN_PATTERN).expect("default ban pattern is valid"),
            specials: HashMap::new(),
        }
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(self.number)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(self.number)
    }

    pub fn effective_upper_bound(&self) -> i64 {
        self.upper_bound
            .unwrap_or_else(|| self.number.saturating_add(500))
    }

    pub fn effective_lower_bound(&self) -> i64 {
        self.lower_bound.unwrap_or(self.number)
    }

    pub fn effective_like(&self) -> &str {
        self.like.as_deref().unwrap_or(&self.string)
    }

    /// Later overrides for the same cell replace earlier ones
    pub fn add_special(&mut self, special: SpecialOverride) {
        self.specials
            .insert((special.row, special.column), special.value);
    }

    pub fn special(&self, row: usize, column: usize) -> Option<&str> {
        self.specials.get(&(row, column)).map(String::as_str)
    }

    pub fn specials_len(&self) -> usize {
        self.specials.len()
    }

    /// Layer values from a config file over the current ones
    pub fn apply_file(&mut self, file: FileConfig) -> Result<(), SetsumeiError> {
        if let Some(n) = file.number {
            self.number = n;
        }
        if file.limit.is_some() {
            self.limit = file.limit;
        }
        if file.offset.is_some() {
            self.offset = file.offset;
        }
        if file.upper_bound.is_some() {
            self.upper_bound = file.upper_bound;
        }
        if file.lower_bound.is_some() {
            self.lower_bound = file.lower_bound;
        }
        if let Some(s) = file.string {
            self.string = s;
        }
        if file.like.is_some() {
            self.like = file.like;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        if let Some(pattern) = file.ban {
            self.ban = compile_ban(&pattern)?;
        }
        if let Some(b) = file.output_queries {
            self.output_queries = b;
        }
        if let Some(b) = file.compact {
            self.compact = b;
        }
        for special in file.specials {
            self.add_special(special);
        }
        Ok(())
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk configuration; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub number: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub upper_bound: Option<i64>,
    pub lower_bound: Option<i64>,
    pub string: Option<String>,
    pub like: Option<String>,
    pub color: Option<ColorMode>,
    pub ban: Option<String>,
    pub output_queries: Option<bool>,
    pub compact: Option<bool>,
    pub specials: Vec<SpecialOverride>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SetsumeiError> {
        let settings = Config::builder().add_source(File::from(path)).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Config file lookup: explicit path, then `./setsumei.toml`,
    /// then `<config dir>/setsumei/setsumei.toml`
    pub fn discover(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|mut p| {
                p.push("setsumei");
                p.push(LOCAL_CONFIG_FILE);
                p
            })
            .filter(|p| p.is_file())
    }
}

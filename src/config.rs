use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::color::Rgb;
use crate::detect::MatcherKind;
use crate::error::{Error, Result};
use crate::layout::{LineBreakMode, TextAlignment};

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub window: WindowConfig,
    pub label: LabelConfig,
    pub colors: ColorConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub size: f32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub text: String,
    pub alignment: String,
    pub line_break: String,
    pub max_lines: usize,
    /// `linkify` also accepts bare domains; `scheme` only explicit http(s).
    pub matcher: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub background: String,
    pub foreground: String,
    pub link: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 18.0,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 240,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: "Read the docs at docs.rs or the book at https://doc.rust-lang.org/book/ \
                   and come back to example.com when done."
                .to_string(),
            alignment: "center".to_string(),
            line_break: "word".to_string(),
            max_lines: 0,
            matcher: "linkify".to_string(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(),
            foreground: "#cdd6f4".to_string(),
            link: "#89b4fa".to_string(),
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when it is missing.
    /// A file that exists but does not parse, or names an unknown alignment,
    /// line break mode or matcher, is an error.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let cfg = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(content)?;
        cfg.alignment()?;
        cfg.line_break()?;
        cfg.matcher()?;
        Ok(cfg)
    }

    pub fn alignment(&self) -> Result<TextAlignment> {
        self.label.alignment.parse()
    }

    pub fn line_break(&self) -> Result<LineBreakMode> {
        self.label.line_break.parse()
    }

    pub fn matcher(&self) -> Result<MatcherKind> {
        self.label.matcher.parse()
    }

    pub fn background(&self) -> Rgb {
        Rgb::parse_hex(&self.colors.background).unwrap_or(crate::color::DEFAULT_BG)
    }

    pub fn foreground(&self) -> Rgb {
        Rgb::parse_hex(&self.colors.foreground).unwrap_or(crate::color::DEFAULT_FG)
    }

    pub fn link_color(&self) -> Rgb {
        Rgb::parse_hex(&self.colors.link).unwrap_or(crate::color::DEFAULT_LINK)
    }
}

fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("LINKLABEL_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("linklabel")
        .join("config.toml")
}

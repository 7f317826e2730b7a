use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::layout::FontMetrics;

const SYSTEM_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loads the label font: the configured path if given, otherwise the first
/// usable system sans-serif font.
pub fn load_label_font(configured: Option<&Path>) -> Result<(Font, PathBuf)> {
    if let Some(path) = configured {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| Error::FontLoad(format!("{}: {e}", path.display())))?;
        return Ok((font, path.to_path_buf()));
    }

    for p in SYSTEM_CANDIDATES {
        let path = Path::new(p);
        if !path.exists() {
            continue;
        }
        match fs::read(path) {
            Ok(bytes) => match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    info!(path = %path.display(), "using font");
                    return Ok((font, path.to_path_buf()));
                }
                Err(e) => debug!(path = %path.display(), error = e, "font rejected"),
            },
            Err(e) => debug!(path = %path.display(), error = %e, "font unreadable"),
        }
    }

    Err(Error::FontLoad(
        "no system font found; set font.path in the config file".to_string(),
    ))
}

/// A fontdue font at a fixed pixel size.
#[derive(Clone)]
pub struct ScaledFont {
    pub font: Font,
    pub px: f32,
    ascent: f32,
    line_height: f32,
}

impl ScaledFont {
    pub fn new(font: Font, px: f32) -> Self {
        let (ascent, line_height) = match font.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.new_line_size),
            None => (px, px * 1.2),
        };
        Self {
            font,
            px,
            ascent: ascent.ceil(),
            line_height: line_height.ceil().max(1.0),
        }
    }
}

impl std::fmt::Debug for ScaledFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledFont")
            .field("px", &self.px)
            .field("line_height", &self.line_height)
            .finish_non_exhaustive()
    }
}

impl FontMetrics for ScaledFont {
    fn advance(&self, ch: char) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        self.font.metrics(ch, self.px).advance_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }
}

use anyhow::{anyhow, Context, Result};
use rusttype::{Font, Scale};
use std::fs;
use std::path::Path;

pub(crate) struct FontConfig {
    pub font: Font<'static>,
    pub scale: Scale,
}

/// Font set used by one dashboard snapshot.
pub struct Fonts {
    font: Font<'static>,
}

impl Fonts {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).context(format!("Failed to read font {}", path.display()))?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| anyhow!("{} is not a usable TrueType font", path.display()))?;
        Ok(Self { font })
    }

    pub(crate) fn title(&self) -> FontConfig {
        self.get_font_config(20.0)
    }

    pub(crate) fn regular(&self) -> FontConfig {
        self.get_font_config(16.0)
    }

    pub(crate) fn small(&self) -> FontConfig {
        self.get_font_config(13.0)
    }

    fn get_font_config(&self, scale: f32) -> FontConfig {
        FontConfig {
            font: self.font.clone(),
            scale: Scale::uniform(scale),
        }
    }
}

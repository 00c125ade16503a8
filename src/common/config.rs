//! 描画設定（TOML ファイルから読み込み可能）

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::colors::{Binary, Color, Palette, PaletteColoring};
use super::constants::{DEFAULT_IMAGE_HEIGHT, MAX_ITER};
use super::error::ConfigError;
use super::escape::Fractal;
use super::render::RenderRequest;
use super::viewport::{GridSize, Viewport};
use super::worker::SharedColoring;

/// 色付け方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ColoringMode {
    /// 白黒2値
    Binary,
    /// パレット補間
    #[default]
    Palette,
}

impl fmt::Display for ColoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColoringMode::Binary => write!(f, "binary"),
            ColoringMode::Palette => write!(f, "palette"),
        }
    }
}

/// パレット指定: 組み込みの名前か、色の列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Named(String),
    Anchors(Vec<Color>),
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::Named("rainbow".to_string())
    }
}

impl PaletteSpec {
    pub fn build(&self) -> Result<Palette, ConfigError> {
        match self {
            PaletteSpec::Named(name) => Palette::by_name(name),
            PaletteSpec::Anchors(anchors) => Palette::new(anchors.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringConfig {
    pub mode: ColoringMode,
    /// true なら発散した点を黒、発散しなかった点を白で塗る（白黒2値のみ）
    pub escape_is_black: bool,
    pub palette: PaletteSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// 省略時は高さと表示領域の縦横比から決める
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

/// 起動時に1度だけ作り、描画要求と色付け方式の組み立てに使う
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_iter: u32,
    pub image: ImageConfig,
    pub viewport: Viewport,
    pub fractal: Fractal,
    pub coloring: ColoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iter: MAX_ITER,
            image: ImageConfig::default(),
            viewport: Viewport::default(),
            fractal: Fractal::default(),
            coloring: ColoringConfig::default(),
        }
    }
}

impl Config {
    /// 設定ファイルを読み込む。書かれていない項目は既定値
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn grid(&self) -> Result<GridSize, ConfigError> {
        self.viewport.validate()?;
        match self.image.width {
            Some(width) => GridSize::new(width, self.image.height),
            None => GridSize::fit_height(self.image.height, &self.viewport),
        }
    }

    pub fn render_request(&self) -> Result<RenderRequest, ConfigError> {
        let request = RenderRequest::new(self.grid()?, self.viewport, self.max_iter)?
            .with_fractal(self.fractal);
        request.validate()?;
        Ok(request)
    }

    pub fn coloring(&self) -> Result<SharedColoring, ConfigError> {
        let coloring: SharedColoring = match self.coloring.mode {
            ColoringMode::Binary => Arc::new(Binary::new(self.coloring.escape_is_black)),
            ColoringMode::Palette => Arc::new(PaletteColoring::new(self.coloring.palette.build()?)),
        };
        Ok(coloring)
    }
}

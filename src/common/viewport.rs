//! 表示領域とピクセル座標 → 複素平面座標の変換

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_ORIGIN_X, DEFAULT_ORIGIN_Y, DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
use super::error::ConfigError;

/// 出力画像のピクセル数（幅 × 高さ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        let grid = Self { width, height };
        grid.validate()?;
        Ok(grid)
    }

    /// 高さと表示領域の縦横比から幅を決める
    pub fn fit_height(height: u32, viewport: &Viewport) -> Result<Self, ConfigError> {
        let width = (height as f64 * viewport.width / viewport.height).round();
        Self::new(width.min(u32::MAX as f64) as u32, height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// 複素平面上の矩形領域
///
/// 描画1回分の入力として扱う不変の値。パン・ズームでは新しい値を作って
/// 次の描画要求に渡す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin_x: DEFAULT_ORIGIN_X,
            origin_y: DEFAULT_ORIGIN_Y,
            width: DEFAULT_VIEW_WIDTH,
            height: DEFAULT_VIEW_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Result<Self, ConfigError> {
        let viewport = Self {
            origin_x,
            origin_y,
            width,
            height,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// 中心座標と幅・高さから領域を作る
    pub fn centered(center: Complex<f64>, width: f64, height: f64) -> Result<Self, ConfigError> {
        Self::new(center.re - width / 2.0, center.im - height / 2.0, width, height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.origin_x.is_finite() && self.origin_y.is_finite()) {
            return Err(ConfigError::NonFiniteOrigin {
                x: self.origin_x,
                y: self.origin_y,
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.width) && positive(self.height)) {
            return Err(ConfigError::DegenerateViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            self.origin_x + self.width / 2.0,
            self.origin_y + self.height / 2.0,
        )
    }

    /// 基準幅に対する拡大率
    pub fn zoom_level(&self, reference_width: f64) -> f64 {
        reference_width / self.width
    }

    /// 画面上の（小数を含む）ピクセル位置を複素平面上の座標に変換
    pub fn point_at(&self, px: f64, py: f64, grid: GridSize) -> Complex<f64> {
        let x = (px / grid.width as f64) * self.width + self.origin_x;
        let y = (py / grid.height as f64) * self.height + self.origin_y;
        Complex::new(x, y)
    }

    /// 指定ピクセルを中心に、幅・高さを `factor` 倍した新しい領域を返す
    pub fn zoomed_at(
        &self,
        px: f64,
        py: f64,
        grid: GridSize,
        factor: f64,
    ) -> Result<Self, ConfigError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::InvalidZoom(factor));
        }
        let center = self.point_at(px, py, grid);
        Self::centered(center, self.width * factor, self.height * factor)
    }

    /// 中心を保ったまま拡大・縮小
    pub fn zoomed(&self, factor: f64) -> Result<Self, ConfigError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::InvalidZoom(factor));
        }
        Self::centered(self.center(), self.width * factor, self.height * factor)
    }

    /// クリック位置を中心に移動（倍率は変えない）
    pub fn panned_to(&self, px: f64, py: f64, grid: GridSize) -> Result<Self, ConfigError> {
        self.zoomed_at(px, py, grid, 1.0)
    }
}

/// ピクセル (px, py) に対応する複素数を返す
#[inline]
pub fn map_pixel(px: u32, py: u32, grid: GridSize, viewport: &Viewport) -> Complex<f64> {
    viewport.point_at(px as f64, py as f64, grid)
}

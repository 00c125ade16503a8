//! 描画パス: 全ピクセルを行優先で計算して画像バッファに書き込む

use std::ops::ControlFlow;

use image::RgbImage;
use log::{debug, trace};

use super::colors::Coloring;
use super::error::{ConfigError, RenderError};
use super::escape::Fractal;
use super::viewport::{map_pixel, GridSize, Viewport};

/// 描画1回分の入力
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub grid: GridSize,
    pub viewport: Viewport,
    pub max_iter: u32,
    pub fractal: Fractal,
}

impl RenderRequest {
    pub fn new(grid: GridSize, viewport: Viewport, max_iter: u32) -> Result<Self, ConfigError> {
        let request = Self {
            grid,
            viewport,
            max_iter,
            fractal: Fractal::Mandelbrot,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_fractal(self, fractal: Fractal) -> Self {
        Self { fractal, ..self }
    }

    /// 計算を始める前にすべての入力を検査する
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.viewport.validate()?;
        self.fractal.validate()?;
        if self.max_iter == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

/// 1行描き終わるごとに通知される進捗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub rows_done: u32,
    pub rows_total: u32,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        self.rows_done as f64 / self.rows_total as f64
    }
}

/// 画像全体を描画する
pub fn render<C>(request: &RenderRequest, coloring: &C) -> Result<RgbImage, RenderError>
where
    C: Coloring + ?Sized,
{
    render_with_progress(request, coloring, |_| ControlFlow::Continue(()))
}

/// 画像全体を描画し、1行ごとに `on_row` を呼ぶ
///
/// `on_row` が `ControlFlow::Break` を返すと描画を中断し、
/// 途中までのバッファは捨てて `RenderError::Cancelled` を返す。
pub fn render_with_progress<C, F>(
    request: &RenderRequest,
    coloring: &C,
    mut on_row: F,
) -> Result<RgbImage, RenderError>
where
    C: Coloring + ?Sized,
    F: FnMut(Progress) -> ControlFlow<()>,
{
    request.validate()?;

    let RenderRequest {
        grid,
        viewport,
        max_iter,
        fractal,
    } = *request;
    debug!(
        "描画開始: {}x{} {} 領域=({}, {}) {}x{} max_iter={}",
        grid.width,
        grid.height,
        fractal,
        viewport.origin_x,
        viewport.origin_y,
        viewport.width,
        viewport.height,
        max_iter
    );

    let mut image = RgbImage::new(grid.width, grid.height);

    for py in 0..grid.height {
        for px in 0..grid.width {
            let c = map_pixel(px, py, grid, &viewport);
            let iter = fractal.escape_time(c, max_iter).iterations(max_iter);
            image.put_pixel(px, py, coloring.color(iter, max_iter).into());
        }

        let progress = Progress {
            rows_done: py + 1,
            rows_total: grid.height,
        };
        trace!("行 {} / {} 完了", progress.rows_done, progress.rows_total);
        if on_row(progress).is_break() {
            debug!("描画中断: {} / {} 行", progress.rows_done, progress.rows_total);
            return Err(RenderError::Cancelled);
        }
    }

    debug!("描画完了: {} ピクセル", grid.pixel_count());
    Ok(image)
}

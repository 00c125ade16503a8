//! エスケープタイム法による発散判定

use std::fmt;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::constants::ESCAPE_RADIUS_SQR;
use super::error::ConfigError;

/// 反復の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// i 回目（0始まり）の更新で |z| > 2 になった
    Escaped(u32),
    /// 上限まで発散しなかった（集合に属するとみなす）
    Bounded,
}

impl Escape {
    /// 反復回数。発散しなかった場合は `max_iter`
    pub fn iterations(self, max_iter: u32) -> u32 {
        match self {
            Escape::Escaped(i) => i,
            Escape::Bounded => max_iter,
        }
    }

    pub fn escaped(self) -> bool {
        matches!(self, Escape::Escaped(_))
    }
}

/// z <- z^2 + c を最大 `max_iter` 回繰り返し、発散した時点で打ち切る
#[inline]
pub fn escape_time(z0: Complex<f64>, c: Complex<f64>, max_iter: u32) -> Escape {
    let mut z = z0;

    for i in 0..max_iter {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQR {
            return Escape::Escaped(i);
        }
    }
    Escape::Bounded
}

/// マンデルブロ集合の反復回数を計算
pub fn iterate(x: f64, y: f64, max_iter: u32) -> u32 {
    Fractal::Mandelbrot
        .escape_time(Complex::new(x, y), max_iter)
        .iterations(max_iter)
}

/// 上限以内に発散するかどうかだけを返す
pub fn escapes(x: f64, y: f64, max_iter: u32) -> bool {
    Fractal::Mandelbrot
        .escape_time(Complex::new(x, y), max_iter)
        .escaped()
}

/// 描画するフラクタルの種類
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fractal {
    /// z0 = 0, c = 画素の座標
    #[default]
    Mandelbrot,
    /// z0 = 画素の座標, c = 固定値
    Julia { re: f64, im: f64 },
}

impl Fractal {
    pub fn escape_time(&self, point: Complex<f64>, max_iter: u32) -> Escape {
        match *self {
            Fractal::Mandelbrot => escape_time(Complex::new(0.0, 0.0), point, max_iter),
            Fractal::Julia { re, im } => escape_time(point, Complex::new(re, im), max_iter),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Fractal::Julia { re, im } if !(re.is_finite() && im.is_finite()) => {
                Err(ConfigError::NonFiniteJuliaConstant { re, im })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fractal::Mandelbrot => write!(f, "マンデルブロ"),
            Fractal::Julia { re, im } => write!(f, "ジュリア (c = {} {:+}i)", re, im),
        }
    }
}

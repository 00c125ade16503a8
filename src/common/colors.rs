//! カラーマップと色変換関数

use image::{Rgb, Rgba};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// RGB 色（各チャンネル 0-255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 0.0-1.0 の実数表現から変換
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Self {
        Rgb([c.r, c.g, c.b])
    }
}

/// 不透明度は常に 255
impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, 255])
    }
}

/// 反復回数から色を決める方式
pub trait Coloring {
    fn color(&self, iter: u32, max_iter: u32) -> Color;
}

/// 白黒2値
///
/// 既定では発散しなかった点が黒、発散した点が白。
/// `escape_is_black` で反転する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binary {
    pub escape_is_black: bool,
}

impl Binary {
    pub fn new(escape_is_black: bool) -> Self {
        Self { escape_is_black }
    }
}

impl Coloring for Binary {
    fn color(&self, iter: u32, max_iter: u32) -> Color {
        let bounded = iter >= max_iter;
        if bounded != self.escape_is_black {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

/// 赤 → 黄 → 緑 → 水色 → 青 → 紫 → 白
const RAINBOW: [Color; 8] = [
    Color::rgb(0, 0, 0),
    Color::rgb(255, 0, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(255, 255, 255),
];

/// Python版と同じカラーマップ
const OCEAN: [(f64, f64, f64); 10] = [
    (0.0, 0.0, 0.2), // 深い青
    (0.1, 0.2, 0.5), // 青
    (0.2, 0.5, 0.8), // 水色
    (0.5, 0.8, 0.9), // 薄い水色
    (1.0, 1.0, 0.8), // クリーム
    (1.0, 0.8, 0.3), // 黄色
    (1.0, 0.5, 0.1), // オレンジ
    (0.8, 0.2, 0.1), // 赤
    (0.5, 0.0, 0.2), // 暗い赤
    (0.0, 0.0, 0.0), // 黒
];

/// 組み込みパレット名
pub const PALETTE_NAMES: [&str; 2] = ["rainbow", "ocean"];

/// 補間の基準となる色の列（2色以上）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    anchors: Vec<Color>,
}

impl Palette {
    pub fn new(anchors: Vec<Color>) -> Result<Self, ConfigError> {
        if anchors.len() < 2 {
            return Err(ConfigError::PaletteTooShort(anchors.len()));
        }
        Ok(Self { anchors })
    }

    pub fn rainbow() -> Self {
        Self {
            anchors: RAINBOW.to_vec(),
        }
    }

    pub fn ocean() -> Self {
        Self {
            anchors: OCEAN
                .iter()
                .map(|&(r, g, b)| Color::from_unit(r, g, b))
                .collect(),
        }
    }

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "rainbow" => Ok(Self::rainbow()),
            "ocean" => Ok(Self::ocean()),
            other => Err(ConfigError::UnknownPalette(other.to_string())),
        }
    }

    pub fn anchors(&self) -> &[Color] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::rainbow()
    }
}

/// 進捗 t (0-1) から、補間する区間の先頭インデックスと区間内の重みを求める
fn segment(t: f64, len: usize) -> (usize, f64) {
    let scaled = t * (len - 1) as f64;
    // idx + 1 が範囲外にならないよう N-2 で頭打ち
    let idx = (scaled.floor() as usize).min(len - 2);
    (idx, scaled - idx as f64)
}

/// パレットの色を線形補間するグラデーション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteColoring {
    palette: Palette,
}

impl PaletteColoring {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Coloring for PaletteColoring {
    fn color(&self, iter: u32, max_iter: u32) -> Color {
        if iter >= max_iter {
            return Color::BLACK;
        }

        let anchors = self.palette.anchors();
        let (idx, frac) = segment(iter as f64 / max_iter as f64, anchors.len());

        let c1 = anchors[idx];
        let c2 = anchors[idx + 1];
        let lerp = |a: u8, b: u8| ((1.0 - frac) * a as f64 + frac * b as f64).round() as u8;

        Color::rgb(lerp(c1.r, c2.r), lerp(c1.g, c2.g), lerp(c1.b, c2.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between(v: u8, a: u8, b: u8) -> bool {
        a.min(b) <= v && v <= a.max(b)
    }

    #[test]
    fn binary_is_black_only_for_bounded_points() {
        let binary = Binary::default();
        let max_iter = 100;
        assert_eq!(binary.color(max_iter, max_iter), Color::BLACK);
        for n in 0..max_iter {
            assert_eq!(binary.color(n, max_iter), Color::WHITE);
        }
    }

    #[test]
    fn binary_polarity_can_be_inverted() {
        let binary = Binary::new(true);
        assert_eq!(binary.color(10, 10), Color::WHITE);
        assert_eq!(binary.color(0, 10), Color::BLACK);
        assert_eq!(binary.color(9, 10), Color::BLACK);
    }

    #[test]
    fn palette_sentinel_is_black() {
        let coloring = PaletteColoring::default();
        assert_eq!(coloring.palette().anchors()[0], Color::BLACK);
        assert_eq!(coloring.color(300, 300), Color::BLACK);
        assert_eq!(coloring.color(300, 300), coloring.palette().anchors()[0]);

        let ocean = PaletteColoring::new(Palette::ocean());
        assert_eq!(ocean.color(256, 256), Color::BLACK);
    }

    #[test]
    fn palette_starts_at_first_anchor() {
        let coloring = PaletteColoring::new(Palette::ocean());
        assert_eq!(coloring.color(0, 256), Color::rgb(0, 0, 51));
    }

    #[test]
    fn channels_lie_between_bounding_anchors() {
        for palette in [Palette::rainbow(), Palette::ocean()] {
            let coloring = PaletteColoring::new(palette.clone());
            let anchors = palette.anchors();
            let max_iter = 300;
            for n in 0..max_iter {
                let scaled = n as f64 / max_iter as f64 * (anchors.len() - 1) as f64;
                let idx = (scaled.floor() as usize).min(anchors.len() - 2);
                let (a, b) = (anchors[idx], anchors[idx + 1]);
                let c = coloring.color(n, max_iter);
                assert!(between(c.r, a.r, b.r), "n = {}", n);
                assert!(between(c.g, a.g, b.g), "n = {}", n);
                assert!(between(c.b, a.b, b.b), "n = {}", n);
            }
        }
    }

    #[test]
    fn last_iteration_before_sentinel_stays_in_range() {
        // t = 299/300, u ≈ 6.977, idx = 6
        let coloring = PaletteColoring::default();
        let anchors = coloring.palette().anchors();
        assert_eq!(anchors.len(), 8);
        let c = coloring.color(299, 300);
        let (a, b) = (anchors[6], anchors[7]);
        assert!(between(c.r, a.r, b.r));
        assert!(between(c.g, a.g, b.g));
        assert!(between(c.b, a.b, b.b));
        assert_eq!(c, Color::rgb(255, 249, 255));
    }

    #[test]
    fn segment_is_clamped_at_the_last_pair() {
        assert_eq!(segment(1.0, 8), (6, 1.0));
        assert_eq!(segment(1.0, 2), (0, 1.0));
        assert_eq!(segment(299.0 / 300.0, 8).0, 6);
        assert_eq!(segment(0.0, 8), (0, 0.0));
    }

    #[test]
    fn two_anchor_palette_with_tiny_max_iter() {
        let palette = Palette::new(vec![Color::BLACK, Color::WHITE]).unwrap();
        let coloring = PaletteColoring::new(palette);
        assert_eq!(coloring.color(0, 1), Color::BLACK);
        assert_eq!(coloring.color(1, 2), Color::rgb(128, 128, 128));
        assert_eq!(coloring.color(0, 0), Color::BLACK);
    }

    #[test]
    fn successive_colors_change_by_small_steps() {
        let coloring = PaletteColoring::default();
        let n_anchors = coloring.palette().len() as u32;
        let max_iter = 300;
        let bound = (255 * (n_anchors - 1)).div_ceil(max_iter) as i32 + 1;
        let mut prev = coloring.color(0, max_iter);
        for n in 1..max_iter {
            let c = coloring.color(n, max_iter);
            assert!((c.r as i32 - prev.r as i32).abs() <= bound, "n = {}", n);
            assert!((c.g as i32 - prev.g as i32).abs() <= bound, "n = {}", n);
            assert!((c.b as i32 - prev.b as i32).abs() <= bound, "n = {}", n);
            prev = c;
        }
    }

    #[test]
    fn palette_needs_two_anchors() {
        assert!(matches!(Palette::new(vec![]), Err(ConfigError::PaletteTooShort(0))));
        assert!(matches!(
            Palette::new(vec![Color::WHITE]),
            Err(ConfigError::PaletteTooShort(1))
        ));
        assert!(Palette::new(vec![Color::BLACK, Color::WHITE]).is_ok());
    }

    #[test]
    fn palettes_by_name() {
        for name in PALETTE_NAMES {
            assert!(Palette::by_name(name).is_ok());
        }
        assert!(matches!(
            Palette::by_name("sepia"),
            Err(ConfigError::UnknownPalette(_))
        ));
    }

    #[test]
    fn rgba_is_fully_opaque() {
        let px: Rgba<u8> = Color::rgb(1, 2, 3).into();
        assert_eq!(px, Rgba([1, 2, 3, 255]));
    }
}

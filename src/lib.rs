//! エスケープタイム・フラクタル描画ライブラリ
//!
//! ピクセル座標 → 複素平面 → 反復回数 → 色 の変換パイプラインを提供する。
//! ウィンドウやファイル保存などの UI 部分は呼び出し側の責務。

pub mod common;

pub use common::{
    colors::{Binary, Color, Coloring, Palette, PaletteColoring},
    config::{ColoringMode, Config, PaletteSpec},
    error::{ConfigError, RenderError},
    escape::{escape_time, escapes, iterate, Escape, Fractal},
    render::{render, render_with_progress, Progress, RenderRequest},
    viewport::{map_pixel, GridSize, Viewport},
    worker::{RenderWorker, SharedColoring, WorkerEvent},
};

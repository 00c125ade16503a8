//! エラー型

use std::path::PathBuf;

use thiserror::Error;

/// 描画開始前に検出される設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("画像サイズは正の値が必要です: {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("表示領域の幅・高さは正の有限値が必要です: {width}x{height}")]
    DegenerateViewport { width: f64, height: f64 },

    #[error("表示領域の原点が有限値ではありません: ({x}, {y})")]
    NonFiniteOrigin { x: f64, y: f64 },

    #[error("パレットには2色以上が必要です（{0}色）")]
    PaletteTooShort(usize),

    #[error("不明なパレット名です: {0}")]
    UnknownPalette(String),

    #[error("最大反復回数は1以上が必要です")]
    ZeroIterations,

    #[error("ズーム倍率は正の有限値が必要です: {0}")]
    InvalidZoom(f64),

    #[error("ジュリア集合の定数が有限値ではありません: ({re}, {im})")]
    NonFiniteJuliaConstant { re: f64, im: f64 },

    #[error("設定ファイルを読み込めません {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("設定ファイルの形式が不正です {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 描画処理のエラー
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("描画がキャンセルされました")]
    Cancelled,

    #[error("描画ワーカーは終了しています")]
    WorkerGone,

    #[error("世代 {0} の結果は待てません（未投入か受信済み）")]
    UnknownGeneration(u64),
}

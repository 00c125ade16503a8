//! 共通定数

/// 初期表示領域の左上（実部）
pub const DEFAULT_ORIGIN_X: f64 = -2.0;
/// 初期表示領域の左上（虚部）
pub const DEFAULT_ORIGIN_Y: f64 = -1.0;
/// 初期表示領域の幅
pub const DEFAULT_VIEW_WIDTH: f64 = 3.0;
/// 初期表示領域の高さ
pub const DEFAULT_VIEW_HEIGHT: f64 = 2.0;

/// 出力画像の既定の高さ（幅は表示領域の縦横比から求める）
pub const DEFAULT_IMAGE_HEIGHT: u32 = 1080;

/// 最大反復回数
pub const MAX_ITER: u32 = 300;

/// 発散判定の半径
pub const ESCAPE_RADIUS: f64 = 2.0;
/// 発散判定に使う |z|^2 の閾値
pub const ESCAPE_RADIUS_SQR: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

/// クリック位置を中心にズームインする倍率
pub const ZOOM_FACTOR_IN: f64 = 0.8;

/// ズームアウト倍率
pub const ZOOM_FACTOR_OUT: f64 = 1.25;

/// 既定の出力ファイル名
pub const DEFAULT_OUTPUT: &str = "res.png";

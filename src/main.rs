//! エスケープタイム・フラクタル描画ツール
//!
//! 設定ファイルとコマンドライン引数から描画要求を組み立て、
//! PNG 画像として保存する。
//!
//! 使用例:
//!   - `escape-fractal`: 既定の表示領域を res.png に保存
//!   - `escape-fractal --coloring binary -o bw.png`: 白黒2値
//!   - `escape-fractal --julia -0.8 0.156 --palette ocean`: ジュリア集合
//!   - `escape-fractal --config view.toml --zoom 0.25`: 設定ファイルの領域を4倍に拡大
//!
//! ログの詳細度は `RUST_LOG` で変更できる（既定は info）。

use std::io::Write;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use escape_fractal::common::{
    colors::PALETTE_NAMES,
    config::{ColoringMode, Config, PaletteSpec},
    constants::DEFAULT_OUTPUT,
    escape::Fractal,
    render::{render_with_progress, Progress},
};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "escape-fractal", version)]
#[command(about = "マンデルブロ集合・ジュリア集合を PNG 画像に描画する")]
struct Args {
    /// 設定ファイル (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 出力ファイル
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// 画像の幅（省略時は高さと表示領域の縦横比から決める）
    #[arg(long)]
    width: Option<u32>,

    /// 画像の高さ
    #[arg(long)]
    height: Option<u32>,

    /// 最大反復回数
    #[arg(long)]
    max_iter: Option<u32>,

    /// 色付け方式
    #[arg(long, value_enum)]
    coloring: Option<ColoringMode>,

    /// 組み込みパレット名
    #[arg(long, value_parser = PALETTE_NAMES)]
    palette: Option<String>,

    /// 白黒2値で、発散した点を黒にする（`--escape-black false` で設定ファイルの指定を打ち消す）
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    escape_black: Option<bool>,

    /// ジュリア集合の定数 c
    #[arg(long, num_args = 2, value_names = ["RE", "IM"], allow_negative_numbers = true)]
    julia: Option<Vec<f64>>,

    /// 表示領域の左上
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    origin: Option<Vec<f64>>,

    /// 表示領域の幅と高さ
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    extent: Option<Vec<f64>>,

    /// 表示領域の中心を保ったまま幅・高さを何倍にするか（1未満で拡大）
    #[arg(long)]
    zoom: Option<f64>,

    /// 進捗を標準エラーに表示
    #[arg(long)]
    progress: bool,

    /// 実際に使う設定を TOML で表示して終了
    #[arg(long)]
    print_config: bool,
}

/// コマンドライン引数で設定を上書き
fn apply_args(args: &Args, config: &mut Config) -> Result<()> {
    if let Some(width) = args.width {
        config.image.width = Some(width);
    }
    if let Some(height) = args.height {
        config.image.height = height;
    }
    if let Some(max_iter) = args.max_iter {
        config.max_iter = max_iter;
    }
    if let Some(mode) = args.coloring {
        config.coloring.mode = mode;
    }
    if let Some(name) = &args.palette {
        config.coloring.palette = PaletteSpec::Named(name.clone());
    }
    if let Some(escape_is_black) = args.escape_black {
        config.coloring.escape_is_black = escape_is_black;
    }
    if let Some([re, im]) = args.julia.as_deref() {
        config.fractal = Fractal::Julia { re: *re, im: *im };
    }
    if let Some([x, y]) = args.origin.as_deref() {
        config.viewport.origin_x = *x;
        config.viewport.origin_y = *y;
    }
    if let Some([w, h]) = args.extent.as_deref() {
        config.viewport.width = *w;
        config.viewport.height = *h;
    }
    if let Some(factor) = args.zoom {
        config.viewport = config
            .viewport
            .zoomed(factor)
            .context("ズーム倍率を適用できません")?;
    }
    Ok(())
}

/// コンソールにプログレスバーを表示（全体の1%ごとに更新）
fn print_progress(progress: Progress) {
    let update_interval = std::cmp::max(1, progress.rows_total / 100);
    let done = progress.rows_done == progress.rows_total;
    if progress.rows_done % update_interval != 0 && !done {
        return;
    }

    let bar_width = 30;
    let filled = ((progress.fraction() * bar_width as f64) as usize).min(bar_width);
    eprint!(
        "\r計算中: [{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(bar_width - filled),
        progress.rows_done as u64 * 100 / progress.rows_total as u64
    );
    if done {
        eprintln!(" 完了!");
    }
    std::io::stderr().flush().ok();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_args(&args, &mut config)?;

    if args.print_config {
        print!("{}", config.to_toml().context("設定を TOML に変換できません")?);
        return Ok(());
    }

    let request = config.render_request()?;
    let coloring = config.coloring()?;

    let center = request.viewport.center();
    info!(
        "{} {}x{} | 中心: ({:.6}, {:.6}i) | 幅: {} | max_iter: {} | 色: {}",
        request.fractal,
        request.grid.width,
        request.grid.height,
        center.re,
        center.im,
        request.viewport.width,
        request.max_iter,
        config.coloring.mode
    );

    let start = Instant::now();
    let image = render_with_progress(&request, coloring.as_ref(), |progress| {
        if args.progress {
            print_progress(progress);
        }
        ControlFlow::Continue(())
    })?;
    info!("描画完了: {:.2?}", start.elapsed());

    image
        .save(&args.output)
        .with_context(|| {
            format!("画像の保存に失敗しました: {}", args.output.display())
        })?;
    info!("画像を保存しました: {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(argv: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(argv)?;
        let mut config = Config::default();
        apply_args(&args, &mut config)?;
        Ok(config)
    }

    #[test]
    fn no_arguments_keep_defaults() {
        let config = configured(&["escape-fractal"]).unwrap();
        assert_eq!(config, Config::default());
        let args = Args::try_parse_from(["escape-fractal"]).unwrap();
        assert_eq!(args.output, PathBuf::from("res.png"));
    }

    #[test]
    fn negative_pairs_are_parsed() {
        let config = configured(&[
            "escape-fractal",
            "--julia",
            "-0.8",
            "0.156",
            "--origin",
            "-1.5",
            "-1",
            "--extent",
            "3",
            "2",
        ])
        .unwrap();
        assert_eq!(config.fractal, Fractal::Julia { re: -0.8, im: 0.156 });
        assert_eq!(config.viewport.origin_x, -1.5);
        assert_eq!(config.viewport.origin_y, -1.0);
        assert_eq!(config.viewport.width, 3.0);
    }

    #[test]
    fn coloring_overrides() {
        let config = configured(&[
            "escape-fractal",
            "--coloring",
            "binary",
            "--escape-black",
            "--palette",
            "ocean",
            "--max-iter",
            "100",
            "--width",
            "200",
            "--height",
            "100",
        ])
        .unwrap();
        assert_eq!(config.coloring.mode, ColoringMode::Binary);
        assert!(config.coloring.escape_is_black);
        assert_eq!(config.coloring.palette, PaletteSpec::Named("ocean".into()));
        assert_eq!(config.max_iter, 100);
        assert_eq!(config.image.width, Some(200));
        assert_eq!(config.image.height, 100);
    }

    #[test]
    fn escape_black_can_be_turned_off() {
        let args = Args::try_parse_from(["escape-fractal", "--escape-black", "false"]).unwrap();
        let mut config = Config::default();
        config.coloring.escape_is_black = true;
        apply_args(&args, &mut config).unwrap();
        assert!(!config.coloring.escape_is_black);

        // 指定しなければ設定ファイルの値のまま
        let args = Args::try_parse_from(["escape-fractal"]).unwrap();
        config.coloring.escape_is_black = true;
        apply_args(&args, &mut config).unwrap();
        assert!(config.coloring.escape_is_black);
    }

    #[test]
    fn unknown_palette_name_is_rejected() {
        assert!(Args::try_parse_from(["escape-fractal", "--palette", "sepia"]).is_err());
        for name in PALETTE_NAMES {
            assert!(configured(&["escape-fractal", "--palette", name]).is_ok());
        }
    }

    #[test]
    fn zoom_keeps_the_center() {
        let config = configured(&["escape-fractal", "--zoom", "0.5"]).unwrap();
        assert_eq!(config.viewport.width, 1.5);
        assert_eq!(config.viewport.height, 1.0);
        let center = config.viewport.center();
        assert!((center.re + 0.5).abs() < 1e-12);
        assert!(center.im.abs() < 1e-12);
    }

    #[test]
    fn bad_zoom_is_an_error() {
        assert!(configured(&["escape-fractal", "--zoom", "0"]).is_err());
    }
}

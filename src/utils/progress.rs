//! # 解析进度提示
//!
//! OUTCAR 可达数百 MB，解析期间显示 spinner，消息中带上 DFT 代码、
//! 文件名与文件大小。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 使用
//! - 使用 `indicatif` crate

use crate::models::DftCode;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// 解析输出文件时的 spinner
pub fn parse_spinner(code: DftCode, path: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap()
            .tick_strings(&["↑", "↗", "→", "↘", "↓", "↙", "←", "↖", "↑"]),
    );

    let size = std::fs::metadata(path)
        .map(|m| format!(" ({})", human_size(m.len())))
        .unwrap_or_default();
    pb.set_message(format!(
        "Reading {} output '{}'{}",
        code,
        path.display(),
        size
    ));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 字节数的可读表示
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

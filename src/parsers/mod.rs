//! # 解析器模块
//!
//! 提供 VASP 与 SIESTA 输出文件的解析器。两者都是 `OutputParser` 的实现：
//! 一张标记表加一个校验收尾函数，共用 `scan` 的单次扫描。
//!
//! 输入可以是文件路径，也可以是任何产出 UTF-8 文本的 `Read`。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: scan, vasp, siesta

pub mod scan;
pub mod siesta;
pub mod vasp;

use crate::error::{MagviewError, Result};
use crate::models::{DftCode, ParsedOutput};
use scan::MarkerRule;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use siesta::SiestaParser;
pub use vasp::VaspParser;

/// "原始文本 -> ParsedOutput 或失败"
pub trait OutputParser {
    /// 扫描过程中的累积状态
    type State: Default + 'static;

    /// 对应的 DFT 代码
    const CODE: DftCode;

    /// 标记表
    const RULES: &'static [MarkerRule<Self::State>];

    /// 校验并生成最终记录
    fn finish(state: Self::State) -> Result<ParsedOutput>;

    /// 解析全部行
    fn parse_lines(lines: &[&str]) -> Result<ParsedOutput> {
        let mut state = Self::State::default();
        scan::scan(lines, Self::RULES, &mut state, Self::CODE)?;
        Self::finish(state)
    }
}

/// 按 DFT 代码分派解析
pub fn parse_content(content: &str, code: DftCode) -> Result<ParsedOutput> {
    let lines: Vec<&str> = content.lines().collect();
    match code {
        DftCode::Vasp => VaspParser::parse_lines(&lines),
        DftCode::Siesta => SiestaParser::parse_lines(&lines),
    }
}

/// 从任意字节流解析（内容须为 UTF-8）
pub fn parse_reader<R: Read>(mut reader: R, code: DftCode) -> Result<ParsedOutput> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| MagviewError::FileReadError {
            path: "<stream>".to_string(),
            source: e,
        })?;
    let content = String::from_utf8(bytes).map_err(MagviewError::InvalidEncoding)?;
    parse_content(&content, code)
}

/// 从文件路径解析
pub fn parse_file(path: &Path, code: DftCode) -> Result<ParsedOutput> {
    if !path.exists() {
        return Err(MagviewError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path).map_err(|e| MagviewError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_reader(file, code).map_err(|e| match e {
        MagviewError::FileReadError { source, .. } => MagviewError::FileReadError {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

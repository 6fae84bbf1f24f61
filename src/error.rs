//! # 统一错误处理模块
//!
//! 定义 magview 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 缺少输入：未提供文件、未选择 DFT 代码
//! - 解析/校验：缺少必需字段、数值格式错误、无法识别的块格式
//! - 用户配置：物种选择为空、显示参数越界
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// magview 统一错误类型
#[derive(Error, Debug)]
pub enum MagviewError {
    // ─────────────────────────────────────────────────────────────
    // 缺少输入
    // ─────────────────────────────────────────────────────────────
    #[error("Please provide a DFT output file to start with")]
    NoInputFile,

    #[error("Please select the DFT code (--code vasp|siesta)")]
    NoCodeSelected,

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Input is not valid UTF-8 text")]
    InvalidEncoding(#[source] std::string::FromUtf8Error),

    #[error("Failed to parse {format} output at line {line}\nReason: {reason}")]
    ParseError {
        format: String,
        line: usize,
        reason: String,
    },

    #[error("Missing required keys in {code} output: [{}]", .keys.join(", "))]
    MissingKeys { code: String, keys: Vec<String> },

    #[error("Unrecognized Mulliken population row at line {line}: expected 5 or 8 fields, found {fields}")]
    UnrecognizedMomentFormat { line: usize, fields: usize },

    #[error("Inconsistent {code} output: {reason}")]
    InconsistentRecord { code: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 用户配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Please select at least one species to plot")]
    EmptySpeciesSelection,

    #[error("Unknown species '{symbol}' (available: {available})")]
    UnknownSpecies { symbol: String, available: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    // ─────────────────────────────────────────────────────────────
    // 导出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MagviewError {
    /// 是否属于缺少输入的错误（CLI 会额外打印提示）
    pub fn is_missing_input(&self) -> bool {
        matches!(self, MagviewError::NoInputFile | MagviewError::NoCodeSelected)
    }

    /// 是否属于解析/校验错误
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            MagviewError::InvalidEncoding(_)
                | MagviewError::ParseError { .. }
                | MagviewError::MissingKeys { .. }
                | MagviewError::UnrecognizedMomentFormat { .. }
                | MagviewError::InconsistentRecord { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MagviewError>;

//! # 标记表驱动的逐行扫描器
//!
//! 两种输出格式都是"找到标记行，再读取其后固定形状的文本块"。
//! 每个解析器提供一张 `(标记, 提取函数)` 表，`scan` 单次遍历所有行，
//! 对包含标记子串的行调用对应的提取函数。
//!
//! 提取函数通过 `Cursor` 读取后续行：越过文件末尾、数值格式错误都会
//! 返回带行号的 `ParseError`，而不是 panic。
//!
//! ## 依赖关系
//! - 被 `parsers/vasp.rs`, `parsers/siesta.rs` 使用
//! - 使用 `error.rs`

use crate::error::{MagviewError, Result};
use crate::models::DftCode;

/// 标记与提取函数
pub struct MarkerRule<S> {
    /// 行内需要包含的字面子串
    pub marker: &'static str,
    /// 命中标记时调用
    pub extract: fn(&mut S, &Cursor<'_>) -> Result<()>,
}

/// 对所有行执行一次扫描
///
/// 同一行可以命中多条规则；同一标记多次出现时提取函数会被多次调用，
/// 由状态决定覆盖还是累积。
pub fn scan<S>(lines: &[&str], rules: &[MarkerRule<S>], state: &mut S, code: DftCode) -> Result<()> {
    for (index, line) in lines.iter().enumerate() {
        for rule in rules {
            if line.contains(rule.marker) {
                let cursor = Cursor { lines, index, code };
                (rule.extract)(state, &cursor)?;
            }
        }
    }
    Ok(())
}

/// 指向标记行的游标
pub struct Cursor<'a> {
    lines: &'a [&'a str],
    index: usize,
    code: DftCode,
}

impl<'a> Cursor<'a> {
    /// 标记行本身
    pub fn row(&self) -> Row<'a> {
        self.row_at(self.index)
    }

    fn row_at(&self, index: usize) -> Row<'a> {
        Row {
            text: self.lines[index],
            line_no: index + 1,
            code: self.code,
        }
    }

    /// 构造指向标记行的解析错误
    pub fn error(&self, reason: impl Into<String>) -> MagviewError {
        self.row().error(reason)
    }

    /// 标记行之后第 `offset` 行开始的 `count` 行
    pub fn block(&self, offset: usize, count: usize) -> Result<Vec<Row<'a>>> {
        let range = self
            .index
            .checked_add(offset)
            .and_then(|start| start.checked_add(count).map(|end| (start, end)));
        let Some((start, end)) = range.filter(|&(_, end)| end <= self.lines.len()) else {
            return Err(self.error(format!(
                "expected {} lines starting {} line(s) below, but the file ends at line {}",
                count,
                offset,
                self.lines.len()
            )));
        };
        Ok((start..end).map(|i| self.row_at(i)).collect())
    }

    /// 从 `offset` 开始读取，直到遇到空行或文件末尾
    pub fn block_until_blank(&self, offset: usize) -> Vec<Row<'a>> {
        (self.index + offset..self.lines.len())
            .map(|i| self.row_at(i))
            .take_while(|row| !row.text.trim().is_empty())
            .collect()
    }

    /// 从 `offset` 开始读取，直到包含 `end_marker` 的行（不含该行）
    pub fn block_until(&self, offset: usize, end_marker: &str) -> Result<Vec<Row<'a>>> {
        let start = self.index + offset;
        let end = (start..self.lines.len())
            .find(|&i| self.lines[i].contains(end_marker))
            .ok_or_else(|| self.error(format!("block is not closed by '{}'", end_marker)))?;
        Ok((start..end).map(|i| self.row_at(i)).collect())
    }
}

/// 带行号的一行文本
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub text: &'a str,
    pub line_no: usize,
    code: DftCode,
}

impl<'a> Row<'a> {
    pub fn error(&self, reason: impl Into<String>) -> MagviewError {
        MagviewError::ParseError {
            format: self.code.to_string(),
            line: self.line_no,
            reason: reason.into(),
        }
    }

    pub fn tokens(&self) -> Vec<&'a str> {
        self.text.split_whitespace().collect()
    }

    /// 第 `index` 个空白分隔字段
    pub fn token(&self, index: usize) -> Result<&'a str> {
        self.text
            .split_whitespace()
            .nth(index)
            .ok_or_else(|| self.error(format!("missing field #{}", index + 1)))
    }

    pub fn float(&self, index: usize) -> Result<f64> {
        let token = self.token(index)?;
        parse_f64(token).ok_or_else(|| self.error(format!("'{}' is not a number", token)))
    }

    /// 从第 `start` 个字段开始的三个浮点数
    pub fn vec3(&self, start: usize) -> Result<[f64; 3]> {
        Ok([
            self.float(start)?,
            self.float(start + 1)?,
            self.float(start + 2)?,
        ])
    }

    /// 最后一个字段（必须是数值）
    pub fn last_float(&self) -> Result<f64> {
        let token = self
            .text
            .split_whitespace()
            .last()
            .ok_or_else(|| self.error("empty line where a number was expected"))?;
        parse_f64(token).ok_or_else(|| self.error(format!("'{}' is not a number", token)))
    }

    /// 第 `index` 个字段（非负整数）
    pub fn int(&self, index: usize) -> Result<usize> {
        let token = self.token(index)?;
        token
            .parse::<usize>()
            .map_err(|_| self.error(format!("'{}' is not a non-negative integer", token)))
    }

    /// 从第 `start` 个字段起的所有整数
    pub fn ints_from(&self, start: usize) -> Result<Vec<usize>> {
        self.text
            .split_whitespace()
            .skip(start)
            .map(|t| {
                t.parse::<usize>()
                    .map_err(|_| self.error(format!("'{}' is not a non-negative integer", t)))
            })
            .collect()
    }
}

/// 解析浮点数，兼容 Fortran 的 `D` 指数记号
fn parse_f64(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse::<f64>().ok())
}

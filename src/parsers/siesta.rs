//! # SIESTA 输出解析器
//!
//! 解析 SIESTA 标准输出，提取晶格、坐标、物种和 Mulliken 布居分析中的磁矩。
//!
//! ## 标记
//! ```text
//! %block ChemicalSpeciesLabel ... %endblock ChemicalSpeciesLabel
//!     1   26 Fe                                   -> 第 3 列为元素符号
//! siesta: Atomic coordinates (Bohr) and species
//! siesta:      0.00000   0.00000   0.00000  1    1   -> Bohr 坐标 + 类型标签
//! outcell: Unit cell vectors (Ang):                  -> 后 3 行为晶格
//! Mulliken Atomic Populations:                       -> 标记后第 2 行起 natoms 行
//! ```
//!
//! Mulliken 行宽 5 列为共线计算（第 4 列为标量磁矩，放在 z 分量），
//! 8 列为非共线计算（第 5~7 列为 x, y, z），其他宽度报错。
//!
//! 坐标行的类型标签是物种块中的序号。原子按该序号稳定分组，
//! 坐标与 Mulliken 磁矩使用同一排列，使 `nions` 与 `species` 一一对应。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/scan.rs`, `models/output.rs`

use crate::error::{MagviewError, Result};
use crate::models::{DftCode, ParsedOutput, RawOutput};
use crate::parsers::scan::{Cursor, MarkerRule};
use crate::parsers::OutputParser;
use std::collections::BTreeMap;

/// Bohr -> Å
pub const BOHR_TO_ANGSTROM: f64 = 0.529177;

const SPECIES_END: &str = "%endblock ChemicalSpeciesLabel";
const COLLINEAR_WIDTH: usize = 5;
const NONCOLLINEAR_WIDTH: usize = 8;

/// SIESTA 输出解析器
pub struct SiestaParser;

/// 扫描状态
#[derive(Debug, Default)]
pub struct SiestaState {
    raw: RawOutput,
    /// 按物种编号分组后的原子顺序：`order[k]` 为第 k 个原子在输出中的序号
    order: Option<Vec<usize>>,
}

impl OutputParser for SiestaParser {
    type State = SiestaState;

    const CODE: DftCode = DftCode::Siesta;

    const RULES: &'static [MarkerRule<SiestaState>] = &[
        MarkerRule {
            marker: "siesta: Atomic coordinates (Bohr) and species",
            extract: read_coordinates,
        },
        MarkerRule {
            marker: "%block ChemicalSpeciesLabel",
            extract: read_species,
        },
        MarkerRule {
            marker: "outcell: Unit cell vectors (Ang):",
            extract: read_lattice,
        },
        MarkerRule {
            marker: "Mulliken Atomic Populations:",
            extract: read_mulliken,
        },
    ];

    fn finish(state: SiestaState) -> Result<ParsedOutput> {
        state.raw.finish(DftCode::Siesta)
    }
}

/// 按物种编号升序统计各编号的原子数
///
/// 编号即 `ChemicalSpeciesLabel` 块中的序号，因此计数与物种列表顺序一致。
fn tally_by_label(labels: &[usize]) -> Vec<usize> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts.into_values().collect()
}

/// 按物种编号稳定排序后的原子序号
fn group_by_label(labels: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by_key(|&i| labels[i]);
    order
}

// ─────────────────────────────────────────────────────────────
// 提取函数
// ─────────────────────────────────────────────────────────────

fn read_coordinates(state: &mut SiestaState, cursor: &Cursor<'_>) -> Result<()> {
    let rows = cursor.block_until_blank(1);

    let mut positions = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());
    for row in &rows {
        let bohr = row.vec3(1)?;
        positions.push(bohr.map(|x| x * BOHR_TO_ANGSTROM));
        labels.push(row.int(4)?);
    }

    let order = group_by_label(&labels);
    state.raw.nions = Some(tally_by_label(&labels));
    state.raw.pos_cart = Some(order.iter().map(|&i| positions[i]).collect());
    state.order = Some(order);
    Ok(())
}

fn read_species(state: &mut SiestaState, cursor: &Cursor<'_>) -> Result<()> {
    let species = cursor
        .block_until(1, SPECIES_END)?
        .iter()
        .map(|row| row.token(2).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    state.raw.species = Some(species);
    Ok(())
}

fn read_lattice(state: &mut SiestaState, cursor: &Cursor<'_>) -> Result<()> {
    let rows = cursor.block(1, 3)?;
    state.raw.lattice = Some([rows[0].vec3(0)?, rows[1].vec3(0)?, rows[2].vec3(0)?]);
    Ok(())
}

fn read_mulliken(state: &mut SiestaState, cursor: &Cursor<'_>) -> Result<()> {
    let order = state
        .order
        .as_ref()
        .ok_or_else(|| cursor.error("Mulliken populations appear before atomic coordinates"))?;

    let rows = cursor.block(2, order.len())?;
    let Some(first) = rows.first() else {
        state.raw.magmom = Some(Vec::new());
        return Ok(());
    };

    let width = first.tokens().len();
    let magmom = match width {
        COLLINEAR_WIDTH => rows
            .iter()
            .map(|row| row.float(3).map(|m| [0.0, 0.0, m]))
            .collect::<Result<Vec<_>>>()?,
        NONCOLLINEAR_WIDTH => rows
            .iter()
            .map(|row| row.vec3(4))
            .collect::<Result<Vec<_>>>()?,
        fields => {
            return Err(MagviewError::UnrecognizedMomentFormat {
                line: first.line_no,
                fields,
            })
        }
    };

    state.raw.noncollinear = width == NONCOLLINEAR_WIDTH;
    state.raw.magmom = Some(order.iter().map(|&i| magmom[i]).collect());
    Ok(())
}

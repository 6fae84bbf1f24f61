//! # DFT 输出解析结果数据模型
//!
//! 存储从 VASP/SIESTA 输出文件中提取的结构与磁矩信息。
//!
//! ## 依赖关系
//! - 被 `parsers/vasp.rs`, `parsers/siesta.rs` 构造
//! - 被 `models/structure.rs`, `commands/` 使用

use crate::error::{MagviewError, Result};
use crate::models::Lattice;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// DFT 计算代码类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum DftCode {
    /// VASP (OUTCAR)
    Vasp,
    /// SIESTA (standard output)
    Siesta,
}

impl std::fmt::Display for DftCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DftCode::Vasp => write!(f, "VASP"),
            DftCode::Siesta => write!(f, "SIESTA"),
        }
    }
}

/// 必需字段，顺序即缺失时报告的顺序
pub const REQUIRED_KEYS: [&str; 5] = ["lattice", "pos_cart", "nions", "species", "magmom"];

/// 解析结果（构造后不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedOutput {
    /// 来源 DFT 代码
    pub code: DftCode,

    /// 元素符号，每种原子类型一个，按首次出现顺序
    pub species: Vec<String>,

    /// 每种类型的原子数，与 `species` 一一对应
    pub nions: Vec<usize>,

    /// 晶格向量 (Å)
    pub lattice: Lattice,

    /// 笛卡尔坐标 (Å)
    pub pos_cart: Vec<[f64; 3]>,

    /// 每原子磁矩向量 (μB)
    pub magmom: Vec<[f64; 3]>,

    /// 是否为非共线计算
    pub noncollinear: bool,
}

impl ParsedOutput {
    /// 原子总数
    pub fn natoms(&self) -> usize {
        self.pos_cart.len()
    }

    /// 展开为每原子一个元素符号
    pub fn symbols(&self) -> Vec<&str> {
        self.species
            .iter()
            .zip(&self.nions)
            .flat_map(|(sym, &n)| std::iter::repeat(sym.as_str()).take(n))
            .collect()
    }

    /// 去重后的物种列表（保持首次出现顺序）
    pub fn unique_species(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::with_capacity(self.species.len());
        for sym in &self.species {
            if !unique.contains(sym) {
                unique.push(sym.clone());
            }
        }
        unique
    }

    /// 每原子磁矩大小
    pub fn moment_magnitudes(&self) -> Vec<f64> {
        self.magmom.iter().map(|m| norm(m)).collect()
    }

    /// 总磁矩（向量和）
    pub fn total_moment(&self) -> [f64; 3] {
        self.magmom.iter().fold([0.0; 3], |acc, m| {
            [acc[0] + m[0], acc[1] + m[1], acc[2] + m[2]]
        })
    }

    /// 绝对总磁矩（大小之和）
    pub fn total_abs_moment(&self) -> f64 {
        self.moment_magnitudes().iter().sum()
    }
}

/// 各类型原子数之和，溢出时返回 None
pub fn total_ions(nions: &[usize]) -> Option<usize> {
    nions.iter().try_fold(0usize, |acc, &n| acc.checked_add(n))
}

/// 向量模长
pub fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// 扫描过程中逐步填充的中间记录
///
/// 所有字段都是可选的，`finish` 负责必需字段与形状的校验。
#[derive(Debug, Default)]
pub struct RawOutput {
    pub species: Option<Vec<String>>,
    pub nions: Option<Vec<usize>>,
    pub lattice: Option<[[f64; 3]; 3]>,
    pub pos_cart: Option<Vec<[f64; 3]>>,
    pub magmom: Option<Vec<[f64; 3]>>,
    pub noncollinear: bool,
}

impl RawOutput {
    /// 缺失的必需字段名
    pub fn missing_keys(&self) -> Vec<String> {
        let present = [
            self.lattice.is_some(),
            self.pos_cart.is_some(),
            self.nions.is_some(),
            self.species.is_some(),
            self.magmom.is_some(),
        ];
        REQUIRED_KEYS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// 校验并生成 `ParsedOutput`
    pub fn finish(self, code: DftCode) -> Result<ParsedOutput> {
        let missing = self.missing_keys();
        let (Some(species), Some(nions), Some(lattice), Some(pos_cart), Some(magmom)) = (
            self.species,
            self.nions,
            self.lattice,
            self.pos_cart,
            self.magmom,
        ) else {
            return Err(MagviewError::MissingKeys {
                code: code.to_string(),
                keys: missing,
            });
        };

        let inconsistent = |reason: String| MagviewError::InconsistentRecord {
            code: code.to_string(),
            reason,
        };

        if species.len() != nions.len() {
            return Err(inconsistent(format!(
                "{} species but {} ion counts",
                species.len(),
                nions.len()
            )));
        }

        let natoms = total_ions(&nions)
            .ok_or_else(|| inconsistent("ion counts overflow".to_string()))?;
        if natoms != pos_cart.len() {
            return Err(inconsistent(format!(
                "ion counts sum to {} but {} positions were read",
                natoms,
                pos_cart.len()
            )));
        }
        if natoms != magmom.len() {
            return Err(inconsistent(format!(
                "ion counts sum to {} but {} magnetic moments were read",
                natoms,
                magmom.len()
            )));
        }

        Ok(ParsedOutput {
            code,
            species,
            nions,
            lattice: Lattice::from_vectors(lattice),
            pos_cart,
            magmom,
            noncollinear: self.noncollinear,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_raw() -> RawOutput {
        RawOutput {
            species: Some(vec!["Fe".to_string(), "O".to_string()]),
            nions: Some(vec![2, 1]),
            lattice: Some([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]),
            pos_cart: Some(vec![[0.0; 3], [2.0, 2.0, 0.0], [2.0, 0.0, 2.0]]),
            magmom: Some(vec![[0.0, 0.0, 2.0], [0.0, 0.0, -2.0], [0.0, 0.0, 0.1]]),
            noncollinear: false,
        }
    }

    #[test]
    fn test_finish_complete_record() {
        let out = complete_raw().finish(DftCode::Vasp).unwrap();
        assert_eq!(out.natoms(), 3);
        assert_eq!(out.symbols(), vec!["Fe", "Fe", "O"]);
        assert_eq!(out.nions.iter().sum::<usize>(), out.magmom.len());
    }

    #[test]
    fn test_missing_keys_reported_in_order() {
        let mut raw = complete_raw();
        raw.magmom = None;
        raw.lattice = None;
        match raw.finish(DftCode::Siesta) {
            Err(MagviewError::MissingKeys { code, keys }) => {
                assert_eq!(code, "SIESTA");
                assert_eq!(keys, vec!["lattice", "magmom"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_species_count_mismatch_is_inconsistent() {
        let mut raw = complete_raw();
        raw.species = Some(vec!["Fe".to_string(), "O".to_string(), "Fe".to_string()]);
        assert!(matches!(
            raw.finish(DftCode::Vasp),
            Err(MagviewError::InconsistentRecord { .. })
        ));
    }

    #[test]
    fn test_overflowing_ion_counts_are_inconsistent() {
        let mut raw = complete_raw();
        raw.nions = Some(vec![usize::MAX, 1]);
        match raw.finish(DftCode::Vasp) {
            Err(MagviewError::InconsistentRecord { reason, .. }) => {
                assert!(reason.contains("overflow"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(total_ions(&[2, 1]), Some(3));
    }

    #[test]
    fn test_moment_totals() {
        let out = complete_raw().finish(DftCode::Vasp).unwrap();
        let total = out.total_moment();
        assert!((total[2] - 0.1).abs() < 1e-12);
        assert!((out.total_abs_moment() - 4.1).abs() < 1e-12);
    }

    #[test]
    fn test_unique_species_keeps_first_order() {
        let mut out = complete_raw().finish(DftCode::Vasp).unwrap();
        out.species = vec!["O".to_string(), "Fe".to_string(), "O".to_string()];
        assert_eq!(out.unique_species(), vec!["O", "Fe"]);
    }
}

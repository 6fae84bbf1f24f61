//! # VASP OUTCAR 解析器
//!
//! 解析 VASP 计算输出文件 OUTCAR，提取晶格、笛卡尔坐标、物种和每原子磁矩。
//!
//! ## 标记
//! ```text
//!    VRHFIN =Fe: d7 s1                         -> 物种（不去重）
//!    LSORBIT =      F    spin-orbit coupling   -> 是否非共线
//!    ions per type =               2   1       -> 每种类型原子数
//!       direct lattice vectors                 -> 后 3 行为晶格
//!  position of ions in cartesian coordinates  (Angst):  -> 后 natoms 行
//!  magnetization (x) / (y) / (z)               -> 标记后第 4 行起 natoms 行，取最后一列
//! ```
//!
//! 共线计算 (LSORBIT = F) 只有 `magnetization (x)` 块，其数值实为沿量子化轴的
//! 标量磁矩，放到 z 分量，x/y 置零。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `parsers/scan.rs`, `models/output.rs`

use crate::error::Result;
use crate::models::output::total_ions;
use crate::models::{DftCode, ParsedOutput, RawOutput};
use crate::parsers::scan::{Cursor, MarkerRule};
use crate::parsers::OutputParser;

/// 磁化块中数据行相对标记行的偏移
const MAGNETIZATION_OFFSET: usize = 4;

/// VASP OUTCAR 解析器
pub struct VaspParser;

/// 扫描状态
#[derive(Debug, Default)]
pub struct VaspState {
    species: Vec<String>,
    soc: Option<String>,
    nions: Option<Vec<usize>>,
    lattice: Option<[[f64; 3]; 3]>,
    pos_cart: Option<Vec<[f64; 3]>>,
    mag: [Option<Vec<f64>>; 3],
}

impl VaspState {
    fn natoms(&self, cursor: &Cursor<'_>) -> Result<usize> {
        let nions = self
            .nions
            .as_ref()
            .ok_or_else(|| cursor.error("block appears before 'ions per type'"))?;
        total_ions(nions).ok_or_else(|| cursor.error("ion counts overflow"))
    }
}

impl OutputParser for VaspParser {
    type State = VaspState;

    const CODE: DftCode = DftCode::Vasp;

    const RULES: &'static [MarkerRule<VaspState>] = &[
        MarkerRule {
            marker: "VRHFIN",
            extract: read_species,
        },
        MarkerRule {
            marker: "LSORBIT",
            extract: read_soc,
        },
        MarkerRule {
            marker: "ions per type =",
            extract: read_nions,
        },
        MarkerRule {
            marker: "direct lattice vectors",
            extract: read_lattice,
        },
        MarkerRule {
            marker: "position of ions in cartesian coordinates  (Angst):",
            extract: read_positions,
        },
        MarkerRule {
            marker: "magnetization (x)",
            extract: read_mag_x,
        },
        MarkerRule {
            marker: "magnetization (y)",
            extract: read_mag_y,
        },
        MarkerRule {
            marker: "magnetization (z)",
            extract: read_mag_z,
        },
    ];

    fn finish(state: VaspState) -> Result<ParsedOutput> {
        let noncollinear = state.soc.as_deref().map(|s| s != "F").unwrap_or(false);
        let magmom = resolve_magmom(&state);

        let raw = RawOutput {
            species: (!state.species.is_empty()).then_some(state.species),
            nions: state.nions,
            lattice: state.lattice,
            pos_cart: state.pos_cart,
            magmom,
            noncollinear,
        };
        raw.finish(DftCode::Vasp)
    }
}

/// 由 x/y/z 块组合磁矩
///
/// 缺少 LSORBIT 标志或所需的分量块时返回 None，交由必需字段校验报告。
fn resolve_magmom(state: &VaspState) -> Option<Vec<[f64; 3]>> {
    let [mx, my, mz] = &state.mag;
    match state.soc.as_deref()? {
        "F" => {
            let scalar = mx.as_ref()?;
            Some(scalar.iter().map(|&m| [0.0, 0.0, m]).collect())
        }
        _ => {
            let (mx, my, mz) = (mx.as_ref()?, my.as_ref()?, mz.as_ref()?);
            if mx.len() != my.len() || mx.len() != mz.len() {
                return None;
            }
            Some(
                mx.iter()
                    .zip(my)
                    .zip(mz)
                    .map(|((&x, &y), &z)| [x, y, z])
                    .collect(),
            )
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 提取函数
// ─────────────────────────────────────────────────────────────

/// "   VRHFIN =Fe: d7 s1" -> "Fe"
fn read_species(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    let text = cursor.row().text;
    let after_eq = text
        .split_once('=')
        .map(|(_, rest)| rest)
        .ok_or_else(|| cursor.error("VRHFIN line has no '='"))?;
    let symbol = after_eq.split(':').next().unwrap_or(after_eq).trim();
    state.species.push(symbol.to_string());
    Ok(())
}

/// "   LSORBIT =      F    spin-orbit coupling"
fn read_soc(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    state.soc = Some(cursor.row().token(2)?.to_string());
    Ok(())
}

/// "   ions per type =               2   1"
fn read_nions(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    state.nions = Some(cursor.row().ints_from(4)?);
    Ok(())
}

fn read_lattice(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    let rows = cursor.block(1, 3)?;
    state.lattice = Some([rows[0].vec3(0)?, rows[1].vec3(0)?, rows[2].vec3(0)?]);
    Ok(())
}

fn read_positions(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    let natoms = state.natoms(cursor)?;
    let positions = cursor
        .block(1, natoms)?
        .iter()
        .map(|row| row.vec3(0))
        .collect::<Result<Vec<_>>>()?;
    state.pos_cart = Some(positions);
    Ok(())
}

fn read_magnetization(state: &mut VaspState, cursor: &Cursor<'_>, axis: usize) -> Result<()> {
    let natoms = state.natoms(cursor)?;
    let values = cursor
        .block(MAGNETIZATION_OFFSET, natoms)?
        .iter()
        .map(|row| row.last_float())
        .collect::<Result<Vec<_>>>()?;
    state.mag[axis] = Some(values);
    Ok(())
}

fn read_mag_x(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    read_magnetization(state, cursor, 0)
}

fn read_mag_y(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    read_magnetization(state, cursor, 1)
}

fn read_mag_z(state: &mut VaspState, cursor: &Cursor<'_>) -> Result<()> {
    read_magnetization(state, cursor, 2)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::MagviewError;
    use crate::parsers::parse_content;

    pub(crate) const COLLINEAR_OUTCAR: &str = r#" vasp.6.3.0 18Jan22 (build Feb 10 2022) complex
 POTCAR:    PAW_PBE Fe 06Sep2000
 POTCAR:    PAW_PBE O 08Apr2002
   VRHFIN =Fe: d7 s1
   VRHFIN =O: s2p4
   LSORBIT =      F    spin-orbit coupling
   ions per type =               2   1

      direct lattice vectors                 reciprocal lattice vectors
     4.000000000  0.000000000  0.000000000     0.250000000  0.000000000  0.000000000
     0.000000000  4.000000000  0.000000000     0.000000000  0.250000000  0.000000000
     0.000000000  0.000000000  4.000000000     0.000000000  0.000000000  0.250000000

 position of ions in cartesian coordinates  (Angst):
      0.00000000  0.00000000  0.00000000
      2.00000000  2.00000000  0.00000000
      2.00000000  0.00000000  2.00000000

 magnetization (x)

# of ion       s       p       d       tot
------------------------------------------
    1        0.010   0.020   2.100   2.130
    2        0.010   0.020  -2.100  -2.070
    3        0.000   0.050   0.000   0.050
--------------------------------------------------
tot          0.020   0.090   0.000   0.110

"#;

    pub(crate) const NONCOLLINEAR_OUTCAR: &str = r#"   VRHFIN =Mn: 3p4s3d
   LSORBIT =      T    spin-orbit coupling
   ions per type =               2

      direct lattice vectors                 reciprocal lattice vectors
     5.000000000  0.000000000  0.000000000     0.200000000  0.000000000  0.000000000
     0.000000000  5.000000000  0.000000000     0.000000000  0.200000000  0.000000000
     0.000000000  0.000000000  6.000000000     0.000000000  0.000000000  0.166666667

 position of ions in cartesian coordinates  (Angst):
      0.00000000  0.00000000  0.00000000
      2.50000000  2.50000000  3.00000000

 magnetization (x)

# of ion       s       p       d       f       tot
----------------------------------------------------------
    1        0.001   0.002   1.000   0.000   1.003
    2       -0.001  -0.002  -1.000   0.000  -1.003

 magnetization (y)

# of ion       s       p       d       f       tot
----------------------------------------------------------
    1        0.000   0.000   0.500   0.000   0.500
    2        0.000   0.000   0.500   0.000   0.500

 magnetization (z)

# of ion       s       p       d       f       tot
----------------------------------------------------------
    1        0.000   0.010   3.000   0.000   3.010
    2        0.000   0.010   3.000   0.000   3.010
"#;

    #[test]
    fn test_parse_collinear_outcar() {
        let out = parse_content(COLLINEAR_OUTCAR, DftCode::Vasp).unwrap();

        assert_eq!(out.species, vec!["Fe", "O"]);
        assert_eq!(out.nions, vec![2, 1]);
        assert_eq!(out.lattice.matrix[0], [4.0, 0.0, 0.0]);
        assert_eq!(out.lattice.matrix[2], [0.0, 0.0, 4.0]);
        assert_eq!(out.pos_cart[1], [2.0, 2.0, 0.0]);
        assert!(!out.noncollinear);

        // 共线：x/y 全为零，标量磁矩在 z
        assert!(out.magmom.iter().all(|m| m[0] == 0.0 && m[1] == 0.0));
        assert_eq!(out.magmom[0][2], 2.130);
        assert_eq!(out.magmom[1][2], -2.070);

        let natoms: usize = out.nions.iter().sum();
        assert_eq!(natoms, out.pos_cart.len());
        assert_eq!(natoms, out.magmom.len());
    }

    #[test]
    fn test_parse_noncollinear_outcar_uses_last_column() {
        let out = parse_content(NONCOLLINEAR_OUTCAR, DftCode::Vasp).unwrap();

        assert!(out.noncollinear);
        assert_eq!(out.species, vec!["Mn"]);
        assert_eq!(out.magmom[0], [1.003, 0.500, 3.010]);
        assert_eq!(out.magmom[1], [-1.003, 0.500, 3.010]);
    }

    #[test]
    fn test_missing_lattice_is_named() {
        let content = COLLINEAR_OUTCAR.replace("direct lattice vectors", "lattice omitted");
        match parse_content(&content, DftCode::Vasp) {
            Err(MagviewError::MissingKeys { keys, .. }) => assert_eq!(keys, vec!["lattice"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_species_is_named() {
        let content = COLLINEAR_OUTCAR.replace("VRHFIN", "TITEL");
        match parse_content(&content, DftCode::Vasp) {
            Err(MagviewError::MissingKeys { keys, .. }) => assert_eq!(keys, vec!["species"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_component_block_reports_magmom() {
        let content = NONCOLLINEAR_OUTCAR.replace("magnetization (y)", "orbital moment (y)");
        match parse_content(&content, DftCode::Vasp) {
            Err(MagviewError::MissingKeys { keys, .. }) => assert_eq!(keys, vec!["magmom"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_position_fails_whole_parse() {
        let content = COLLINEAR_OUTCAR.replace("2.00000000  2.00000000", "2.00000000  two");
        assert!(matches!(
            parse_content(&content, DftCode::Vasp),
            Err(MagviewError::ParseError { .. })
        ));
    }

    #[test]
    fn test_positions_before_ion_counts() {
        let content = " position of ions in cartesian coordinates  (Angst):\n 0 0 0\n";
        assert!(matches!(
            parse_content(content, DftCode::Vasp),
            Err(MagviewError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_overflowing_ion_counts() {
        let content = COLLINEAR_OUTCAR.replace(
            "ions per type =               2   1",
            "ions per type =               18446744073709551615   1",
        );
        match parse_content(&content, DftCode::Vasp) {
            Err(MagviewError::ParseError { reason, .. }) => assert!(reason.contains("overflow")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let content = format!(
            "{}\n position of ions in cartesian coordinates  (Angst):\n 0.1 0.0 0.0\n 2.1 2.0 0.0\n 2.1 0.0 2.0\n",
            COLLINEAR_OUTCAR
        );
        let out = parse_content(&content, DftCode::Vasp).unwrap();
        assert_eq!(out.pos_cart[0], [0.1, 0.0, 0.0]);
    }

    #[test]
    fn test_duplicate_species_are_not_merged() {
        let content = COLLINEAR_OUTCAR.replace(
            "   VRHFIN =O: s2p4\n",
            "   VRHFIN =O: s2p4\n   VRHFIN =Fe: d7 s1\n",
        );
        assert!(matches!(
            parse_content(&content, DftCode::Vasp),
            Err(MagviewError::InconsistentRecord { .. })
        ));
    }
}

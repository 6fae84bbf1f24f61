//! # info 命令实现
//!
//! 解析 DFT 输出文件并打印摘要。
//!
//! ## 功能
//! - 物种与原子数表
//! - 晶格参数、体积
//! - 总磁矩与绝对总磁矩
//! - 每原子坐标与磁矩表，可导出 CSV
//! - 完整解析记录导出为 JSON
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `commands/mod.rs` 的 `load_output`
//! - 使用 `utils/output.rs`

use crate::cli::info::InfoArgs;
use crate::error::{MagviewError, Result};
use crate::models::ParsedOutput;
use crate::utils::output;

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 物种统计行
#[derive(Debug, Clone, Tabled)]
struct SpeciesRow {
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Count")]
    count: usize,
}

/// 每原子行
#[derive(Debug, Clone, Tabled)]
struct AtomRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "x (Å)")]
    x: String,
    #[tabled(rename = "y (Å)")]
    y: String,
    #[tabled(rename = "z (Å)")]
    z: String,
    #[tabled(rename = "mx")]
    mx: String,
    #[tabled(rename = "my")]
    my: String,
    #[tabled(rename = "mz")]
    mz: String,
    #[tabled(rename = "|m| (μB)")]
    magnitude: String,
}

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let parsed = super::load_output(&args.input)?;

    print_summary(&parsed);

    if !args.summary_only {
        output::print_header("Per-atom Magnetic Moments");
        println!("{}", Table::new(atom_rows(&parsed)));
    }

    if let Some(ref path) = args.csv {
        save_atoms_csv(&parsed, path)?;
        output::print_success(&format!("Per-atom table saved to '{}'", path.display()));
    }

    if let Some(ref path) = args.json {
        save_json(&parsed, path)?;
        output::print_success(&format!("Parsed record saved to '{}'", path.display()));
    }

    Ok(())
}

fn print_summary(parsed: &ParsedOutput) {
    output::print_header(&format!("{} Output Summary", parsed.code));

    let species_rows: Vec<SpeciesRow> = parsed
        .species
        .iter()
        .zip(&parsed.nions)
        .map(|(s, &n)| SpeciesRow {
            species: s.clone(),
            count: n,
        })
        .collect();
    println!("{}\n", Table::new(species_rows));

    let (a, b, c, alpha, beta, gamma) = parsed.lattice.parameters();
    let total = parsed.total_moment();

    output::print_field("Atoms", &parsed.natoms().to_string());
    output::print_field(
        "Spin mode",
        if parsed.noncollinear {
            "non-collinear"
        } else {
            "collinear"
        },
    );
    output::print_field("a, b, c (Å)", &format!("{:.4}, {:.4}, {:.4}", a, b, c));
    output::print_field(
        "α, β, γ (°)",
        &format!("{:.2}, {:.2}, {:.2}", alpha, beta, gamma),
    );
    output::print_field(
        "Volume (Å³)",
        &format!("{:.4}", parsed.lattice.volume().abs()),
    );
    output::print_field(
        "Total moment (μB)",
        &format!("[{:.4}, {:.4}, {:.4}]", total[0], total[1], total[2]),
    );
    output::print_field(
        "Total |m| (μB)",
        &format!("{:.4}", parsed.total_abs_moment()),
    );

    if parsed.species.len() != parsed.unique_species().len() {
        output::print_warning("Species list contains repeated entries; they are kept as read.");
    }
}

fn atom_rows(parsed: &ParsedOutput) -> Vec<AtomRow> {
    parsed
        .symbols()
        .into_iter()
        .zip(&parsed.pos_cart)
        .zip(&parsed.magmom)
        .enumerate()
        .map(|(i, ((sym, p), m))| AtomRow {
            index: i + 1,
            species: sym.to_string(),
            x: format!("{:.4}", p[0]),
            y: format!("{:.4}", p[1]),
            z: format!("{:.4}", p[2]),
            mx: format!("{:.3}", m[0]),
            my: format!("{:.3}", m[1]),
            mz: format!("{:.3}", m[2]),
            magnitude: format!("{:.3}", crate::models::output::norm(m)),
        })
        .collect()
}

/// 保存每原子数据到 CSV
fn save_atoms_csv(parsed: &ParsedOutput, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["index", "species", "x", "y", "z", "mx", "my", "mz", "magnitude"])?;

    for (i, ((sym, p), m)) in parsed
        .symbols()
        .into_iter()
        .zip(&parsed.pos_cart)
        .zip(&parsed.magmom)
        .enumerate()
    {
        wtr.write_record(&[
            (i + 1).to_string(),
            sym.to_string(),
            format!("{:.8}", p[0]),
            format!("{:.8}", p[1]),
            format!("{:.8}", p[2]),
            format!("{:.6}", m[0]),
            format!("{:.6}", m[1]),
            format!("{:.6}", m[2]),
            format!("{:.6}", crate::models::output::norm(m)),
        ])?;
    }

    wtr.flush().map_err(|e| MagviewError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 保存完整解析记录为 JSON
fn save_json(parsed: &ParsedOutput, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(parsed)?;
    fs::write(output_path, json).map_err(|e| MagviewError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DftCode;
    use crate::parsers::{parse_content, siesta};

    fn parsed() -> ParsedOutput {
        parse_content(siesta::tests::COLLINEAR_SIESTA, DftCode::Siesta).unwrap()
    }

    #[test]
    fn test_atom_rows() {
        let rows = atom_rows(&parsed());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].species, "O");
        assert_eq!(rows[0].mz, "2.150");
        assert_eq!(rows[1].magnitude, "2.150");
    }

    #[test]
    fn test_save_atoms_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moments.csv");
        save_atoms_csv(&parsed(), &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][1], "Fe");
        assert_eq!(&records[1][7], "-2.150000");
    }

    #[test]
    fn test_save_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        save_json(&parsed(), &path).unwrap();

        let back: ParsedOutput = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.species, vec!["Fe", "O"]);
        assert_eq!(back.code, DftCode::Siesta);
        assert_eq!(back.magmom, parsed().magmom);
    }
}

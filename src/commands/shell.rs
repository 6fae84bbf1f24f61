//! # shell 命令实现
//!
//! 交互式会话：一次解析，多次调整显示参数并渲染。
//! 会话拥有 `DisplayState`，只有用户命令会修改它；`reset` 恢复默认值。
//! 单条命令失败只打印错误，会话继续。
//!
//! ## 命令
//! ```text
//! show                      当前显示参数
//! set <field> <value>       修改参数（字段名见 show）
//! species <sym...>|all|none 选择显示的物种
//! toggle cell|bonds|moments 开关
//! reset                     恢复默认值
//! render [path]             写出场景
//! info                      解析结果摘要
//! help / quit
//! ```
//!
//! ## 依赖关系
//! - 使用 `cli/shell.rs` 定义的参数
//! - 使用 `commands/mod.rs` 的公共流程
//! - 使用 `utils/output.rs`

use crate::cli::shell::ShellArgs;
use crate::error::{MagviewError, Result};
use crate::models::{DisplayState, ParsedOutput};
use crate::utils::output;

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "\
  show                        print the current display options
  set <field> <value>         change one option (e.g. set atom_size 0.8)
  species <sym...>|all|none   choose the species to show
  toggle cell|bonds|moments   flip a switch
  reset                       restore every option to its default
  render [path]               write the scene (default output if no path)
  info                        summary of the parsed file
  help                        this text
  quit                        leave the session";

/// 会话命令
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Show,
    Set { field: String, value: String },
    Species(SpeciesChoice),
    Toggle(String),
    Reset,
    Render(Option<PathBuf>),
    Info,
    Help,
    Quit,
}

/// 物种选择
#[derive(Debug, Clone, PartialEq)]
pub enum SpeciesChoice {
    All,
    None,
    Only(Vec<String>),
}

impl ShellCommand {
    /// 解析一行输入；空行返回 None
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let cmd = match (head.to_lowercase().as_str(), rest.as_slice()) {
            ("show", []) => ShellCommand::Show,
            ("set", [field, value]) => ShellCommand::Set {
                field: field.to_string(),
                value: value.to_string(),
            },
            ("species", ["all"]) => ShellCommand::Species(SpeciesChoice::All),
            ("species", ["none"]) => ShellCommand::Species(SpeciesChoice::None),
            ("species", symbols) if !symbols.is_empty() => ShellCommand::Species(
                SpeciesChoice::Only(symbols.iter().map(|s| s.to_string()).collect()),
            ),
            ("toggle", [what]) => ShellCommand::Toggle(what.to_string()),
            ("reset", []) => ShellCommand::Reset,
            ("render", []) => ShellCommand::Render(None),
            ("render", [path]) => ShellCommand::Render(Some(PathBuf::from(path))),
            ("info", []) => ShellCommand::Info,
            ("help" | "?", _) => ShellCommand::Help,
            ("quit" | "exit" | "q", []) => ShellCommand::Quit,
            (other, _) => {
                return Err(MagviewError::InvalidOption(format!(
                    "cannot understand '{}' (type 'help')",
                    if rest.is_empty() {
                        other.to_string()
                    } else {
                        line.trim().to_string()
                    }
                )))
            }
        };
        Ok(Some(cmd))
    }
}

/// 命令执行后会话是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 交互式会话
pub struct Session {
    parsed: ParsedOutput,
    state: DisplayState,
    default_output: PathBuf,
}

impl Session {
    pub fn new(parsed: ParsedOutput, state: DisplayState, default_output: PathBuf) -> Self {
        Session {
            parsed,
            state,
            default_output,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// 执行一条命令
    pub fn execute(&mut self, cmd: ShellCommand) -> Result<Flow> {
        match cmd {
            ShellCommand::Show => self.show(),
            ShellCommand::Set { field, value } => {
                self.state.set_field(&field, &value)?;
                output::print_success(&format!("{} = {}", field, value));
            }
            ShellCommand::Species(choice) => self.select_species(choice)?,
            ShellCommand::Toggle(what) => {
                let current = match what.as_str() {
                    "cell" => self.state.show_cell,
                    "bonds" => self.state.show_bonds,
                    "moments" => self.state.show_moments,
                    _ => {
                        return Err(MagviewError::InvalidOption(format!(
                            "cannot toggle '{}' (cell, bonds, moments)",
                            what
                        )))
                    }
                };
                let value = if current { "off" } else { "on" };
                self.state.set_field(&what, value)?;
                output::print_success(&format!("{} {}", what, value));
            }
            ShellCommand::Reset => {
                self.state.reset(self.parsed.unique_species());
                output::print_success("Display options reset to defaults");
            }
            ShellCommand::Render(path) => {
                let path = path.unwrap_or_else(|| self.default_output.clone());
                let format = super::resolve_format(&path, None);
                let scene = super::render_scene(&self.parsed, &self.state, &path, format)?;
                output::print_success(&format!(
                    "Scene ({} arrows) saved to '{}'",
                    scene.arrows.len(),
                    path.display()
                ));
            }
            ShellCommand::Info => {
                output::print_field("Code", &self.parsed.code.to_string());
                output::print_field("Atoms", &self.parsed.natoms().to_string());
                output::print_field("Species", &self.parsed.unique_species().join(", "));
            }
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn select_species(&mut self, choice: SpeciesChoice) -> Result<()> {
        let available = self.parsed.unique_species();
        let selection = match choice {
            SpeciesChoice::All => available,
            SpeciesChoice::None => Vec::new(),
            SpeciesChoice::Only(symbols) => {
                if let Some(unknown) = symbols.iter().find(|&s| !available.contains(s)) {
                    return Err(MagviewError::UnknownSpecies {
                        symbol: unknown.clone(),
                        available: available.join(", "),
                    });
                }
                symbols
            }
        };

        if selection.is_empty() {
            output::print_warning("No species selected; rendering will fail until one is chosen");
        }
        self.state.species = selection;
        Ok(())
    }

    fn show(&self) {
        let s = &self.state;
        let on_off = |b: bool| if b { "on" } else { "off" };
        output::print_field("species", &s.species.join(", "));
        output::print_field("cell", on_off(s.show_cell));
        output::print_field("bonds", on_off(s.show_bonds));
        output::print_field("moments", on_off(s.show_moments));
        output::print_field("min_magmom", &s.min_magmom.to_string());
        output::print_field("max_magmom", &s.max_magmom.to_string());
        output::print_field("zoom", &s.zoom_factor.to_string());
        output::print_field("atom_size", &s.atom_size.to_string());
        output::print_field("cell_thickness", &s.cell_thickness.to_string());
        output::print_field("rot_x", &s.rotation[0].to_string());
        output::print_field("rot_y", &s.rotation[1].to_string());
        output::print_field("rot_z", &s.rotation[2].to_string());
        output::print_field("arrow_scale", &s.arrow_scale_factor.to_string());
        output::print_field("arrow_radius", &s.arrow_radius.to_string());
        output::print_field("arrow_color", s.arrow_color.as_str());
    }
}

/// 执行 shell 命令
pub fn execute(args: ShellArgs) -> Result<()> {
    output::print_header("magview interactive session");

    let parsed = super::load_output(&args.input)?;
    let state = super::initial_state(&parsed, &args.display)?;
    let mut session = Session::new(parsed, state, args.output);

    output::print_info("Type 'help' for the list of commands");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{} ", "magview>".cyan().bold());
        io::stdout().flush().ok();

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| MagviewError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
        if read == 0 {
            println!();
            break;
        }

        let flow = ShellCommand::parse(&line).and_then(|cmd| match cmd {
            Some(cmd) => session.execute(cmd),
            None => Ok(Flow::Continue),
        });
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => output::print_error(&e.to_string()),
        }
    }

    Ok(())
}

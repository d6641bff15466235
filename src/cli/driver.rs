use anyhow::{Result, bail};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

use crate::cli::args::{CliArgs, OutputFormat};
use crate::{
    Declaration, MergeOptions, ModuleDeclaration, SymbolTable, build_symbol_table, load_options,
};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_DIAGNOSTICS_REPORTED: i32 = 1;

#[derive(Debug)]
pub struct RunResult {
    pub table: Arc<SymbolTable>,
    /// Rendered table, per the requested output format.
    pub output: String,
}

impl RunResult {
    pub fn exit_code(&self) -> i32 {
        if self.table.has_errors() {
            EXIT_DIAGNOSTICS_REPORTED
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Resolve the effective options: the options file first, then flags.
pub fn resolve_options(args: &CliArgs) -> Result<MergeOptions> {
    let mut options = match &args.options {
        Some(path) => load_options(path)?,
        None => MergeOptions::default(),
    };
    if let Some(libs) = &args.lib {
        options.libs = libs.clone();
    }
    if args.no_lib {
        options.libs.clear();
    }
    if args.no_overload_report {
        options.report_overload_ambiguity = false;
    }
    if args.no_cross_module {
        options.resolve_across_modules = false;
    }
    Ok(options)
}

pub fn run(args: &CliArgs) -> Result<RunResult> {
    let options = resolve_options(args)?;
    info!(files = args.files.len(), libs = ?options.libs, "building symbol table");
    let table = build_symbol_table(options, &args.files)?;
    let output = render_table(&table, args)?;
    Ok(RunResult { table, output })
}

fn render_table(table: &SymbolTable, args: &CliArgs) -> Result<String> {
    let mut out = String::new();

    if !args.global.is_empty() || !args.module.is_empty() {
        for name in &args.global {
            let Some(declaration) = table.lookup_global(name) else {
                bail!("no global declaration named '{name}'");
            };
            write_declaration(&mut out, declaration);
        }
        for name in &args.module {
            let Some(module) = table.lookup_module(name) else {
                bail!("no ambient module named '{name}'");
            };
            write_module(&mut out, module);
        }
        return Ok(out);
    }

    match args.format {
        OutputFormat::Json => out.push_str(&table.to_json()?),
        OutputFormat::Summary => {
            for declaration in table.globals() {
                write_declaration(&mut out, declaration);
            }
            for module in table.modules() {
                write_module(&mut out, module);
            }
        }
        OutputFormat::None => {}
    }
    Ok(out)
}

fn write_declaration(out: &mut String, declaration: &Declaration) {
    let _ = writeln!(out, "interface {}", declaration.key());
    for member in declaration.members() {
        for signature in member.signatures() {
            let _ = writeln!(out, "  {}{}", member.name, signature);
        }
    }
}

fn write_module(out: &mut String, module: &ModuleDeclaration) {
    if module.is_opaque() {
        let _ = writeln!(out, "module \"{}\" (opaque)", module.name);
        return;
    }
    let _ = writeln!(out, "module \"{}\"", module.name);
    for declaration in &module.declarations {
        write_declaration(out, declaration);
    }
}

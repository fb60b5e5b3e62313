//! Command line front end: list targets, print gated headers, run a registry over a
//! list of request tokens, or check a table against the standard vocabulary.
//!
//! ```bash
//! abitypes emit --target armv7-none-eabi size_t uintptr_t size_t
//! abitypes header --target x86_64-linux-musl > alltypes.h
//! ABITYPES_LOG=debug abitypes check --defs my-target.toml
//! ```

use std::path::PathBuf;

use abitypes::abi::{vocabulary, Dialect, LayoutCalc, LayoutTable};
use abitypes::emit::{render_header, RenderStyle};
use abitypes::loader;
use abitypes::registry::{Registry, RegistryOptions};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "abitypes")]
#[command(about = "Platform ABI type registry")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in targets
    Targets,

    /// Print the complete gated header for a target
    Header {
        #[command(flatten)]
        table: TableArgs,
    },

    /// Request type names in order and print what gets defined
    Emit {
        #[command(flatten)]
        table: TableArgs,

        /// Resolve requests for a C++ unit
        #[arg(long)]
        cxx: bool,

        /// Fail on names the target does not define
        #[arg(long)]
        strict: bool,

        /// Keep _Addr, _Int64 and _Reg unexpanded
        #[arg(long)]
        portable: bool,

        /// Guard already set by another producer (can repeat)
        #[arg(long = "preset", value_name = "GUARD")]
        presets: Vec<String>,

        /// Request tokens, in program order
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Validate a table against the standard vocabulary and print layouts
    Check {
        #[command(flatten)]
        table: TableArgs,
    },
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Built-in target name
    #[arg(short, long, conflicts_with = "defs")]
    target: Option<String>,

    /// Target table file
    #[arg(short, long)]
    defs: Option<PathBuf>,
}

impl TableArgs {
    fn load(&self) -> Result<LayoutTable> {
        match (&self.target, &self.defs) {
            (_, Some(path)) => loader::load_path(path)
                .with_context(|| format!("loading {}", path.display())),
            (Some(name), None) => {
                loader::builtin(name).with_context(|| format!("loading built-in target {name}"))
            }
            (None, None) => bail!("one of --target or --defs is required"),
        }
    }
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_env("ABITYPES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Targets => {
            for name in loader::builtin_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Header { table } => {
            print!("{}", render_header(&table.load()?));
            Ok(())
        }
        Command::Emit {
            table,
            cxx,
            strict,
            portable,
            presets,
            names,
        } => {
            let table = table.load()?;
            let dialect = if cxx { Dialect::Cxx } else { Dialect::C };
            let mut options = RegistryOptions::new(dialect);
            if strict {
                options = options.strict();
            }
            let mut unit = Registry::new(&table, options);
            for guard in presets {
                unit.preset(guard);
            }
            if strict {
                unit.check_requests(names.iter().map(String::as_str))?;
            }
            unit.request_all(names.iter().map(String::as_str));
            let style = if portable {
                RenderStyle::Portable
            } else {
                RenderStyle::Resolved
            };
            print!("{}", unit.render(style));
            Ok(())
        }
        Command::Check { table } => check(&table.load()?),
    }
}

fn check(table: &LayoutTable) -> Result<()> {
    let diagnostics = table.check_vocabulary(vocabulary::STANDARD);
    for dialect in [Dialect::C, Dialect::Cxx] {
        let calc = LayoutCalc::new(table, dialect);
        println!("# {} [{dialect}]", table.target());
        for name in table.names() {
            if table.lookup(name.as_str(), dialect).is_none() {
                continue;
            }
            match calc.entry(name.as_str()) {
                Some(layout) => println!("{name:<24} size {:>3}  align {:>2}", layout.size, layout.align),
                None => println!("{name:<24} incomplete"),
            }
        }
    }
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            eprintln!("{diagnostic}");
        }
        bail!("{} vocabulary defect(s)", diagnostics.len());
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tikzplot::options::OptionStore;
use tikzplot::storage;

#[derive(Parser, Debug)]
#[command(
    name = "tikzplot",
    version,
    about = "Turn chart descriptions into pgfplots/TikZ markup"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON chart description.
    Render(RenderArgs),
    /// Normalise an option string and print one option per line.
    Options {
        /// Comma separated key=value list, e.g. "xmin=0, group style={rows=2}"
        options: String,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart description (JSON).
    input: PathBuf,
    /// Write the markup here instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Colorbrewer2 palette used as cycle list (e.g. Dark2, Set1-5).
    #[arg(long)]
    palette: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Options { options } => {
            let store = OptionStore::parse(&options);
            for (name, value) in &store {
                if value.is_empty() {
                    println!("{name}");
                } else {
                    println!("{name}={value}");
                }
            }
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let chart = storage::load_chart(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let mut picture = chart.picture().context("failed to build figures")?;
    if let Some(palette) = &args.palette {
        picture.set_palette(palette);
    }

    match args.out.as_ref() {
        Some(path) => {
            picture
                .write_to_path(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} figure(s) to {}",
                picture.items().len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            picture.write_to(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kuvio::{params::Parameter, Session};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "kuvio",
    version,
    about = "Generate a mosaic image from parameters and write it as SVG or a raster image"
)]
struct Cli {
    /// Override a parameter, e.g. `--set columns=12` or `--set fill=teal`.  May be repeated.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Size of the preview display, e.g. `800x600`
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    viewport: Option<(u32, u32)>,

    /// Print every parameter with its value and range, then exit
    #[arg(long)]
    list: bool,

    /// Files to write.  `.svg` gets the vector markup, other extensions (`.png`, `.jpg`, ...)
    /// get the rendered raster.
    outputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut session = Session::mosaic().context("building mosaic parameters")?;
    if cli.list {
        for param in session.params().iter() {
            println!("{}", describe(param));
        }
        return Ok(());
    }

    for (name, value) in &cli.assignments {
        session
            .params_mut()
            .set_from_str(name, value)
            .with_context(|| format!("can't set {} to {:?}", name, value))?;
    }
    let artifact = session.refresh().context("generating image")?;
    info!(width = artifact.width, height = artifact.height, "image ready");

    if let Some((width, height)) = cli.viewport {
        session.resize(width, height);
        if let Some(frame) = session.pipeline().display().frame() {
            let (w, h) = frame.dimensions();
            println!("preview: {}x{}", w, h);
        }
    }

    for path in &cli.outputs {
        session
            .export_to(path)
            .with_context(|| format!("exporting {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn describe(param: &Parameter) -> String {
    match param {
        Parameter::Numeric(p) => {
            let (min, max) = p.range();
            format!("{} = {} [{}, {}]", p.name(), p.value(), min, max)
        }
        Parameter::Color(p) => format!("{} = {}", p.name(), p.value()),
        Parameter::Choice(p) => format!("{} = {} {:?}", p.name(), p.value(), p.options()),
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    Ok((name.trim().to_owned(), value.trim().to_owned()))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
    let parse = |n: &str| n.trim().parse::<u32>().map_err(|e| format!("{:?}: {}", n, e));
    Ok((parse(w)?, parse(h)?))
}

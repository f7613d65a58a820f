use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compile_css")]
#[command(about = "Merge, deduplicate and reorganize a stylesheet")]
pub struct Cli {
    /// Stylesheet to compile
    #[arg(default_value = "styles.css")]
    pub input: PathBuf,

    /// Destination file; an existing one is kept as `<name>.backup.<ext>`
    #[arg(short, long, default_value = "styles_compiled.css")]
    pub output: PathBuf,

    /// Sort selectors alphabetically within each scope
    #[arg(short, long)]
    pub alphabetical: bool,

    /// Also move rules using :hover, :link, :nth-* and similar when sorting
    #[arg(long = "unsafe")]
    pub unsafe_sort: bool,
}

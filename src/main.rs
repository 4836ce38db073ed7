use anyhow::{Context, Result};
use clap::Parser;
use riffnav::{ids::FourCC, RiffReader};
use std::{
    io::{Read, Seek},
    path::PathBuf,
};

/// Prints the chunk tree of a RIFF file
#[derive(Parser, Debug)]
#[command(name = "riffnav")]
struct Cli {
    /// File to inspect
    path: PathBuf,

    /// Expected form type of the outermost RIFF chunk
    #[arg(short, long, default_value = "WAVE")]
    form: String,

    /// Read buffer size in bytes
    #[arg(short, long, value_name = "BYTES")]
    capacity: Option<usize>,
}

fn print_top<S: Read + Seek>(reader: &RiffReader<S>) {
    if let Some(info) = reader.current() {
        let indent = 2 * (reader.depth() - 1);
        match info.form_type {
            Some(ty) => println!(
                "{:indent$}{} '{}' @{:#x} {} byte(s)",
                "",
                FourCC(info.id),
                FourCC(ty),
                info.header_offset(),
                info.size,
                indent = indent
            ),
            None => println!(
                "{:indent$}{} @{:#x} {} byte(s)",
                "",
                FourCC(info.id),
                info.header_offset(),
                info.size,
                indent = indent
            ),
        }
    }
}

// prints every child of the current chunk, depth first
fn walk<S: Read + Seek>(reader: &mut RiffReader<S>) -> Result<()> {
    loop {
        match reader.descend() {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        print_top(reader);
        if reader.current().map_or(false, |info| info.is_container()) {
            walk(reader)?;
        }
        reader.ascend()?;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut reader = match cli.capacity {
        Some(capacity) => {
            RiffReader::open_with_capacity(&cli.path, &cli.form, capacity)
        }
        None => RiffReader::open(&cli.path, &cli.form),
    }
    .with_context(|| format!("failed to open {}", cli.path.display()))?;

    print_top(&reader);
    walk(&mut reader)
        .with_context(|| format!("failed to walk {}", cli.path.display()))?;

    reader.close();
    Ok(())
}

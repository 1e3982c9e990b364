//! Convert command implementation

use crate::cli::{ConvertArgs, GeometryFormat};
use crate::errors::decode_failed;
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use ground_core::codec::{self, StoreValue};
use ground_core::models::Geometry;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

pub fn execute(args: ConvertArgs, output: &OutputWriter) -> Result<()> {
    let input = read_input(&args.input)?;
    let geometry = parse(args.from, &input)?;
    tracing::debug!(geometry_type = geometry.geometry_type(), "Parsed input geometry");

    let bytes = render(args.to, &geometry)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.geometry_written(&geometry, path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            if args.to != GeometryFormat::Wire {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn parse(format: GeometryFormat, input: &[u8]) -> Result<Geometry> {
    let decoded = match format {
        GeometryFormat::Geometry => {
            return serde_json::from_slice(input).context("Input is not a valid geometry JSON document")
        }
        GeometryFormat::Store => {
            let value: StoreValue =
                serde_json::from_slice(input).context("Input is not valid store map JSON")?;
            codec::from_store_map(Some(&value)).map_err(|e| ("store map", e))
        }
        GeometryFormat::Wire => codec::decode_geometry(input).map_err(|e| ("wire", e)),
    };

    match decoded {
        Ok(geometry) => Ok(geometry),
        Err((source, error)) => {
            let cli_error = decode_failed(source, &error);
            cli_error.display();
            bail!("{}: {}", cli_error, error)
        }
    }
}

fn render(format: GeometryFormat, geometry: &Geometry) -> Result<Vec<u8>> {
    let bytes = match format {
        GeometryFormat::Geometry => serde_json::to_vec_pretty(geometry)?,
        GeometryFormat::Store => serde_json::to_vec_pretty(&codec::to_store_map(geometry))?,
        GeometryFormat::Wire => codec::encode_geometry(geometry),
    };
    Ok(bytes)
}

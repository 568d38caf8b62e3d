/// ArcInfo ASCII grid to scene manifest converter main entry point
mod asc;
mod converter;
mod manifest;

use constants::grid::DEFAULT_EXAGGERATION;
use converter::GridConverter;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <input.asc> [exaggeration]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let exaggeration = match args.get(2) {
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|_| format!("exaggeration is not numeric: '{}'", raw))?,
        None => DEFAULT_EXAGGERATION,
    };

    let converter = GridConverter::new(input_path, exaggeration)?;
    converter.convert()?;

    Ok(())
}

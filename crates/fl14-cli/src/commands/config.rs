use fl14_core::config::{load_config, Fl14Config};
use fl14_core::error::Fl14Error;
use std::path::Path;

/// The config at `path`, or the defaults when no file is given.
pub fn resolve(path: Option<&Path>) -> Result<Fl14Config, Fl14Error> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Fl14Config::default()),
    }
}

pub fn print_default() -> Result<(), Fl14Error> {
    let json = serde_json::to_string_pretty(&Fl14Config::default())?;
    println!("{json}");
    Ok(())
}

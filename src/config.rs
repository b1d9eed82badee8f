//! Command line configuration

use std::path::PathBuf;

use clap::Parser;

use crate::choropleth::MapMode;
use crate::data::PropertyNames;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tui-choropleth")]
#[command(about = "Click regions to count treatment centers, or view population by region")]
pub struct Args {
    /// GeoJSON file with one polygon feature per region (built-in grid if omitted)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Feature property holding the region id
    #[arg(long, default_value = "id")]
    pub id_property: String,

    /// Feature property holding the region name
    #[arg(long, default_value = "name")]
    pub name_property: String,

    /// Start on the population map
    #[arg(long)]
    pub population: bool,

    /// Write logs to this file (the terminal is taken by the map)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Settings the application runs with
#[derive(Debug, Clone)]
pub struct Config {
    pub data: Option<PathBuf>,
    pub properties: PropertyNames,
    pub initial_mode: MapMode,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            data: args.data,
            properties: PropertyNames {
                id: args.id_property,
                name: args.name_property,
            },
            initial_mode: if args.population {
                MapMode::Population
            } else {
                MapMode::Treatment
            },
            log_file: args.log_file,
            log_level: args.log_level,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Args::parse().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = Args::parse_from(["tui-choropleth"]).into();
        assert!(config.data.is_none());
        assert_eq!(config.properties.id, "id");
        assert_eq!(config.properties.name, "name");
        assert_eq!(config.initial_mode, MapMode::Treatment);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_flags() {
        let config: Config = Args::parse_from([
            "tui-choropleth",
            "--data",
            "guinea.json",
            "--name-property",
            "NAME_2",
            "--population",
            "--log-file",
            "map.log",
        ])
        .into();
        assert_eq!(config.data, Some(PathBuf::from("guinea.json")));
        assert_eq!(config.properties.name, "NAME_2");
        assert_eq!(config.initial_mode, MapMode::Population);
        assert_eq!(config.log_file, Some(PathBuf::from("map.log")));
    }
}

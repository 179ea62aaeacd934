use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use revgeo::{IndexConfig, Place, ReverseGeocoder};
use tracing_subscriber::EnvFilter;

/// Reverse geocode coordinates against a GeoNames dump.
///
/// With LAT and LON, answers a single query. Without them, reads
/// whitespace-separated `lat lon` pairs from stdin, one per line.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GeoNames place file (allCountries.txt or a per-country extract)
    #[arg(long, env = "REVGEO_PLACES")]
    places: PathBuf,

    /// GeoNames countryInfo.txt
    #[arg(long, env = "REVGEO_COUNTRIES")]
    countries: PathBuf,

    /// Maximum points per leaf of the spatial index
    #[arg(long, env = "REVGEO_LEAF_CAPACITY", default_value_t = revgeo::index::DEFAULT_LEAF_CAPACITY)]
    leaf_capacity: usize,

    /// Print one JSON object per answer instead of plain text
    #[arg(long)]
    json: bool,

    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    lon: Option<f64>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = IndexConfig {
        leaf_capacity: cli.leaf_capacity,
    };
    let geocoder = ReverseGeocoder::load(&cli.places, &cli.countries, config)
        .context("Failed to initialize geocoder")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        let (place, km) = geocoder.lookup_with_distance(lat, lon)?;
        print_place(&mut out, &place, km, cli.json)?;
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_pair(line).map(|(lat, lon)| geocoder.lookup_with_distance(lat, lon)) {
            Some(Ok((place, km))) => print_place(&mut out, &place, km, cli.json)?,
            Some(Err(e)) => tracing::warn!(input = line, error = %e, "Lookup failed"),
            None => tracing::warn!(input = line, "Expected `lat lon`"),
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let lat = parts.next()?.parse().ok()?;
    let lon = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

fn print_place(out: &mut impl Write, place: &Place, km: f64, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, place)?;
        writeln!(out)?;
    } else {
        print_text(out, place, km)?;
    }
    Ok(())
}

fn print_text(out: &mut impl Write, place: &Place, km: f64) -> io::Result<()> {
    writeln!(out, "{}", place.place)?;
    writeln!(out, "  Country: {} ({})", place.country, place.country_code)?;
    writeln!(out, "  Distance: {:.2} km", km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_and_comma_separated_pairs() {
        assert_eq!(parse_pair("40.73 -73.99"), Some((40.73, -73.99)));
        assert_eq!(parse_pair("51.5,-0.12"), Some((51.5, -0.12)));
        assert_eq!(parse_pair("51.5, -0.12"), Some((51.5, -0.12)));
        assert_eq!(parse_pair("51.5"), None);
        assert_eq!(parse_pair("1 2 3"), None);
        assert_eq!(parse_pair("north south"), None);
    }

    #[test]
    fn json_output_matches_wire_shape() {
        let place = Place {
            place: "Tokyo".to_string(),
            country_code: "JP".to_string(),
            country: "Japan".to_string(),
        };
        let mut buf = Vec::new();
        print_place(&mut buf, &place, 3.2, true).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"place\":\"Tokyo\",\"countryCode\":\"JP\",\"country\":\"Japan\"}\n"
        );
    }

    #[test]
    fn cli_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "revgeo",
            "--places",
            "p.txt",
            "--countries",
            "c.txt",
            "-33.86",
            "151.2",
        ])
        .unwrap();
        assert_eq!(cli.lat, Some(-33.86));
        assert_eq!(cli.lon, Some(151.2));
        assert_eq!(cli.leaf_capacity, revgeo::index::DEFAULT_LEAF_CAPACITY);
    }
}

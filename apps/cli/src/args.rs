//! # CLI Argument Definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use phub::domain::package::{Dimensions, WeightUnit};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "phub")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Quote, book and track parcels against a location catalog")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON); `PHUB__SECTION__KEY` variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Location catalog: a JSON array of location records
    #[arg(long, global = true, default_value = "demos/catalog.json")]
    pub catalog: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report whether a postal code is serviceable
    Check {
        /// Six-digit postal code
        postal_code: String,
    },
    /// Estimate transit time and available tiers for a route
    Estimate {
        #[command(flatten)]
        route: RouteArgs,
        /// Service tier to check against both endpoints
        #[arg(long)]
        tier: Option<String>,
    },
    /// Price a parcel without booking it
    Quote {
        #[command(flatten)]
        route: RouteArgs,
        #[command(flatten)]
        parcel: ParcelArgs,
    },
    /// Create a booking and print it with its tracking history
    Book {
        #[command(flatten)]
        route: RouteArgs,
        #[command(flatten)]
        parcel: ParcelArgs,
        #[command(flatten)]
        parties: PartyArgs,
        /// Requested pickup date (YYYY-MM-DD)
        #[arg(long)]
        pickup_date: Option<NaiveDate>,
        /// Requested pickup slot, e.g. "10:00-13:00"
        #[arg(long)]
        pickup_slot: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Coupon code to redeem against the quote total
        #[arg(long)]
        coupon: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Origin postal code
    #[arg(long)]
    pub from: String,
    /// Destination postal code
    #[arg(long)]
    pub to: String,
}

#[derive(Debug, Args)]
pub struct ParcelArgs {
    /// Service tier (surface, air, express, premium, ...)
    #[arg(long)]
    pub tier: String,
    /// Parcel weight in `--unit`
    #[arg(long)]
    pub weight: Decimal,
    #[arg(long, value_enum, default_value_t = Unit::G)]
    pub unit: Unit,
    /// Dimensions in centimetres as LxWxH
    #[arg(long, value_parser = parse_dimensions)]
    pub dims: Option<Dimensions>,
    /// Declared value for insurance
    #[arg(long)]
    pub value: Option<Decimal>,
    #[arg(long)]
    pub fragile: bool,
    /// Cash on delivery instead of online payment
    #[arg(long)]
    pub cod: bool,
}

#[derive(Debug, Args)]
pub struct PartyArgs {
    #[arg(long)]
    pub sender_name: String,
    #[arg(long)]
    pub sender_phone: String,
    #[arg(long)]
    pub sender_address: String,
    #[arg(long)]
    pub receiver_name: String,
    #[arg(long)]
    pub receiver_phone: String,
    #[arg(long)]
    pub receiver_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Unit {
    G,
    Kg,
}

impl From<Unit> for WeightUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::G => Self::Gram,
            Unit::Kg => Self::Kilogram,
        }
    }
}

fn parse_dimensions(raw: &str) -> Result<Dimensions, String> {
    let parts = raw
        .split(['x', 'X'])
        .map(|part| part.trim().parse::<Decimal>().map_err(|e| format!("'{part}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [length, width, height] => Ok(Dimensions::new(*length, *width, *height)),
        _ => Err(format!("expected LxWxH, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn dimensions_parse() {
        let dims = parse_dimensions("30x20 x 10.5").unwrap();
        assert_eq!(dims.as_array(), [dec!(30), dec!(20), dec!(10.5)]);
        assert!(parse_dimensions("30x20").is_err());
        assert!(parse_dimensions("axbxc").is_err());
    }

    #[test]
    fn quote_arguments() {
        let cli = Cli::try_parse_from([
            "phub", "quote", "--from", "110001", "--to", "400001", "--tier", "air", "--weight", "1.5",
            "--unit", "kg", "--dims", "30x20x10", "--fragile", "--cod",
        ])
        .unwrap();

        let Command::Quote { route, parcel } = cli.command else { panic!("expected quote") };
        assert_eq!(route.from, "110001");
        assert_eq!(parcel.weight, dec!(1.5));
        assert_eq!(parcel.unit, Unit::Kg);
        assert!(parcel.fragile && parcel.cod);
        assert_eq!(cli.catalog, PathBuf::from("demos/catalog.json"));
    }

    #[test]
    fn global_options_after_the_subcommand() {
        let cli = Cli::try_parse_from(["phub", "check", "110001", "--catalog", "other.json"]).unwrap();
        assert_eq!(cli.catalog, PathBuf::from("other.json"));
        assert!(cli.config.is_none());
    }
}

//! Argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{PlanFilter, PlanSort, PricingType, SortKey, SortOrder, UtilityProvider};

#[derive(Debug, Parser)]
#[command(name = "energy-plans", version)]
#[command(about = "Scrape and explore New Hampshire residential energy supplier plans")]
pub struct Cli {
    /// Configuration file (TOML or JSON); defaults to config/default.toml, then
    /// the per-user energy-plans/config.toml, when present
    #[arg(long, short, global = true, env = "ENERGY_PLANS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape every configured provider and write one JSON file each
    Scrape(ScrapeArgs),
    /// Scrape one provider and print its plans as JSON
    Print(PrintArgs),
    /// Extract plans from a saved comparison page
    Parse(ParseArgs),
    /// Show a provider's saved plans as a filtered, sorted table
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Only these providers (repeatable); defaults to the configured list
    #[arg(long = "provider", short)]
    pub providers: Vec<UtilityProvider>,

    /// Output directory; defaults to the configured one
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Provider choice, e.g. Eversource
    pub provider: UtilityProvider,

    /// Single-line JSON instead of pretty printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Saved HTML of a comparison page
    pub file: PathBuf,

    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Provider whose saved file to show
    #[arg(required_unless_present = "file")]
    pub provider: Option<UtilityProvider>,

    /// Read this plan file instead of the provider's file
    #[arg(long, conflicts_with = "provider")]
    pub file: Option<PathBuf>,

    /// Directory of saved plan files; defaults to the configured output directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Case-insensitive substring of the supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    #[arg(long, value_enum)]
    pub pricing: Option<PricingArg>,

    /// Lowest renewable share, inclusive
    #[arg(long, default_value_t = 0.0)]
    pub min_renewable: f64,

    /// Highest renewable share, inclusive
    #[arg(long, default_value_t = 100.0)]
    pub max_renewable: f64,

    /// Only plans with (true) or without (false) a cancellation fee
    #[arg(long)]
    pub cancellation_fee: Option<bool>,

    /// Only plans with (true) or without (false) a monthly charge
    #[arg(long)]
    pub monthly_charge: Option<bool>,

    #[arg(long, value_enum, default_value_t = SortArg::Price)]
    pub sort: SortArg,

    /// Sort direction; renewable defaults to descending, everything else ascending
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PricingArg {
    Fixed,
    Variable,
    Unknown,
}

impl From<PricingArg> for PricingType {
    fn from(arg: PricingArg) -> Self {
        match arg {
            PricingArg::Fixed => Self::Fixed,
            PricingArg::Variable => Self::Variable,
            PricingArg::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Supplier,
    Price,
    Renewable,
    Term,
    Updated,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Supplier => Self::Supplier,
            SortArg::Price => Self::Price,
            SortArg::Renewable => Self::Renewable,
            SortArg::Term => Self::Term,
            SortArg::Updated => Self::Updated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl ListArgs {
    pub fn filter(&self) -> PlanFilter {
        PlanFilter {
            supplier_name: self.supplier.clone(),
            pricing_type: self.pricing.map(PricingType::from),
            renewable_range: (self.min_renewable, self.max_renewable),
            has_cancellation_fee: self.cancellation_fee,
            is_monthly_charge: self.monthly_charge,
        }
    }

    pub fn sort(&self) -> PlanSort {
        let key = SortKey::from(self.sort);
        let order = match self.order {
            Some(OrderArg::Asc) => SortOrder::Ascending,
            Some(OrderArg::Desc) => SortOrder::Descending,
            None => key.default_order(),
        };
        PlanSort { key, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["energy-plans", "list", "Eversource", "--sort", "renewable"]);
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.provider.as_ref().map(UtilityProvider::choice), Some("Eversource"));
        assert_eq!(args.filter(), PlanFilter::default());
        assert_eq!(
            args.sort(),
            PlanSort {
                key: SortKey::Renewable,
                order: SortOrder::Descending
            }
        );
    }

    #[test]
    fn test_list_filters_and_order() {
        let cli = Cli::parse_from([
            "energy-plans",
            "list",
            "--file",
            "plans.json",
            "--supplier",
            "acme",
            "--pricing",
            "fixed",
            "--min-renewable",
            "20",
            "--cancellation-fee",
            "false",
            "--order",
            "desc",
        ]);
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        let filter = args.filter();
        assert_eq!(filter.supplier_name.as_deref(), Some("acme"));
        assert_eq!(filter.pricing_type, Some(PricingType::Fixed));
        assert_eq!(filter.renewable_range, (20.0, 100.0));
        assert_eq!(filter.has_cancellation_fee, Some(false));
        assert_eq!(args.sort().order, SortOrder::Descending);
    }

    #[test]
    fn test_scrape_accepts_repeated_providers() {
        let cli = Cli::parse_from(["energy-plans", "scrape", "-p", "Liberty", "-p", "NHEC"]);
        let Command::Scrape(args) = cli.command else {
            panic!("expected scrape");
        };
        assert_eq!(args.providers.len(), 2);
    }

    #[test]
    fn test_bad_provider_is_rejected() {
        assert!(Cli::try_parse_from(["energy-plans", "print", "../etc"]).is_err());
    }
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use triage::RiskTier;

#[derive(Parser)]
#[command(name = "skintag")]
#[command(
    author,
    version,
    about = "Review a skin-lesion triage result and take the recommended next step"
)]
pub struct Cli {
    /// Configuration file path (built-in defaults are used when it does not exist)
    #[clap(short, long, global = true, default_value = "skintag.toml")]
    pub config: String,

    /// Enable verbose output with diagnostic logging
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a default configuration file
    Init {
        /// Overwrite an existing configuration without asking
        #[clap(long, default_value_t = false)]
        force: bool,
    },

    /// Show the probability breakdown and dominant category
    Classify {
        #[clap(flatten)]
        input: ResultInput,
    },

    /// Print the shareable text summary of a result
    Export {
        #[clap(flatten)]
        input: ResultInput,
    },

    /// Copy the text summary of a result to the clipboard
    Copy {
        #[clap(flatten)]
        input: ResultInput,
    },

    /// Share the text summary of a result, falling back to the clipboard
    Share {
        #[clap(flatten)]
        input: ResultInput,
    },

    /// Open the follow-up destination recommended for the result's risk tier
    Act {
        #[clap(flatten)]
        input: ResultInput,

        /// Override the risk tier stored in the result
        #[clap(short, long, value_enum)]
        tier: Option<TierArg>,

        /// Device latitude used to look up a nearby specialist
        #[clap(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Device longitude used to look up a nearby specialist
        #[clap(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Print the destination instead of launching a browser
        #[clap(long, default_value_t = false)]
        print_only: bool,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ResultInput {
    /// JSON file holding the analysis result
    #[clap(short, long, default_value = "result.json")]
    pub result: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierArg {
    Low,
    Moderate,
    High,
}

impl From<TierArg> for RiskTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Low => RiskTier::Low,
            TierArg::Moderate => RiskTier::Moderate,
            TierArg::High => RiskTier::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_act_arguments() {
        let cli = Cli::parse_from([
            "skintag", "act", "--result", "r.json", "--tier", "high", "--lat", "40.7", "--lon",
            "-73.9",
        ]);

        match cli.command {
            Commands::Act {
                input,
                tier,
                lat,
                lon,
                print_only,
            } => {
                assert_eq!(input.result, "r.json");
                assert_eq!(tier.map(RiskTier::from), Some(RiskTier::High));
                assert_eq!(lat, Some(40.7));
                assert_eq!(lon, Some(-73.9));
                assert!(!print_only);
            }
            _ => panic!("expected act command"),
        }
        assert_eq!(cli.config, "skintag.toml");
    }
}

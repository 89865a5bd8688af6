use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ergo-rt")]
#[command(about = "Ergo runtime toolbox - exercise formatting and scanning from the shell")]
#[command(version)]
#[command(after_help = "EXAMPLES:
  ergo-rt format \"x={} y={}\" 5 2.5        # prints x=5 y=2.500000
  echo \"3 4\" | ergo-rt scan \"{} {}\" -H int,int
  ergo-rt info --json                      # active runtime configuration")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interpolate literal arguments into a `{}` template
    Format {
        /// Template with `{}` placeholders
        template: String,

        /// Arguments: integers, floats, true/false, null, anything else is a string
        args: Vec<String>,
    },

    /// Scan each stdin line against a `{}` template
    Scan {
        /// Template with `{}` placeholders
        template: String,

        /// Type of each capture
        #[arg(short = 'H', long, value_delimiter = ',')]
        hints: Vec<Hint>,
    },

    /// Show version and runtime configuration
    Info {
        /// Print the configuration as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Hint {
    Int,
    Float,
    Bool,
    Str,
}

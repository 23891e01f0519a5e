pub mod holiday;
pub mod month;
pub mod schema;

// -----------------------------------------------------------------------------
// Cmd
// -----------------------------------------------------------------------------
pub trait Cmd {
    fn run(&self) -> anyhow::Result<()>;
}

// -----------------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "snake_case")]
pub enum Commands {
    /// Print the displayed weeks of a month
    Month(month::Args),

    /// Report the run of holidays around a date
    Holiday(holiday::Args),

    /// Print the JSON schema of the settings file
    Schema(schema::Args),
}

impl Cmd for Commands {
    fn run(&self) -> anyhow::Result<()> {
        match self {
            Commands::Month(args) => args.run(),
            Commands::Holiday(args) => args.run(),
            Commands::Schema(args) => args.run(),
        }
    }
}

use clap::Subcommand;

mod config;
mod day;
mod import;
mod init;
mod latest;
mod table;
mod ticker;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show or change configuration")]
    #[command(subcommand)]
    Config(config::ConfigCommand),

    #[command(about = "Show all quotations of a trading day")]
    Day(Box<day::DayCommand>),

    #[command(about = "Upsert quotations from a JSON or CSV file")]
    Import(Box<import::ImportCommand>),

    #[command(about = "Create the database and its indexes")]
    Init(Box<init::InitCommand>),

    #[command(about = "Show the latest quotations of a ticker")]
    Latest(Box<latest::LatestCommand>),

    #[command(about = "Show the quotation history of a ticker")]
    #[clap(visible_aliases = &["history"])]
    Ticker(Box<ticker::TickerCommand>),
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    brvmstore::utils::datetime::date_from_str(s).map_err(|err| err.to_string())
}

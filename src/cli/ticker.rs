use brvmstore::api;
use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::{
    parse_date,
    table::{RowKey, quotations_table},
};

#[derive(clap::Args)]
pub struct TickerCommand {
    #[arg(help = "Instrument symbol, e.g. SGBC")]
    ticker: String,

    #[arg(
        long = "from",
        value_parser = parse_date,
        help = "First date of the range; defaults to 30 days before the end"
    )]
    from: Option<NaiveDate>,

    #[arg(
        long = "to",
        value_parser = parse_date,
        help = "Last date of the range; defaults to today"
    )]
    to: Option<NaiveDate>,
}

impl TickerCommand {
    pub async fn exec(&self) {
        match api::ticker_history(&self.ticker, self.from, self.to).await {
            Ok(quotations) => {
                if quotations.is_empty() {
                    println!(
                        "[!] No quotation of '{}' in range",
                        self.ticker.to_uppercase().yellow()
                    );
                } else {
                    println!("{}", quotations_table(&quotations, RowKey::Date));
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                std::process::exit(1);
            }
        }
    }
}

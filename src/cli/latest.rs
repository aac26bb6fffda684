use brvmstore::api;
use colored::Colorize;

use crate::cli::table::{RowKey, quotations_table};

#[derive(clap::Args)]
pub struct LatestCommand {
    #[arg(help = "Instrument symbol, e.g. SGBC")]
    ticker: String,

    #[arg(short = 'n', default_value_t = 5, help = "Number of quotations")]
    limit: usize,
}

impl LatestCommand {
    pub async fn exec(&self) {
        match api::latest_quotations(&self.ticker, self.limit).await {
            Ok(quotations) => {
                if quotations.is_empty() {
                    println!(
                        "[!] No quotation of '{}'",
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

use brvmstore::{api, utils::datetime::date_to_str};
use colored::Colorize;

use crate::cli::{
    parse_date,
    table::{RowKey, quotations_table},
};

#[derive(clap::Args)]
pub struct DayCommand {
    #[arg(
        value_parser = parse_date,
        help = "Trading date, e.g. 2025-07-29; defaults to the last trading day"
    )]
    date: Option<chrono::NaiveDate>,
}

impl DayCommand {
    pub async fn exec(&self) {
        match api::quotations_of_day(self.date).await {
            Ok((date, quotations)) => {
                if quotations.is_empty() {
                    println!("[!] No quotation on {}", date_to_str(&date).yellow());
                } else {
                    println!("{}", date_to_str(&date).cyan());
                    println!("{}", quotations_table(&quotations, RowKey::Ticker));
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                std::process::exit(1);
            }
        }
    }
}

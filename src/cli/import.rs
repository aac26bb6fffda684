use std::path::PathBuf;

use brvmstore::api;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{Color, object::Columns};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct ImportCommand {
    #[arg(help = "JSON array or CSV file of quotations, keyed by column name")]
    file: PathBuf,

    #[arg(
        short = 'k',
        long = "key",
        help = "Service key granting write access, defaults to the SERVICE_KEY variable"
    )]
    key: Option<String>,
}

impl ImportCommand {
    pub async fn exec(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{msg}[{elapsed}] {spinner:.cyan}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));

        match api::import(&self.file, self.key.as_deref()).await {
            Ok(report) => {
                spinner.finish();

                let table_data: Vec<Vec<String>> = vec![
                    vec![
                        "file".to_string(),
                        report.path.to_string_lossy().to_string(),
                    ],
                    vec!["principal".to_string(), report.principal.to_string()],
                    vec!["inserted".to_string(), report.summary.inserted.to_string()],
                    vec!["replaced".to_string(), report.summary.replaced.to_string()],
                ];

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                spinner.finish_with_message(format!("{} ", err.to_string().red()));
                std::process::exit(1);
            }
        }
    }
}

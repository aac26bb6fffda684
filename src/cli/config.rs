use std::path::Path;

use brvmstore::{api, config::BsConfig};
use colored::Colorize;
use tabled::settings::{
    Color,
    object::{Columns, Rows},
};

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Set a configuration key and show the result")]
    Set { key: String, value: String },

    #[command(about = "Show the configuration")]
    Show,
}

impl ConfigCommand {
    pub async fn exec(&self) {
        let (result, changed) = match self {
            ConfigCommand::Set { key, value } => {
                (api::set_config(key, value).await, Some(key.to_lowercase()))
            }
            ConfigCommand::Show => (api::get_config().await, None),
        };

        match result {
            Ok(config) => {
                println!(
                    "{}",
                    config_table(&api::get_config_path(), &config, changed.as_deref())
                );
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                std::process::exit(1);
            }
        }
    }
}

/// Keys in the first column; the row of a key just set is highlighted.
fn config_table(path: &Path, config: &BsConfig, changed: Option<&str>) -> tabled::Table {
    let mut table_data: Vec<Vec<String>> =
        vec![vec!["config_file".to_string(), path.to_string_lossy().to_string()]];
    table_data.extend(
        config
            .entries()
            .into_iter()
            .map(|(key, value)| vec![key.to_string(), value]),
    );

    let changed_row = changed.and_then(|key| table_data.iter().position(|row| row[0] == key));

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Columns::first(), Color::FG_CYAN);
    if let Some(row) = changed_row {
        table.modify(Rows::new(row..row + 1), Color::FG_GREEN);
    }

    table
}

use brvmstore::api;
use colored::Colorize;

#[derive(clap::Args)]
pub struct InitCommand;

impl InitCommand {
    pub async fn exec(&self) {
        match api::init_database().await {
            Ok(path) => {
                println!("Database ready at '{}'", path.to_string_lossy().cyan());
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                std::process::exit(1);
            }
        }
    }
}

//! # brvmstore lib

use std::{
    env,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use directories::ProjectDirs;

pub mod access;
pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod import;
pub mod quotation;
pub mod store;
pub mod utils;

/// Sets up logging and the optional database override given on the command
/// line. Logging is configured by the `LOG` variable, e.g. `LOG=debug`.
pub fn init(database: Option<PathBuf>) {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();

    if let Some(database) = database {
        if let Ok(mut d) = DATABASE_OVERRIDE.write() {
            *d = Some(database);
        }
    }
}

static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("", "", env!("CARGO_PKG_NAME")));

static CONFIG_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    match &*PROJECT_DIRS {
        Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
        None => env::current_dir().expect("Unable to get current directory!"),
    }
    .join("config.toml")
});

static DEFAULT_DATABASE_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    match &*PROJECT_DIRS {
        Some(proj_dirs) => proj_dirs.data_dir().to_path_buf(),
        None => env::current_dir().expect("Unable to get current directory!"),
    }
    .join("quotations.db")
});

static DATABASE_OVERRIDE: LazyLock<RwLock<Option<PathBuf>>> = LazyLock::new(|| RwLock::new(None));

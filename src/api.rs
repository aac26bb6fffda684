use std::{
    env,
    path::{Path, PathBuf},
};

use chrono::{Days, Local, NaiveDate};
use log::{debug, info};

use crate::{
    CONFIG_PATH, DATABASE_OVERRIDE,
    access::Principal,
    calendar,
    config::BsConfig,
    error::BsResult,
    import,
    quotation::StoredQuotation,
    store::{DateRange, QuotationStore, UpsertSummary},
};

pub const DEFAULT_HISTORY_DAYS: u64 = 30;

pub struct ImportReport {
    pub path: PathBuf,
    pub principal: Principal,
    pub summary: UpsertSummary,
}

pub async fn get_config() -> BsResult<BsConfig> {
    confy::load_path(&*CONFIG_PATH).map_err(Into::into)
}

pub async fn set_config(key: &str, value: &str) -> BsResult<BsConfig> {
    let mut config = get_config().await?;
    config.set(key, value)?;
    confy::store_path(&*CONFIG_PATH, &config)?;

    Ok(config)
}

pub fn get_config_path() -> PathBuf {
    CONFIG_PATH.clone()
}

pub async fn get_database_path() -> BsResult<PathBuf> {
    if let Some(path) = &*DATABASE_OVERRIDE.read()? {
        return Ok(path.clone());
    }

    Ok(get_config().await?.database_path())
}

pub async fn init_database() -> BsResult<PathBuf> {
    let path = get_database_path().await?;
    open_store().await?.close();
    info!("[init] {}", path.to_string_lossy());

    Ok(path)
}

/// Upserts every row of the file as one batch. The key (or the `SERVICE_KEY`
/// variable) must match the configured service key.
pub async fn import(path: &Path, key: Option<&str>) -> BsResult<ImportReport> {
    let config = get_config().await?;
    let principal = import_principal(key, env::var("SERVICE_KEY").ok(), &config);

    let store = open_store().await?;
    let summary = import_into(&store, path, principal).await?;
    store.close();

    Ok(ImportReport {
        path: path.to_path_buf(),
        principal,
        summary,
    })
}

/// The flag key wins over the environment key; either must equal the
/// configured service key to write.
pub fn import_principal(
    key: Option<&str>,
    env_key: Option<String>,
    config: &BsConfig,
) -> Principal {
    let presented = key.map(str::to_string).or(env_key);
    let principal = Principal::from_key(presented.as_deref(), &config.service_key);
    debug!("[import] principal={principal}");

    principal
}

pub async fn import_into(
    store: &QuotationStore,
    path: &Path,
    principal: Principal,
) -> BsResult<UpsertSummary> {
    let quotations = import::load(path)?;

    let session = store.session(principal).await?;
    let summary = session.upsert_many(&quotations).await?;
    session.close();

    info!(
        "[import] {} inserted={} replaced={}",
        path.to_string_lossy(),
        summary.inserted,
        summary.replaced
    );

    Ok(summary)
}

/// Rows of the given day, or of the latest bulletin day when none is given.
pub async fn quotations_of_day(
    date: Option<NaiveDate>,
) -> BsResult<(NaiveDate, Vec<StoredQuotation>)> {
    let date = date.unwrap_or_else(|| calendar::last_trading_day(&Local::now().date_naive()));

    let store = open_store().await?;
    let session = store.session(Principal::Anonymous).await?;
    let quotations = session.query_by_date(&date).await?;

    Ok((date, quotations))
}

/// History of a ticker; `to` defaults to today and `from` to 30 days before
/// `to`.
pub async fn ticker_history(
    ticker: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> BsResult<Vec<StoredQuotation>> {
    let to = to.unwrap_or_else(|| Local::now().date_naive());
    let from = from.unwrap_or_else(|| {
        to.checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS))
            .unwrap_or(NaiveDate::MIN)
    });
    let range = DateRange::new(from, to)?;

    let store = open_store().await?;
    let session = store.session(Principal::Anonymous).await?;
    session.query_by_ticker(ticker, &range).await
}

pub async fn latest_quotations(ticker: &str, limit: usize) -> BsResult<Vec<StoredQuotation>> {
    let store = open_store().await?;
    let session = store.session(Principal::Anonymous).await?;
    session.latest_by_ticker(ticker, limit).await
}

async fn open_store() -> BsResult<QuotationStore> {
    let config = get_config().await?;
    let path = match &*DATABASE_OVERRIDE.read()? {
        Some(path) => path.clone(),
        None => config.database_path(),
    };

    QuotationStore::open_with(&path, config.busy_timeout()).await
}

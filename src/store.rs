//! The quotation store: one row per (date, ticker), upsert by replacement,
//! reads by ticker history or by trading day.
//!
//! A [`QuotationStore`] owns the database; every caller works through a
//! [`Session`] opened for a [`Principal`]. Each session has its own
//! connection, so sessions can be used from different tasks concurrently and
//! the engine serializes conflicting writers.

use std::{fs::create_dir_all, path::Path, str::FromStr, time::Duration};

use chrono::NaiveDate;
use libsql::{Builder, Connection, Database, Row, TransactionBehavior, Value};
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::{
    access::{Operation, Principal, authorize},
    error::{BsError, BsResult},
    quotation::{DailyQuotation, StoredQuotation, normalize_ticker},
    utils::datetime::{date_from_str, date_to_str, timestamp_from_str},
};

pub mod schema;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub struct QuotationStore {
    db: Database,
    busy_timeout: Duration,
}

pub struct Session {
    conn: Connection,
    principal: Principal,
}

/// Inclusive range of trading dates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub replaced: usize,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> BsResult<Self> {
        if start > end {
            return Err(BsError::Invalid {
                code: "INVALID_DATE_RANGE",
                message: format!(
                    "Range start {} is after end {}",
                    date_to_str(&start),
                    date_to_str(&end)
                ),
            });
        }

        Ok(Self { start, end })
    }
}

impl UpsertSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.replaced
    }
}

impl QuotationStore {
    pub async fn open(path: &Path) -> BsResult<Self> {
        Self::open_with(path, Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)).await
    }

    /// Opens (creating when missing) the database file and brings the schema
    /// up to date.
    pub async fn open_with(path: &Path, busy_timeout: Duration) -> BsResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                create_dir_all(dir)?;
            }
        }

        let db = Builder::new_local(path).build().await?;
        let store = Self { db, busy_timeout };

        let conn = store.connect().await?;
        pragma(&conn, "PRAGMA journal_mode = WAL").await?;
        for statement in schema::CREATE_STATEMENTS {
            conn.execute(statement, ()).await?;
        }
        debug!("[open] {}", path.to_string_lossy());

        Ok(store)
    }

    pub async fn session(&self, principal: Principal) -> BsResult<Session> {
        Ok(Session {
            conn: self.connect().await?,
            principal,
        })
    }

    pub fn close(self) {
        drop(self.db);
    }

    async fn connect(&self) -> BsResult<Connection> {
        let conn = self.db.connect()?;
        pragma(
            &conn,
            &format!("PRAGMA busy_timeout = {}", self.busy_timeout.as_millis()),
        )
        .await?;

        Ok(conn)
    }
}

impl Session {
    /// Writes the row, replacing any existing row with the same (date, ticker).
    /// A replacement keeps the original `id` and `created_at`.
    pub async fn upsert(&self, quotation: &DailyQuotation) -> BsResult<UpsertOutcome> {
        authorize(self.principal, Operation::Write)?;
        let quotation = quotation.normalized()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        match upsert_row(&tx, &quotation).await {
            Ok(outcome) => {
                tx.commit().await?;
                debug!(
                    "[upsert] {} {} {outcome}",
                    date_to_str(&quotation.date),
                    quotation.ticker
                );
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("[upsert] Rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Writes a new row, failing with `DuplicateKey` when (date, ticker) is
    /// already present.
    pub async fn insert(&self, quotation: &DailyQuotation) -> BsResult<i64> {
        authorize(self.principal, Operation::Write)?;
        let quotation = quotation.normalized()?;

        let id = insert_row(&self.conn, &quotation).await?;
        debug!(
            "[insert] {} {} id={id}",
            date_to_str(&quotation.date),
            quotation.ticker
        );

        Ok(id)
    }

    /// Upserts a batch in one transaction: either every row is written or
    /// none is.
    pub async fn upsert_many(&self, quotations: &[DailyQuotation]) -> BsResult<UpsertSummary> {
        authorize(self.principal, Operation::Write)?;
        let quotations = quotations
            .iter()
            .map(DailyQuotation::normalized)
            .collect::<BsResult<Vec<_>>>()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;

        let mut summary = UpsertSummary::default();
        for quotation in &quotations {
            match upsert_row(&tx, quotation).await {
                Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
                Ok(UpsertOutcome::Replaced) => summary.replaced += 1,
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        warn!("[upsert_many] Rollback failed: {rollback_err}");
                    }
                    return Err(err);
                }
            }
        }
        tx.commit().await?;

        debug!(
            "[upsert_many] inserted={} replaced={}",
            summary.inserted, summary.replaced
        );
        Ok(summary)
    }

    /// Rewrites an existing row identified by (date, ticker).
    pub async fn correct(&self, quotation: &DailyQuotation) -> BsResult<StoredQuotation> {
        authorize(self.principal, Operation::Write)?;
        let quotation = quotation.normalized()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;

        let result = async {
            match find_id(&tx, &quotation.date, &quotation.ticker).await? {
                Some(id) => update_row(&tx, id, &quotation).await,
                None => Err(BsError::NotExists {
                    code: "QUOTATION_NOT_EXISTS",
                    message: format!(
                        "No quotation for ({}, {})",
                        date_to_str(&quotation.date),
                        quotation.ticker
                    ),
                }),
            }
        }
        .await;

        if let Err(err) = result {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("[correct] Rollback failed: {rollback_err}");
            }
            return Err(err);
        }
        tx.commit().await?;

        debug!(
            "[correct] {} {}",
            date_to_str(&quotation.date),
            quotation.ticker
        );

        self.get(&quotation.date, &quotation.ticker)
            .await?
            .ok_or_else(|| BsError::NotExists {
                code: "QUOTATION_NOT_EXISTS",
                message: format!(
                    "Quotation ({}, {}) vanished after correction",
                    date_to_str(&quotation.date),
                    quotation.ticker
                ),
            })
    }

    pub async fn get(&self, date: &NaiveDate, ticker: &str) -> BsResult<Option<StoredQuotation>> {
        authorize(self.principal, Operation::Read)?;
        let ticker = query_ticker(ticker)?;

        let mut rows = self
            .conn
            .query(
                &format!(
                    r#"{}
WHERE "date" = ? AND "ticker" = ?
LIMIT 1
;"#,
                    schema::SELECT_ROWS
                ),
                (date_to_str(date), ticker),
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Rows of one ticker within the range, most recent first.
    pub async fn query_by_ticker(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> BsResult<Vec<StoredQuotation>> {
        authorize(self.principal, Operation::Read)?;
        let ticker = query_ticker(ticker)?;

        let rows = self
            .conn
            .query(
                &format!(
                    r#"{}
WHERE "ticker" = ? AND "date" >= ? AND "date" <= ?
ORDER BY "date" DESC
;"#,
                    schema::SELECT_ROWS
                ),
                (ticker, date_to_str(&range.start), date_to_str(&range.end)),
            )
            .await?;

        collect_rows(rows).await
    }

    /// The `limit` most recent rows of one ticker, most recent first.
    pub async fn latest_by_ticker(
        &self,
        ticker: &str,
        limit: usize,
    ) -> BsResult<Vec<StoredQuotation>> {
        authorize(self.principal, Operation::Read)?;
        let ticker = query_ticker(ticker)?;

        let rows = self
            .conn
            .query(
                &format!(
                    r#"{}
WHERE "ticker" = ?
ORDER BY "date" DESC
LIMIT ?
;"#,
                    schema::SELECT_ROWS
                ),
                (ticker, i64::try_from(limit).unwrap_or(i64::MAX)),
            )
            .await?;

        collect_rows(rows).await
    }

    /// Every row of one trading day, ordered by ticker.
    pub async fn query_by_date(&self, date: &NaiveDate) -> BsResult<Vec<StoredQuotation>> {
        authorize(self.principal, Operation::Read)?;

        let rows = self
            .conn
            .query(
                &format!(
                    r#"{}
WHERE "date" = ?
ORDER BY "ticker"
;"#,
                    schema::SELECT_ROWS
                ),
                [date_to_str(date)],
            )
            .await?;

        collect_rows(rows).await
    }

    pub fn close(self) {
        drop(self.conn);
    }
}

async fn pragma(conn: &Connection, sql: &str) -> BsResult<()> {
    let mut rows = conn.query(sql, ()).await?;
    while rows.next().await?.is_some() {}

    Ok(())
}

async fn find_id(conn: &Connection, date: &NaiveDate, ticker: &str) -> BsResult<Option<i64>> {
    let mut rows = conn
        .query(schema::SELECT_ID, (date_to_str(date), ticker))
        .await?;

    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<i64>(0)?)),
        None => Ok(None),
    }
}

async fn upsert_row(conn: &Connection, quotation: &DailyQuotation) -> BsResult<UpsertOutcome> {
    match find_id(conn, &quotation.date, &quotation.ticker).await? {
        Some(id) => {
            update_row(conn, id, quotation).await?;
            Ok(UpsertOutcome::Replaced)
        }
        None => {
            insert_row(conn, quotation).await?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}

async fn insert_row(conn: &Connection, quotation: &DailyQuotation) -> BsResult<i64> {
    let mut params = vec![
        Value::Text(date_to_str(&quotation.date)),
        Value::Text(quotation.ticker.clone()),
    ];
    params.extend(value_params(quotation));

    conn.execute(schema::INSERT_ROW, libsql::params_from_iter(params))
        .await
        .map_err(|err| map_write_error(err, quotation))?;

    Ok(conn.last_insert_rowid())
}

async fn update_row(conn: &Connection, id: i64, quotation: &DailyQuotation) -> BsResult<()> {
    let mut params = value_params(quotation);
    params.push(Value::Integer(id));

    conn.execute(schema::UPDATE_ROW, libsql::params_from_iter(params))
        .await
        .map_err(|err| map_write_error(err, quotation))?;

    Ok(())
}

/// Non-identity columns, in the order of `schema::UPDATE_ROW`.
fn value_params(q: &DailyQuotation) -> Vec<Value> {
    vec![
        text_value(&q.company),
        text_value(&q.sector),
        decimal_value(&q.previous_close),
        decimal_value(&q.open),
        decimal_value(&q.close),
        decimal_value(&q.day_change_pct),
        integer_value(&q.volume),
        integer_value(&q.traded_value),
        decimal_value(&q.reference_price),
        decimal_value(&q.ytd_change_pct),
        decimal_value(&q.last_dividend),
        text_value(&q.dividend_date_raw),
        decimal_value(&q.net_yield_pct),
        decimal_value(&q.price_earnings),
    ]
}

fn text_value(v: &Option<String>) -> Value {
    v.as_ref().map_or(Value::Null, |s| Value::Text(s.clone()))
}

fn decimal_value(v: &Option<Decimal>) -> Value {
    v.map_or(Value::Null, |d| Value::Text(d.to_string()))
}

fn integer_value(v: &Option<i64>) -> Value {
    v.map_or(Value::Null, Value::Integer)
}

fn map_write_error(err: libsql::Error, quotation: &DailyQuotation) -> BsError {
    if let libsql::Error::SqliteFailure(_, message) = &err {
        if message.contains("UNIQUE constraint failed") {
            return BsError::DuplicateKey {
                date: quotation.date,
                ticker: quotation.ticker.clone(),
            };
        }
        if message.contains("NOT NULL constraint failed") {
            return BsError::ConstraintViolation {
                code: "NOT_NULL",
                message: message.clone(),
            };
        }
    }

    err.into()
}

fn query_ticker(ticker: &str) -> BsResult<String> {
    normalize_ticker(ticker).ok_or_else(|| BsError::Invalid {
        code: "INVALID_TICKER",
        message: "Ticker must not be empty".to_string(),
    })
}

async fn collect_rows(mut rows: libsql::Rows) -> BsResult<Vec<StoredQuotation>> {
    let mut quotations: Vec<StoredQuotation> = vec![];
    while let Some(row) = rows.next().await? {
        quotations.push(from_row(&row)?);
    }

    Ok(quotations)
}

/// Decodes a row selected with `schema::SELECT_ROWS`.
fn from_row(row: &Row) -> BsResult<StoredQuotation> {
    let date = match column_text(row, 2)? {
        Some(s) => date_from_str(&s)?,
        None => {
            return Err(BsError::ConstraintViolation {
                code: "NOT_NULL",
                message: "Stored quotation without date".to_string(),
            });
        }
    };

    Ok(StoredQuotation {
        id: row.get::<i64>(0)?,
        created_at: column_text(row, 1)?
            .map(|s| timestamp_from_str(&s))
            .transpose()?,
        quotation: DailyQuotation {
            date,
            ticker: column_text(row, 3)?.unwrap_or_default(),
            company: column_text(row, 4)?,
            sector: column_text(row, 5)?,
            previous_close: column_decimal(row, 6)?,
            open: column_decimal(row, 7)?,
            close: column_decimal(row, 8)?,
            day_change_pct: column_decimal(row, 9)?,
            volume: column_integer(row, 10)?,
            traded_value: column_integer(row, 11)?,
            reference_price: column_decimal(row, 12)?,
            ytd_change_pct: column_decimal(row, 13)?,
            last_dividend: column_decimal(row, 14)?,
            dividend_date_raw: column_text(row, 15)?,
            net_yield_pct: column_decimal(row, 16)?,
            price_earnings: column_decimal(row, 17)?,
        },
    })
}

fn column_text(row: &Row, idx: i32) -> BsResult<Option<String>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        Value::Integer(i) => Ok(Some(i.to_string())),
        other => Err(unexpected_column(idx, &other)),
    }
}

fn column_decimal(row: &Row, idx: i32) -> BsResult<Option<Decimal>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(Decimal::from_str(&s)?)),
        Value::Integer(i) => Ok(Some(Decimal::from(i))),
        Value::Real(f) => Ok(Some(Decimal::try_from(f)?)),
        other => Err(unexpected_column(idx, &other)),
    }
}

fn column_integer(row: &Row, idx: i32) -> BsResult<Option<i64>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(i)),
        other => Err(unexpected_column(idx, &other)),
    }
}

fn unexpected_column(idx: i32, value: &Value) -> BsError {
    BsError::Invalid {
        code: "UNEXPECTED_COLUMN_TYPE",
        message: format!("Unexpected value {value:?} in column {idx}"),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn open_store() -> (TempDir, QuotationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = QuotationStore::open(&dir.path().join("quotations.db"))
            .await
            .unwrap();
        (dir, store)
    }

    fn date(s: &str) -> NaiveDate {
        date_from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn quotation(d: &str, ticker: &str, close: &str) -> DailyQuotation {
        let mut q = DailyQuotation::new(date(d), ticker);
        q.close = Some(dec(close));
        q
    }

    fn july() -> DateRange {
        DateRange::new(date("2025-07-01"), date("2025-07-31")).unwrap()
    }

    #[tokio::test]
    async fn test_single_row_scenario() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        let mut q = quotation("2025-07-29", "SGBC", "12500");
        q.volume = Some(1000);
        assert_eq!(session.upsert(&q).await.unwrap(), UpsertOutcome::Inserted);

        let by_date = session.query_by_date(&date("2025-07-29")).await.unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].quotation, q);
        assert!(by_date[0].created_at.is_some());

        let by_ticker = session.query_by_ticker("SGBC", &july()).await.unwrap();
        assert_eq!(by_ticker, by_date);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_keeps_identity() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        let first = quotation("2025-07-29", "SGBC", "12500");
        session.upsert(&first).await.unwrap();
        let before = session.get(&date("2025-07-29"), "SGBC").await.unwrap().unwrap();

        let mut second = quotation("2025-07-29", "sgbc", "12600");
        second.company = Some("SOCIETE GENERALE COTE D'IVOIRE".to_string());
        assert_eq!(session.upsert(&second).await.unwrap(), UpsertOutcome::Replaced);

        let rows = session.query_by_date(&date("2025-07-29")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, before.id);
        assert_eq!(rows[0].created_at, before.created_at);
        assert_eq!(rows[0].quotation.close, Some(dec("12600")));
        assert_eq!(
            rows[0].quotation.company.as_deref(),
            Some("SOCIETE GENERALE COTE D'IVOIRE")
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        session
            .insert(&quotation("2025-07-29", "SGBC", "12500"))
            .await
            .unwrap();
        let err = session
            .insert(&quotation("2025-07-29", "SGBC", "99999"))
            .await
            .unwrap_err();
        assert!(matches!(err, BsError::DuplicateKey { ref ticker, .. } if ticker == "SGBC"));

        let rows = session.query_by_date(&date("2025-07-29")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quotation.close, Some(dec("12500")));
    }

    #[tokio::test]
    async fn test_anonymous_reads_but_never_writes() {
        let (_dir, store) = open_store().await;
        let service = store.session(Principal::Service).await.unwrap();
        service
            .upsert(&quotation("2025-07-29", "SGBC", "12500"))
            .await
            .unwrap();

        let anonymous = store.session(Principal::Anonymous).await.unwrap();
        assert_eq!(
            anonymous.query_by_date(&date("2025-07-29")).await.unwrap().len(),
            1
        );

        let q = quotation("2025-07-30", "SGBC", "12000");
        assert!(matches!(
            anonymous.upsert(&q).await,
            Err(BsError::AccessDenied { .. })
        ));
        assert!(matches!(
            anonymous.insert(&q).await,
            Err(BsError::AccessDenied { .. })
        ));
        assert!(matches!(
            anonymous.upsert_many(&[q.clone()]).await,
            Err(BsError::AccessDenied { .. })
        ));
        assert!(matches!(
            anonymous.correct(&q).await,
            Err(BsError::AccessDenied { .. })
        ));
        assert!(
            service
                .query_by_date(&date("2025-07-30"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_missing_ticker_is_constraint_violation() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        assert!(matches!(
            session.upsert(&quotation("2025-07-29", " ", "1")).await,
            Err(BsError::ConstraintViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_by_ticker_range_and_order() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        session
            .upsert_many(&[
                quotation("2025-06-30", "SGBC", "11900"),
                quotation("2025-07-01", "SGBC", "12000"),
                quotation("2025-07-29", "SGBC", "12500"),
                quotation("2025-07-15", "SGBC", "12200"),
                quotation("2025-08-01", "SGBC", "12700"),
                quotation("2025-07-15", "SNTS", "25000"),
            ])
            .await
            .unwrap();

        let rows = session.query_by_ticker("sgbc", &july()).await.unwrap();
        let dates: Vec<String> = rows.iter().map(|r| date_to_str(&r.quotation.date)).collect();
        assert_eq!(dates, vec!["2025-07-29", "2025-07-15", "2025-07-01"]);
        assert!(rows.iter().all(|r| r.quotation.ticker == "SGBC"));

        assert!(DateRange::new(date("2025-07-31"), date("2025-07-01")).is_err());
        assert!(matches!(
            session.query_by_ticker("", &july()).await,
            Err(BsError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_latest_by_ticker() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        for (d, close) in [
            ("2025-07-25", "12300"),
            ("2025-07-28", "12400"),
            ("2025-07-29", "12500"),
        ] {
            session.upsert(&quotation(d, "SGBC", close)).await.unwrap();
        }

        let rows = session.latest_by_ticker("SGBC", 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quotation.date, date("2025-07-29"));
        assert_eq!(rows[1].quotation.date, date("2025-07-28"));

        assert!(session.latest_by_ticker("SNTS", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_by_date_exact_set() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        session
            .upsert_many(&[
                quotation("2025-07-29", "SNTS", "25000"),
                quotation("2025-07-29", "SGBC", "12500"),
                quotation("2025-07-28", "SGBC", "12400"),
                quotation("2025-07-30", "ORAC", "14000"),
            ])
            .await
            .unwrap();

        let rows = session.query_by_date(&date("2025-07-29")).await.unwrap();
        let tickers: Vec<&str> = rows.iter().map(|r| r.quotation.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SGBC", "SNTS"]);
        assert!(rows.iter().all(|r| r.quotation.date == date("2025-07-29")));

        assert!(
            session
                .query_by_date(&date("2025-08-02"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_upsert_many_is_all_or_nothing() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        let mut bad = quotation("2025-07-29", "SNTS", "25000");
        bad.volume = Some(-10);
        let result = session
            .upsert_many(&[quotation("2025-07-29", "SGBC", "12500"), bad])
            .await;
        assert!(matches!(result, Err(BsError::ConstraintViolation { .. })));
        assert!(
            session
                .query_by_date(&date("2025-07-29"))
                .await
                .unwrap()
                .is_empty()
        );

        let summary = session
            .upsert_many(&[
                quotation("2025-07-29", "SGBC", "12500"),
                quotation("2025-07-29", "SNTS", "25000"),
                quotation("2025-07-29", "SGBC", "12600"),
            ])
            .await
            .unwrap();
        assert_eq!(
            summary,
            UpsertSummary {
                inserted: 2,
                replaced: 1
            }
        );
        assert_eq!(summary.total(), 3);
    }

    #[tokio::test]
    async fn test_insertion_order_does_not_matter() {
        let rows = vec![
            quotation("2025-07-28", "SGBC", "12400"),
            quotation("2025-07-29", "SGBC", "12500"),
            quotation("2025-07-29", "SNTS", "25000"),
        ];

        let (_dir_a, store_a) = open_store().await;
        let a = store_a.session(Principal::Service).await.unwrap();
        for q in &rows {
            a.upsert(q).await.unwrap();
        }

        let (_dir_b, store_b) = open_store().await;
        let b = store_b.session(Principal::Service).await.unwrap();
        for q in rows.iter().rev() {
            b.upsert(q).await.unwrap();
        }

        for d in ["2025-07-28", "2025-07-29"] {
            let left: Vec<DailyQuotation> = a
                .query_by_date(&date(d))
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.quotation)
                .collect();
            let right: Vec<DailyQuotation> = b
                .query_by_date(&date(d))
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.quotation)
                .collect();
            assert_eq!(left, right);
        }
    }

    #[tokio::test]
    async fn test_decimals_and_raw_texts_are_exact() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        let mut q = DailyQuotation::new(date("2025-07-29"), "SGBC");
        q.previous_close = Some(dec("0.1"));
        q.day_change_pct = Some(dec("7.49"));
        q.ytd_change_pct = Some(dec("-3.20"));
        q.last_dividend = Some(dec("1161.9"));
        q.dividend_date_raw = Some("15-juil.-25".to_string());
        q.traded_value = Some(9_000_000_000_000);
        session.upsert(&q).await.unwrap();

        let stored = session
            .get(&date("2025-07-29"), "SGBC")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quotation, q);
        assert_eq!(
            stored.quotation.ytd_change_pct.unwrap().to_string(),
            "-3.20"
        );
    }

    #[tokio::test]
    async fn test_correct_existing_row() {
        let (_dir, store) = open_store().await;
        let session = store.session(Principal::Service).await.unwrap();

        let missing = session
            .correct(&quotation("2025-07-29", "SGBC", "12500"))
            .await;
        assert!(matches!(missing, Err(BsError::NotExists { .. })));

        let id = session
            .insert(&quotation("2025-07-29", "SGBC", "12500"))
            .await
            .unwrap();
        let corrected = session
            .correct(&quotation("2025-07-29", "SGBC", "12550"))
            .await
            .unwrap();
        assert_eq!(corrected.id, id);
        assert_eq!(corrected.quotation.close, Some(dec("12550")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_sessions_same_key() {
        let (_dir, store) = open_store().await;
        let a = store.session(Principal::Service).await.unwrap();
        let b = store.session(Principal::Service).await.unwrap();

        let qa = quotation("2025-07-29", "SGBC", "12500");
        let qb = quotation("2025-07-29", "SGBC", "12600");
        let ta = tokio::spawn(async move { a.upsert(&qa).await });
        let tb = tokio::spawn(async move { b.upsert(&qb).await });

        let mut outcomes = vec![ta.await.unwrap().unwrap(), tb.await.unwrap().unwrap()];
        outcomes.sort_by_key(|o| o.to_string());
        assert_eq!(
            outcomes,
            vec![UpsertOutcome::Inserted, UpsertOutcome::Replaced]
        );

        let reader = store.session(Principal::Anonymous).await.unwrap();
        assert_eq!(
            reader.query_by_date(&date("2025-07-29")).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotations.db");

        let store = QuotationStore::open(&path).await.unwrap();
        let session = store.session(Principal::Service).await.unwrap();
        session
            .upsert(&quotation("2025-07-29", "SGBC", "12500"))
            .await
            .unwrap();
        session.close();
        store.close();

        let store = QuotationStore::open(&path).await.unwrap();
        let session = store.session(Principal::Anonymous).await.unwrap();
        let rows = session.latest_by_ticker("SGBC", 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quotation.close, Some(dec("12500")));
    }
}

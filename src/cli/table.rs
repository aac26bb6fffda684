use brvmstore::{quotation::StoredQuotation, utils::datetime::date_to_str};
use rust_decimal::Decimal;
use tabled::{
    Table,
    settings::{
        Alignment, Color,
        object::{Columns, Object, Rows},
    },
};

/// What the first column identifies: the ticker on a day view, the date on a
/// ticker view.
pub enum RowKey {
    Ticker,
    Date,
}

pub fn quotations_table(quotations: &[StoredQuotation], key: RowKey) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        match key {
            RowKey::Ticker => "Ticker".to_string(),
            RowKey::Date => "Date".to_string(),
        },
        "Company".to_string(),
        "Prev".to_string(),
        "Open".to_string(),
        "Close".to_string(),
        "Day".to_string(),
        "YTD".to_string(),
        "Volume".to_string(),
        "Value".to_string(),
        "Yield".to_string(),
        "PER".to_string(),
    ]];

    for stored in quotations {
        let q = &stored.quotation;
        table_data.push(vec![
            match key {
                RowKey::Ticker => q.ticker.clone(),
                RowKey::Date => date_to_str(&q.date),
            },
            q.company.clone().unwrap_or("-".to_string()),
            decimal_str(&q.previous_close),
            decimal_str(&q.open),
            decimal_str(&q.close),
            percent_str(&q.day_change_pct),
            percent_str(&q.ytd_change_pct),
            q.volume.map(|v| v.to_string()).unwrap_or("-".to_string()),
            q.traded_value
                .map(|v| v.to_string())
                .unwrap_or("-".to_string()),
            percent_str(&q.net_yield_pct),
            decimal_str(&q.price_earnings),
        ]);
    }

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_CYAN);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(2..).not(Rows::first()), Alignment::right());

    table
}

fn decimal_str(v: &Option<Decimal>) -> String {
    v.map(|d| d.to_string()).unwrap_or("-".to_string())
}

fn percent_str(v: &Option<Decimal>) -> String {
    v.map(|d| format!("{d}%")).unwrap_or("-".to_string())
}

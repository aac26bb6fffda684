use std::{fs::File, io::Read, path::Path, str::FromStr};

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::{BsError, BsResult},
    quotation::DailyQuotation,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    pub fn from_path(path: &Path) -> BsResult<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();

        extension.parse().map_err(|_| BsError::Invalid {
            code: "UNSUPPORTED_IMPORT_FORMAT",
            message: format!(
                "Unsupported import file '{}', expected .json or .csv",
                path.to_string_lossy()
            ),
        })
    }
}

/// Reads the rows handed over by the ingestion process.
pub fn load(path: &Path) -> BsResult<Vec<DailyQuotation>> {
    let format = ImportFormat::from_path(path)?;
    let file = File::open(path)?;

    let quotations = match format {
        ImportFormat::Json => from_json_reader(file)?,
        ImportFormat::Csv => from_csv_reader(file)?,
    };
    info!(
        "[import] {} rows from {}",
        quotations.len(),
        path.to_string_lossy()
    );

    Ok(quotations)
}

/// A JSON array of row objects keyed by column name.
pub fn from_json_reader(reader: impl Read) -> BsResult<Vec<DailyQuotation>> {
    Ok(serde_json::from_reader(reader)?)
}

/// CSV with a header row of column names; empty cells are NULL.
pub fn from_csv_reader(reader: impl Read) -> BsResult<Vec<DailyQuotation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut quotations: Vec<DailyQuotation> = vec![];
    for record in csv_reader.deserialize::<CsvQuotation>() {
        quotations.push(record?.try_into()?);
    }

    Ok(quotations)
}

/// A CSV line as written. Decimal cells stay text until `Decimal::from_str`
/// reads them, since the csv deserializer would otherwise hand them over as
/// `f64`.
#[derive(Deserialize)]
struct CsvQuotation {
    date: NaiveDate,
    #[serde(default)]
    ticker: String,
    compagnie: Option<String>,
    secteur: Option<String>,
    cours_precedent: Option<String>,
    cours_ouv: Option<String>,
    cours_cloture: Option<String>,
    variation_jour: Option<String>,
    volume: Option<i64>,
    valeur_transigee: Option<i64>,
    cours_reference: Option<String>,
    variation_ytd: Option<String>,
    dernier_div: Option<String>,
    date_div: Option<String>,
    rendement_net: Option<String>,
    per: Option<String>,
}

impl TryFrom<CsvQuotation> for DailyQuotation {
    type Error = BsError;

    fn try_from(row: CsvQuotation) -> BsResult<Self> {
        Ok(Self {
            date: row.date,
            ticker: row.ticker,
            company: row.compagnie,
            sector: row.secteur,
            previous_close: decimal_cell(row.cours_precedent)?,
            open: decimal_cell(row.cours_ouv)?,
            close: decimal_cell(row.cours_cloture)?,
            day_change_pct: decimal_cell(row.variation_jour)?,
            volume: row.volume,
            traded_value: row.valeur_transigee,
            reference_price: decimal_cell(row.cours_reference)?,
            ytd_change_pct: decimal_cell(row.variation_ytd)?,
            last_dividend: decimal_cell(row.dernier_div)?,
            dividend_date_raw: row.date_div,
            net_yield_pct: decimal_cell(row.rendement_net)?,
            price_earnings: decimal_cell(row.per)?,
        })
    }
}

fn decimal_cell(cell: Option<String>) -> BsResult<Option<Decimal>> {
    match cell.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Ok(Some(Decimal::from_str(text)?)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::utils::datetime::date_from_str;

    #[test]
    fn test_from_json_reader() {
        let json = r#"[
            {"date": "2025-07-29", "secteur": "FIN", "ticker": "SGBC",
             "compagnie": "SOCIETE GENERALE COTE D'IVOIRE",
             "cours_precedent": 11630, "cours_ouv": 11700, "cours_cloture": 12500,
             "variation_jour": 7.49, "volume": 1000, "valeur_transigee": 12500000,
             "cours_reference": 12500, "variation_ytd": 4.17, "dernier_div": 1161.9,
             "date_div": "15/07/2025", "rendement_net": 8.29, "per": 9.3},
            {"date": "2025-07-29", "ticker": "ABJC", "cours_cloture": null}
        ]"#;

        let rows = from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].last_dividend, Some(Decimal::from_str("1161.9").unwrap()));
        assert_eq!(rows[0].traded_value, Some(12_500_000));
        assert_eq!(rows[0].dividend_date_raw.as_deref(), Some("15/07/2025"));
        assert_eq!(rows[1].close, None);
        assert_eq!(rows[1].company, None);
    }

    #[test]
    fn test_from_csv_reader() {
        let csv = "\
date,ticker,compagnie,secteur,cours_precedent,cours_ouv,cours_cloture,variation_jour,volume,valeur_transigee,cours_reference,variation_ytd,dernier_div,date_div,rendement_net,per
2025-07-29,SGBC,SOCIETE GENERALE,FIN,11630,11700,12500,7.49,1000,12500000,12500,4.17,1161.9,15/07/2025,8.29,9.3
2025-07-29,ABJC,,,,,,,,,,,,,,
";

        let rows = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date_from_str("2025-07-29").unwrap());
        assert_eq!(rows[0].day_change_pct, Some(Decimal::from_str("7.49").unwrap()));
        assert_eq!(rows[0].volume, Some(1000));
        assert_eq!(rows[1].ticker, "ABJC");
        assert_eq!(rows[1].close, None);
        assert_eq!(rows[1].volume, None);
        assert_eq!(rows[1].dividend_date_raw, None);
    }

    #[test]
    fn test_decimals_keep_scale_and_digits() {
        let csv = "\
date,ticker,cours_cloture,variation_ytd
2025-07-29,SGBC,1234567890.123456789,-3.20
";
        let rows = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].close.unwrap().to_string(), "1234567890.123456789");
        assert_eq!(rows[0].ytd_change_pct.unwrap().to_string(), "-3.20");

        let json = r#"[{"date": "2025-07-29", "ticker": "SGBC",
                        "cours_cloture": 1234567890.123456789, "variation_ytd": -3.20}]"#;
        let rows = from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(rows[0].close.unwrap().to_string(), "1234567890.123456789");
        assert_eq!(rows[0].ytd_change_pct.unwrap().to_string(), "-3.20");
    }

    #[test]
    fn test_bad_decimal_cell() {
        let csv = "date,ticker,cours_cloture\n2025-07-29,SGBC,n/a\n";
        assert!(matches!(
            from_csv_reader(csv.as_bytes()),
            Err(BsError::ParseDecimalError(_))
        ));
    }

    #[test]
    fn test_missing_ticker_column() {
        let csv = "date,cours_cloture\n2025-07-29,12500\n";
        let rows = from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].ticker, "");

        let json = r#"[{"date": "2025-07-29", "cours_cloture": 1}]"#;
        let rows = from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(rows[0].ticker, "");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("boc_20250729.json");
        let mut file = File::create(&json_path).unwrap();
        file.write_all(br#"[{"date": "2025-07-29", "ticker": "SGBC", "cours_cloture": "12500"}]"#)
            .unwrap();
        let rows = load(&json_path).unwrap();
        assert_eq!(rows[0].close, Some(Decimal::from(12500)));

        let txt_path = dir.path().join("boc_20250729.txt");
        File::create(&txt_path).unwrap();
        assert!(matches!(
            load(&txt_path),
            Err(BsError::Invalid {
                code: "UNSUPPORTED_IMPORT_FORMAT",
                ..
            })
        ));
    }
}

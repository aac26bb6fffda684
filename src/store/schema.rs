/// Decimal columns are declared TEXT: a NUMERIC/DECIMAL declaration would give
/// them numeric affinity and SQLite would store `7.49` as a REAL.
pub const CREATE_STATEMENTS: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS "brvm_cotation_journaliere" (
    "id"                INTEGER PRIMARY KEY AUTOINCREMENT,
    "date"              TEXT NOT NULL,
    "ticker"            TEXT NOT NULL,
    "compagnie"         TEXT,
    "secteur"           TEXT,
    "cours_precedent"   TEXT,
    "cours_ouv"         TEXT,
    "cours_cloture"     TEXT,
    "variation_jour"    TEXT,
    "volume"            INTEGER,
    "valeur_transigee"  INTEGER,
    "cours_reference"   TEXT,
    "variation_ytd"     TEXT,
    "dernier_div"       TEXT,
    "date_div"          TEXT,
    "rendement_net"     TEXT,
    "per"               TEXT,
    "created_at"        TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    UNIQUE ("date", "ticker"))
;"#,
    r#"
CREATE INDEX IF NOT EXISTS "idx_brvm_cotation_ticker_date"
ON "brvm_cotation_journaliere" ("ticker", "date" DESC)
;"#,
    r#"
CREATE INDEX IF NOT EXISTS "idx_brvm_cotation_date"
ON "brvm_cotation_journaliere" ("date" DESC)
;"#,
];

pub const SELECT_ROWS: &str = r#"
SELECT "id", "created_at", "date", "ticker",
       "compagnie", "secteur",
       "cours_precedent", "cours_ouv", "cours_cloture", "variation_jour",
       "volume", "valeur_transigee",
       "cours_reference", "variation_ytd", "dernier_div", "date_div",
       "rendement_net", "per"
FROM "brvm_cotation_journaliere"
"#;

pub const INSERT_ROW: &str = r#"
INSERT INTO "brvm_cotation_journaliere"
    ("date", "ticker",
     "compagnie", "secteur",
     "cours_precedent", "cours_ouv", "cours_cloture", "variation_jour",
     "volume", "valeur_transigee",
     "cours_reference", "variation_ytd", "dernier_div", "date_div",
     "rendement_net", "per")
VALUES
    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
;"#;

/// Rewrites every non-identity column; `id` and `created_at` are left alone.
pub const UPDATE_ROW: &str = r#"
UPDATE "brvm_cotation_journaliere"
SET "compagnie" = ?,
    "secteur" = ?,
    "cours_precedent" = ?,
    "cours_ouv" = ?,
    "cours_cloture" = ?,
    "variation_jour" = ?,
    "volume" = ?,
    "valeur_transigee" = ?,
    "cours_reference" = ?,
    "variation_ytd" = ?,
    "dernier_div" = ?,
    "date_div" = ?,
    "rendement_net" = ?,
    "per" = ?
WHERE "id" = ?
;"#;

pub const SELECT_ID: &str = r#"
SELECT "id"
FROM "brvm_cotation_journaliere"
WHERE "date" = ? AND "ticker" = ?
LIMIT 1
;"#;

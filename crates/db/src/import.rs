// crates/db/src/import.rs
//! Bulk CSV importer: read → infer → replace table.
//!
//! 1. `CsvFrame::read()`: parse a CSV file into header + nullable cells
//! 2. `CsvFrame::concat()`: stack several frames (union of columns)
//! 3. `replace_table()`: drop, recreate and fill a table from a frame
//!
//! Every run replaces the target tables wholesale; nothing is merged.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use sqlx::any::{Any, AnyArguments};
use sqlx::AnyPool;
use sqlx::query::Query;
use tracing::{debug, info, warn};

use crate::error::ImportError;
use crate::Database;

pub const DATA_DIR: &str = "data";
pub const UNLABELLED_FILE: &str = "unlabelled_data_clean.csv";
pub const REDDIT_POSTS_TABLE: &str = "redditposts";
pub const NEWS_ARTICLES_TABLE: &str = "newsarticles";
const LABELLED_PARTS: u32 = 10;

/// Bind parameters per INSERT statement; well under SQLite's and MySQL's caps.
const MAX_BIND_PARAMS: usize = 4_000;

/// `labelled_data_part1.csv` … `labelled_data_part10.csv`.
pub fn labelled_files() -> Vec<String> {
    (1..=LABELLED_PARTS)
        .map(|i| format!("labelled_data_part{}.csv", i))
        .collect()
}

// ============================================================================
// Types
// ============================================================================

/// Outcome of writing one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub columns: Vec<String>,
    /// Row count read back after the write.
    pub rows: u64,
}

/// Outcome of a full import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub tables: Vec<TableReport>,
}

impl ImportReport {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// SQL column type chosen from a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Text,
}

impl ColumnType {
    /// Integers if every non-empty value is one, doubles if every value is
    /// numeric, text otherwise. Columns with no values at all are text.
    fn infer<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Self {
        let mut inferred = None;
        for value in values.flatten() {
            inferred = Some(match inferred {
                None | Some(ColumnType::BigInt) if value.parse::<i64>().is_ok() => {
                    ColumnType::BigInt
                }
                None | Some(ColumnType::BigInt) | Some(ColumnType::Double)
                    if is_finite_float(value) =>
                {
                    ColumnType::Double
                }
                _ => return ColumnType::Text,
            });
        }
        inferred.unwrap_or(ColumnType::Text)
    }

    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Text => "TEXT",
        }
    }
}

fn is_finite_float(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// A parsed CSV file. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl CsvFrame {
    /// Parse the CSV file at `path`.
    pub fn read(path: &Path) -> Result<Self, ImportError> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| ImportError::csv(path, e))?;
        Self::from_csv(reader, path)
    }

    /// Parse CSV text from any reader; `source` names it in errors.
    pub fn from_reader<R: io::Read>(rdr: R, source: &Path) -> Result<Self, ImportError> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        Self::from_csv(reader, source)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Self, ImportError> {
        let headers = reader
            .headers()
            .map_err(|e| ImportError::csv(path, e))?
            .clone();
        if headers.is_empty() {
            return Err(ImportError::MissingHeader {
                path: path.to_path_buf(),
            });
        }
        let columns = normalize_headers(headers.iter());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ImportError::csv(path, e))?;
            if record.len() > columns.len() {
                return Err(ImportError::RowWidth {
                    path: path.to_path_buf(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect();
            // Short rows are padded with NULLs.
            row.resize(columns.len(), None);
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Stack frames vertically. Columns are the union of all inputs in
    /// first-seen order; cells a frame doesn't have are NULL.
    pub fn concat(frames: Vec<CsvFrame>) -> CsvFrame {
        let mut columns: Vec<String> = Vec::new();
        for frame in &frames {
            for column in &frame.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(frames.iter().map(CsvFrame::len).sum());
        for frame in frames {
            let positions: Vec<Option<usize>> = frame
                .columns
                .iter()
                .map(|c| columns.iter().position(|existing| existing == c))
                .collect();
            for row in frame.rows {
                let mut out = vec![None; columns.len()];
                for (value, position) in row.into_iter().zip(&positions) {
                    if let Some(pos) = position {
                        out[*pos] = value;
                    }
                }
                rows.push(out);
            }
        }

        CsvFrame { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|i| ColumnType::infer(self.rows.iter().map(|row| row[i].as_deref())))
            .collect()
    }
}

/// Blank headers become `Unnamed: {index}`; repeats get the next free
/// `.1`, `.2`, … suffix, skipping names the file already uses.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = raw
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim_start_matches('\u{feff}');
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: HashSet<String> = raw.iter().cloned().collect();
    let mut first_seen: HashSet<&str> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    raw.iter()
        .map(|base| {
            if first_seen.insert(base.as_str()) {
                return base.clone();
            }
            let suffix = next_suffix.entry(base.as_str()).or_insert(1);
            loop {
                let candidate = format!("{}.{}", base, suffix);
                *suffix += 1;
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

/// Backtick-quote an identifier; both MySQL and SQLite accept this form.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

// ============================================================================
// replace_table
// ============================================================================

fn bind_cell<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    column_type: ColumnType,
    cell: Option<&str>,
) -> Query<'q, Any, AnyArguments<'q>> {
    match column_type {
        ColumnType::BigInt => query.bind(cell.and_then(|v| v.parse::<i64>().ok())),
        ColumnType::Double => query.bind(cell.and_then(|v| v.parse::<f64>().ok())),
        ColumnType::Text => query.bind(cell.map(str::to_owned)),
    }
}

/// Drop `table`, recreate it with one column per frame column, and insert
/// every row in batches inside a single transaction.
pub async fn replace_table(
    pool: &AnyPool,
    table: &str,
    frame: &CsvFrame,
) -> Result<TableReport, ImportError> {
    let types = frame.column_types();
    let table_ident = quote_ident(table);

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", table_ident))
        .execute(pool)
        .await
        .map_err(|e| ImportError::write(table, e))?;

    let column_defs = frame
        .columns
        .iter()
        .zip(&types)
        .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    sqlx::query(&format!("CREATE TABLE {} ({})", table_ident, column_defs))
        .execute(pool)
        .await
        .map_err(|e| ImportError::write(table, e))?;

    if !frame.is_empty() {
        let column_list = frame
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let row_placeholder = format!("({})", vec!["?"; frame.columns.len()].join(", "));
        let rows_per_batch = (MAX_BIND_PARAMS / frame.columns.len()).max(1);

        let mut tx = pool.begin().await.map_err(|e| ImportError::write(table, e))?;
        for chunk in frame.rows.chunks(rows_per_batch) {
            let sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                table_ident,
                column_list,
                vec![row_placeholder.as_str(); chunk.len()].join(", ")
            );
            let mut query = sqlx::query(&sql);
            for row in chunk {
                for (cell, ty) in row.iter().zip(&types) {
                    query = bind_cell(query, *ty, cell.as_deref());
                }
            }
            query
                .execute(&mut *tx)
                .await
                .map_err(|e| ImportError::write(table, e))?;
            debug!(table, batch_rows = chunk.len(), "Inserted batch");
        }
        tx.commit().await.map_err(|e| ImportError::write(table, e))?;
    }

    let (rows,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table_ident))
        .fetch_one(pool)
        .await
        .map_err(|e| ImportError::write(table, e))?;

    Ok(TableReport {
        table: table.to_string(),
        columns: frame.columns.clone(),
        rows: u64::try_from(rows).unwrap_or(0),
    })
}

// ============================================================================
// import_directory
// ============================================================================

/// Import the fixed file set under `dir`:
/// - `unlabelled_data_clean.csv` → `redditposts`
/// - `labelled_data_part{1..10}.csv`, concatenated → `newsarticles`
///
/// Missing files are skipped; if none exist the run fails. All files are
/// parsed before the database is touched.
pub async fn import_directory(db: &Database, dir: &Path) -> Result<ImportReport, ImportError> {
    let unlabelled_path = dir.join(UNLABELLED_FILE);
    let unlabelled = if unlabelled_path.exists() {
        info!(file = %unlabelled_path.display(), table = REDDIT_POSTS_TABLE, "Reading CSV");
        Some(CsvFrame::read(&unlabelled_path)?)
    } else {
        warn!(file = %unlabelled_path.display(), "Unlabelled CSV not found; skipping");
        None
    };

    let labelled_paths: Vec<PathBuf> = labelled_files()
        .into_iter()
        .map(|name| dir.join(name))
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                debug!(file = %path.display(), "Labelled CSV part not found; skipping");
            }
            exists
        })
        .collect();

    let mut parts = Vec::with_capacity(labelled_paths.len());
    for path in &labelled_paths {
        info!(file = %path.display(), table = NEWS_ARTICLES_TABLE, "Reading CSV");
        parts.push(CsvFrame::read(path)?);
    }
    let labelled = (!parts.is_empty()).then(|| CsvFrame::concat(parts));

    if unlabelled.is_none() && labelled.is_none() {
        return Err(ImportError::NoInputFiles {
            dir: dir.to_path_buf(),
        });
    }

    let pool = db.pool().await?;
    let mut report = ImportReport::default();

    if let Some(frame) = unlabelled {
        let table = replace_table(&pool, REDDIT_POSTS_TABLE, &frame).await?;
        info!(table = %table.table, rows = table.rows, "Table replaced");
        report.tables.push(table);
    }
    if let Some(frame) = labelled {
        let table = replace_table(&pool, NEWS_ARTICLES_TABLE, &frame).await?;
        info!(table = %table.table, rows = table.rows, "Table replaced");
        report.tables.push(table);
    }

    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================

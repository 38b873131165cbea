//! Source loading.
//!
//! A source is a local path or an `http(s)://` URL. The trailing extension
//! picks the parser:
//! - `.csv`: header row, then one row per date
//! - `.json`: array of records with the same field names
//!
//! Remote sources go through a [`Fetch`] implementation so the network can be
//! swapped out; the default is a blocking GET with no retries.

use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;

use chrono::NaiveDate;
use lt_common::{CategoryColumn, Error, LossTable, Result, DATE_COLUMN, DAY_COLUMN, DIRECTION_COLUMN};
use serde_json::Value;
use tracing::{debug, info};

/// Parser selected by a source's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Pick the format from the trailing extension, ignoring any URL query
    /// or fragment.
    pub fn detect(source: &str) -> Result<Self> {
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("json") => Ok(SourceFormat::Json),
            _ => Err(Error::UnsupportedFormat {
                source_path: source.to_string(),
            }),
        }
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Retrieves the body of a remote source.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP GET.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching remote source");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| Error::unavailable(url, e))?;
        response.into_string().map_err(|e| Error::unavailable(url, e))
    }
}

/// Loads loss tables from local files or URLs.
pub struct Loader<F = HttpFetcher> {
    fetcher: F,
}

impl Loader<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::default())
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self::with_fetcher(HttpFetcher::new(timeout))
    }
}

impl Default for Loader<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> Loader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Read and parse `source`.
    ///
    /// The format is checked before any I/O happens.
    pub fn load(&self, source: &str) -> Result<LossTable> {
        let format = SourceFormat::detect(source)?;
        let text = if is_remote(source) {
            self.fetcher.fetch_text(source)?
        } else {
            std::fs::read_to_string(source).map_err(|e| Error::unavailable(source, e))?
        };

        let table = match format {
            SourceFormat::Csv => parse_csv(&text)?,
            SourceFormat::Json => parse_json(&text)?,
        };
        info!(
            source,
            rows = table.len(),
            categories = table.categories().len(),
            "source loaded"
        );
        Ok(table)
    }
}

/// Load `source` with the default HTTP fetcher.
pub fn load(source: &str) -> Result<LossTable> {
    Loader::new().load(source)
}

fn malformed(e: impl Display) -> Error {
    Error::MalformedData(e.to_string())
}

/// Accumulates rows whose category set may grow as records are read.
#[derive(Default)]
struct TableBuilder {
    dates: Vec<NaiveDate>,
    days: Vec<i64>,
    categories: Vec<CategoryColumn>,
    index: HashMap<String, usize>,
    direction: Vec<Option<String>>,
    has_direction: bool,
}

impl TableBuilder {
    fn declare_category(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.categories.len();
        self.categories
            .push(CategoryColumn::new(name, vec![None; self.dates.len()]));
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn start_row(&mut self, date: NaiveDate, day: i64) {
        self.dates.push(date);
        self.days.push(day);
        self.direction.push(None);
    }

    fn set_count(&mut self, name: &str, value: Option<i64>) {
        let row = self.dates.len().saturating_sub(1);
        let idx = self.declare_category(name);
        let values = &mut self.categories[idx].values;
        values.resize(row, None);
        values.push(value);
    }

    fn set_direction(&mut self, text: Option<String>) {
        self.has_direction = true;
        if let Some(last) = self.direction.last_mut() {
            *last = text;
        }
    }

    fn finish(mut self) -> Result<LossTable> {
        let rows = self.dates.len();
        for col in &mut self.categories {
            col.values.resize(rows, None);
        }
        let direction = self.has_direction.then_some(self.direction);
        LossTable::new(self.dates, self.days, self.categories, direction)
    }
}

fn parse_date(text: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{text}': {e}"))
}

/// Parse a count cell. Empty, `nan` and `null` are missing; integral floats
/// such as `"12.0"` are accepted.
fn parse_count(text: &str) -> std::result::Result<Option<i64>, String> {
    let cell = text.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Ok(Some(v));
    }
    cell.parse::<f64>()
        .ok()
        .and_then(integral)
        .map(Some)
        .ok_or_else(|| format!("invalid count '{cell}'"))
}

/// A whole-number float that fits in `i64`.
fn integral(f: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn required_day(value: Option<i64>) -> std::result::Result<i64, String> {
    value.ok_or_else(|| format!("missing '{DAY_COLUMN}'"))
}

/// Parse delimited text with a header row.
pub fn parse_csv(text: &str) -> Result<LossTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(malformed)?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MalformedData(format!("missing column '{name}'")))
    };
    let date_idx = find(DATE_COLUMN)?;
    let day_idx = find(DAY_COLUMN)?;

    let mut builder = TableBuilder::default();
    for (idx, name) in headers.iter().enumerate() {
        if idx == date_idx || idx == day_idx {
            continue;
        }
        if headers.iter().filter(|h| *h == name).count() > 1 {
            return Err(Error::MalformedData(format!("duplicate column '{name}'")));
        }
        if name == DIRECTION_COLUMN {
            builder.has_direction = true;
        } else {
            builder.declare_category(name);
        }
    }

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(malformed)?;
        let at_row = |msg: String| Error::MalformedData(format!("row {}: {msg}", line + 1));

        let date = parse_date(record.get(date_idx).unwrap_or("")).map_err(at_row)?;
        let day = parse_count(record.get(day_idx).unwrap_or(""))
            .and_then(required_day)
            .map_err(at_row)?;
        builder.start_row(date, day);

        for (idx, name) in headers.iter().enumerate() {
            if idx == date_idx || idx == day_idx {
                continue;
            }
            let cell = record.get(idx).unwrap_or("");
            if name == DIRECTION_COLUMN {
                builder.set_direction((!cell.is_empty()).then(|| cell.to_string()));
            } else {
                let value = parse_count(cell).map_err(|e| at_row(format!("{name}: {e}")))?;
                builder.set_count(name, value);
            }
        }
    }

    builder.finish()
}

fn json_count(value: &Value) -> std::result::Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .map(Some)
            .ok_or_else(|| format!("invalid count {n}")),
        Value::String(s) => parse_count(s),
        other => Err(format!("expected a count, found {other}")),
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse an array of JSON records.
///
/// Category columns are the union of record keys in first-seen order; a key
/// absent from a record is a missing value.
pub fn parse_json(text: &str) -> Result<LossTable> {
    let value: Value = serde_json::from_str(text)?;
    let records = value
        .as_array()
        .ok_or_else(|| Error::MalformedData("expected a JSON array of records".to_string()))?;

    let mut builder = TableBuilder::default();
    for (i, record) in records.iter().enumerate() {
        let at_record = |msg: String| Error::MalformedData(format!("record {i}: {msg}"));
        let obj = record
            .as_object()
            .ok_or_else(|| at_record("expected an object".to_string()))?;

        let date = obj
            .get(DATE_COLUMN)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("missing '{DATE_COLUMN}'"))
            .and_then(parse_date)
            .map_err(at_record)?;
        let day = match obj.get(DAY_COLUMN) {
            Some(v) => json_count(v).and_then(required_day),
            None => required_day(None),
        }
        .map_err(at_record)?;
        builder.start_row(date, day);

        for (key, v) in obj {
            match key.as_str() {
                DATE_COLUMN | DAY_COLUMN => {}
                DIRECTION_COLUMN => builder.set_direction(json_text(v)),
                name => {
                    let count = json_count(v).map_err(|e| at_record(format!("{name}: {e}")))?;
                    builder.set_count(name, count);
                }
            }
        }
    }

    builder.finish()
}

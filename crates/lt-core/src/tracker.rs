//! The stateful analysis object.
//!
//! A [`LossTracker`] is bound to one source (plus optional corrections).
//! `import_data` loads and corrects it once; `resample`, `inspect` and
//! `cond_plot` then work on the current table. Resampling always starts from
//! the imported snapshot, so it can be called repeatedly with different
//! periods.

use lt_common::{Error, EventMarker, LossTable, PeriodSpec, Result};
use lt_report::{DiagnosticReport, Figure, PlotOptions};
use tracing::info;

use crate::correct::{apply_corrections, DirectionColumn};
use crate::load::{Fetch, HttpFetcher, Loader};
use crate::resample::resample;

pub struct LossTracker<F: Fetch = HttpFetcher> {
    source: String,
    corrections: Option<String>,
    loader: Loader<F>,
    loaded: Option<LossTable>,
    table: Option<LossTable>,
    period: PeriodSpec,
}

impl LossTracker<HttpFetcher> {
    pub fn new(source: impl Into<String>, corrections: Option<String>) -> Self {
        Self::with_loader(source, corrections, Loader::new())
    }
}

impl<F: Fetch> LossTracker<F> {
    pub fn with_loader(
        source: impl Into<String>,
        corrections: Option<String>,
        loader: Loader<F>,
    ) -> Self {
        Self {
            source: source.into(),
            corrections,
            loader,
            loaded: None,
            table: None,
            period: PeriodSpec::None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn corrections(&self) -> Option<&str> {
        self.corrections.as_deref()
    }

    /// Period of the current table; `None` until `resample` is called.
    pub fn period(&self) -> PeriodSpec {
        self.period
    }

    /// Load the source, apply corrections, and make the result current.
    ///
    /// Re-importing discards any previous resampling.
    pub fn import_data(&mut self, direction: DirectionColumn) -> Result<&LossTable> {
        let base = self.loader.load(&self.source)?;
        let corrections = match &self.corrections {
            Some(path) => Some(self.loader.load(path)?),
            None => None,
        };
        let table = apply_corrections(&base, corrections.as_ref(), direction)?;

        match table.last_date() {
            Some(last) => info!(last_date = %last, "last available date"),
            None => info!("source has no rows"),
        }

        self.loaded = Some(table.clone());
        self.period = PeriodSpec::None;
        Ok(self.table.insert(table))
    }

    /// Resample the imported snapshot to `period` and make it current.
    pub fn resample(&mut self, period: PeriodSpec) -> Result<&LossTable> {
        let loaded = self.loaded.as_ref().ok_or(Error::NotLoaded)?;
        let table = resample(loaded, period)?;
        self.period = period;
        Ok(self.table.insert(table))
    }

    /// The current table.
    pub fn table(&self) -> Result<&LossTable> {
        self.table.as_ref().ok_or(Error::NotLoaded)
    }

    pub fn inspect(&self) -> Result<DiagnosticReport> {
        Ok(lt_report::inspect(self.table()?))
    }

    /// Event-aligned figure of `columns` from the current table.
    pub fn cond_plot(
        &self,
        columns: &[String],
        events: &[EventMarker],
        options: PlotOptions,
    ) -> Result<Figure> {
        let table = self.table()?;
        Ok(lt_report::plot(table, self.period, columns, events, options)?)
    }
}

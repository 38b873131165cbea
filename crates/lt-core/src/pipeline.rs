//! The standard report: import, inspect, resample, plot.

use lt_common::{LossTable, Result};
use lt_config::PipelineConfig;
use lt_report::{DiagnosticReport, Figure, PlotOptions};
use tracing::debug;

use crate::correct::DirectionColumn;
use crate::load::{Fetch, HttpFetcher, Loader};
use crate::tracker::LossTracker;

/// Everything one run produces. Nothing is written to disk here.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Diagnostics of the imported (corrected, not resampled) table.
    pub report: DiagnosticReport,
    pub figure: Figure,
    /// The resampled table the figure was drawn from.
    pub table: LossTable,
}

/// Run the pipeline with an HTTP loader honouring the configured timeout.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    let loader: Loader<HttpFetcher> = Loader::with_timeout(config.fetch_timeout());
    run_with(config, loader)
}

pub fn run_with<F: Fetch>(config: &PipelineConfig, loader: Loader<F>) -> Result<PipelineOutput> {
    let mut tracker = LossTracker::with_loader(
        config.source.clone(),
        config.corrections.clone(),
        loader,
    );

    let direction = if config.keep_losses_direction {
        DirectionColumn::Keep
    } else {
        DirectionColumn::Drop
    };
    tracker.import_data(direction)?;
    let report = tracker.inspect()?;

    let table = tracker.resample(config.period)?.clone();

    let plot = &config.plot;
    let options = PlotOptions {
        width: plot.width,
        height: plot.height,
        stroke_width: plot.stroke_width,
    };
    let figure = tracker.cond_plot(&plot.columns, &plot.events, options)?;
    debug!(subplots = figure.axes.len(), "pipeline finished");

    Ok(PipelineOutput {
        report,
        figure,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_common::{Error, PeriodSpec};

    struct Fixed(&'static str);

    impl Fetch for Fixed {
        fn fetch_text(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    const DATA: &str = r#"[
        {"date": "2022-02-25", "day": 2, "tank": 80, "field artillery": 49, "greatest losses direction": null},
        {"date": "2022-02-26", "day": 3, "tank": 146, "field artillery": 49},
        {"date": "2022-02-27", "day": 4, "tank": 150, "field artillery": 50}
    ]"#;

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig {
            source: "https://data.test/losses.json".to_string(),
            period: PeriodSpec::DAILY,
            ..PipelineConfig::default()
        };
        config.plot.columns = vec!["tank".to_string(), "field artillery".to_string()];
        config
    }

    #[test]
    fn runs_end_to_end_with_stub_fetcher() {
        let out = run_with(&config(), Loader::with_fetcher(Fixed(DATA))).unwrap();
        assert_eq!(out.report.row("tank").unwrap().null_pct, 0.0);
        assert_eq!(
            out.table.category("tank").unwrap().values,
            vec![Some(0), Some(66), Some(4)]
        );
        assert_eq!(out.figure.axes.len(), 2);
        assert_eq!(out.figure.width, 800);
    }

    #[test]
    fn unknown_plot_column_fails() {
        let mut config = config();
        config.plot.columns = vec!["submarines".to_string()];
        let err = run_with(&config, Loader::with_fetcher(Fixed(DATA))).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(ref c) if c == "submarines"));
    }
}

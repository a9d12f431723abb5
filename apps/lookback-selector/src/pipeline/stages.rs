//! Stage implementations.

use tracing::{info, warn};

use super::layout::{
    self, BEST_PERIODS_FILE, SELECTED_PARAMETERS_FILE, combined_report_name,
    combined_report_title, combined_total_name, combined_total_title, general_report_name,
    specific_report_name, specific_total_name, specific_total_title,
};
use super::{InputTables, Pipeline};
use crate::combine::{BestPeriodMap, SystemCombiner, TradingSystem};
use crate::error::ReportError;
use crate::report::{ReportJob, ReportRenderer, write_json_pretty};
use crate::returns::{CategoryAggregates, MarketReturns, ReturnSeries, SeriesCategory};
use crate::selection::{LookbackSelector, MarketOverrides, SelectionRecord};
use crate::table::extract_selected_parameters;

impl<R: ReportRenderer> Pipeline<'_, R> {
    /// Select, persist, extract parameters and render the best lookbacks.
    pub(super) fn run_specific(
        &self,
        tables: &InputTables,
    ) -> Result<(SelectionRecord, usize), ReportError> {
        let specific = &self.config.report.specific;
        let mut selector = LookbackSelector::new(&self.scorer, specific.selection);
        if let Some(reference_time) = self.reference_time {
            selector = selector.with_reference_time(reference_time);
        }

        let record = selector.select_all(
            &tables.in_sample,
            &tables.out_of_sample,
            &MarketOverrides::from(specific),
        );

        let record_path = self.paths.output_dir.join(BEST_PERIODS_FILE);
        write_json_pretty(&record_path, &record)?;
        info!(
            path = %record_path.display(),
            markets = record.len(),
            "Stored best periods"
        );

        if let Some(parameters_path) = self.config.core.parameters_path() {
            extract_selected_parameters(
                &parameters_path,
                &self.paths.output_dir.join(SELECTED_PARAMETERS_FILE),
                &record.periods(),
            )?;
        }

        let dir = &self.paths.specific_dir;
        let mut totals = CategoryAggregates::new();
        let mut rendered = 0;

        for (market, selection) in record.iter() {
            let period = selection.lookback_period;
            let returns = MarketReturns::from_tables(
                &tables.in_sample,
                &tables.out_of_sample,
                market,
                period,
            );

            for (category, series) in returns.non_empty() {
                totals.fold(category, series);
                let job = ReportJob::new(dir.join(specific_report_name(market, period, category)));
                self.render(series, job)?;
                rendered += 1;
            }
        }

        let has_in_sample_total = totals.finish(SeriesCategory::InSample).is_some();
        for total in totals.finish_all() {
            if total.category == SeriesCategory::InSampleUntilOutOfSample && !has_in_sample_total {
                continue;
            }
            let job = ReportJob::new(dir.join(specific_total_name(total.category)))
                .with_title(specific_total_title(total.category));
            self.render(&total.series, job)?;
            rendered += 1;
        }

        info!(reports = rendered, "Specific stage complete");
        Ok((record, rendered))
    }

    /// Render every non-empty series of every market and lookback period.
    pub(super) fn run_general(&self, tables: &InputTables) -> Result<usize, ReportError> {
        let periods = tables.in_sample.lookback_periods();
        let mut rendered = 0;

        for market in tables.in_sample.markets() {
            let market_dir = self.paths.general_market_dir(market);
            layout::create_dir(&market_dir)?;

            for &period in &periods {
                let returns = MarketReturns::from_tables(
                    &tables.in_sample,
                    &tables.out_of_sample,
                    market,
                    period,
                );
                for (category, series) in returns.non_empty() {
                    let name = general_report_name(market, period, category);
                    self.render(series, ReportJob::new(market_dir.join(name)))?;
                    rendered += 1;
                }
            }
        }

        info!(reports = rendered, "General stage complete");
        Ok(rendered)
    }

    /// Select across systems, persist the map and render the aggregates.
    pub(super) fn run_combine(&self) -> Result<(BestPeriodMap, usize), ReportError> {
        let combine = &self.config.report.combine_systems;

        let mut systems = Vec::with_capacity(combine.systems.len());
        for (dir, system_config) in &combine.systems {
            if let Some(system) = TradingSystem::load(dir, system_config, &self.config.core)? {
                systems.push(system);
            }
        }
        if systems.is_empty() {
            warn!("No system could be loaded, combination is empty");
        }

        let mut combiner = SystemCombiner::new(&self.scorer, combine.selection, systems);
        if let Some(reference_time) = self.reference_time {
            combiner = combiner.with_reference_time(reference_time);
        }

        let best = combiner.select();
        let dir = &self.paths.combined_dir;
        let best_path = dir.join(BEST_PERIODS_FILE);
        write_json_pretty(&best_path, &best)?;
        info!(
            path = %best_path.display(),
            markets = best.len(),
            "Stored combined best periods"
        );

        let combined = combiner.aggregate(&best);
        let mut rendered = 0;

        for (market, aggregates) in &combined.per_market {
            for aggregate in aggregates {
                let job = ReportJob::new(dir.join(combined_report_name(market, aggregate.category)))
                    .with_title(combined_report_title(market, aggregate.category));
                self.render(&aggregate.series, job)?;
                rendered += 1;
            }
        }

        for total in &combined.totals {
            let job = ReportJob::new(dir.join(combined_total_name(total.category)))
                .with_title(combined_total_title(total.category));
            self.render(&total.series, job)?;
            rendered += 1;
        }

        info!(reports = rendered, "Combine stage complete");
        Ok((best, rendered))
    }

    fn render(&self, series: &ReturnSeries, job: ReportJob) -> Result<(), ReportError> {
        self.renderer.render(series, &job)?;
        Ok(())
    }
}

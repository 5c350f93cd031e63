use std::future::Future;

use crate::models::{
    error::AppError,
    metrics::{MetricsResult, SiteDetail},
};

/// Site metadata and metrics composed for one dashboard view.
///
/// Either half may be missing when its fetch failed; the failures are kept
/// in `errors` so the view can say what is unavailable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSummary {
    pub site_name: Option<String>,
    pub city: Option<String>,
    pub metrics: MetricsResult,
    pub errors: Vec<AppError>,
}

impl SiteSummary {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Combines metrics that differ only by date scope.
///
/// A single result is returned unchanged. For several, additive figures are
/// summed over the results that carry them, `avg_ppl` is weighted by fuel
/// volume and `profit_margin` is recomputed from the summed profit and net
/// sales. A figure absent from every input stays absent.
pub fn aggregate(results: &[MetricsResult]) -> MetricsResult {
    match results {
        [] => MetricsResult::default(),
        [single] => single.clone(),
        _ => {
            let net_sales = sum(results, |m| m.net_sales);
            let profit = sum(results, |m| m.profit);

            MetricsResult {
                net_sales,
                profit,
                total_fuel_volume: sum(results, |m| m.total_fuel_volume),
                avg_ppl: volume_weighted_ppl(results),
                profit_margin: match (profit, net_sales) {
                    (Some(profit), Some(sales)) if sales != 0.0 => Some(profit / sales * 100.0),
                    _ => None,
                },
                fuel_sales: sum(results, |m| m.fuel_sales),
                shop_sales: sum(results, |m| m.shop_sales),
                bunkered_volume: sum(results, |m| m.bunkered_volume),
                non_bunkered_volume: sum(results, |m| m.non_bunkered_volume),
                transactions: sum(results, |m| m.transactions),
            }
        }
    }
}

/// Aggregates per-scope fetch results, failing only if every scope failed.
pub fn aggregate_results(
    results: Vec<Result<MetricsResult, AppError>>,
) -> Result<MetricsResult, AppError> {
    let mut ok = Vec::with_capacity(results.len());
    let mut first_error = None;

    for result in results {
        match result {
            Ok(metrics) => ok.push(metrics),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match (ok.is_empty(), first_error) {
        (true, Some(e)) => Err(e),
        _ => Ok(aggregate(&ok)),
    }
}

/// Composes site metadata with metrics, keeping whichever half succeeded.
pub fn compose_summary(
    site: Result<SiteDetail, AppError>,
    metrics: Result<MetricsResult, AppError>,
) -> Result<SiteSummary, AppError> {
    match (site, metrics) {
        (Err(_), Err(metrics_error)) => Err(metrics_error),
        (site, metrics) => {
            let mut summary = SiteSummary::default();

            match site {
                Ok(detail) => {
                    summary.city = detail.display_city().map(str::to_string);
                    summary.site_name = Some(detail.name);
                }
                Err(e) => summary.errors.push(e),
            }
            match metrics {
                Ok(metrics) => summary.metrics = metrics,
                Err(e) => summary.errors.push(e),
            }

            Ok(summary)
        }
    }
}

/// Runs the site lookup and the metrics fetch together, then composes them.
pub async fn summarize<S, M>(site: S, metrics: M) -> Result<SiteSummary, AppError>
where
    S: Future<Output = Result<SiteDetail, AppError>>,
    M: Future<Output = Result<MetricsResult, AppError>>,
{
    let (site, metrics) = futures::join!(site, metrics);
    compose_summary(site, metrics)
}

fn sum(results: &[MetricsResult], field: impl Fn(&MetricsResult) -> Option<f64>) -> Option<f64> {
    results
        .iter()
        .filter_map(&field)
        .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
}

fn volume_weighted_ppl(results: &[MetricsResult]) -> Option<f64> {
    let (weighted, volume) = results
        .iter()
        .filter_map(|m| Some((m.avg_ppl?, m.total_fuel_volume?)))
        .fold((0.0, 0.0), |(weighted, volume), (ppl, litres)| {
            (weighted + ppl * litres, volume + litres)
        });

    (volume > 0.0).then(|| weighted / volume)
}

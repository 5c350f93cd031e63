use super::metrics::{DailySales, SalesSlice};
use crate::config::Config;

const PALETTE: [&str; 6] = [
    "#00b4a0", "#648fff", "#785ef0", "#dc267f", "#fe6100", "#ffb000",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
}

/// Ordered chart data ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn new(points: Vec<ChartPoint>) -> Self {
        Self { points }
    }

    /// Pie slices coloured from the fixed palette, in server order.
    pub fn from_sales_distribution(slices: &[SalesSlice]) -> Self {
        Self::new(
            slices
                .iter()
                .enumerate()
                .map(|(i, slice)| ChartPoint {
                    label: slice.name.clone(),
                    value: slice.value,
                    color: Some(PALETTE[i % PALETTE.len()].to_string()),
                })
                .collect(),
        )
    }

    /// Daily sales sorted by day number where days are numeric.
    pub fn from_daily_sales(days: &[DailySales]) -> Self {
        let mut sorted = days.to_vec();
        sorted.sort_by_key(|d| d.day.parse::<u32>().unwrap_or(u32::MAX));

        Self::new(
            sorted
                .into_iter()
                .map(|d| ChartPoint {
                    label: d.day,
                    value: d.sales,
                    color: None,
                })
                .collect(),
        )
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Drops points too small to render as a visible slice.
    pub fn without_noise(&self) -> Self {
        self.filter_below(Config::MIN_SLICE_VALUE)
    }

    pub fn filter_below(&self, threshold: f64) -> Self {
        Self::new(
            self.points
                .iter()
                .filter(|p| p.value.is_finite() && p.value.abs() >= threshold)
                .cloned()
                .collect(),
        )
    }

    /// Labels and values as parallel vectors for axis charts.
    pub fn series_data(&self) -> (Vec<String>, Vec<f64>) {
        self.points
            .iter()
            .map(|p| (p.label.clone(), p.value))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(name: &str, value: f64) -> SalesSlice {
        SalesSlice {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_without_noise_drops_slivers() {
        let series = ChartSeries::from_sales_distribution(&[
            slice("Unleaded", 1200.0),
            slice("Diesel", 0.004),
            slice("LPG", 0.0),
            slice("Super", 0.01),
        ]);

        let labels: Vec<_> = series
            .without_noise()
            .points()
            .iter()
            .map(|p| p.label.clone())
            .collect();
        assert_eq!(labels, vec!["Unleaded", "Super"]);
    }

    #[test]
    fn test_palette_assignment_wraps() {
        let slices: Vec<_> = (0..7).map(|i| slice(&i.to_string(), 1.0)).collect();
        let series = ChartSeries::from_sales_distribution(&slices);
        assert_eq!(series.points()[0].color, series.points()[6].color);
    }

    #[test]
    fn test_daily_sales_sorted_numerically() {
        let days = vec![
            DailySales { day: "10".to_string(), sales: 3.0 },
            DailySales { day: "2".to_string(), sales: 1.0 },
            DailySales { day: "1".to_string(), sales: 2.0 },
        ];
        let (labels, values) = ChartSeries::from_daily_sales(&days).series_data();
        assert_eq!(labels, vec!["1", "2", "10"]);
        assert_eq!(values, vec![2.0, 1.0, 3.0]);
    }
}

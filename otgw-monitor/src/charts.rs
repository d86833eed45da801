use otgw_api::models::{HistoryData, TimeSeriesPoint};

/// Anything that can display one time series.
pub trait ChartView: Send + Sync {
    fn id(&self) -> &str;

    fn update_series(&mut self, points: &[TimeSeriesPoint]);

    fn points(&self) -> &[TimeSeriesPoint];

    fn summary(&self) -> SeriesSummary {
        SeriesSummary::of(self.points())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub last: Option<f64>,
}

impl SeriesSummary {
    /// Null values count as points but are skipped for min, max and last.
    pub fn of(points: &[TimeSeriesPoint]) -> Self {
        let values = points.iter().filter_map(|point| point.value());

        Self {
            count: points.len(),
            min: values.clone().reduce(f64::min),
            max: values.clone().reduce(f64::max),
            last: values.last(),
        }
    }
}

/// In-memory chart holding the most recent series it was given.
#[derive(Debug, Clone)]
pub struct SeriesChart {
    id: &'static str,
    height: u32,
    points: Vec<TimeSeriesPoint>,
    updates: usize,
}

impl SeriesChart {
    pub fn new(id: &'static str, height: u32) -> Self {
        Self {
            id,
            height,
            points: Vec::new(),
            updates: 0,
        }
    }

    pub fn temperature() -> Self {
        Self::new("temperature", 350)
    }

    pub fn flame() -> Self {
        Self::new("flame", 75)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl ChartView for SeriesChart {
    fn id(&self) -> &str {
        self.id
    }

    fn update_series(&mut self, points: &[TimeSeriesPoint]) {
        self.points = points.to_vec();
        self.updates += 1;

        let summary = self.summary();
        tracing::info!(
            chart = self.id,
            points = summary.count,
            min = ?summary.min,
            max = ?summary.max,
            last = ?summary.last,
            "chart updated"
        );
    }

    fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }
}

/// The temperature chart and the flame strip underneath it.
pub struct Charts {
    pub temperature: Box<dyn ChartView>,
    pub flame: Box<dyn ChartView>,
}

impl Charts {
    pub fn new(temperature: Box<dyn ChartView>, flame: Box<dyn ChartView>) -> Self {
        Self { temperature, flame }
    }

    pub fn update(&mut self, data: &HistoryData) {
        self.temperature.update_series(&data.temperature);
        self.flame.update_series(&data.flame);
    }
}

impl Default for Charts {
    fn default() -> Self {
        Self::new(Box::new(SeriesChart::temperature()), Box::new(SeriesChart::flame()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_empty_data() {
        let mut charts = Charts::default();
        charts.update(&HistoryData::default());

        assert!(charts.temperature.points().is_empty());
        assert!(charts.flame.points().is_empty());
        assert_eq!(charts.temperature.summary(), SeriesSummary::default());
    }

    #[test]
    fn test_summary_skips_nulls() {
        let points = [
            TimeSeriesPoint(1, Some(40.0)),
            TimeSeriesPoint(2, None),
            TimeSeriesPoint(3, Some(55.5)),
            TimeSeriesPoint(4, Some(38.0)),
            TimeSeriesPoint(5, None),
        ];

        let summary = SeriesSummary::of(&points);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, Some(38.0));
        assert_eq!(summary.max, Some(55.5));
        assert_eq!(summary.last, Some(38.0));
    }

    #[test]
    fn test_update_replaces_series() {
        let mut chart = SeriesChart::temperature();
        chart.update_series(&[TimeSeriesPoint(1, Some(1.0)), TimeSeriesPoint(2, Some(2.0))]);
        chart.update_series(&[TimeSeriesPoint(3, Some(3.0))]);

        assert_eq!(chart.points(), [TimeSeriesPoint(3, Some(3.0))]);
        assert_eq!(chart.updates(), 2);
        assert_eq!(chart.height(), 350);
        assert_eq!(SeriesChart::flame().id(), "flame");
    }
}

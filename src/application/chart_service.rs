// Chart service - Builds chart view-models from series snapshots
use crate::domain::channel::Channel;
use crate::domain::chart::{ChartData, SeriesData, TimeSeriesPoint};
use crate::domain::series::SeriesSnapshot;
use crate::domain::trigger::Thresholds;

struct ChartLabels {
    title: &'static str,
    series_name: &'static str,
    unit: &'static str,
    y_label: &'static str,
}

fn labels(channel: Channel) -> ChartLabels {
    match channel {
        Channel::Luminosity => ChartLabels {
            title: "Luminosity over time",
            series_name: "Luminosity",
            unit: "%",
            y_label: "Luminosity (%)",
        },
        Channel::Temperature => ChartLabels {
            title: "Temperature over time",
            series_name: "Temperature",
            unit: "°C",
            y_label: "Temperature (°C)",
        },
        Channel::Humidity => ChartLabels {
            title: "Humidity over time",
            series_name: "Humidity",
            unit: "%",
            y_label: "Humidity (%)",
        },
    }
}

#[derive(Debug, Clone)]
pub struct ChartService {
    thresholds: Thresholds,
}

impl ChartService {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Charts for every channel that can be drawn from this snapshot
    pub fn build_charts(&self, snapshot: &SeriesSnapshot) -> Vec<ChartData> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.build_chart(snapshot, channel))
            .collect()
    }

    /// `None` until both the timestamp axis and the channel's values are
    /// non-empty. Points pair timestamps and values by position.
    pub fn build_chart(&self, snapshot: &SeriesSnapshot, channel: Channel) -> Option<ChartData> {
        let state = &snapshot.state;
        let values = state.values(channel);
        let (first, last) = (state.timestamps.first()?, state.timestamps.last()?);

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;

        let points: Vec<TimeSeriesPoint> = state
            .timestamps
            .iter()
            .zip(values)
            .map(|(t, v)| TimeSeriesPoint::new(t.timestamp_millis(), *v))
            .collect();

        let span = |value: f64| {
            vec![
                TimeSeriesPoint::new(first.timestamp_millis(), value),
                TimeSeriesPoint::new(last.timestamp_millis(), value),
            ]
        };
        let bounds = self.thresholds.for_channel(channel);
        let labels = labels(channel);

        Some(ChartData {
            id: channel.attribute().to_string(),
            channel,
            title: labels.title.to_string(),
            unit: labels.unit.to_string(),
            y_label: labels.y_label.to_string(),
            version: snapshot.version,
            series: vec![SeriesData::new(channel.attribute(), labels.series_name, Some("blue"), points)],
            overlays: vec![
                SeriesData::new("mean", &format!("Mean {}", labels.series_name.to_lowercase()), Some("orange"), span(mean))
                    .dashed(),
                SeriesData::new("trigger_min", "Minimum trigger", Some("red"), span(bounds.min)),
                SeriesData::new("trigger_max", "Maximum trigger", Some("red"), span(bounds.max)),
            ],
        })
    }
}

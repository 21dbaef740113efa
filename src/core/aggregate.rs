// ReviewScope - core/aggregate.rs
//
// Summary metrics and chart data computed from one filtered selection.
// Every aggregate is defined for an empty selection (zero counts, `None`
// averages, empty histograms) so the UI never divides by zero.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{ReviewRecord, SentimentLabel};
use crate::util::constants;

// =============================================================================
// KPIs
// =============================================================================

/// The four headline metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kpis {
    pub total: usize,
    pub avg_polarity: Option<f64>,
    pub max_length: Option<usize>,
    pub positive_count: usize,
}

impl Kpis {
    pub fn compute(records: &[ReviewRecord], indices: &[usize]) -> Self {
        let mut kpis = Kpis::default();
        let mut polarity_sum = 0.0;

        for record in indices.iter().filter_map(|&i| records.get(i)) {
            kpis.total += 1;
            polarity_sum += record.polarity;
            kpis.max_length = Some(kpis.max_length.map_or(record.review_length, |m| {
                m.max(record.review_length)
            }));
            if record.label == SentimentLabel::Positive {
                kpis.positive_count += 1;
            }
        }

        if kpis.total > 0 {
            kpis.avg_polarity = Some(polarity_sum / kpis.total as f64);
        }
        kpis
    }
}

// =============================================================================
// Histogram
// =============================================================================

/// Bar height normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistNorm {
    /// Raw counts.
    Count,
    /// Probability density per label: each label's bars integrate to 1.
    Density,
}

/// Equal-width histogram with one series per sentiment label.
/// All series share the same bin edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    /// Width of every bin.
    pub bin_width: f64,
    /// Bar heights, indexed by `SentimentLabel::index`, then bin.
    pub series: [Vec<f64>; 3],
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their min..max.
    ///
    /// When every value is equal the span is widened to one unit centred on
    /// that value so the single bar stays visible.
    pub fn compute(values: &[(f64, SentimentLabel)], bins: usize, norm: HistNorm) -> Self {
        let bins = bins.max(1);
        if values.is_empty() {
            return Self::default();
        }

        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(v, _) in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }
        let bin_width = (hi - lo) / bins as f64;

        let mut series: [Vec<f64>; 3] = [vec![0.0; bins], vec![0.0; bins], vec![0.0; bins]];
        let mut totals = [0usize; 3];
        for &(v, label) in values {
            // The maximum value falls in the last bin, not one past it.
            let bin = (((v - lo) / bin_width).floor() as usize).min(bins - 1);
            series[label.index()][bin] += 1.0;
            totals[label.index()] += 1;
        }

        if norm == HistNorm::Density {
            for (heights, &total) in series.iter_mut().zip(totals.iter()) {
                if total == 0 {
                    continue;
                }
                let scale = 1.0 / (total as f64 * bin_width);
                heights.iter_mut().for_each(|h| *h *= scale);
            }
        }

        Self {
            start: lo,
            bin_width,
            series,
        }
    }

    /// Number of bins (0 for an empty histogram).
    pub fn bins(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins() == 0
    }

    /// Right edge of the last bin.
    pub fn end(&self) -> f64 {
        self.start + self.bin_width * self.bins() as f64
    }

    /// Sum of all series in one bin (stacked bar height).
    pub fn stacked_height(&self, bin: usize) -> f64 {
        self.series.iter().filter_map(|s| s.get(bin)).sum()
    }

    /// Tallest stacked bar.
    pub fn max_stacked(&self) -> f64 {
        (0..self.bins())
            .map(|b| self.stacked_height(b))
            .fold(0.0, f64::max)
    }

    /// Tallest single bar across all series.
    pub fn max_single(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.iter().copied())
            .fold(0.0, f64::max)
    }
}

// =============================================================================
// Box plot
// =============================================================================

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns None for an empty slice.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = constants::BOX_WHISKER_IQR * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let inside = || sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lower_whisker = inside().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

// =============================================================================
// Dashboard view
// =============================================================================

/// One point of the polarity / length scatter plot (also used for the rug).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub polarity: f64,
    pub length: usize,
    pub label: SentimentLabel,
}

/// Everything the dashboard draws for one selection.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub kpis: Kpis,
    /// Records per label, indexed by `SentimentLabel::index`.
    pub label_counts: [usize; 3],
    pub scatter: Vec<ScatterPoint>,
    /// Review lengths, counts per label (stacked bars).
    pub length_histogram: Histogram,
    /// Review-length box per label, indexed by `SentimentLabel::index`.
    pub length_boxes: [Option<BoxStats>; 3],
    /// Polarity, probability density per label.
    pub polarity_density: Histogram,
}

impl DashboardView {
    pub fn compute(records: &[ReviewRecord], indices: &[usize], bins: usize) -> Self {
        let selected: Vec<&ReviewRecord> = indices.iter().filter_map(|&i| records.get(i)).collect();

        let mut label_counts = [0usize; 3];
        let mut lengths_by_label: [Vec<f64>; 3] = Default::default();
        let mut scatter = Vec::with_capacity(selected.len());
        let mut lengths = Vec::with_capacity(selected.len());
        let mut polarities = Vec::with_capacity(selected.len());

        for record in &selected {
            let idx = record.label.index();
            label_counts[idx] += 1;
            lengths_by_label[idx].push(record.review_length as f64);
            scatter.push(ScatterPoint {
                polarity: record.polarity,
                length: record.review_length,
                label: record.label,
            });
            lengths.push((record.review_length as f64, record.label));
            polarities.push((record.polarity, record.label));
        }

        let [pos, neu, neg] = lengths_by_label;
        Self {
            kpis: Kpis::compute(records, indices),
            label_counts,
            scatter,
            length_histogram: Histogram::compute(&lengths, bins, HistNorm::Count),
            length_boxes: [
                BoxStats::compute(&pos),
                BoxStats::compute(&neu),
                BoxStats::compute(&neg),
            ],
            polarity_density: Histogram::compute(&polarities, bins, HistNorm::Density),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(id: u64, len: usize, polarity: f64) -> ReviewRecord {
        ReviewRecord::new(id, "x".repeat(len), polarity, None, None, None)
    }

    fn sample() -> Vec<ReviewRecord> {
        vec![
            make_record(0, 10, 0.5),
            make_record(1, 40, -0.5),
            make_record(2, 20, 0.0),
            make_record(3, 30, 0.9),
        ]
    }

    #[test]
    fn test_kpis() {
        let records = sample();
        let kpis = Kpis::compute(&records, &[0, 1, 2, 3]);
        assert_eq!(kpis.total, 4);
        assert!((kpis.avg_polarity.unwrap() - 0.225).abs() < 1e-9);
        assert_eq!(kpis.max_length, Some(40));
        assert_eq!(kpis.positive_count, 2);
    }

    #[test]
    fn test_kpis_empty_selection() {
        let records = sample();
        let kpis = Kpis::compute(&records, &[]);
        assert_eq!(kpis.total, 0);
        assert_eq!(kpis.avg_polarity, None);
        assert_eq!(kpis.max_length, None);
        assert_eq!(kpis.positive_count, 0);
    }

    #[test]
    fn test_histogram_counts() {
        let values: Vec<(f64, SentimentLabel)> = [0.0, 1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&v| (v, SentimentLabel::Neutral))
            .collect();
        let h = Histogram::compute(&values, 4, HistNorm::Count);
        assert_eq!(h.bins(), 4);
        assert_eq!(h.start, 0.0);
        assert_eq!(h.bin_width, 1.0);
        // The maximum value lands in the last bin.
        assert_eq!(h.series[1], vec![1.0, 1.0, 1.0, 2.0]);
        assert_eq!(h.max_stacked(), 2.0);
        assert_eq!(h.end(), 4.0);
    }

    #[test]
    fn test_histogram_single_value() {
        let h = Histogram::compute(&[(5.0, SentimentLabel::Positive)], 10, HistNorm::Count);
        assert_eq!(h.start, 4.5);
        assert!((h.end() - 5.5).abs() < 1e-9);
        assert_eq!(h.series[0].iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_histogram_empty() {
        let h = Histogram::compute(&[], 50, HistNorm::Density);
        assert!(h.is_empty());
        assert_eq!(h.max_stacked(), 0.0);
    }

    #[test]
    fn test_density_integrates_to_one_per_label() {
        let values = vec![
            (-0.8, SentimentLabel::Negative),
            (-0.3, SentimentLabel::Negative),
            (0.0, SentimentLabel::Neutral),
            (0.2, SentimentLabel::Positive),
            (0.4, SentimentLabel::Positive),
            (0.9, SentimentLabel::Positive),
        ];
        let h = Histogram::compute(&values, 7, HistNorm::Density);
        for series in &h.series {
            let area: f64 = series.iter().map(|d| d * h.bin_width).sum();
            assert!((area - 1.0).abs() < 1e-9, "area {area}");
        }
    }

    #[test]
    fn test_quantile_linear() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&data, 0.0), 1.0);
        assert_eq!(quantile(&data, 0.5), 2.5);
        assert_eq!(quantile(&data, 0.25), 1.75);
        assert_eq!(quantile(&data, 1.0), 4.0);
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::compute(&values).unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.q1, 2.25);
        assert_eq!(stats.q3, 4.75);
        assert_eq!(stats.upper_whisker, 5.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::compute(&[]).is_none());
    }

    #[test]
    fn test_dashboard_view() {
        let records = sample();
        let view = DashboardView::compute(&records, &[0, 1, 3], 5);
        assert_eq!(view.kpis.total, 3);
        assert_eq!(view.label_counts, [2, 0, 1]);
        assert_eq!(view.scatter.len(), 3);
        assert!(view.length_boxes[1].is_none());
        assert_eq!(view.length_boxes[0].as_ref().unwrap().count, 2);
        let total: f64 = (0..view.length_histogram.bins())
            .map(|b| view.length_histogram.stacked_height(b))
            .sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn test_dashboard_view_empty() {
        let records = sample();
        let view = DashboardView::compute(&records, &[], 50);
        assert_eq!(view.kpis, Kpis::default());
        assert!(view.scatter.is_empty());
        assert!(view.length_histogram.is_empty());
        assert!(view.polarity_density.is_empty());
    }
}

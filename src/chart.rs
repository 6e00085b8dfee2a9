//! Growth chart geometry
//!
//! Projects a chronological list of health records onto a fixed canvas as two
//! line series (weight and height) that share the x axis but scale
//! independently on y. Records are spaced evenly regardless of date gaps.

use crate::markdown::escape_html;
use crate::models::HealthRecord;
use serde::Serialize;

/// Bottom/top headroom applied to each series' value range
const RANGE_PAD_LOW: f64 = 0.95;
const RANGE_PAD_HIGH: f64 = 1.05;

/// Horizontal grid lines drawn behind the series
const GRID_LINES: usize = 4;

/// ---------------------------------------------------------------------------
/// Geometry Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartFrame {
  pub width: f64,
  pub height: f64,
  /// Applied on all four sides
  pub padding: f64,
}

impl Default for ChartFrame {
  fn default() -> Self {
    Self {
      width: 300.0,
      height: 150.0,
      padding: 20.0,
    }
  }
}

impl ChartFrame {
  fn plot_width(&self) -> f64 {
    self.width - 2.0 * self.padding
  }

  fn plot_height(&self) -> f64 {
    self.height - 2.0 * self.padding
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint<'a> {
  pub x: f64,
  pub y: f64,
  /// The record this point was projected from, for tooltip lookup
  pub record: &'a HealthRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<'a> {
  pub points: Vec<PlotPoint<'a>>,
  /// `x,y x,y ...`, ready for an SVG `points` attribute
  pub polyline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthChart<'a> {
  pub weight: Series<'a>,
  pub height: Series<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Projection<'a> {
  /// Fewer than two records; render a placeholder instead of a chart
  InsufficientData,
  Chart(GrowthChart<'a>),
}

/// ---------------------------------------------------------------------------
/// Scaling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct AxisScale {
  low: f64,
  high: f64,
}

impl AxisScale {
  fn fit(values: impl Iterator<Item = f64>) -> Self {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
      (lo.min(v), hi.max(v))
    });
    Self {
      low: min * RANGE_PAD_LOW,
      high: max * RANGE_PAD_HIGH,
    }
  }

  /// Canvas y for `value`; y grows downward. A collapsed range centers the
  /// value vertically.
  fn project(&self, value: f64, frame: &ChartFrame) -> f64 {
    let span = self.high - self.low;
    if !span.is_finite() || span.abs() < f64::EPSILON {
      return frame.height / 2.0;
    }
    frame.height - frame.padding - ((value - self.low) / span) * frame.plot_height()
  }
}

fn x_position(index: usize, count: usize, frame: &ChartFrame) -> f64 {
  frame.padding + (index as f64 / (count - 1) as f64) * frame.plot_width()
}

fn build_series<'a>(
  records: &'a [HealthRecord],
  frame: &ChartFrame,
  value: impl Fn(&HealthRecord) -> f64,
) -> Series<'a> {
  let scale = AxisScale::fit(records.iter().map(&value));

  let points: Vec<PlotPoint<'a>> = records
    .iter()
    .enumerate()
    .map(|(i, record)| PlotPoint {
      x: x_position(i, records.len(), frame),
      y: scale.project(value(record), frame),
      record,
    })
    .collect();

  let polyline = points
    .iter()
    .map(|p| format!("{},{}", p.x, p.y))
    .collect::<Vec<_>>()
    .join(" ");

  Series { points, polyline }
}

/// Project records (oldest first) onto `frame`
pub fn project(records: &[HealthRecord], frame: ChartFrame) -> Projection<'_> {
  if records.len() < 2 {
    return Projection::InsufficientData;
  }

  Projection::Chart(GrowthChart {
    weight: build_series(records, &frame, |r| r.weight),
    height: build_series(records, &frame, |r| r.height),
  })
}

/// ---------------------------------------------------------------------------
/// SVG Rendering
/// ---------------------------------------------------------------------------

/// Localized strings used in the legend and point tooltips
#[derive(Debug, Clone)]
pub struct ChartLabels {
  pub date: String,
  pub weight: String,
  pub height: String,
  pub bmi: String,
}

impl Default for ChartLabels {
  fn default() -> Self {
    Self {
      date: "Date".to_string(),
      weight: "Weight".to_string(),
      height: "Height".to_string(),
      bmi: "BMI".to_string(),
    }
  }
}

fn point_title(record: &HealthRecord, labels: &ChartLabels) -> String {
  escape_html(&format!(
    "{}: {}\n{}: {}kg, {}: {}cm\n{}: {}",
    labels.date,
    record.date,
    labels.weight,
    record.weight,
    labels.height,
    record.height,
    labels.bmi,
    record.bmi
  ))
}

fn push_series(svg: &mut String, series: &Series<'_>, color: &str, labels: &ChartLabels) {
  svg.push_str(&format!(
    r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
    color, series.polyline
  ));
  for point in &series.points {
    svg.push_str(&format!(
      r#"<circle cx="{}" cy="{}" r="3" fill="{}"><title>{}</title></circle>"#,
      point.x,
      point.y,
      color,
      point_title(point.record, labels)
    ));
  }
}

/// Standalone SVG document for a drawable chart
pub fn render_svg(chart: &GrowthChart<'_>, frame: ChartFrame, labels: &ChartLabels) -> String {
  let mut svg = format!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" role="img">"#,
    frame.width, frame.height
  );

  for i in 0..GRID_LINES {
    let y = frame.padding + (i as f64 * frame.plot_height()) / (GRID_LINES - 1) as f64;
    svg.push_str(&format!(
      concat!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" "#,
        r##"stroke="#cbd5e1" stroke-width="0.5" stroke-dasharray="2,2"/>"##,
      ),
      frame.padding,
      y,
      frame.width - frame.padding,
      y
    ));
  }

  // Height first so weight draws on top
  push_series(&mut svg, &chart.height, "#0ea5e9", labels);
  push_series(&mut svg, &chart.weight, "#475569", labels);

  svg.push_str("</svg>");
  svg
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::mock_health_record;

  fn chart<'a>(projection: &'a Projection<'a>) -> &'a GrowthChart<'a> {
    match projection {
      Projection::Chart(chart) => chart,
      Projection::InsufficientData => panic!("expected a drawable chart"),
    }
  }

  #[test]
  fn test_fewer_than_two_records_is_insufficient() {
    assert_eq!(project(&[], ChartFrame::default()), Projection::InsufficientData);

    let one = vec![mock_health_record(1, 8.0, 70.0)];
    assert_eq!(project(&one, ChartFrame::default()), Projection::InsufficientData);
  }

  #[test]
  fn test_two_records_span_the_padded_width() {
    let records = vec![mock_health_record(1, 8.0, 70.0), mock_health_record(2, 9.0, 74.0)];

    for frame in [
      ChartFrame::default(),
      ChartFrame { width: 640.0, height: 320.0, padding: 32.0 },
    ] {
      let projection = project(&records, frame);
      let chart = chart(&projection);
      assert_approx_eq!(chart.weight.points[0].x, frame.padding, 1e-9);
      assert_approx_eq!(chart.weight.points[1].x, frame.width - frame.padding, 1e-9);
      assert_approx_eq!(chart.height.points[1].x, frame.width - frame.padding, 1e-9);
    }
  }

  #[test]
  fn test_points_are_evenly_spaced_and_index_aligned() {
    let records: Vec<_> = (0..5)
      .map(|i| mock_health_record(i + 1, 8.0 + i as f64, 70.0 + i as f64))
      .collect();
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    let xs: Vec<f64> = chart.weight.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![20.0, 85.0, 150.0, 215.0, 280.0]);

    for (point, record) in chart.height.points.iter().zip(&records) {
      assert_eq!(point.record.id, record.id);
    }
  }

  #[test]
  fn test_larger_values_plot_higher() {
    let records = vec![mock_health_record(1, 8.0, 70.0), mock_health_record(2, 12.0, 90.0)];
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    assert!(chart.weight.points[1].y < chart.weight.points[0].y);
    assert!(chart.height.points[1].y < chart.height.points[0].y);

    // Padded range keeps points inside the plot area
    for p in chart.weight.points.iter().chain(&chart.height.points) {
      assert!(p.y > 20.0 && p.y < 130.0, "y out of plot area: {}", p.y);
    }
  }

  #[test]
  fn test_series_scale_independently() {
    let records = vec![mock_health_record(1, 8.0, 70.0), mock_health_record(2, 9.0, 120.0)];
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    assert_ne!(chart.weight.points[1].y, chart.height.points[1].y);
  }

  #[test]
  fn test_equal_values_center_vertically() {
    let records = vec![
      mock_health_record(1, 10.0, 70.0),
      mock_health_record(2, 10.0, 75.0),
      mock_health_record(3, 10.0, 80.0),
    ];
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    for p in &chart.weight.points {
      assert!(p.y.is_finite());
      assert_approx_eq!(p.y, 75.0, 1e-9);
    }
  }

  #[test]
  fn test_collapsed_range_does_not_divide_by_zero() {
    let records = vec![mock_health_record(1, 0.0, 70.0), mock_health_record(2, 0.0, 71.0)];
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    for p in &chart.weight.points {
      assert_eq!(p.y, 75.0);
    }
    assert!(!chart.weight.polyline.contains("NaN"));
  }

  #[test]
  fn test_polyline_matches_points() {
    let records = vec![mock_health_record(1, 8.0, 70.0), mock_health_record(2, 9.0, 74.0)];
    let projection = project(&records, ChartFrame::default());
    let chart = chart(&projection);

    let expected = format!(
      "20,{} 280,{}",
      chart.weight.points[0].y, chart.weight.points[1].y
    );
    assert_eq!(chart.weight.polyline, expected);
  }

  #[test]
  fn test_svg_contains_both_series() {
    let records = vec![mock_health_record(1, 8.0, 70.0), mock_health_record(2, 9.0, 74.0)];
    let frame = ChartFrame::default();
    let projection = project(&records, frame);
    let svg = render_svg(chart(&projection), frame, &ChartLabels::default());

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<polyline").count(), 2);
    assert_eq!(svg.matches("<circle").count(), 4);
    assert_eq!(svg.matches("<line ").count(), GRID_LINES);
    assert!(svg.contains("Weight: 8kg, Height: 70cm"));
  }

  #[test]
  fn test_insufficient_data_serializes_as_status() {
    let json = serde_json::to_value(project(&[], ChartFrame::default())).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "insufficient_data" }));
  }
}

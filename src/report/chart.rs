//! The three-panel product page: min vs. ours, avg vs. ours, rank over time.
//!
//! The x axis counts days from the first summary date so every panel shares
//! the same scale; tick labels are formatted back to `dd-mm-YYYY` and thinned
//! by plotters' key-point selection.

use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{PriceRankError, Result};
use crate::models::DailySummary;

use super::canvas::PdfCanvas;

/// A 12 x 10 inch figure, in points.
pub const PAGE_SIZE: (u32, u32) = (864, 720);

const MIN_COLOR: RGBColor = RGBColor(31, 119, 180);
const AVG_COLOR: RGBColor = RGBColor(44, 160, 44);
const OUR_COLOR: RGBColor = RGBColor(255, 127, 14);
const RANK_COLOR: RGBColor = RGBColor(148, 103, 189);

const MAX_X_LABELS: usize = 8;

type Point = (i32, f64);

/// Date axis shared by the three panels.
struct Timeline {
    start: NaiveDate,
    span: i32,
}

impl Timeline {
    fn of(summaries: &[DailySummary]) -> Option<Self> {
        let start = summaries.first()?.date;
        let end = summaries.last()?.date;
        Some(Self {
            start,
            span: (end - start).num_days() as i32,
        })
    }

    fn offset(&self, date: NaiveDate) -> i32 {
        (date - self.start).num_days() as i32
    }

    fn label(&self, offset: i32) -> String {
        (self.start + Duration::days(offset as i64))
            .format("%d-%m-%Y")
            .to_string()
    }

    /// One padding day on each side keeps edge markers off the frame.
    fn range(&self) -> std::ops::Range<i32> {
        -1..self.span + 1
    }
}

/// Draw the page for `product` into `content`.
pub fn render_product_page(
    content: &mut pdf_writer::Content,
    product: &str,
    summaries: &[DailySummary],
) -> Result<()> {
    let timeline = Timeline::of(summaries)
        .ok_or_else(|| PriceRankError::InvalidArgument(format!("no data for '{}'", product)))?;

    let root = PdfCanvas::new(content, PAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let panels = root.margin(10, 10, 10, 10).split_evenly((3, 1));

    let ours = runs(summaries.iter().map(|s| s.our_price.map(|p| (timeline.offset(s.date), p))));
    let min: Vec<Point> = summaries
        .iter()
        .map(|s| (timeline.offset(s.date), s.min_price))
        .collect();
    let avg: Vec<Point> = summaries
        .iter()
        .map(|s| (timeline.offset(s.date), s.avg_price))
        .collect();

    price_panel(
        &panels[0],
        &timeline,
        &format!("Minimal Price vs. Our Price for {}", product),
        ("Min Price", MIN_COLOR, &min[..]),
        &ours,
    )
    .map_err(render_err)?;

    price_panel(
        &panels[1],
        &timeline,
        &format!("Average Price vs. Our Price for {}", product),
        ("Average Price", AVG_COLOR, &avg[..]),
        &ours,
    )
    .map_err(render_err)?;

    rank_panel(&panels[2], &timeline, product, summaries).map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Split a series at undefined days so lines are not drawn across them.
fn runs(points: impl Iterator<Item = Option<Point>>) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in points {
        match point {
            Some(p) => current.push(p),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn render_err<E: std::fmt::Display>(e: E) -> PriceRankError {
    PriceRankError::Render(e.to_string())
}

/// Padded value range; a flat series still gets a visible band.
fn value_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.1 } else { lo.abs().max(1.0) * 0.1 };
    (lo - pad).max(0.0)..hi + pad
}

fn price_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    timeline: &Timeline,
    title: &str,
    reference: (&str, RGBColor, &[Point]),
    ours: &[Vec<Point>],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (label, color, points) = reference;
    let y_range = value_range(points.iter().chain(ours.iter().flatten()).map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 15))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(timeline.range(), y_range)?;

    let x_fmt = |x: &i32| timeline.label(*x);
    chart
        .configure_mesh()
        .x_labels(MAX_X_LABELS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&|y: &f64| format!("{:.2}", y))
        .x_desc("Date")
        .y_desc("Price")
        .label_style(("sans-serif", 10))
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;

    for (i, run) in ours.iter().enumerate() {
        let series = chart.draw_series(LineSeries::new(run.iter().copied(), OUR_COLOR.stroke_width(2)))?;
        if i == 0 {
            series
                .label("Our Price")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], OUR_COLOR.stroke_width(2)));
        }
    }
    chart.draw_series(ours.iter().flatten().map(|&p| Cross::new(p, 4, OUR_COLOR.stroke_width(2))))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 10))
        .draw()?;

    Ok(())
}

/// Ranks are plotted as negative values so rank 1 sits at the top.
fn rank_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    timeline: &Timeline,
    product: &str,
    summaries: &[DailySummary],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let ranks = runs(summaries.iter().map(|s| s.rank.map(|r| (timeline.offset(s.date), -(r as f64)))));
    let worst = summaries
        .iter()
        .filter_map(|s| s.rank)
        .max()
        .unwrap_or(1)
        .max(summaries.iter().map(|s| s.sellers as u32).max().unwrap_or(1));

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Rank of Our Price for {}", product), ("sans-serif", 15))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(timeline.range(), -(worst as f64 + 0.5)..-0.5)?;

    let x_fmt = |x: &i32| timeline.label(*x);
    let y_fmt = |y: &f64| {
        let rank = -y;
        if (rank - rank.round()).abs() < 1e-6 {
            format!("{}", rank.round() as i64)
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .x_labels(MAX_X_LABELS)
        .x_label_formatter(&x_fmt)
        .y_labels(worst as usize + 1)
        .y_label_formatter(&y_fmt)
        .x_desc("Date")
        .y_desc("Rank")
        .label_style(("sans-serif", 10))
        .draw()?;

    for (i, run) in ranks.iter().enumerate() {
        let series = chart.draw_series(LineSeries::new(run.iter().copied(), RANK_COLOR.stroke_width(2)))?;
        if i == 0 {
            series
                .label("Rank")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RANK_COLOR.stroke_width(2)));
        }
    }
    chart.draw_series(ranks.iter().flatten().map(|&p| Circle::new(p, 3, RANK_COLOR.filled())))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 10))
        .draw()?;

    Ok(())
}

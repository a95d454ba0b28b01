//! PNG rendering of the weight progress graph.

use std::io::Cursor;
use std::path::Path;

use chrono::{Days, NaiveDate};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use tracing::debug;

use crate::data::WeightEntry;
use crate::error::{Error, Result};
use crate::trend::TrendLine;

const GRAPH_WIDTH_PX: u32 = 1000;
const GRAPH_HEIGHT_PX: u32 = 600;

/// Conversion factor used for the total-change legend label
const LBS_PER_KG: f64 = 2.2;

struct GraphStyle;

impl GraphStyle {
    const MARGIN: i32 = 12;
    const CAPTION_FONT: (&'static str, i32) = ("sans-serif", 28);
    const LABEL_FONT: (&'static str, u32) = ("sans-serif", 14);
    const X_LABEL_AREA_SIZE: u32 = 44;
    const Y_LABEL_AREA_SIZE: u32 = 52;
    const X_LABEL_COUNT: usize = 8;
    const MARKER_SIZE: i32 = 3;
    const LEGEND_LINE_LEN: i32 = 18;
    const BACKGROUND: RGBColor = WHITE;
    const SERIES: RGBColor = BLUE;
    const TREND: RGBColor = RED;
}

/// Render the weight series (and trend overlay, if any) to PNG bytes.
///
/// Sparse windows still render: with no entries the axes fall back to a
/// one-day window ending at `today`, and single-point bounds are padded.
pub fn render_png(
    entries: &[WeightEntry],
    trend: Option<&TrendLine>,
    today: NaiveDate,
) -> Result<Vec<u8>> {
    let width = GRAPH_WIDTH_PX;
    let height = GRAPH_HEIGHT_PX;
    let mut rgb_buffer = vec![255u8; width as usize * height as usize * 3];

    {
        let drawing_area =
            BitMapBackend::with_buffer(&mut rgb_buffer, (width, height)).into_drawing_area();
        drawing_area
            .fill(&GraphStyle::BACKGROUND)
            .map_err(|e| Error::Render(format!("background fill: {e}")))?;

        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let (mut x_start, mut x_end) = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => (yesterday, today),
        };
        if x_start == x_end {
            x_start = x_start.checked_sub_days(Days::new(1)).unwrap_or(x_start);
            x_end = x_end.checked_add_days(Days::new(1)).unwrap_or(x_end);
        }

        let (mut y_min, mut y_max) = entries.iter().fold((f64::MAX, f64::MIN), |(lo, hi), e| {
            (lo.min(e.weight), hi.max(e.weight))
        });
        if entries.is_empty() {
            y_min = 0.0;
            y_max = 1.0;
        }
        if y_max - y_min < f64::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }
        let pad = (y_max - y_min) * 0.05;
        y_min -= pad;
        y_max += pad;

        let mut chart = ChartBuilder::on(&drawing_area)
            .margin(GraphStyle::MARGIN)
            .caption("Weight Progress", GraphStyle::CAPTION_FONT)
            .x_label_area_size(GraphStyle::X_LABEL_AREA_SIZE)
            .y_label_area_size(GraphStyle::Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_start..x_end, y_min..y_max)
            .map_err(|e| Error::Render(format!("chart build: {e}")))?;

        chart
            .configure_mesh()
            .x_labels(GraphStyle::X_LABEL_COUNT)
            .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m-%d").to_string())
            .x_desc("Date")
            .y_desc("Weight (lbs)")
            .label_style(GraphStyle::LABEL_FONT)
            .draw()
            .map_err(|e| Error::Render(format!("mesh draw: {e}")))?;

        if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
            let total_change = last.weight - first.weight;
            let sign = if total_change >= 0.0 { "+" } else { "" };
            let series_label = format!(
                "Weight (lbs), total {sign}{total_change:.1} lbs / {sign}{:.1} kg",
                total_change / LBS_PER_KG
            );

            chart
                .draw_series(LineSeries::new(
                    entries.iter().map(|e| (e.date, e.weight)),
                    &GraphStyle::SERIES,
                ))
                .map_err(|e| Error::Render(format!("series draw: {e}")))?
                .label(series_label)
                .legend(|(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + GraphStyle::LEGEND_LINE_LEN, y)],
                        GraphStyle::SERIES,
                    )
                });

            chart
                .draw_series(entries.iter().map(|e| {
                    Circle::new(
                        (e.date, e.weight),
                        GraphStyle::MARKER_SIZE,
                        GraphStyle::SERIES.filled(),
                    )
                }))
                .map_err(|e| Error::Render(format!("marker draw: {e}")))?;

            // Call out the first and last weights next to their points
            chart
                .draw_series([first, last].into_iter().map(|e| {
                    Text::new(
                        format!("{:.1}", e.weight),
                        (e.date, e.weight),
                        GraphStyle::LABEL_FONT,
                    )
                }))
                .map_err(|e| Error::Render(format!("annotation draw: {e}")))?;

            if let Some(trend) = trend {
                let span_days = (last.date - first.date).num_days() as f64;
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![
                            (first.date, trend.value_at(0.0)),
                            (last.date, trend.value_at(span_days)),
                        ],
                        GraphStyle::TREND,
                    )))
                    .map_err(|e| Error::Render(format!("trend draw: {e}")))?
                    .label(format!("Trend ({:+.2} lbs/day)", trend.slope))
                    .legend(|(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + GraphStyle::LEGEND_LINE_LEN, y)],
                            GraphStyle::TREND,
                        )
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| Error::Render(format!("legend draw: {e}")))?;
        }

        drawing_area
            .present()
            .map_err(|e| Error::Render(format!("present: {e}")))?;
    }

    let rgb_image = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| Error::Render("image buffer conversion failed".to_string()))?;
    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|e| Error::Render(format!("png encoding: {e}")))?;

    debug!(bytes = output.get_ref().len(), "rendered weight graph");
    Ok(output.into_inner())
}

/// Write rendered PNG bytes to `path`.
pub fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    std::fs::write(path, png)
        .map_err(|e| Error::Render(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_series_with_trend() {
        let entries = vec![
            WeightEntry::new(date(2024, 1, 1), 182.0),
            WeightEntry::new(date(2024, 1, 2), 181.5),
            WeightEntry::new(date(2024, 1, 3), 181.2),
        ];
        let trend = trend::fit(&entries);
        assert!(trend.is_some());

        let png = render_png(&entries, trend.as_ref(), date(2024, 1, 3)).unwrap();
        assert!(!png.is_empty());
        // PNG magic bytes
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_render_does_not_fail_on_sparse_data() {
        let today = date(2024, 1, 15);

        let png = render_png(&[], None, today).unwrap();
        assert!(!png.is_empty());

        let single = vec![WeightEntry::new(date(2024, 1, 10), 180.0)];
        let png = render_png(&single, None, today).unwrap();
        assert!(!png.is_empty());
    }
}

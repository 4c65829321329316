//! Chart drawing on the plotters SVG backend.

use std::collections::BTreeMap;

use plotters::prelude::*;

use crate::config::{BAR_CHART_SIZE, LINE_CHART_SIZE};
use crate::error::{ChartError, ChartResult};
use crate::models::{Category, CategoryCounts, ClassifiedProvince, YearProvinceTotal};

const FONT: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn category_color(category: Category) -> RGBColor {
    let (r, g, b) = category.rgb();
    RGBColor(r, g, b)
}

fn segment_index(segment: &SegmentValue<usize>) -> Option<usize> {
    match segment {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => Some(*i),
        SegmentValue::Last => None,
    }
}

/// Line chart of yearly totals, one series per province.
pub fn trend_chart(title: &str, totals: &[YearProvinceTotal]) -> ChartResult<String> {
    let mut series: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for total in totals {
        series
            .entry(total.province.as_str())
            .or_default()
            .push((total.year, total.total));
    }

    let (first_year, last_year) = totals
        .iter()
        .map(|t| t.year)
        .fold(None, |acc: Option<(i32, i32)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
        .unwrap_or((0, 1));
    let x_range = if first_year == last_year {
        (first_year - 1)..(last_year + 1)
    } else {
        first_year..last_year
    };
    let year_count = (x_range.end - x_range.start + 1) as usize;

    let y_max = totals.iter().map(|t| t.total).fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, LINE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(110)
            .build_cartesian_2d(x_range, 0f64..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Total Annual Waste (tons)")
            .x_labels(year_count)
            .x_label_formatter(&|year: &i32| year.to_string())
            .y_label_formatter(&|tons: &f64| format!("{:.0}", tons))
            .draw()
            .map_err(render_err)?;

        let has_series = !series.is_empty();
        for (idx, (province, points)) in series.into_iter().enumerate() {
            let color = Palette99::pick(idx).mix(1.0);
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(render_err)?
                .label(province)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        if has_series {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Horizontal bars of province averages, coloured by tier.
pub fn average_chart(provinces: &[ClassifiedProvince]) -> ChartResult<String> {
    let rows = provinces.len().max(1);
    let x_max = provinces.iter().map(|p| p.average).fold(0.0, f64::max);
    let x_max = if x_max > 0.0 { x_max * 1.05 } else { 1.0 };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, BAR_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Average Annual Waste Generation by Province", (FONT, 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d(0f64..x_max, (0usize..rows).into_segmented())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Average Annual Waste (tons)")
            .y_desc("Province")
            .y_labels(rows)
            .y_label_formatter(&|segment: &SegmentValue<usize>| {
                segment_index(segment)
                    .and_then(|i| provinces.get(i))
                    .map(|p| p.province.clone())
                    .unwrap_or_default()
            })
            .x_label_formatter(&|tons: &f64| format!("{:.0}", tons))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::horizontal(&chart)
                    .style_func(|segment, _| {
                        segment_index(segment)
                            .and_then(|i| provinces.get(i))
                            .map(|p| category_color(p.category))
                            .unwrap_or(BLACK)
                            .filled()
                    })
                    .margin(2)
                    .data(provinces.iter().enumerate().map(|(i, p)| (i, p.average))),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Vertical bars with the number of provinces per tier.
pub fn category_count_chart(counts: &CategoryCounts) -> ChartResult<String> {
    let entries = counts.entries();
    let y_max = entries.iter().map(|(_, n)| *n).max().unwrap_or(0) + 1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, BAR_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Categorization of Average Annual Waste Generation in Each Province",
                (FONT, 22),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0usize..entries.len()).into_segmented(), 0usize..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Category")
            .y_desc("Number of Provinces")
            .x_labels(entries.len())
            .x_label_formatter(&|segment: &SegmentValue<usize>| {
                segment_index(segment)
                    .and_then(|i| Category::ALL.get(i))
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style_func(|segment, _| {
                        segment_index(segment)
                            .and_then(|i| Category::ALL.get(i))
                            .map(|c| category_color(*c))
                            .unwrap_or(BLACK)
                            .filled()
                    })
                    .margin(30)
                    .data(entries.iter().enumerate().map(|(i, (_, n))| (i, *n))),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

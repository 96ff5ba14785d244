use std::fmt::Display;
use std::ops::Range;
use std::path::Path;
use log::debug;
use plotters::prelude::*;
use plotters::style::Palette99;

use crate::Trajectory;
use crate::TrajectoryError;

fn plot_error<E: Display>(e: E) -> TrajectoryError {
    TrajectoryError::Plot(e.to_string())
}

/// A plotting range covering all finite values, padded so that constant
/// or empty data still yields a drawable axis.
fn finite_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if lo > hi {
        return 0.0..1.0;
    }
    if (hi - lo).abs() < 1e-12 {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad)..(hi + pad)
}

/// Render a trajectory as an SVG line chart: one line per state variable,
/// time on the x axis. Non-finite samples are left out.
pub fn plot_trajectory<P: AsRef<Path>>(
    trajectory: &Trajectory,
    filename: P,
) -> Result<(), TrajectoryError> {
    let filename = filename.as_ref();
    debug!("Plotting {} samples of {} to {}",
        trajectory.len(), trajectory.name(), filename.display());

    let x_range = finite_range(trajectory.times().iter().copied());
    let y_range = finite_range(trajectory.states().iter().flatten().copied());

    let root = SVGBackend::new(filename, (1024, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(trajectory.name(), ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Value")
        .light_line_style(RGBColor(220, 220, 220))
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(plot_error)?;

    for (var, label) in trajectory.labels().iter().enumerate() {
        let color = Palette99::pick(var).mix(0.9);
        let points: Vec<(f64, f64)> = trajectory.iter()
            .map(|(t, state)| (t, state[var]))
            .filter(|(t, x)| t.is_finite() && x.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_error)?
            .label(label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", 16).into_font())
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

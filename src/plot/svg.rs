use super::{CurveSink, PlotConfig};
use crate::curve::LearningCurve;
use crate::error::{CurveError, Result};
use plotters::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Draws one panel per curve into an SVG file, panels side by side
#[derive(Debug, Clone)]
pub struct SvgChart {
    path: PathBuf,
}

fn plot_err<E: fmt::Display>(err: E) -> CurveError {
    CurveError::PlotError(err.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

impl SvgChart {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn y_limit(curves: &[LearningCurve], config: &PlotConfig) -> f64 {
        if let Some(y_max) = config.y_max {
            return y_max;
        }

        let highest = curves
            .iter()
            .map(|c| {
                if config.show_std {
                    upper_band(&c.validation_errors, &c.validation_std())
                        .max(upper_band(&c.train_errors, &c.train_std()))
                } else {
                    c.max_error()
                }
            })
            .fold(0.0, f64::max);

        if highest > 0.0 {
            highest * 1.1
        } else {
            1.0
        }
    }
}

fn upper_band(means: &[f64], stds: &[f64]) -> f64 {
    means
        .iter()
        .zip(stds)
        .map(|(m, s)| m + s)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

fn band(sizes: &[usize], means: &[f64], stds: &[f64]) -> Vec<(f64, f64)> {
    let upper = sizes
        .iter()
        .zip(means.iter().zip(stds))
        .map(|(&n, (m, s))| (n as f64, m + s));
    let lower = sizes
        .iter()
        .zip(means.iter().zip(stds))
        .rev()
        .map(|(&n, (m, s))| (n as f64, (m - s).max(0.0)));
    upper.chain(lower).collect()
}

impl CurveSink for SvgChart {
    fn emit(&self, curves: &[LearningCurve], config: &PlotConfig) -> Result<()> {
        if curves.is_empty() {
            return Err(CurveError::InvalidInput("no curves to plot".to_string()));
        }

        let title_height = if config.title.is_some() { 40 } else { 0 };
        let size = (config.width * curves.len() as u32, config.height + title_height);

        let root = SVGBackend::new(&self.path, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let root = match &config.title {
            Some(title) => root.titled(title, ("sans-serif", 24)).map_err(plot_err)?,
            None => root,
        };

        let x_max = curves
            .iter()
            .flat_map(|c| c.train_sizes.iter().copied())
            .max()
            .unwrap_or(1) as f64
            * 1.05;
        let y_max = Self::y_limit(curves, config);
        let train_color = rgb(config.train_color);
        let validation_color = rgb(config.validation_color);

        for (area, curve) in root.split_evenly((1, curves.len())).iter().zip(curves) {
            let y_label = config
                .y_label
                .clone()
                .unwrap_or_else(|| curve.metric.to_string());

            let mut chart = ChartBuilder::on(area)
                .caption(curve.estimator.as_str(), ("sans-serif", 18))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(0f64..x_max, 0f64..y_max)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc(config.x_label.as_str())
                .y_desc(y_label.as_str())
                .draw()
                .map_err(plot_err)?;

            let series = [
                ("Training error", &curve.train_errors, curve.train_std(), train_color),
                ("Validation error", &curve.validation_errors, curve.validation_std(), validation_color),
            ];

            for (label, errors, stds, color) in series {
                if config.show_std {
                    chart
                        .draw_series(std::iter::once(Polygon::new(
                            band(&curve.train_sizes, errors, &stds),
                            color.mix(0.2).filled(),
                        )))
                        .map_err(plot_err)?;
                }

                let points: Vec<(f64, f64)> = curve
                    .train_sizes
                    .iter()
                    .zip(errors.iter())
                    .map(|(&n, &e)| (n as f64, e))
                    .collect();

                chart
                    .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                    .map_err(plot_err)?
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

                chart
                    .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
                    .map_err(plot_err)?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
        info!(path = %self.path.display(), panels = curves.len(), "Wrote learning curve chart");
        Ok(())
    }
}

//! Integration tests for chart and table output

use kolosal_curves::prelude::*;
use ndarray::{Array1, Array2};

fn curves() -> Vec<LearningCurve> {
    let x = Array2::from_shape_fn((30, 1), |(i, _)| i as f64 / 3.0);
    let y = Array1::from_shape_fn(30, |i| {
        let v = i as f64 / 3.0;
        v * v - 2.0 * v
    });
    let dataset = Dataset::from_arrays(x, y).unwrap();
    let config = LearningCurveConfig::new(TrainSizes::Absolute(vec![2, 10, 20]))
        .with_folds(3)
        .with_shuffle(true)
        .with_random_state(8);

    LearningCurveRunner::new(config)
        .run_all(
            &[EstimatorConfig::linear(), EstimatorConfig::Polynomial { degree: 2, alpha: 0.0 }],
            &dataset,
        )
        .unwrap()
}

#[test]
fn test_csv_export_long_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curves.csv");
    let curves = curves();

    CsvExport::new(&path).emit(&curves, &PlotConfig::default()).unwrap();

    let df = DataLoader::new().load_auto(&path).unwrap();
    assert_eq!(df.height(), 6);
    let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "estimator",
            "metric",
            "train_size",
            "train_error",
            "validation_error",
            "train_std",
            "validation_std"
        ]
    );
}

#[test]
fn test_csv_frame_matches_curve() {
    let curves = curves();
    let df = CsvExport::to_dataframe(&curves).unwrap();

    let validation = df.column("validation_error").unwrap().f64().unwrap();
    assert_eq!(validation.get(1), Some(curves[0].validation_errors[1]));
    let sizes = df.column("train_size").unwrap().u64().unwrap();
    assert_eq!(sizes.get(5), Some(20));
}

#[test]
fn test_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curves.json");
    let curves = curves();
    let config = PlotConfig::default().with_title("Quadratic data");

    JsonExport::new(&path).emit(&curves, &config).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["title"], "Quadratic data");
    assert!(report["generated_at"].is_string());
    assert_eq!(report["curves"].as_array().unwrap().len(), 2);

    let points = report["curves"][1]["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[2]["train_size"], 20);
    assert_eq!(points[0]["train_folds"].as_array().unwrap().len(), 3);
}

#[test]
fn test_svg_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curves.svg");
    let config = PlotConfig::default().with_title("Learning curves").with_size(400, 300);

    SvgChart::new(&path).emit(&curves(), &config).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Learning curves"));
}

#[test]
fn test_svg_without_band_or_title() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.svg");
    let config = PlotConfig::default().with_std(false).with_y_max(50.0);

    SvgChart::new(&path).emit(&curves()[..1], &config).unwrap();
    assert!(path.exists());
}

#[test]
fn test_svg_rejects_no_curves() {
    let dir = tempfile::tempdir().unwrap();
    let result = SvgChart::new(dir.path().join("none.svg")).emit(&[], &PlotConfig::default());
    assert!(result.is_err());
}

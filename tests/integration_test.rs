//! Integration tests for movieinfo
//!
//! These tests run the full pipeline from a localisation file on disk to a
//! movieInfo MAT-file and read the result back.

use movieinfo::formats::{FormatError, LocalisationFormat};
use movieinfo::mat::{read_movie_info, read_variables, MatValue};
use movieinfo::movie_info::MovieInfoError;
use movieinfo::pipeline::{convert_file, default_output_path, ConversionError, ConversionOptions};
use movieinfo::validator::validate_movie_info_file;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const XYT_SAMPLE: &str = "x\ty\tframe\n10.0\t20.0\t0\n12.0\t22.0\t0\n5.0\t5.0\t2\n";

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn files_in(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

/// xyt rows in frames 0, 0 and 2
#[test]
fn test_xyt_example_scenario() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "cells.txt", XYT_SAMPLE);
    let output = default_output_path(&input);
    assert_eq!(output, dir.path().join("cells_movieInfo.mat"));

    let stats = convert_file(&input, &output, &ConversionOptions::default()).unwrap();
    assert_eq!(stats.max_frame, 2);
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.detections, 3);

    let movie = read_movie_info(&output).unwrap();
    assert_eq!(movie.len(), 3);
    assert_eq!(movie.slots()[0].detections(), 2);
    assert_eq!(movie.slots()[1].detections(), 0);
    assert_eq!(movie.slots()[2].detections(), 1);

    assert_eq!(movie.slots()[0].x_coord, vec![[10.0, 0.0], [12.0, 0.0]]);
    assert_eq!(movie.slots()[0].y_coord, vec![[20.0, 0.0], [22.0, 0.0]]);
    assert_eq!(movie.slots()[0].amp, vec![[1.0, 0.0], [1.0, 0.0]]);
    assert_eq!(movie.slots()[2].x_coord, vec![[5.0, 0.0]]);
}

/// Empty frames are stored as empty double matrices
#[test]
fn test_empty_frame_representation() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "cells.txt", XYT_SAMPLE);
    let output = dir.path().join("out.mat");
    convert_file(&input, &output, &ConversionOptions::default()).unwrap();

    let variables = read_variables(File::open(&output).unwrap()).unwrap();
    let movie_info = &variables[0].value;
    for field in ["xCoord", "yCoord", "amp"] {
        let value = movie_info.field(1, field).unwrap();
        assert!(matches!(value, MatValue::Double { data, .. } if data.is_empty()));
        assert_eq!(value.dims(), &[0, 0]);
    }
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "cells.txt", XYT_SAMPLE);
    let first = dir.path().join("first.mat");
    let second = dir.path().join("second.mat");
    let options = ConversionOptions::default().with_pixel_size(3.0);

    convert_file(&input, &first, &options).unwrap();
    convert_file(&input, &second, &options).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    // Rewriting over an existing output gives the same bytes again
    convert_file(&input, &first, &options).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_pixel_size_scaling() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "cells.txt", XYT_SAMPLE);
    let output = dir.path().join("out.mat");
    let options = ConversionOptions::default().with_pixel_size(2.0);
    convert_file(&input, &output, &options).unwrap();

    let movie = read_movie_info(&output).unwrap();
    let xs: Vec<f64> = movie.slots()[0].x_coord.iter().map(|p| p[0]).collect();
    assert!((xs[0] - 5.0).abs() < 1e-9);
    assert!((xs[1] - 6.0).abs() < 1e-9);
    assert!((movie.slots()[2].y_coord[0][0] - 2.5).abs() < 1e-9);
}

#[test]
fn test_rapidstorm_conversion() {
    let dir = tempdir().unwrap();
    let content = concat!(
        r#"# <localizations insequence="true" repeat="stack">"#,
        r#"<field identifier="Position-0-0" unit="nanometer" />"#,
        r#"<field identifier="Position-1-0" unit="nanometer" />"#,
        r#"<field identifier="ImageNumber-0-0" unit="frame" />"#,
        r#"<field identifier="Amplitude-0-0" unit="A/D count" />"#,
        r#"<field identifier="FitResidues-0-0" unit="dimensionless" />"#,
        r#"<field identifier="LocalBackground-0-0" unit="A/D count" />"#,
        "</localizations>\n",
        "1060 2120 1 960 12.5 40\n",
        "530 530 0 480 3.5 20\n",
    );
    let input = write_input(&dir, "storm.txt", content);
    let output = dir.path().join("storm.mat");
    let options = ConversionOptions::new(LocalisationFormat::RapidStorm)
        .with_pixel_size(106.0)
        .with_photon_conversion(9.6)
        .with_compression(true);

    let stats = convert_file(&input, &output, &options).unwrap();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.empty_frames, 0);

    let movie = read_movie_info(&output).unwrap();
    let frame0 = &movie.slots()[0];
    assert!((frame0.x_coord[0][0] - 5.0).abs() < 1e-9);
    assert!((frame0.amp[0][0] - 50.0).abs() < 1e-9);
    let frame1 = &movie.slots()[1];
    assert!((frame1.y_coord[0][0] - 20.0).abs() < 1e-9);
    assert!((frame1.amp[0][0] - 100.0).abs() < 1e-9);
}

#[test]
fn test_thunderstorm_conversion() {
    let dir = tempdir().unwrap();
    let content = "frame\tx\ty\tsigma\tintensity [photon]\tuncertainty\n\
                   1\t40\t80\t1.2\t900\t8\n\
                   1\t20\t20\t1.1\t450\t12\n";
    let input = write_input(&dir, "ts.csv", content);
    let output = default_output_path(&input);
    let options = ConversionOptions::new("tunderstorm".parse().unwrap()).with_pixel_size(10.0);

    convert_file(&input, &output, &options).unwrap();
    let movie = read_movie_info(&output).unwrap();

    assert_eq!(movie.len(), 2);
    assert!(movie.slots()[0].is_empty());
    let frame = &movie.slots()[1];
    assert_eq!(frame.x_coord, vec![[4.0, 8.0], [2.0, 12.0]]);
    assert_eq!(frame.y_coord, vec![[8.0, 8.0], [2.0, 12.0]]);
    assert_eq!(frame.amp, vec![[900.0, 0.0], [450.0, 0.0]]);
}

#[test]
fn test_missing_image_number_writes_nothing() {
    let dir = tempdir().unwrap();
    let content = concat!(
        r#"# <localizations><field identifier="Position-0-0"/>"#,
        r#"<field identifier="Position-1-0"/><field identifier="Amplitude-0-0"/></localizations>"#,
        "\n1 2 3\n",
    );
    let input = write_input(&dir, "storm.txt", content);
    let output = dir.path().join("storm.mat");
    let options = ConversionOptions::new(LocalisationFormat::RapidStorm);

    let err = convert_file(&input, &output, &options).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Format(FormatError::MissingRequiredField(ref f)) if f == "ImageNumber-0-0"
    ));
    assert!(!output.exists());
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn test_empty_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "empty.txt", "x\ty\tframe\n");
    let output = dir.path().join("empty.mat");

    let err = convert_file(&input, &output, &ConversionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::MovieInfo(MovieInfoError::EmptyInput)
    ));
    assert!(!output.exists());
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn test_out_of_range_frame_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "far.txt", "x\ty\tframe\n1\t2\t4000000000\n");
    let output = dir.path().join("far.mat");

    let err = convert_file(&input, &output, &ConversionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::MovieInfo(MovieInfoError::ConversionFailure {
            frame: 4_000_000_000,
            ..
        })
    ));
    assert!(!output.exists());
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn test_malformed_row_aborts() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "bad.txt", "x\ty\tframe\n1\t2\t0\n1\tabc\t1\n");
    let output = dir.path().join("bad.mat");

    let err = convert_file(&input, &output, &ConversionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Format(FormatError::ConversionFailure { line: 3, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn test_converted_file_validates() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "cells.txt", XYT_SAMPLE);
    let output = default_output_path(&input);
    convert_file(&input, &output, &ConversionOptions::default()).unwrap();

    let report = validate_movie_info_file(&output).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
}

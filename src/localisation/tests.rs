use super::*;

fn seq(index: &[FrameIndex]) -> Vec<(u32, usize)> {
    index.iter().map(|i| (i.frame, i.sequence)).collect()
}

#[test]
fn test_frame_index_resets_on_change() {
    let index = frame_index([0, 0, 0, 1, 3, 3]);
    assert_eq!(
        seq(&index),
        vec![(0, 0), (0, 1), (0, 2), (1, 0), (3, 0), (3, 1)]
    );
    assert_eq!(index[4].label(), "frame_3");
}

#[test]
fn test_frame_index_first_frame_nonzero() {
    let index = frame_index([5, 5]);
    assert_eq!(seq(&index), vec![(5, 0), (5, 1)]);
}

#[test]
fn test_frame_index_disjoint_runs_restart() {
    // Documented limitation: unsorted repeats restart the counter.
    let index = frame_index([2, 2, 1, 2]);
    assert_eq!(seq(&index), vec![(2, 0), (2, 1), (1, 0), (2, 0)]);
}

#[test]
fn test_frame_index_empty() {
    assert!(frame_index(std::iter::empty()).is_empty());
}

#[test]
fn test_table_sorts_stably() {
    let rows = vec![
        LocalisationRow::new(2, 5.0, 5.0),
        LocalisationRow::new(0, 10.0, 20.0),
        LocalisationRow::new(2, 6.0, 6.0),
        LocalisationRow::new(0, 12.0, 22.0),
    ];
    let table = LocalisationTable::new(rows, Vec::new());

    let xs: Vec<f64> = table.rows().iter().map(|r| r.x).collect();
    assert_eq!(xs, vec![10.0, 12.0, 5.0, 6.0]);
    assert_eq!(seq(table.index()), vec![(0, 0), (0, 1), (2, 0), (2, 1)]);
    assert_eq!(table.min_frame(), Some(0));
    assert_eq!(table.max_frame(), Some(2));
    assert_eq!(table.frame_count(), 2);
}

#[test]
fn test_table_columns() {
    let mut row = LocalisationRow::new(1, 3.0, 4.0);
    row.extra = vec![42.0];
    let table = LocalisationTable::new(vec![row], vec!["sigma".to_string()]);

    assert_eq!(table.column("frame"), Some(vec![1.0]));
    assert_eq!(table.column("y"), Some(vec![4.0]));
    assert_eq!(table.column("sigma"), Some(vec![42.0]));
    assert!(table.column("snr").unwrap()[0].is_nan());
    assert_eq!(table.column("unknown"), None);
}

#[test]
fn test_retain_rebuilds_index() {
    let rows = vec![
        LocalisationRow::new(0, 1.0, 1.0),
        LocalisationRow::new(0, 2.0, 2.0),
        LocalisationRow::new(0, 3.0, 3.0),
    ];
    let table = LocalisationTable::new(rows, Vec::new()).retain(|r| r.x > 1.5);

    assert_eq!(table.len(), 2);
    assert_eq!(seq(table.index()), vec![(0, 0), (0, 1)]);
}

#[test]
fn test_normalize_scales_positions_and_amplitude() {
    let rows = vec![LocalisationRow::new(0, 10.0, 20.0)
        .with_uncertainty(3.0, 4.0)
        .with_amplitude(500.0)
        .with_local_background(50.0)];
    let table = normalize(
        LocalisationTable::new(rows, Vec::new()),
        &UnitConversion::new(2.0, 10.0),
    );

    let row = &table.rows()[0];
    assert!((row.x - 5.0).abs() < 1e-9);
    assert!((row.y - 10.0).abs() < 1e-9);
    assert!((row.amplitude - 50.0).abs() < 1e-9);
    // SNR is taken from the raw amplitude
    assert!((row.signal_to_noise.unwrap() - 10.0).abs() < 1e-9);
    // Uncertainties stay in source units
    assert_eq!(row.x_uncertainty, 3.0);
    assert_eq!(row.y_uncertainty, 4.0);
}

#[test]
fn test_normalize_without_background_leaves_snr_absent() {
    let table = normalize(
        LocalisationTable::new(vec![LocalisationRow::new(0, 1.0, 1.0)], Vec::new()),
        &UnitConversion::default(),
    );
    assert!(!table.has_signal_to_noise());
}

#[test]
fn test_normalize_zero_background_propagates() {
    let rows = vec![LocalisationRow::new(0, 1.0, 1.0)
        .with_amplitude(100.0)
        .with_local_background(0.0)];
    let table = normalize(LocalisationTable::new(rows, Vec::new()), &UnitConversion::default());
    assert!(table.rows()[0].signal_to_noise.unwrap().is_infinite());
}

#[test]
fn test_unit_conversion_validate() {
    assert!(UnitConversion::default().validate().is_ok());
    assert!(UnitConversion::pixels(0.0).validate().is_err());
    assert!(UnitConversion::new(1.0, f64::NAN).validate().is_err());
    assert!(UnitConversion::pixels(-2.0).validate().is_err());
}

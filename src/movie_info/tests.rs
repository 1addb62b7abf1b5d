use super::*;
use crate::localisation::{LocalisationRow, LocalisationTable};
use proptest::prelude::*;

fn table(rows: &[(u32, f64, f64)]) -> LocalisationTable {
    LocalisationTable::new(
        rows.iter()
            .map(|&(frame, x, y)| LocalisationRow::new(frame, x, y))
            .collect(),
        Vec::new(),
    )
}

#[test]
fn test_buckets_keep_row_order() {
    let map = FrameBucketMap::from_table(&table(&[
        (0, 10.0, 20.0),
        (2, 5.0, 5.0),
        (0, 12.0, 22.0),
    ]))
    .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.total_rows(), 3);
    assert_eq!(map.max_frame(), Some(2));
    assert!(map.get(1).is_none());

    let frame0 = map.get(0).unwrap();
    assert_eq!(frame0[0].x, 10.0);
    assert_eq!(frame0[1].x, 12.0);
    assert_eq!(frame0[1].placeholder, 0.0);
}

#[test]
fn test_emission_rejects_non_finite_position() {
    let err = FrameBucketMap::from_table(&table(&[(3, f64::NAN, 1.0)])).unwrap_err();
    assert!(matches!(err, MovieInfoError::ConversionFailure { frame: 3, .. }));
}

#[test]
fn test_build_example_scenario() {
    let map = FrameBucketMap::from_table(&table(&[
        (0, 10.0, 20.0),
        (0, 12.0, 22.0),
        (2, 5.0, 5.0),
    ]))
    .unwrap();
    let movie = MovieInfoArray::build(&map).unwrap();

    assert_eq!(movie.len(), 3);
    assert_eq!(movie.max_frame(), Some(2));
    assert_eq!(movie.get(0).unwrap().detections(), 2);
    assert_eq!(movie.get(1).unwrap().detections(), 0);
    assert_eq!(movie.get(2).unwrap().detections(), 1);
    assert_eq!(movie.empty_frames(), 1);

    let frame0 = movie.get(0).unwrap();
    assert_eq!(frame0.x_coord, vec![[10.0, 0.0], [12.0, 0.0]]);
    assert_eq!(frame0.y_coord, vec![[20.0, 0.0], [22.0, 0.0]]);
    assert_eq!(frame0.amp, vec![[1.0, 0.0], [1.0, 0.0]]);
}

#[test]
fn test_empty_frames_hold_empty_sequences() {
    let map = FrameBucketMap::from_table(&table(&[(3, 1.0, 1.0)])).unwrap();
    let movie = MovieInfoArray::build(&map).unwrap();

    for frame in 0..3 {
        let slot = movie.get(frame).unwrap();
        assert!(slot.x_coord.is_empty());
        assert!(slot.y_coord.is_empty());
        assert!(slot.amp.is_empty());
        assert_eq!(slot, &FrameSlot::empty());
    }
}

#[test]
fn test_build_empty_input() {
    let err = MovieInfoArray::build(&FrameBucketMap::new()).unwrap_err();
    assert!(matches!(err, MovieInfoError::EmptyInput));
}

#[test]
fn test_build_rejects_frame_past_mat_range() {
    for frame in [MAX_FRAME + 1, 4_000_000_000, u32::MAX] {
        let map = FrameBucketMap::from_table(&table(&[(frame, 1.0, 2.0)])).unwrap();
        let err = MovieInfoArray::build(&map).unwrap_err();
        assert!(
            matches!(err, MovieInfoError::ConversionFailure { frame: f, .. } if f == frame),
            "frame {} gave {:?}",
            frame,
            err
        );
    }
}

#[test]
fn test_emission_carries_photometry() {
    let row = LocalisationRow::new(0, 1.0, 2.0)
        .with_uncertainty(0.1, 0.2)
        .with_amplitude(300.0);
    let slot = FrameSlot::from_emissions(&[Emission::from_row(&row).unwrap()]);

    assert_eq!(slot.x_coord, vec![[1.0, 0.1]]);
    assert_eq!(slot.y_coord, vec![[2.0, 0.2]]);
    assert_eq!(slot.amp, vec![[300.0, 0.0]]);
}

proptest! {
    #[test]
    fn prop_bucket_total_matches_rows(frames in prop::collection::vec(0u32..50, 0..200)) {
        let rows: Vec<(u32, f64, f64)> = frames.iter().map(|&f| (f, f64::from(f), 1.0)).collect();
        let map = FrameBucketMap::from_table(&table(&rows)).unwrap();
        prop_assert_eq!(map.total_rows(), frames.len());
    }

    #[test]
    fn prop_dense_length_is_max_frame_plus_one(frames in prop::collection::vec(0u32..50, 1..200)) {
        let rows: Vec<(u32, f64, f64)> = frames.iter().map(|&f| (f, 0.5, 0.5)).collect();
        let map = FrameBucketMap::from_table(&table(&rows)).unwrap();
        let movie = MovieInfoArray::build(&map).unwrap();

        let max = *frames.iter().max().unwrap() as usize;
        prop_assert_eq!(movie.len(), max + 1);
        prop_assert_eq!(movie.total_detections(), frames.len());
        for (frame, slot) in movie.slots().iter().enumerate() {
            let expected = frames.iter().filter(|&&f| f as usize == frame).count();
            prop_assert_eq!(slot.detections(), expected);
            prop_assert_eq!(slot.amp.len(), slot.y_coord.len());
        }
    }
}

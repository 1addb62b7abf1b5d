use super::*;
use crate::movie_info::{FrameSlot, MovieInfoArray};
use std::io::Cursor;

fn sample_movie() -> MovieInfoArray {
    MovieInfoArray::from_slots(vec![
        FrameSlot {
            x_coord: vec![[10.0, 0.1], [12.0, 0.2]],
            y_coord: vec![[20.0, 0.3], [22.0, 0.4]],
            amp: vec![[500.0, 0.0], [600.0, 0.0]],
        },
        FrameSlot::empty(),
        FrameSlot {
            x_coord: vec![[5.0, 0.0]],
            y_coord: vec![[5.0, 0.0]],
            amp: vec![[1.0, 0.0]],
        },
    ])
}

fn write_to_vec(movie: &MovieInfoArray, compress: bool) -> Vec<u8> {
    let mut writer = MatWriter::new(Vec::new(), MatWriterConfig { compress }).unwrap();
    writer.write_movie_info(movie).unwrap();
    writer.finish().unwrap()
}

#[test]
fn test_header_layout() {
    let bytes = write_to_vec(&sample_movie(), false);

    assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
    assert_eq!(&bytes[124..126], &[0x00, 0x01]);
    assert_eq!(&bytes[126..128], b"IM");
    // First element is an uncompressed miMATRIX, 8-byte aligned
    assert_eq!(&bytes[128..132], &14u32.to_le_bytes());
    assert_eq!((bytes.len() - HEADER_SIZE) % 8, 0);
}

#[test]
fn test_struct_layout() {
    let bytes = write_to_vec(&sample_movie(), false);
    let variables = read_variables(Cursor::new(bytes)).unwrap();

    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].name, "movieInfo");
    let value = &variables[0].value;
    assert_eq!(value.dims(), &[3, 1]);

    let MatValue::Struct { fields, .. } = value else {
        panic!("movieInfo should be a struct array");
    };
    assert_eq!(fields, &["xCoord", "yCoord", "amp"]);

    // N x 2, column-major
    assert_eq!(
        value.field(0, "xCoord"),
        Some(&MatValue::Double {
            dims: vec![2, 2],
            data: vec![10.0, 12.0, 0.1, 0.2],
        })
    );
    // Empty frames are empty doubles, never a zero scalar
    let empty = value.field(1, "amp").unwrap();
    assert_eq!(empty, &MatValue::empty_double());
    assert!(empty.is_empty());
    assert_eq!(value.field(2, "yCoord").unwrap().dims(), &[1, 2]);
}

#[test]
fn test_movie_info_survives_write_and_read() {
    for compress in [false, true] {
        let bytes = write_to_vec(&sample_movie(), compress);
        let variables = read_variables(Cursor::new(bytes)).unwrap();
        let movie = movie_info_from_value(&variables[0].value).unwrap();
        assert_eq!(movie, sample_movie());
    }
}

#[test]
fn test_compressed_element_tag() {
    let bytes = write_to_vec(&sample_movie(), true);
    assert_eq!(&bytes[128..132], &15u32.to_le_bytes());
}

#[test]
fn test_output_is_deterministic() {
    assert_eq!(
        write_to_vec(&sample_movie(), false),
        write_to_vec(&sample_movie(), false)
    );
}

#[test]
fn test_write_file_is_atomic_and_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells_movieInfo.mat");

    let size = write_movie_info_file(&path, &sample_movie(), &MatWriterConfig::default()).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
    assert_eq!(read_movie_info(&path).unwrap(), sample_movie());
    // Only the output remains in the directory
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_reject_big_endian() {
    let mut bytes = write_to_vec(&sample_movie(), false);
    bytes[126..128].copy_from_slice(b"MI");
    assert!(matches!(
        read_variables(Cursor::new(bytes)),
        Err(MatError::Unsupported(_))
    ));
}

#[test]
fn test_truncated_file() {
    let bytes = write_to_vec(&sample_movie(), false);
    let truncated = bytes[..bytes.len() - 20].to_vec();
    assert!(matches!(
        read_variables(Cursor::new(truncated)),
        Err(MatError::InvalidData(_))
    ));
}

/// MAT-file holding `depth` nested 1 x 1 structs with a single field `a`
fn nested_structs(depth: usize) -> Vec<u8> {
    fn tag(out: &mut Vec<u8>, data_type: u32, len: usize) {
        out.extend_from_slice(&data_type.to_le_bytes());
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }

    let mut body = Vec::new();
    for _ in 0..depth {
        let mut m = Vec::new();
        tag(&mut m, 6, 8);
        m.extend_from_slice(&[2, 0, 0, 0, 0, 0, 0, 0]);
        tag(&mut m, 5, 8);
        m.extend_from_slice(&1i32.to_le_bytes());
        m.extend_from_slice(&1i32.to_le_bytes());
        tag(&mut m, 1, 0);
        tag(&mut m, 5, 4);
        m.extend_from_slice(&32i32.to_le_bytes());
        m.extend_from_slice(&[0; 4]);
        tag(&mut m, 1, 32);
        let mut name = [0u8; 32];
        name[0] = b'a';
        m.extend_from_slice(&name);
        tag(&mut m, 14, body.len());
        m.extend_from_slice(&body);
        body = m;
    }

    let mut bytes = write_to_vec(&sample_movie(), false)[..HEADER_SIZE].to_vec();
    tag(&mut bytes, 14, body.len());
    bytes.extend_from_slice(&body);
    bytes
}

#[test]
fn test_nested_structs_within_depth_limit() {
    let variables = read_variables(Cursor::new(nested_structs(MAX_STRUCT_DEPTH))).unwrap();
    assert_eq!(variables.len(), 1);

    let mut value = &variables[0].value;
    for _ in 0..MAX_STRUCT_DEPTH {
        value = value.field(0, "a").unwrap();
    }
    assert_eq!(value, &MatValue::empty_double());
}

#[test]
fn test_deeply_nested_structs_are_rejected() {
    for depth in [MAX_STRUCT_DEPTH + 1, 1000] {
        assert!(matches!(
            read_variables(Cursor::new(nested_structs(depth))),
            Err(MatError::Unsupported(_))
        ));
    }
}

#[test]
fn test_nested_compression_is_rejected() {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let compressed = write_to_vec(&sample_movie(), true);
    let inner = &compressed[HEADER_SIZE..];
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(inner).unwrap();
    let payload = encoder.finish().unwrap();

    let mut bytes = compressed[..HEADER_SIZE].to_vec();
    bytes.extend_from_slice(&15u32.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&payload);
    assert!(matches!(
        read_variables(Cursor::new(bytes)),
        Err(MatError::InvalidData(_))
    ));
}

#[test]
fn test_inconsistent_value_is_rejected() {
    let value = MatValue::Double {
        dims: vec![2, 2],
        data: vec![1.0],
    };
    let mut writer = MatWriter::new(Vec::new(), MatWriterConfig::default()).unwrap();
    assert!(matches!(
        writer.write_variable("bad", &value),
        Err(MatError::InvalidData(_))
    ));
}

#[test]
fn test_pairs_value() {
    assert_eq!(MatValue::pairs(&[]), MatValue::empty_double());
    let value = MatValue::pairs(&[[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(value.as_pairs(), Some(vec![[1.0, 2.0], [3.0, 4.0]]));
    assert_eq!(value.numel(), 4);
}

#[test]
fn test_data_type_codes() {
    assert_eq!(DataType::from_code(9), Some(DataType::Double));
    assert_eq!(DataType::Double.byte_size(), 8);
    assert_eq!(DataType::from_code(14), None);
}

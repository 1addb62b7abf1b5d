use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use log::{debug, trace};

use super::types::{
    DataType, MatValue, MatVariable, ENDIAN_INDICATOR, FLAG_COMPLEX, HEADER_SIZE, MAT_VERSION,
    MI_COMPRESSED, MI_MATRIX, MX_DOUBLE_CLASS, MX_STRUCT_CLASS,
};
use super::MatError;
use crate::movie_info::{FrameSlot, MovieInfoArray, MOVIE_INFO_FIELDS, MOVIE_INFO_VARIABLE};

/// Deepest struct nesting accepted; movieInfo itself needs one level
pub const MAX_STRUCT_DEPTH: usize = 4;

/// Sequential reader over the data elements of a byte buffer
struct ElementReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ElementReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Next `(type, payload)` pair
    fn next_element(&mut self) -> Result<(u32, &'a [u8]), MatError> {
        let remaining = &self.data[self.pos.min(self.data.len())..];
        if remaining.len() < 8 {
            return Err(MatError::invalid("truncated data element tag"));
        }
        let mut tag = remaining;
        let first = tag.read_u32::<LittleEndian>()?;

        if first >> 16 != 0 {
            let data_type = first & 0xffff;
            let len = (first >> 16) as usize;
            if len > 4 {
                return Err(MatError::invalid("small data element longer than 4 bytes"));
            }
            self.pos += 8;
            return Ok((data_type, &remaining[4..4 + len]));
        }

        let len = tag.read_u32::<LittleEndian>()? as usize;
        let payload = remaining
            .get(8..8 + len)
            .ok_or_else(|| MatError::invalid(format!("data element of {} bytes is truncated", len)))?;
        self.pos += 8 + len;
        if first != MI_COMPRESSED {
            self.pos += (8 - len % 8) % 8;
        }
        Ok((first, payload))
    }

    fn expect_element(&mut self, expected: DataType, what: &str) -> Result<&'a [u8], MatError> {
        let (data_type, payload) = self.next_element()?;
        if data_type != expected.code() {
            return Err(MatError::invalid(format!(
                "{} stored as type {}, expected {:?}",
                what, data_type, expected
            )));
        }
        Ok(payload)
    }
}

/// Read every variable of a Level 5 MAT-file.
///
/// Only little-endian files with double and struct arrays are understood;
/// top-level elements of other kinds are skipped.
pub fn read_variables<R: Read>(mut reader: R) -> Result<Vec<MatVariable>, MatError> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    if &header[126..128] != ENDIAN_INDICATOR {
        return Err(MatError::Unsupported(
            "big-endian or non Level 5 MAT-file".to_string(),
        ));
    }
    let version = u16::from_le_bytes([header[124], header[125]]);
    if version != MAT_VERSION {
        return Err(MatError::Unsupported(format!("MAT version {:#06x}", version)));
    }

    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let variables = parse_elements(&data, false)?;
    debug!("Read {} MAT variables", variables.len());
    Ok(variables)
}

fn parse_elements(data: &[u8], inflated: bool) -> Result<Vec<MatVariable>, MatError> {
    let mut elements = ElementReader::new(data);
    let mut variables = Vec::new();

    while !elements.is_at_end() {
        let (data_type, payload) = elements.next_element()?;
        match data_type {
            MI_MATRIX => {
                let (name, value) = parse_matrix(payload, 0)?;
                variables.push(MatVariable { name, value });
            }
            MI_COMPRESSED if inflated => {
                return Err(MatError::invalid("compressed element inside a compressed element"));
            }
            MI_COMPRESSED => {
                let mut body = Vec::new();
                ZlibDecoder::new(payload).read_to_end(&mut body)?;
                variables.extend(parse_elements(&body, true)?);
            }
            other => trace!("Skipping top-level element of type {}", other),
        }
    }
    Ok(variables)
}

/// Decode the body of a `miMATRIX` element into its name and value.
///
/// `depth` counts the enclosing struct arrays.
fn parse_matrix(payload: &[u8], depth: usize) -> Result<(String, MatValue), MatError> {
    // MATLAB writes empty struct fields as bodiless matrices
    if payload.is_empty() {
        return Ok((String::new(), MatValue::empty_double()));
    }

    let mut r = ElementReader::new(payload);
    let flags = r.expect_element(DataType::UInt32, "array flags")?;
    if flags.len() < 8 {
        return Err(MatError::invalid("array flags shorter than 8 bytes"));
    }
    let class = flags[0];
    if flags[1] & FLAG_COMPLEX != 0 {
        return Err(MatError::Unsupported("complex arrays".to_string()));
    }

    let dims = r
        .expect_element(DataType::Int32, "dimensions")?
        .chunks_exact(4)
        .map(|c| {
            let d = i32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            usize::try_from(d).map_err(|_| MatError::invalid(format!("negative dimension {}", d)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let numel = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| MatError::invalid(format!("dimensions {:?} overflow", dims)))?;

    let (_, name) = r.next_element()?;
    let name = String::from_utf8_lossy(name).into_owned();

    let value = match class {
        MX_DOUBLE_CLASS => {
            let data = if numel == 0 && r.is_at_end() {
                Vec::new()
            } else {
                let (data_type, real) = r.next_element()?;
                numeric_values(data_type, real)?
            };
            MatValue::Double { dims, data }
        }
        MX_STRUCT_CLASS if depth >= MAX_STRUCT_DEPTH => {
            return Err(MatError::Unsupported(format!(
                "struct arrays nested deeper than {} levels",
                MAX_STRUCT_DEPTH
            )));
        }
        MX_STRUCT_CLASS => {
            let len_bytes = r.expect_element(DataType::Int32, "field name length")?;
            if len_bytes.len() < 4 {
                return Err(MatError::invalid("field name length element too short"));
            }
            let name_len =
                i32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
            let name_len = usize::try_from(name_len)
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| MatError::invalid("field name length must be positive"))?;

            let fields: Vec<String> = r
                .expect_element(DataType::Int8, "field names")?
                .chunks(name_len)
                .map(|chunk| {
                    let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                    String::from_utf8_lossy(&chunk[..end]).into_owned()
                })
                .collect();

            // Every element needs at least one tag, which bounds the count
            if numel.saturating_mul(fields.len().max(1)) > payload.len() / 8 {
                return Err(MatError::invalid(format!(
                    "{} struct elements cannot fit in {} bytes",
                    numel,
                    payload.len()
                )));
            }
            let mut elements = Vec::with_capacity(numel);
            for _ in 0..numel {
                let mut element = Vec::with_capacity(fields.len());
                for _ in &fields {
                    let (data_type, sub) = r.next_element()?;
                    if data_type != MI_MATRIX {
                        return Err(MatError::invalid("struct field is not a matrix"));
                    }
                    element.push(parse_matrix(sub, depth + 1)?.1);
                }
                elements.push(element);
            }
            MatValue::Struct {
                dims,
                fields,
                elements,
            }
        }
        other => return Err(MatError::Unsupported(format!("array class {}", other))),
    };

    value.check_consistent()?;
    Ok((name, value))
}

/// Widen stored numeric data to `f64`.
fn numeric_values(data_type: u32, bytes: &[u8]) -> Result<Vec<f64>, MatError> {
    let storage = DataType::from_code(data_type)
        .ok_or_else(|| MatError::Unsupported(format!("numeric storage type {}", data_type)))?;
    let size = storage.byte_size();
    if bytes.len() % size != 0 {
        return Err(MatError::invalid(format!(
            "{} bytes is not a multiple of {:?} width",
            bytes.len(),
            storage
        )));
    }

    let mut cursor = bytes;
    let mut values = Vec::with_capacity(bytes.len() / size);
    for _ in 0..bytes.len() / size {
        let v = match storage {
            DataType::Int8 => f64::from(cursor.read_i8()?),
            DataType::UInt8 => f64::from(cursor.read_u8()?),
            DataType::Int16 => f64::from(cursor.read_i16::<LittleEndian>()?),
            DataType::UInt16 => f64::from(cursor.read_u16::<LittleEndian>()?),
            DataType::Int32 => f64::from(cursor.read_i32::<LittleEndian>()?),
            DataType::UInt32 => f64::from(cursor.read_u32::<LittleEndian>()?),
            DataType::Single => f64::from(cursor.read_f32::<LittleEndian>()?),
            DataType::Double => cursor.read_f64::<LittleEndian>()?,
            DataType::Int64 => cursor.read_i64::<LittleEndian>()? as f64,
            DataType::UInt64 => cursor.read_u64::<LittleEndian>()? as f64,
        };
        values.push(v);
    }
    Ok(values)
}

/// Rebuild a [`MovieInfoArray`] from a decoded `movieInfo` struct array.
pub fn movie_info_from_value(value: &MatValue) -> Result<MovieInfoArray, MatError> {
    let MatValue::Struct { fields, .. } = value else {
        return Err(MatError::invalid("movieInfo is not a struct array"));
    };
    for required in MOVIE_INFO_FIELDS {
        if !fields.iter().any(|f| f == required) {
            return Err(MatError::invalid(format!("movieInfo has no '{}' field", required)));
        }
    }

    let pairs = |index: usize, field: &str| {
        value
            .field(index, field)
            .and_then(MatValue::as_pairs)
            .ok_or_else(|| {
                MatError::invalid(format!(
                    "frame {} field '{}' is not an N x 2 double matrix",
                    index, field
                ))
            })
    };

    let slots = (0..value.numel())
        .map(|i| {
            Ok(FrameSlot {
                x_coord: pairs(i, "xCoord")?,
                y_coord: pairs(i, "yCoord")?,
                amp: pairs(i, "amp")?,
            })
        })
        .collect::<Result<Vec<_>, MatError>>()?;

    Ok(MovieInfoArray::from_slots(slots))
}

/// Read the `movieInfo` variable of a MAT-file.
pub fn read_movie_info<P: AsRef<Path>>(path: P) -> Result<MovieInfoArray, MatError> {
    let variables = read_variables(BufReader::new(File::open(path)?))?;
    let variable = variables
        .iter()
        .find(|v| v.name == MOVIE_INFO_VARIABLE)
        .ok_or_else(|| MatError::invalid("no movieInfo variable"))?;
    movie_info_from_value(&variable.value)
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use tempfile::NamedTempFile;

use super::types::{
    DataType, MatValue, ENDIAN_INDICATOR, HEADER_SIZE, HEADER_TEXT_SIZE, MAT_VERSION,
    MI_COMPRESSED, MI_MATRIX, MX_DOUBLE_CLASS, MX_STRUCT_CLASS,
};
use super::MatError;
use crate::movie_info::{MovieInfoArray, MOVIE_INFO_FIELDS, MOVIE_INFO_VARIABLE};

/// Configuration for the MAT writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatWriterConfig {
    /// Store variables as zlib-compressed elements
    pub compress: bool,
}

/// Writes Level 5 MAT-files, little-endian.
///
/// The header text carries no timestamp, so identical input produces
/// byte-identical files.
pub struct MatWriter<W: Write> {
    inner: W,
    config: MatWriterConfig,
    bytes_written: u64,
}

impl<W: Write> MatWriter<W> {
    /// Create a writer and emit the 128-byte file header.
    pub fn new(mut inner: W, config: MatWriterConfig) -> Result<Self, MatError> {
        let header = file_header();
        inner.write_all(&header)?;
        Ok(Self {
            inner,
            config,
            bytes_written: header.len() as u64,
        })
    }

    /// Write a named top-level variable.
    pub fn write_variable(&mut self, name: &str, value: &MatValue) -> Result<(), MatError> {
        let element = encode_matrix(name, value)?;
        let element = if self.config.compress {
            compress_element(&element)?
        } else {
            element
        };
        self.inner.write_all(&element)?;
        self.bytes_written += element.len() as u64;
        debug!("Wrote variable '{}' ({} bytes)", name, element.len());
        Ok(())
    }

    /// Write the `movieInfo` struct array.
    pub fn write_movie_info(&mut self, movie: &MovieInfoArray) -> Result<(), MatError> {
        self.write_variable(MOVIE_INFO_VARIABLE, &movie_info_value(movie))
    }

    /// Bytes emitted so far, header included
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and return the underlying sink.
    pub fn finish(mut self) -> Result<W, MatError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// `(max_frame + 1) x 1` struct array with `xCoord`, `yCoord` and `amp`
/// fields holding `N x 2` doubles, or `[]` for frames without detections.
pub fn movie_info_value(movie: &MovieInfoArray) -> MatValue {
    let elements = movie
        .slots()
        .iter()
        .map(|slot| {
            vec![
                MatValue::pairs(&slot.x_coord),
                MatValue::pairs(&slot.y_coord),
                MatValue::pairs(&slot.amp),
            ]
        })
        .collect();

    MatValue::Struct {
        dims: vec![movie.len(), 1],
        fields: MOVIE_INFO_FIELDS.iter().map(|f| f.to_string()).collect(),
        elements,
    }
}

/// Write `movie` to `path` as a MAT-file.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed write leaves nothing at `path`. Returns the file size.
pub fn write_movie_info_file<P: AsRef<Path>>(
    path: P,
    movie: &MovieInfoArray,
    config: &MatWriterConfig,
) -> Result<u64, MatError> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let temp_file = NamedTempFile::new_in(dir)?;
    let mut writer = MatWriter::new(BufWriter::new(temp_file.reopen()?), config.clone())?;
    writer.write_movie_info(movie)?;
    let size = writer.bytes_written();
    let file: BufWriter<File> = writer.finish()?;
    file.into_inner()
        .map_err(|e| MatError::IoError(e.into_error()))?
        .sync_all()?;

    temp_file
        .persist(path)
        .map_err(|e| MatError::IoError(e.error))?;
    Ok(size)
}

fn file_header() -> [u8; HEADER_SIZE] {
    let mut header = [b' '; HEADER_SIZE];
    let text = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, Created by: movieinfo {}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    let len = text.len().min(HEADER_TEXT_SIZE);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    // Subsystem data offset: none
    header[HEADER_TEXT_SIZE..HEADER_TEXT_SIZE + 8].fill(0);
    header[124..126].copy_from_slice(&MAT_VERSION.to_le_bytes());
    header[126..128].copy_from_slice(ENDIAN_INDICATOR);
    header
}

fn padding(len: usize) -> usize {
    (8 - len % 8) % 8
}

/// Append one data element. Payloads of 1 to 4 bytes use the small element
/// format.
fn put_element(buf: &mut Vec<u8>, data_type: u32, payload: &[u8]) -> Result<(), MatError> {
    if !payload.is_empty() && payload.len() <= 4 {
        buf.write_u16::<LittleEndian>(data_type as u16)?;
        buf.write_u16::<LittleEndian>(payload.len() as u16)?;
        buf.extend_from_slice(payload);
        buf.resize(buf.len() + 4 - payload.len(), 0);
        return Ok(());
    }

    let len = u32::try_from(payload.len())
        .map_err(|_| MatError::invalid("data element exceeds 4 GiB"))?;
    buf.write_u32::<LittleEndian>(data_type)?;
    buf.write_u32::<LittleEndian>(len)?;
    buf.extend_from_slice(payload);
    buf.resize(buf.len() + padding(payload.len()), 0);
    Ok(())
}

/// Encode a complete `miMATRIX` element, tag included.
fn encode_matrix(name: &str, value: &MatValue) -> Result<Vec<u8>, MatError> {
    value.check_consistent()?;
    let mut body = Vec::new();

    let class = match value {
        MatValue::Double { .. } => MX_DOUBLE_CLASS,
        MatValue::Struct { .. } => MX_STRUCT_CLASS,
    };
    let mut flags = Vec::with_capacity(8);
    flags.write_u32::<LittleEndian>(u32::from(class))?;
    flags.write_u32::<LittleEndian>(0)?;
    put_element(&mut body, DataType::UInt32.code(), &flags)?;

    let mut dims = Vec::with_capacity(value.dims().len() * 4);
    for &d in value.dims() {
        let d = i32::try_from(d).map_err(|_| MatError::invalid("dimension exceeds i32"))?;
        dims.write_i32::<LittleEndian>(d)?;
    }
    put_element(&mut body, DataType::Int32.code(), &dims)?;
    put_element(&mut body, DataType::Int8.code(), name.as_bytes())?;

    match value {
        MatValue::Double { data, .. } => {
            let mut real = Vec::with_capacity(data.len() * 8);
            for &v in data {
                real.write_f64::<LittleEndian>(v)?;
            }
            put_element(&mut body, DataType::Double.code(), &real)?;
        }
        MatValue::Struct {
            fields, elements, ..
        } => {
            let name_len = fields.iter().map(String::len).max().unwrap_or(0) + 1;
            let mut len_bytes = Vec::with_capacity(4);
            len_bytes.write_i32::<LittleEndian>(name_len as i32)?;
            put_element(&mut body, DataType::Int32.code(), &len_bytes)?;

            let mut names = vec![0u8; name_len * fields.len()];
            for (i, field) in fields.iter().enumerate() {
                let start = i * name_len;
                names[start..start + field.len()].copy_from_slice(field.as_bytes());
            }
            put_element(&mut body, DataType::Int8.code(), &names)?;

            for element in elements {
                for field in element {
                    body.extend(encode_matrix("", field)?);
                }
            }
        }
    }

    let mut out = Vec::with_capacity(body.len() + 8);
    put_element(&mut out, MI_MATRIX, &body)?;
    Ok(out)
}

fn compress_element(element: &[u8]) -> Result<Vec<u8>, MatError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(element)?;
    let compressed = encoder.finish()?;

    let len = u32::try_from(compressed.len())
        .map_err(|_| MatError::invalid("compressed element exceeds 4 GiB"))?;
    let mut out = Vec::with_capacity(compressed.len() + 8);
    out.write_u32::<LittleEndian>(MI_COMPRESSED)?;
    out.write_u32::<LittleEndian>(len)?;
    // Compressed elements are not padded
    out.extend_from_slice(&compressed);
    Ok(out)
}

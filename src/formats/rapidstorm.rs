//! rapidSTORM localisation files.
//!
//! The first line is a two-character comment prefix followed by an XML
//! element whose children declare, in order, the identifiers of the columns
//! of the whitespace-delimited body:
//!
//! ```text
//! # <localizations insequence="true" repeat="stack"><field identifier="Position-0-0" .../>...</localizations>
//! 1302.5 8871.2 0 4211.7 ...
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::tabular::{frame_number, read_header_line, read_numeric_body};
use super::FormatError;
use crate::localisation::{normalize, LocalisationRow, LocalisationTable, UnitConversion};

/// Length of the comment prefix in front of the XML header
const HEADER_PREFIX_LEN: usize = 2;

/// How a missing field is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRequirement {
    /// Reading fails with [`FormatError::MissingRequiredField`]
    Required,
    /// A column of zeros is substituted
    ZeroIfAbsent,
    /// The derived quantity is left absent
    Optional,
}

/// Field identifiers recognised in a rapidSTORM header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RapidStormField {
    /// `Position-0-0`, x in the file's length unit
    PositionX,
    /// `Position-0-0-uncertainty`
    PositionXUncertainty,
    /// `Position-1-0`, y in the file's length unit
    PositionY,
    /// `Position-1-0-uncertainty`
    PositionYUncertainty,
    /// `Amplitude-0-0`, fitted amplitude in camera counts
    Amplitude,
    /// `ImageNumber-0-0`, the frame
    ImageNumber,
    /// `PSFWidth-0-0`
    PsfWidthX,
    /// `PSFWidth-1-0`
    PsfWidthY,
    /// `FitResidues-0-0`
    FitResidues,
    /// `LocalBackground-0-0`, used for the signal-to-noise ratio
    LocalBackground,
}

impl RapidStormField {
    /// Every recognised field, in the order required fields are checked
    pub const ALL: [RapidStormField; 10] = [
        Self::PositionX,
        Self::PositionY,
        Self::Amplitude,
        Self::ImageNumber,
        Self::PositionXUncertainty,
        Self::PositionYUncertainty,
        Self::PsfWidthX,
        Self::PsfWidthY,
        Self::FitResidues,
        Self::LocalBackground,
    ];

    /// Identifier as written in the header
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::PositionX => "Position-0-0",
            Self::PositionXUncertainty => "Position-0-0-uncertainty",
            Self::PositionY => "Position-1-0",
            Self::PositionYUncertainty => "Position-1-0-uncertainty",
            Self::Amplitude => "Amplitude-0-0",
            Self::ImageNumber => "ImageNumber-0-0",
            Self::PsfWidthX => "PSFWidth-0-0",
            Self::PsfWidthY => "PSFWidth-1-0",
            Self::FitResidues => "FitResidues-0-0",
            Self::LocalBackground => "LocalBackground-0-0",
        }
    }

    /// Look up a header identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.identifier() == identifier)
    }

    /// How a header lacking this field is handled
    pub fn requirement(&self) -> FieldRequirement {
        match self {
            Self::PositionX | Self::PositionY | Self::Amplitude | Self::ImageNumber => {
                FieldRequirement::Required
            }
            Self::PositionXUncertainty
            | Self::PositionYUncertainty
            | Self::PsfWidthX
            | Self::PsfWidthY
            | Self::FitResidues => FieldRequirement::ZeroIfAbsent,
            Self::LocalBackground => FieldRequirement::Optional,
        }
    }
}

/// Column layout declared by a rapidSTORM header
#[derive(Debug, Clone, Default)]
pub struct RapidStormHeader {
    /// Identifier of every declared column, in body order
    pub identifiers: Vec<String>,
    columns: HashMap<RapidStormField, usize>,
}

impl RapidStormHeader {
    /// Parse the first line of a rapidSTORM file.
    pub fn parse(line: &str) -> Result<Self, FormatError> {
        let xml = line.get(HEADER_PREFIX_LEN..).ok_or_else(|| {
            FormatError::MalformedHeader("header line is shorter than its comment prefix".to_string())
        })?;

        let identifiers = declared_identifiers(xml)?;
        let mut columns = HashMap::new();
        for (index, identifier) in identifiers.iter().enumerate() {
            match RapidStormField::from_identifier(identifier) {
                // A repeated identifier resolves to its last declaration
                Some(field) => {
                    columns.insert(field, index);
                }
                None => debug!("Ignoring rapidSTORM field '{}'", identifier),
            }
        }

        let header = Self {
            identifiers,
            columns,
        };
        for field in RapidStormField::ALL {
            if field.requirement() == FieldRequirement::Required && header.column(field).is_none() {
                return Err(FormatError::MissingRequiredField(
                    field.identifier().to_string(),
                ));
            }
        }
        Ok(header)
    }

    /// Body column of `field`, if declared
    pub fn column(&self, field: RapidStormField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Number of declared body columns
    pub fn width(&self) -> usize {
        self.identifiers.len()
    }

    fn required(&self, field: RapidStormField) -> Result<usize, FormatError> {
        self.column(field)
            .ok_or_else(|| FormatError::MissingRequiredField(field.identifier().to_string()))
    }
}

/// Identifiers of the children of the root element, in declaration order.
fn declared_identifiers(xml: &str) -> Result<Vec<String>, FormatError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut identifiers = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 1 {
                    identifiers.push(identifier_of(&e)?);
                }
                seen_root = true;
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 1 {
                    identifiers.push(identifier_of(&e)?);
                }
                seen_root = true;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(FormatError::MalformedHeader(
            "no XML element after the comment prefix".to_string(),
        ));
    }
    Ok(identifiers)
}

fn identifier_of(e: &BytesStart) -> Result<String, FormatError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FormatError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.as_ref() == b"identifier" {
            return std::str::from_utf8(&attr.value)
                .map(str::to_string)
                .map_err(|e| FormatError::MalformedHeader(e.to_string()));
        }
    }
    Err(FormatError::MalformedHeader(format!(
        "<{}> element without an identifier attribute",
        String::from_utf8_lossy(e.name().as_ref())
    )))
}

/// Read a rapidSTORM file.
///
/// Amplitudes are divided by `units.photon_conversion` and positions by
/// `units.pixel_size`. The signal-to-noise ratio is derived from
/// `LocalBackground-0-0` when that field is declared.
pub fn read_rapidstorm<R: BufRead>(
    mut reader: R,
    units: &UnitConversion,
) -> Result<LocalisationTable, FormatError> {
    let header = RapidStormHeader::parse(&read_header_line(&mut reader)?)?;
    debug!("rapidSTORM header declares {} fields", header.width());

    let x = header.required(RapidStormField::PositionX)?;
    let y = header.required(RapidStormField::PositionY)?;
    let amplitude = header.required(RapidStormField::Amplitude)?;
    let image = header.required(RapidStormField::ImageNumber)?;
    let x_uncertainty = header.column(RapidStormField::PositionXUncertainty);
    let y_uncertainty = header.column(RapidStormField::PositionYUncertainty);
    let psf_x = header.column(RapidStormField::PsfWidthX);
    let psf_y = header.column(RapidStormField::PsfWidthY);
    let fit_residues = header.column(RapidStormField::FitResidues);
    let background = header.column(RapidStormField::LocalBackground);

    if background.is_none() {
        warn!("rapidSTORM header has no LocalBackground-0-0 field; SNR will be absent");
    }

    let or_zero = |values: &[f64], column: Option<usize>| column.map_or(0.0, |c| values[c]);

    let rows = read_numeric_body(reader, header.width(), 2)?
        .into_iter()
        .map(|r| {
            let v = &r.values;
            let mut row = LocalisationRow::new(frame_number(v[image], r.line)?, v[x], v[y])
                .with_uncertainty(or_zero(v, x_uncertainty), or_zero(v, y_uncertainty))
                .with_amplitude(v[amplitude]);
            row.local_background = background.map(|c| v[c]);
            row.fit_residue = Some(or_zero(v, fit_residues));
            row.psf_width = Some((or_zero(v, psf_x), or_zero(v, psf_y)));
            Ok(row)
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let table = LocalisationTable::new(rows, Vec::new());
    info!(
        "Read {} rapidSTORM localisations in {} frames",
        table.len(),
        table.frame_count()
    );

    Ok(normalize(table, units))
}

use super::MatError;

/// Size of the fixed MAT-file header
pub const HEADER_SIZE: usize = 128;
/// Length of the descriptive text at the start of the header
pub const HEADER_TEXT_SIZE: usize = 116;
/// Version word of Level 5 MAT-files
pub const MAT_VERSION: u16 = 0x0100;
/// Endian indicator as it appears in a little-endian file
pub const ENDIAN_INDICATOR: &[u8; 2] = b"IM";

pub(crate) const MI_MATRIX: u32 = 14;
pub(crate) const MI_COMPRESSED: u32 = 15;

pub(crate) const MX_STRUCT_CLASS: u8 = 2;
pub(crate) const MX_DOUBLE_CLASS: u8 = 6;

pub(crate) const FLAG_COMPLEX: u8 = 0x08;

/// Data types of MAT data elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// miINT8, also used for names
    Int8,
    /// miUINT8
    UInt8,
    /// miINT16
    Int16,
    /// miUINT16
    UInt16,
    /// miINT32, used for dimensions
    Int32,
    /// miUINT32, used for array flags
    UInt32,
    /// miSINGLE
    Single,
    /// miDOUBLE
    Double,
    /// miINT64
    Int64,
    /// miUINT64
    UInt64,
}

impl DataType {
    /// Element type code as stored in the tag
    pub fn code(&self) -> u32 {
        match self {
            Self::Int8 => 1,
            Self::UInt8 => 2,
            Self::Int16 => 3,
            Self::UInt16 => 4,
            Self::Int32 => 5,
            Self::UInt32 => 6,
            Self::Single => 7,
            Self::Double => 9,
            Self::Int64 => 12,
            Self::UInt64 => 13,
        }
    }

    /// Numeric type for a tag code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Int8),
            2 => Some(Self::UInt8),
            3 => Some(Self::Int16),
            4 => Some(Self::UInt16),
            5 => Some(Self::Int32),
            6 => Some(Self::UInt32),
            7 => Some(Self::Single),
            9 => Some(Self::Double),
            12 => Some(Self::Int64),
            13 => Some(Self::UInt64),
            _ => None,
        }
    }

    /// Bytes per value
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Single => 4,
            Self::Double | Self::Int64 | Self::UInt64 => 8,
        }
    }
}

/// MAT array value, restricted to the classes a movieInfo file uses
#[derive(Debug, Clone, PartialEq)]
pub enum MatValue {
    /// Real double matrix
    Double {
        /// Matrix dimensions
        dims: Vec<usize>,
        /// Values in column-major order
        data: Vec<f64>,
    },
    /// Struct array
    Struct {
        /// Array dimensions
        dims: Vec<usize>,
        /// Field names, in declaration order
        fields: Vec<String>,
        /// `elements[i][j]` is field `j` of element `i`, elements in
        /// column-major order
        elements: Vec<Vec<MatValue>>,
    },
}

impl MatValue {
    /// The `0 x 0` double matrix, MATLAB's `[]`
    pub fn empty_double() -> Self {
        Self::Double {
            dims: vec![0, 0],
            data: Vec::new(),
        }
    }

    /// `N x 2` double matrix from row pairs; `[]` when there are no pairs.
    pub fn pairs(pairs: &[[f64; 2]]) -> Self {
        if pairs.is_empty() {
            return Self::empty_double();
        }
        let data = pairs
            .iter()
            .map(|p| p[0])
            .chain(pairs.iter().map(|p| p[1]))
            .collect();
        Self::Double {
            dims: vec![pairs.len(), 2],
            data,
        }
    }

    /// Dimensions, column-major
    pub fn dims(&self) -> &[usize] {
        match self {
            Self::Double { dims, .. } | Self::Struct { dims, .. } => dims,
        }
    }

    /// Number of elements, the product of the dimensions. Saturates instead
    /// of overflowing on nonsensical dimensions.
    pub fn numel(&self) -> usize {
        self.dims()
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(usize::MAX)
    }

    /// True when any dimension is 0
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Row pairs of an `N x 2` double matrix; an empty double yields no
    /// pairs. Anything else is `None`.
    pub fn as_pairs(&self) -> Option<Vec<[f64; 2]>> {
        match self {
            Self::Double { data, .. } if self.is_empty() && data.is_empty() => Some(Vec::new()),
            Self::Double { dims, data } if dims.len() == 2 && dims[1] == 2 => {
                let rows = dims[0];
                Some((0..rows).map(|r| [data[r], data[rows + r]]).collect())
            }
            _ => None,
        }
    }

    /// Field `name` of struct element `index`
    pub fn field(&self, index: usize, name: &str) -> Option<&MatValue> {
        match self {
            Self::Struct {
                fields, elements, ..
            } => {
                let column = fields.iter().position(|f| f == name)?;
                elements.get(index)?.get(column)
            }
            Self::Double { .. } => None,
        }
    }

    pub(crate) fn check_consistent(&self) -> Result<(), MatError> {
        match self {
            Self::Double { data, .. } if data.len() != self.numel() => Err(MatError::invalid(
                format!("{} values for dimensions {:?}", data.len(), self.dims()),
            )),
            Self::Struct {
                fields, elements, ..
            } => {
                if elements.len() != self.numel() {
                    return Err(MatError::invalid(format!(
                        "{} struct elements for dimensions {:?}",
                        elements.len(),
                        self.dims()
                    )));
                }
                if elements.iter().any(|e| e.len() != fields.len()) {
                    return Err(MatError::invalid("struct element with wrong field count"));
                }
                Ok(())
            }
            Self::Double { .. } => Ok(()),
        }
    }
}

/// Named top-level variable of a MAT-file
#[derive(Debug, Clone, PartialEq)]
pub struct MatVariable {
    /// Variable name, e.g. `movieInfo`
    pub name: String,
    /// Decoded array
    pub value: MatValue,
}

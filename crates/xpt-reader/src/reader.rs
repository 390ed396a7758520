//! XPT decoding.
//!
//! Locates the member, NAMESTR and OBS headers, decodes the variable
//! descriptors and then walks the observation region in fixed strides.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, debug_span, warn};

use crate::error::{Result, XptError};
use crate::float::ibm_to_f64;
use crate::layout::decode_text;
use crate::locate::{RECORD_LEN, Section, require};
use crate::namestr::{
    MEMBER_HEADER_WINDOW, descriptor_size_or_default, parse_namestr_records,
    parse_variable_count,
};
use crate::types::{Value, VarType, Variable, XptTable};

/// Variable layout of a transport file and where its observations start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Variables in `varnum` order.
    pub variables: Vec<Variable>,
    /// Offset of the first observation byte.
    pub data_offset: usize,
    /// Bytes per observation, the sum of all variable lengths.
    pub stride: usize,
}

impl Dataset {
    /// Locate the sections of `data` and decode the variable descriptors.
    pub fn locate(data: &[u8]) -> Result<Self> {
        let obs = require(data, Section::Obs)?;
        let member = require(data, Section::Member)?;
        let namestr = require(data, Section::Namestr)?;
        debug!(member, namestr, obs, "located section headers");

        let member_header = &data[member..data.len().min(member + MEMBER_HEADER_WINDOW)];
        let size = descriptor_size_or_default(member_header);

        let namestr_header = &data[namestr..data.len().min(namestr + RECORD_LEN)];
        let count = parse_variable_count(namestr_header)?;

        let variables = parse_namestr_records(data, namestr + RECORD_LEN, count, size)?;
        let stride = observation_length(&variables);
        debug!(
            variables = variables.len(),
            descriptor_size = size.record_len(),
            stride,
            "decoded variable descriptors"
        );

        Ok(Self {
            variables,
            data_offset: obs + RECORD_LEN,
            stride,
        })
    }

    /// Decode every complete observation after `data_offset`.
    ///
    /// Returns the rows and the number of bytes left over after the last
    /// complete observation. The format pads the final record, so leftover
    /// bytes are not an error.
    #[must_use]
    pub fn decode_rows(&self, data: &[u8]) -> (Vec<Vec<Value>>, usize) {
        if self.stride == 0 {
            return (Vec::new(), 0);
        }

        let region = data.get(self.data_offset..).unwrap_or_default();
        let mut observations = region.chunks_exact(self.stride);
        let rows: Vec<Vec<Value>> = observations
            .by_ref()
            .map(|obs| decode_observation(obs, &self.variables))
            .collect();

        let remainder = observations.remainder();
        if !remainder.is_empty() {
            if remainder.iter().all(|&b| b == b' ' || b == 0) {
                debug!(bytes = remainder.len(), "discarding observation padding");
            } else {
                warn!(
                    bytes = remainder.len(),
                    stride = self.stride,
                    "discarding incomplete trailing observation"
                );
            }
        }

        (rows, remainder.len())
    }
}

/// Decode a complete transport file held in memory.
pub fn decode_xpt(data: &[u8]) -> Result<XptTable> {
    let span = debug_span!("decode_xpt", bytes = data.len());
    let _guard = span.enter();

    let dataset = Dataset::locate(data)?;
    let (rows, trailing_bytes) = dataset.decode_rows(data);
    debug!(rows = rows.len(), trailing_bytes, "decoded observations");

    Ok(XptTable {
        variables: dataset.variables,
        rows,
        trailing_bytes,
    })
}

/// XPT reader over any byte source.
///
/// The source is read to the end before decoding starts.
pub struct XptReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> XptReader<R> {
    /// Create a new XPT reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the whole source and decode it.
    pub fn read_table(mut self) -> Result<XptTable> {
        let data = self.read_all_bytes()?;
        decode_xpt(&data)
    }

    fn read_all_bytes(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl XptReader<File> {
    /// Open an XPT file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(Self::new(file))
    }
}

/// Read and decode an XPT file from a path.
pub fn read_xpt(path: &Path) -> Result<XptTable> {
    XptReader::open(path)?.read_table()
}

/// Calculate observation length from variables.
fn observation_length(variables: &[Variable]) -> usize {
    variables.iter().map(|v| v.length).sum()
}

/// Decode one observation, one value per variable.
fn decode_observation(obs: &[u8], variables: &[Variable]) -> Vec<Value> {
    let mut values = Vec::with_capacity(variables.len());
    let mut pos = 0usize;

    for variable in variables {
        let slice = &obs[pos..pos + variable.length];
        let value = match variable.var_type {
            VarType::Numeric => Value::Num(ibm_to_f64(slice)),
            VarType::Character => Value::Char(decode_char(slice)),
        };
        values.push(value);
        pos += variable.length;
    }

    values
}

/// Decode a character value.
fn decode_char(bytes: &[u8]) -> String {
    decode_text(bytes).trim().to_string()
}

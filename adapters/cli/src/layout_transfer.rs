//! Single-line layout strings for sharing lane-defense builds.
//!
//! A layout reads `gridlock:v1:{columns}x{rows}:{payload}` where the payload
//! is unpadded base64 over a JSON list of placed structures.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use neon_arcade_core::{CellCoord, Structure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "gridlock";
const LAYOUT_VERSION: &str = "v1";
const FIELD_DELIMITER: &str = ":";

/// Structures placed on a grid of known dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    /// Grid columns the layout was captured on.
    pub(crate) columns: u32,
    /// Grid rows the layout was captured on.
    pub(crate) rows: u32,
    /// Placed structures in row-major order.
    pub(crate) structures: Vec<PlacedStructure>,
}

/// One structure of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PlacedStructure {
    /// Cell holding the structure.
    pub(crate) cell: CellCoord,
    /// Structure on the cell.
    pub(crate) structure: Structure,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    structures: Vec<PlacedStructure>,
}

/// Failures raised while reading or writing layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The string was empty or whitespace.
    #[error("layout string was empty")]
    Empty,
    /// A `:`-separated field was missing.
    #[error("layout string is missing the {0}")]
    MissingField(&'static str),
    /// The string does not start with the layout prefix.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The layout was written by an unknown version.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions field is not `{columns}x{rows}`.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The payload is not valid base64.
    #[error("could not decode layout payload")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload is not a valid structure list.
    #[error("could not parse layout payload")]
    InvalidPayload(#[from] serde_json::Error),
}

impl LayoutSnapshot {
    /// Encodes the layout into a single line.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            structures: self.structures.clone(),
        })?;
        let fields = [
            LAYOUT_DOMAIN.to_owned(),
            LAYOUT_VERSION.to_owned(),
            format!("{}x{}", self.columns, self.rows),
            STANDARD_NO_PAD.encode(json),
        ];
        Ok(fields.join(FIELD_DELIMITER))
    }

    /// Decodes a layout line.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::Empty);
        }

        let mut fields = trimmed.splitn(4, FIELD_DELIMITER);
        let mut next = |name| fields.next().ok_or(LayoutTransferError::MissingField(name));
        let domain = next("prefix")?;
        let version = next("version")?;
        let dimensions = next("grid dimensions")?;
        let payload = next("payload")?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }
        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let Payload { structures } = serde_json::from_slice(&bytes)?;

        Ok(Self {
            columns,
            rows,
            structures,
        })
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use neon_arcade_core::EmplacementKind;

    use super::*;

    #[test]
    fn populated_layout_survives_transfer() {
        let snapshot = LayoutSnapshot {
            columns: 20,
            rows: 15,
            structures: vec![
                PlacedStructure {
                    cell: CellCoord::new(5, 7),
                    structure: Structure::Obstacle,
                },
                PlacedStructure {
                    cell: CellCoord::new(12, 4),
                    structure: Structure::Emplacement(EmplacementKind::Sniper),
                },
            ],
        };

        let encoded = snapshot.encode().expect("layout encodes");
        assert!(encoded.starts_with("gridlock:v1:20x15:"));
        assert!(!encoded.contains('='));
        assert_eq!(LayoutSnapshot::decode(&encoded).expect("layout decodes"), snapshot);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(
            LayoutSnapshot::decode("   "),
            Err(LayoutTransferError::Empty)
        ));
        assert!(matches!(
            LayoutSnapshot::decode("maze:v1:4x4:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "maze"
        ));
        assert!(matches!(
            LayoutSnapshot::decode("gridlock:v2:4x4:e30"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            LayoutSnapshot::decode("gridlock:v1:0x4:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            LayoutSnapshot::decode("gridlock:v1:4x4"),
            Err(LayoutTransferError::MissingField("payload"))
        ));
        assert!(matches!(
            LayoutSnapshot::decode("gridlock:v1:4x4:!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));
    }
}

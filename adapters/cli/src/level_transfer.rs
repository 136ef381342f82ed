//! Single-line transfer strings describing a generated level layout.
//!
//! Format: `tropo:v1:<number>:<width>x<height>:<payload>` where the payload is
//! unpadded base64 of a JSON document holding the collidable geometry.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use troposphere_core::{Collidable, Level, Point, Rect};

const SNAPSHOT_DOMAIN: &str = "tropo";
const SNAPSHOT_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Geometry of one generated level.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LevelLayoutSnapshot {
    pub(crate) number: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) seed: u64,
    pub(crate) spawn: Option<Point>,
    pub(crate) platforms: Vec<Rect>,
    pub(crate) ladders: Vec<Rect>,
    pub(crate) portals: Vec<Rect>,
    pub(crate) hostiles: Vec<Rect>,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    seed: u64,
    spawn: Option<Point>,
    platforms: Vec<Rect>,
    ladders: Vec<Rect>,
    portals: Vec<Rect>,
    hostiles: Vec<Rect>,
}

/// Failures while encoding or decoding a transfer string.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    #[error("layout string was empty")]
    EmptyPayload,
    #[error("layout string is missing the {0} field")]
    MissingField(&'static str),
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse level number '{0}'")]
    InvalidNumber(String),
    #[error("could not parse level size '{0}'")]
    InvalidSize(String),
    #[error("could not decode layout payload")]
    InvalidEncoding(#[from] base64::DecodeError),
    #[error("could not parse layout payload")]
    InvalidPayload(#[from] serde_json::Error),
}

impl LevelLayoutSnapshot {
    /// Captures the collidable layout of `level`.
    pub(crate) fn capture(level: &Level, seed: u64) -> Self {
        Self {
            number: level.number,
            width: level.bounds.width.round() as u32,
            height: level.bounds.height.round() as u32,
            seed,
            spawn: level.player.as_ref().map(|player| player.body.origin()),
            platforms: level.platforms.iter().map(|platform| platform.bounds).collect(),
            ladders: level.ladders.iter().map(|ladder| ladder.bounds).collect(),
            portals: level.portals.iter().map(|portal| portal.bounds).collect(),
            hostiles: level.hostiles.iter().map(|hostile| hostile.bounds()).collect(),
        }
    }

    pub(crate) fn encode(&self) -> Result<String, LevelTransferError> {
        let payload = Payload {
            seed: self.seed,
            spawn: self.spawn,
            platforms: self.platforms.clone(),
            ladders: self.ladders.clone(),
            portals: self.portals.clone(),
            hostiles: self.hostiles.clone(),
        };
        let json = serde_json::to_vec(&payload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_DOMAIN}:{SNAPSHOT_VERSION}:{}:{}x{}:{encoded}",
            self.number, self.width, self.height
        ))
    }

    pub(crate) fn decode(value: &str) -> Result<Self, LevelTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LevelTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let mut field = |name| parts.next().ok_or(LevelTransferError::MissingField(name));
        let domain = field("prefix")?;
        let version = field("version")?;
        let number = field("level number")?;
        let size = field("size")?;
        let payload = field("payload")?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
        }

        let number = number
            .parse::<u32>()
            .map_err(|_| LevelTransferError::InvalidNumber(number.to_owned()))?;
        let (width, height) = parse_size(size)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: Payload = serde_json::from_slice(&bytes)?;

        Ok(Self {
            number,
            width,
            height,
            seed: decoded.seed,
            spawn: decoded.spawn,
            platforms: decoded.platforms,
            ladders: decoded.ladders,
            portals: decoded.portals,
            hostiles: decoded.hostiles,
        })
    }
}

fn parse_size(size: &str) -> Result<(u32, u32), LevelTransferError> {
    let invalid = || LevelTransferError::InvalidSize(size.to_owned());
    let (width, height) = size.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

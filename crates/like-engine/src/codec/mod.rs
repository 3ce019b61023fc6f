//! Envelope codec.
//!
//! Two message shapes share one encryption stage:
//! - the like request (`uid` + region code), sent to `LikeProfile`
//! - the UID probe (`uid` + constant discriminator), sent to `GetPlayerPersonalShow`

mod crypt;
pub mod messages;

use prost::Message;

pub use self::crypt::{EncryptedPayload, encrypt};
use self::messages::{LikeRequest, UidProbe};
use crate::error::Result;

/// Discriminator value carried by every UID probe.
const PROBE_DISCRIMINATOR: u64 = 1;

/// Second field of an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// Like request for a region code.
    Like { region: String },
    /// Read-only snapshot probe.
    Probe,
}

/// A target identity ready to be serialized and encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeEnvelope {
    pub target_id: u64,
    pub kind: EnvelopeKind,
}

impl LikeEnvelope {
    pub fn like(target_id: u64, region: impl Into<String>) -> Self {
        Self {
            target_id,
            kind: EnvelopeKind::Like {
                region: region.into(),
            },
        }
    }

    pub fn probe(target_id: u64) -> Self {
        Self {
            target_id,
            kind: EnvelopeKind::Probe,
        }
    }

    /// Serialize to the wire schema.
    pub fn encode(&self) -> Vec<u8> {
        match &self.kind {
            EnvelopeKind::Like { region } => encode_like_target(self.target_id, region),
            EnvelopeKind::Probe => encode_uid_probe(self.target_id),
        }
    }

    /// Serialize and encrypt, consuming the envelope.
    pub fn seal(self) -> Result<EncryptedPayload> {
        encrypt(&self.encode())
    }
}

/// Serialize a like request.
pub fn encode_like_target(target_id: u64, region: &str) -> Vec<u8> {
    LikeRequest {
        uid: target_id,
        region: region.to_string(),
    }
    .encode_to_vec()
}

/// Serialize a snapshot probe.
pub fn encode_uid_probe(target_id: u64) -> Vec<u8> {
    UidProbe {
        uid: target_id,
        discriminator: PROBE_DISCRIMINATOR,
    }
    .encode_to_vec()
}

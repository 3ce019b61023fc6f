//! Player snapshot decoding.

use prost::Message;
use tracing::warn;

use crate::codec::messages::PlayerInfo;
use crate::error::{LikeError, Result};

/// Public state of a player at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub uid: u64,
    pub nickname: String,
    pub like_count: u64,
}

/// Decode a `GetPlayerPersonalShow` response body.
///
/// A body that is not valid protobuf, or that carries no account info
/// group, is a decode failure.
pub fn decode_snapshot(binary: &[u8]) -> Result<PlayerSnapshot> {
    let info = PlayerInfo::decode(binary)?;
    let account = info
        .account_info
        .ok_or_else(|| LikeError::Decode("response has no account info".to_string()))?;

    Ok(PlayerSnapshot {
        uid: account.uid,
        nickname: account.nickname,
        like_count: account.likes,
    })
}

/// Like [`decode_snapshot`], but logs the failure and returns `None`.
pub fn try_decode_snapshot(binary: &[u8]) -> Option<PlayerSnapshot> {
    match decode_snapshot(binary) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(error = %e, len = binary.len(), "Failed to decode player snapshot");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_snapshot(snapshot: &PlayerSnapshot) -> Vec<u8> {
    use crate::codec::messages::AccountInfo;

    PlayerInfo {
        account_info: Some(AccountInfo {
            uid: snapshot.uid,
            nickname: snapshot.nickname.clone(),
            likes: snapshot.like_count,
        }),
    }
    .encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlayerSnapshot {
        PlayerSnapshot {
            uid: 2_345_678_901,
            nickname: "ミカ★Sniper".to_string(),
            like_count: 120,
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let bytes = encode_snapshot(&sample());
        assert_eq!(decode_snapshot(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        // field 2 (varint 7) and field 4 (string "x") inside account info
        let mut inner = vec![0x08, 0x05, 0x10, 0x07, 0x1a, 0x02, b'h', b'i', 0x22, 0x01, b'x'];
        // field 21, varint 9
        inner.extend_from_slice(&[0xa8, 0x01, 0x09]);
        let mut outer = vec![0x0a, inner.len() as u8];
        outer.extend_from_slice(&inner);
        // trailing unknown top-level field 5
        outer.extend_from_slice(&[0x28, 0x01]);

        let snapshot = decode_snapshot(&outer).unwrap();
        assert_eq!(snapshot.uid, 5);
        assert_eq!(snapshot.nickname, "hi");
        assert_eq!(snapshot.like_count, 9);
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = encode_snapshot(&sample());
        for cut in 1..bytes.len() {
            assert!(
                decode_snapshot(&bytes[..cut]).is_err(),
                "prefix of length {cut} decoded"
            );
        }
        assert!(try_decode_snapshot(&bytes[..bytes.len() - 1]).is_none());
    }

    #[test]
    fn test_missing_account_info_fails() {
        assert!(matches!(decode_snapshot(&[]), Err(LikeError::Decode(_))));
    }

    #[test]
    fn test_garbage_fails() {
        assert!(try_decode_snapshot(b"<html>502 Bad Gateway</html>").is_none());
    }
}

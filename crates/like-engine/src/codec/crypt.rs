// Envelope cipher: AES-128-CBC with PKCS#7 padding under the client's fixed key.

use aes::Aes128;
use cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::error::{LikeError, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// AES block size in bytes.
const BLOCK_SIZE: usize = 16;

/// Key shared with the game client. Part of the wire protocol.
pub(crate) const ENVELOPE_KEY: &[u8; 16] = b"Yg&tc%DEuh6%Zc^8";

/// IV shared with the game client. Part of the wire protocol.
pub(crate) const ENVELOPE_IV: &[u8; 16] = b"6oyZDr22E3ychjM%";

/// Hex-encoded ciphertext of one serialized envelope.
///
/// The same payload is reused verbatim for every call that targets the
/// same identity within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload(String);

impl EncryptedPayload {
    /// Lowercase hex form.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Raw ciphertext bytes sent as the request body.
    pub fn to_body(&self) -> Result<Vec<u8>> {
        hex::decode(&self.0).map_err(|e| LikeError::Encoding(format!("invalid payload hex: {e}")))
    }
}

impl std::fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pad, encrypt and hex-encode a serialized envelope.
pub fn encrypt(plaintext: &[u8]) -> Result<EncryptedPayload> {
    let len = plaintext.len();
    let mut buffer = vec![0u8; len + BLOCK_SIZE];
    buffer[..len].copy_from_slice(plaintext);

    let cipher = Aes128CbcEnc::new_from_slices(ENVELOPE_KEY, ENVELOPE_IV).map_err(|e| {
        LikeError::Encoding(format!("Failed to initialize AES encryptor: {e}"))
    })?;

    let encrypted_len = cipher
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, len)
        .map_err(|e| LikeError::Encoding(format!("Encryption failed: {e:?}")))?
        .len();
    buffer.truncate(encrypted_len);

    Ok(EncryptedPayload(hex::encode(buffer)))
}

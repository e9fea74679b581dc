//! XRPL wallet: family-seed key derivation and local transaction signing
//!
//! Seeds are base58check strings in the ripple alphabet:
//!
//! - `s...` - version `0x21` + 16 bytes entropy, secp256k1 keys
//! - `sEd...` - prefix `01 E1 4B` + 16 bytes entropy, ed25519 keys
//!
//! secp256k1 keys follow the family-generator scheme: a root key from
//! `SHA512Half(entropy || seq)`, then account 0 is added to it, both
//! retrying `seq` until the result is a valid scalar.

use ed25519_dalek::Signer as _;
use eyre::{eyre, Result};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use sha2::{Digest, Sha512};

use super::client::LedgerWallet;
use super::codec::{encode_payment, sha512_half, signing_payload, transaction_hash};
use super::types::{Payment, SignedTransaction};
use crate::address_codec::{account_id_from_public_key, encode_xrpl_address};

const SECP256K1_SEED_VERSION: u8 = 0x21;
const ED25519_SEED_PREFIX: [u8; 3] = [0x01, 0xE1, 0x4B];
const ED25519_KEY_PREFIX: u8 = 0xED;

/// Signature algorithm selected by the seed encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Secp256k1,
    Ed25519,
}

enum SigningKey {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

/// A wallet derived from a family seed
pub struct XrplWallet {
    key: SigningKey,
    /// 33 bytes: compressed secp256k1 point or `0xED` + ed25519 key
    public_key: Vec<u8>,
    address: String,
}

impl XrplWallet {
    /// Derive the wallet for a family seed
    pub fn from_seed(seed: &str) -> Result<Self> {
        let payload = bs58::decode(seed.trim())
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .with_check(None)
            .into_vec()
            .map_err(|e| eyre!("Invalid XRPL wallet seed provided: {}", e))?;

        let (key, public_key) = match payload.as_slice() {
            [SECP256K1_SEED_VERSION, entropy @ ..] if entropy.len() == 16 => {
                let key = derive_secp256k1(entropy)?;
                let public_key = k256::PublicKey::from(key.verifying_key())
                    .to_encoded_point(true)
                    .as_bytes()
                    .to_vec();
                (SigningKey::Secp256k1(key), public_key)
            }
            [a, b, c, entropy @ ..] if [*a, *b, *c] == ED25519_SEED_PREFIX && entropy.len() == 16 => {
                let key = ed25519_dalek::SigningKey::from_bytes(&sha512_half(entropy));
                let mut public_key = Vec::with_capacity(33);
                public_key.push(ED25519_KEY_PREFIX);
                public_key.extend_from_slice(key.verifying_key().as_bytes());
                (SigningKey::Ed25519(key), public_key)
            }
            _ => return Err(eyre!("Invalid XRPL wallet seed provided: unknown seed encoding")),
        };

        let address = encode_xrpl_address(&account_id_from_public_key(&public_key));

        Ok(Self {
            key,
            public_key,
            address,
        })
    }

    pub fn key_type(&self) -> KeyType {
        match self.key {
            SigningKey::Secp256k1(_) => KeyType::Secp256k1,
            SigningKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Uppercase hex of the 33-byte public key, as carried in `SigningPubKey`
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(&self.public_key)
    }

    /// Sign a `STX\0`-prefixed signing payload
    fn sign_payload(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match &self.key {
            SigningKey::Secp256k1(key) => {
                let digest = sha512_half(payload);
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| eyre!("secp256k1 signing failed: {}", e))?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            SigningKey::Ed25519(key) => Ok(key.sign(payload).to_bytes().to_vec()),
        }
    }
}

impl LedgerWallet for XrplWallet {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, tx: &Payment) -> Result<SignedTransaction> {
        if tx.account != self.address {
            return Err(eyre!(
                "Payment account {} does not match wallet {}",
                tx.account,
                self.address
            ));
        }

        let mut tx = tx.clone();
        tx.signing_pub_key = Some(self.public_key_hex());
        tx.txn_signature = None;

        let signature = self.sign_payload(&signing_payload(&tx)?)?;
        tx.txn_signature = Some(hex::encode_upper(signature));

        let blob = encode_payment(&tx, false)?;
        Ok(SignedTransaction {
            hash: transaction_hash(&blob),
            tx_blob: hex::encode_upper(blob),
        })
    }
}

impl std::fmt::Debug for XrplWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XrplWallet")
            .field("address", &self.address)
            .field("key_type", &self.key_type())
            .field("key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// secp256k1 Family Derivation
// ============================================================================

fn derive_secp256k1(entropy: &[u8]) -> Result<k256::ecdsa::SigningKey> {
    let root = derive_scalar(entropy, None)?;
    let root_public = root.public_key().to_encoded_point(true);
    let account = derive_scalar(root_public.as_bytes(), Some(0))?;

    let sum = *root.to_nonzero_scalar() + *account.to_nonzero_scalar();
    let secret = k256::SecretKey::from_bytes(&sum.to_repr())
        .map_err(|_| eyre!("Derived secp256k1 key is zero"))?;
    Ok(k256::ecdsa::SigningKey::from(&secret))
}

/// First `SHA512Half(bytes || [discriminator] || seq)` that is a valid scalar
fn derive_scalar(bytes: &[u8], discriminator: Option<u32>) -> Result<k256::SecretKey> {
    (0..=u32::MAX)
        .find_map(|seq| {
            let mut hasher = Sha512::new();
            hasher.update(bytes);
            if let Some(d) = discriminator {
                hasher.update(d.to_be_bytes());
            }
            hasher.update(seq.to_be_bytes());
            let digest = hasher.finalize();
            k256::SecretKey::from_slice(&digest[..32]).ok()
        })
        .ok_or_else(|| eyre!("No valid secp256k1 scalar for seed"))
}

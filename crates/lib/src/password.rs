//! BIOS password change.
//!
//! The host firmware provisions a seed file holding salted PBKDF2 hashes of
//! the user and admin passwords. A change request is verified against the
//! stored hash for the claimed role; on success the hash of the new password
//! is written back as the admin hash. No password is kept in memory and no
//! plaintext ever reaches disk.
//!
//! # Seed File
//!
//! ```json
//! {
//!   "UserPwdHash": [12, 201, ...],
//!   "AdminPwdHash": [98, 3, ...],
//!   "Seed": [7, 88, ...],
//!   "HashAlgo": "SHA256"
//! }
//! ```
//!
//! Fields other than these are preserved on write-back.

use std::fmt;
use std::path::{Path, PathBuf};

use hmac::Hmac;
use serde::Deserialize;
use sha2::{Sha256, Sha384};
use subtle::ConstantTimeEq;
use tracing::{debug, error, info};

use crate::config::ServiceConfig;
use crate::consts::{PASSWORD_INTERFACE, PASSWORD_OBJECT_PATH};
use crate::error::{BiosError, Result};
use crate::persist::{PersistError, ensure_dir, read_optional, write_json};

/// Role name whose current password is checked against the admin hash.
pub const ADMIN_ROLE: &str = "AdminPassword";

/// PBKDF2 iteration count used by the firmware.
pub const PBKDF2_ROUNDS: u32 = 1000;

/// Width of the stored hash fields; shorter digests are zero-padded.
pub const STORED_HASH_LEN: usize = 64;

/// Digest used to derive password hashes, named by the seed file's `HashAlgo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
  Sha256,
  Sha384,
}

impl HashAlgorithm {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "SHA256" => Some(HashAlgorithm::Sha256),
      "SHA384" => Some(HashAlgorithm::Sha384),
      _ => None,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      HashAlgorithm::Sha256 => "SHA256",
      HashAlgorithm::Sha384 => "SHA384",
    }
  }

  pub fn digest_len(self) -> usize {
    match self {
      HashAlgorithm::Sha256 => 32,
      HashAlgorithm::Sha384 => 48,
    }
  }

  /// Derive the hash of `password` under `seed`.
  ///
  /// The password is hashed with its NUL terminator to match what the
  /// firmware stores.
  pub fn derive(self, password: &str, seed: &[u8]) -> Result<Vec<u8>> {
    let mut input = Vec::with_capacity(password.len() + 1);
    input.extend_from_slice(password.as_bytes());
    input.push(0);

    let mut output = vec![0u8; self.digest_len()];
    let derived = match self {
      HashAlgorithm::Sha256 => pbkdf2::pbkdf2::<Hmac<Sha256>>(&input, seed, PBKDF2_ROUNDS, &mut output),
      HashAlgorithm::Sha384 => pbkdf2::pbkdf2::<Hmac<Sha384>>(&input, seed, PBKDF2_ROUNDS, &mut output),
    };
    derived.map_err(|e| {
      error!(algorithm = %self, error = %e, "password hash derivation failed");
      BiosError::internal("password hash derivation failed")
    })?;
    Ok(output)
  }
}

impl fmt::Display for HashAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Hash and seed fields of the seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedRecord {
  #[serde(rename = "UserPwdHash")]
  pub user_pwd_hash: Vec<u8>,
  #[serde(rename = "AdminPwdHash")]
  pub admin_pwd_hash: Vec<u8>,
  #[serde(rename = "Seed")]
  pub seed: Vec<u8>,
  #[serde(rename = "HashAlgo")]
  pub hash_algo: String,
}

impl SeedRecord {
  fn is_complete(&self) -> bool {
    !self.user_pwd_hash.is_empty()
      && !self.admin_pwd_hash.is_empty()
      && !self.seed.is_empty()
      && !self.hash_algo.is_empty()
  }

  fn stored_hash(&self, user_name: &str) -> &[u8] {
    if user_name == ADMIN_ROLE {
      &self.admin_pwd_hash
    } else {
      &self.user_pwd_hash
    }
  }
}

/// Pad `hash` with zeros to the stored field width.
pub fn pad_hash(hash: &[u8]) -> Vec<u8> {
  let mut padded = hash.to_vec();
  if padded.len() < STORED_HASH_LEN {
    padded.resize(STORED_HASH_LEN, 0);
  }
  padded
}

#[derive(Debug)]
pub struct Password {
  seed_file: PathBuf,
}

impl Password {
  pub fn open(config: &ServiceConfig) -> Result<Self, PersistError> {
    ensure_dir(config.persist_dir())?;
    debug!(
      object = PASSWORD_OBJECT_PATH,
      interface = PASSWORD_INTERFACE,
      seed_file = %config.seed_file().display(),
      "password object ready"
    );
    Ok(Self {
      seed_file: config.seed_file(),
    })
  }

  pub fn seed_file(&self) -> &Path {
    &self.seed_file
  }

  /// Verify `current_password` for `user_name` and store the hash of
  /// `new_password` as the admin hash.
  pub fn change_password(&self, user_name: &str, current_password: &str, new_password: &str) -> Result<()> {
    let mut document = self.load_document()?;
    let record: SeedRecord = serde_json::from_value(document.clone()).map_err(|e| {
      error!(path = %self.seed_file.display(), error = %e, "malformed seed file");
      BiosError::internal("malformed seed file")
    })?;
    if !record.is_complete() {
      error!(path = %self.seed_file.display(), "seed file has empty fields");
      return Err(BiosError::internal("incomplete seed file"));
    }

    let Some(algorithm) = HashAlgorithm::from_name(&record.hash_algo) else {
      error!(algorithm = %record.hash_algo, "unsupported password hash algorithm");
      return Err(BiosError::InvalidCurrentPassword);
    };

    let check = algorithm.derive(current_password, &record.seed)?;
    let stored = record.stored_hash(user_name);
    let matches = stored.len() >= check.len() && bool::from(check.ct_eq(&stored[..check.len()]));
    if !matches {
      error!(user = %user_name, "current password does not match");
      return Err(BiosError::InvalidCurrentPassword);
    }

    let new_hash = algorithm.derive(new_password, &record.seed)?;
    document["AdminPwdHash"] = serde_json::Value::from(pad_hash(&new_hash));
    document["IsAdminPwdChanged"] = serde_json::Value::Bool(true);

    write_json(&self.seed_file, &document).map_err(|e| {
      error!(error = %e, "failed to write seed file");
      BiosError::internal("failed to write seed file")
    })?;

    info!(user = %user_name, algorithm = %algorithm, "BIOS password changed");
    Ok(())
  }

  fn load_document(&self) -> Result<serde_json::Value> {
    let content = match read_optional(&self.seed_file) {
      Ok(Some(content)) => content,
      Ok(None) => {
        error!(path = %self.seed_file.display(), "seed file missing");
        return Err(BiosError::internal("seed file missing"));
      }
      Err(e) => {
        error!(error = %e, "failed to read seed file");
        return Err(BiosError::internal("failed to read seed file"));
      }
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
      Ok(value) if value.is_object() => Ok(value),
      Ok(_) => {
        error!(path = %self.seed_file.display(), "seed file is not a JSON object");
        Err(BiosError::internal("malformed seed file"))
      }
      Err(e) => {
        error!(path = %self.seed_file.display(), error = %e, "failed to parse seed file");
        Err(BiosError::internal("malformed seed file"))
      }
    }
  }
}

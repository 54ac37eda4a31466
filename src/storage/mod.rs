//! Durable storage of the block number
//!
//! The number is the only record this crate persists. Writes happen
//! synchronously from the protocol handler; there is no flush queue.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::{BlockNumber, Result};

/// Read-or-default / overwrite access to the persisted block number
pub trait IdentityStore {
    /// Reads the stored number; `None` when no record exists
    fn load(&self) -> Result<Option<BlockNumber>>;

    /// Overwrites the stored number; blocking from the handler's view
    fn store(&mut self, number: BlockNumber) -> Result<()>;
}

/// Stores the block number as decimal text in a single file
///
/// Every write replaces the whole file. An unparsable record is treated the
/// same as a missing one at load, so a corrupt file falls back to the
/// default instead of wedging the node.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Creates a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileIdentityStore { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<BlockNumber>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match text.trim().parse::<i32>() {
            Ok(number) => Ok(Some(BlockNumber(number))),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    "block number record unparsable, treating as missing"
                );
                Ok(None)
            }
        }
    }

    fn store(&mut self, number: BlockNumber) -> Result<()> {
        fs::write(&self.path, number.value().to_string())?;
        Ok(())
    }
}

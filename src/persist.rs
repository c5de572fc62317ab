use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cart::{Cart, CartLine};

/// Best-effort file-backed persistence for the cart state.
///
/// The contract: restoration falls back to an empty cart on missing or
/// malformed data, and a failed write or erase never blocks the in-memory
/// mutation that triggered it. Failures are logged, not returned.
pub struct CartPersister {
    path: PathBuf,
}

impl CartPersister {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the cart from disk. Missing or unreadable or malformed data
    /// yields an empty cart; restoration is never fatal.
    pub fn load(&self) -> Cart {
        if !self.path.exists() {
            return Cart::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to read cart state from {}: {}",
                    self.path.display(),
                    e
                );
                return Cart::new();
            }
        };

        match serde_json::from_str::<Vec<CartLine>>(&content) {
            Ok(lines) => {
                debug!("Restored {} cart line(s)", lines.len());
                Cart::from_lines(lines)
            }
            Err(e) => {
                warn!(
                    "Discarding malformed cart state at {}: {}",
                    self.path.display(),
                    e
                );
                Cart::new()
            }
        }
    }

    /// Write the full line collection to disk. Failure is logged and the
    /// in-memory state stays authoritative.
    pub fn save(&self, cart: &Cart) {
        let content = match serde_json::to_string_pretty(cart.lines()) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize cart state: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, content) {
            warn!(
                "Failed to persist cart state to {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Remove the persisted representation entirely, so a later restore
    /// starts from an empty cart.
    pub fn erase(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                "Failed to erase cart state at {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

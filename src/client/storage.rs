// src/client/storage.rs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::models::record::ReceiptRecord;

/// Nome do arquivo com o último recibo gerado.
pub const LAST_RECEIPT_KEY: &str = "receiptData";

/// Cópia local do último recibo gerado. Serve só para a prévia; a fonte da
/// verdade continua sendo o backend.
#[derive(Debug, Clone)]
pub struct LastReceiptStore {
    path: PathBuf,
}

impl LastReceiptStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(LAST_RECEIPT_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, record: &ReceiptRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(record)?;
        fs::write(&self.path, json)
    }

    /// `Ok(None)` quando nada foi salvo ainda.
    pub fn load(&self) -> io::Result<Option<ReceiptRecord>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

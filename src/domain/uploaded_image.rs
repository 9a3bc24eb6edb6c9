use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: Option<String>,
    pub data: Bytes,
    /// Bytes the client sent. Larger than `data.len()` when reading stopped at the limit.
    pub declared_size: u64,
}

impl UploadedImage {
    pub fn new(filename: Option<String>, data: Bytes) -> Self {
        let declared_size = data.len() as u64;
        Self {
            filename,
            data,
            declared_size,
        }
    }

    pub fn truncated(filename: Option<String>, data: Bytes, declared_size: u64) -> Self {
        Self {
            filename,
            data,
            declared_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declared_size == 0
    }
}

//! Read and write options.

/// What to do with columns skipped inside a row when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapPolicy {
    /// Drop the gaps: cells are packed left in column order. Two rows with
    /// different missing columns are not aligned with each other.
    #[default]
    Compact,
    /// Fill skipped columns (from column `A` up to the last present cell)
    /// with empty strings so values keep their column position.
    Fill,
}

/// Options for reading sheet data.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Use the first row as keys and return the remaining rows as records
    pub use_first_row_as_keys: bool,

    /// Handling of skipped columns
    pub gap_policy: GapPolicy,
}

impl ReadOptions {
    /// Create default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the first row as a header.
    pub fn with_header(mut self, enabled: bool) -> Self {
        self.use_first_row_as_keys = enabled;
        self
    }

    /// Set the gap policy.
    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.gap_policy = policy;
        self
    }
}

/// Compression applied to every part of a written package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Deflate (what spreadsheet applications write)
    #[default]
    Deflated,
    /// No compression
    Stored,
}

impl From<Compression> for zip::CompressionMethod {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Options for writing packages.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Compression method for the parts
    pub compression: Compression,
}

impl WriteOptions {
    /// Create default write options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression method.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

//! Deflate (zlib-wrapped) compression, applied once per fragment before
//! replication on the write path and once per successfully decrypted
//! replica on the read path.

use std::io::{Read, Write};

use anyhow::{Context, Result, ensure};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

#[derive(Clone, Copy)]
pub struct Compressor {
    level: Compression,
}

impl Compressor {
    #[must_use]
    pub fn new() -> Self {
        Self { level: Compression::fast() }
    }

    /// Compresses a fragment. Errors surface as `BadCompression` to the
    /// caller.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        ensure!(!data.is_empty(), "cannot compress an empty fragment");

        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder.write_all(data).context("compression failed")?;
        encoder.finish().context("compression finalization failed")
    }

    /// Decompresses a fragment previously produced by `compress`.
    pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
        ensure!(!data.is_empty(), "cannot decompress empty data");

        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).context("bad compression: failed to inflate data")?;
        Ok(decompressed)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

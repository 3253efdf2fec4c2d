//! Byte-stream codec for undo and level payloads
//!
//! LZ4 block format with a little-endian `u32` size prefix. The decoder
//! checks that the decoded length matches the prefix, so truncated or
//! corrupt input is reported instead of yielding partial data.
//!
//! Payloads are not gzip or deflate streams: undo and level data written by
//! gzip-based tools cannot be read here, and vice versa.

use crate::core::{Error, Result};

const SIZE_PREFIX_LEN: usize = 4;

/// Compress arbitrary bytes
pub fn compress(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Exact inverse of [`compress`]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < SIZE_PREFIX_LEN {
        return Err(Error::Decode(format!(
            "compressed payload too short: {} bytes",
            data.len()
        )));
    }

    let expected = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let decompressed = lz4_flex::decompress_size_prepended(data)
        .map_err(|e| Error::Decode(format!("LZ4 decompression failed: {}", e)))?;

    if decompressed.len() != expected {
        return Err(Error::Decode(format!(
            "decompressed {} bytes, header promised {}",
            decompressed.len(),
            expected
        )));
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    #[test]
    fn test_roundtrip_empty() {
        let packed = compress(&[]);
        assert_eq!(decompress(&packed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_roundtrip_random_and_repetitive() {
        let mut rng = SmallRng::seed_from_u64(7);
        for len in [1usize, 17, 1000, 65_537] {
            let noisy: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
            assert_eq!(decompress(&compress(&noisy)).unwrap(), noisy);
        }

        let flat = vec![42u8; 100_000];
        let packed = compress(&flat);
        assert!(packed.len() < flat.len() / 10);
        assert_eq!(decompress(&packed).unwrap(), flat);
    }

    #[test]
    fn test_framing_is_size_prefixed_lz4() {
        let data = vec![7u8; 1000];
        let packed = compress(&data);

        // Little-endian decoded length first, never the gzip magic
        assert_eq!(&packed[..4], &1000u32.to_le_bytes());
        assert_ne!(&packed[..2], &[0x1f, 0x8b]);

        let mut gzip_like = vec![0x1f, 0x8b, 0x08, 0x00];
        gzip_like.extend_from_slice(&packed[4..]);
        assert!(decompress(&gzip_like).is_err());
    }

    #[test]
    fn test_short_input_is_error() {
        assert!(matches!(decompress(&[1, 2]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_truncated_input_is_error() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
        let packed = compress(&data);
        let truncated = &packed[..packed.len() / 2];

        assert!(matches!(decompress(truncated), Err(Error::Decode(_))));
    }
}

//! Pick-id encoding.
//!
//! Every emitted vertex carries a 32-bit id:
//!
//!   bits 24..32 : pick layer (one per render model)
//!   bits  0..24 : point index
//!
//! The id is uploaded as four normalised bytes (little-endian), so a pick
//! pass that writes the interpolated attribute into an RGBA8 target yields
//! the id back byte-for-byte.

/// Bits reserved for the point index.
pub const INDEX_BITS: u32 = 24;

/// Mask selecting the point-index part of an id.
pub const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Largest point index that survives encoding.
pub const MAX_POINT_INDEX: u32 = INDEX_MASK;

/// Packs `(layer, index)` into a pick-id.
///
/// Indices above [`MAX_POINT_INDEX`] lose their top bits; point sets larger
/// than 2^24 are not supported and the truncation is not reported.
#[inline]
pub const fn encode(layer: u8, index: u32) -> u32 {
    ((layer as u32) << INDEX_BITS) | (index & INDEX_MASK)
}

/// Layer byte of an id.
#[inline]
pub const fn layer_of(id: u32) -> u8 {
    (id >> INDEX_BITS) as u8
}

/// Maps a sampled id back to a point index of a model on `layer` holding
/// `point_count` points. Ids from other layers, and stale ids beyond the
/// current point count, are misses.
#[inline]
pub fn decode(sampled: u32, layer: u8, point_count: usize) -> Option<u32> {
    if layer_of(sampled) != layer {
        return None;
    }
    let index = sampled & INDEX_MASK;
    ((index as usize) < point_count).then_some(index)
}

/// Reassembles an id from one RGBA8 pick-target texel.
#[inline]
pub const fn from_rgba8(texel: [u8; 4]) -> u32 {
    u32::from_le_bytes(texel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        assert_eq!(encode(0, 0), 0);
        assert_eq!(encode(7, 5), 0x0700_0005);
        assert_eq!(encode(255, MAX_POINT_INDEX), u32::MAX);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for layer in [0u8, 1, 7, 128, 255] {
            for index in [0u32, 1, 255, 256, 65_535, 65_536, MAX_POINT_INDEX] {
                let id = encode(layer, index);
                assert_eq!(decode(id, layer, index as usize + 1), Some(index));
            }
        }
    }

    #[test]
    fn test_foreign_layer_is_a_miss() {
        let id = encode(3, 10);
        for other in [0u8, 2, 4, 255] {
            assert_eq!(decode(id, other, usize::MAX), None);
        }
    }

    #[test]
    fn test_stale_index_is_a_miss() {
        let id = encode(1, 10);
        assert_eq!(decode(id, 1, 10), None);
        assert_eq!(decode(id, 1, 0), None);
        assert_eq!(decode(id, 1, 11), Some(10));
    }

    #[test]
    fn test_oversized_index_truncates() {
        assert_eq!(encode(2, 1 << INDEX_BITS), encode(2, 0));
        assert_eq!(encode(2, (1 << INDEX_BITS) + 9), encode(2, 9));
    }

    #[test]
    fn test_rgba8_texel_round_trip() {
        let id = encode(7, 0x0003_0201);
        assert_eq!(id.to_le_bytes(), [1, 2, 3, 7]);
        assert_eq!(from_rgba8([1, 2, 3, 7]), id);
    }
}

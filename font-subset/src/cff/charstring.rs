//! Type 2 charstring number (de/re)coding, shared by subroutine closure
//! walking and charstring rewriting. Mirrors the operand encoding
//! `font_scale::outline::cff`'s interpreter decodes for drawing; this side
//! only needs the value and byte length, not the geometry.

/// The bias Type 2 charstrings add to a `callsubr`/`callgsubr` operand to
/// get the subroutine's actual index, per the subr count thresholds in the
/// CFF spec.
pub fn bias(count: usize) -> i32 {
    match count {
        n if n < 1240 => 107,
        n if n < 33900 => 1131,
        _ => 32768,
    }
}

/// Decodes one number token starting at `data[i]`. Returns the value and
/// how many bytes it consumed. `None` if `data[i]` is an operator byte
/// (0..=27, 29..=31), not a number.
pub fn decode_number(data: &[u8], i: usize) -> Option<(i32, usize)> {
    let b0 = *data.get(i)?;
    match b0 {
        28 => {
            let hi = *data.get(i + 1)?;
            let lo = *data.get(i + 2)?;
            Some((i16::from_be_bytes([hi, lo]) as i32, 3))
        }
        32..=246 => Some((b0 as i32 - 139, 1)),
        247..=250 => {
            let b1 = *data.get(i + 1)?;
            Some(((b0 as i32 - 247) * 256 + b1 as i32 + 108, 2))
        }
        251..=254 => {
            let b1 = *data.get(i + 1)?;
            Some((-(b0 as i32 - 251) * 256 - b1 as i32 - 108, 2))
        }
        255 => {
            let bytes = [*data.get(i + 1)?, *data.get(i + 2)?, *data.get(i + 3)?, *data.get(i + 4)?];
            let fixed = i32::from_be_bytes(bytes) as f64 / 65536.0;
            Some((fixed as i32, 5))
        }
        _ => None,
    }
}

/// Encodes `value` as a Type 2 charstring number token. Prefers the
/// 3-byte `28` form (covers every bias-adjusted subroutine index a real
/// font can produce); falls back to the `255` fixed-point form for values
/// outside `i16`'s range, which no subroutine index reaches in practice
/// but which keeps this total.
pub fn encode_number(value: i32) -> Vec<u8> {
    if let Ok(v) = i16::try_from(value) {
        let mut out = vec![28u8];
        out.extend_from_slice(&v.to_be_bytes());
        out
    } else {
        let mut out = vec![255u8];
        out.extend_from_slice(&(value << 16).to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_single_byte_range() {
        let bytes = [139u8]; // 139 - 139 = 0
        assert_eq!(decode_number(&bytes, 0), Some((0, 1)));
    }

    #[test]
    fn round_trips_two_byte_positive_range() {
        let bytes = [247u8, 0];
        assert_eq!(decode_number(&bytes, 0), Some((108, 2)));
    }

    #[test]
    fn encode_then_decode_i16_range() {
        for v in [-30000i32, -1, 0, 1, 30000] {
            let encoded = encode_number(v);
            assert_eq!(decode_number(&encoded, 0), Some((v, encoded.len())));
        }
    }

    #[test]
    fn operator_bytes_are_not_numbers() {
        assert_eq!(decode_number(&[10], 0), None); // callsubr
        assert_eq!(decode_number(&[14], 0), None); // endchar
    }
}

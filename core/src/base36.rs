//! Base-36 integer encoding and the uid scheme built on it.

use std::time::{SystemTime, UNIX_EPOCH};

use num_bigint::{BigInt, Sign};
use num_traits::{NumCast, PrimInt};
use rand::Rng;

use crate::error::{Error, Result};

const RADIX: u32 = 36;

fn digit_char(d: u32) -> Result<char> {
    char::from_digit(d, RADIX)
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| Error::out_of_range(format!("base-36 digit {d}")))
}

fn pad(digits: String, min_len: usize) -> String {
    format!("{digits:0>min_len$}")
}

/// Encode a non-negative integer with digits `0-9A-Z`, most significant
/// first, left-padded with `0` to `min_len`.
///
/// ```
/// use wgutil::base36::encode_base36;
///
/// assert_eq!(encode_base36(36, 0).unwrap(), "10");
/// assert_eq!(encode_base36(5, 3).unwrap(), "005");
/// assert!(encode_base36(-1, 0).is_err());
/// ```
pub fn encode_base36<N: PrimInt>(i: N, min_len: usize) -> Result<String> {
    if i < N::zero() {
        return Err(Error::out_of_range("base-36 encoding of a negative integer"));
    }
    // 36 fits every primitive integer type, including i8
    let radix: N = <N as NumCast>::from(RADIX)
        .ok_or_else(|| Error::out_of_range("radix does not fit the integer type"))?;

    let mut n = i;
    let mut digits = Vec::new();
    loop {
        let d = (n % radix)
            .to_u32()
            .ok_or_else(|| Error::out_of_range("base-36 digit"))?;
        digits.push(digit_char(d)?);
        n = n / radix;
        if n.is_zero() {
            break;
        }
    }
    Ok(pad(digits.iter().rev().collect(), min_len))
}

/// [`encode_base36`] for arbitrary-precision integers
pub fn encode_base36_big(i: &BigInt, min_len: usize) -> Result<String> {
    if i.sign() == Sign::Minus {
        return Err(Error::out_of_range("base-36 encoding of a negative integer"));
    }
    Ok(pad(i.to_str_radix(RADIX).to_ascii_uppercase(), min_len))
}

/// Inverse of [`encode_base36`]; digits are case-insensitive
pub fn decode_base36(text: &str) -> Result<u64> {
    u64::from_str_radix(text, RADIX)
        .map_err(|e| Error::out_of_range(format!("invalid base-36 number {text:?}: {e}")))
}

/// Seconds since the epoch (7 digits) followed by microseconds (4 digits)
pub fn time_to_base36(time: SystemTime) -> Result<String> {
    let since = time
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::out_of_range("time before the Unix epoch"))?;
    Ok(format!(
        "{}{}",
        encode_base36(since.as_secs(), 7)?,
        encode_base36(since.subsec_micros(), 4)?
    ))
}

/// Unique id for a new session object: the current time plus a random suffix
pub fn generate_uid() -> Result<String> {
    let suffix: u32 = rand::thread_rng().gen_range(0..RADIX.pow(4));
    Ok(format!(
        "{}-{}",
        time_to_base36(SystemTime::now())?,
        encode_base36(suffix, 4)?
    ))
}

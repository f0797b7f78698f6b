//! Constant-time byte comparison.

use subtle::ConstantTimeEq;

/// Compare two equally sized buffers without leaking where they differ.
///
/// Use this instead of `==` for anything derived from secret material or
/// for authentication tags.
pub fn crypto_cmp<const N: usize>(a: &[u8; N], b: &[u8; N]) -> bool {
    a[..].ct_eq(&b[..]).into()
}

/// Constant-time equality for slices.
///
/// Buffers of different lengths are unequal; the length itself is not
/// treated as secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

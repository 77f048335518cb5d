//! DNA sequence utilities.

/// Complements a single base, normalizing A/C/G/T to uppercase.
///
/// Gaps, `N` and any other symbols are returned unchanged, so aligned strings can be
/// complemented column by column.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' | b'a' => b'T',
        b'T' | b't' => b'A',
        b'C' | b'c' => b'G',
        b'G' | b'g' => b'C',
        _ => base,
    }
}

/// Reverse complements a sequence or aligned string.
///
/// # Examples
///
/// ```
/// use dagcorrect_lib::dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"AACG"), b"CGTT".to_vec());
/// assert_eq!(reverse_complement(b"AC-GT"), b"AC-GT".to_vec());
/// assert_eq!(reverse_complement(b"acgN"), b"NCGT".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}

//! Flag bits and the precomputed flag-derivation tables.
//!
//! The 256-entry tables give the S, Z, 5, 3 and parity flags of a result byte
//! directly. The 8-entry tables give half-carry and overflow for 8-bit add
//! and subtract from three bits: bit 3 (half-carry) or bit 7 (overflow) of
//! the first operand, the second operand and the result, combined by
//! [`lookup_index`].
//!
//! All tables are evaluated at compile time, so they exist before the first
//! instruction can run.

/// Sign flag (bit 7) - set if result is negative.
pub const SF: u8 = 0b1000_0000;

/// Zero flag (bit 6) - set if result is zero.
pub const ZF: u8 = 0b0100_0000;

/// Undocumented flag (bit 5) - copy of bit 5 of result.
pub const YF: u8 = 0b0010_0000;

/// Half-carry flag (bit 4) - carry from bit 3 to bit 4.
pub const HF: u8 = 0b0001_0000;

/// Undocumented flag (bit 3) - copy of bit 3 of result.
pub const XF: u8 = 0b0000_1000;

/// Parity/overflow flag (bit 2). `LD A,I` and `LD A,R` copy IFF2 here.
pub const PF: u8 = 0b0000_0100;

/// Add/subtract flag (bit 1) - set if last operation was subtraction.
pub const NF: u8 = 0b0000_0010;

/// Carry flag (bit 0) - carry out of bit 7.
pub const CF: u8 = 0b0000_0001;

/// S, Z, 5 and 3 flags of the index.
pub static SZ53: [u8; 256] = build_sz53();

/// `PF` when the index has an even number of set bits.
pub static PARITY: [u8; 256] = build_parity();

/// [`SZ53`] and [`PARITY`] combined.
pub static SZ53P: [u8; 256] = build_sz53p();

/// Half-carry after `a + b`, indexed by [`lookup_index`] at bit 3.
pub const HALFCARRY_ADD: [u8; 8] = [0, HF, HF, HF, 0, 0, 0, HF];

/// Half-carry (borrow) after `a - b`, indexed by [`lookup_index`] at bit 3.
pub const HALFCARRY_SUB: [u8; 8] = [0, 0, HF, 0, HF, 0, HF, HF];

/// Overflow after `a + b`, indexed by [`lookup_index`] at bit 7.
pub const OVERFLOW_ADD: [u8; 8] = [0, 0, 0, PF, PF, 0, 0, 0];

/// Overflow after `a - b`, indexed by [`lookup_index`] at bit 7.
pub const OVERFLOW_SUB: [u8; 8] = [0, PF, 0, 0, 0, 0, PF, 0];

/// Index into the half-carry and overflow tables.
///
/// Bit 0 is `bit` of the first operand, bit 1 the same bit of the second
/// operand, bit 2 the same bit of the result.
#[must_use]
pub const fn lookup_index(a: u8, b: u8, result: u8, bit: u8) -> usize {
    (((a >> bit) & 1) | (((b >> bit) & 1) << 1) | (((result >> bit) & 1) << 2)) as usize
}

const fn build_sz53() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8) & (SF | YF | XF);
        i += 1;
    }
    table[0] |= ZF;
    table
}

const fn build_parity() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut bits = i as u8;
        let mut parity = 0u8;
        let mut k = 0;
        while k < 8 {
            parity ^= bits & 1;
            bits >>= 1;
            k += 1;
        }
        table[i] = if parity == 0 { PF } else { 0 };
        i += 1;
    }
    table
}

const fn build_sz53p() -> [u8; 256] {
    let sz53 = build_sz53();
    let parity = build_parity();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = sz53[i] | parity[i];
        i += 1;
    }
    table
}

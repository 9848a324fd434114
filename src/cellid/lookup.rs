//! Hilbert curve lookup tables
//!
//! The curve is walked four levels at a time. `LOOKUP_POS` maps
//! `(i, j, orientation)` for a 4x4 block to `(position, orientation)`;
//! `LOOKUP_IJ` is its inverse. Both tables are evaluated at compile time.

/// Number of levels consumed per table lookup
pub(crate) const LOOKUP_BITS: u32 = 4;

/// Orientation bit: the i and j axes are exchanged
pub(crate) const SWAP_MASK: usize = 0x01;

/// Orientation bit: traversal runs in reverse
pub(crate) const INVERT_MASK: usize = 0x02;

/// Child `(i, j)` quadrant (`i << 1 | j`) for each orientation and Hilbert position
pub(crate) const POS_TO_IJ: [[usize; 4]; 4] = [
    [0, 1, 3, 2], // canonical
    [0, 2, 3, 1], // swapped
    [3, 2, 0, 1], // inverted
    [3, 1, 0, 2], // swapped and inverted
];

/// Inverse of [`POS_TO_IJ`]
pub(crate) const IJ_TO_POS: [[usize; 4]; 4] = [
    [0, 1, 3, 2],
    [0, 3, 1, 2],
    [2, 3, 1, 0],
    [2, 1, 3, 0],
];

/// Orientation change applied when descending into each Hilbert position
pub(crate) const POS_TO_ORIENTATION: [usize; 4] = [SWAP_MASK, 0, 0, INVERT_MASK | SWAP_MASK];

const TABLE_SIZE: usize = 1 << (2 * LOOKUP_BITS + 2);

const TABLES: ([u16; TABLE_SIZE], [u16; TABLE_SIZE]) = build_tables();

/// `((i << 4 | j) << 2 | orientation)` to `(pos << 2 | orientation)`
pub(crate) static LOOKUP_POS: [u16; TABLE_SIZE] = TABLES.0;

/// `(pos << 2 | orientation)` to `((i << 4 | j) << 2 | orientation)`
pub(crate) static LOOKUP_IJ: [u16; TABLE_SIZE] = TABLES.1;

const fn build_tables() -> ([u16; TABLE_SIZE], [u16; TABLE_SIZE]) {
    let mut lookup_pos = [0u16; TABLE_SIZE];
    let mut lookup_ij = [0u16; TABLE_SIZE];
    let side = 1usize << LOOKUP_BITS;

    let mut start = 0;
    while start < 4 {
        let mut i = 0;
        while i < side {
            let mut j = 0;
            while j < side {
                let mut orientation = start;
                let mut pos = 0usize;
                let mut level = LOOKUP_BITS as usize;
                while level > 0 {
                    level -= 1;
                    let quadrant = (((i >> level) & 1) << 1) | ((j >> level) & 1);
                    let digit = IJ_TO_POS[orientation][quadrant];
                    pos = (pos << 2) | digit;
                    orientation ^= POS_TO_ORIENTATION[digit];
                }
                let ij = (i << LOOKUP_BITS) | j;
                lookup_pos[(ij << 2) | start] = ((pos << 2) | orientation) as u16;
                lookup_ij[(pos << 2) | start] = ((ij << 2) | orientation) as u16;
                j += 1;
            }
            i += 1;
        }
        start += 1;
    }
    (lookup_pos, lookup_ij)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ij_to_pos_inverts_pos_to_ij() {
        for orientation in 0..4 {
            for pos in 0..4 {
                assert_eq!(IJ_TO_POS[orientation][POS_TO_IJ[orientation][pos]], pos);
            }
        }
    }

    #[test]
    fn test_tables_are_inverse() {
        for key in 0..TABLE_SIZE {
            let pos_entry = LOOKUP_POS[key] as usize;
            let start = key & 3;
            let back = LOOKUP_IJ[(pos_entry & !3) | start] as usize;
            assert_eq!(back, key & !3 | (pos_entry & 3));
        }
    }

    #[test]
    fn test_canonical_first_block() {
        // Three leading zero digits leave the finest level swapped, so the
        // first four positions visit (0,0), (1,0), (1,1), (0,1).
        assert_eq!(LOOKUP_IJ[0] >> 2, 0);
        assert_eq!(LOOKUP_IJ[1 << 2] >> 2, 1 << LOOKUP_BITS);
        assert_eq!(LOOKUP_IJ[2 << 2] >> 2, (1 << LOOKUP_BITS) | 1);
        assert_eq!(LOOKUP_IJ[3 << 2] >> 2, 1);
    }
}

//! Guo-Hall removability predicate and its 256-entry lookup tables
//!
//! Neighbors are numbered p2..p9 clockwise starting directly above the
//! center pixel:
//!
//! ```text
//! p9 p2 p3
//! p8 P  p4
//! p7 p6 p5
//! ```
//!
//! A neighbor code packs p2 into bit 0 through p9 into bit 7.

/// Sub-iteration of a Guo-Hall round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    /// First pass of a round
    Even,
    /// Second pass of a round
    Odd,
}

impl Parity {
    /// Both passes in the order a round applies them
    pub const ROUND: [Parity; 2] = [Parity::Even, Parity::Odd];

    /// 0 for `Even`, 1 for `Odd`
    pub const fn index(self) -> usize {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }
}

/// The 8 neighbor states of a pixel, each 0 or 1, ordered p2..p9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighborhood(pub [u8; 8]);

impl Neighborhood {
    /// Unpack a neighbor code
    pub const fn from_code(code: u8) -> Self {
        let mut bits = [0u8; 8];
        let mut k = 0;
        while k < 8 {
            bits[k] = (code >> k) & 1;
            k += 1;
        }
        Neighborhood(bits)
    }

    /// Pack into a neighbor code
    #[inline(always)]
    pub fn code(&self) -> u8 {
        let p = &self.0;
        p[0] | (p[1] << 1) | (p[2] << 2) | (p[3] << 3) | (p[4] << 4) | (p[5] << 5) | (p[6] << 6) | (p[7] << 7)
    }
}

/// Guo-Hall removability of the center pixel
#[inline(always)]
pub fn is_removable(neighbors: Neighborhood, parity: Parity) -> bool {
    let [p2, p3, p4, p5, p6, p7, p8, p9] = neighbors.0;
    let not = |p: u8| p ^ 1;

    let c = (not(p2) & (p3 | p4)) + (not(p4) & (p5 | p6)) + (not(p6) & (p7 | p8)) + (not(p8) & (p9 | p2));
    let n1 = (p9 | p2) + (p3 | p4) + (p5 | p6) + (p7 | p8);
    let n2 = (p2 | p3) + (p4 | p5) + (p6 | p7) + (p8 | p9);
    let n = n1.min(n2);
    let m = match parity {
        Parity::Even => (p6 | p7 | not(p9)) & p8,
        Parity::Odd => (p2 | p3 | not(p5)) & p4,
    };

    c == 1 && (2..=3).contains(&n) && m == 0
}

/// Removal decision for every neighbor code of one parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalTable {
    parity: Parity,
    entries: [u8; 256],
}

impl RemovalTable {
    /// Evaluate the predicate for all 256 codes
    pub fn build(parity: Parity) -> Self {
        let mut entries = [0u8; 256];
        for (code, entry) in entries.iter_mut().enumerate() {
            *entry = is_removable(Neighborhood::from_code(code as u8), parity) as u8;
        }
        Self { parity, entries }
    }

    /// Parity this table was built for
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Whether a pixel with this neighbor code is removed
    #[inline(always)]
    pub fn get(&self, code: u8) -> bool {
        self.entries[code as usize] != 0
    }

    /// Marker value (0 or 1) for a neighbor code
    #[inline(always)]
    pub(crate) fn marker(&self, code: u8) -> u8 {
        self.entries[code as usize]
    }

    /// Number of codes that remove the center pixel
    pub fn removable_count(&self) -> usize {
        self.entries.iter().filter(|&&e| e != 0).count()
    }
}

//! Segment geometry: which LEDs form which stroke of which digit.
//!
//! The sign is two large 7-segment digits built from one WS2815 strip.
//! Within a digit the segments are wired contiguously in the order
//! A,B,C,D,E,F,G; horizontal strokes (A, D, G) and vertical strokes
//! (B, C, E, F) have different LED counts. Each digit starts at a fixed
//! base offset matching the physical wiring.
//!
//! ```text
//!     AAA
//!    F   B
//!    F   B
//!     GGG
//!    E   C
//!    E   C
//!     DDD
//! ```

/// Number of digit positions on the sign.
pub const DIGIT_COUNT: usize = 2;

/// Strokes per digit.
pub const SEGMENTS_PER_DIGIT: usize = 7;

/// One of the seven strokes forming a digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Top horizontal.
    A,
    /// Upper right vertical.
    B,
    /// Lower right vertical.
    C,
    /// Bottom horizontal.
    D,
    /// Lower left vertical.
    E,
    /// Upper left vertical.
    F,
    /// Middle horizontal.
    G,
}

impl Segment {
    /// All segments in wiring order.
    pub const ALL: [Segment; SEGMENTS_PER_DIGIT] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    /// Bit position in the digit mask table (A=0 .. G=6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Standard 7-segment encoding for digits 0–9, bit 0 = A .. bit 6 = G.
pub const DIGIT_PATTERNS: [u8; 10] = [
    0x3F, // 0: A B C D E F
    0x06, // 1: B C
    0x5B, // 2: A B D E G
    0x4F, // 3: A B C D G
    0x66, // 4: B C F G
    0x6D, // 5: A C D F G
    0x7D, // 6: A C D E F G
    0x07, // 7: A B C
    0x7F, // 8: all seven
    0x6F, // 9: A B C D F G
];

/// Contiguous run of LEDs making up one stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentRange {
    /// First LED index in the strip.
    pub start: u16,
    /// Number of LEDs in the stroke.
    pub count: u16,
}

/// Physical layout parameters for the strip wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayLayout {
    /// LEDs per horizontal stroke (A, D, G).
    pub leds_horizontal: u16,
    /// LEDs per vertical stroke (B, C, E, F).
    pub leds_vertical: u16,
    /// First LED of each digit (actual wiring positions).
    pub digit_base: [u16; DIGIT_COUNT],
}

impl DisplayLayout {
    /// LEDs occupied by one digit.
    pub const fn leds_per_digit(&self) -> u16 {
        3 * self.leds_horizontal + 4 * self.leds_vertical
    }
}

impl Default for DisplayLayout {
    /// The deployed 100 cm digits: 15-LED horizontals, 30-LED verticals,
    /// digits wired back to back.
    fn default() -> Self {
        Self {
            leds_horizontal: 15,
            leds_vertical: 30,
            digit_base: [0, 165],
        }
    }
}

/// Static table mapping (digit, segment) to an LED range, built once at
/// startup from a [`DisplayLayout`].
#[derive(Clone, Copy, Debug)]
pub struct SegmentMap {
    ranges: [[SegmentRange; SEGMENTS_PER_DIGIT]; DIGIT_COUNT],
    led_count: u16,
}

impl SegmentMap {
    /// Build the map for the given wiring.
    pub fn new(layout: &DisplayLayout) -> Self {
        let mut ranges = [[SegmentRange::default(); SEGMENTS_PER_DIGIT]; DIGIT_COUNT];
        let mut led_count = 0u16;

        for digit in 0..DIGIT_COUNT {
            let mut offset = layout.digit_base[digit];
            for segment in Segment::ALL {
                let count = match segment {
                    Segment::A | Segment::D | Segment::G => layout.leds_horizontal,
                    _ => layout.leds_vertical,
                };
                ranges[digit][segment.index()] = SegmentRange {
                    start: offset,
                    count,
                };
                offset += count;
                led_count = led_count.max(offset);
            }
        }

        Self { ranges, led_count }
    }

    /// LED range of one stroke.
    #[inline]
    pub fn range(&self, digit: usize, segment: Segment) -> SegmentRange {
        self.ranges[digit][segment.index()]
    }

    /// Total strip length implied by the layout (highest used index + 1).
    #[inline]
    pub fn led_count(&self) -> u16 {
        self.led_count
    }

    /// Segment mask for a digit value; values are taken mod 10.
    #[inline]
    pub fn digit_mask(value: u16) -> u8 {
        DIGIT_PATTERNS[(value % 10) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_dimensions() {
        let layout = DisplayLayout::default();
        assert_eq!(layout.leds_per_digit(), 165);

        let map = SegmentMap::new(&layout);
        assert_eq!(map.led_count(), 330);
    }

    #[test]
    fn known_offsets_match_wiring() {
        let map = SegmentMap::new(&DisplayLayout::default());
        assert_eq!(map.range(0, Segment::A), SegmentRange { start: 0, count: 15 });
        assert_eq!(map.range(0, Segment::B), SegmentRange { start: 15, count: 30 });
        assert_eq!(map.range(0, Segment::G), SegmentRange { start: 150, count: 15 });
        assert_eq!(map.range(1, Segment::A), SegmentRange { start: 165, count: 15 });
        assert_eq!(map.range(1, Segment::G), SegmentRange { start: 315, count: 15 });
    }

    #[test]
    fn ranges_are_pairwise_disjoint() {
        let map = SegmentMap::new(&DisplayLayout::default());
        let mut all: Vec<SegmentRange> = Vec::new();
        for digit in 0..DIGIT_COUNT {
            for segment in Segment::ALL {
                all.push(map.range(digit, segment));
            }
        }
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                let a_end = a.start + a.count;
                let b_end = b.start + b.count;
                assert!(
                    a_end <= b.start || b_end <= a.start,
                    "overlap: {:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn digit_masks() {
        // 8 lights all seven strokes.
        assert_eq!(SegmentMap::digit_mask(8), 0x7F);
        // 1 lights exactly B and C.
        assert_eq!(SegmentMap::digit_mask(1), 1 << Segment::B.index() | 1 << Segment::C.index());
        // 0 lights everything but G.
        assert_eq!(SegmentMap::digit_mask(0), 0x7F & !(1 << Segment::G.index()));
    }

    #[test]
    fn digit_mask_wraps_mod_ten() {
        assert_eq!(SegmentMap::digit_mask(13), SegmentMap::digit_mask(3));
    }

    #[test]
    fn non_contiguous_digit_bases() {
        // A strip with dead LEDs between the digits still maps cleanly.
        let layout = DisplayLayout {
            leds_horizontal: 2,
            leds_vertical: 3,
            digit_base: [0, 100],
        };
        let map = SegmentMap::new(&layout);
        assert_eq!(map.range(1, Segment::A).start, 100);
        assert_eq!(map.led_count(), 100 + layout.leds_per_digit());
    }
}

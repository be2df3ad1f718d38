//! Built-in single-stroke sans-serif glyphs.
//!
//! Coordinates are in glyph units: `x` in `0..=4` from the left edge of the
//! cell, `y` in `0..=6` upward from the baseline (6 is cap height). Each
//! glyph is a list of polylines.

/// One polyline: consecutive points are joined by straight strokes.
pub(crate) type Stroke = &'static [(f32, f32)];

/// Horizontal advance per character in units.
pub(crate) const ADVANCE: f32 = 6.0;
/// Cap height in units.
pub(crate) const CAP_HEIGHT: f32 = 6.0;

const RING: Stroke = &[
    (1.0, 0.0),
    (0.0, 1.0),
    (0.0, 5.0),
    (1.0, 6.0),
    (3.0, 6.0),
    (4.0, 5.0),
    (4.0, 1.0),
    (3.0, 0.0),
    (1.0, 0.0),
];
const BOWL_P: Stroke = &[
    (0.0, 0.0),
    (0.0, 6.0),
    (3.0, 6.0),
    (4.0, 5.0),
    (4.0, 4.0),
    (3.0, 3.0),
    (0.0, 3.0),
];
const DOT_LOW: Stroke = &[(1.8, 0.0), (2.2, 0.0)];
const BOX: Stroke = &[(0.0, 0.0), (0.0, 6.0), (4.0, 6.0), (4.0, 0.0), (0.0, 0.0)];

/// Strokes for `ch`. Lowercase letters share the uppercase shapes; `None`
/// means the character has no glyph (the renderer draws a box instead).
#[allow(clippy::too_many_lines)]
pub(crate) fn glyph(ch: char) -> Option<&'static [Stroke]> {
    let strokes: &'static [Stroke] = match ch.to_ascii_uppercase() {
        ' ' => &[],
        'A' => &[&[(0.0, 0.0), (2.0, 6.0), (4.0, 0.0)], &[(0.7, 2.0), (3.3, 2.0)]],
        'B' => &[
            BOWL_P,
            &[(3.0, 3.0), (4.0, 2.0), (4.0, 1.0), (3.0, 0.0), (0.0, 0.0)],
        ],
        'C' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
        ]],
        'D' => &[&[
            (0.0, 0.0),
            (0.0, 6.0),
            (2.5, 6.0),
            (4.0, 4.5),
            (4.0, 1.5),
            (2.5, 0.0),
            (0.0, 0.0),
        ]],
        'E' => &[
            &[(4.0, 6.0), (0.0, 6.0), (0.0, 0.0), (4.0, 0.0)],
            &[(0.0, 3.0), (3.0, 3.0)],
        ],
        'F' => &[&[(4.0, 6.0), (0.0, 6.0), (0.0, 0.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'G' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 3.0),
            (2.0, 3.0),
        ]],
        'H' => &[
            &[(0.0, 0.0), (0.0, 6.0)],
            &[(4.0, 0.0), (4.0, 6.0)],
            &[(0.0, 3.0), (4.0, 3.0)],
        ],
        'I' => &[
            &[(2.0, 0.0), (2.0, 6.0)],
            &[(1.0, 6.0), (3.0, 6.0)],
            &[(1.0, 0.0), (3.0, 0.0)],
        ],
        'J' => &[&[(4.0, 6.0), (4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0)]],
        'K' => &[
            &[(0.0, 0.0), (0.0, 6.0)],
            &[(4.0, 6.0), (0.0, 2.0)],
            &[(1.3, 3.3), (4.0, 0.0)],
        ],
        'L' => &[&[(0.0, 6.0), (0.0, 0.0), (4.0, 0.0)]],
        'M' => &[&[(0.0, 0.0), (0.0, 6.0), (2.0, 3.0), (4.0, 6.0), (4.0, 0.0)]],
        'N' => &[&[(0.0, 0.0), (0.0, 6.0), (4.0, 0.0), (4.0, 6.0)]],
        'O' => &[RING],
        'P' => &[BOWL_P],
        'Q' => &[RING, &[(2.5, 1.5), (4.0, 0.0)]],
        'R' => &[BOWL_P, &[(2.0, 3.0), (4.0, 0.0)]],
        'S' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 4.0),
            (1.0, 3.0),
            (3.0, 3.0),
            (4.0, 2.0),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        'T' => &[&[(0.0, 6.0), (4.0, 6.0)], &[(2.0, 6.0), (2.0, 0.0)]],
        'U' => &[&[
            (0.0, 6.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 6.0),
        ]],
        'V' => &[&[(0.0, 6.0), (2.0, 0.0), (4.0, 6.0)]],
        'W' => &[&[(0.0, 6.0), (1.0, 0.0), (2.0, 4.0), (3.0, 0.0), (4.0, 6.0)]],
        'X' => &[&[(0.0, 0.0), (4.0, 6.0)], &[(0.0, 6.0), (4.0, 0.0)]],
        'Y' => &[&[(0.0, 6.0), (2.0, 3.0), (4.0, 6.0)], &[(2.0, 3.0), (2.0, 0.0)]],
        'Z' => &[&[(0.0, 6.0), (4.0, 6.0), (0.0, 0.0), (4.0, 0.0)]],
        '0' => &[&[
            (1.5, 0.0),
            (0.5, 1.0),
            (0.5, 5.0),
            (1.5, 6.0),
            (2.5, 6.0),
            (3.5, 5.0),
            (3.5, 1.0),
            (2.5, 0.0),
            (1.5, 0.0),
        ]],
        '1' => &[&[(1.0, 5.0), (2.0, 6.0), (2.0, 0.0)], &[(1.0, 0.0), (3.0, 0.0)]],
        '2' => &[&[
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 4.0),
            (0.0, 0.0),
            (4.0, 0.0),
        ]],
        '3' => &[
            &[
                (0.0, 5.0),
                (1.0, 6.0),
                (3.0, 6.0),
                (4.0, 5.0),
                (4.0, 4.0),
                (3.0, 3.0),
                (1.5, 3.0),
            ],
            &[
                (3.0, 3.0),
                (4.0, 2.0),
                (4.0, 1.0),
                (3.0, 0.0),
                (1.0, 0.0),
                (0.0, 1.0),
            ],
        ],
        '4' => &[&[(3.0, 0.0), (3.0, 6.0), (0.0, 2.0), (4.0, 2.0)]],
        '5' => &[&[
            (4.0, 6.0),
            (0.0, 6.0),
            (0.0, 3.0),
            (3.0, 3.0),
            (4.0, 2.0),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        '6' => &[&[
            (4.0, 5.0),
            (3.0, 6.0),
            (1.0, 6.0),
            (0.0, 5.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 2.0),
            (3.0, 3.0),
            (0.0, 3.0),
        ]],
        '7' => &[&[(0.0, 6.0), (4.0, 6.0), (1.5, 0.0)]],
        '8' => &[&[
            (1.0, 3.0),
            (0.0, 4.0),
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 4.0),
            (3.0, 3.0),
            (1.0, 3.0),
            (0.0, 2.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (4.0, 1.0),
            (4.0, 2.0),
            (3.0, 3.0),
        ]],
        '9' => &[&[
            (4.0, 3.0),
            (1.0, 3.0),
            (0.0, 4.0),
            (0.0, 5.0),
            (1.0, 6.0),
            (3.0, 6.0),
            (4.0, 5.0),
            (4.0, 1.0),
            (3.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        ]],
        '.' => &[DOT_LOW],
        ',' => &[&[(2.2, 0.5), (1.6, -1.0)]],
        ':' => &[DOT_LOW, &[(1.8, 4.0), (2.2, 4.0)]],
        '-' => &[&[(1.0, 3.0), (3.0, 3.0)]],
        '_' => &[&[(0.0, -0.5), (4.0, -0.5)]],
        '+' => &[&[(2.0, 1.5), (2.0, 4.5)], &[(0.5, 3.0), (3.5, 3.0)]],
        '=' => &[&[(0.5, 2.0), (3.5, 2.0)], &[(0.5, 4.0), (3.5, 4.0)]],
        '/' => &[&[(0.0, 0.0), (4.0, 6.0)]],
        '!' => &[&[(2.0, 6.0), (2.0, 2.0)], DOT_LOW],
        '?' => &[
            &[
                (0.0, 5.0),
                (1.0, 6.0),
                (3.0, 6.0),
                (4.0, 5.0),
                (4.0, 4.0),
                (2.0, 2.5),
                (2.0, 1.5),
            ],
            DOT_LOW,
        ],
        '\'' => &[&[(2.0, 6.0), (2.0, 4.5)]],
        '(' => &[&[(3.0, 6.0), (2.0, 4.5), (2.0, 1.5), (3.0, 0.0)]],
        ')' => &[&[(1.0, 6.0), (2.0, 4.5), (2.0, 1.5), (1.0, 0.0)]],
        _ => return None,
    };
    Some(strokes)
}

/// Fallback drawn for characters without a glyph.
pub(crate) fn missing_glyph() -> &'static [Stroke] {
    &[BOX]
}

use plotters::style::RGBColor;

/// Colors of copy-number states 0, 1 and 2.
pub const STATE_COLORS: [RGBColor; 3] = [
    RGBColor(0x34, 0x98, 0xDB),
    RGBColor(0x85, 0xC1, 0xE9),
    RGBColor(0xD3, 0xD3, 0xD3),
];

/// Used for samples whose category has no palette entry.
pub const UNKNOWN_CATEGORY: RGBColor = RGBColor(0x99, 0x99, 0x99);

const DARK_GRAY: RGBColor = RGBColor(0x33, 0x33, 0x33);

// sequential, light to dark
const REDS: [RGBColor; 9] = [
    RGBColor(255, 245, 240),
    RGBColor(254, 224, 210),
    RGBColor(252, 187, 161),
    RGBColor(252, 146, 114),
    RGBColor(251, 106, 74),
    RGBColor(239, 59, 44),
    RGBColor(203, 24, 29),
    RGBColor(165, 15, 21),
    RGBColor(103, 0, 13),
];

// diverging, blue to red through light gray
const COOLWARM: [RGBColor; 9] = [
    RGBColor(59, 76, 192),
    RGBColor(98, 130, 234),
    RGBColor(141, 176, 254),
    RGBColor(184, 208, 249),
    RGBColor(221, 221, 221),
    RGBColor(245, 196, 173),
    RGBColor(244, 154, 123),
    RGBColor(222, 96, 77),
    RGBColor(180, 4, 38),
];

// diverging, red to blue
const RDBU: [RGBColor; 11] = [
    RGBColor(103, 0, 31),
    RGBColor(178, 24, 43),
    RGBColor(214, 96, 77),
    RGBColor(244, 165, 130),
    RGBColor(253, 219, 199),
    RGBColor(247, 247, 247),
    RGBColor(209, 229, 240),
    RGBColor(146, 197, 222),
    RGBColor(67, 147, 195),
    RGBColor(33, 102, 172),
    RGBColor(5, 48, 97),
];

///
/// Piecewise-linear position `t` in `[0, 1]` along evenly spaced anchor colors.
///
pub fn interpolate(anchors: &[RGBColor], t: f64) -> RGBColor {
    match anchors.len() {
        0 => return UNKNOWN_CATEGORY,
        1 => return anchors[0],
        _ => {}
    }

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (anchors.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - lower as f64;

    let (a, b) = (anchors[lower], anchors[lower + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;

    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// `n` colors sampled at `i / (n - 1)` along a sequential red ramp.
pub fn reds(n: usize) -> Vec<RGBColor> {
    match n {
        0 => vec![],
        1 => vec![REDS[0]],
        _ => (0..n)
            .map(|i| interpolate(&REDS, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

///
/// Mapping from a matrix value to a cell color.
///
#[derive(Debug, Clone, PartialEq)]
pub enum ColorMap {
    /// One color per integer copy-number state, indexed by the rounded value.
    States(Vec<RGBColor>),
    /// Continuous blue-to-red ramp normalised over `[low, high]`.
    Diverging { low: f64, high: f64 },
}

impl ColorMap {
    ///
    /// Fixed colors for states 0, 1 and 2, then reds of increasing intensity for 3 and up.
    /// The red tones are taken from a `max_state`-level ramp without its two lightest levels,
    /// so the palette has one entry per state `0..=max_state`.
    ///
    pub fn integer_copy_number(max_state: f64) -> Self {
        let levels = if max_state.is_finite() && max_state > 0.0 {
            max_state.round() as usize
        } else {
            0
        };

        let mut colors = STATE_COLORS.to_vec();
        colors.extend(reds(levels).into_iter().skip(2));

        ColorMap::States(colors)
    }

    pub fn diverging(low: f64, high: f64) -> Self {
        ColorMap::Diverging { low, high }
    }

    ///
    /// Pick the palette for a value column: discrete states for `integer_copy_number`,
    /// the diverging ramp otherwise.
    ///
    pub fn for_values(integer_states: bool, (low, high): (f64, f64)) -> Self {
        match integer_states {
            true => ColorMap::integer_copy_number(high),
            false => ColorMap::diverging(low, high),
        }
    }

    /// Color of one cell; `None` for missing values, which stay blank.
    pub fn color(&self, value: f64) -> Option<RGBColor> {
        if !value.is_finite() {
            return None;
        }

        match self {
            ColorMap::States(colors) => {
                let last = colors.len().checked_sub(1)?;
                let state = value.round().max(0.0) as usize;
                Some(colors[state.min(last)])
            }
            ColorMap::Diverging { low, high } => {
                let t = if high > low {
                    (value - low) / (high - low)
                } else {
                    0.5
                };
                Some(interpolate(&COOLWARM, t))
            }
        }
    }

    /// Labelled color stops for the legend, lowest value first.
    pub fn legend(&self) -> Vec<(String, RGBColor)> {
        match self {
            ColorMap::States(colors) => colors
                .iter()
                .enumerate()
                .map(|(state, color)| (state.to_string(), *color))
                .collect(),
            ColorMap::Diverging { low, high } => {
                let steps = COOLWARM.len() - 1;
                (0..=steps)
                    .map(|k| {
                        let value = low + (high - low) * k as f64 / steps as f64;
                        (format!("{:.2}", value), COOLWARM[k])
                    })
                    .collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColorMap::States(colors) => colors.len(),
            ColorMap::Diverging { .. } => COOLWARM.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// Row colors for the category strip: evenly spaced dark red-blue colors.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    entries: Vec<(String, RGBColor)>,
}

impl CategoryPalette {
    ///
    /// Assign colors to categories in the given order. The ramp blends two red-blue tones
    /// into dark gray and is sampled at `(i + 1) / (n + 1)`.
    ///
    pub fn new(categories: &[String]) -> Self {
        let anchors = [
            interpolate(&RDBU, 1.0 / 3.0),
            interpolate(&RDBU, 2.0 / 3.0),
            DARK_GRAY,
        ];
        let n = categories.len();

        let entries = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let t = (i + 1) as f64 / (n + 1) as f64;
                (category.clone(), interpolate(&anchors, t))
            })
            .collect();

        CategoryPalette { entries }
    }

    ///
    /// Palette sized to the allow-list when one is active, otherwise to the distinct
    /// categories observed (sorted).
    ///
    pub fn for_categories<'a, I>(observed: I, allow_list: Option<&[String]>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        match allow_list {
            Some(calls) => CategoryPalette::new(calls),
            None => CategoryPalette::new(&distinct_sorted(observed)),
        }
    }

    pub fn color(&self, category: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, color)| *color)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn entries(&self) -> &[(String, RGBColor)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Distinct values in ascending order.
pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct: Vec<String> = values.into_iter().map(str::to_string).collect();
    distinct.sort();
    distinct.dedup();
    distinct
}

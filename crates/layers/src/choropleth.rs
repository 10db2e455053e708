//! Value-driven region coloring with perceptually uniform OKLCH ramps.

use std::collections::BTreeMap;

/// A color in OKLCH space, interpolated componentwise.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OklchColor {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid OKLCH color {:?}, expected \"L C H\"", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl OklchColor {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Parses the space-separated "L C H" form, e.g. "0.95 0.02 250".
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let mut parts = s.split_whitespace().map(str::parse::<f64>);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(l)), Some(Ok(c)), Some(Ok(h)), None) => Ok(Self { l, c, h }),
            _ => Err(ColorParseError(s.to_string())),
        }
    }

    /// Linear componentwise interpolation, `t` clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            l: self.l + (other.l - self.l) * t,
            c: self.c + (other.c - self.c) * t,
            h: self.h + (other.h - self.h) * t,
        }
    }

    pub fn to_css(self) -> String {
        format!("oklch({:.3} {:.3} {:.1})", self.l, self.c, self.h)
    }
}

/// Region code → numeric value, with optional fixed scale endpoints. When
/// `min`/`max` are absent the observed value range is used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoroplethData {
    pub values: BTreeMap<String, f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ChoroplethData {
    /// Explicit endpoints take precedence; observed values fill in the rest.
    /// `None` only when an endpoint is neither configured nor observable.
    fn range(&self) -> Option<(f64, f64)> {
        let has_values = !self.values.is_empty();
        let observed_min = self.values.values().copied().fold(f64::INFINITY, f64::min);
        let observed_max = self
            .values
            .values()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let min = self.min.or(has_values.then_some(observed_min))?;
        let max = self.max.or(has_values.then_some(observed_max))?;
        Some((min, max))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethConfig {
    pub color_min: OklchColor,
    pub color_max: OklchColor,
    pub legend_steps: usize,
    pub legend_unit: String,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            color_min: OklchColor::new(0.95, 0.02, 250.0),
            color_max: OklchColor::new(0.45, 0.2, 250.0),
            legend_steps: 5,
            legend_unit: String::new(),
        }
    }
}

/// The fill for one region, or `None` when the region has no value and
/// should keep the default fill.
///
/// A flat dataset (min == max) colors every region at the ramp midpoint.
pub fn choropleth_color(
    code: &str,
    data: &ChoroplethData,
    config: &ChoroplethConfig,
) -> Option<String> {
    let value = *data.values.get(code)?;
    let (min, max) = data.range()?;
    let t = if max == min {
        0.5
    } else {
        (value - min) / (max - min)
    };
    Some(config.color_min.lerp(config.color_max, t).to_css())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    pub color: String,
    pub label: String,
}

/// Equal-width legend bands over the value range. Swatches sample the ramp
/// at band index over steps − 1, so the first and last bands show the exact
/// endpoint colors; the last band's upper bound is the true maximum.
pub fn build_legend(data: &ChoroplethData, config: &ChoroplethConfig) -> Vec<LegendItem> {
    let Some((min, max)) = data.range() else {
        return Vec::new();
    };
    let steps = config.legend_steps;
    if steps == 0 {
        return Vec::new();
    }
    let step_size = (max - min) / steps as f64;

    (0..steps)
        .map(|i| {
            let t = if steps == 1 {
                0.0
            } else {
                i as f64 / (steps - 1) as f64
            };
            let range_start = min + step_size * i as f64;
            let range_end = if i == steps - 1 {
                max
            } else {
                min + step_size * (i + 1) as f64
            };
            LegendItem {
                color: config.color_min.lerp(config.color_max, t).to_css(),
                label: format!(
                    "{}~{}{}",
                    format_number(range_start),
                    format_number(range_end),
                    config.legend_unit
                ),
            }
        })
        .collect()
}

/// Grouped thousands, at most one decimal place: 1234567 → "1,234,567",
/// 2.25 → "2.3", 2.0 → "2".
pub fn format_number(n: f64) -> String {
    let rounded = (n * 10.0).round() / 10.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc() as u64;
    let tenth = ((abs - abs.trunc()) * 10.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if tenth > 0 {
        out.push('.');
        out.push_str(&tenth.to_string());
    }
    out
}

//! Sample grids and the scalar fields evaluated on them.
//!
//! A [`SampleGrid`] is the square `[-bounds, bounds]²` sampled `resolution`
//! times per axis, laid out like a meshgrid: row `iy` holds every `x` sample
//! at the `iy`-th `y` coordinate. A [`StrainField`] stores one value per
//! sample in the same row-major order.

/// Evenly spaced square grid centred on the orbital plane origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    bounds: f64,
    coords: Vec<f64>,
}

impl SampleGrid {
    /// Create a grid spanning `[-bounds, bounds]` with `resolution` samples per axis.
    ///
    /// Both end points are included. Callers guarantee `resolution >= 2`.
    pub fn new(bounds: f64, resolution: usize) -> Self {
        Self {
            bounds,
            coords: linspace(-bounds, bounds, resolution),
        }
    }

    /// Half-width of the sampled square.
    #[inline]
    pub fn bounds(&self) -> f64 {
        self.bounds
    }

    /// Samples per axis.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.coords.len()
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len() * self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates along one axis (identical for `x` and `y`).
    #[inline]
    pub fn axis(&self) -> &[f64] {
        &self.coords
    }

    /// Iterate `(x, y)` pairs in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords
            .iter()
            .flat_map(move |&y| self.coords.iter().map(move |&x| (x, y)))
    }

    /// Evaluate `f(x, y)` at every sample.
    pub fn evaluate<F>(&self, f: F) -> StrainField
    where
        F: Fn(f64, f64) -> f64,
    {
        StrainField {
            resolution: self.resolution(),
            values: self.points().map(|(x, y)| f(x, y)).collect(),
        }
    }
}

/// Scalar values on a [`SampleGrid`], row-major with `y` on rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StrainField {
    resolution: usize,
    values: Vec<f64>,
}

impl StrainField {
    /// Samples per axis.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// All values in row-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at column `ix` (x index) and row `iy` (y index).
    pub fn get(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.resolution || iy >= self.resolution {
            return None;
        }
        self.values.get(iy * self.resolution + ix).copied()
    }

    /// Largest absolute value, or 0 for an empty field.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

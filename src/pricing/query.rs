use std::fmt::Display;

use serde::Serialize;

/// Crop and location a price range is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    pub crop: String,
    pub location: String,
}

impl PriceQuery {
    pub fn new(crop: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            location: location.into(),
        }
    }
}

impl Display for PriceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}", self.crop, self.location)
    }
}

/// Fair selling price range per kilogram.
///
/// Only constructible through [`PriceRange::new`], which enforces
/// `min_price > 0` and `max_price >= min_price`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PriceRange {
    min_price: f64,
    max_price: f64,
}

impl PriceRange {
    pub fn new(min_price: f64, max_price: f64) -> Option<Self> {
        let valid = min_price.is_finite()
            && max_price.is_finite()
            && min_price > 0.0
            && max_price > 0.0
            && max_price >= min_price;
        valid.then_some(Self {
            min_price,
            max_price,
        })
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    /// Midpoint rounded to two decimals, kept inside the range.
    ///
    /// Rounds the exact binary value half-to-even, so `10.125` becomes `10.12`.
    pub fn suggested_price(&self) -> f64 {
        let midpoint = (self.min_price + self.max_price) / 2.0;
        let rounded = format!("{midpoint:.2}").parse().unwrap_or(midpoint);
        rounded.clamp(self.min_price, self.max_price)
    }
}

/// Renders a price the way it is shown to users: always with a decimal point.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ranges_violating_invariant() {
        assert!(PriceRange::new(0.0, 10.0).is_none());
        assert!(PriceRange::new(10.0, 0.0).is_none());
        assert!(PriceRange::new(-5.0, 10.0).is_none());
        assert!(PriceRange::new(20.0, 10.0).is_none());
        assert!(PriceRange::new(f64::NAN, 10.0).is_none());
        assert!(PriceRange::new(1.0, f64::INFINITY).is_none());
    }

    #[test]
    fn accepts_equal_bounds() {
        let range = PriceRange::new(25.0, 25.0).unwrap();
        assert_eq!(range.suggested_price(), 25.0);
    }

    #[test]
    fn suggested_price_rounds_to_two_decimals() {
        assert_eq!(PriceRange::new(20.0, 30.0).unwrap().suggested_price(), 25.0);
        assert_eq!(PriceRange::new(12.5, 30.0).unwrap().suggested_price(), 21.25);
        assert_eq!(PriceRange::new(10.0, 10.5).unwrap().suggested_price(), 10.25);
        assert_eq!(PriceRange::new(1.0, 2.0 / 3.0 + 1.0).unwrap().suggested_price(), 1.33);
    }

    #[test]
    fn suggested_price_ties_round_half_to_even() {
        assert_eq!(PriceRange::new(10.0, 10.25).unwrap().suggested_price(), 10.12);
        assert_eq!(PriceRange::new(1.0, 1.25).unwrap().suggested_price(), 1.12);
        assert_eq!(PriceRange::new(20.0, 20.25).unwrap().suggested_price(), 20.12);
        assert_eq!(PriceRange::new(10.0, 10.75).unwrap().suggested_price(), 10.38);
    }

    #[test]
    fn suggested_price_stays_within_bounds() {
        let ranges = [(0.125, 0.125), (0.001, 0.002), (1.0, 1.005), (3.333, 7.777)];
        for (min, max) in ranges {
            let range = PriceRange::new(min, max).unwrap();
            let suggested = range.suggested_price();
            assert!(min <= suggested && suggested <= max, "{min} {suggested} {max}");
        }
    }

    #[test]
    fn formats_prices_with_decimal_point() {
        assert_eq!(format_price(25.0), "25.0");
        assert_eq!(format_price(37.5), "37.5");
        assert_eq!(format_price(21.25), "21.25");
    }

    #[test]
    fn query_display() {
        assert_eq!(
            PriceQuery::new("Wheat", "Punjab, India").to_string(),
            "Wheat in Punjab, India"
        );
    }
}

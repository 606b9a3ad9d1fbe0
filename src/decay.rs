/// A value that evolves with a progress variable `t`
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
///
/// Starts at `vi` for `t = 0` and approaches `vf` from either side as `t` grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Exponential {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Exponential {
    /// **Errors** if `rate` is not a positive finite number or if `vi` equals `vf`
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self, String> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(format!("`rate` must be positive and finite, got {rate}"));
        }
        if vi == vf {
            return Err(String::from("`vi` and `vf` must differ"));
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }
}

use crate::error::{HwError, Result};

/// Fraction of the PWM period the enable line is held high for `duty`.
///
/// 0 maps to 0.0 and 255 to 1.0.
#[inline]
pub fn duty_cycle(duty: u8) -> f64 {
    f64::from(duty) / f64::from(u8::MAX)
}

/// Reject PWM frequencies that cannot drive a pin.
pub fn check_frequency(frequency_hz: f64) -> Result<f64> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(frequency_hz)
    } else {
        Err(HwError::InvalidFrequency(frequency_hz))
    }
}

//! Maps `Box<dyn Error>` from trait boundaries to typed `ControlError`.
//!
//! The traits in `speedctl_traits` use `Box<dyn Error + Send + Sync>` so any
//! driver can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `speedctl_hardware::HwError`.

use crate::error::ControlError;

/// Map a trait-boundary error to a typed `ControlError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> ControlError {
    #[cfg(feature = "hardware-errors")]
    {
        use speedctl_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Gpio(_) | HwError::Pwm(_) => ControlError::HardwareFault(hw.to_string()),
                HwError::Unavailable(_) => ControlError::BringUp(hw.to_string()),
                other => ControlError::Hardware(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("fault") {
        ControlError::HardwareFault(s)
    } else {
        ControlError::Hardware(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_errors_fall_back_to_message() {
        let e = std::io::Error::other("bus glitch");
        assert!(matches!(map_hw_error(&e), ControlError::Hardware(m) if m == "bus glitch"));
        let e = std::io::Error::other("driver FAULT pin asserted");
        assert!(matches!(map_hw_error(&e), ControlError::HardwareFault(_)));
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn downcasts_hw_errors() {
        use speedctl_hardware::error::HwError;
        let e = HwError::Pwm("ena: channel busy".into());
        assert!(matches!(map_hw_error(&e), ControlError::HardwareFault(_)));
        let e = HwError::Unavailable("gpio".into());
        assert!(matches!(map_hw_error(&e), ControlError::BringUp(_)));
    }
}

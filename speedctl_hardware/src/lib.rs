//! Device drivers behind the `speedctl_traits` seams.
//!
//! `sim` is always available and backs tests and the `simulate` command.
//! `gpio` needs the `hardware` feature and a Linux target with `/dev/gpiomem`.

pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
pub mod sim;
pub mod util;

pub use error::HwError;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use gpio::{GpioInput, GpioQuadraturePins, L298nActuator};
pub use sim::{SimulatedActuator, SimulatedButton, SimulatedEncoder, SimulatedQuadraturePins};

#[cfg(test)]
mod tests {
    use super::*;
    use speedctl_traits::{Actuator, DigitalInput, MotorCommand, QuadratureCounter};

    #[test]
    fn test_simulated_actuator() {
        let mut motor = SimulatedActuator::new();
        let probe = motor.clone();
        motor.set_command(true, 42).unwrap();
        assert_eq!(probe.last_command(), Some(MotorCommand::forward(42)));
        assert_eq!(probe.command_count(), 1);
    }

    #[test]
    fn test_simulated_encoder() {
        let mut enc = SimulatedEncoder::new();
        let knob = enc.clone();
        knob.turn(3);
        knob.turn(-1);
        assert_eq!(enc.position(), 2);
    }

    #[test]
    fn test_simulated_button_polarity() {
        let mut low = SimulatedButton::new(true);
        let handle = low.clone();
        assert!(low.is_high().unwrap());
        handle.press();
        assert!(!low.is_high().unwrap());

        let mut high = SimulatedButton::new(false);
        high.press();
        assert!(high.is_high().unwrap());
    }
}

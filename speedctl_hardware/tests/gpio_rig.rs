#![cfg(all(feature = "hardware", target_os = "linux"))]

use speedctl_hardware::{GpioInput, L298nActuator};
use speedctl_traits::{Actuator, DigitalInput};

// These only pass on a Raspberry Pi with the default wiring (BCM numbering).

#[test]
#[ignore = "requires a wired Raspberry Pi"]
fn l298n_accepts_full_range() {
    let mut motor = L298nActuator::new(17, 27, 18, 5000.0).expect("open l298n");
    motor.set_command(true, 255).expect("full duty");
    motor.set_command(true, 0).expect("stop");
}

#[test]
#[ignore = "requires a wired Raspberry Pi"]
fn released_button_reads_high() {
    let mut btn = GpioInput::new(22).expect("open input");
    assert!(btn.is_high().expect("read"));
}

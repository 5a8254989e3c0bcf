//! Raspberry Pi GPIO drivers backed by `rppal`.
//!
//! The L298N is driven with IN1/IN2 for direction and a software PWM on ENA
//! for speed. Inputs use the internal pull-ups; buttons and encoder phases
//! read high at rest.

use std::error::Error;

use rppal::gpio::{Gpio, InputPin, OutputPin};
use speedctl_traits::{Actuator, DigitalInput, QuadraturePins};

use crate::error::{HwError, Result};
use crate::util::{check_frequency, duty_cycle};

type BoxError = Box<dyn Error + Send + Sync>;

fn open() -> Result<Gpio> {
    Gpio::new().map_err(|e| HwError::Unavailable(e.to_string()))
}

fn output(gpio: &Gpio, pin: u8) -> Result<OutputPin> {
    let mut out = gpio
        .get(pin)
        .map_err(|e| HwError::Gpio(format!("pin {pin}: {e}")))?
        .into_output_low();
    out.set_reset_on_drop(true);
    Ok(out)
}

fn input_pullup(gpio: &Gpio, pin: u8) -> Result<InputPin> {
    Ok(gpio
        .get(pin)
        .map_err(|e| HwError::Gpio(format!("pin {pin}: {e}")))?
        .into_input_pullup())
}

/// L298N channel: IN1/IN2 direction, ENA duty.
pub struct L298nActuator {
    in1: OutputPin,
    in2: OutputPin,
    ena: OutputPin,
    frequency_hz: f64,
}

impl core::fmt::Debug for L298nActuator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("L298nActuator")
            .field("in1", &self.in1.pin())
            .field("in2", &self.in2.pin())
            .field("ena", &self.ena.pin())
            .field("frequency_hz", &self.frequency_hz)
            .finish()
    }
}

impl L298nActuator {
    pub fn new(in1: u8, in2: u8, ena: u8, frequency_hz: f64) -> Result<Self> {
        let frequency_hz = check_frequency(frequency_hz)?;
        let gpio = open()?;
        let actuator = Self {
            in1: output(&gpio, in1)?,
            in2: output(&gpio, in2)?,
            ena: output(&gpio, ena)?,
            frequency_hz,
        };
        tracing::info!(in1, in2, ena, frequency_hz, "l298n ready");
        Ok(actuator)
    }

    fn drive(&mut self, forward: bool, duty: u8) -> Result<()> {
        if forward {
            self.in1.set_high();
            self.in2.set_low();
        } else {
            self.in1.set_low();
            self.in2.set_high();
        }
        if duty == 0 {
            self.ena
                .clear_pwm()
                .map_err(|e| HwError::Pwm(e.to_string()))?;
            self.ena.set_low();
        } else {
            self.ena
                .set_pwm_frequency(self.frequency_hz, duty_cycle(duty))
                .map_err(|e| HwError::Pwm(e.to_string()))?;
        }
        Ok(())
    }
}

impl Actuator for L298nActuator {
    fn set_command(&mut self, forward: bool, duty: u8) -> std::result::Result<(), BoxError> {
        self.drive(forward, duty).map_err(|e| Box::new(e) as BoxError)
    }
}

/// Pulled-up GPIO input.
#[derive(Debug)]
pub struct GpioInput {
    pin: InputPin,
}

impl GpioInput {
    pub fn new(pin: u8) -> Result<Self> {
        let gpio = open()?;
        Ok(Self {
            pin: input_pullup(&gpio, pin)?,
        })
    }
}

impl DigitalInput for GpioInput {
    fn is_high(&mut self) -> std::result::Result<bool, BoxError> {
        Ok(self.pin.is_high())
    }
}

/// Encoder A/B phases on two pulled-up inputs.
#[derive(Debug)]
pub struct GpioQuadraturePins {
    a: InputPin,
    b: InputPin,
}

impl GpioQuadraturePins {
    pub fn new(a: u8, b: u8) -> Result<Self> {
        let gpio = open()?;
        Ok(Self {
            a: input_pullup(&gpio, a)?,
            b: input_pullup(&gpio, b)?,
        })
    }
}

impl QuadraturePins for GpioQuadraturePins {
    fn read_phases(&mut self) -> std::result::Result<(bool, bool), BoxError> {
        Ok((self.a.is_high(), self.b.is_high()))
    }
}

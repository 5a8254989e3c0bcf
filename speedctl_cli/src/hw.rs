//! Hardware assembly: GPIO drivers with the `hardware` feature, simulators otherwise.

use speedctl_core::{Button, LoopSettings};
use speedctl_traits::{Actuator, DigitalInput, QuadratureCounter};

pub struct Hardware {
    pub backend: &'static str,
    pub actuator: Box<dyn Actuator>,
    pub encoder: Box<dyn QuadratureCounter>,
    pub buttons: Vec<(Button, Box<dyn DigitalInput>)>,
}

impl core::fmt::Debug for Hardware {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hardware")
            .field("backend", &self.backend)
            .field("buttons", &self.buttons.len())
            .finish()
    }
}

/// Open the H-bridge, encoder and buttons described by `[pins]`; decoding
/// and polarity come from the validated loop settings.
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub fn bring_up(cfg: &speedctl_config::Config, settings: &LoopSettings) -> eyre::Result<Hardware> {
    use speedctl_core::QuadratureSampler;
    use speedctl_core::hw_error::map_hw_error;
    use speedctl_hardware::{GpioInput, GpioQuadraturePins, L298nActuator};
    use speedctl_traits::clock::MonotonicClock;
    use std::time::Duration;

    let fail = |what: &'static str| {
        move |e: speedctl_hardware::HwError| {
            eyre::Report::new(map_hw_error(&e)).wrap_err(format!("open {what}"))
        }
    };

    let p = &cfg.pins;
    let actuator = L298nActuator::new(p.motor_in1, p.motor_in2, p.motor_ena, cfg.pwm.frequency_hz)
        .map_err(fail("motor driver"))?;
    let pins = GpioQuadraturePins::new(p.enc_a, p.enc_b).map_err(fail("encoder pins"))?;
    let encoder = QuadratureSampler::spawn(
        pins,
        settings.encoder.latch_mode,
        Duration::from_micros(settings.encoder.sample_us),
        MonotonicClock::new(),
    );

    let mut buttons: Vec<(Button, Box<dyn DigitalInput>)> = Vec::new();
    for (button, pin) in [
        (Button::Encoder, p.enc_btn),
        (Button::Back, p.back_btn),
        (Button::Confirm, p.confirm_btn),
    ] {
        let input = GpioInput::new(pin).map_err(fail("button pin"))?;
        buttons.push((button, Box::new(input)));
    }

    tracing::info!(
        in1 = p.motor_in1,
        in2 = p.motor_in2,
        ena = p.motor_ena,
        enc_a = p.enc_a,
        enc_b = p.enc_b,
        "gpio hardware ready"
    );
    Ok(Hardware {
        backend: "gpio",
        actuator: Box::new(actuator),
        encoder: Box::new(encoder),
        buttons,
    })
}

/// Simulated devices; nothing drives the inputs, so the panel stays idle.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
pub fn bring_up(_cfg: &speedctl_config::Config, settings: &LoopSettings) -> eyre::Result<Hardware> {
    tracing::info!("hardware feature disabled; using simulated devices");
    Ok(simulated(settings).0)
}

/// Handles kept by the caller to drive a simulated panel.
#[derive(Debug, Clone)]
pub struct SimHandles {
    pub motor: speedctl_hardware::SimulatedActuator,
    pub knob: speedctl_hardware::SimulatedEncoder,
    pub encoder_btn: speedctl_hardware::SimulatedButton,
    pub back_btn: speedctl_hardware::SimulatedButton,
    pub confirm_btn: speedctl_hardware::SimulatedButton,
}

impl SimHandles {
    pub fn button(&self, button: Button) -> &speedctl_hardware::SimulatedButton {
        match button {
            Button::Encoder => &self.encoder_btn,
            Button::Back => &self.back_btn,
            Button::Confirm => &self.confirm_btn,
        }
    }
}

pub fn simulated(settings: &LoopSettings) -> (Hardware, SimHandles) {
    use speedctl_hardware::{SimulatedActuator, SimulatedButton, SimulatedEncoder};

    let active_low = settings.buttons.active_low;
    let handles = SimHandles {
        motor: SimulatedActuator::new(),
        knob: SimulatedEncoder::new(),
        encoder_btn: SimulatedButton::new(active_low),
        back_btn: SimulatedButton::new(active_low),
        confirm_btn: SimulatedButton::new(active_low),
    };
    let buttons: Vec<(Button, Box<dyn DigitalInput>)> = Button::ALL
        .into_iter()
        .map(|b| (b, Box::new(handles.button(b).clone()) as Box<dyn DigitalInput>))
        .collect();
    let hw = Hardware {
        backend: "simulated",
        actuator: Box::new(handles.motor.clone()),
        encoder: Box::new(handles.knob.clone()),
        buttons,
    };
    (hw, handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedctl_core::ButtonCfg;

    #[test]
    fn simulated_buttons_follow_configured_polarity() {
        for active_low in [true, false] {
            let settings = LoopSettings {
                buttons: ButtonCfg {
                    active_low,
                    ..ButtonCfg::default()
                },
                ..LoopSettings::default()
            };
            let (mut hw, handles) = simulated(&settings);
            let (_, input) = hw
                .buttons
                .iter_mut()
                .find(|(b, _)| *b == Button::Back)
                .unwrap();
            assert_eq!(input.is_high().unwrap(), active_low);
            handles.back_btn.press();
            assert_eq!(input.is_high().unwrap(), !active_low);
        }
    }
}

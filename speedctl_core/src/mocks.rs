//! Test and helper doubles for the controller seams.

use speedctl_traits::{Actuator, MotorCommand, StatusDisplay, StatusSnapshot};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

/// Actuator that records every command; clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    log: Rc<RefCell<Vec<MotorCommand>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<MotorCommand> {
        self.log.borrow().clone()
    }

    pub fn last(&self) -> Option<MotorCommand> {
        self.log.borrow().last().copied()
    }
}

impl Actuator for RecordingActuator {
    fn set_command(&mut self, forward: bool, duty: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.log.borrow_mut().push(MotorCommand { forward, duty });
        Ok(())
    }
}

/// Actuator whose every command fails, for exercising the best-effort path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingActuator;

impl Actuator for FailingActuator {
    fn set_command(&mut self, _forward: bool, _duty: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("actuator offline")))
    }
}

/// Display that keeps every rendered snapshot; clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    frames: Rc<RefCell<Vec<StatusSnapshot>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Option<StatusSnapshot> {
        self.frames.borrow().last().copied()
    }
}

impl StatusDisplay for RecordingDisplay {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.frames.borrow_mut().push(*snapshot);
        Ok(())
    }
}

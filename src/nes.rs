use crate::bus::DataBus;
use crate::mapper::Nrom;
use crate::rom::Rom;
use crate::six502::{Config, CpuError, Outcome, Six502};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// a JAM opcode stopped the processor
    Halted,
    /// the instruction stream hit a byte that does not decode
    Faulted(CpuError),
}

/// One emulation session: a cpu wired to a cartridge, and whether it may keep running.
pub struct Nes {
    cpu: Six502<DataBus>,
    state: RunState,
    steps: u64,
}

impl Nes {
    pub fn new(rom: &Rom, config: Config) -> Self {
        let bus = DataBus::new(Box::new(Nrom::new(rom)));
        Self {
            cpu: Six502::with_config(bus, config),
            state: RunState::Running,
            steps: 0,
        }
    }

    pub fn cpu(&self) -> &Six502<DataBus> {
        &self.cpu
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// instructions executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// executes one instruction. Once the session has halted or faulted this does nothing
    pub fn step(&mut self) -> &RunState {
        if self.state != RunState::Running {
            return &self.state;
        }

        match self.cpu.step() {
            Ok(Outcome::Executed { .. }) => self.steps += 1,
            Ok(Outcome::Halted) => {
                self.steps += 1;
                log::info!("halted after {} steps", self.steps);
                self.state = RunState::Halted;
            }
            Err(e) => {
                log::error!("{}", e);
                self.state = RunState::Faulted(e);
            }
        }
        &self.state
    }

    /// runs until the cpu halts or faults, or `max_steps` instructions have executed.
    /// Each instruction's trace line is written to `trace` before it runs.
    pub fn run(
        &mut self,
        max_steps: Option<u64>,
        mut trace: Option<&mut dyn Write>,
    ) -> io::Result<&RunState> {
        while self.state == RunState::Running {
            if let Some(max) = max_steps {
                if self.steps >= max {
                    log::info!("stopping after {} steps", self.steps);
                    break;
                }
            }
            if let Some(w) = trace.as_mut() {
                writeln!(w, "{}", self.cpu.trace())?;
            }
            self.step();
        }
        Ok(&self.state)
    }
}

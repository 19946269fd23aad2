mod addr_mode;
mod flags;
mod opcodes;
pub(crate) mod ram;
mod table;
mod trace;
mod util;

use crate::bus::{ByteAccess, DataBus, WordAccess};
use std::{error, fmt};

pub use addr_mode::AddressingMode;
pub use flags::Flags;
pub use table::{Instruction, Mnemonic, Opcode, Slot, INSTRUCTIONS};
pub use trace::Trace;

pub(crate) const STACK_OFFSET: u16 = 0x100;
const RESET_VECTOR: u16 = 0xfffc;
const IRQ_VECTOR: u16 = 0xfffe;

/// where the pc starts after a reset when no vector is read
pub const DEFAULT_ENTRY: u16 = 0xc000;
// the reset sequence itself takes 7 cycles
const RESET_CYCLES: u64 = 7;

/// How the pc is chosen on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// start at a fixed address, the way test harnesses like nestest's automation mode expect
    Fixed(u16),
    /// read the word at $FFFC, as the hardware does
    ResetVector,
}

impl Default for Entry {
    fn default() -> Self {
        Entry::Fixed(DEFAULT_ENTRY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub entry: Entry,
    /// decode the undocumented opcodes. When off, those bytes fault as invalid opcodes
    pub undocumented: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: Entry::default(),
            undocumented: true,
        }
    }
}

/// the result of a successful `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Executed { cycles: u8 },
    /// a JAM opcode locked the processor. Further steps do nothing
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    InvalidOpcode { opcode: u8, pc: u16 },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::InvalidOpcode { opcode, pc } => {
                write!(f, "invalid opcode ${:02X} at ${:04X}", opcode, pc)
            }
        }
    }
}

impl error::Error for CpuError {}

/// The 2A03's 6502 core, minus decimal mode.
///
/// The CPU owns its bus; everything it reads or writes goes through [`ByteAccess`].
pub struct Six502<B = DataBus> {
    pub(crate) a: u8,      // accumulator
    pub(crate) x: u8,      // index register
    pub(crate) y: u8,      // index register
    pub(crate) pc: u16,    // program counter
    pub(crate) s: u8,      // stack pointer, offset into page 1
    pub(crate) p: Flags,   // status register
    pub(crate) cy: u64,    // cycles since power on
    pub(crate) halted: bool,
    config: Config,
    pub(crate) bus: B,
}

impl<B: ByteAccess> ByteAccess for Six502<B> {
    fn load_u8(&mut self, addr: u16) -> u8 {
        self.bus.load_u8(addr)
    }

    fn store_u8(&mut self, addr: u16, v: u8) {
        self.bus.store_u8(addr, v)
    }
}

impl<B: ByteAccess> Six502<B> {
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, Config::default())
    }

    pub fn with_config(bus: B, config: Config) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            s: 0,
            p: Flags::default(),
            cy: 0,
            halted: false,
            config,
            bus,
        };
        cpu.reset();
        cpu
    }

    pub fn reset(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.s = 0xfd;
        self.p = Flags::default();
        let entry = self.config.entry;
        self.pc = match entry {
            Entry::Fixed(addr) => addr,
            Entry::ResetVector => self.load_u16(RESET_VECTOR),
        };
        self.cy = RESET_CYCLES;
        self.halted = false;
        log::debug!("cpu reset, pc=${:04X}", self.pc);
    }

    /// looks an opcode byte up under the current config
    pub fn decode(&self, opcode: u8) -> Option<Opcode> {
        table::decode(opcode).filter(|op| op.official || self.config.undocumented)
    }

    /// runs a single instruction and reports what it cost
    pub fn step(&mut self) -> Result<Outcome, CpuError> {
        if self.halted {
            return Ok(Outcome::Halted);
        }

        let pc = self.pc;
        let byte = self.load_u8_bump_pc();
        let op = self
            .decode(byte)
            .ok_or(CpuError::InvalidOpcode { opcode: byte, pc })?;
        log::trace!("${:04X}: {} {:?}", pc, op.mnemonic, op.mode);

        let operand = op.mode.resolve(self, op.mnemonic.reads_operand());
        let branch_cycles = self.exec(op.mnemonic, operand);
        if self.halted {
            log::info!("processor jammed by ${:02X} at ${:04X}", byte, pc);
            return Ok(Outcome::Halted);
        }

        let mut cycles = op.cycles + branch_cycles;
        if operand.page_cross {
            cycles += op.extra;
        }
        self.cy += cycles as u64;
        Ok(Outcome::Executed { cycles })
    }

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.s
    }

    pub fn status(&self) -> Flags {
        self.p
    }

    pub fn cycles(&self) -> u64 {
        self.cy
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatBus;

    #[test]
    fn reset_state() {
        let cpu = Six502::new(FlatBus::new());
        assert_eq!((cpu.a(), cpu.x(), cpu.y()), (0, 0, 0));
        assert_eq!(cpu.status().bits(), 0x24);
        assert_eq!(cpu.sp(), 0xfd);
        assert_eq!(cpu.pc(), 0xc000);
        assert_eq!(cpu.cycles(), 7);
        assert!(!cpu.is_halted());
    }

    #[test]
    fn reset_can_follow_the_vector() {
        let mut bus = FlatBus::new();
        bus.mem[0xfffc] = 0x34;
        bus.mem[0xfffd] = 0x12;
        let config = Config {
            entry: Entry::ResetVector,
            ..Config::default()
        };
        let cpu = Six502::with_config(bus, config);
        assert_eq!(cpu.pc(), 0x1234);
    }

    #[test]
    fn cycles_accumulate_from_reset() {
        // LDA #$01; LDA $0200; NOP
        let mut cpu = Six502::new(FlatBus::with_program(
            0xc000,
            &[0xa9, 0x01, 0xad, 0x00, 0x02, 0xea],
        ));
        for _ in 0..3 {
            cpu.step().unwrap();
        }
        assert_eq!(cpu.cycles(), 7 + 2 + 4 + 2);
        assert_eq!(cpu.pc(), 0xc006);
    }

    #[test]
    fn strict_mode_rejects_undocumented_opcodes() {
        let config = Config {
            undocumented: false,
            ..Config::default()
        };
        let bus = FlatBus::with_program(0xc000, &[0xea, 0xa7, 0x10]);
        let mut cpu = Six502::with_config(bus, config);
        assert_eq!(cpu.step(), Ok(Outcome::Executed { cycles: 2 }));
        let err = cpu.step().unwrap_err();
        assert_eq!(
            err,
            CpuError::InvalidOpcode {
                opcode: 0xa7,
                pc: 0xc001
            }
        );
        assert_eq!(err.to_string(), "invalid opcode $A7 at $C001");
        assert!(cpu.decode(0xa7).is_none());
        assert!(cpu.decode(0xa5).is_some());
    }

    #[test]
    fn jam_halts_until_reset() {
        let mut cpu = Six502::new(FlatBus::with_program(0xc000, &[0x02, 0xea]));
        assert_eq!(cpu.step(), Ok(Outcome::Halted));
        assert!(cpu.is_halted());
        let (pc, cy) = (cpu.pc(), cpu.cycles());
        assert_eq!(cpu.step(), Ok(Outcome::Halted));
        assert_eq!((cpu.pc(), cpu.cycles()), (pc, cy));

        cpu.reset();
        assert!(!cpu.is_halted());
        assert_eq!(cpu.step(), Ok(Outcome::Halted));
    }

    #[test]
    fn two_cores_do_not_share_state() {
        let mut one = Six502::new(FlatBus::with_program(0xc000, &[0xa9, 0x11]));
        let mut two = Six502::new(FlatBus::with_program(0xc000, &[0xa9, 0x22]));
        one.step().unwrap();
        two.step().unwrap();
        assert_eq!(one.a(), 0x11);
        assert_eq!(two.a(), 0x22);
    }
}

use super::addr_mode::AddressingMode;
use super::table::Opcode;
use super::Six502;
use crate::bus::ByteAccess;
use std::fmt;

/// The machine state just before an instruction runs, in the layout of the nestest golden log:
///
/// `C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub pc: u16,
    pub bytes: [u8; 3],
    pub len: usize,
    pub opcode: Option<Opcode>,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub cycles: u64,
}

impl<B: ByteAccess> Six502<B> {
    /// snapshots the instruction at pc without executing it
    pub fn trace(&mut self) -> Trace {
        let pc = self.pc;
        let byte = self.load_u8(pc);
        let opcode = self.decode(byte);
        let len = opcode.map_or(1, |op| op.mode.len() as usize);
        let mut bytes = [0u8; 3];
        for (i, b) in bytes.iter_mut().enumerate().take(len) {
            *b = self.load_u8(pc.wrapping_add(i as u16));
        }

        Trace {
            pc,
            bytes,
            len,
            opcode,
            a: self.a,
            x: self.x,
            y: self.y,
            p: self.p.bits(),
            sp: self.s,
            cycles: self.cy,
        }
    }
}

impl Trace {
    fn operand(&self, mode: AddressingMode) -> String {
        use AddressingMode::*;
        let lo = self.bytes[1];
        let word = u16::from_le_bytes([self.bytes[1], self.bytes[2]]);
        match mode {
            Implied => String::new(),
            Accumulator => "A".to_string(),
            Immediate => format!("#${:02X}", lo),
            ZP => format!("${:02X}", lo),
            ZP_X_Idxd => format!("${:02X},X", lo),
            ZP_Y_Idxd => format!("${:02X},Y", lo),
            Absolute => format!("${:04X}", word),
            Abs_X_Idxd => format!("${:04X},X", word),
            Abs_Y_Idxd => format!("${:04X},Y", word),
            Indirect => format!("(${:04X})", word),
            XIdxd_Indirect => format!("(${:02X},X)", lo),
            Indirect_Y_Idxd => format!("(${:02X}),Y", lo),
            Relative => {
                let target = self.pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
                format!("${:04X}", target)
            }
        }
    }

    /// the mnemonic and operand, e.g. `LDA ($20),Y`
    pub fn disassembly(&self) -> String {
        match self.opcode {
            Some(op) => {
                let operand = self.operand(op.mode);
                if operand.is_empty() {
                    op.mnemonic.to_string()
                } else {
                    format!("{} {}", op.mnemonic, operand)
                }
            }
            None => "???".to_string(),
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.bytes[..self.len]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let mark = match self.opcode {
            Some(op) if !op.official => '*',
            _ => ' ',
        };
        write!(
            f,
            "{:04X}  {:<9}{}{:<31} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc,
            hex,
            mark,
            self.disassembly(),
            self.a,
            self.x,
            self.y,
            self.p,
            self.sp,
            self.cycles
        )
    }
}

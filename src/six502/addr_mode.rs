use super::util::page_crossed;
use super::Six502;
use crate::bus::{ByteAccess, WordAccess};

/// [reference](https://www.masswerk.at/6502/6502_instruction_set.html)
/// The 6502 has the ability to do indexed addressing, where the X or Y register is used as an extra offset to the address being accessed
/// The addressing modes of the MCS6500 family can be grouped into two major categories:  Indexed and Non-Indexed Addressing
///
/// Two major kinds of addressing exist.
/// 1. Direct addressing: where the address is plainly what is after the opcode. e.g. absolute, zero_page, immediate.
/// 2. i.  Indexed addressing uses an address which is computed by means of modifying the address data accessed by
///        the program counter with an internal register called an index register.
///        e.g. Abs_X_Idxd, Abs_Y_Idxd, ZP_X_Idxd, ZP_Y_Idxd
///    ii. Indirect addressing uses a computed and stored address which is accessed by
///        an indirect pointer in the programming sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum AddressingMode {
    // OPC means `opcode`.
    // The instruction is just one byte. Addressing is implicit
    Implied,

    // operand is the accumulator. for single byte instructions
    Accumulator,

    // OPC #$BB: operand is the byte BB, as is.
    Immediate,

    // OPC $LL: only the first page (the first 256 bytes) of memory is accessible
    ZP,

    // OPC $LL,X    operand is zeropage address; effective address is address incremented by X without carry
    ZP_X_Idxd,

    // OPC $LL,Y    operand is zeropage address; effective address is address incremented by Y without carry
    ZP_Y_Idxd,

    // OPC $LLHH: operand is address $HHLL (i.e. read little-endian)
    Absolute,

    // OPC $LLHH,X: operand is address; effective address is address incremented by X with carry
    Abs_X_Idxd,

    // OPC $LLHH,Y: operand is address; effective address is address incremented by Y with carry
    Abs_Y_Idxd,

    // OPC ($LLHH): operand is address; effective address is contents of word at address. Only `jmp` uses it
    Indirect,

    // OPC ($LL,X): operand is zeropage address; effective address is word in (LL + X, LL + X + 1), inc. without carry
    XIdxd_Indirect,

    // OPC ($LL),Y: operand is zeropage address; effective address is word in (LL, LL + 1) incremented by Y with carry
    Indirect_Y_Idxd,

    // OPC $BB: branch target is PC + signed offset BB
    Relative,
}

/// What an addressing mode resolved to.
/// `addr` is `None` for the accumulator, implied, immediate and relative modes: a read-modify-write with
/// no address writes its result back into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Operand {
    pub(crate) value: u8,
    pub(crate) addr: Option<u16>,
    pub(crate) page_cross: bool,
}

impl Operand {
    fn value(value: u8) -> Self {
        Self {
            value,
            addr: None,
            page_cross: false,
        }
    }
}

impl AddressingMode {
    /// number of bytes the instruction occupies, opcode included
    pub fn len(self) -> u16 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 1,
            Immediate | ZP | ZP_X_Idxd | ZP_Y_Idxd | XIdxd_Indirect | Indirect_Y_Idxd
            | Relative => 2,
            Absolute | Abs_X_Idxd | Abs_Y_Idxd | Indirect => 3,
        }
    }

    /// fetches the operand bytes after the opcode (bumping the pc past them) and works out the effective address.
    /// When `read` is set the byte at the effective address is loaded as the value; stores and jumps pass `false`
    /// so that they never touch the target location before writing it.
    pub(crate) fn resolve<B: ByteAccess>(&self, cpu: &mut Six502<B>, read: bool) -> Operand {
        let (addr, page_cross) = match self {
            AddressingMode::Implied | AddressingMode::Accumulator => {
                return Operand::value(cpu.a);
            }
            AddressingMode::Immediate | AddressingMode::Relative => {
                return Operand::value(cpu.load_u8_bump_pc());
            }
            AddressingMode::ZP => (cpu.load_u8_bump_pc() as u16, false),

            //   If the base address plus X or Y exceeds the value that
            //   can be stored in a single byte, no carry is generated, therefore there is no page crossing phenomena
            //   A wrap-around will occur within Page Zero
            AddressingMode::ZP_X_Idxd => {
                let base = cpu.load_u8_bump_pc();
                (base.wrapping_add(cpu.x) as u16, false)
            }
            AddressingMode::ZP_Y_Idxd => {
                let base = cpu.load_u8_bump_pc();
                (base.wrapping_add(cpu.y) as u16, false)
            }
            AddressingMode::Absolute => (cpu.load_u16_bump_pc(), false),
            AddressingMode::Abs_X_Idxd => {
                let base = cpu.load_u16_bump_pc();
                let addr = base.wrapping_add(cpu.x as u16);
                (addr, page_crossed(base, addr))
            }
            AddressingMode::Abs_Y_Idxd => {
                let base = cpu.load_u16_bump_pc();
                let addr = base.wrapping_add(cpu.y as u16);
                (addr, page_crossed(base, addr))
            }
            AddressingMode::Indirect => {
                // the 6502 never carries into the high byte of the pointer: a pointer at $30FF
                // takes its low byte from $30FF and its high byte from $3000, not $3100
                let ptr = cpu.load_u16_bump_pc();
                let lo = cpu.load_u8(ptr);
                let hi = cpu.load_u8((ptr & 0xff00) | (ptr.wrapping_add(1) & 0x00ff));
                return Operand {
                    value: 0,
                    addr: Some(u16::from_le_bytes([lo, hi])),
                    page_cross: false,
                };
            }
            // The major use of indexed indirect is in picking up data from a table or list of addresses to perform an operation.
            AddressingMode::XIdxd_Indirect => {
                // zero page addition. Never crosses page. wraps around
                let ptr = cpu.load_u8_bump_pc().wrapping_add(cpu.x);
                (cpu.load_u16_zp(ptr), false)
            }
            AddressingMode::Indirect_Y_Idxd => {
                let ptr = cpu.load_u8_bump_pc();
                let base = cpu.load_u16_zp(ptr);
                // hardware charges a cycle when +Y crosses a page. This core does not report
                // the crossing for (ind),Y, so those reads always cost their base cycles
                (base.wrapping_add(cpu.y as u16), false)
            }
        };

        let value = if read { cpu.load_u8(addr) } else { 0 };
        Operand {
            value,
            addr: Some(addr),
            page_cross,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AddressingMode::*;
    use super::*;
    use crate::bus::FlatBus;

    // operand bytes live at $C000, where the pc sits after reset
    fn boot(operands: &[u8]) -> Six502<FlatBus> {
        Six502::new(FlatBus::with_program(0xc000, operands))
    }

    #[test]
    fn immediate_takes_the_next_byte() {
        let mut cpu = boot(&[0x7f]);
        let op = Immediate.resolve(&mut cpu, true);
        assert_eq!(op, Operand::value(0x7f));
        assert_eq!(cpu.pc, 0xc001);
    }

    #[test]
    fn accumulator_reads_a_without_fetching() {
        let mut cpu = boot(&[0xff]);
        cpu.a = 0x42;
        let op = Accumulator.resolve(&mut cpu, true);
        assert_eq!(op.value, 0x42);
        assert_eq!(op.addr, None);
        assert_eq!(cpu.pc, 0xc000);
    }

    #[test]
    fn zero_page_indexing_wraps_inside_page_zero() {
        for (base, x) in [(0x80u8, 0xffu8), (0xff, 0x01), (0x00, 0x00), (0xf0, 0x20)] {
            let mut cpu = boot(&[base]);
            cpu.x = x;
            let op = ZP_X_Idxd.resolve(&mut cpu, true);
            let addr = op.addr.unwrap();
            assert!(addr <= 0x00ff);
            assert_eq!(addr, base.wrapping_add(x) as u16);
        }

        let mut cpu = boot(&[0xfe]);
        cpu.y = 0x03;
        cpu.bus.mem[0x0001] = 0x99;
        let op = ZP_Y_Idxd.resolve(&mut cpu, true);
        assert_eq!(op.addr, Some(0x0001));
        assert_eq!(op.value, 0x99);
    }

    #[test]
    fn absolute_indexed_flags_page_crossings() {
        let mut cpu = boot(&[0xff, 0x20]);
        cpu.x = 1;
        let op = Abs_X_Idxd.resolve(&mut cpu, true);
        assert_eq!(op.addr, Some(0x2100));
        assert!(op.page_cross);

        let mut cpu = boot(&[0x10, 0x20]);
        cpu.y = 0xef;
        let op = Abs_Y_Idxd.resolve(&mut cpu, true);
        assert_eq!(op.addr, Some(0x20ff));
        assert!(!op.page_cross);
        assert_eq!(cpu.pc, 0xc002);
    }

    #[test]
    fn indexed_indirect_reads_the_pointer_from_page_zero() {
        let mut cpu = boot(&[0xfe]);
        cpu.x = 0x01;
        // pointer at $FF wraps to $00 for its high byte
        cpu.bus.mem[0x00ff] = 0x34;
        cpu.bus.mem[0x0000] = 0x12;
        cpu.bus.mem[0x1234] = 0x5a;
        let op = XIdxd_Indirect.resolve(&mut cpu, true);
        assert_eq!(op.addr, Some(0x1234));
        assert_eq!(op.value, 0x5a);
    }

    #[test]
    fn indirect_indexed_adds_y_after_the_lookup() {
        let mut cpu = boot(&[0x40]);
        cpu.y = 0x10;
        cpu.bus.mem[0x0040] = 0xf8;
        cpu.bus.mem[0x0041] = 0x02;
        cpu.bus.mem[0x0308] = 0x77;
        let op = Indirect_Y_Idxd.resolve(&mut cpu, true);
        assert_eq!(op.addr, Some(0x0308));
        assert_eq!(op.value, 0x77);
        assert!(!op.page_cross);
    }

    #[test]
    fn indirect_wraps_within_the_pointer_page() {
        let mut cpu = boot(&[0xff, 0x30]);
        cpu.bus.mem[0x30ff] = 0x40;
        cpu.bus.mem[0x3000] = 0x80;
        cpu.bus.mem[0x3100] = 0x50;
        let op = Indirect.resolve(&mut cpu, false);
        assert_eq!(op.addr, Some(0x8040));
    }

    #[test]
    fn stores_do_not_read_the_target() {
        let mut cpu = boot(&[0x00, 0x02]);
        cpu.bus.mem[0x0200] = 0xee;
        let op = Absolute.resolve(&mut cpu, false);
        assert_eq!(op.addr, Some(0x0200));
        assert_eq!(op.value, 0);
    }
}

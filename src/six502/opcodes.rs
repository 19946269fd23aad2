use super::addr_mode::Operand;
use super::flags::Flags;
use super::table::Mnemonic;
use super::util::{check_overflow, page_crossed};
use super::{Six502, IRQ_VECTOR};
use crate::bus::{ByteAccess, WordAccess};

// constant the unstable LXA/XAA opcodes OR into A before masking. Real chips vary between $00, $EE and $FF
const MAGIC: u8 = 0xff;

impl<B: ByteAccess> Six502<B> {
    /// runs one decoded instruction against its resolved operand.
    /// Returns the extra cycles a taken branch costs, 0 for everything else.
    pub(super) fn exec(&mut self, mnemonic: Mnemonic, op: Operand) -> u8 {
        use Mnemonic::*;
        match mnemonic {
            // branches
            BPL => return self.branch(!self.is_flag_set(Flags::NEGATIVE), op.value),
            BMI => return self.branch(self.is_flag_set(Flags::NEGATIVE), op.value),
            BVC => return self.branch(!self.is_flag_set(Flags::OVERFLOW), op.value),
            BVS => return self.branch(self.is_flag_set(Flags::OVERFLOW), op.value),
            BCC => return self.branch(!self.is_flag_set(Flags::CARRY), op.value),
            BCS => return self.branch(self.is_flag_set(Flags::CARRY), op.value),
            BNE => return self.branch(!self.is_flag_set(Flags::ZERO), op.value),
            BEQ => return self.branch(self.is_flag_set(Flags::ZERO), op.value),

            LDA => self.lda(op.value),
            LDX => self.ldx(op.value),
            LDY => self.ldy(op.value),
            STA => self.store(op, self.a),
            STX => self.store(op, self.x),
            STY => self.store(op, self.y),

            CMP => self.compare(self.a, op.value),
            CPX => self.compare(self.x, op.value),
            CPY => self.compare(self.y, op.value),
            BIT => self.bit(op.value),

            TAX => self.tax(),
            TAY => self.tay(),
            TXA => self.txa(),
            TYA => self.tya(),
            TSX => self.tsx(),
            TXS => self.txs(),

            PHA => self.pha(),
            PLA => self.pla(),
            PHP => self.php(),
            PLP => self.plp(),

            AND => self.and(op.value),
            ORA => self.ora(op.value),
            EOR => self.eor(op.value),
            ADC => self.adc(op.value),
            SBC => self.sbc(op.value),

            INC => {
                self.inc(op);
            }
            DEC => {
                self.dec(op);
            }
            INX => self.inx(),
            INY => self.iny(),
            DEX => self.dex(),
            DEY => self.dey(),

            ASL => {
                self.asl(op);
            }
            LSR => {
                self.lsr(op);
            }
            ROL => {
                self.rol(op);
            }
            ROR => {
                self.ror(op);
            }

            JMP => self.jmp(op),
            JSR => self.jsr(op),
            RTS => self.rts(),
            BRK => self.brk(),
            RTI => self.rti(),

            CLC => self.clear_flag(Flags::CARRY),
            SEC => self.set_flag(Flags::CARRY),
            CLI => self.clear_flag(Flags::IRQ),
            SEI => self.set_flag(Flags::IRQ),
            CLV => self.clear_flag(Flags::OVERFLOW),
            CLD => self.clear_flag(Flags::DECIMAL),
            SED => self.set_flag(Flags::DECIMAL),

            // the operand, if any, has already been fetched and read
            NOP => {}

            SLO => self.slo(op),
            RLA => self.rla(op),
            SRE => self.sre(op),
            RRA => self.rra(op),
            DCP => self.dcp(op),
            ISC => self.isc(op),
            SAX => self.store(op, self.a & self.x),
            LAX => self.lax(op.value),
            LXA => self.lxa(op.value),
            ANC => self.anc(op.value),
            ALR => self.alr(op.value),
            ARR => self.arr(op.value),
            XAA => self.xaa(op.value),
            AXS => self.axs(op.value),
            LAS => self.las(op.value),
            TAS => self.tas(op),
            SHA => self.store_high_masked(op, self.a & self.x),
            SHX => self.store_high_masked(op, self.x),
            SHY => self.store_high_masked(op, self.y),
            JAM => self.halted = true,
        }
        0
    }

    /// stores go to the effective address. Every store mode resolves one
    fn store(&mut self, op: Operand, v: u8) {
        if let Some(addr) = op.addr {
            self.store_u8(addr, v);
        }
    }

    /// read-modify-write results land in memory, or in A for the accumulator forms
    fn write_back(&mut self, op: Operand, v: u8) {
        match op.addr {
            Some(addr) => self.store_u8(addr, v),
            None => self.a = v,
        }
    }
}

// load/store ops
impl<B: ByteAccess> Six502<B> {
    /// load accumulator with memory.
    /// zero flag is set if the acc is zero, otherwise resets.
    /// negative flag is set if bit 7 of the accumulator is a 1, otherwise resets
    fn lda(&mut self, v: u8) {
        self.a = v;
        self.update_zn(v);
    }

    fn ldx(&mut self, v: u8) {
        self.x = v;
        self.update_zn(v);
    }

    fn ldy(&mut self, v: u8) {
        self.y = v;
        self.update_zn(v);
    }
}

// comparisons
impl<B: ByteAccess> Six502<B> {
    /// cmp, cpx and cpy set flags as if the operand had been subtracted from the register.
    /// N comes from bit 7 of the difference, not of the register
    fn compare(&mut self, r: u8, v: u8) {
        self.assert_flag(Flags::CARRY, r >= v);
        self.update_zn(r.wrapping_sub(v));
    }

    /// bit test: Z from A & M, but N and V are copied straight from bits 7 and 6 of memory
    fn bit(&mut self, v: u8) {
        self.assert_flag(Flags::ZERO, self.a & v == 0);
        self.assert_flag(Flags::NEGATIVE, v & 0x80 != 0);
        self.assert_flag(Flags::OVERFLOW, v & 0x40 != 0);
    }
}

// register transfers
impl<B: ByteAccess> Six502<B> {
    /// tax transfers accumulator into x register, updating the z and n flags based on the value of a
    fn tax(&mut self) {
        self.x = self.a;
        self.update_zn(self.x);
    }

    fn tay(&mut self) {
        self.y = self.a;
        self.update_zn(self.y);
    }

    fn txa(&mut self) {
        self.a = self.x;
        self.update_zn(self.a);
    }

    fn tya(&mut self) {
        self.a = self.y;
        self.update_zn(self.a);
    }

    /// tsx: Transfer Stack ptr to X
    fn tsx(&mut self) {
        self.x = self.s;
        self.update_zn(self.x);
    }

    /// txs: transfer x register to stack pointer. the only transfer that leaves the flags alone
    fn txs(&mut self) {
        self.s = self.x;
    }
}

// stack ops
impl<B: ByteAccess> Six502<B> {
    fn pha(&mut self) {
        self.push_u8(self.a);
    }

    fn pla(&mut self) {
        let v = self.pull_u8();
        self.a = v;
        self.update_zn(v);
    }

    // php push processor status, with B and the unused bit set
    fn php(&mut self) {
        self.push_u8(self.p.pushed());
    }

    /// plp pulls processor status. B is dropped, the unused bit forced on
    fn plp(&mut self) {
        let v = self.pull_u8();
        self.p = Flags::pulled(v);
    }
}

// logical ops
impl<B: ByteAccess> Six502<B> {
    /// and: bitwise AND with accumulator. affects the n and z flags
    fn and(&mut self, v: u8) {
        self.a &= v;
        self.update_zn(self.a);
    }

    fn ora(&mut self, v: u8) {
        self.a |= v;
        self.update_zn(self.a);
    }

    fn eor(&mut self, v: u8) {
        self.a ^= v;
        self.update_zn(self.a);
    }
}

// arithmetic ops
// The MCS650X has an 8-bit arithmetic unit
// arithmetic ops are performed using the accumulator as temporary storage.
// In unsigned arithmetic, we need to watch the carry flag to detect errors. The overflow flag is not useful for unsigned ops
// In signed arithmetic, we need to watch the overflow flag to detect errors.
// the cpu knows nothing about the programmer's intents. it justs sets both flags
impl<B: ByteAccess> Six502<B> {
    /// Add Memory to Accumulator with Carry
    ///  A + M + C -> A.
    /// Example of unsigned arithmetic (Here, A refers to the accumulator, and M refers to the contents of the selected memory)
    ///                  0000   1101     13 = (A)*
    ///                  1101   0011    211 = (M)*
    ///                            1      1 = CARRY
    /// Carry  = /0/     1110   0001    225 = (A)
    fn adc(&mut self, v: u8) {
        let a = self.a;
        // widened so the ninth bit survives
        let sum = a as u16 + v as u16 + self.is_flag_set(Flags::CARRY) as u16;
        let res = sum as u8;

        self.assert_flag(Flags::CARRY, sum > 0xff);
        self.assert_flag(Flags::OVERFLOW, check_overflow(a, v, res));
        self.a = res;
        self.update_zn(res);
    }

    /// sbc is adc of the operand's complement: A - M - (1 - C) == A + !M + C
    fn sbc(&mut self, v: u8) {
        self.adc(!v);
    }
}

// incrs and decrs
impl<B: ByteAccess> Six502<B> {
    fn inc(&mut self, op: Operand) -> u8 {
        let v = op.value.wrapping_add(1);
        self.update_zn(v);
        self.write_back(op, v);
        v
    }

    fn dec(&mut self, op: Operand) -> u8 {
        let v = op.value.wrapping_sub(1);
        self.update_zn(v);
        self.write_back(op, v);
        v
    }

    fn inx(&mut self) {
        self.x = self.x.wrapping_add(1);
        self.update_zn(self.x);
    }

    fn iny(&mut self) {
        self.y = self.y.wrapping_add(1);
        self.update_zn(self.y);
    }

    fn dex(&mut self) {
        self.x = self.x.wrapping_sub(1);
        self.update_zn(self.x);
    }

    fn dey(&mut self) {
        self.y = self.y.wrapping_sub(1);
        self.update_zn(self.y);
    }
}

// shifts
// the carry takes whichever bit falls off the end. rotates feed the old carry into the vacated bit
impl<B: ByteAccess> Six502<B> {
    fn asl(&mut self, op: Operand) -> u8 {
        let b = op.value;
        let res = b << 1;
        self.assert_flag(Flags::CARRY, b & 0x80 != 0);
        self.update_zn(res);
        self.write_back(op, res);
        res
    }

    fn lsr(&mut self, op: Operand) -> u8 {
        let res = self.lsr_value(op.value);
        self.write_back(op, res);
        res
    }

    fn lsr_value(&mut self, b: u8) -> u8 {
        let res = b >> 1;
        self.assert_flag(Flags::CARRY, b & 0x01 != 0);
        self.update_zn(res);
        res
    }

    fn rol(&mut self, op: Operand) -> u8 {
        let b = op.value;
        let res = (b << 1) | self.is_flag_set(Flags::CARRY) as u8;
        self.assert_flag(Flags::CARRY, b & 0x80 != 0);
        self.update_zn(res);
        self.write_back(op, res);
        res
    }

    fn ror(&mut self, op: Operand) -> u8 {
        let b = op.value;
        let res = (b >> 1) | ((self.is_flag_set(Flags::CARRY) as u8) << 7);
        self.assert_flag(Flags::CARRY, b & 0x01 != 0);
        self.update_zn(res);
        self.write_back(op, res);
        res
    }
}

// jumps and calls
impl<B: ByteAccess> Six502<B> {
    // both jmp forms arrive with the target already resolved, the indirect page bug included
    fn jmp(&mut self, op: Operand) {
        if let Some(addr) = op.addr {
            self.pc = addr;
        }
    }

    /// jsr pushes the address of its own last byte, pc - 1. `rts` adds the 1 back
    fn jsr(&mut self, op: Operand) {
        let ret = self.pc.wrapping_sub(1);
        self.push_u16(ret);
        self.jmp(op);
    }

    fn rts(&mut self) {
        self.pc = self.pull_u16().wrapping_add(1);
    }

    /// brk is a two byte instruction: the byte after the opcode is padding, so the pushed return address skips it.
    /// pushes pc high, pc low, then the flags with B set, and jumps through the IRQ vector with interrupts disabled
    fn brk(&mut self) {
        let ret = self.pc.wrapping_add(1);
        self.push_u16(ret);
        self.push_u8(self.p.pushed());
        self.set_flag(Flags::IRQ);
        self.pc = self.load_u16(IRQ_VECTOR);
    }

    // retrieves the Processor Status Word (flags) and the Program Counter from the stack in that order
    fn rti(&mut self) {
        let v = self.pull_u8();
        self.p = Flags::pulled(v);
        self.pc = self.pull_u16();
    }
}

// branches
// All branches are relative mode and have a length of two bytes
// branching ops do not affect any flag, but they depend on flag states.
// Add one if the branch is taken and add one more if the branch crosses a page boundary
impl<B: ByteAccess> Six502<B> {
    fn branch(&mut self, cond: bool, offset: u8) -> u8 {
        if !cond {
            return 0;
        }
        let from = self.pc;
        self.pc = from.wrapping_add(offset as i8 as u16);
        if page_crossed(from, self.pc) {
            2
        } else {
            1
        }
    }
}

// undocumented ops
// most are two documented ops fused onto one operand; https://www.nesdev.org/wiki/CPU_unofficial_opcodes
impl<B: ByteAccess> Six502<B> {
    fn slo(&mut self, op: Operand) {
        let v = self.asl(op);
        self.ora(v);
    }

    fn rla(&mut self, op: Operand) {
        let v = self.rol(op);
        self.and(v);
    }

    fn sre(&mut self, op: Operand) {
        let v = self.lsr(op);
        self.eor(v);
    }

    fn rra(&mut self, op: Operand) {
        let v = self.ror(op);
        self.adc(v);
    }

    fn dcp(&mut self, op: Operand) {
        let v = self.dec(op);
        self.compare(self.a, v);
    }

    fn isc(&mut self, op: Operand) {
        let v = self.inc(op);
        self.sbc(v);
    }

    fn lax(&mut self, v: u8) {
        self.a = v;
        self.x = v;
        self.update_zn(v);
    }

    fn lxa(&mut self, v: u8) {
        let res = (self.a | MAGIC) & v;
        self.lax(res);
    }

    /// and, then carry mirrors the negative flag
    fn anc(&mut self, v: u8) {
        self.and(v);
        self.assert_flag(Flags::CARRY, self.is_flag_set(Flags::NEGATIVE));
    }

    fn alr(&mut self, v: u8) {
        let v = self.a & v;
        self.a = self.lsr_value(v);
    }

    /// and, then rotate A right. C comes from bit 6 of the result and V from bit 6 xor bit 5
    fn arr(&mut self, v: u8) {
        let v = self.a & v;
        let res = (v >> 1) | ((self.is_flag_set(Flags::CARRY) as u8) << 7);
        self.a = res;
        self.update_zn(res);
        self.assert_flag(Flags::CARRY, res & 0x40 != 0);
        self.assert_flag(Flags::OVERFLOW, ((res >> 6) ^ (res >> 5)) & 0x01 != 0);
    }

    fn xaa(&mut self, v: u8) {
        self.a = (self.a | MAGIC) & self.x & v;
        self.update_zn(self.a);
    }

    /// x = (a & x) - imm, borrowing like cmp rather than sbc: no carry in, no overflow
    fn axs(&mut self, v: u8) {
        let ax = self.a & self.x;
        self.assert_flag(Flags::CARRY, ax >= v);
        self.x = ax.wrapping_sub(v);
        self.update_zn(self.x);
    }

    fn las(&mut self, v: u8) {
        let res = v & self.s;
        self.a = res;
        self.x = res;
        self.s = res;
        self.update_zn(res);
    }

    fn tas(&mut self, op: Operand) {
        self.s = self.a & self.x;
        self.store_high_masked(op, self.s);
    }

    /// sha/shx/shy/tas store the register ANDed with the high byte of the effective address plus one
    fn store_high_masked(&mut self, op: Operand, v: u8) {
        if let Some(addr) = op.addr {
            let hi = ((addr >> 8) as u8).wrapping_add(1);
            self.store_u8(addr, v & hi);
        }
    }
}

use super::flags::Flags;
use super::{Six502, STACK_OFFSET};
use crate::bus::{ByteAccess, WordAccess};

impl<B: ByteAccess> Six502<B> {
    pub(super) fn load_u8_bump_pc(&mut self) -> u8 {
        let addr = self.pc;
        self.pc = self.pc.wrapping_add(1);
        self.load_u8(addr)
    }

    pub(super) fn load_u16_bump_pc(&mut self) -> u16 {
        let addr = self.pc;
        self.pc = self.pc.wrapping_add(2);
        self.load_u16(addr)
    }

    // stack helpers
    // the stack lives in page 1 and grows down. `s` points at the next free slot and wraps within the page

    pub(super) fn push_u8(&mut self, b: u8) {
        let addr = STACK_OFFSET | self.s as u16;
        self.store_u8(addr, b);
        self.s = self.s.wrapping_sub(1);
    }

    pub(super) fn pull_u8(&mut self) -> u8 {
        self.s = self.s.wrapping_add(1);
        self.load_u8(STACK_OFFSET | self.s as u16)
    }

    // high byte goes first so the word sits little-endian in memory
    pub(super) fn push_u16(&mut self, w: u16) {
        let [lo, hi] = w.to_le_bytes();
        self.push_u8(hi);
        self.push_u8(lo);
    }

    pub(super) fn pull_u16(&mut self) -> u16 {
        let lo = self.pull_u8();
        let hi = self.pull_u8();
        u16::from_le_bytes([lo, hi])
    }

    // flag helpers

    pub(super) fn set_flag(&mut self, flag: Flags) {
        self.p.insert(flag);
    }

    pub(super) fn clear_flag(&mut self, flag: Flags) {
        self.p.remove(flag);
    }

    // assert_flag is different from set_flag in the sense that if the operation fails to fulfil the condition
    // the flag in question is reset anyways, so every op that affects a flag leaves it up to date
    pub(super) fn assert_flag(&mut self, flag: Flags, cond: bool) {
        self.p.set(flag, cond);
    }

    pub(super) fn is_flag_set(&self, flag: Flags) -> bool {
        self.p.contains(flag)
    }

    /// The zero flag is set if the result is 0, otherwise the zero flag is reset
    pub(super) fn update_z(&mut self, v: u8) {
        self.assert_flag(Flags::ZERO, v == 0);
    }

    /// The negative flag is set if the result has bit 7 on, otherwise the negative flag is reset.
    pub(super) fn update_n(&mut self, v: u8) {
        self.assert_flag(Flags::NEGATIVE, v & 0x80 != 0);
    }

    pub(super) fn update_zn(&mut self, v: u8) {
        self.update_z(v);
        self.update_n(v);
    }
}

/// whether `a` and `b` sit on different 256-byte pages
pub(super) fn page_crossed(a: u16, b: u16) -> bool {
    a & 0xff00 != b & 0xff00
}

/// the overflow flag, used to indicate when a carry from 7 bits has occurred.
/// The generation of a carry out of the field in signed arithmetic is the same as when adding two 8-bit numbers (unsigned arith), except that
/// the normal carry flag does not correctly represent the fact that the field has been exceeded.
/// **So, the overflow flag is set whenever the sign bit (bit 7) is changed as a result of the operation.**
/// two cases:
/// 1. 0100 + 0100 = 1000 => overflow flag is turned on.
/// 2. 1000 + 1000 = 0000 => overflow flag is turned on.
/// Mixed-sign addition never turns on the overflow flag.
pub(super) fn check_overflow(a: u8, b: u8, res: u8) -> bool {
    // 1: both operands share a sign
    // 2: the result's sign differs from it
    (a ^ res) & (b ^ res) & 0x80 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatBus;

    #[test]
    fn stack_wraps_inside_page_one() {
        let mut cpu = Six502::new(FlatBus::new());
        cpu.s = 0x00;
        cpu.push_u8(0xab);
        assert_eq!(cpu.bus.mem[0x0100], 0xab);
        assert_eq!(cpu.s, 0xff);
        assert_eq!(cpu.pull_u8(), 0xab);
        assert_eq!(cpu.s, 0x00);
    }

    #[test]
    fn words_are_pushed_high_byte_first() {
        let mut cpu = Six502::new(FlatBus::new());
        cpu.push_u16(0xc0de);
        assert_eq!(cpu.s, 0xfb);
        assert_eq!(cpu.bus.mem[0x01fd], 0xc0);
        assert_eq!(cpu.bus.mem[0x01fc], 0xde);
        assert_eq!(cpu.pull_u16(), 0xc0de);
        assert_eq!(cpu.s, 0xfd);
    }

    #[test]
    fn overflow_only_on_sign_change() {
        assert!(check_overflow(0x50, 0x50, 0xa0));
        assert!(check_overflow(0x80, 0x80, 0x00));
        assert!(!check_overflow(0x50, 0x90, 0xe0));
        assert!(!check_overflow(0x01, 0x01, 0x02));
    }

    #[test]
    fn pages() {
        assert!(page_crossed(0x20ff, 0x2100));
        assert!(!page_crossed(0x2000, 0x20ff));
        assert!(page_crossed(0xffff, 0x0000));
    }
}

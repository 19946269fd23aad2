//! |   |   |   |   |   |   |   |   |
//! | N | V |   | B | D | I | Z | C |     PROCESSOR STATUS REGISTER
//! |   |   |   |   |   |   |   |   |
//! |   |   |   |   |   |   |   |
//! |   |   |   |   |   |   |   +------ CARRY
//! |   |   |   |   |   |   |
//! |   |   |   |   |   |   +---------- ZERO RESULT
//! |   |   |   |   |   |
//! |   |   |   |   |   +-------------- INTERRUPT DISABLE
//! |   |   |   |   |
//! |   |   |   |   +------------------ DECIMAL MODE
//! |   |   |   |
//! |   |   |   +---------------------- BREAK COMMAND
//! |   |   |
//! |   |   +-------------------------- EXPANSION
//! |
//! |   +------------------------------ OVERFLOW
//! |
//! +---------------------------------- NEGATIVE RESULT
//! http://users.telenet.be/kim1-6502/6502/proman.html#3
//! All these are flip flops

bitflags::bitflags! {
    pub struct Flags: u8 {
        /// Generally the ninth bit in operations that affect it. `sec` sets it, `clc` resets it.
        /// In the case of shift and rotate instructions, the carry bit is used as a ninth bit as it is in the arithmetic operations.
        /// In `sbc` its complement indicates a borrow exists. In `adc` it tests for a simple carry upon addition.
        const CARRY = 1 << 0;
        /// set when the 8 bits of the result of an operation are 0
        const ZERO = 1 << 1;
        /// disables the effects of the interrupt request pin.
        /// set during reset and by `brk`, cleared by `cli`, `plp` or `rti`
        const IRQ = 1 << 2;
        /// selects decimal arithmetic on a stock 6502. The NES part has no decimal mode, so the bit is stored but inert
        const DECIMAL = 1 << 3;
        /// only exists on the copy of the flags pushed to the stack; tells `brk` apart from a hardware interrupt
        const BREAK = 1 << 4;
        /// expansion bit. reads back as 1
        const UNUSED = 1 << 5;
        /// The overflow flag is set whenever the sign bit (bit 7) is changed as a result of a signed operation
        const OVERFLOW = 1 << 6;
        /// the NEGATIVE flag is set equal to bit 7 of the resulting value in all data movement and data arithmetic
        const NEGATIVE = 1 << 7;
    }
}

impl Flags {
    /// the byte `php` and `brk` push. Bits 4 and 5 are always set on the stack copy.
    pub fn pushed(self) -> u8 {
        (self | Flags::BREAK | Flags::UNUSED).bits()
    }

    /// the flags `plp` and `rti` restore from a stack byte: bit 4 never survives the trip, bit 5 always reads as 1
    pub fn pulled(byte: u8) -> Self {
        let mut flags = Flags::from_bits_truncate(byte);
        flags.remove(Flags::BREAK);
        flags.insert(Flags::UNUSED);
        flags
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::IRQ | Flags::UNUSED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bit_positions() {
        assert_eq!(Flags::CARRY.bits(), 0x01);
        assert_eq!(Flags::ZERO.bits(), 0x02);
        assert_eq!(Flags::IRQ.bits(), 0x04);
        assert_eq!(Flags::DECIMAL.bits(), 0x08);
        assert_eq!(Flags::BREAK.bits(), 0x10);
        assert_eq!(Flags::UNUSED.bits(), 0x20);
        assert_eq!(Flags::OVERFLOW.bits(), 0x40);
        assert_eq!(Flags::NEGATIVE.bits(), 0x80);
        assert_eq!(Flags::default().bits(), 0x24);
    }

    #[test]
    fn push_forces_break_and_unused() {
        assert_eq!(Flags::empty().pushed(), 0x30);
        assert_eq!(Flags::all().pushed(), 0xff);
        assert_eq!((Flags::CARRY | Flags::NEGATIVE).pushed(), 0xb1);
    }

    #[test]
    fn pull_clears_break_and_sets_unused() {
        for byte in 0..=255u8 {
            let flags = Flags::pulled(byte);
            assert_eq!(flags.bits(), (byte & !0x10) | 0x20);
        }
    }
}

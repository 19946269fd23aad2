use crate::mapper::{Mapper, Nrom};
use crate::six502::ram::Ram;

/// ByteAccess handles the loading and storage of u8 values. An implementor is an addressable member of the NES
/// The memory address can be regarded as 256 pages (each page defined by the high order byte) of 256 memory locations (bytes) per page.
pub trait ByteAccess {
    fn load_u8(&mut self, addr: u16) -> u8;
    fn store_u8(&mut self, addr: u16, v: u8);
}

pub trait WordAccess {
    fn load_u16(&mut self, addr: u16) -> u16;
    fn load_u16_zp(&mut self, addr: u8) -> u16;
}

// blanket implementation of Word Access for every item that implements `ByteAccess`
impl<T: ByteAccess> WordAccess for T {
    // 6502 arranges integers in little-endian order. lower bytes first.
    // No zero page wraparound: a read at 0x00ff takes its high byte from 0x0100
    fn load_u16(&mut self, addr: u16) -> u16 {
        u16::from_le_bytes([self.load_u8(addr), self.load_u8(addr.wrapping_add(1))])
    }

    // the pointer never leaves page zero: a read at 0xff takes its high byte from 0x00
    fn load_u16_zp(&mut self, addr: u8) -> u16 {
        u16::from_le_bytes([
            self.load_u8(addr as u16),
            self.load_u8(addr.wrapping_add(1) as u16),
        ])
    }
}

/// The DataBus
/// data has to transfer between the accumulator and the internal registers of the microprocessor and outside sources by means of passing through
/// the microprocessor to 8 lines called the data bus.
/// I/o operations on this type of microprocessor are accomplished by reading and writing registers which
/// actually represent connections to physical devices. Neither the PPU nor the APU is emulated here, so both
/// register windows are plain latches: a read returns whatever was last written.
///
/// | range           | contents                                       |
/// |-----------------|------------------------------------------------|
/// | `$0000-$1FFF`   | 2KB work ram, mirrored 4x                      |
/// | `$2000-$3FFF`   | 8 PPU registers, mirrored every 8 bytes        |
/// | `$4000-$401F`   | APU and I/O registers                          |
/// | `$4020-$FFFF`   | cartridge space, handed to the mapper          |
pub struct DataBus {
    ram: Ram,
    ppu_regs: [u8; 8],
    io_regs: [u8; 0x20],
    cart: Box<dyn Mapper>,
}

impl Default for DataBus {
    fn default() -> Self {
        Self::new(Box::new(Nrom::default()))
    }
}

impl DataBus {
    pub fn new(cart: Box<dyn Mapper>) -> Self {
        Self {
            ram: Ram::new(),
            ppu_regs: [0u8; 8],
            io_regs: [0u8; 0x20],
            cart,
        }
    }
}

impl ByteAccess for DataBus {
    fn load_u8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1fff => self.ram.load_u8(addr),
            0x2000..=0x3fff => self.ppu_regs[(addr & 0x7) as usize],
            0x4000..=0x401f => self.io_regs[(addr - 0x4000) as usize],
            0x4020..=0xffff => self.cart.load_prg_u8(addr),
        }
    }

    fn store_u8(&mut self, addr: u16, v: u8) {
        match addr {
            0x0000..=0x1fff => self.ram.store_u8(addr, v),
            0x2000..=0x3fff => self.ppu_regs[(addr & 0x7) as usize] = v,
            0x4000..=0x401f => self.io_regs[(addr - 0x4000) as usize] = v,
            0x4020..=0xffff => self.cart.store_prg_u8(addr, v),
        }
    }
}

/// A bare 64KB array with no mirroring, so tests can place bytes anywhere, vectors included.
#[cfg(test)]
pub(crate) struct FlatBus {
    pub(crate) mem: Vec<u8>,
}

#[cfg(test)]
impl FlatBus {
    pub(crate) fn new() -> Self {
        Self {
            mem: vec![0u8; 0x10000],
        }
    }

    pub(crate) fn with_program(at: u16, prog: &[u8]) -> Self {
        let mut bus = Self::new();
        let start = at as usize;
        bus.mem[start..start + prog.len()].copy_from_slice(prog);
        bus
    }
}

#[cfg(test)]
impl ByteAccess for FlatBus {
    fn load_u8(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn store_u8(&mut self, addr: u16, v: u8) {
        self.mem[addr as usize] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_ram_is_mirrored_four_times() {
        let mut bus = DataBus::default();
        bus.store_u8(0x0002, 0x42);
        for base in [0x0000u16, 0x0800, 0x1000, 0x1800] {
            assert_eq!(bus.load_u8(base + 2), 0x42);
        }
        bus.store_u8(0x1fff, 0x99);
        assert_eq!(bus.load_u8(0x07ff), 0x99);
    }

    #[test]
    fn ppu_window_repeats_every_eight_bytes() {
        let mut bus = DataBus::default();
        bus.store_u8(0x2003, 0x11);
        assert_eq!(bus.load_u8(0x200b), 0x11);
        assert_eq!(bus.load_u8(0x3ffb), 0x11);
        assert_eq!(bus.load_u8(0x2004), 0x00);
    }

    #[test]
    fn io_window_is_not_mirrored() {
        let mut bus = DataBus::default();
        bus.store_u8(0x4000, 0x01);
        bus.store_u8(0x401f, 0x1f);
        assert_eq!(bus.load_u8(0x4000), 0x01);
        assert_eq!(bus.load_u8(0x401f), 0x1f);
        // 0x4020 is already cartridge space
        assert_eq!(bus.load_u8(0x4020), 0x00);
    }

    #[test]
    fn word_reads_cross_pages_but_zero_page_reads_wrap() {
        let mut bus = FlatBus::new();
        bus.mem[0x00ff] = 0x34;
        bus.mem[0x0100] = 0x12;
        bus.mem[0x0000] = 0x56;
        assert_eq!(bus.load_u16(0x00ff), 0x1234);
        assert_eq!(bus.load_u16_zp(0xff), 0x5634);
    }
}

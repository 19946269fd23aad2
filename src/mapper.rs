use crate::macros::impl_deref_mut;
use crate::rom::{Rom, PRG_BANK_SIZE};

/// A mapper decodes the cartridge half of the address space ($4020-$FFFF).
pub trait Mapper {
    fn load_prg_u8(&mut self, addr: u16) -> u8;
    fn store_prg_u8(&mut self, addr: u16, v: u8);
}

const CART_RAM_START: u16 = 0x4020;
const PRG_START: u16 = 0xc000;

/// A single fixed 16KB PRG bank at $C000-$FFFF.
/// Everything below the bank, from $4020 up to $BFFF, behaves as writable cartridge memory
/// (expansion area, SRAM and the unmapped lower bank).
pub struct Nrom {
    prg: PrgBank,
    ram: Vec<u8>,
}

struct PrgBank {
    v: Vec<u8>,
}

impl_deref_mut!(PrgBank {v, Vec<u8>});

impl Default for Nrom {
    /// an all-zero bank; handy when a test only needs ram and registers
    fn default() -> Self {
        Self::from_bank(vec![0u8; PRG_BANK_SIZE])
    }
}

impl Nrom {
    pub fn new(rom: &Rom) -> Self {
        Self::from_bank(rom.prg_bank().to_vec())
    }

    fn from_bank(bank: Vec<u8>) -> Self {
        debug_assert_eq!(bank.len(), PRG_BANK_SIZE);
        log::debug!("mapped {} byte PRG bank at ${:04X}", bank.len(), PRG_START);
        Self {
            prg: PrgBank { v: bank },
            ram: vec![0u8; (PRG_START - CART_RAM_START) as usize],
        }
    }
}

impl Mapper for Nrom {
    fn load_prg_u8(&mut self, addr: u16) -> u8 {
        match addr {
            PRG_START..=0xffff => self.prg[(addr - PRG_START) as usize],
            CART_RAM_START..=0xbfff => self.ram[(addr - CART_RAM_START) as usize],
            a => {
                log::warn!("cartridge read below cartridge space: ${:04X}", a);
                0
            }
        }
    }

    fn store_prg_u8(&mut self, addr: u16, v: u8) {
        match addr {
            PRG_START..=0xffff => {
                log::warn!("dropped write of ${:02X} into PRG-ROM at ${:04X}", v, addr)
            }
            CART_RAM_START..=0xbfff => self.ram[(addr - CART_RAM_START) as usize] = v,
            a => log::warn!("cartridge write below cartridge space: ${:04X}", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_sits_at_c000_and_is_read_only() {
        let mut bank = vec![0u8; PRG_BANK_SIZE];
        bank[0] = 0x4c;
        bank[PRG_BANK_SIZE - 1] = 0xc1;
        let mut nrom = Nrom::from_bank(bank);
        assert_eq!(nrom.load_prg_u8(0xc000), 0x4c);
        assert_eq!(nrom.load_prg_u8(0xffff), 0xc1);
        nrom.store_prg_u8(0xc000, 0x00);
        assert_eq!(nrom.load_prg_u8(0xc000), 0x4c);
    }

    #[test]
    fn lower_cartridge_space_is_writable() {
        let mut nrom = Nrom::default();
        nrom.store_prg_u8(0x6000, 0x12);
        nrom.store_prg_u8(0x4020, 0x34);
        nrom.store_prg_u8(0xbfff, 0x56);
        assert_eq!(nrom.load_prg_u8(0x6000), 0x12);
        assert_eq!(nrom.load_prg_u8(0x4020), 0x34);
        assert_eq!(nrom.load_prg_u8(0xbfff), 0x56);
    }
}

//https://www.nesdev.org/wiki/CPU_memory_map
use crate::{bus::ByteAccess, macros::impl_deref_mut};

const RAM_SIZE: usize = 0x800;

/// the 2KB of internal work ram. The zero page and the stack page both live here.
#[derive(Debug)]
pub struct Ram {
    array: [u8; RAM_SIZE],
}

impl_deref_mut!(Ram {array, [u8]});

impl Ram {
    pub(crate) fn new() -> Self {
        Self {
            array: [0u8; RAM_SIZE],
        }
    }
}

impl ByteAccess for Ram {
    // first 8192 bytes are for the ram. the ram is 2048 consecutive bytes mirrored three other times, consecutively
    fn load_u8(&mut self, addr: u16) -> u8 {
        self[(addr & 0x7ff) as usize]
    }

    fn store_u8(&mut self, addr: u16, val: u8) {
        self[(addr & 0x7ff) as usize] = val;
    }
}

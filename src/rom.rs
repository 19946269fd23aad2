use crate::common::Common;
use bitflags::bitflags;
use nom::{
    bytes::complete::{tag, take},
    combinator::cond,
    number::complete::be_u8,
    IResult,
};
use std::{error, fmt, fs::File, io, path::Path};

pub const HEADER_SIZE: usize = 16;
pub const PRG_BANK_SIZE: usize = 0x4000;
const TRAINER_SIZE: usize = 512;
const MAGIC: &[u8] = b"NES\x1a";

// flag_6
// 76543210
// ||||||||
// |||||||+- Mirroring: 0: horizontal (vertical arrangement) (CIRAM A10 = PPU A11)
// |||||||              1: vertical (horizontal arrangement) (CIRAM A10 = PPU A10)
// ||||||+-- 1: Cartridge contains battery-backed PRG RAM ($6000-7FFF) or other persistent memory
// |||||+--- 1: 512-byte trainer at $7000-$71FF (stored before PRG data)
// ||||+---- 1: Ignore mirroring control or above mirroring bit; instead provide four-screen VRAM
// ++++----- Lower nybble of mapper number
bitflags! {
    pub struct Flags6: u8 {
        const V_MIRRORING           = 0b00000001;
        const BATTERY_BACKED_RAM    = 0b00000010;
        const TRAINER_EXISTS        = 0b00000100;
        const FOUR_SCREEN           = 0b00001000;
    }
}

/// https://www.nesdev.org/wiki/INES
#[derive(Debug)]
pub struct Hdr {
    pub prg_banks: u8, // Size of PRG ROM in 16 KB units
    pub chr_banks: u8, // Size of CHR ROM in 8 KB units (Value 0 means the board uses CHR RAM)
    pub flags_6: Flags6,
    pub mapper: u8,
}

/// An iNES image reduced to what the CPU can see: one fixed 16KB PRG bank.
#[derive(Debug)]
pub struct Rom {
    hdr: Hdr,
    prg_bank: Vec<u8>,
}

#[derive(Debug)]
pub enum RomError {
    Open { path: String, source: io::Error },
    Alloc { size: usize },
    ShortRead { path: String, source: io::Error },
    TooSmall { size: usize },
    BadHeader(String),
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::Open { path, source } => {
                write!(f, "could not load file {}: {}", path, source)
            }
            RomError::Alloc { size } => write!(f, "could not allocate {} bytes for the rom", size),
            RomError::ShortRead { path, source } => {
                write!(f, "file read error on {}: {}", path, source)
            }
            RomError::TooSmall { size } => write!(
                f,
                "rom is {} bytes, need at least {} (header plus one PRG bank)",
                size,
                HEADER_SIZE + PRG_BANK_SIZE
            ),
            RomError::BadHeader(why) => write!(f, "bad iNES header: {}", why),
        }
    }
}

impl error::Error for RomError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            RomError::Open { source, .. } | RomError::ShortRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Rom {
    /// reads a whole rom file and parses it. Each way of failing gets its own error so the caller can tell them apart.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Rom, RomError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let open_err = |source| RomError::Open {
            path: name.clone(),
            source,
        };

        let f = File::open(path).map_err(open_err)?;
        let size = f.metadata().map_err(open_err)?.len() as usize;

        let mut buf = Vec::new();
        buf.try_reserve_exact(size)
            .map_err(|_| RomError::Alloc { size })?;
        buf.resize(size, 0);
        Common::read_full(&mut buf, f).map_err(|source| RomError::ShortRead {
            path: name.clone(),
            source,
        })?;

        Rom::parse(&buf)
    }

    pub fn parse(bytes: &[u8]) -> Result<Rom, RomError> {
        if bytes.len() < HEADER_SIZE + PRG_BANK_SIZE {
            return Err(RomError::TooSmall { size: bytes.len() });
        }

        let (body, hdr) = match Rom::load_hdr(bytes) {
            Ok(parsed) => parsed,
            Err(_) => return Err(RomError::BadHeader("expected NES\\x1A magic".into())),
        };
        if hdr.prg_banks == 0 {
            return Err(RomError::BadHeader("header declares no PRG-ROM".into()));
        }
        if hdr.prg_banks > 1 {
            log::warn!(
                "rom has {} PRG banks; only the first is mapped",
                hdr.prg_banks
            );
        }
        if hdr.mapper != 0 {
            log::warn!("mapper {} is treated as a single fixed bank", hdr.mapper);
        }

        let prg = match Rom::load_body(&hdr, body) {
            Ok((_, prg)) => prg,
            Err(_) => return Err(RomError::TooSmall { size: bytes.len() }),
        };

        Ok(Rom {
            hdr,
            prg_bank: prg.to_vec(),
        })
    }

    fn load_hdr(input: &[u8]) -> IResult<&[u8], Hdr> {
        // first four bytes: "NES\x1a"
        let (input, _) = tag(MAGIC)(input)?;
        let (input, prg_banks) = be_u8(input)?; // 4th
        let (input, chr_banks) = be_u8(input)?; // 5th
        let (input, flag_6) = be_u8(input)?; // 6th
        let (input, flag_7) = be_u8(input)?; // 7th
        // bytes 8..16 carry ram size, tv system and padding, none of which the cpu cares about
        let (input, _) = take(8usize)(input)?;

        // lower nibble of byte6 and higher nibble of byte7
        let mapper = (flag_6 >> 4) | (flag_7 & 0b11110000);

        Ok((
            input,
            Hdr {
                prg_banks,
                chr_banks,
                flags_6: Flags6::from_bits_truncate(flag_6),
                mapper,
            },
        ))
    }

    fn load_body<'a>(hdr: &Hdr, input: &'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
        let (input, _trainer) = cond(
            hdr.flags_6.contains(Flags6::TRAINER_EXISTS),
            take(TRAINER_SIZE),
        )(input)?;
        take(PRG_BANK_SIZE)(input)
    }

    pub fn hdr(&self) -> &Hdr {
        &self.hdr
    }

    pub fn prg_bank(&self) -> &[u8] {
        &self.prg_bank
    }
}

//! A 6502 core as found in the NES 2A03, with the documented and undocumented instruction sets,
//! the NES CPU address map and enough iNES support to boot a single 16KB PRG bank.
//!
//! ```no_run
//! use nes_cpu::{nes::Nes, rom::Rom, six502::Config};
//!
//! let rom = Rom::open("nestest.nes")?;
//! let mut nes = Nes::new(&rom, Config::default());
//! nes.run(Some(8991), Some(&mut std::io::stdout()))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bus;
mod common;
mod macros;
pub mod mapper;
pub mod nes;
pub mod rom;
pub mod six502;

pub use nes::{Nes, RunState};
pub use six502::{Config, CpuError, Entry, Outcome, Six502};

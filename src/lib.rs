#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate lazy_static;

pub mod bit;
pub mod bus;
pub mod cpu;
pub mod opcodes;
pub mod ppu;
pub mod rom;
pub mod status;

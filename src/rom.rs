use crate::bit::{check_bit, Bit};
use crate::ppu::Mirroring;
use std::fs;
use std::path::Path;
use thiserror::Error;

// N,E,S,EOL
const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
const HEADER_SIZE: usize = 16;
pub const PRG_ROM_PAGE_SIZE: usize = 16 * 1024;
pub const CHR_ROM_PAGE_SIZE: usize = 8 * 1024;
const TRAINER_SIZE: usize = 512;

/*

0-3: Constant $4E $45 $53 $1A ("NES" followed by MS-DOS end-of-file)
4: Size of PRG ROM in 16 KB units
5: Size of CHR ROM in 8 KB units (Value 0 means the board uses CHR RAM)
6: Flags 6 - Mapper, mirroring, battery, trainer
7: Flags 7 - Mapper, VS/Playchoice, NES 2.0
8-10: PRG-RAM size, TV system (ignored)
11-15: Unused padding (should be filled with zero, but some rippers put their name across bytes 7-15)

*/

#[derive(Debug, Error)]
pub enum RomError {
  #[error("could not read rom: {0}")]
  Io(#[from] std::io::Error),
  #[error("not an iNES file")]
  BadMagic,
  #[error("rom is truncated: expected {expected} bytes, found {actual}")]
  Truncated { expected: usize, actual: usize },
  #[error("mapper {0} is not supported")]
  UnsupportedMapper(u8),
}

#[derive(Debug, Default)]
pub struct Rom {
  pub prg_rom: Vec<u8>,
  pub chr_rom: Vec<u8>,
  pub mirroring: Mirroring,
  pub mapper: u8,
}

impl Rom {
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
    let data = fs::read(path)?;
    Self::new(&data)
  }

  pub fn new(data: &[u8]) -> Result<Self, RomError> {
    if data.len() < HEADER_SIZE {
      return Err(RomError::Truncated {
        expected: HEADER_SIZE,
        actual: data.len(),
      });
    }

    if data[0..4] != MAGIC {
      return Err(RomError::BadMagic);
    }

    let rom_control_1 = data[6];
    let rom_control_2 = data[7];

    let vertical_mirroring = check_bit(rom_control_1, Bit::Zero);
    let has_trainer = check_bit(rom_control_1, Bit::Two);
    let four_screen_mirroring = check_bit(rom_control_1, Bit::Three);

    let mirroring = match (four_screen_mirroring, vertical_mirroring) {
      (true, _) => Mirroring::FourScreen,
      (false, true) => Mirroring::Vertical,
      (false, false) => Mirroring::Horizontal,
    };

    let mapper = (rom_control_2 & 0b1111_0000) | (rom_control_1 >> 4);
    if mapper != 0 {
      return Err(RomError::UnsupportedMapper(mapper));
    }

    if data[11..HEADER_SIZE].iter().any(|&b| b != 0) {
      log::warn!("iNES header padding is not zeroed");
    }

    let prg_rom_len = data[4] as usize * PRG_ROM_PAGE_SIZE;
    let chr_rom_len = data[5] as usize * CHR_ROM_PAGE_SIZE;

    let prg_rom_start = HEADER_SIZE + if has_trainer { TRAINER_SIZE } else { 0 };
    let chr_rom_start = prg_rom_start + prg_rom_len;
    let end = chr_rom_start + chr_rom_len;

    if data.len() < end {
      return Err(RomError::Truncated {
        expected: end,
        actual: data.len(),
      });
    }

    let prg_rom = data[prg_rom_start..chr_rom_start].to_vec();
    let chr_rom = data[chr_rom_start..end].to_vec();

    log::info!(
      "loaded cartridge: {} KiB PRG, {} KiB CHR, mapper {}, {:?} mirroring",
      prg_rom.len() / 1024,
      chr_rom.len() / 1024,
      mapper,
      mirroring
    );

    Ok(Rom {
      prg_rom,
      chr_rom,
      mirroring,
      mapper,
    })
  }

  /// Read a byte of program ROM. Offsets past the end read as 0.
  pub fn read_prg(&self, offset: u16) -> u8 {
    self.prg_rom.get(offset as usize).copied().unwrap_or(0)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn ines(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.extend_from_slice(&[prg_banks, chr_banks, flags6, flags7]);
    data.extend_from_slice(&[0; 8]);
    if check_bit(flags6, Bit::Two) {
      data.extend(std::iter::repeat(0xff).take(TRAINER_SIZE));
    }
    for i in 0..prg_banks as usize * PRG_ROM_PAGE_SIZE {
      data.push(i as u8);
    }
    data.extend(std::iter::repeat(0xcc).take(chr_banks as usize * CHR_ROM_PAGE_SIZE));
    data
  }

  #[test]
  fn it_loads_an_nrom_image() {
    let rom = Rom::new(&ines(1, 1, 0b0000_0001, 0)).unwrap();

    assert_eq!(PRG_ROM_PAGE_SIZE, rom.prg_rom.len());
    assert_eq!(CHR_ROM_PAGE_SIZE, rom.chr_rom.len());
    assert_eq!(Mirroring::Vertical, rom.mirroring);
    assert_eq!(0, rom.mapper);
    assert_eq!(0x02, rom.read_prg(2));
  }

  #[test]
  fn it_skips_the_trainer() {
    let rom = Rom::new(&ines(2, 0, 0b0000_1100, 0)).unwrap();

    assert_eq!(Mirroring::FourScreen, rom.mirroring);
    assert_eq!(0x00, rom.read_prg(0));
    assert_eq!(0x01, rom.read_prg(1));
    assert!(rom.chr_rom.is_empty());
  }

  #[test]
  fn it_rejects_a_bad_magic() {
    let mut data = ines(1, 0, 0, 0);
    data[3] = 0x00;

    assert!(matches!(Rom::new(&data), Err(RomError::BadMagic)));
  }

  #[test]
  fn it_rejects_a_short_header() {
    let res = Rom::new(&MAGIC);
    assert!(matches!(
      res,
      Err(RomError::Truncated {
        expected: 16,
        actual: 4
      })
    ));
  }

  #[test]
  fn it_rejects_truncated_prg_data() {
    let mut data = ines(2, 0, 0, 0);
    data.truncate(HEADER_SIZE + PRG_ROM_PAGE_SIZE);

    assert!(matches!(Rom::new(&data), Err(RomError::Truncated { .. })));
  }

  #[test]
  fn it_combines_both_mapper_nibbles() {
    let res = Rom::new(&ines(1, 0, 0x40, 0x10));
    assert!(matches!(res, Err(RomError::UnsupportedMapper(0x14))));
  }

  #[test]
  fn it_reads_zero_past_the_end_of_prg() {
    let rom = Rom::default();
    assert_eq!(0, rom.read_prg(0x1234));
  }

  #[test]
  fn it_reports_a_missing_file() {
    let res = Rom::load_from_file("./does/not/exist.nes");
    assert!(matches!(res, Err(RomError::Io(_))));
  }
}

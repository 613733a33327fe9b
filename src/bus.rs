use crate::bit::{make_u16, split_u16};
use crate::ppu::Ppu;
use crate::rom::{Rom, PRG_ROM_PAGE_SIZE};

const RAM_SIZE: usize = 0x0800;
const RAM_MASK: u16 = 0x07ff;
const PPU_REGISTER_MASK: u16 = 0x0007;
const PRG_ROM_START: u16 = 0x8000;

pub trait Bus {
  fn read(&mut self, addr: u16) -> u8;

  fn read_u16(&mut self, addr: u16) -> u16 {
    let lo = self.read(addr);
    let hi = self.read(addr.wrapping_add(1));
    make_u16(lo, hi)
  }

  fn write(&mut self, addr: u16, val: u8);

  fn write_u16(&mut self, addr: u16, val: u16) {
    let (lo, hi) = split_u16(val);
    self.write(addr, lo);
    self.write(addr.wrapping_add(1), hi);
  }
}

/// A flat 64 KiB address space with no mirroring, for raw 6502 binaries.
impl Bus for Vec<u8> {
  fn read(&mut self, addr: u16) -> u8 {
    self.get(addr as usize).copied().unwrap_or(0)
  }

  fn write(&mut self, addr: u16, val: u8) {
    if let Some(byte) = self.get_mut(addr as usize) {
      *byte = val;
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
  Ram,
  PpuRegisters,
  Unmapped,
  PrgRom,
}

#[derive(Debug)]
pub struct Region {
  pub start: u16,
  pub end: u16,
  pub device: Device,
}

/// The CPU memory map, in address order. Together the regions cover every
/// address exactly once.
pub static MEMORY_MAP: [Region; 4] = [
  Region {
    start: 0x0000,
    end: 0x1fff,
    device: Device::Ram,
  },
  Region {
    start: 0x2000,
    end: 0x3fff,
    device: Device::PpuRegisters,
  },
  Region {
    start: 0x4000,
    end: 0x7fff,
    device: Device::Unmapped,
  },
  Region {
    start: PRG_ROM_START,
    end: 0xffff,
    device: Device::PrgRom,
  },
];

pub fn decode(addr: u16) -> Device {
  MEMORY_MAP
    .iter()
    .find(|region| region.start <= addr && addr <= region.end)
    .map(|region| region.device)
    .unwrap_or(Device::Unmapped)
}

/// The NES CPU bus: 2 KiB of RAM, the PPU registers and an NROM cartridge.
pub struct DataBus {
  ram: [u8; RAM_SIZE],
  pub ppu: Ppu,
  rom: Rom,
}

impl DataBus {
  pub fn new(rom: Rom) -> Self {
    Self {
      ram: [0; RAM_SIZE],
      ppu: Ppu::new(),
      rom,
    }
  }

  pub fn rom(&self) -> &Rom {
    &self.rom
  }

  fn prg_offset(&self, addr: u16) -> u16 {
    let offset = addr - PRG_ROM_START;
    // a single 16 KiB bank shows up at both $8000 and $C000
    if self.rom.prg_rom.len() == PRG_ROM_PAGE_SIZE {
      offset % PRG_ROM_PAGE_SIZE as u16
    } else {
      offset
    }
  }
}

impl Bus for DataBus {
  fn read(&mut self, addr: u16) -> u8 {
    match decode(addr) {
      Device::Ram => self.ram[(addr & RAM_MASK) as usize],
      Device::PpuRegisters => self.ppu.read_register((addr & PPU_REGISTER_MASK) as u8),
      Device::PrgRom => self.rom.read_prg(self.prg_offset(addr)),
      Device::Unmapped => 0,
    }
  }

  fn write(&mut self, addr: u16, val: u8) {
    match decode(addr) {
      Device::Ram => self.ram[(addr & RAM_MASK) as usize] = val,
      Device::PpuRegisters => self
        .ppu
        .write_register((addr & PPU_REGISTER_MASK) as u8, val),
      device => log::trace!(
        "dropped write of {:02X} to {:04X} ({:?})",
        val,
        addr,
        device
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ppu::PpuStatus;

  fn bus_with_prg(prg_rom: Vec<u8>) -> DataBus {
    DataBus::new(Rom {
      prg_rom,
      ..Default::default()
    })
  }

  fn numbered_prg(len: usize) -> Vec<u8> {
    // distinct byte per 1 KiB so mirrored banks are easy to spot
    (0..len).map(|i| (i / 1024) as u8 ^ i as u8).collect()
  }

  #[test]
  fn it_decodes_every_region() {
    assert_eq!(Device::Ram, decode(0x0000));
    assert_eq!(Device::Ram, decode(0x1fff));
    assert_eq!(Device::PpuRegisters, decode(0x2000));
    assert_eq!(Device::PpuRegisters, decode(0x3fff));
    assert_eq!(Device::Unmapped, decode(0x4000));
    assert_eq!(Device::Unmapped, decode(0x7fff));
    assert_eq!(Device::PrgRom, decode(0x8000));
    assert_eq!(Device::PrgRom, decode(0xffff));
  }

  #[test]
  fn it_has_no_gaps_in_the_memory_map() {
    assert_eq!(0x0000, MEMORY_MAP[0].start);
    assert_eq!(0xffff, MEMORY_MAP[MEMORY_MAP.len() - 1].end);
    for pair in MEMORY_MAP.windows(2) {
      assert_eq!(pair[0].end + 1, pair[1].start);
    }
  }

  #[test]
  fn it_mirrors_ram() {
    let mut bus = bus_with_prg(vec![]);

    for addr in (0x0000..=0x1fffu16).step_by(7) {
      let val = (addr >> 3) as u8 ^ 0x5a;
      bus.write(addr, val);
      for mirror in 0..4u16 {
        let alias = (addr & RAM_MASK) + mirror * 0x0800;
        assert_eq!(val, bus.read(alias), "{:04X} via {:04X}", addr, alias);
      }
    }
  }

  #[test]
  fn it_mirrors_ppu_registers() {
    let mut bus = bus_with_prg(vec![]);
    bus.write(0x2000, 0x91);

    for addr in (0x2000..=0x3fffu16).step_by(8) {
      assert_eq!(0x91, bus.read(addr));
    }

    bus.write(0x3ff9, 0x06);
    assert_eq!(0x06, bus.read(0x2001));
  }

  #[test]
  fn it_clears_vblank_through_a_mirror() {
    let mut bus = bus_with_prg(vec![]);
    bus.ppu.set_vblank(true);

    assert_eq!(0x80, bus.read(0x3ffa));
    assert_eq!(0x00, bus.read(0x2002));
    assert!(!bus.ppu.status().contains(PpuStatus::VBLANK_STARTED));
  }

  #[test]
  fn it_mirrors_a_single_prg_bank() {
    let mut bus = bus_with_prg(numbered_prg(PRG_ROM_PAGE_SIZE));

    assert_eq!(bus.read(0x8000), bus.read(0xc000));
    for addr in (0x8000..=0xbfffu16).step_by(13) {
      assert_eq!(bus.read(addr), bus.read(addr + 0x4000));
    }
  }

  #[test]
  fn it_maps_two_prg_banks_linearly() {
    let prg = numbered_prg(2 * PRG_ROM_PAGE_SIZE);
    let mut bus = bus_with_prg(prg.clone());

    assert_eq!(prg[0], bus.read(0x8000));
    assert_eq!(prg[0x4000], bus.read(0xc000));
    assert_eq!(prg[0x7fff], bus.read(0xffff));
    assert_ne!(bus.read(0x8000), bus.read(0xc000));
  }

  #[test]
  fn it_drops_writes_to_rom() {
    let mut bus = bus_with_prg(numbered_prg(PRG_ROM_PAGE_SIZE));
    let before = bus.read(0x8123);
    bus.write(0x8123, before.wrapping_add(1));

    assert_eq!(before, bus.read(0x8123));
  }

  #[test]
  fn it_reads_zero_from_unmapped_space() {
    let mut bus = bus_with_prg(vec![]);
    bus.write(0x4016, 0xff);
    bus.write(0x6000, 0xff);

    assert_eq!(0, bus.read(0x4016));
    assert_eq!(0, bus.read(0x6000));
    // no cartridge data at all
    assert_eq!(0, bus.read(0xfffc));
  }

  #[test]
  fn it_reads_words_little_endian() {
    let mut mem = vec![0u8; 0x10000];
    mem.write_u16(0x0200, 0xbeef);

    assert_eq!(0xef, mem[0x0200]);
    assert_eq!(0xbe, mem[0x0201]);
    assert_eq!(0xbeef, mem.read_u16(0x0200));
  }

  #[test]
  fn it_wraps_word_reads_at_the_top_of_memory() {
    let mut mem = vec![0u8; 0x10000];
    mem[0xffff] = 0x34;
    mem[0x0000] = 0x12;

    assert_eq!(0x1234, mem.read_u16(0xffff));
  }

  #[test]
  fn it_ignores_accesses_past_a_short_flat_memory() {
    let mut mem = vec![0u8; 0x100];
    mem.write(0x1000, 0xaa);

    assert_eq!(0x100, mem.len());
    assert_eq!(0, mem.read(0x1000));
  }
}

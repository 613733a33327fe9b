use crate::bit::Bit;

pub const PPUCTRL: u8 = 0;
pub const PPUMASK: u8 = 1;
pub const PPUSTATUS: u8 = 2;
pub const OAMADDR: u8 = 3;
pub const OAMDATA: u8 = 4;
pub const PPUSCROLL: u8 = 5;
pub const PPUADDR: u8 = 6;
pub const PPUDATA: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mirroring {
  Horizontal,
  Vertical,
  FourScreen,
}

impl Default for Mirroring {
  fn default() -> Self {
    Self::Horizontal
  }
}

bitflags! {
  #[derive(Default)]
  pub struct PpuStatus: u8 {
    const SPRITE_OVERFLOW = Bit::Five as u8;
    const SPRITE_ZERO_HIT = Bit::Six as u8;
    const VBLANK_STARTED = Bit::Seven as u8;
  }
}

/**
 * The CPU facing side of the picture processor: eight registers, mirrored
 * across $2000-$3FFF by the bus. Nothing is rendered, the registers only
 * latch what the program writes.
 */
#[derive(Debug, Default)]
pub struct Ppu {
  registers: [u8; 8],
  status: PpuStatus,
}

impl Ppu {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reset(&mut self) {
    self.registers[PPUCTRL as usize] = 0;
    self.registers[PPUMASK as usize] = 0;
    self.registers[OAMADDR as usize] = 0;
    self.status = PpuStatus::empty();
  }

  pub fn status(&self) -> PpuStatus {
    self.status
  }

  pub fn set_vblank(&mut self, val: bool) {
    self.status.set(PpuStatus::VBLANK_STARTED, val);
  }

  /// `reg` is the register number, 0..=7. Reading PPUSTATUS clears the
  /// vblank flag.
  pub fn read_register(&mut self, reg: u8) -> u8 {
    match reg & 0x07 {
      PPUSTATUS => {
        let data = self.status.bits() & 0xe0;
        self.status.remove(PpuStatus::VBLANK_STARTED);
        data
      }
      reg => self.registers[reg as usize],
    }
  }

  pub fn write_register(&mut self, reg: u8, val: u8) {
    match reg & 0x07 {
      // read only
      PPUSTATUS => {}
      reg => self.registers[reg as usize] = val,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_clears_vblank_when_status_is_read() {
    let mut ppu = Ppu::new();
    ppu.set_vblank(true);

    assert_eq!(0x80, ppu.read_register(PPUSTATUS));
    assert_eq!(0x00, ppu.read_register(PPUSTATUS));
    assert_eq!(0x00, ppu.read_register(PPUSTATUS));
  }

  #[test]
  fn it_only_clears_the_top_bit_of_status() {
    let mut ppu = Ppu::new();
    ppu.status = PpuStatus::all();

    assert_eq!(0xe0, ppu.read_register(PPUSTATUS));
    assert_eq!(0x60, ppu.read_register(PPUSTATUS));
  }

  #[test]
  fn it_latches_register_writes() {
    let mut ppu = Ppu::new();
    ppu.write_register(PPUCTRL, 0x90);
    ppu.write_register(PPUMASK, 0x1e);

    assert_eq!(0x90, ppu.read_register(PPUCTRL));
    assert_eq!(0x1e, ppu.read_register(PPUMASK));
  }

  #[test]
  fn it_ignores_writes_to_status() {
    let mut ppu = Ppu::new();
    ppu.write_register(PPUSTATUS, 0xff);

    assert_eq!(PpuStatus::empty(), ppu.status());
  }

  #[test]
  fn it_resets_the_control_registers() {
    let mut ppu = Ppu::new();
    ppu.write_register(PPUCTRL, 0x80);
    ppu.write_register(OAMADDR, 0x10);
    ppu.set_vblank(true);
    ppu.reset();

    assert_eq!(0, ppu.read_register(PPUCTRL));
    assert_eq!(0, ppu.read_register(OAMADDR));
    assert_eq!(PpuStatus::empty(), ppu.status());
  }
}

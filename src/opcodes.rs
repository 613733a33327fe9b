use crate::cpu::AddressMode::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
  ADC,
  AND,
  ASL,
  BCC,
  BCS,
  BEQ,
  BIT,
  BMI,
  BNE,
  BPL,
  BRK,
  BVC,
  BVS,
  CLC,
  CLD,
  CLI,
  CLV,
  CMP,
  CPX,
  CPY,
  DEC,
  DEX,
  DEY,
  EOR,
  INC,
  INX,
  INY,
  JMP,
  JSR,
  LDA,
  LDX,
  LDY,
  LSR,
  NOP,
  ORA,
  PHA,
  PHP,
  PLA,
  PLP,
  ROL,
  ROR,
  RTI,
  RTS,
  SBC,
  SEC,
  SED,
  SEI,
  STA,
  STX,
  STY,
  TAX,
  TAY,
  TSX,
  TXA,
  TXS,
  TYA,
  XXX, // sigil for bad opcode
}

use OpCode::*;

#[derive(Debug)]
pub struct OpInfo {
  pub id: u8,
  pub op: OpCode,
  pub len: u8,
  pub cycles: u8,
  pub mode: AddressMode,
}

impl OpInfo {
  pub fn new(id: u8, op: OpCode, len: u8, cycles: u8, mode: AddressMode) -> Self {
    Self {
      id,
      op,
      len,
      cycles,
      mode,
    }
  }
}

lazy_static! {
  pub static ref BAD_OPCODE: OpInfo = OpInfo::new(0x00, XXX, 1, 2, Implicit);
  pub static ref OPCODES: Vec<OpInfo> = vec![
    OpInfo::new(0x00, BRK, 1, 7, Implicit),
    OpInfo::new(0xea, NOP, 1, 2, Implicit),

    OpInfo::new(0xaa, TAX, 1, 2, Implicit),
    OpInfo::new(0x8a, TXA, 1, 2, Implicit),
    OpInfo::new(0xca, DEX, 1, 2, Implicit),
    OpInfo::new(0xe8, INX, 1, 2, Implicit),
    OpInfo::new(0xa8, TAY, 1, 2, Implicit),
    OpInfo::new(0x98, TYA, 1, 2, Implicit),
    OpInfo::new(0x88, DEY, 1, 2, Implicit),
    OpInfo::new(0xc8, INY, 1, 2, Implicit),
    OpInfo::new(0xba, TSX, 1, 2, Implicit),
    OpInfo::new(0x9a, TXS, 1, 2, Implicit),

    OpInfo::new(0x48, PHA, 1, 3, Implicit),
    OpInfo::new(0x08, PHP, 1, 3, Implicit),
    OpInfo::new(0x68, PLA, 1, 4, Implicit),
    OpInfo::new(0x28, PLP, 1, 4, Implicit),

    OpInfo::new(0x18, CLC, 1, 2, Implicit),
    OpInfo::new(0xd8, CLD, 1, 2, Implicit),
    OpInfo::new(0x58, CLI, 1, 2, Implicit),
    OpInfo::new(0xb8, CLV, 1, 2, Implicit),
    OpInfo::new(0x38, SEC, 1, 2, Implicit),
    OpInfo::new(0xf8, SED, 1, 2, Implicit),
    OpInfo::new(0x78, SEI, 1, 2, Implicit),

    OpInfo::new(0x69, ADC, 2, 2, Immediate),
    OpInfo::new(0x65, ADC, 2, 3, ZeroPage),
    OpInfo::new(0x75, ADC, 2, 4, ZeroPageX),
    OpInfo::new(0x6d, ADC, 3, 4, Absolute),
    OpInfo::new(0x7d, ADC, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0x79, ADC, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0x61, ADC, 2, 6, IndirectX),
    OpInfo::new(0x71, ADC, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0xe9, SBC, 2, 2, Immediate),
    OpInfo::new(0xe5, SBC, 2, 3, ZeroPage),
    OpInfo::new(0xf5, SBC, 2, 4, ZeroPageX),
    OpInfo::new(0xed, SBC, 3, 4, Absolute),
    OpInfo::new(0xfd, SBC, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0xf9, SBC, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0xe1, SBC, 2, 6, IndirectX),
    OpInfo::new(0xf1, SBC, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0x29, AND, 2, 2, Immediate),
    OpInfo::new(0x25, AND, 2, 3, ZeroPage),
    OpInfo::new(0x35, AND, 2, 4, ZeroPageX),
    OpInfo::new(0x2d, AND, 3, 4, Absolute),
    OpInfo::new(0x3d, AND, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0x39, AND, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0x21, AND, 2, 6, IndirectX),
    OpInfo::new(0x31, AND, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0x49, EOR, 2, 2, Immediate),
    OpInfo::new(0x45, EOR, 2, 3, ZeroPage),
    OpInfo::new(0x55, EOR, 2, 4, ZeroPageX),
    OpInfo::new(0x4d, EOR, 3, 4, Absolute),
    OpInfo::new(0x5d, EOR, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0x59, EOR, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0x41, EOR, 2, 6, IndirectX),
    OpInfo::new(0x51, EOR, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0x09, ORA, 2, 2, Immediate),
    OpInfo::new(0x05, ORA, 2, 3, ZeroPage),
    OpInfo::new(0x15, ORA, 2, 4, ZeroPageX),
    OpInfo::new(0x0d, ORA, 3, 4, Absolute),
    OpInfo::new(0x1d, ORA, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0x19, ORA, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0x01, ORA, 2, 6, IndirectX),
    OpInfo::new(0x11, ORA, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0xc9, CMP, 2, 2, Immediate),
    OpInfo::new(0xc5, CMP, 2, 3, ZeroPage),
    OpInfo::new(0xd5, CMP, 2, 4, ZeroPageX),
    OpInfo::new(0xcd, CMP, 3, 4, Absolute),
    OpInfo::new(0xdd, CMP, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0xd9, CMP, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0xc1, CMP, 2, 6, IndirectX),
    OpInfo::new(0xd1, CMP, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0xe0, CPX, 2, 2, Immediate),
    OpInfo::new(0xe4, CPX, 2, 3, ZeroPage),
    OpInfo::new(0xec, CPX, 3, 4, Absolute),

    OpInfo::new(0xc0, CPY, 2, 2, Immediate),
    OpInfo::new(0xc4, CPY, 2, 3, ZeroPage),
    OpInfo::new(0xcc, CPY, 3, 4, Absolute),

    OpInfo::new(0x0a, ASL, 1, 2, Accumulator),
    OpInfo::new(0x06, ASL, 2, 5, ZeroPage),
    OpInfo::new(0x16, ASL, 2, 6, ZeroPageX),
    OpInfo::new(0x0e, ASL, 3, 6, Absolute),
    OpInfo::new(0x1e, ASL, 3, 7, AbsoluteX),

    OpInfo::new(0x4a, LSR, 1, 2, Accumulator),
    OpInfo::new(0x46, LSR, 2, 5, ZeroPage),
    OpInfo::new(0x56, LSR, 2, 6, ZeroPageX),
    OpInfo::new(0x4e, LSR, 3, 6, Absolute),
    OpInfo::new(0x5e, LSR, 3, 7, AbsoluteX),

    OpInfo::new(0x2a, ROL, 1, 2, Accumulator),
    OpInfo::new(0x26, ROL, 2, 5, ZeroPage),
    OpInfo::new(0x36, ROL, 2, 6, ZeroPageX),
    OpInfo::new(0x2e, ROL, 3, 6, Absolute),
    OpInfo::new(0x3e, ROL, 3, 7, AbsoluteX),

    OpInfo::new(0x6a, ROR, 1, 2, Accumulator),
    OpInfo::new(0x66, ROR, 2, 5, ZeroPage),
    OpInfo::new(0x76, ROR, 2, 6, ZeroPageX),
    OpInfo::new(0x6e, ROR, 3, 6, Absolute),
    OpInfo::new(0x7e, ROR, 3, 7, AbsoluteX),

    OpInfo::new(0xe6, INC, 2, 5, ZeroPage),
    OpInfo::new(0xf6, INC, 2, 6, ZeroPageX),
    OpInfo::new(0xee, INC, 3, 6, Absolute),
    OpInfo::new(0xfe, INC, 3, 7, AbsoluteX),

    OpInfo::new(0xc6, DEC, 2, 5, ZeroPage),
    OpInfo::new(0xd6, DEC, 2, 6, ZeroPageX),
    OpInfo::new(0xce, DEC, 3, 6, Absolute),
    OpInfo::new(0xde, DEC, 3, 7, AbsoluteX),

    OpInfo::new(0x24, BIT, 2, 3, ZeroPage),
    OpInfo::new(0x2c, BIT, 3, 4, Absolute),

    OpInfo::new(0x4c, JMP, 3, 3, Absolute),
    OpInfo::new(0x6c, JMP, 3, 5, Indirect),
    OpInfo::new(0x20, JSR, 3, 6, Absolute),
    OpInfo::new(0x60, RTS, 1, 6, Implicit),
    OpInfo::new(0x40, RTI, 1, 6, Implicit),

    /* + add 1 cycle if branch taken, 2 if to a new page */
    OpInfo::new(0x90, BCC, 2, 2, Relative),
    OpInfo::new(0xb0, BCS, 2, 2, Relative),
    OpInfo::new(0xf0, BEQ, 2, 2, Relative),
    OpInfo::new(0x30, BMI, 2, 2, Relative),
    OpInfo::new(0xd0, BNE, 2, 2, Relative),
    OpInfo::new(0x10, BPL, 2, 2, Relative),
    OpInfo::new(0x50, BVC, 2, 2, Relative),
    OpInfo::new(0x70, BVS, 2, 2, Relative),

    OpInfo::new(0x85, STA, 2, 3, ZeroPage),
    OpInfo::new(0x95, STA, 2, 4, ZeroPageX),
    OpInfo::new(0x8d, STA, 3, 4, Absolute),
    OpInfo::new(0x9d, STA, 3, 5, AbsoluteX),
    OpInfo::new(0x99, STA, 3, 5, AbsoluteY),
    OpInfo::new(0x81, STA, 2, 6, IndirectX),
    OpInfo::new(0x91, STA, 2, 6, IndirectY),

    OpInfo::new(0x86, STX, 2, 3, ZeroPage),
    OpInfo::new(0x96, STX, 2, 4, ZeroPageY),
    OpInfo::new(0x8e, STX, 3, 4, Absolute),

    OpInfo::new(0x84, STY, 2, 3, ZeroPage),
    OpInfo::new(0x94, STY, 2, 4, ZeroPageX),
    OpInfo::new(0x8c, STY, 3, 4, Absolute),

    OpInfo::new(0xa9, LDA, 2, 2, Immediate),
    OpInfo::new(0xa5, LDA, 2, 3, ZeroPage),
    OpInfo::new(0xb5, LDA, 2, 4, ZeroPageX),
    OpInfo::new(0xad, LDA, 3, 4, Absolute),
    OpInfo::new(0xbd, LDA, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
    OpInfo::new(0xb9, LDA, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),
    OpInfo::new(0xa1, LDA, 2, 6, IndirectX),
    OpInfo::new(0xb1, LDA, 2, 5/*+ add 1 cycle if page boundary crossed*/, IndirectY),

    OpInfo::new(0xa2, LDX, 2, 2, Immediate),
    OpInfo::new(0xa6, LDX, 2, 3, ZeroPage),
    OpInfo::new(0xb6, LDX, 2, 4, ZeroPageY),
    OpInfo::new(0xae, LDX, 3, 4, Absolute),
    OpInfo::new(0xbe, LDX, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteY),

    OpInfo::new(0xa0, LDY, 2, 2, Immediate),
    OpInfo::new(0xa4, LDY, 2, 3, ZeroPage),
    OpInfo::new(0xb4, LDY, 2, 4, ZeroPageX),
    OpInfo::new(0xac, LDY, 3, 4, Absolute),
    OpInfo::new(0xbc, LDY, 3, 4/*+ add 1 cycle if page boundary crossed*/, AbsoluteX),
  ];
  pub static ref OPCODES_MAP: [&'static OpInfo; 0x100] = {
    let mut map: [&'static OpInfo; 0x100] = [&BAD_OPCODE; 0x100];
    for op in &*OPCODES {
      map[op.id as usize] = op;
    }
    map
  };
}

/// Build the dispatch table now rather than on the first `step`. Calling
/// this more than once is harmless.
pub fn power_on_tables() {
  lazy_static::initialize(&OPCODES_MAP);
}

pub fn lookup(code: u8) -> &'static OpInfo {
  OPCODES_MAP[code as usize]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cpu::AddressMode::*;
  use std::collections::HashSet;

  #[test]
  fn it_knows_every_official_opcode() {
    assert_eq!(151, OPCODES.len());
  }

  #[test]
  fn it_has_no_duplicate_opcodes() {
    let ids: HashSet<u8> = OPCODES.iter().map(|op| op.id).collect();
    assert_eq!(OPCODES.len(), ids.len());
  }

  #[test]
  fn it_fills_the_gaps_with_bad_opcodes() {
    power_on_tables();
    power_on_tables();

    let bad = (0..=0xffu8).filter(|&code| lookup(code).op == XXX).count();
    assert_eq!(256 - 151, bad);

    let info = lookup(0x02);
    assert_eq!(XXX, info.op);
    assert_eq!(Implicit, info.mode);
    assert_eq!(1, info.len);
  }

  #[test]
  fn it_maps_each_code_to_its_own_entry() {
    for code in 0..=0xffu8 {
      let info = lookup(code);
      if info.op != XXX {
        assert_eq!(code, info.id);
      }
    }
  }

  #[test]
  fn it_sizes_instructions_by_address_mode() {
    for op in OPCODES.iter() {
      let expected = match op.mode {
        Implicit | Accumulator => 1,
        Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndirectX | IndirectY => 2,
        Absolute | AbsoluteX | AbsoluteY | Indirect => 3,
      };
      assert_eq!(expected, op.len, "{:02X} {:?}", op.id, op.op);
    }
  }

  #[test]
  fn it_uses_hardware_index_registers_for_ldx_and_ldy() {
    assert_eq!(ZeroPageY, lookup(0xb6).mode);
    assert_eq!(AbsoluteY, lookup(0xbe).mode);
    assert_eq!(ZeroPageX, lookup(0xb4).mode);
    assert_eq!(AbsoluteX, lookup(0xbc).mode);
  }
}

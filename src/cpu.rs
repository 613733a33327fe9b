use std::fmt;

use crate::bit::*;
use crate::bus::Bus;
use crate::opcodes::{self, OpCode};
use crate::status::Status;

const RESET_VEC: u16 = 0xfffc;
const IRQ_BRK_VEC: u16 = 0xfffe;

const STACK_PAGE: u16 = 0x0100;
const STACK_RESET: u8 = 0xfd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
  Implicit,
  Accumulator,
  Immediate,
  ZeroPage,
  ZeroPageX,
  ZeroPageY,
  Relative,
  Absolute,
  AbsoluteX,
  AbsoluteY,
  Indirect,
  IndirectX,
  IndirectY,
}

/// Where an instruction finds its data once the address mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
  None,
  Accumulator,
  Address(u16),
}

#[derive(Debug, Clone, Default)]
pub struct Cpu {
  /**
   * Program Counter
   *
   * The program counter is a 16 bit register which points to the next
   * instruction to be executed. It advances on every byte fetched, and is
   * overwritten by jumps, taken branches, subroutine calls and returns.
   */
  pub pc: u16,

  /**
   * Stack Pointer
   *
   * The processor supports a 256 byte stack located between $0100 and $01FF.
   * The stack pointer is an 8 bit register and holds the low 8 bits of the next
   * free location on the stack. The location of the stack is fixed and cannot
   * be moved.
   *
   * Pushing bytes to the stack causes the stack pointer to be decremented.
   * Conversely pulling bytes causes it to be incremented.
   *
   * The CPU does not detect if the stack is overflowed by excessive pushing or
   * pulling operations, the pointer simply wraps within the page.
   */
  pub s: u8,

  /** Accumulator, used by all arithmetic and logical operations. */
  pub a: u8,

  /**
   * Index Register X
   *
   * Most commonly holds counters or offsets for accessing memory. It is also
   * the only way to read or change the stack pointer (TSX / TXS).
   */
  pub x: u8,

  /** Index Register Y */
  pub y: u8,

  /** Processor Status */
  pub status: Status,

  /// Base cycles of every instruction executed since reset. Informational
  /// only, nothing is timed against it.
  pub cycles: u64,
}

impl Cpu {
  pub fn new() -> Cpu {
    Cpu::default()
  }

  pub fn reset<B: Bus>(&mut self, bus: &mut B) {
    self.a = 0;
    self.x = 0;
    self.y = 0;
    self.s = STACK_RESET;
    self.status = Status::power_up();
    self.pc = bus.read_u16(RESET_VEC);
    self.cycles = 0;
  }

  /// Fetch, decode and execute exactly one instruction.
  pub fn step<B: Bus>(&mut self, bus: &mut B) {
    let pc = self.pc;
    let code = self.fetch(bus);
    let info = opcodes::lookup(code);

    log::trace!(
      "{:04X}  {:02X}  {:?} {:<11} {} CYC:{}",
      pc,
      code,
      info.op,
      format!("{:?}", info.mode),
      self,
      self.cycles
    );

    if info.op == OpCode::XXX {
      log::debug!("undefined opcode {:02X} at {:04X}", code, pc);
    }

    let operand = self.operand(bus, info.mode);
    self.execute(bus, info.op, operand);
    self.cycles += info.cycles as u64;
  }

  fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
    let val = bus.read(self.pc);
    self.pc = self.pc.wrapping_add(1);
    val
  }

  fn fetch_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
    let lo = self.fetch(bus);
    let hi = self.fetch(bus);
    make_u16(lo, hi)
  }

  fn operand<B: Bus>(&mut self, bus: &mut B, mode: AddressMode) -> Operand {
    use AddressMode::*;

    let addr = match mode {
      Implicit => return Operand::None,
      Accumulator => return Operand::Accumulator,
      Immediate => {
        let addr = self.pc;
        self.pc = self.pc.wrapping_add(1);
        addr
      }
      ZeroPage => self.fetch(bus) as u16,
      ZeroPageX => self.fetch(bus).wrapping_add(self.x) as u16,
      ZeroPageY => self.fetch(bus).wrapping_add(self.y) as u16,
      Relative => {
        // sign extend the displacement
        let offset = self.fetch(bus) as i8;
        self.pc.wrapping_add(offset as u16)
      }
      Absolute => self.fetch_u16(bus),
      AbsoluteX => self.fetch_u16(bus).wrapping_add(self.x as u16),
      AbsoluteY => self.fetch_u16(bus).wrapping_add(self.y as u16),
      Indirect => {
        let ptr = self.fetch_u16(bus);
        // the high byte is read without carrying into the next page
        let hi_ptr = (ptr & 0xff00) | (ptr.wrapping_add(1) & 0x00ff);
        let lo = bus.read(ptr);
        let hi = bus.read(hi_ptr);
        make_u16(lo, hi)
      }
      IndirectX => {
        let ptr = self.fetch(bus).wrapping_add(self.x);
        Self::read_zero_page_u16(bus, ptr)
      }
      IndirectY => {
        let ptr = self.fetch(bus);
        Self::read_zero_page_u16(bus, ptr).wrapping_add(self.y as u16)
      }
    };

    Operand::Address(addr)
  }

  fn read_zero_page_u16<B: Bus>(bus: &mut B, ptr: u8) -> u16 {
    let lo = bus.read(ptr as u16);
    let hi = bus.read(ptr.wrapping_add(1) as u16);
    make_u16(lo, hi)
  }

  fn execute<B: Bus>(&mut self, bus: &mut B, op: OpCode, operand: Operand) {
    use OpCode::*;

    match op {
      LDA => self.lda(bus, operand),
      LDX => self.ldx(bus, operand),
      LDY => self.ldy(bus, operand),
      STA => self.store(bus, operand, self.a),
      STX => self.store(bus, operand, self.x),
      STY => self.store(bus, operand, self.y),

      TAX => self.tax(),
      TAY => self.tay(),
      TXA => self.txa(),
      TYA => self.tya(),
      TSX => self.tsx(),
      TXS => self.txs(),

      PHA => self.pha(bus),
      PHP => self.php(bus),
      PLA => self.pla(bus),
      PLP => self.plp(bus),

      AND => self.and(bus, operand),
      EOR => self.eor(bus, operand),
      ORA => self.ora(bus, operand),
      BIT => self.bit(bus, operand),

      ADC => self.adc(bus, operand),
      SBC => self.sbc(bus, operand),
      CMP => self.compare(bus, operand, self.a),
      CPX => self.compare(bus, operand, self.x),
      CPY => self.compare(bus, operand, self.y),

      INC => self.inc(bus, operand),
      DEC => self.dec(bus, operand),
      INX => self.inx(),
      INY => self.iny(),
      DEX => self.dex(),
      DEY => self.dey(),

      ASL => self.asl(bus, operand),
      LSR => self.lsr(bus, operand),
      ROL => self.rol(bus, operand),
      ROR => self.ror(bus, operand),

      JMP => self.jmp(operand),
      JSR => self.jsr(bus, operand),
      RTS => self.rts(bus),

      BCC => self.branch(operand, !self.status.contains(Status::CARRY)),
      BCS => self.branch(operand, self.status.contains(Status::CARRY)),
      BEQ => self.branch(operand, self.status.contains(Status::ZERO)),
      BMI => self.branch(operand, self.status.contains(Status::NEGATIVE)),
      BNE => self.branch(operand, !self.status.contains(Status::ZERO)),
      BPL => self.branch(operand, !self.status.contains(Status::NEGATIVE)),
      BVC => self.branch(operand, !self.status.contains(Status::OVERFLOW)),
      BVS => self.branch(operand, self.status.contains(Status::OVERFLOW)),

      CLC => self.status.remove(Status::CARRY),
      CLD => self.status.remove(Status::DECIMAL),
      CLI => self.status.remove(Status::INTERRUPT_DISABLE),
      CLV => self.status.remove(Status::OVERFLOW),
      SEC => self.status.insert(Status::CARRY),
      SED => self.status.insert(Status::DECIMAL),
      SEI => self.status.insert(Status::INTERRUPT_DISABLE),

      BRK => self.brk(bus),
      RTI => self.rti(bus),
      NOP | XXX => {}
    }
  }

  fn load<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
    match operand {
      Operand::Accumulator => self.a,
      Operand::Address(addr) => bus.read(addr),
      Operand::None => 0,
    }
  }

  fn store<B: Bus>(&mut self, bus: &mut B, operand: Operand, val: u8) {
    match operand {
      Operand::Accumulator => self.a = val,
      Operand::Address(addr) => bus.write(addr, val),
      Operand::None => {}
    }
  }

  fn push<B: Bus>(&mut self, bus: &mut B, val: u8) {
    bus.write(STACK_PAGE | self.s as u16, val);
    self.s = self.s.wrapping_sub(1);
  }

  fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
    self.s = self.s.wrapping_add(1);
    bus.read(STACK_PAGE | self.s as u16)
  }

  fn push_u16<B: Bus>(&mut self, bus: &mut B, val: u16) {
    let (lo, hi) = split_u16(val);
    self.push(bus, hi);
    self.push(bus, lo);
  }

  fn pull_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
    let lo = self.pull(bus);
    let hi = self.pull(bus);
    make_u16(lo, hi)
  }

  fn set_z_n_flags(&mut self, val: u8) {
    self.status.set(Status::ZERO, val == 0);
    self.status.set(Status::NEGATIVE, check_bit(val, Bit::Seven));
  }

  // Load / Store Operations

  fn lda<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    self.a = self.load(bus, operand);
    self.set_z_n_flags(self.a);
  }

  fn ldx<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    self.x = self.load(bus, operand);
    self.set_z_n_flags(self.x);
  }

  fn ldy<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    self.y = self.load(bus, operand);
    self.set_z_n_flags(self.y);
  }

  // Register Transfers

  fn tax(&mut self) {
    self.x = self.a;
    self.set_z_n_flags(self.x);
  }

  fn tay(&mut self) {
    self.y = self.a;
    self.set_z_n_flags(self.y);
  }

  fn txa(&mut self) {
    self.a = self.x;
    self.set_z_n_flags(self.a);
  }

  fn tya(&mut self) {
    self.a = self.y;
    self.set_z_n_flags(self.a);
  }

  // Stack Operations

  fn tsx(&mut self) {
    self.x = self.s;
    self.set_z_n_flags(self.x);
  }

  fn txs(&mut self) {
    self.s = self.x;
  }

  fn pha<B: Bus>(&mut self, bus: &mut B) {
    self.push(bus, self.a);
  }

  fn php<B: Bus>(&mut self, bus: &mut B) {
    self.push(bus, self.status.to_stack());
  }

  fn pla<B: Bus>(&mut self, bus: &mut B) {
    self.a = self.pull(bus);
    self.set_z_n_flags(self.a);
  }

  fn plp<B: Bus>(&mut self, bus: &mut B) {
    self.status = Status::from_stack(self.pull(bus));
  }

  // Logical

  fn and<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.a &= val;
    self.set_z_n_flags(self.a);
  }

  fn eor<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.a ^= val;
    self.set_z_n_flags(self.a);
  }

  fn ora<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.a |= val;
    self.set_z_n_flags(self.a);
  }

  fn bit<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let mem = self.load(bus, operand);
    self.status.set(Status::ZERO, self.a & mem == 0);
    self.status.set(Status::OVERFLOW, check_bit(mem, Bit::Six));
    self.status.set(Status::NEGATIVE, check_bit(mem, Bit::Seven));
  }

  // Arithmetic

  fn add_with_carry(&mut self, val: u8) {
    let carry = self.status.contains(Status::CARRY) as u16;
    let sum = self.a as u16 + val as u16 + carry;
    let result = sum as u8;

    self.status.set(Status::CARRY, sum > 0xff);
    // both inputs share a sign that the result doesn't
    self.status.set(
      Status::OVERFLOW,
      (self.a ^ result) & (val ^ result) & 0x80 != 0,
    );
    self.a = result;
    self.set_z_n_flags(self.a);
  }

  fn adc<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.add_with_carry(val);
  }

  /// A - M - (1 - C) is A + !M + C in two's complement, carry meaning
  /// "no borrow".
  fn sbc<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.add_with_carry(!val);
  }

  fn compare<B: Bus>(&mut self, bus: &mut B, operand: Operand, reg: u8) {
    let val = self.load(bus, operand);
    self.status.set(Status::CARRY, reg >= val);
    self.set_z_n_flags(reg.wrapping_sub(val));
  }

  // Increments & Decrements

  fn inc<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand).wrapping_add(1);
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  fn dec<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand).wrapping_sub(1);
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  fn inx(&mut self) {
    self.x = self.x.wrapping_add(1);
    self.set_z_n_flags(self.x)
  }

  fn iny(&mut self) {
    self.y = self.y.wrapping_add(1);
    self.set_z_n_flags(self.y)
  }

  fn dex(&mut self) {
    self.x = self.x.wrapping_sub(1);
    self.set_z_n_flags(self.x)
  }

  fn dey(&mut self) {
    self.y = self.y.wrapping_sub(1);
    self.set_z_n_flags(self.y)
  }

  // Shifts

  fn asl<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.status.set(Status::CARRY, check_bit(val, Bit::Seven));
    let val = val << 1;
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  fn lsr<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    self.status.set(Status::CARRY, check_bit(val, Bit::Zero));
    let val = val >> 1;
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  fn rol<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    let carry = self.status.contains(Status::CARRY) as u8;
    self.status.set(Status::CARRY, check_bit(val, Bit::Seven));
    let val = val << 1 | carry;
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  fn ror<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    let val = self.load(bus, operand);
    let carry = self.status.contains(Status::CARRY) as u8;
    self.status.set(Status::CARRY, check_bit(val, Bit::Zero));
    let val = val >> 1 | carry << 7;
    self.store(bus, operand, val);
    self.set_z_n_flags(val);
  }

  // Jumps & Calls

  fn jmp(&mut self, operand: Operand) {
    if let Operand::Address(addr) = operand {
      self.pc = addr;
    }
  }

  /// The pushed return address points at the last byte of the JSR, RTS
  /// makes up the difference.
  fn jsr<B: Bus>(&mut self, bus: &mut B, operand: Operand) {
    self.push_u16(bus, self.pc.wrapping_sub(1));
    self.jmp(operand);
  }

  fn rts<B: Bus>(&mut self, bus: &mut B) {
    self.pc = self.pull_u16(bus).wrapping_add(1);
  }

  // Branches

  /// The displacement byte was consumed while resolving the operand, so a
  /// branch not taken has nothing left to do.
  fn branch(&mut self, operand: Operand, cond: bool) {
    if cond {
      self.jmp(operand);
    }
  }

  // System Functions

  fn brk<B: Bus>(&mut self, bus: &mut B) {
    self.push_u16(bus, self.pc);
    self.push(bus, self.status.to_stack());
    self.status.insert(Status::INTERRUPT_DISABLE);
    self.pc = bus.read_u16(IRQ_BRK_VEC);
  }

  fn rti<B: Bus>(&mut self, bus: &mut B) {
    self.status = Status::from_stack(self.pull(bus));
    self.pc = self.pull_u16(bus);
  }
}

impl fmt::Display for Cpu {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
      self.a,
      self.x,
      self.y,
      self.status.bits(),
      self.s
    )
  }
}

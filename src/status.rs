use crate::bit::Bit;

bitflags! {
  /**
   * Processor Status
   *
   * One bit per condition left behind by the last operation that affects it.
   * Flags an instruction doesn't touch keep their previous value.
   */
  #[derive(Default)]
  pub struct Status: u8 {
    /**
     * Carry
     *
     * Set if the last operation caused an overflow from bit 7 of the result
     * or an underflow from bit 0. Set during arithmetic, comparison and
     * shifts, or explicitly with SEC / CLC.
     */
    const CARRY = Bit::Zero as u8;

    /** Set if the result of the last operation was zero. */
    const ZERO = Bit::One as u8;

    /**
     * Interrupt (IRQ disable)
     *
     * Set by SEI and by BRK, cleared by CLI.
     */
    const INTERRUPT_DISABLE = Bit::Two as u8;

    /**
     * Decimal
     *
     * Settable with SED / CLD. The NES variant of the processor has no BCD
     * unit, so arithmetic ignores it.
     */
    const DECIMAL = Bit::Three as u8;

    /** Only exists on the copy of the register pushed by PHP and BRK. */
    const BREAK = Bit::Four as u8;

    /** Not wired to anything, reads back as one. */
    const UNUSED = Bit::Five as u8;

    /**
     * Overflow
     *
     * Set when an arithmetic result is an invalid two's complement value,
     * e.g. 64 + 64 => -128.
     */
    const OVERFLOW = Bit::Six as u8;

    /** Bit 7 of the last result. */
    const NEGATIVE = Bit::Seven as u8;
  }
}

impl Status {
  /// The state the register is left in by a reset.
  pub fn power_up() -> Self {
    Status::UNUSED | Status::INTERRUPT_DISABLE
  }

  /// The byte PHP and BRK write to the stack.
  pub fn to_stack(self) -> u8 {
    (self | Status::BREAK).bits()
  }

  /// Rebuild the register from a byte pulled by PLP or RTI.
  pub fn from_stack(val: u8) -> Self {
    Status::from_bits_truncate(val) | Status::UNUSED
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_can_set_a_bit() {
    let mut s = Status::empty();
    s.set(Status::NEGATIVE, true);

    assert_eq!(0b1000_0000, s.bits());
    assert_eq!(true, s.contains(Status::NEGATIVE));
  }

  #[test]
  fn it_powers_up_with_interrupts_disabled() {
    assert_eq!(0x24, Status::power_up().bits());
  }

  #[test]
  fn it_forces_break_when_pushed() {
    let s = Status::CARRY | Status::UNUSED;
    assert_eq!(0b0011_0001, s.to_stack());
    // the live register is untouched
    assert!(!s.contains(Status::BREAK));
  }

  #[test]
  fn it_forces_unused_when_pulled() {
    let s = Status::from_stack(0b1100_0011);
    assert_eq!(0b1110_0011, s.bits());
  }
}

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;

use nescore::{
  bus::{Bus, DataBus},
  cpu::Cpu,
  opcodes::power_on_tables,
  rom::Rom,
};

#[derive(Parser)]
#[command(about = "Run a NES program on the 6502 core")]
struct Args {
  /// iNES cartridge image, or a flat memory image with --raw
  rom: PathBuf,

  /// Number of instructions to execute
  #[arg(long, default_value_t = 100_000)]
  steps: u64,

  /// Load the file as a flat 64 KiB memory image instead of a cartridge
  #[arg(long, default_value_t = false)]
  raw: bool,

  /// Where a raw image is placed in memory (hex)
  #[arg(long, value_parser = parse_hex, default_value = "0000")]
  load_addr: u16,

  /// Start here instead of at the reset vector (hex)
  #[arg(long, value_parser = parse_hex)]
  pc: Option<u16>,

  /// Stop once an instruction jumps to itself
  #[arg(long, default_value_t = false)]
  stop_on_trap: bool,

  /// Log every instruction
  #[arg(long, default_value_t = false)]
  trace: bool,
}

fn parse_hex(s: &str) -> Result<u16, String> {
  let digits = s.trim_start_matches("0x").trim_start_matches('$');
  u16::from_str_radix(digits, 16).map_err(|e| format!("{}: {}", s, e))
}

fn load_raw(args: &Args) -> Result<Vec<u8>> {
  let image = fs::read(&args.rom).with_context(|| format!("reading {}", args.rom.display()))?;
  let start = args.load_addr as usize;
  if start + image.len() > 0x10000 {
    bail!(
      "{} bytes at {:04X} does not fit in the address space",
      image.len(),
      args.load_addr
    );
  }

  let mut mem = vec![0u8; 0x10000];
  mem[start..start + image.len()].copy_from_slice(&image);
  Ok(mem)
}

/// Step until the budget runs out or the program traps. Returns the number
/// of instructions executed.
fn run<B: Bus>(cpu: &mut Cpu, bus: &mut B, args: &Args) -> u64 {
  cpu.reset(bus);
  if let Some(pc) = args.pc {
    cpu.pc = pc;
  }

  for executed in 0..args.steps {
    let pc = cpu.pc;
    cpu.step(bus);
    if args.stop_on_trap && cpu.pc == pc {
      log::info!("trapped at {:04X}", pc);
      return executed + 1;
    }
  }
  args.steps
}

fn main() -> Result<()> {
  let args = Args::parse();

  let mut logger = env_logger::Builder::from_default_env();
  if args.trace {
    logger.filter_level(LevelFilter::Trace);
  }
  logger.init();

  power_on_tables();
  let mut cpu = Cpu::new();

  let executed = if args.raw {
    let mut mem = load_raw(&args)?;
    run(&mut cpu, &mut mem, &args)
  } else {
    let rom = Rom::load_from_file(&args.rom)
      .with_context(|| format!("loading {}", args.rom.display()))?;
    let mut bus = DataBus::new(rom);
    run(&mut cpu, &mut bus, &args)
  };

  println!(
    "{} instructions, PC:{:04X} {} CYC:{}",
    executed, cpu.pc, cpu, cpu.cycles
  );
  Ok(())
}

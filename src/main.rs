mod cpu;
mod display;
mod emulator;
mod error;
mod instruction;
mod rom;
mod savestate;

use std::env;
use std::process;

use cpu::Cpu;
use emulator::Emulator;
use error::Error;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <rom>", args[0]);
        eprintln!("  <rom> may be a path, a name with .ch8 inferred, or a name under roms/");
        process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(arg: &str) -> Result<(), Error> {
    let rom_path = rom::resolve_rom_path(arg)?;
    let data = rom::read_rom(&rom_path)?;

    let mut cpu = Cpu::new();
    cpu.load_rom(&data)?;

    let save_path = rom_path.with_extension("state");
    Emulator::new(cpu, save_path).run()
}

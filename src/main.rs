use std::fs;
use std::path::PathBuf;

use clap::Parser;

use chip8_vm_rs::{
    load_quirks_profile, load_rom, run_app, run_headless, set_clockspeed, Chip8Error, Chip8Vm,
};

#[derive(Debug, Parser)]
#[command(name = "chip8-vm-rs")]
#[command(about = "Run the CHIP-8 virtual machine")]
struct Args {
    rom: PathBuf,

    #[arg(long, default_value = "original", value_parser = ["original", "modern"])]
    quirks: String,

    #[arg(long, default_value_t = 16)]
    scale: usize,

    #[arg(long, default_value_t = 700)]
    hz: u32,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 1000)]
    frames: usize,

    #[arg(long, default_value = "chip8.save")]
    save_file: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let args = Args::parse();
    let quirks = load_quirks_profile(&args.quirks)
        .map_err(|_| Chip8Error::InvalidArgument("quirks must be original or modern"))?;

    let mut vm = Chip8Vm::new(quirks);
    set_clockspeed(&mut vm, args.hz)?;

    let rom = fs::read(&args.rom)?;
    load_rom(&mut vm, &rom)?;

    if args.headless {
        run_headless(&mut vm, args.frames)?;
        println!(
            "headless finished: pc=0x{:03x} lit_pixels={}",
            vm.pc,
            vm.screen.lit_count()
        );
        return Ok(());
    }

    run_app(&mut vm, &rom, args.scale, args.fps, &args.save_file)?;
    Ok(())
}

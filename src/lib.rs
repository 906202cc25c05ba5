pub mod chip8_vm;

pub use chip8_vm::app::{run_app, run_headless};
pub use chip8_vm::cpu::{execute_opcode, run_frame, step, tick_timers, Opcode};
pub use chip8_vm::display::Screen;
pub use chip8_vm::error::Chip8Error;
pub use chip8_vm::quirks::{load_quirks_profile, Quirks, MODERN_QUIRKS, ORIGINAL_QUIRKS};
pub use chip8_vm::snapshot::{restore_snapshot, save_snapshot, SNAPSHOT_SIZE};
pub use chip8_vm::state::{
    key_down, key_is_down, key_up, load_rom, load_rom_from_file, reset, set_clockspeed,
    set_quirks, Chip8Vm, KeyWait,
};

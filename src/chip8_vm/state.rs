use std::fs;
use std::path::Path;

use crate::chip8_vm::config::{
    DEFAULT_CLOCKSPEED, FONT_BYTES, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
    STACK_DEPTH,
};
use crate::chip8_vm::display::Screen;
use crate::chip8_vm::error::Chip8Error;
use crate::chip8_vm::quirks::Quirks;

/// Execution gate for the FX0A instruction. While waiting, `step` performs
/// no fetch; the wait resolves on a key release, not a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWait {
    Running,
    WaitingForKey(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8Vm {
    pub memory: [u8; MEMORY_SIZE],
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: [u16; STACK_DEPTH],
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keys: u16,
    pub key_wait: KeyWait,
    pub screen: Screen,
    pub clockspeed: u32,
    pub settings: Quirks,
}

impl Chip8Vm {
    pub fn new(settings: Quirks) -> Self {
        let mut vm = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START as u16,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keys: 0,
            key_wait: KeyWait::Running,
            screen: Screen::default(),
            clockspeed: DEFAULT_CLOCKSPEED,
            settings,
        };
        load_font(&mut vm);
        vm
    }
}

impl Default for Chip8Vm {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}

/// Re-initializes the machine in place, keeping `settings` and `clockspeed`.
pub fn reset(vm: &mut Chip8Vm) {
    let clockspeed = vm.clockspeed;
    *vm = Chip8Vm::new(vm.settings);
    vm.clockspeed = clockspeed;
}

fn load_font(vm: &mut Chip8Vm) {
    vm.memory[..FONT_BYTES.len()].copy_from_slice(&FONT_BYTES);
}

pub fn load_rom(vm: &mut Chip8Vm, rom: &[u8]) -> Result<(), Chip8Error> {
    let max = MEMORY_SIZE - PROGRAM_START;
    if rom.len() > max {
        return Err(Chip8Error::RomTooLarge {
            size: rom.len(),
            max,
        });
    }

    vm.pc = PROGRAM_START as u16;
    vm.i = 0;
    vm.screen.clear();
    vm.memory[PROGRAM_START..PROGRAM_START + rom.len()].copy_from_slice(rom);

    Ok(())
}

pub fn load_rom_from_file(vm: &mut Chip8Vm, path: &Path) -> Result<(), Chip8Error> {
    let rom = fs::read(path)?;
    load_rom(vm, &rom)
}

pub fn key_down(vm: &mut Chip8Vm, key: u8) {
    if key as usize >= KEY_COUNT {
        return;
    }
    vm.keys |= 1 << key;
}

pub fn key_up(vm: &mut Chip8Vm, key: u8) {
    if key as usize >= KEY_COUNT {
        return;
    }
    if let KeyWait::WaitingForKey(register) = vm.key_wait {
        vm.v[register as usize] = key;
        vm.key_wait = KeyWait::Running;
    }
    vm.keys &= !(1 << key);
}

pub fn key_is_down(vm: &Chip8Vm, key: u8) -> bool {
    (key as usize) < KEY_COUNT && vm.keys & (1 << key) != 0
}

/// Host-only; meant for use between runs, the executor never calls this.
pub fn set_quirks(vm: &mut Chip8Vm, settings: Quirks) {
    vm.settings = settings;
}

pub fn set_clockspeed(vm: &mut Chip8Vm, hz: u32) -> Result<(), Chip8Error> {
    if hz == 0 {
        return Err(Chip8Error::InvalidArgument("clockspeed must be > 0"));
    }
    vm.clockspeed = hz;
    Ok(())
}

//! Byte-exact save-state record: magic, layout id, then every machine field
//! in a fixed order (multi-byte values big-endian, screen bit-packed
//! MSB-first). A layout change must bump `SNAPSHOT_LAYOUT`.

use crate::chip8_vm::config::{
    MEMORY_SIZE, REGISTER_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH, STACK_DEPTH,
};
use crate::chip8_vm::display::Screen;
use crate::chip8_vm::error::Chip8Error;
use crate::chip8_vm::quirks::Quirks;
use crate::chip8_vm::state::{Chip8Vm, KeyWait};

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"C8VM";
pub const SNAPSHOT_LAYOUT: u8 = 1;

const SCREEN_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT / 8;

pub const SNAPSHOT_SIZE: usize = 4 // magic
    + 1 // layout id
    + MEMORY_SIZE
    + REGISTER_COUNT
    + 2 // i
    + 2 // pc
    + STACK_DEPTH * 2
    + 1 // sp
    + 1 // delay timer
    + 1 // sound timer
    + 2 // keys
    + 2 // key-wait state + register
    + SCREEN_BYTES
    + 4 // clockspeed
    + 1; // quirk flags

const QUIRK_SHIFT_USES_VY: u8 = 1 << 0;
const QUIRK_LOAD_STORE_INCREMENTS_I: u8 = 1 << 1;
const QUIRK_LOGIC_OPS_RESET_VF: u8 = 1 << 2;
const QUIRK_WRAP_SPRITES: u8 = 1 << 3;
const QUIRK_INDEX_OVERFLOW_SETS_VF: u8 = 1 << 4;

fn quirk_bits(settings: Quirks) -> u8 {
    let mut bits = 0;
    if settings.shift_uses_vy {
        bits |= QUIRK_SHIFT_USES_VY;
    }
    if settings.load_store_increments_i {
        bits |= QUIRK_LOAD_STORE_INCREMENTS_I;
    }
    if settings.logic_ops_reset_vf {
        bits |= QUIRK_LOGIC_OPS_RESET_VF;
    }
    if settings.wrap_sprites {
        bits |= QUIRK_WRAP_SPRITES;
    }
    if settings.index_overflow_sets_vf {
        bits |= QUIRK_INDEX_OVERFLOW_SETS_VF;
    }
    bits
}

fn quirks_from_bits(bits: u8) -> Result<Quirks, Chip8Error> {
    if bits & 0xE0 != 0 {
        return Err(Chip8Error::BadSnapshot("unknown quirk flag bits"));
    }
    Ok(Quirks {
        shift_uses_vy: bits & QUIRK_SHIFT_USES_VY != 0,
        load_store_increments_i: bits & QUIRK_LOAD_STORE_INCREMENTS_I != 0,
        logic_ops_reset_vf: bits & QUIRK_LOGIC_OPS_RESET_VF != 0,
        wrap_sprites: bits & QUIRK_WRAP_SPRITES != 0,
        index_overflow_sets_vf: bits & QUIRK_INDEX_OVERFLOW_SETS_VF != 0,
    })
}

pub fn save_snapshot(vm: &Chip8Vm) -> Vec<u8> {
    let mut out = Vec::with_capacity(SNAPSHOT_SIZE);
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_LAYOUT);
    out.extend_from_slice(&vm.memory);
    out.extend_from_slice(&vm.v);
    out.extend_from_slice(&vm.i.to_be_bytes());
    out.extend_from_slice(&vm.pc.to_be_bytes());
    for entry in vm.stack {
        out.extend_from_slice(&entry.to_be_bytes());
    }
    out.push(vm.sp);
    out.push(vm.delay_timer);
    out.push(vm.sound_timer);
    out.extend_from_slice(&vm.keys.to_be_bytes());
    match vm.key_wait {
        KeyWait::Running => out.extend_from_slice(&[0, 0]),
        KeyWait::WaitingForKey(register) => out.extend_from_slice(&[1, register]),
    }
    out.extend_from_slice(&vm.screen.pack_bits());
    out.extend_from_slice(&vm.clockspeed.to_be_bytes());
    out.push(quirk_bits(vm.settings));

    debug_assert_eq!(out.len(), SNAPSHOT_SIZE);
    out
}

/// Builds a whole machine from a snapshot record. Rejects records with the
/// wrong length, magic, or layout id; the caller's current machine is left
/// untouched on failure.
pub fn restore_snapshot(bytes: &[u8]) -> Result<Chip8Vm, Chip8Error> {
    if bytes.len() != SNAPSHOT_SIZE {
        return Err(Chip8Error::BadSnapshot("unexpected length"));
    }
    if bytes[..4] != SNAPSHOT_MAGIC {
        return Err(Chip8Error::BadSnapshot("bad magic"));
    }
    if bytes[4] != SNAPSHOT_LAYOUT {
        return Err(Chip8Error::BadSnapshot("unsupported layout id"));
    }

    let mut vm = Chip8Vm::new(Quirks::default());
    let mut at = 5;

    vm.memory.copy_from_slice(&bytes[at..at + MEMORY_SIZE]);
    at += MEMORY_SIZE;
    vm.v.copy_from_slice(&bytes[at..at + REGISTER_COUNT]);
    at += REGISTER_COUNT;
    vm.i = u16::from_be_bytes([bytes[at], bytes[at + 1]]);
    at += 2;
    vm.pc = u16::from_be_bytes([bytes[at], bytes[at + 1]]);
    at += 2;
    for entry in vm.stack.iter_mut() {
        *entry = u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        at += 2;
    }
    vm.sp = bytes[at];
    at += 1;
    if vm.sp as usize > STACK_DEPTH {
        return Err(Chip8Error::BadSnapshot("stack pointer out of range"));
    }
    vm.delay_timer = bytes[at];
    at += 1;
    vm.sound_timer = bytes[at];
    at += 1;
    vm.keys = u16::from_be_bytes([bytes[at], bytes[at + 1]]);
    at += 2;
    vm.key_wait = match (bytes[at], bytes[at + 1]) {
        (0, 0) => KeyWait::Running,
        (1, register) if (register as usize) < REGISTER_COUNT => {
            KeyWait::WaitingForKey(register)
        }
        _ => return Err(Chip8Error::BadSnapshot("invalid key-wait record")),
    };
    at += 2;
    vm.screen = Screen::unpack_bits(&bytes[at..at + SCREEN_BYTES]);
    at += SCREEN_BYTES;
    vm.clockspeed = u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    at += 4;
    vm.settings = quirks_from_bits(bytes[at])?;
    at += 1;

    debug_assert_eq!(at, SNAPSHOT_SIZE);
    Ok(vm)
}

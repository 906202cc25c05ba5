use std::fs;
use std::path::Path;

use crate::chip8_vm::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::chip8_vm::cpu::run_frame;
use crate::chip8_vm::error::Chip8Error;
use crate::chip8_vm::snapshot::{restore_snapshot, save_snapshot};
use crate::chip8_vm::state::{key_down, key_up, load_rom, reset, Chip8Vm};

/// Drives a fixed number of logical frames with no window or input.
pub fn run_headless(vm: &mut Chip8Vm, frames: usize) -> Result<(), Chip8Error> {
    if frames == 0 {
        return Err(Chip8Error::InvalidArgument("frames must be > 0"));
    }

    for _ in 0..frames {
        run_frame(vm)?;
    }

    Ok(())
}

/// Windowed host driver. Owns everything the core treats as external:
/// keyboard-to-keypad mapping, frame pacing, rendering, and the save file.
pub fn run_app(
    vm: &mut Chip8Vm,
    rom: &[u8],
    scale: usize,
    fps: u32,
    save_path: &Path,
) -> Result<(), Chip8Error> {
    use raylib::prelude::{Color, KeyboardKey, RaylibDraw};

    if scale == 0 {
        return Err(Chip8Error::InvalidArgument("scale must be > 0"));
    }
    if fps == 0 {
        return Err(Chip8Error::InvalidArgument("fps must be > 0"));
    }

    let width = (SCREEN_WIDTH * scale) as i32;
    let height = (SCREEN_HEIGHT * scale) as i32;
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("chip8-vm-rs")
        .build();
    rl.set_target_fps(fps);

    let key_map = [
        (KeyboardKey::KEY_ONE, 0x1u8),
        (KeyboardKey::KEY_TWO, 0x2),
        (KeyboardKey::KEY_THREE, 0x3),
        (KeyboardKey::KEY_FOUR, 0xC),
        (KeyboardKey::KEY_Q, 0x4),
        (KeyboardKey::KEY_W, 0x5),
        (KeyboardKey::KEY_E, 0x6),
        (KeyboardKey::KEY_R, 0xD),
        (KeyboardKey::KEY_A, 0x7),
        (KeyboardKey::KEY_S, 0x8),
        (KeyboardKey::KEY_D, 0x9),
        (KeyboardKey::KEY_F, 0xE),
        (KeyboardKey::KEY_Z, 0xA),
        (KeyboardKey::KEY_X, 0x0),
        (KeyboardKey::KEY_C, 0xB),
        (KeyboardKey::KEY_V, 0xF),
    ];

    let mut paused = false;

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            break;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            paused = !paused;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F1) {
            reset(vm);
            load_rom(vm, rom)?;
            paused = false;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F5) {
            if let Err(error) = fs::write(save_path, save_snapshot(vm)) {
                log::error!("failed to write snapshot {}: {error}", save_path.display());
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F9) {
            match fs::read(save_path)
                .map_err(Chip8Error::from)
                .and_then(|bytes| restore_snapshot(&bytes))
            {
                Ok(restored) => *vm = restored,
                Err(error) => log::error!("failed to restore snapshot: {error}"),
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F7) && vm.clockspeed > 50 {
            vm.clockspeed -= 50;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F8) && vm.clockspeed < 2000 {
            vm.clockspeed += 50;
        }

        // Key releases must reach the core: they resolve FX0A waits.
        for (key, pad) in key_map {
            if rl.is_key_pressed(key) {
                key_down(vm, pad);
            }
            if rl.is_key_released(key) {
                key_up(vm, pad);
            }
        }

        if !paused {
            if let Err(error) = run_frame(vm) {
                log::error!("machine fault, pausing: {error}");
                paused = true;
            }
        }

        // The core produces no audio; an active sound timer tints the pixels.
        let foreground = if vm.sound_timer > 0 {
            Color::GOLD
        } else {
            Color::WHITE
        };

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        for (index, cell) in vm.screen.pixels().iter().enumerate() {
            if *cell == 0 {
                continue;
            }
            let x = (index % SCREEN_WIDTH) as i32;
            let y = (index / SCREEN_WIDTH) as i32;
            d.draw_rectangle(
                x * scale as i32,
                y * scale as i32,
                scale as i32,
                scale as i32,
                foreground,
            );
        }
    }

    Ok(())
}

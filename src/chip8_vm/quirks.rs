/// Compatibility switches for opcodes whose semantics diverged between
/// historical CHIP-8 interpreters. Copied into the machine at construction
/// and only read by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub shift_uses_vy: bool,
    pub load_store_increments_i: bool,
    pub logic_ops_reset_vf: bool,
    pub wrap_sprites: bool,
    pub index_overflow_sets_vf: bool,
}

pub const ORIGINAL_QUIRKS: Quirks = Quirks {
    shift_uses_vy: true,
    load_store_increments_i: true,
    logic_ops_reset_vf: true,
    wrap_sprites: false,
    index_overflow_sets_vf: true,
};

pub const MODERN_QUIRKS: Quirks = Quirks {
    shift_uses_vy: false,
    load_store_increments_i: false,
    logic_ops_reset_vf: false,
    wrap_sprites: true,
    index_overflow_sets_vf: false,
};

impl Default for Quirks {
    fn default() -> Self {
        ORIGINAL_QUIRKS
    }
}

pub fn load_quirks_profile(profile: &str) -> Result<Quirks, String> {
    match profile.trim().to_ascii_lowercase().as_str() {
        "original" => Ok(ORIGINAL_QUIRKS),
        "modern" => Ok(MODERN_QUIRKS),
        other => Err(format!(
            "invalid quirks profile '{other}', expected one of: modern, original"
        )),
    }
}

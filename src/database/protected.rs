// file: src/database/protected.rs
// version: 1.0.0
// guid: 91f4c2d7-6b0e-4a83-a5c9-3e7d8b1f0a26

//! Tables holding player and runtime data
//!
//! These are created once by `setup` and never overwritten by `update` or
//! `export --all`.

pub const PROTECTED_TABLES: [&str; 33] = [
    "accounts",
    "accounts_banned",
    "auction_house_items",
    "auction_house",
    "char_blacklist",
    "char_chocobos",
    "char_effects",
    "char_equip",
    "char_equip_saved",
    "char_exp",
    "char_history",
    "char_inventory",
    "char_jobs",
    "char_job_points",
    "char_look",
    "char_merit",
    "char_pet",
    "char_points",
    "char_profile",
    "char_skills",
    "char_spells",
    "char_stats",
    "char_storage",
    "char_style",
    "char_unlocks",
    "char_vars",
    "chars",
    "conquest_system",
    "delivery_box",
    "ip_exceptions",
    "linkshells",
    "server_variables",
    "unity_system",
];

/// Fixture holding trigger definitions; always imported last
pub const TRIGGERS_FIXTURE: &str = "triggers";

pub fn is_protected(table: &str) -> bool {
    PROTECTED_TABLES.contains(&table)
}

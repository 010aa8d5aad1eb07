// src/process/columns.rs
//! Column names of the shaped and final tables.

pub const MATERIAL: &str = "Material";
pub const APPLICATION: &str = "Application";
pub const TML_PCT: &str = "TML_Pct";
pub const WVR_PCT: &str = "WVR_Pct";
pub const CVCM_PCT: &str = "CVCM_Pct";
pub const RML_PCT: &str = "RML_Pct";
pub const YEAR: &str = "Year";
pub const CLASSIFICATION: &str = "SpaceX_Classification";
pub const DATA_REF: &str = "Data_Ref";
pub const MANUFACTURER: &str = "Manufacturer";
pub const RAW_APPLICATION: &str = "Raw_Application";

/// Source header → shaped name. Applied before the whitespace-to-underscore pass.
pub const HEADER_RENAMES: &[(&str, &str)] = &[
    ("TML %", TML_PCT),
    ("WVR", WVR_PCT),
    ("CVCM", CVCM_PCT),
    ("Mfr.", MANUFACTURER),
];

/// Columns every page must carry once renamed.
pub const REQUIRED: &[&str] = &[TML_PCT, WVR_PCT, CVCM_PCT, YEAR, APPLICATION];

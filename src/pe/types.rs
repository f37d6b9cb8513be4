//! PE structural summary types.
//!
//! Data only - the traversal logic lives in `parser`. Fields that a given
//! binary does not carry keep their zero defaults; the feature builder
//! relies on that instead of handling per-field absence itself.

use serde::{Deserialize, Serialize};

/// COFF file header and optional header fields used as model features.
///
/// Widths follow the on-disk format; `image_base` and the stack/heap sizes
/// are `u64` so PE32+ images do not truncate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeHeaders {
    pub machine: u16,
    pub size_of_optional_header: u16,
    pub characteristics: u16,
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_code: u32,
    pub size_of_initialized_data: u32,
    pub size_of_uninitialized_data: u32,
    pub address_of_entry_point: u32,
    pub base_of_code: u32,
    /// PE32 only; 0 for PE32+ images, which do not carry the field.
    pub base_of_data: u32,
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version: u16,
    pub minor_image_version: u16,
    pub major_subsystem_version: u16,
    pub minor_subsystem_version: u16,
    pub size_of_image: u32,
    pub size_of_headers: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub size_of_stack_reserve: u64,
    pub size_of_stack_commit: u64,
    pub size_of_heap_reserve: u64,
    pub size_of_heap_commit: u64,
    pub loader_flags: u32,
    pub number_of_rva_and_sizes: u32,
}

/// One section table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    pub virtual_size: u32,
    pub raw_size: u32,
    /// Entropy of the raw section bytes; `None` when the section has no
    /// readable data (zero raw size or out-of-bounds pointer).
    pub entropy: Option<f64>,
}

/// Import statistics for one referenced module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedDll {
    pub name: String,
    /// Total imported symbols (named + ordinal).
    pub import_count: u32,
    /// Symbols imported by ordinal rather than by name.
    pub ordinal_count: u32,
}

/// One successfully read resource leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBlob {
    pub size: u32,
    pub entropy: f64,
}

/// Parsed PE layout, consumed by the executable feature builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeSummary {
    pub headers: PeHeaders,
    pub sections: Vec<SectionInfo>,
    pub imports: Vec<ImportedDll>,
    pub export_count: u32,
    pub resources: Vec<ResourceBlob>,
    pub load_config_size: u32,
    pub version_info_size: u32,
}

impl PeSummary {
    pub fn total_import_count(&self) -> u32 {
        self.imports.iter().map(|d| d.import_count).sum()
    }

    pub fn ordinal_import_count(&self) -> u32 {
        self.imports.iter().map(|d| d.ordinal_count).sum()
    }
}

/// Parse failure. `NotExecutable` is a format rejection; `Truncated` means
/// not even the mandatory headers could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeError {
    NotExecutable,
    Truncated(String),
}

impl std::fmt::Display for PeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeError::NotExecutable => write!(f, "missing MZ signature"),
            PeError::Truncated(d) => write!(f, "truncated or malformed image: {}", d),
        }
    }
}

impl std::error::Error for PeError {}

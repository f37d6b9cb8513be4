//! Executable feature builder.
//!
//! Maps a parsed [`PeSummary`](crate::pe::PeSummary) into the canonical
//! executable feature set: one feature per header field plus aggregate
//! statistics over sections, imports, exports and resources. Aggregates of
//! empty collections resolve to 0 - absence of a directory is a signal,
//! not an error.

use crate::features::set::FeatureSet;
use crate::pe::PeSummary;

/// Canonical executable feature names, in build order.
pub const EXECUTABLE_FEATURES: &[&str] = &[
    "Machine",
    "SizeOfOptionalHeader",
    "Characteristics",
    "MajorLinkerVersion",
    "MinorLinkerVersion",
    "SizeOfCode",
    "SizeOfInitializedData",
    "SizeOfUninitializedData",
    "AddressOfEntryPoint",
    "BaseOfCode",
    "BaseOfData",
    "ImageBase",
    "SectionAlignment",
    "FileAlignment",
    "MajorOperatingSystemVersion",
    "MinorOperatingSystemVersion",
    "MajorImageVersion",
    "MinorImageVersion",
    "MajorSubsystemVersion",
    "MinorSubsystemVersion",
    "SizeOfImage",
    "SizeOfHeaders",
    "CheckSum",
    "Subsystem",
    "DllCharacteristics",
    "SizeOfStackReserve",
    "SizeOfStackCommit",
    "SizeOfHeapReserve",
    "SizeOfHeapCommit",
    "LoaderFlags",
    "NumberOfRvaAndSizes",
    "SectionsNb",
    "SectionsMeanEntropy",
    "SectionsMinEntropy",
    "SectionsMaxEntropy",
    "SectionsMeanRawsize",
    "SectionsMinRawsize",
    "SectionsMaxRawsize",
    "SectionsMeanVirtualsize",
    "SectionsMinVirtualsize",
    "SectionsMaxVirtualsize",
    "ImportsNbDLL",
    "ImportsNb",
    "ImportsNbOrdinal",
    "ExportNb",
    "ResourcesNb",
    "ResourcesMeanEntropy",
    "ResourcesMinEntropy",
    "ResourcesMaxEntropy",
    "ResourcesMeanSize",
    "ResourcesMinSize",
    "ResourcesMaxSize",
    "LoadConfigurationSize",
    "VersionInformationSize",
];

/// Mean/min/max over a value list; all zero for an empty list.
fn aggregate(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (sum / values.len() as f64, min, max)
}

/// Build the canonical executable feature set from a structural summary.
pub fn build(summary: &PeSummary) -> FeatureSet {
    let mut features = FeatureSet::with_capacity(EXECUTABLE_FEATURES.len());
    let h = &summary.headers;

    features.insert("Machine", h.machine as f64);
    features.insert("SizeOfOptionalHeader", h.size_of_optional_header as f64);
    features.insert("Characteristics", h.characteristics as f64);
    features.insert("MajorLinkerVersion", h.major_linker_version as f64);
    features.insert("MinorLinkerVersion", h.minor_linker_version as f64);
    features.insert("SizeOfCode", h.size_of_code as f64);
    features.insert("SizeOfInitializedData", h.size_of_initialized_data as f64);
    features.insert("SizeOfUninitializedData", h.size_of_uninitialized_data as f64);
    features.insert("AddressOfEntryPoint", h.address_of_entry_point as f64);
    features.insert("BaseOfCode", h.base_of_code as f64);
    features.insert("BaseOfData", h.base_of_data as f64);
    features.insert("ImageBase", h.image_base as f64);
    features.insert("SectionAlignment", h.section_alignment as f64);
    features.insert("FileAlignment", h.file_alignment as f64);
    features.insert("MajorOperatingSystemVersion", h.major_operating_system_version as f64);
    features.insert("MinorOperatingSystemVersion", h.minor_operating_system_version as f64);
    features.insert("MajorImageVersion", h.major_image_version as f64);
    features.insert("MinorImageVersion", h.minor_image_version as f64);
    features.insert("MajorSubsystemVersion", h.major_subsystem_version as f64);
    features.insert("MinorSubsystemVersion", h.minor_subsystem_version as f64);
    features.insert("SizeOfImage", h.size_of_image as f64);
    features.insert("SizeOfHeaders", h.size_of_headers as f64);
    features.insert("CheckSum", h.checksum as f64);
    features.insert("Subsystem", h.subsystem as f64);
    features.insert("DllCharacteristics", h.dll_characteristics as f64);
    features.insert("SizeOfStackReserve", h.size_of_stack_reserve as f64);
    features.insert("SizeOfStackCommit", h.size_of_stack_commit as f64);
    features.insert("SizeOfHeapReserve", h.size_of_heap_reserve as f64);
    features.insert("SizeOfHeapCommit", h.size_of_heap_commit as f64);
    features.insert("LoaderFlags", h.loader_flags as f64);
    features.insert("NumberOfRvaAndSizes", h.number_of_rva_and_sizes as f64);

    // Sections. Entropy aggregates only cover sections with readable data.
    let entropies: Vec<f64> = summary.sections.iter().filter_map(|s| s.entropy).collect();
    let raw_sizes: Vec<f64> = summary.sections.iter().map(|s| s.raw_size as f64).collect();
    let virtual_sizes: Vec<f64> = summary.sections.iter().map(|s| s.virtual_size as f64).collect();

    features.insert("SectionsNb", summary.sections.len() as f64);
    let (mean, min, max) = aggregate(&entropies);
    features.insert("SectionsMeanEntropy", mean);
    features.insert("SectionsMinEntropy", min);
    features.insert("SectionsMaxEntropy", max);
    let (mean, min, max) = aggregate(&raw_sizes);
    features.insert("SectionsMeanRawsize", mean);
    features.insert("SectionsMinRawsize", min);
    features.insert("SectionsMaxRawsize", max);
    let (mean, min, max) = aggregate(&virtual_sizes);
    features.insert("SectionsMeanVirtualsize", mean);
    features.insert("SectionsMinVirtualsize", min);
    features.insert("SectionsMaxVirtualsize", max);

    features.insert("ImportsNbDLL", summary.imports.len() as f64);
    features.insert("ImportsNb", summary.total_import_count() as f64);
    features.insert("ImportsNbOrdinal", summary.ordinal_import_count() as f64);
    features.insert("ExportNb", summary.export_count as f64);

    let resource_entropies: Vec<f64> = summary.resources.iter().map(|b| b.entropy).collect();
    let resource_sizes: Vec<f64> = summary.resources.iter().map(|b| b.size as f64).collect();

    features.insert("ResourcesNb", summary.resources.len() as f64);
    let (mean, min, max) = aggregate(&resource_entropies);
    features.insert("ResourcesMeanEntropy", mean);
    features.insert("ResourcesMinEntropy", min);
    features.insert("ResourcesMaxEntropy", max);
    let (mean, min, max) = aggregate(&resource_sizes);
    features.insert("ResourcesMeanSize", mean);
    features.insert("ResourcesMinSize", min);
    features.insert("ResourcesMaxSize", max);

    features.insert("LoadConfigurationSize", summary.load_config_size as f64);
    features.insert("VersionInformationSize", summary.version_info_size as f64);

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pe::{ImportedDll, ResourceBlob, SectionInfo};

    #[test]
    fn test_feature_name_list_matches_build_order() {
        let features = build(&PeSummary::default());
        let names: Vec<&str> = features.names().collect();
        assert_eq!(names, EXECUTABLE_FEATURES);
    }

    #[test]
    fn test_empty_summary_zeroes_aggregates() {
        let features = build(&PeSummary::default());
        assert_eq!(features.get("SectionsNb"), Some(0.0));
        assert_eq!(features.get("SectionsMeanEntropy"), Some(0.0));
        assert_eq!(features.get("SectionsMinRawsize"), Some(0.0));
        assert_eq!(features.get("ResourcesMaxEntropy"), Some(0.0));
        assert_eq!(features.get("ImportsNb"), Some(0.0));
        assert_eq!(features.get("ExportNb"), Some(0.0));
    }

    #[test]
    fn test_section_aggregates() {
        let summary = PeSummary {
            sections: vec![
                SectionInfo {
                    name: ".text".into(),
                    virtual_size: 100,
                    raw_size: 200,
                    entropy: Some(6.0),
                },
                SectionInfo {
                    name: ".bss".into(),
                    virtual_size: 300,
                    raw_size: 0,
                    entropy: None,
                },
                SectionInfo {
                    name: ".rsrc".into(),
                    virtual_size: 50,
                    raw_size: 100,
                    entropy: Some(2.0),
                },
            ],
            ..PeSummary::default()
        };
        let features = build(&summary);

        assert_eq!(features.get("SectionsNb"), Some(3.0));
        // .bss has no data and is excluded from entropy aggregates.
        assert_eq!(features.get("SectionsMeanEntropy"), Some(4.0));
        assert_eq!(features.get("SectionsMinEntropy"), Some(2.0));
        assert_eq!(features.get("SectionsMaxEntropy"), Some(6.0));
        assert_eq!(features.get("SectionsMeanRawsize"), Some(100.0));
        assert_eq!(features.get("SectionsMaxVirtualsize"), Some(300.0));
        assert_eq!(features.get("SectionsMinVirtualsize"), Some(50.0));
    }

    #[test]
    fn test_import_and_resource_aggregates() {
        let summary = PeSummary {
            imports: vec![
                ImportedDll {
                    name: "KERNEL32.dll".into(),
                    import_count: 10,
                    ordinal_count: 2,
                },
                ImportedDll {
                    name: "ws2_32.dll".into(),
                    import_count: 5,
                    ordinal_count: 5,
                },
            ],
            export_count: 3,
            resources: vec![
                ResourceBlob { size: 16, entropy: 4.0 },
                ResourceBlob { size: 48, entropy: 7.5 },
            ],
            load_config_size: 64,
            version_info_size: 944,
            ..PeSummary::default()
        };
        let features = build(&summary);

        assert_eq!(features.get("ImportsNbDLL"), Some(2.0));
        assert_eq!(features.get("ImportsNb"), Some(15.0));
        assert_eq!(features.get("ImportsNbOrdinal"), Some(7.0));
        assert_eq!(features.get("ExportNb"), Some(3.0));
        assert_eq!(features.get("ResourcesNb"), Some(2.0));
        assert_eq!(features.get("ResourcesMeanSize"), Some(32.0));
        assert_eq!(features.get("ResourcesMinEntropy"), Some(4.0));
        assert_eq!(features.get("ResourcesMaxEntropy"), Some(7.5));
        assert_eq!(features.get("LoadConfigurationSize"), Some(64.0));
        assert_eq!(features.get("VersionInformationSize"), Some(944.0));
    }
}

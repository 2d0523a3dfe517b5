/// Enumeration constant tables for decoding raw API values
use std::collections::{BTreeMap, HashMap};

use log::debug;

/// An API enumeration constant and the metadata used to index it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub value: i64,
    /// Features (API versions or extensions) requiring the constant
    pub required_by: Vec<String>,
    /// Bitmask group the constant belongs to, if it is a mask bit
    pub bitmask: Option<String>,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            required_by: Vec::new(),
            bitmask: None,
        }
    }

    pub fn required_by(mut self, feature: impl Into<String>) -> Self {
        self.required_by.push(feature.into());
        self
    }

    pub fn in_bitmask(mut self, group: impl Into<String>) -> Self {
        self.bitmask = Some(group.into());
        self
    }
}

/// Value to name lookup tables for plain enumerations and bitmask groups
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    names: HashMap<i64, String>,
    bitmasks: HashMap<String, BTreeMap<i64, String>>,
}

impl EnumRegistry {
    /// Index constants by value.
    ///
    /// Constants not required by any feature are skipped. Bitmask members are
    /// indexed only in their group. When several constants share a value the
    /// first one keeps the name.
    pub fn from_constants<I>(constants: I) -> Self
    where
        I: IntoIterator<Item = EnumConstant>,
    {
        let mut registry = Self::default();
        let mut skipped = 0usize;

        for constant in constants {
            if constant.required_by.is_empty() {
                skipped += 1;
                continue;
            }

            match constant.bitmask {
                None => {
                    registry.names.entry(constant.value).or_insert(constant.name);
                }
                Some(group) => {
                    registry
                        .bitmasks
                        .entry(group)
                        .or_default()
                        .entry(constant.value)
                        .or_insert(constant.name);
                }
            }
        }

        debug!(
            "enum registry: {} names, {} bitmask groups, {} constants without feature",
            registry.names.len(),
            registry.bitmasks.len(),
            skipped
        );
        registry
    }

    /// Name of a plain enumeration value, if known
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.names.get(&value).map(String::as_str)
    }

    /// Members of a bitmask group, ordered by value
    pub fn bitmask_names(&self, group: &str) -> Option<&BTreeMap<i64, String>> {
        self.bitmasks.get(group)
    }

    pub fn bitmask_groups(&self) -> impl Iterator<Item = &str> {
        self.bitmasks.keys().map(String::as_str)
    }

    /// Decode a mask value as `A | B | 0x..`; `None` if the group is unknown.
    pub fn format_bitmask(&self, group: &str, value: i64) -> Option<String> {
        let names = self.bitmasks.get(group)?;

        if let Some(name) = names.get(&value) {
            return Some(name.clone());
        }
        if value == 0 {
            return Some("0".to_string());
        }

        let mut parts: Vec<String> = Vec::new();
        let mut remaining = value;
        for (&bits, name) in names {
            if bits != 0 && remaining & bits == bits {
                parts.push(name.clone());
                remaining &= !bits;
            }
        }
        if remaining != 0 {
            parts.push(format!("0x{:X}", remaining));
        }

        Some(parts.join(" | "))
    }

    /// Number of plain enumeration names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when there are no plain enumeration names, whatever the bitmask groups hold
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EnumRegistry {
        EnumRegistry::from_constants([
            EnumConstant::new("GL_NO_ERROR", 0).required_by("GL_VERSION_1_0"),
            EnumConstant::new("GL_TEXTURE_2D", 0x0DE1).required_by("GL_VERSION_1_0"),
            EnumConstant::new("GL_TEXTURE_2D_EXT", 0x0DE1).required_by("GL_EXT_texture"),
            EnumConstant::new("GL_UNUSED", 0x1234),
            EnumConstant::new("GL_DEPTH_BUFFER_BIT", 0x100)
                .required_by("GL_VERSION_1_0")
                .in_bitmask("ClearBufferMask"),
            EnumConstant::new("GL_STENCIL_BUFFER_BIT", 0x400)
                .required_by("GL_VERSION_1_0")
                .in_bitmask("ClearBufferMask"),
            EnumConstant::new("GL_COLOR_BUFFER_BIT", 0x4000)
                .required_by("GL_VERSION_1_0")
                .in_bitmask("ClearBufferMask"),
        ])
    }

    #[test]
    fn test_plain_names() {
        let registry = registry();
        assert_eq!(registry.enum_name(0x0DE1), Some("GL_TEXTURE_2D"));
        assert_eq!(registry.enum_name(0), Some("GL_NO_ERROR"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_len_counts_plain_names_only() {
        let registry = EnumRegistry::from_constants([EnumConstant::new("GL_COLOR_BUFFER_BIT", 0x4000)
            .required_by("GL_VERSION_1_0")
            .in_bitmask("ClearBufferMask")]);
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert_eq!(registry.bitmask_groups().count(), 1);
        assert!(EnumRegistry::default().is_empty());
    }

    #[test]
    fn test_constants_without_feature_are_skipped() {
        assert_eq!(registry().enum_name(0x1234), None);
    }

    #[test]
    fn test_bitmask_members_stay_in_their_group() {
        let registry = registry();
        assert_eq!(registry.enum_name(0x4000), None);

        let group = registry.bitmask_names("ClearBufferMask").unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.get(&0x100).map(String::as_str), Some("GL_DEPTH_BUFFER_BIT"));
        assert_eq!(registry.bitmask_groups().collect::<Vec<_>>(), vec!["ClearBufferMask"]);
    }

    #[test]
    fn test_format_bitmask() {
        let registry = registry();
        assert_eq!(
            registry.format_bitmask("ClearBufferMask", 0x4100).as_deref(),
            Some("GL_DEPTH_BUFFER_BIT | GL_COLOR_BUFFER_BIT")
        );
        assert_eq!(
            registry.format_bitmask("ClearBufferMask", 0x400).as_deref(),
            Some("GL_STENCIL_BUFFER_BIT")
        );
        assert_eq!(
            registry.format_bitmask("ClearBufferMask", 0x4001).as_deref(),
            Some("GL_COLOR_BUFFER_BIT | 0x1")
        );
        assert_eq!(registry.format_bitmask("ClearBufferMask", 0).as_deref(), Some("0"));
        assert_eq!(registry.format_bitmask("MissingMask", 1), None);
    }
}

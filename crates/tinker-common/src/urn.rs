//! Module-qualified names for prefabs and block families.
//!
//! Every loaded item definition is addressed by a [`ResourceUrn`] of the
//! form `module:resource` with an optional `#fragment`. Block-backed items
//! are addressed by a [`BlockUri`], which names the block family and,
//! optionally, the shape it was built with.
//!
//! Names keep the casing they were declared with. Comparisons against
//! free-text ingredient names are case-insensitive and live in the
//! crafting crate, not here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{UrnError, UrnResult};

const MODULE_SEPARATOR: char = ':';
const FRAGMENT_SEPARATOR: char = '#';

/// A module-qualified resource name (`module:resource#fragment`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUrn {
    module: String,
    resource: String,
    fragment: Option<String>,
}

impl ResourceUrn {
    /// Creates a URN from its parts.
    #[must_use]
    pub fn new(module: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            resource: resource.into(),
            fragment: None,
        }
    }

    /// Returns a copy of this URN with a fragment attached.
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// The owning module.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The unqualified resource name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The fragment, if any.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Lowercased full name, used as a lookup key.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for ResourceUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{MODULE_SEPARATOR}{}", self.module, self.resource)?;
        if let Some(fragment) = &self.fragment {
            write!(f, "{FRAGMENT_SEPARATOR}{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceUrn {
    type Err = UrnError;

    fn from_str(s: &str) -> UrnResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UrnError::Empty);
        }

        let (module, rest) = s
            .split_once(MODULE_SEPARATOR)
            .ok_or_else(|| UrnError::MissingModule(s.to_string()))?;
        if rest.contains(MODULE_SEPARATOR) {
            return Err(UrnError::Malformed(s.to_string()));
        }

        let (resource, fragment) = match rest.split_once(FRAGMENT_SEPARATOR) {
            Some((resource, fragment)) => (resource, Some(fragment)),
            None => (rest, None),
        };

        if module.is_empty() || resource.is_empty() || fragment.is_some_and(str::is_empty) {
            return Err(UrnError::Malformed(s.to_string()));
        }

        Ok(Self {
            module: module.to_string(),
            resource: resource.to_string(),
            fragment: fragment.map(str::to_string),
        })
    }
}

impl TryFrom<String> for ResourceUrn {
    type Error = UrnError;

    fn try_from(value: String) -> UrnResult<Self> {
        value.parse()
    }
}

impl From<ResourceUrn> for String {
    fn from(urn: ResourceUrn) -> Self {
        urn.to_string()
    }
}

/// Identifies a block family, optionally combined with a shape.
///
/// Rendered as `module:family` or `module:family:shapeModule:shape`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockUri {
    family: ResourceUrn,
    shape: Option<ResourceUrn>,
}

impl BlockUri {
    /// Creates a URI for a plain block family.
    #[must_use]
    pub fn new(family: ResourceUrn) -> Self {
        Self {
            family,
            shape: None,
        }
    }

    /// Creates a URI for a shaped block family.
    #[must_use]
    pub fn with_shape(family: ResourceUrn, shape: ResourceUrn) -> Self {
        Self {
            family,
            shape: Some(shape),
        }
    }

    /// The block family definition this URI belongs to.
    #[must_use]
    pub fn family(&self) -> &ResourceUrn {
        &self.family
    }

    /// The shape, if this is a shaped family.
    #[must_use]
    pub fn shape(&self) -> Option<&ResourceUrn> {
        self.shape.as_ref()
    }

    /// The unqualified family name (`stone` for `core:stone:engine:stair`).
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.family.resource()
    }

    /// Lowercased full URI, used as a lookup key.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for BlockUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        if let Some(shape) = &self.shape {
            write!(f, "{MODULE_SEPARATOR}{shape}")?;
        }
        Ok(())
    }
}

impl FromStr for BlockUri {
    type Err = UrnError;

    fn from_str(s: &str) -> UrnResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UrnError::Empty);
        }

        let parts: Vec<&str> = s.split(MODULE_SEPARATOR).collect();
        match parts.as_slice() {
            [_] => Err(UrnError::MissingModule(s.to_string())),
            [module, family] => Ok(Self::new(format!("{module}:{family}").parse()?)),
            [module, family, shape_module, shape] => Ok(Self::with_shape(
                format!("{module}:{family}").parse()?,
                format!("{shape_module}:{shape}").parse()?,
            )),
            _ => Err(UrnError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for BlockUri {
    type Error = UrnError;

    fn try_from(value: String) -> UrnResult<Self> {
        value.parse()
    }
}

impl From<BlockUri> for String {
    fn from(uri: BlockUri) -> Self {
        uri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_urn() {
        let urn: ResourceUrn = "core:stick".parse().expect("valid");
        assert_eq!(urn.module(), "core");
        assert_eq!(urn.resource(), "stick");
        assert_eq!(urn.fragment(), None);
    }

    #[test]
    fn test_parse_fragment_urn() {
        let urn: ResourceUrn = "core:tools#axe".parse().expect("valid");
        assert_eq!(urn.resource(), "tools");
        assert_eq!(urn.fragment(), Some("axe"));
        assert_eq!(urn.to_string(), "core:tools#axe");
    }

    #[test]
    fn test_parse_urn_errors() {
        assert_eq!("".parse::<ResourceUrn>(), Err(UrnError::Empty));
        assert!(matches!(
            "stick".parse::<ResourceUrn>(),
            Err(UrnError::MissingModule(_))
        ));
        assert!(matches!(
            "core:".parse::<ResourceUrn>(),
            Err(UrnError::Malformed(_))
        ));
        assert!(matches!(
            "a:b:c".parse::<ResourceUrn>(),
            Err(UrnError::Malformed(_))
        ));
        assert!(matches!(
            "core:tools#".parse::<ResourceUrn>(),
            Err(UrnError::Malformed(_))
        ));
    }

    #[test]
    fn test_urn_key_is_lowercase() {
        let urn = ResourceUrn::new("Core", "StoneAxe");
        assert_eq!(urn.key(), "core:stoneaxe");
    }

    #[test]
    fn test_block_uri_shaped() {
        let uri: BlockUri = "core:stone:engine:stair".parse().expect("valid");
        assert_eq!(uri.family().to_string(), "core:stone");
        assert_eq!(uri.shape().map(ToString::to_string).as_deref(), Some("engine:stair"));
        assert_eq!(uri.short_name(), "stone");
        assert_eq!(uri.to_string(), "core:stone:engine:stair");
    }

    #[test]
    fn test_block_uri_errors() {
        assert!(matches!(
            "stone".parse::<BlockUri>(),
            Err(UrnError::MissingModule(_))
        ));
        assert!(matches!(
            "a:b:c".parse::<BlockUri>(),
            Err(UrnError::Malformed(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_urn_display_parses_back(
            module in "[a-zA-Z][a-zA-Z0-9]{0,8}",
            resource in "[a-zA-Z][a-zA-Z0-9]{0,8}",
        ) {
            let urn = ResourceUrn::new(module, resource);
            let parsed: ResourceUrn = urn.to_string().parse().expect("valid");
            prop_assert_eq!(parsed, urn);
        }
    }
}

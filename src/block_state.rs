//! Block state argument encoding
//!
//! Serializes a block state (a registered block identifier plus its property
//! assignments) into the canonical `namespace:path[name=value,...]` form used
//! when a block state is passed as a command argument, and parses that form
//! back.
//!
//! Property order is the block's declared order. It is significant and is
//! never re-sorted.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace assumed when an identifier is written without one
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Errors produced while parsing a block state string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockStateParseError {
    #[error("block identifier is empty")]
    EmptyIdentifier,
    #[error("invalid block identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("property list is missing its closing ']'")]
    Unterminated,
    #[error("property '{0}' has no value")]
    MissingValue(String),
    #[error("property name is empty")]
    EmptyPropertyName,
    #[error("property '{0}' is set more than once")]
    DuplicateProperty(String),
    #[error("unexpected characters after property list: '{0}'")]
    TrailingCharacters(String),
}

/// Namespaced registry identifier (`namespace:path`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Build an identifier from already-validated parts
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Identifier in the default `minecraft` namespace
    pub fn minecraft(path: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl FromStr for Identifier {
    type Err = BlockStateParseError;

    /// Parse `namespace:path` or a bare `path` (default namespace)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BlockStateParseError::EmptyIdentifier);
        }

        let (namespace, path) = match s.split_once(':') {
            Some(("", path)) => (DEFAULT_NAMESPACE, path),
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, s),
        };

        if path.is_empty()
            || !namespace.chars().all(is_namespace_char)
            || !path.chars().all(is_path_char)
        {
            return Err(BlockStateParseError::InvalidIdentifier(s.to_string()));
        }

        Ok(Self::new(namespace, path))
    }
}

/// Read-only view of a block state, as supplied by the block registry
///
/// Implementors return the block's registered identifier and its property
/// assignments in the block's declared property order.
pub trait BlockStateView {
    /// Registered identifier of the block
    fn block_id(&self) -> &Identifier;

    /// `(name, value)` pairs in declared order
    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;
}

/// Encode a block state to its canonical argument string.
///
/// A block without properties encodes to its identifier alone; otherwise the
/// properties follow in brackets as comma-separated `name=value` pairs.
pub fn encode<S: BlockStateView + ?Sized>(state: &S) -> String {
    let mut out = state.block_id().to_string();

    let mut properties = state.properties().peekable();
    if properties.peek().is_none() {
        return out;
    }

    out.push('[');
    for (index, (name, value)) in properties.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
    out.push(']');

    out
}

/// A single property assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Owned block state: identifier plus properties in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    id: Identifier,
    properties: Vec<Property>,
}

impl BlockState {
    /// Block state with no properties
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            properties: Vec::new(),
        }
    }

    /// Append a property after the ones already declared
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Value assigned to `name`, if the block declares it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl BlockStateView for BlockState {
    fn block_id(&self) -> &Identifier {
        &self.id
    }

    fn properties(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.properties
                .iter()
                .map(|p| (p.name.as_str(), p.value.as_str())),
        )
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for BlockState {
    type Err = BlockStateParseError;

    /// Parse `id` or `id[name=value,...]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (id_part, rest) = match s.find('[') {
            Some(open) => (&s[..open], Some(&s[open + 1..])),
            None => (s, None),
        };

        let mut state = BlockState::new(id_part.parse()?);

        let Some(rest) = rest else {
            return Ok(state);
        };

        let close = rest.find(']').ok_or(BlockStateParseError::Unterminated)?;
        let trailing = &rest[close + 1..];
        if !trailing.is_empty() {
            return Err(BlockStateParseError::TrailingCharacters(
                trailing.to_string(),
            ));
        }

        let body = rest[..close].trim();
        if body.is_empty() {
            return Ok(state);
        }

        for entry in body.split(',') {
            let entry = entry.trim();
            let (name, value) = entry
                .split_once('=')
                .ok_or_else(|| BlockStateParseError::MissingValue(entry.to_string()))?;
            let (name, value) = (name.trim(), value.trim());

            if name.is_empty() {
                return Err(BlockStateParseError::EmptyPropertyName);
            }
            if value.is_empty() {
                return Err(BlockStateParseError::MissingValue(name.to_string()));
            }
            if state.get(name).is_some() {
                return Err(BlockStateParseError::DuplicateProperty(name.to_string()));
            }

            state = state.with_property(name, value);
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Registry-backed state that computes values on demand
    struct LeverState {
        id: Identifier,
        powered: bool,
    }

    impl BlockStateView for LeverState {
        fn block_id(&self) -> &Identifier {
            &self.id
        }

        fn properties(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
            let powered = if self.powered { "true" } else { "false" };
            Box::new(
                [("face", "wall"), ("facing", "north"), ("powered", powered)].into_iter(),
            )
        }
    }

    #[test]
    fn test_encode_without_properties() {
        let state = BlockState::new(Identifier::minecraft("stone"));
        assert_eq!(encode(&state), "minecraft:stone");
    }

    #[test]
    fn test_encode_keeps_declared_order() {
        let state = BlockState::new(Identifier::minecraft("repeater"))
            .with_property("facing", "east")
            .with_property("delay", "3")
            .with_property("locked", "false")
            .with_property("powered", "true");

        assert_eq!(
            encode(&state),
            "minecraft:repeater[facing=east,delay=3,locked=false,powered=true]"
        );
    }

    #[test]
    fn test_encode_single_property_has_no_comma() {
        let state =
            BlockState::new(Identifier::new("redstonetools", "probe")).with_property("mode", "a");
        assert_eq!(state.to_string(), "redstonetools:probe[mode=a]");
    }

    #[test]
    fn test_encode_view_implementation() {
        let lever = LeverState {
            id: Identifier::minecraft("lever"),
            powered: true,
        };
        assert_eq!(
            encode(&lever),
            "minecraft:lever[face=wall,facing=north,powered=true]"
        );
    }

    #[test]
    fn test_parse_identifier_defaults_namespace() {
        let id: Identifier = "redstone_wire".parse().unwrap();
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.path(), "redstone_wire");

        let id: Identifier = ":stone".parse().unwrap();
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn test_parse_identifier_rejects_bad_characters() {
        assert_eq!(
            "Minecraft:Stone".parse::<Identifier>(),
            Err(BlockStateParseError::InvalidIdentifier(
                "Minecraft:Stone".to_string()
            ))
        );
        assert_eq!(
            "".parse::<Identifier>(),
            Err(BlockStateParseError::EmptyIdentifier)
        );
        assert!("minecraft:".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_parse_block_state() {
        let state: BlockState = "minecraft:comparator[facing=north, mode=subtract,powered=false]"
            .parse()
            .unwrap();

        assert_eq!(state.id(), &Identifier::minecraft("comparator"));
        assert_eq!(state.property_count(), 3);
        assert_eq!(state.get("mode"), Some("subtract"));
        assert_eq!(
            state.to_string(),
            "minecraft:comparator[facing=north,mode=subtract,powered=false]"
        );
    }

    #[test]
    fn test_parse_empty_brackets() {
        let state: BlockState = "stone[]".parse().unwrap();
        assert_eq!(state.to_string(), "minecraft:stone");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "stone[powered=true".parse::<BlockState>(),
            Err(BlockStateParseError::Unterminated)
        );
        assert_eq!(
            "stone[powered]".parse::<BlockState>(),
            Err(BlockStateParseError::MissingValue("powered".to_string()))
        );
        assert_eq!(
            "stone[=true]".parse::<BlockState>(),
            Err(BlockStateParseError::EmptyPropertyName)
        );
        assert_eq!(
            "stone[a=1,a=2]".parse::<BlockState>(),
            Err(BlockStateParseError::DuplicateProperty("a".to_string()))
        );
        assert_eq!(
            "stone[a=1]x".parse::<BlockState>(),
            Err(BlockStateParseError::TrailingCharacters("x".to_string()))
        );
    }

    #[test]
    fn test_parse_inverts_encode() {
        let states = [
            BlockState::new(Identifier::minecraft("air")),
            BlockState::new(Identifier::minecraft("observer"))
                .with_property("facing", "up")
                .with_property("powered", "false"),
            BlockState::new(Identifier::new("mymod", "machines/press")).with_property("tier", "2"),
        ];

        for state in states {
            let parsed: BlockState = encode(&state).parse().unwrap();
            assert_eq!(parsed, state);
        }
    }
}

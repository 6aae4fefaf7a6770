//! Keyword dispatch.
//!
//! The dispatcher looks at which keywords a node carries and hands it to the
//! matching rule in a fixed precedence order:
//!
//! 1. `$ref`
//! 2. `enum` / `const`
//! 3. object-shaped (`type: object`, `properties`, `patternProperties`,
//!    `additionalProperties`)
//! 4. array-shaped (`type: array`, `items`)
//! 5. primitive `type`
//! 6. combinators (`oneOf`, `anyOf`, `allOf`)
//! 7. otherwise the generic fallback
//!
//! The dedup cache is consulted before any rule runs and every result is
//! bound to the node identity afterwards. A node re-entered while its own
//! rule is still running is a cycle: a wrapper record is declared for it, or,
//! when the cycle is nothing but `$ref`s, resolution fails.
pub mod additional_properties;
pub mod array;
pub mod catch_all;
pub mod combinator;
pub mod object;
pub mod pattern_properties;
pub mod primitive;
pub mod properties;
pub mod reference;

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, trace};

use crate::arena::{Frame, TypeArena};
use crate::error::{GenerationError, Result};
use crate::ir::{DefaultValue, GeneratedProperty, RecordId, TypeId, Visibility};
use crate::registry::Registry;
use crate::schema::{NodeId, SchemaNode};

/// Resolves a schema node to a type, re-entering itself for sub-schemas.
pub trait Dispatch: Send + Sync {
    fn resolve(
        &self,
        registry: &Registry,
        arena: &mut TypeArena,
        name: &str,
        node: &SchemaNode<'_>,
        scope: Scope,
    ) -> Result<TypeId>;
}

/// Where newly generated nested types are declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope {
    pub parent: Option<RecordId>,
}

impl Scope {
    pub fn top_level() -> Self {
        Self { parent: None }
    }
    pub fn within(record: RecordId) -> Self {
        Self { parent: Some(record) }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// KEYWORDS
// ————————————————————————————————————————————————————————————————————————————

/// Keywords the engine knows, ordered by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    Ref,
    Enum,
    Const,
    Type,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Items,
    OneOf,
    AnyOf,
    AllOf,
    /// Accepted but without effect on the generated type.
    Annotation,
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut table = HashMap::from([
        ("$ref", Keyword::Ref),
        ("enum", Keyword::Enum),
        ("const", Keyword::Const),
        ("type", Keyword::Type),
        ("properties", Keyword::Properties),
        ("patternProperties", Keyword::PatternProperties),
        ("additionalProperties", Keyword::AdditionalProperties),
        ("items", Keyword::Items),
        ("oneOf", Keyword::OneOf),
        ("anyOf", Keyword::AnyOf),
        ("allOf", Keyword::AllOf),
    ]);
    for annotation in [
        "$schema", "$id", "id", "$comment", "title", "description", "default", "examples",
        "format", "pattern", "minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum",
        "multipleOf", "minLength", "maxLength", "minItems", "maxItems", "uniqueItems",
        "minProperties", "maxProperties", "required", "definitions", "$defs", "readOnly",
        "writeOnly", "deprecated", "dependencies", "propertyNames", "not", "contentEncoding",
        "contentMediaType",
    ] {
        table.insert(annotation, Keyword::Annotation);
    }
    table
});

/// Classify every keyword on `node`; unknown ones are an error.
/// `x-` vendor extensions are tolerated.
pub fn keywords_of(node: &SchemaNode<'_>) -> Result<BTreeSet<Keyword>> {
    let mut present = BTreeSet::new();
    for keyword in node.keywords() {
        match KEYWORDS.get(keyword) {
            Some(kind) => {
                present.insert(*kind);
            }
            None if keyword.starts_with("x-") => {}
            None => {
                return Err(GenerationError::UnsupportedKeyword {
                    path: node.id().clone(),
                    keyword: keyword.to_string(),
                });
            }
        }
    }
    Ok(present)
}

/// The node's `type`, picking the first non-null entry of a type list.
pub fn declared_type<'a>(node: &SchemaNode<'a>) -> Result<Option<&'a str>> {
    let Some(ty) = node.keyword("type") else {
        return Ok(None);
    };
    match ty.value() {
        Value::String(s) => Ok(Some(s.as_str())),
        Value::Array(items) => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                let name = item
                    .as_str()
                    .ok_or_else(|| GenerationError::malformed(ty.id(), "a list of type names"))?;
                names.push(name);
            }
            Ok(names.iter().copied().find(|n| *n != "null").or(names.first().copied()))
        }
        _ => Err(GenerationError::malformed(ty.id(), "a type name or list of type names")),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DISPATCHER
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Default, Clone, Copy)]
pub struct RuleDispatcher;

impl Dispatch for RuleDispatcher {
    fn resolve(
        &self,
        registry: &Registry,
        arena: &mut TypeArena,
        name: &str,
        node: &SchemaNode<'_>,
        scope: Scope,
    ) -> Result<TypeId> {
        if let Some(ty) = arena.lookup(node.id()) {
            trace!(node = %node.id(), "dedup cache hit");
            return Ok(ty);
        }
        if let Some(cycle) = arena.in_progress(node.id()).map(<[Frame]>::to_vec) {
            return reenter(registry, arena, node, cycle);
        }
        let ty = match node.value() {
            Value::Bool(_) => arena.any(),
            Value::Object(_) => {
                arena.enter(Frame {
                    node: node.id().clone(),
                    name: name.to_string(),
                    parent: scope.parent,
                    reference: node.has("$ref"),
                });
                let result = apply_rules(registry, arena, name, node, scope);
                arena.leave(node.id());
                result?
            }
            _ => return Err(GenerationError::malformed(node.id(), "a schema object or boolean")),
        };
        let bound = arena.remember(node.id().clone(), ty);
        if let Some(wrapper) = arena.take_promoted(node.id()) {
            if bound == ty {
                // the node resolved to its own wrapper: an alias of itself
                return Err(cycle_error(node, &[node.id().clone()]));
            }
            arena.record_mut(wrapper).add_field(GeneratedProperty {
                name: WRAPPED_FIELD.to_string(),
                ty,
                json_name: None,
                required: true,
                default: DefaultValue::Unset,
                visibility: Visibility::Public,
                key_patterns: Vec::new(),
                origin: node.id().clone(),
            })?;
        }
        Ok(bound)
    }
}

/// Member of the wrapper record a cyclic map or list node is promoted to.
pub const WRAPPED_FIELD: &str = "value";

/// `node` came back around before its rule finished. A cycle made only of
/// `$ref`s has no type to offer; anything else gets a wrapper record, which
/// the outer resolution fills in.
fn reenter(
    registry: &Registry,
    arena: &mut TypeArena,
    node: &SchemaNode<'_>,
    cycle: Vec<Frame>,
) -> Result<TypeId> {
    if cycle.iter().all(|frame| frame.reference) {
        let nodes: Vec<_> = cycle.into_iter().map(|frame| frame.node).collect();
        return Err(cycle_error(node, &nodes));
    }
    let origin = &cycle[0];
    let type_name = registry.namer().type_name(&origin.name, node);
    debug!(node = %node.id(), record = %type_name, "cycle without a record, promoting");
    Ok(arena.promote(&type_name, node.id().clone(), origin.parent))
}

fn cycle_error(node: &SchemaNode<'_>, nodes: &[NodeId]) -> GenerationError {
    let cycle = nodes
        .iter()
        .chain(std::iter::once(node.id()))
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ");
    GenerationError::ReferenceCycle { path: node.id().clone(), cycle }
}

fn apply_rules(
    registry: &Registry,
    arena: &mut TypeArena,
    name: &str,
    node: &SchemaNode<'_>,
    scope: Scope,
) -> Result<TypeId> {
    let present = keywords_of(node)?;
    let declared = declared_type(node)?;
    debug!(node = %node.id(), name, ?declared, "dispatching");

    if present.contains(&Keyword::Ref) {
        return reference::resolve(registry, arena, name, node, scope);
    }
    if present.contains(&Keyword::Enum) || present.contains(&Keyword::Const) {
        return primitive::resolve_enum(arena, node);
    }
    let object_shaped = declared == Some("object")
        || present.contains(&Keyword::Properties)
        || present.contains(&Keyword::PatternProperties)
        || present.contains(&Keyword::AdditionalProperties);
    if object_shaped {
        return object::resolve(registry, arena, name, node, scope);
    }
    if declared == Some("array") || present.contains(&Keyword::Items) {
        return array::resolve(registry, arena, name, node, scope);
    }
    if let Some(declared) = declared {
        return primitive::resolve_type(arena, node, declared);
    }
    if present.contains(&Keyword::OneOf)
        || present.contains(&Keyword::AnyOf)
        || present.contains(&Keyword::AllOf)
    {
        return combinator::resolve(registry, arena, name, node, scope);
    }
    Ok(arena.any())
}

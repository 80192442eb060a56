//! Primitive signatures and the ordered registry the search samples from.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ComposeError, ErrorInfo};
use crate::multiset::{TypeMultiset, TypeName};

/// Position of a primitive inside a [`PrimitiveRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the registry index of the primitive.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Keyword-style input of a primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Keyword the argument is passed under.
    pub name: String,
    /// Type expected for the argument.
    #[serde(rename = "type")]
    pub ty: TypeName,
}

/// Immutable type signature of a primitive.
///
/// Input order is irrelevant to the search (keyword style); output order
/// defines the wiring correspondence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveSpec {
    /// Unique primitive name.
    pub name: String,
    /// Named inputs.
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    /// Ordered output types.
    pub outputs: Vec<TypeName>,
}

impl PrimitiveSpec {
    /// Starts a signature with no inputs and no outputs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Appends a named input.
    pub fn input(mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        self.inputs.push(Parameter {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    /// Appends an output type.
    pub fn output(mut self, ty: impl Into<TypeName>) -> Self {
        self.outputs.push(ty.into());
        self
    }

    /// Multiset of the input types.
    pub fn input_types(&self) -> TypeMultiset {
        self.inputs.iter().map(|param| param.ty.clone()).collect()
    }

    /// Multiset of the output types.
    pub fn output_types(&self) -> TypeMultiset {
        self.outputs.iter().cloned().collect()
    }

    fn validate(&self) -> Result<(), ComposeError> {
        if self.name.trim().is_empty() {
            return Err(invalid("blank-primitive-name", "primitive names must not be blank"));
        }
        if self.outputs.is_empty() {
            return Err(ComposeError::InvalidSpecification(
                ErrorInfo::new(
                    "primitive-without-outputs",
                    "a primitive must produce at least one output",
                )
                .with_context("primitive", self.name.clone()),
            ));
        }
        let mut seen = BTreeSet::new();
        for param in &self.inputs {
            if !seen.insert(param.name.as_str()) {
                return Err(ComposeError::InvalidSpecification(
                    ErrorInfo::new("duplicate-parameter", "parameter names must be unique")
                        .with_context("primitive", self.name.clone())
                        .with_context("parameter", param.name.clone()),
                ));
            }
        }
        let blank = self
            .inputs
            .iter()
            .map(|param| &param.ty)
            .chain(self.outputs.iter())
            .any(TypeName::is_blank);
        if blank {
            return Err(ComposeError::InvalidSpecification(
                ErrorInfo::new("blank-type-name", "type names must not be blank")
                    .with_context("primitive", self.name.clone()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    spec: PrimitiveSpec,
    inputs: TypeMultiset,
    outputs: TypeMultiset,
}

impl RegistryEntry {
    fn new(spec: PrimitiveSpec) -> Self {
        let inputs = spec.input_types();
        let outputs = spec.output_types();
        Self {
            spec,
            inputs,
            outputs,
        }
    }
}

/// Ordered collection of primitive signatures keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RegistryDocument", into = "RegistryDocument")]
pub struct PrimitiveRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

/// On-disk layout of a registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryDocument {
    primitives: Vec<PrimitiveSpec>,
}

impl TryFrom<RegistryDocument> for PrimitiveRegistry {
    type Error = ComposeError;

    fn try_from(value: RegistryDocument) -> Result<Self, Self::Error> {
        PrimitiveRegistry::from_specs(value.primitives)
    }
}

impl From<PrimitiveRegistry> for RegistryDocument {
    fn from(value: PrimitiveRegistry) -> Self {
        RegistryDocument {
            primitives: value.entries.into_values().map(|entry| entry.spec).collect(),
        }
    }
}

impl PrimitiveRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from signatures, preserving their order.
    pub fn from_specs<I>(specs: I) -> Result<Self, ComposeError>
    where
        I: IntoIterator<Item = PrimitiveSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.push(spec)?;
        }
        Ok(registry)
    }

    /// Builds a registry from signatures that are known to be valid and unique.
    pub(crate) fn from_trusted(specs: Vec<PrimitiveSpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), RegistryEntry::new(spec)))
            .collect();
        Self { entries }
    }

    /// Appends a signature and returns its identifier.
    pub fn push(&mut self, spec: PrimitiveSpec) -> Result<PrimitiveId, ComposeError> {
        spec.validate()?;
        if self.entries.contains_key(&spec.name) {
            return Err(ComposeError::InvalidSpecification(
                ErrorInfo::new("duplicate-primitive", "primitive names must be unique")
                    .with_context("primitive", spec.name.clone()),
            ));
        }
        let id = PrimitiveId::from_raw(self.entries.len() as u32);
        self.entries.insert(spec.name.clone(), RegistryEntry::new(spec));
        Ok(id)
    }

    /// Number of registered primitives.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no primitive is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the signature registered under `id`.
    pub fn get(&self, id: PrimitiveId) -> Option<&PrimitiveSpec> {
        self.entries.get_index(id.index()).map(|(_, entry)| &entry.spec)
    }

    /// Returns the signature registered under `id` or a specification error.
    pub fn spec(&self, id: PrimitiveId) -> Result<&PrimitiveSpec, ComposeError> {
        self.get(id).ok_or_else(|| {
            ComposeError::InvalidSpecification(
                ErrorInfo::new("unknown-primitive", "primitive id is not registered")
                    .with_context("primitive", id.to_string())
                    .with_context("registered", self.len().to_string()),
            )
        })
    }

    /// Looks a primitive up by name.
    pub fn by_name(&self, name: &str) -> Option<(PrimitiveId, &PrimitiveSpec)> {
        self.entries
            .get_full(name)
            .map(|(index, _, entry)| (PrimitiveId::from_raw(index as u32), &entry.spec))
    }

    /// Iterates over all signatures in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &PrimitiveSpec)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(index, entry)| (PrimitiveId::from_raw(index as u32), &entry.spec))
    }

    /// Cached multiset of input types of every primitive, in registration order.
    pub fn input_multisets(&self) -> impl Iterator<Item = &TypeMultiset> + '_ {
        self.entries.values().map(|entry| &entry.inputs)
    }

    /// Cached multiset of output types of every primitive, in registration order.
    pub fn output_multisets(&self) -> impl Iterator<Item = &TypeMultiset> + '_ {
        self.entries.values().map(|entry| &entry.outputs)
    }

    /// Returns whether any primitive produces `ty`.
    pub fn produces(&self, ty: &TypeName) -> bool {
        self.entries.values().any(|entry| entry.outputs.contains(ty))
    }

    /// Parses a registry from a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ComposeError> {
        serde_yaml::from_str(source).map_err(|err| {
            ComposeError::Serde(ErrorInfo::new("registry-parse-yaml", err.to_string()))
        })
    }

    /// Parses a registry from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ComposeError> {
        serde_json::from_str(source).map_err(|err| {
            ComposeError::Serde(ErrorInfo::new("registry-parse-json", err.to_string()))
        })
    }

    /// Renders the registry as a YAML document.
    pub fn to_yaml_string(&self) -> Result<String, ComposeError> {
        serde_yaml::to_string(self).map_err(|err| {
            ComposeError::Serde(ErrorInfo::new("registry-serialize-yaml", err.to_string()))
        })
    }

    /// Renders the registry as a pretty JSON document.
    pub fn to_json_string(&self) -> Result<String, ComposeError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ComposeError::Serde(ErrorInfo::new("registry-serialize-json", err.to_string()))
        })
    }
}

fn invalid(code: &str, message: &str) -> ComposeError {
    ComposeError::InvalidSpecification(ErrorInfo::new(code, message))
}

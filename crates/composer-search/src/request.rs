use std::collections::BTreeMap;

use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{TypeMultiset, TypeName};
use serde::{Deserialize, Serialize};

/// Validated synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Desired graph inputs.
    pub input_type: TypeMultiset,
    /// Desired graph outputs; the position of each entry is the output index.
    pub output_type: Vec<TypeName>,
    /// Bound on the longest composition chain.
    pub max_depth: u32,
}

impl SynthesisRequest {
    /// Builds and validates a request.
    pub fn new(
        input_type: TypeMultiset,
        output_type: Vec<TypeName>,
        max_depth: u32,
    ) -> Result<Self, ComposeError> {
        let request = Self {
            input_type,
            output_type,
            max_depth,
        };
        request.validate()?;
        Ok(request)
    }

    /// Rejects empty outputs, blank type names and a zero depth bound.
    pub fn validate(&self) -> Result<(), ComposeError> {
        if self.max_depth == 0 {
            return Err(ComposeError::InvalidSpecification(
                ErrorInfo::new("non-positive-max-depth", "max_depth must be at least 1")
                    .with_context("max_depth", "0"),
            ));
        }
        if self.output_type.is_empty() {
            return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                "empty-output-type",
                "at least one output type is required",
            )));
        }
        let blank = self
            .output_type
            .iter()
            .chain(self.input_type.distinct())
            .any(TypeName::is_blank);
        if blank {
            return Err(ComposeError::InvalidSpecification(ErrorInfo::new(
                "blank-type-name",
                "type names must not be empty",
            )));
        }
        Ok(())
    }

    /// Output types as a multiset.
    pub fn output_multiset(&self) -> TypeMultiset {
        self.output_type.iter().cloned().collect()
    }
}

/// Inputs written either as a list of type names or as a `type: count` map.
///
/// Counts are signed so that negative multiplicities reach validation instead
/// of failing inside the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeMultisetSpec {
    /// One entry per occurrence.
    List(Vec<TypeName>),
    /// Multiplicity per type.
    Counts(BTreeMap<TypeName, i64>),
}

impl Default for TypeMultisetSpec {
    fn default() -> Self {
        TypeMultisetSpec::List(Vec::new())
    }
}

impl TypeMultisetSpec {
    /// Converts the document form into a multiset.
    pub fn to_multiset(&self) -> Result<TypeMultiset, ComposeError> {
        match self {
            TypeMultisetSpec::List(types) => Ok(types.iter().cloned().collect()),
            TypeMultisetSpec::Counts(counts) => TypeMultiset::from_counts(
                counts.iter().map(|(ty, count)| (ty.clone(), *count)),
            ),
        }
    }
}

/// Document form of a [`SynthesisRequest`] as found in job files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Desired graph inputs.
    #[serde(default)]
    pub inputs: TypeMultisetSpec,
    /// Desired graph outputs in order.
    pub outputs: Vec<TypeName>,
    /// Depth bound; values below 1 are rejected.
    pub max_depth: i64,
}

impl RequestSpec {
    /// Validates the document and produces a request.
    pub fn to_request(&self) -> Result<SynthesisRequest, ComposeError> {
        let max_depth = u32::try_from(self.max_depth)
            .ok()
            .filter(|depth| *depth > 0)
            .ok_or_else(|| {
                ComposeError::InvalidSpecification(
                    ErrorInfo::new("non-positive-max-depth", "max_depth must be at least 1")
                        .with_context("max_depth", self.max_depth.to_string()),
                )
            })?;
        SynthesisRequest::new(self.inputs.to_multiset()?, self.outputs.clone(), max_depth)
    }
}

impl From<&SynthesisRequest> for RequestSpec {
    fn from(request: &SynthesisRequest) -> Self {
        let counts = request
            .input_type
            .iter()
            .map(|(ty, count)| (ty.clone(), count as i64))
            .collect();
        Self {
            inputs: TypeMultisetSpec::Counts(counts),
            outputs: request.output_type.clone(),
            max_depth: i64::from(request.max_depth),
        }
    }
}

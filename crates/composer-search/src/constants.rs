use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use composer_core::catalog::{FLOAT, INT, STR};
use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{RngHandle, TypeName};
use composer_graph::Literal;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Produces literal values of one type during the depth-exhaustion fallback.
pub trait ConstantGenerator: Send + Sync {
    /// Generates a fresh literal.
    fn generate(&self, rng: &mut RngHandle) -> Literal;
}

/// Adapter turning a closure into a [`ConstantGenerator`].
pub struct FromFn<F>(pub F);

impl<F> ConstantGenerator for FromFn<F>
where
    F: Fn(&mut RngHandle) -> Literal + Send + Sync,
{
    fn generate(&self, rng: &mut RngHandle) -> Literal {
        (self.0)(rng)
    }
}

/// Declarative generator, as written in job files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GeneratorSpec {
    /// Uniform integer in `[min, max]`.
    IntRange {
        /// Lower bound (inclusive).
        min: i64,
        /// Upper bound (inclusive).
        max: i64,
    },
    /// Uniform float in `[min, max)`.
    FloatRange {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (exclusive unless equal to `min`).
        max: f64,
    },
    /// Lowercase ASCII string with a uniform length in `[min_len, max_len]`.
    LowercaseString {
        /// Shortest length.
        min_len: usize,
        /// Longest length.
        max_len: usize,
    },
    /// Fair coin.
    Bool,
    /// Always the same literal.
    Fixed {
        /// Literal returned on every call.
        value: Literal,
    },
}

impl GeneratorSpec {
    /// Rejects empty or non-finite ranges.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let problem = match self {
            GeneratorSpec::IntRange { min, max } if min > max => Some("min exceeds max"),
            GeneratorSpec::FloatRange { min, max }
                if !min.is_finite() || !max.is_finite() || min > max =>
            {
                Some("bounds must be finite with min <= max")
            }
            GeneratorSpec::LowercaseString { min_len, max_len }
                if *min_len == 0 || min_len > max_len =>
            {
                Some("lengths must satisfy 1 <= min_len <= max_len")
            }
            _ => None,
        };
        match problem {
            Some(reason) => Err(ComposeError::InvalidSpecification(
                ErrorInfo::new("invalid-generator", "constant generator is malformed")
                    .with_context("reason", reason),
            )),
            None => Ok(()),
        }
    }
}

impl ConstantGenerator for GeneratorSpec {
    fn generate(&self, rng: &mut RngHandle) -> Literal {
        match self {
            GeneratorSpec::IntRange { min, max } => Literal::Int(rng.gen_range(*min..=*max)),
            GeneratorSpec::FloatRange { min, max } => {
                if min >= max {
                    Literal::Float(*min)
                } else {
                    Literal::Float(rng.gen_range(*min..*max))
                }
            }
            GeneratorSpec::LowercaseString { min_len, max_len } => {
                let len = rng.gen_range(*min_len..=*max_len);
                let text = (0..len)
                    .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
                    .collect();
                Literal::Str(text)
            }
            GeneratorSpec::Bool => Literal::Bool(rng.gen_bool(0.5)),
            GeneratorSpec::Fixed { value } => value.clone(),
        }
    }
}

/// Mapping from type to constant generator; may be partial.
#[derive(Clone, Default)]
pub struct ConstantTable {
    generators: BTreeMap<TypeName, Arc<dyn ConstantGenerator>>,
}

impl ConstantTable {
    /// Creates a table without generators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generators for `int` in `[0, 5]`, `float` in `[-2, 2)` and
    /// lowercase `str` of length 1 to 5.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert(INT, GeneratorSpec::IntRange { min: 0, max: 5 });
        table.insert(FLOAT, GeneratorSpec::FloatRange { min: -2.0, max: 2.0 });
        table.insert(
            STR,
            GeneratorSpec::LowercaseString {
                min_len: 1,
                max_len: 5,
            },
        );
        table
    }

    /// Builds a table from declarative specs, validating each one.
    pub fn from_specs(specs: &BTreeMap<TypeName, GeneratorSpec>) -> Result<Self, ComposeError> {
        let mut table = Self::new();
        for (ty, spec) in specs {
            spec.validate().map_err(|err| with_type(err, ty))?;
            table.insert(ty.clone(), spec.clone());
        }
        Ok(table)
    }

    /// Registers `generator` for `ty`, replacing any previous one.
    pub fn insert<G>(&mut self, ty: impl Into<TypeName>, generator: G)
    where
        G: ConstantGenerator + 'static,
    {
        self.generators.insert(ty.into(), Arc::new(generator));
    }

    /// Registers a closure for `ty`.
    pub fn insert_fn<F>(&mut self, ty: impl Into<TypeName>, generator: F)
    where
        F: Fn(&mut RngHandle) -> Literal + Send + Sync + 'static,
    {
        self.insert(ty, FromFn(generator));
    }

    /// Returns whether a generator exists for `ty`.
    pub fn has(&self, ty: &TypeName) -> bool {
        self.generators.contains_key(ty)
    }

    /// Generates a literal for `ty`, or `None` without a generator.
    pub fn generate(&self, ty: &TypeName, rng: &mut RngHandle) -> Option<Literal> {
        self.generators.get(ty).map(|generator| generator.generate(rng))
    }

    /// Types with a generator, in ascending order.
    pub fn types(&self) -> impl Iterator<Item = &TypeName> + '_ {
        self.generators.keys()
    }
}

impl fmt::Debug for ConstantTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.generators.keys()).finish()
    }
}

fn with_type(err: ComposeError, ty: &TypeName) -> ComposeError {
    match err {
        ComposeError::InvalidSpecification(info) => {
            ComposeError::InvalidSpecification(info.with_context("type", ty.as_str()))
        }
        other => other,
    }
}

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use composer_core::{catalog, PrimitiveRegistry, TypeName};
use composer_search::{
    Composer, ConstantTable, GeneratorSpec, RequestSpec, SearchConfig, SynthesisRequest,
};
use serde::Deserialize;

/// Everything needed to run a synthesis from the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub request: RequestSpec,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    #[serde(default)]
    pub constants: Option<BTreeMap<TypeName, GeneratorSpec>>,
    /// Registry document; relative paths resolve against the job file.
    #[serde(default)]
    pub registry: Option<PathBuf>,
    #[serde(default)]
    pub seed: u64,
}

/// Job file together with the directory it was read from.
#[derive(Debug, Clone)]
pub struct LoadedJob {
    pub job: JobFile,
    base_dir: PathBuf,
}

impl LoadedJob {
    pub fn read(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("failed to read job {}: {err}", path.display()))?;
        let job: JobFile = serde_yaml::from_str(&text)
            .map_err(|err| format!("failed to parse job {}: {err}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self { job, base_dir })
    }

    pub fn request(&self) -> Result<SynthesisRequest, Box<dyn Error>> {
        Ok(self.job.request.to_request()?)
    }

    /// Builds the composer; `registry_override` wins over the job's registry path.
    pub fn composer(&self, registry_override: Option<&Path>) -> Result<Composer, Box<dyn Error>> {
        let registry = match registry_override {
            Some(path) => load_registry(path)?,
            None => match &self.job.registry {
                Some(path) => load_registry(&self.base_dir.join(path))?,
                None => catalog::standard(),
            },
        };
        let constants = match &self.job.constants {
            Some(specs) => ConstantTable::from_specs(specs)?,
            None => ConstantTable::standard(),
        };
        let config = self.job.search.clone().unwrap_or_default();
        Ok(Composer::new(registry, constants, config)?)
    }

    pub fn seed(&self, seed_override: Option<u64>) -> u64 {
        seed_override.unwrap_or(self.job.seed)
    }
}

/// Loads a registry, choosing JSON or YAML from the file extension.
pub fn load_registry(path: &Path) -> Result<PrimitiveRegistry, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read registry {}: {err}", path.display()))?;
    let registry = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => PrimitiveRegistry::from_json_str(&text)?,
        _ => PrimitiveRegistry::from_yaml_str(&text)?,
    };
    Ok(registry)
}

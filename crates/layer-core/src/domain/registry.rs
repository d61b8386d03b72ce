//! Generator registry and the generation pass.
//!
//! A registry maps each [`Bucket`] to an ordered list of generator functions.
//! It is an immutable value: customizing it yields a new registry, cloning
//! the underlying table only when it is shared. Iteration follows the fixed
//! bucket order, then registration order, so a pass is reproducible.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument, trace};

use crate::domain::{
    entities::{GeneratedFile, Package, Service},
    generators,
    value_objects::{Bucket, Variant},
};

/// A unit of code generation.
///
/// Most generators return zero or one file; handler stubs return one file
/// per distinct handler name.
pub type GeneratorFn = fn(&Service, &GenerationConfig) -> Vec<GeneratedFile>;

#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    buckets: Arc<BTreeMap<Bucket, Vec<GeneratorFn>>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pre-registered bundle of `variant`, built once per process.
    pub fn for_variant(variant: Variant) -> Self {
        static API: OnceLock<GeneratorRegistry> = OnceLock::new();
        static BROKER: OnceLock<GeneratorRegistry> = OnceLock::new();
        static LISTENER: OnceLock<GeneratorRegistry> = OnceLock::new();

        let cell = match variant {
            Variant::Api => &API,
            Variant::Broker => &BROKER,
            Variant::Listener => &LISTENER,
        };
        cell.get_or_init(|| generators::bundle(variant)).clone()
    }

    /// Appends `generator` to `bucket`.
    pub fn with_generator(mut self, bucket: Bucket, generator: GeneratorFn) -> Self {
        Arc::make_mut(&mut self.buckets)
            .entry(bucket)
            .or_default()
            .push(generator);
        self
    }

    /// Replaces the generators of `bucket`; an empty list removes the bucket.
    pub fn with_bucket(mut self, bucket: Bucket, generators: Vec<GeneratorFn>) -> Self {
        let table = Arc::make_mut(&mut self.buckets);
        if generators.is_empty() {
            table.remove(&bucket);
        } else {
            table.insert(bucket, generators);
        }
        self
    }

    pub fn without_bucket(self, bucket: Bucket) -> Self {
        self.with_bucket(bucket, Vec::new())
    }

    pub fn generators(&self, bucket: Bucket) -> &[GeneratorFn] {
        self.buckets.get(&bucket).map_or(&[], Vec::as_slice)
    }

    /// Buckets in generation order with their generators.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[GeneratorFn])> {
        self.buckets.iter().map(|(b, g)| (*b, g.as_slice()))
    }

    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        self.buckets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both registries share one table.
    pub fn shares_table_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buckets, &other.buckets)
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().map(|(b, g)| (b.as_str(), g.len())))
            .finish()
    }
}

/// Input and output of a generation pass.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub services: Vec<Service>,
    /// Applies to every service when set; otherwise each service uses the
    /// bundle of its variant.
    pub registry: Option<GeneratorRegistry>,
}

impl GenerationConfig {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn registry_for(&self, variant: Variant) -> GeneratorRegistry {
        self.registry
            .clone()
            .unwrap_or_else(|| GeneratorRegistry::for_variant(variant))
    }

    /// Runs every registered generator for `service`.
    ///
    /// Buckets that produce no files are omitted.
    pub fn packages_for(&self, service: &Service) -> Vec<Package> {
        let registry = self.registry_for(service.variant);
        let mut packages = Vec::new();

        for (bucket, generators) in registry.iter() {
            let files: Vec<GeneratedFile> = generators
                .iter()
                .flat_map(|generate| generate(service, self))
                .collect();

            trace!(service = %service.name, %bucket, files = files.len(), "Bucket generated");
            if !files.is_empty() {
                packages.push(Package { bucket, files });
            }
        }
        packages
    }

    /// Generates packages for every service.
    ///
    /// Packages are recomputed from scratch, so running the pass twice
    /// gives the same result as running it once.
    #[instrument(skip_all, fields(services = self.services.len()))]
    pub fn generate(mut self) -> Self {
        let packages: Vec<Vec<Package>> = self
            .services
            .iter()
            .map(|service| self.packages_for(service))
            .collect();

        for (service, packages) in self.services.iter_mut().zip(packages) {
            debug!(service = %service.name, packages = packages.len(), "Service generated");
            service.packages = packages;
        }
        self
    }

    /// Generates one service with this configuration as context.
    pub fn generate_service(&self, mut service: Service) -> Service {
        service.packages = self.packages_for(&service);
        service
    }

    pub fn into_services(self) -> Vec<Service> {
        self.services
    }
}

/// `Generate(config) -> config'`
pub fn generate(config: GenerationConfig) -> GenerationConfig {
    config.generate()
}

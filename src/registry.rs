//! The table of live value kinds
//!
//! A [`Registry`] is built once, filled with descriptors before any tree is
//! compiled, and then only read. It is passed explicitly to everything that
//! builds or evaluates nodes, so tests can use isolated registries.

use std::fmt;

use slog::{debug, o, Logger};

use crate::config::RuntimeConfig;
use crate::error::FtypeError;
use crate::ftype::{CmpOp, TypeDescriptor, Value, ValueKind};

#[derive(Clone)]
pub struct Registry {
    descriptors: [Option<TypeDescriptor>; ValueKind::COUNT],
    config: RuntimeConfig,
    logger: Logger,
}

impl Registry {
    /// A registry with no kinds registered yet
    pub fn empty(config: RuntimeConfig, logger: Logger) -> Self {
        Self {
            descriptors: [None; ValueKind::COUNT],
            config,
            logger,
        }
    }

    /// Every standard kind, default configuration, logs discarded
    pub fn new() -> Self {
        Self::with_config(
            RuntimeConfig::default(),
            Logger::root(slog::Discard, o!()),
        )
    }

    /// Every standard kind under the given configuration
    pub fn with_config(config: RuntimeConfig, logger: Logger) -> Self {
        let mut registry = Self::empty(config, logger);
        registry.init_standard();
        registry
    }

    /// Install the descriptor for `kind`. Registering a kind twice is a bug.
    pub fn register(&mut self, kind: ValueKind, descriptor: TypeDescriptor) {
        assert_eq!(
            descriptor.kind(),
            kind,
            "descriptor for {} registered as {kind}",
            descriptor.kind()
        );
        let slot = &mut self.descriptors[kind.id()];
        assert!(slot.is_none(), "type {kind} registered twice");
        *slot = Some(descriptor);

        debug!(self.logger, "registered value kind"; "kind" => kind.id(), "name" => kind.name());
    }

    /// Register every standard kind that is still missing. Safe to call
    /// repeatedly.
    pub fn init_standard(&mut self) {
        for kind in ValueKind::ALL {
            if !self.is_registered(kind) {
                self.register(kind, TypeDescriptor::new(kind));
            }
        }
    }

    /// Descriptor for a kind the caller knows is registered
    pub fn lookup(&self, kind: ValueKind) -> &TypeDescriptor {
        match &self.descriptors[kind.id()] {
            Some(descriptor) => descriptor,
            None => panic!("type {kind} is not registered"),
        }
    }

    pub fn get(&self, kind: ValueKind) -> Option<&TypeDescriptor> {
        self.descriptors[kind.id()].as_ref()
    }

    pub fn is_registered(&self, kind: ValueKind) -> bool {
        self.descriptors[kind.id()].is_some()
    }

    /// Registered kinds in id order
    pub fn kinds(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter().flatten()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Parse a literal token as `kind`
    pub fn from_text(&self, kind: ValueKind, text: &str) -> Result<Value, FtypeError> {
        self.lookup(kind).from_text(text, &self.config)
    }

    /// `a op b` using the comparison of `a`'s kind
    pub fn compare(&self, op: CmpOp, a: &Value, b: &Value) -> Result<bool, FtypeError> {
        self.lookup(a.kind()).compare(op, a, b)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds().map(TypeDescriptor::name).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

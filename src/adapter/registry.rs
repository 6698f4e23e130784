//! Adapter registration and lookup
//!
//! Each adapter joins the registry with a static descriptor plus a factory;
//! built-ins and user extensions register through the same call. Names are
//! unique across the whole registry, not per kind, and listing order is
//! registration order.

use std::collections::HashMap;

use thiserror::Error;

use super::{
    json_store, text_report, xml_library, AdapterDescriptor, AdapterError, AdapterKind,
    ResolvedParams, SongReader, SongWriter,
};

/// Errors raised while assembling the adapter registry. Fatal at startup,
/// before any I/O.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate adapter name '{name}'")]
    DuplicateName { name: String },

    #[error("adapter '{name}' declares kind '{declared}' but registered a {actual} factory")]
    KindMismatch {
        name: String,
        declared: AdapterKind,
        actual: AdapterKind,
    },
}

/// Factory building a concrete adapter from resolved constructor
/// parameters. Resource acquisition happens inside the factory.
pub enum AdapterFactory {
    Reader(fn(&ResolvedParams) -> Result<Box<dyn SongReader>, AdapterError>),
    Writer(fn(&ResolvedParams) -> Result<Box<dyn SongWriter>, AdapterError>),
}

impl AdapterFactory {
    fn kind(&self) -> AdapterKind {
        match self {
            AdapterFactory::Reader(_) => AdapterKind::Reader,
            AdapterFactory::Writer(_) => AdapterKind::Writer,
        }
    }
}

/// One registered adapter: its descriptor plus its factory.
pub struct RegisteredAdapter {
    pub descriptor: AdapterDescriptor,
    pub factory: AdapterFactory,
}

/// Owns every known adapter, keyed by unique name.
pub struct AdapterRegistry {
    entries: Vec<RegisteredAdapter>,
    by_name: HashMap<&'static str, usize>,
}

impl AdapterRegistry {
    /// An empty registry; extensions can build their own set from scratch.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// The registry with every built-in adapter registered.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        registry.register(
            xml_library::descriptor(),
            AdapterFactory::Reader(xml_library::build),
        )?;
        registry.register(
            json_store::reader_descriptor(),
            AdapterFactory::Reader(json_store::build_reader),
        )?;
        registry.register(
            json_store::writer_descriptor(),
            AdapterFactory::Writer(json_store::build_writer),
        )?;
        registry.register(
            text_report::descriptor(),
            AdapterFactory::Writer(text_report::build),
        )?;
        Ok(registry)
    }

    /// Register one adapter. Fails on a duplicate name or on a descriptor
    /// whose kind disagrees with the factory.
    pub fn register(
        &mut self,
        descriptor: AdapterDescriptor,
        factory: AdapterFactory,
    ) -> Result<(), RegistryError> {
        if descriptor.kind != factory.kind() {
            return Err(RegistryError::KindMismatch {
                name: descriptor.name.to_string(),
                declared: descriptor.kind,
                actual: factory.kind(),
            });
        }
        if self.by_name.contains_key(descriptor.name) {
            return Err(RegistryError::DuplicateName {
                name: descriptor.name.to_string(),
            });
        }
        self.by_name.insert(descriptor.name, self.entries.len());
        self.entries.push(RegisteredAdapter { descriptor, factory });
        Ok(())
    }

    /// By-name lookup, O(1).
    pub fn get(&self, name: &str) -> Option<&RegisteredAdapter> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// All entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAdapter> {
        self.entries.iter()
    }

    /// Names of every adapter of the given kind, in registration order.
    pub fn names_of_kind(&self, kind: AdapterKind) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|entry| entry.descriptor.kind == kind)
            .map(|entry| entry.descriptor.name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Ordered, append-only collection of origin hooks.

use crate::hooks::{OriginContext, OriginRequest, OriginResponse, PreOriginHandler};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("module '{0}' is already registered")]
    DuplicateModule(&'static str),
}

/// Collects modules during initialization.
#[derive(Default)]
pub struct ModuleRegistryBuilder {
    modules: Vec<Box<dyn PreOriginHandler>>,
}

impl ModuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module. Ids must be unique.
    pub fn register<H>(&mut self, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: PreOriginHandler + 'static,
    {
        let id = handler.id();
        if self.modules.iter().any(|m| m.id() == id) {
            return Err(RegistryError::DuplicateModule(id));
        }
        tracing::debug!(module = id, position = self.modules.len(), "Module registered");
        self.modules.push(Box::new(handler));
        Ok(self)
    }

    /// Freeze the registry. No modules can be added afterwards.
    pub fn build(self) -> ModuleRegistry {
        ModuleRegistry {
            modules: self.modules,
        }
    }
}

/// Immutable registry shared with the serving path.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn PreOriginHandler>>,
}

impl ModuleRegistry {
    /// Run every handler in registration order, stopping at the first one
    /// that supplies a response.
    pub fn run_pre_origin(
        &self,
        request: &mut OriginRequest,
        ctx: &mut OriginContext,
    ) -> Option<OriginResponse> {
        for module in &self.modules {
            if let Some(response) = module.on_origin_request(request, ctx) {
                tracing::debug!(
                    module = module.id(),
                    subgraph = %ctx.active_subgraph().name,
                    status = %response.status(),
                    "Origin request short-circuited"
                );
                return Some(response);
            }
        }
        None
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|m| m.id())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

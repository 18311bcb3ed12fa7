//! Resolver registry.
//!
//! The [`ResolverRegistry`] classifies a link and hands it to the first
//! registered resolver that accepts its kind.

use tracing::{debug, info};

use super::{ItemOptions, LinkKind, Resolution, ResolveError, Resolver, classify_link};

/// An ordered collection of resolvers.
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverRegistry {
    /// Creates an empty resolver registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Registers a resolver with the registry.
    #[tracing::instrument(skip(self, resolver), fields(resolver_name))]
    pub fn register(&mut self, resolver: Box<dyn Resolver>) {
        tracing::Span::current().record("resolver_name", resolver.name());
        debug!(name = resolver.name(), "Registering resolver");
        self.resolvers.push(resolver);
    }

    /// Returns the number of registered resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if no resolvers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Returns the first resolver, in registration order, that handles `kind`.
    #[must_use]
    pub fn find_handler(&self, kind: LinkKind) -> Option<&dyn Resolver> {
        if kind == LinkKind::Unsupported {
            return None;
        }
        self.resolvers
            .iter()
            .find(|r| r.can_handle(kind))
            .map(AsRef::as_ref)
    }

    /// Classifies `link` and resolves it into download items.
    ///
    /// Unsupported links are rejected before any network access.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::LinkUnsupported` for links of no known service,
    /// `ResolveError::NoResolver` when the service's resolver is not
    /// registered, and the resolver's own error otherwise.
    #[tracing::instrument(skip(self, options))]
    pub async fn resolve(
        &self,
        link: &str,
        options: &ItemOptions,
    ) -> Result<Resolution, ResolveError> {
        let kind = classify_link(link);
        if kind == LinkKind::Unsupported {
            return Err(ResolveError::unsupported(link));
        }

        let handler = self
            .find_handler(kind)
            .ok_or_else(|| ResolveError::no_resolver(link, kind.as_str()))?;
        debug!(resolver = handler.name(), kind = %kind, "Dispatching link");

        let resolution = handler.resolve(link, options).await?;
        info!(
            resolver = handler.name(),
            items = resolution.items.len(),
            "Link resolved"
        );
        Ok(resolution)
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

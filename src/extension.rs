//! Extension modules and parser configurations.
//!
//! An [`ExtensionModule`] bundles handler maps, fallbacks, and an optional init hook. Modules
//! are registered once per process in a catalog keyed by name, see [`register_module`], and are
//! installed into the registry of a [`Configuration`] when it is built.
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use log::{debug, warn};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::{
    config::{ParserConfig, ParserKind},
    grammar,
    node::Node,
    parser::{Diagnostic, ParseOutput, Severity},
    references::{DocumentReferences, ReferenceTracker},
    registry::{FallbackFn, HandlerMap, Registry, SymbolClass},
};

/// A hook run on the configuration after every module has been installed.
pub type InitHook = Arc<dyn Fn(&mut Configuration) + Send + Sync>;

/// A named bundle of grammar, installed as a unit.
#[derive(Clone, Default)]
pub struct ExtensionModule {
    pub handlers: Vec<Arc<HandlerMap>>,
    pub fallbacks: Vec<(SymbolClass, FallbackFn)>,
    pub init: Option<InitHook>,
    /// The only kind of parser this module can be installed in, if any.
    pub for_parser: Option<ParserKind>,
}

impl ExtensionModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(mut self, handlers: impl IntoIterator<Item = HandlerMap>) -> Self {
        self.handlers.extend(handlers.into_iter().map(Arc::new));
        self
    }

    pub fn with_fallback(mut self, class: SymbolClass, fallback: FallbackFn) -> Self {
        self.fallbacks.push((class, fallback));
        self
    }

    pub fn with_init(mut self, init: impl Fn(&mut Configuration) + Send + Sync + 'static) -> Self {
        self.init = Some(Arc::new(init));
        self
    }

    pub fn for_parser(mut self, kind: ParserKind) -> Self {
        self.for_parser = Some(kind);
        self
    }
}

impl fmt::Debug for ExtensionModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionModule")
            .field(
                "handlers",
                &self.handlers.iter().map(|map| map.name()).collect::<Vec<_>>(),
            )
            .field("fallbacks", &self.fallbacks.len())
            .field("init", &self.init.is_some())
            .field("for_parser", &self.for_parser)
            .finish()
    }
}

static CATALOG: Lazy<RwLock<HashMap<String, Arc<ExtensionModule>>>> = Lazy::new(|| {
    RwLock::new(
        grammar::builtin_modules()
            .into_iter()
            .map(|(name, module)| (name.to_string(), Arc::new(module)))
            .collect(),
    )
});

/// Register a module in the process-wide catalog.
///
/// Registering a name that is already present replaces the previous module. Configurations that
/// were already built keep the module they were built with.
pub fn register_module(name: impl Into<String>, module: ExtensionModule) {
    let name = name.into();
    debug!("registering extension module `{name}`");
    CATALOG
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, Arc::new(module));
}

/// Get a module from the process-wide catalog.
pub fn get_module(name: &str) -> Option<Arc<ExtensionModule>> {
    CATALOG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("extension module `{module}` requires a {expected} parser, but the parser is a {found} parser")]
    ParserMismatch {
        module: String,
        expected: ParserKind,
        found: ParserKind,
    },
}

impl ConfigurationError {
    /// The stable identifier of the error.
    pub fn id(&self) -> &'static str {
        match self {
            ConfigurationError::ParserMismatch { .. } => "ParserMismatch",
        }
    }
}

/// Builds a [`Configuration`] from a list of modules and parser options.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    kind: ParserKind,
    config: ParserConfig,
    modules: Vec<(String, i32)>,
}

impl ConfigurationBuilder {
    pub fn kind(mut self, kind: ParserKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn module(mut self, name: impl Into<String>, priority: i32) -> Self {
        self.modules.push((name.into(), priority));
        self
    }

    pub fn modules(mut self, modules: &[(&str, i32)]) -> Self {
        self.modules
            .extend(modules.iter().map(|(name, priority)| (name.to_string(), *priority)));
        self
    }

    /// Resolve and install the modules.
    ///
    /// Modules are installed by ascending priority, modules of equal priority in the order they
    /// were given. Init hooks then run in that same order. Unknown modules are skipped with a
    /// warning.
    pub fn build(self) -> Result<Configuration, ConfigurationError> {
        let mut resolved = Vec::with_capacity(self.modules.len());
        let mut warnings = Vec::new();
        for (name, priority) in self.modules {
            match get_module(&name) {
                Some(module) => {
                    if let Some(expected) = module.for_parser {
                        if expected != self.kind {
                            return Err(ConfigurationError::ParserMismatch {
                                module: name,
                                expected,
                                found: self.kind,
                            });
                        }
                    }
                    resolved.push((name, priority, module));
                }
                None => {
                    warn!("unknown extension module `{name}`, skipping it");
                    warnings.push(format!("Unknown extension module '{name}'"));
                }
            }
        }
        resolved.sort_by_key(|(_, priority, _)| *priority);

        let mut configuration = Configuration {
            kind: self.kind,
            config: self.config,
            registry: Registry::new(),
            tag_format: String::from("%1"),
            modules: Vec::with_capacity(resolved.len()),
            warnings,
        };
        for (name, priority, module) in &resolved {
            debug!("installing extension module `{name}` (priority {priority})");
            for map in &module.handlers {
                configuration.registry.install(map.clone());
            }
            for (class, fallback) in &module.fallbacks {
                configuration
                    .registry
                    .install_fallback(name.as_str(), *class, *fallback);
            }
            configuration.modules.push(name.clone());
        }
        for (_, _, module) in &resolved {
            if let Some(init) = &module.init {
                init(&mut configuration);
            }
        }

        Ok(configuration)
    }
}

/// A parser configuration: the installed grammar and the parsing options.
///
/// A configuration is not modified by parsing, and can be shared between threads to parse
/// independent expressions concurrently.
#[derive(Debug, Clone)]
pub struct Configuration {
    kind: ParserKind,
    pub(crate) config: ParserConfig,
    pub(crate) registry: Registry,
    pub(crate) tag_format: String,
    modules: Vec<String>,
    warnings: Vec<String>,
}

impl Configuration {
    /// Build a configuration for the default parser with default options.
    ///
    /// `modules` is a list of module names with their priority.
    pub fn new(modules: &[(&str, i32)]) -> Result<Self, ConfigurationError> {
        Self::builder().modules(modules).build()
    }

    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn kind(&self) -> ParserKind {
        self.kind
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The registry, for hooks that adjust the installed grammar.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Template used to display equation tags, `%1` being the tag.
    pub fn tag_format(&self) -> &str {
        &self.tag_format
    }

    pub fn set_tag_format(&mut self, format: impl Into<String>) {
        self.tag_format = format.into();
    }

    /// Names of the installed modules, in installation order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Warnings produced while building the configuration.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parse an expression with a fresh set of document references.
    pub fn parse(&self, source: &str) -> ParseOutput {
        let references = RefCell::new(DocumentReferences::new());
        self.parse_with(source, &references)
    }

    /// Parse an expression, numbering equations and resolving labels through `references`.
    ///
    /// Use the same tracker for every expression of a document.
    pub fn parse_with(&self, source: &str, references: &RefCell<dyn ReferenceTracker>) -> ParseOutput {
        crate::parser::parse_expression(self, source, references)
    }
}

/// Parse `source` with the given modules.
///
/// This builds a new [`Configuration`] for every call; build one configuration and use
/// [`Configuration::parse`] to parse many expressions. The warnings of the configuration are
/// reported first, as `UnknownModule` diagnostics. A configuration that cannot be built is
/// reported as a fatal error.
pub fn parse(source: &str, extensions: &[(&str, i32)]) -> ParseOutput {
    match Configuration::new(extensions) {
        Ok(configuration) => {
            let mut output = configuration.parse(source);
            output.diagnostics.splice(
                0..0,
                configuration.warnings().iter().map(|warning| Diagnostic {
                    kind: "UnknownModule",
                    message: warning.clone(),
                    severity: Severity::Warning,
                    span: None,
                }),
            );
            output
        }
        Err(error) => {
            let message = error.to_string();
            ParseOutput {
                root: Node::error(message.clone()),
                diagnostics: vec![Diagnostic {
                    kind: error.id(),
                    message,
                    severity: Severity::Fatal,
                    span: None,
                }],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{get_module, parse, register_module, Configuration, ExtensionModule};
    use crate::{parser::Severity, registry::SymbolClass};

    #[test]
    fn builtins_are_registered() {
        for name in ["base", "newcommand", "tags", "physics"] {
            assert!(get_module(name).is_some(), "missing builtin module {name}");
        }
    }

    #[test]
    fn unknown_module_is_a_warning() {
        let configuration = Configuration::new(&[("base", 1), ("no-such-module", 2)]).unwrap();
        assert_eq!(configuration.modules(), ["base"]);
        assert_eq!(configuration.warnings().len(), 1);
    }

    #[test]
    fn parse_reports_unknown_modules() {
        let output = parse("x", &[("base", 0), ("no-such-module", 0)]);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].kind, "UnknownModule");
        assert_eq!(output.diagnostics[0].severity, Severity::Warning);
        assert_eq!(output.diagnostics[0].message, "Unknown extension module 'no-such-module'");
        assert!(!output.is_fatal());
        assert!(!output.root.is_error());

        let output = parse(r"\nope", &[("base", 0), ("no-such-module", 0)]);
        assert_eq!(output.diagnostics.len(), 2);
        assert!(output.is_fatal());
    }

    #[test]
    fn priority_orders_maps() {
        register_module(
            "extension-test-empty",
            ExtensionModule::new().with_handlers([crate::registry::HandlerMap::new(
                "extension-test-empty-macros",
                SymbolClass::Macro,
                [],
            )]),
        );
        let configuration =
            Configuration::new(&[("extension-test-empty", 20), ("base", 10)]).unwrap();
        let names = configuration.registry().map_names(SymbolClass::Macro);
        assert_eq!(names.last(), Some(&"extension-test-empty-macros"));
        assert_eq!(configuration.modules(), ["base", "extension-test-empty"]);
    }
}

//! Inline event-handler scripts.
//!
//! A `ui-box` event binding carries handler source in an attribute
//! (`:click="el.textContent = 'x'"`). The source goes through a
//! [`HandlerCompiler`] once at bind time and the resulting [`EventHandler`]
//! runs on every dispatch. [`InlineCompiler`] is the default: a small
//! statement language over the element, the event and the `uizy` context.
//! Hosts can substitute their own compiler through
//! [`StartConfig::compiler`](crate::app::StartConfig::compiler).

pub mod eval;
pub mod parser;
pub mod tokenizer;

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

use crate::dom::Element;
use crate::event::Event;
use crate::registry::RegistryError;

pub use eval::run;
pub use parser::{parse, BinaryOp, Expr, Stmt, UnaryOp};
pub use tokenizer::{lex, Lexeme, Token};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Compile-time or run-time failure of a handler script.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("invalid character at offset {0}")]
    InvalidCharacter(usize),

    #[error("unexpected `{found}` at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },

    #[error("unexpected end of input in {0}")]
    UnexpectedEnd(&'static str),

    #[error("invalid assignment target")]
    InvalidAssignment,

    #[error("{0} is not defined")]
    UnknownIdentifier(String),

    #[error("{target} has no property `{name}`")]
    UnknownProperty { target: &'static str, name: String },

    #[error("cannot assign `{name}` on {target}")]
    NotAssignable { target: &'static str, name: String },

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("{name} expects {expected} argument(s)")]
    Arity { name: String, expected: usize },

    #[error("type error: {0}")]
    Type(String),

    #[error("{0} requires globals to be enabled")]
    GlobalsDisabled(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ---------------------------------------------------------------------------
// Host and scope
// ---------------------------------------------------------------------------

/// The context operations a handler can reach through `uizy`.
pub trait ScriptHost {
    /// Call an action, failing when it is not registered.
    fn emit(&self, path: &str, payload: &Value) -> Result<Value, RegistryError>;

    /// Read a store value, failing when it is not registered.
    fn store_value(&self, path: &str) -> Result<Value, RegistryError>;

    /// Write a store; unknown paths are ignored.
    fn set_store(&self, path: &str, value: Value);

    /// Write one key of a map store; unknown paths are ignored.
    fn set_store_key(&self, path: &str, key: &str, value: Value);

    /// Resolve component paths (a string or a list of strings) to a class
    /// string.
    fn use_classes(&self, paths: &Value, props: &Value) -> Result<String, RegistryError>;

    /// Whether the `$` and `$emit` shortcuts are available.
    fn globals(&self) -> bool;
}

/// Everything a handler sees while it runs.
pub struct HandlerScope<'a> {
    pub event: &'a Event,
    pub element: &'a Element,
    pub host: &'a dyn ScriptHost,
}

impl<'a> HandlerScope<'a> {
    pub fn new(event: &'a Event, element: &'a Element, host: &'a dyn ScriptHost) -> Self {
        Self {
            event,
            element,
            host,
        }
    }
}

impl fmt::Debug for HandlerScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerScope")
            .field("event", &self.event.kind())
            .field("element", self.element)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Handlers and compilers
// ---------------------------------------------------------------------------

/// A compiled event handler.
pub trait EventHandler {
    fn handle(&self, scope: &HandlerScope<'_>) -> Result<(), ScriptError>;
}

impl<F> EventHandler for F
where
    F: Fn(&HandlerScope<'_>) -> Result<(), ScriptError>,
{
    fn handle(&self, scope: &HandlerScope<'_>) -> Result<(), ScriptError> {
        self(scope)
    }
}

/// Turns attribute source text into an [`EventHandler`].
pub trait HandlerCompiler {
    fn compile(&self, source: &str) -> Result<Rc<dyn EventHandler>, ScriptError>;
}

/// The default compiler: parses the inline statement language.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineCompiler;

impl HandlerCompiler for InlineCompiler {
    fn compile(&self, source: &str) -> Result<Rc<dyn EventHandler>, ScriptError> {
        let stmts = parse(source)?;
        Ok(Rc::new(CompiledScript { stmts }))
    }
}

/// A parsed handler body.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledScript {
    stmts: Vec<Stmt>,
}

impl CompiledScript {
    pub fn statements(&self) -> &[Stmt] {
        &self.stmts
    }
}

impl EventHandler for CompiledScript {
    fn handle(&self, scope: &HandlerScope<'_>) -> Result<(), ScriptError> {
        run(&self.stmts, scope)
    }
}

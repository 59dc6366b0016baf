//! Data model for the host framework's route table.
//!
//! The hosting web framework is an external collaborator; at build time it
//! hands over a [`RouteCollection`] describing every registered grouping and
//! route. Nothing here is introspected beyond what the structs carry.

use crate::operations::HandlerId;

/// HTTP methods recognized by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// The method name in upper case
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Type-cast hint declared on a path parameter in the host's path syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamCast {
    /// Integer segment
    Int,
    /// Floating-point segment
    Number,
    /// Plain string segment
    Str,
    /// UUID segment
    Uuid,
}

impl ParamCast {
    /// Parse a cast hint embedded in a path template segment
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            "int" => ParamCast::Int,
            "number" | "float" => ParamCast::Number,
            "uuid" => ParamCast::Uuid,
            _ => ParamCast::Str,
        }
    }
}

/// A path parameter declared on a route
#[derive(Debug, Clone)]
pub struct PathParam {
    /// Parameter name
    pub name: String,
    /// Optional type-cast hint
    pub cast: Option<ParamCast>,
}

impl PathParam {
    /// Create a path parameter declaration
    pub fn new(name: impl Into<String>, cast: Option<ParamCast>) -> Self {
        Self {
            name: name.into(),
            cast,
        }
    }
}

/// How a route maps HTTP methods to handlers.
///
/// A route is backed either by one handler answering several methods, or by a
/// per-method dispatch view. Both normalize to a list of (method, handler)
/// pairs.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// One handler answering every listed method
    Shared {
        methods: Vec<HttpMethod>,
        handler: HandlerId,
    },
    /// A distinct handler per method
    PerMethod(Vec<(HttpMethod, HandlerId)>),
}

impl Dispatch {
    /// Normalize to (method, handler) pairs
    pub fn pairs(&self) -> Vec<(HttpMethod, HandlerId)> {
        match self {
            Dispatch::Shared { methods, handler } => {
                methods.iter().map(|m| (*m, *handler)).collect()
            }
            Dispatch::PerMethod(pairs) => pairs.clone(),
        }
    }
}

/// One registered route in the host framework
#[derive(Debug, Clone)]
pub struct Route {
    /// Route name, unique within the host framework
    pub name: String,
    /// Path template in the host's native placeholder syntax
    pub path: String,
    /// Method-to-handler mapping
    pub dispatch: Dispatch,
    /// Declared path parameters, in order
    pub parameters: Vec<PathParam>,
    /// Synthetic routes (static-file serving) are excluded from the document
    pub synthetic: bool,
}

impl Route {
    /// Create a route with no declared parameters
    pub fn new(name: impl Into<String>, path: impl Into<String>, dispatch: Dispatch) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            dispatch,
            parameters: Vec::new(),
            synthetic: false,
        }
    }
}

/// A named grouping of handlers (blueprint, scope, module)
#[derive(Debug, Clone)]
pub struct Blueprint {
    /// Grouping name, used as the auto-tagging fallback
    pub name: String,
    /// Handlers registered under this grouping
    pub handlers: Vec<HandlerId>,
}

impl Blueprint {
    /// Create a grouping over the given handlers
    pub fn new(name: impl Into<String>, handlers: Vec<HandlerId>) -> Self {
        Self {
            name: name.into(),
            handlers,
        }
    }
}

/// The host framework's full route table at build time
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    /// Named groupings, in registration order
    pub blueprints: Vec<Blueprint>,
    /// All registered routes, in registration order
    pub routes: Vec<Route>,
}

impl RouteCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationRegistry;

    #[test]
    fn test_shared_dispatch_pairs() {
        let mut registry = OperationRegistry::new();
        let handler = registry.allocate();
        let dispatch = Dispatch::Shared {
            methods: vec![HttpMethod::Get, HttpMethod::Post],
            handler,
        };

        let pairs = dispatch.pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (HttpMethod::Get, handler));
        assert_eq!(pairs[1], (HttpMethod::Post, handler));
    }

    #[test]
    fn test_per_method_dispatch_pairs() {
        let mut registry = OperationRegistry::new();
        let get_handler = registry.allocate();
        let put_handler = registry.allocate();
        let dispatch = Dispatch::PerMethod(vec![
            (HttpMethod::Get, get_handler),
            (HttpMethod::Put, put_handler),
        ]);

        let pairs = dispatch.pairs();
        assert_eq!(pairs.len(), 2);
        assert_ne!(pairs[0].1, pairs[1].1);
    }

    #[test]
    fn test_param_cast_from_hint() {
        assert_eq!(ParamCast::from_hint("int"), ParamCast::Int);
        assert_eq!(ParamCast::from_hint("number"), ParamCast::Number);
        assert_eq!(ParamCast::from_hint("float"), ParamCast::Number);
        assert_eq!(ParamCast::from_hint("uuid"), ParamCast::Uuid);
        assert_eq!(ParamCast::from_hint("alpha"), ParamCast::Str);
        assert_eq!(ParamCast::from_hint("string"), ParamCast::Str);
    }
}

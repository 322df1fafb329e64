use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tydb_types::{RecordType, Type};

use crate::error::{SchemaError, SchemaResult};
use crate::expr::{is_identifier, parse_type_expr, CompositeExpr, TypeExpr};

/// Names reserved by the type syntax.
const BUILTINS: [&str; 5] = ["string", "number", "boolean", "array", "hashmap"];

/// Declaration of a database's root type.
///
/// ```toml
/// root = "{users: hashmap<string, User>}"
///
/// [types.User.record]
/// name = "string"
/// age = "number"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// The root type expression.
    pub root: TypeExpr,
    /// Named declarations referenced from `root` or from each other.
    #[serde(default)]
    pub types: BTreeMap<String, TypeExpr>,
}

impl Schema {
    /// A schema with the given root and no declarations.
    pub fn new(root: impl Into<TypeExpr>) -> Self {
        Self {
            root: root.into(),
            types: BTreeMap::new(),
        }
    }

    /// Add a named declaration.
    pub fn with_type(mut self, name: impl Into<String>, expr: impl Into<TypeExpr>) -> Self {
        self.types.insert(name.into(), expr.into());
        self
    }

    /// Decode and validate a TOML schema document.
    pub fn from_toml_str(text: &str) -> SchemaResult<Self> {
        let schema: Self = toml::from_str(text).map_err(|e| SchemaError::Document(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Decode and validate a JSON schema document.
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        let schema: Self =
            serde_json::from_str(text).map_err(|e| SchemaError::Document(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema file. Files ending in `.json` are read as JSON,
    /// everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading schema");
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Check every declaration and the root.
    ///
    /// Unused declarations are checked too, so a schema that loads is
    /// free of unknown names, shadowed builtins and recursion.
    pub fn validate(&self) -> SchemaResult<()> {
        for name in self.types.keys() {
            if BUILTINS.contains(&name.as_str()) {
                return Err(SchemaError::ShadowsBuiltin(name.clone()));
            }
            if !is_identifier(name) {
                return Err(SchemaError::Syntax {
                    text: name.clone(),
                    offset: 0,
                    reason: "declaration names must be identifiers".into(),
                });
            }
            self.resolve_named(name)?;
        }
        self.root_type().map(|_| ())
    }

    /// Fully resolved root type.
    pub fn root_type(&self) -> SchemaResult<Type> {
        self.resolve(&self.root, &mut Vec::new())
    }

    /// Fully resolved type of a declaration or builtin name.
    pub fn resolve_named(&self, name: &str) -> SchemaResult<Type> {
        self.resolve_name(name, &mut Vec::new())
    }

    fn resolve(&self, expr: &TypeExpr, stack: &mut Vec<String>) -> SchemaResult<Type> {
        if let Some(name) = expr.as_name() {
            return self.resolve_name(name, stack);
        }
        match expr {
            TypeExpr::Syntax(text) => self.resolve(&parse_type_expr(text)?, stack),
            TypeExpr::Composite(CompositeExpr::Array(elem)) => {
                Ok(Type::array(self.resolve(elem, stack)?))
            }
            TypeExpr::Composite(CompositeExpr::Hashmap { key, value }) => Ok(Type::hashmap(
                self.resolve(key, stack)?,
                self.resolve(value, stack)?,
            )),
            TypeExpr::Composite(CompositeExpr::Record(fields)) => {
                let fields = fields
                    .iter()
                    .map(|(name, expr)| Ok((name.clone(), self.resolve(expr, stack)?)))
                    .collect::<SchemaResult<Vec<_>>>()?;
                Ok(Type::Record(RecordType::from_pairs(fields)))
            }
        }
    }

    fn resolve_name(&self, name: &str, stack: &mut Vec<String>) -> SchemaResult<Type> {
        match name {
            "string" => return Ok(Type::String),
            "number" => return Ok(Type::Number),
            "boolean" => return Ok(Type::Boolean),
            // Parameterised builtins used bare; the parser reports the missing `<`.
            "array" | "hashmap" => return self.resolve(&parse_type_expr(name)?, stack),
            _ => {}
        }
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(SchemaError::Recursive(chain));
        }
        let declared = self
            .types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;
        stack.push(name.to_string());
        let resolved = self.resolve(declared, stack);
        stack.pop();
        resolved
    }
}

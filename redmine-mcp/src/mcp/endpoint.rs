//! Generic tool wrapping one tracker operation
//!
//! An [`EndpointTool`] couples an input contract (a JSON schema) with an
//! adapter that maps validated arguments onto a [`RedmineClient`] call. All
//! tracker tools are built from it, most of them through [`crud_tools`].

use crate::api::path::PathParams;
use crate::api::query::{self, scalar_text};
use crate::api::{RedmineClient, Resource};
use crate::error::{map_transport_error, RedmineError, Result};
use crate::mcp::tool_registry::{McpTool, ToolContext, ToolOutcome};
use crate::model::ListEnvelope;
use futures::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Future returned by an adapter; `None` means the tracker sent no body
pub type AdapterFuture = BoxFuture<'static, Result<Option<Value>>>;

/// Maps validated arguments onto one client call
pub type Adapter = Arc<dyn Fn(Arc<RedmineClient>, Map<String, Value>) -> AdapterFuture + Send + Sync>;

/// How a successful response is turned into the tool's payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputShape {
    /// Unwrap the singular envelope key, e.g. `issue`
    Entity(&'static str),
    /// Decode a list envelope keyed by the plural key, e.g. `issues`
    List(&'static str),
    /// Return the body as received
    Body,
    /// No payload; report the rendered message instead
    Message(String),
}

/// A tool backed by one tracker operation
pub struct EndpointTool {
    name: String,
    description: String,
    schema: Value,
    validator: jsonschema::Validator,
    operation: String,
    output: OutputShape,
    adapter: Adapter,
}

impl std::fmt::Debug for EndpointTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointTool")
            .field("name", &self.name)
            .field("operation", &self.operation)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl EndpointTool {
    /// Create a tool.
    ///
    /// `operation` is a label template such as `"retrieve issue {id}"`; the
    /// placeholders are filled from the arguments and the result prefixes
    /// failure messages as `"Failed to <operation>: ..."`.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
        operation: impl Into<String>,
        output: OutputShape,
        adapter: F,
    ) -> Result<Self>
    where
        F: Fn(Arc<RedmineClient>, Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>>> + Send + 'static,
    {
        let name = name.into();
        let adapter: Adapter = Arc::new(
            move |client: Arc<RedmineClient>, args: Map<String, Value>| -> AdapterFuture {
                adapter(client, args).boxed()
            },
        );
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| RedmineError::InvalidToolSchema {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name,
            description: description.into(),
            schema,
            validator,
            operation: operation.into(),
            output,
            adapter,
        })
    }

    /// Check arguments against the input contract, listing every violation
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<()> {
        let instance = Value::Object(arguments.clone());
        let violations: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RedmineError::validation(violations.join("; ")))
        }
    }

    fn shape(
        &self,
        body: Option<Value>,
        arguments: &Map<String, Value>,
        operation: &str,
    ) -> Result<ToolOutcome> {
        let message = format!("{operation} succeeded");
        let payload = match (&self.output, body) {
            (OutputShape::Message(template), _) => {
                return Ok(ToolOutcome::done(render_label(template, arguments)));
            }
            (_, None) => return Ok(ToolOutcome::done(message)),
            (OutputShape::Entity(key), Some(body)) => match body.get(*key) {
                Some(entity) => serde_json::to_string_pretty(entity)?,
                None => serde_json::to_string_pretty(&body)?,
            },
            (OutputShape::List(plural), Some(body)) => {
                let page = ListEnvelope::from_body(&body, plural);
                serde_json::to_string_pretty(&page.to_value(plural))?
            }
            (OutputShape::Body, Some(body)) => serde_json::to_string_pretty(&body)?,
        };
        Ok(ToolOutcome::payload(payload, message))
    }

    fn fail(&self, operation: &str, error: &RedmineError) -> ToolOutcome {
        let failure = map_transport_error(error);
        warn!(
            tool = %self.name,
            status = ?failure.status,
            "tool failed: {}",
            failure.message
        );
        ToolOutcome::failure(format!("Failed to {operation}: {}", failure.message))
    }
}

#[async_trait::async_trait]
impl McpTool for EndpointTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }

    async fn execute(
        &self,
        mut arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> ToolOutcome {
        coerce_arguments(&self.schema, &mut arguments);
        let operation = render_label(&self.operation, &arguments);

        if let Err(e) = self.validate(&arguments) {
            debug!(tool = %self.name, "rejected arguments without calling the tracker");
            return self.fail(&operation, &e);
        }

        let body = match (self.adapter)(context.client.clone(), arguments.clone()).await {
            Ok(body) => body,
            Err(e) => return self.fail(&operation, &e),
        };

        self.shape(body, &arguments, &operation)
            .unwrap_or_else(|e| self.fail(&operation, &e))
    }
}

/// Fill `{name}` placeholders from the arguments.
///
/// Placeholders without a matching scalar argument are dropped.
pub fn render_label(template: &str, arguments: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &rest[start + 1..start + len];
        if let Some(text) = arguments.get(key).and_then(scalar_text) {
            out.push_str(&text);
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coerce arguments toward the types the schema declares and drop arguments
/// the schema does not know.
///
/// Numeric strings become integers or numbers, numbers and booleans become
/// strings, and `"true"`/`"false"` become booleans. Values that cannot be
/// converted are left alone for validation to report.
pub fn coerce_arguments(schema: &Value, arguments: &mut Map<String, Value>) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    arguments.retain(|key, _| {
        let known = properties.contains_key(key);
        if !known {
            debug!(argument = %key, "dropping undeclared argument");
        }
        known
    });

    for (key, value) in arguments.iter_mut() {
        if let Some(property) = properties.get(key) {
            coerce_value(value, property);
        }
    }
}

fn coerce_value(value: &mut Value, property: &Value) {
    let types = declared_types(property);

    if types.is_empty() || types.iter().any(|t| has_type(value, t)) {
        if let (Some(items), Value::Array(values)) = (property.get("items"), value) {
            for item in values.iter_mut() {
                coerce_value(item, items);
            }
        }
        return;
    }

    if let Some(converted) = types.iter().find_map(|t| convert(value, t)) {
        *value = converted;
    }
}

fn declared_types(property: &Value) -> Vec<&str> {
    match property.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn has_type(value: &Value, declared: &str) -> bool {
    match declared {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => false,
    }
}

fn convert(value: &Value, target: &str) -> Option<Value> {
    match (target, value) {
        ("integer", Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        ("integer", Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| Value::from(f as i64)),
        ("number", Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        ("string", Value::Number(n)) => Some(Value::String(n.to_string())),
        ("string", Value::Bool(b)) => Some(Value::String(b.to_string())),
        ("boolean", Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Collect the named path parameters from the arguments
pub fn path_params(arguments: &Map<String, Value>, names: &[&'static str]) -> PathParams {
    names.iter().fold(PathParams::new(), |params, name| {
        match arguments.get(*name).and_then(scalar_text) {
            Some(value) => params.with(*name, value),
            None => params,
        }
    })
}

/// Arguments minus the named keys, used as a request body
pub fn body_fields(arguments: &Map<String, Value>, skip: &[&str]) -> Map<String, Value> {
    arguments
        .iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Description and input contract of one generated verb
#[derive(Debug, Clone)]
pub struct VerbSpec {
    /// Tool name override; defaults to `<prefix>_<verb>`
    pub name: Option<&'static str>,
    /// Tool description
    pub description: &'static str,
    /// Input contract
    pub schema: Value,
}

impl VerbSpec {
    /// Verb with the default name
    pub fn new(description: &'static str, schema: Value) -> Self {
        Self {
            name: None,
            description,
            schema,
        }
    }

    /// Override the generated tool name
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

/// Which verbs [`crud_tools`] generates for a resource
#[derive(Debug, Clone, Default)]
pub struct CrudSpec {
    /// Tool name prefix, e.g. `issues`
    pub prefix: &'static str,
    /// Path parameter of the parent resource for nested collections
    pub parent: Option<&'static str>,
    /// `<prefix>_list`
    pub list: Option<VerbSpec>,
    /// `<prefix>_get`
    pub get: Option<VerbSpec>,
    /// `<prefix>_create`
    pub create: Option<VerbSpec>,
    /// `<prefix>_update`
    pub update: Option<VerbSpec>,
    /// `<prefix>_delete`
    pub delete: Option<VerbSpec>,
}

impl CrudSpec {
    /// Start describing the tools of a name prefix
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    /// Collection lives below a parent, e.g. `project_id`
    pub fn nested_under(mut self, parent: &'static str) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Generate `<prefix>_list`
    pub fn list(mut self, verb: VerbSpec) -> Self {
        self.list = Some(verb);
        self
    }

    /// Generate `<prefix>_get`
    pub fn get(mut self, verb: VerbSpec) -> Self {
        self.get = Some(verb);
        self
    }

    /// Generate `<prefix>_create`
    pub fn create(mut self, verb: VerbSpec) -> Self {
        self.create = Some(verb);
        self
    }

    /// Generate `<prefix>_update`
    pub fn update(mut self, verb: VerbSpec) -> Self {
        self.update = Some(verb);
        self
    }

    /// Generate `<prefix>_delete`
    pub fn delete(mut self, verb: VerbSpec) -> Self {
        self.delete = Some(verb);
        self
    }
}

/// Build the list/get/create/update/delete tools of a resource
pub fn crud_tools(resource: Resource, spec: CrudSpec) -> Result<Vec<EndpointTool>> {
    let label = resource.label();
    let plural_label = resource.plural.replace('_', " ");
    let title = capitalize(&label);
    let parents: Vec<&'static str> = spec.parent.into_iter().collect();
    let scope = match spec.parent {
        Some(p) => format!(" for {} {{{p}}}", p.trim_end_matches("_id")),
        None => String::new(),
    };
    let tool_name = |verb: &VerbSpec, suffix: &str| {
        verb.name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_{suffix}", spec.prefix))
    };

    let mut tools = Vec::new();

    if let Some(verb) = &spec.list {
        tools.push(EndpointTool::new(
            tool_name(verb, "list"),
            verb.description,
            verb.schema.clone(),
            format!("list {plural_label}{scope}"),
            OutputShape::List(resource.plural),
            {
                let parents = parents.clone();
                move |client: Arc<RedmineClient>, args: Map<String, Value>| {
                    let params = path_params(&args, &parents);
                    let query = query::encode(&args, &parents);
                    async move { client.list(&resource, &params, query).await.map(Some) }
                }
            },
        )?);
    }

    if let Some(verb) = &spec.get {
        tools.push(EndpointTool::new(
            tool_name(verb, "get"),
            verb.description,
            verb.schema.clone(),
            format!("retrieve {label} {{id}}"),
            OutputShape::Entity(resource.singular),
            move |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
                let params = path_params(&args, &["id"]);
                let query = query::encode(&args, &["id"]);
                client.get(&resource, &params, query).await.map(Some)
            },
        )?);
    }

    if let Some(verb) = &spec.create {
        tools.push(EndpointTool::new(
            tool_name(verb, "create"),
            verb.description,
            verb.schema.clone(),
            format!("create {label}{scope}"),
            OutputShape::Entity(resource.singular),
            move |client: Arc<RedmineClient>, args: Map<String, Value>| {
                let params = path_params(&args, &parents);
                let fields = body_fields(&args, &parents);
                async move { client.create(&resource, &params, fields).await }
            },
        )?);
    }

    if let Some(verb) = &spec.update {
        tools.push(EndpointTool::new(
            tool_name(verb, "update"),
            verb.description,
            verb.schema.clone(),
            format!("update {label} {{id}}"),
            OutputShape::Message(format!("{title} {{id}} updated successfully.")),
            move |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
                let params = path_params(&args, &["id"]);
                let fields = body_fields(&args, &["id"]);
                client.update(&resource, &params, fields).await.map(|_| None)
            },
        )?);
    }

    if let Some(verb) = &spec.delete {
        tools.push(EndpointTool::new(
            tool_name(verb, "delete"),
            verb.description,
            verb.schema.clone(),
            format!("delete {label} {{id}}"),
            OutputShape::Message(format!("{title} {{id}} deleted successfully.")),
            move |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
                let params = path_params(&args, &["id"]);
                client.delete(&resource, &params).await.map(|_| None)
            },
        )?);
    }

    Ok(tools)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

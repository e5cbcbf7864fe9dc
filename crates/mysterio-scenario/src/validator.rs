//! Structural validation of raw scenario documents.
//!
//! Generated content is untrusted. [`validate`] walks the raw JSON document
//! once and rejects anything that does not conform to the scenario schema,
//! before any model value is built from it.

use std::collections::HashSet;

use mysterio_core::error::DomainError;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::Phase;
use crate::schema::ScenarioSchema;

/// A schema violation, located by a JSON-pointer-like path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {reason}", display_path(.path))]
pub struct SchemaError {
    /// Location of the offending value (`""` is the document root).
    pub path: String,
    /// What is wrong with it.
    pub reason: String,
}

impl SchemaError {
    /// Creates a schema error at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<SchemaError> for DomainError {
    fn from(err: SchemaError) -> Self {
        DomainError::SchemaViolation {
            path: display_path(&err.path).to_owned(),
            reason: err.reason,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

/// Checks that `raw` conforms to the scenario schema.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found, in document order.
pub fn validate(raw: &Value, schema: &ScenarioSchema) -> Result<(), SchemaError> {
    let root = object(raw, "")?;
    allow_keys(root, &["meta", "truth", "roles", "phases"], "")?;

    let player_count = validate_meta(required(root, "meta", "")?, "/meta")?;
    string(required(root, "truth", "")?, "/truth")?;

    let role_ids = validate_roles(required(root, "roles", "")?, "/roles")?;
    if (role_ids.len() as u64) < player_count {
        return Err(SchemaError::new(
            "/roles",
            format!(
                "{} roles declared but meta.playerCount is {player_count}",
                role_ids.len()
            ),
        ));
    }

    validate_phases(required(root, "phases", "")?, "/phases", &role_ids, schema)
}

fn validate_meta(value: &Value, path: &str) -> Result<u64, SchemaError> {
    let meta = object(value, path)?;
    allow_keys(meta, &["title", "durationMinutes", "playerCount"], path)?;

    non_empty_string(required(meta, "title", path)?, &format!("{path}/title"))?;
    positive_u32(
        required(meta, "durationMinutes", path)?,
        &format!("{path}/durationMinutes"),
    )?;
    positive_u32(
        required(meta, "playerCount", path)?,
        &format!("{path}/playerCount"),
    )
}

fn validate_roles<'a>(value: &'a Value, path: &str) -> Result<HashSet<&'a str>, SchemaError> {
    let roles = non_empty_array(value, path)?;

    // Role ids first, so that secrets may reference roles declared later.
    let mut role_ids = HashSet::with_capacity(roles.len());
    for (index, role) in roles.iter().enumerate() {
        let role_path = format!("{path}/{index}");
        let role = object(role, &role_path)?;
        allow_keys(role, &["id", "name", "description", "secrets"], &role_path)?;

        let id = non_empty_string(required(role, "id", &role_path)?, &format!("{role_path}/id"))?;
        if !role_ids.insert(id) {
            return Err(SchemaError::new(
                format!("{role_path}/id"),
                format!("duplicate role id `{id}`"),
            ));
        }
        non_empty_string(
            required(role, "name", &role_path)?,
            &format!("{role_path}/name"),
        )?;
        string(
            required(role, "description", &role_path)?,
            &format!("{role_path}/description"),
        )?;
    }

    for (index, role) in roles.iter().enumerate() {
        let secrets_path = format!("{path}/{index}/secrets");
        let Some(secrets) = role.get("secrets") else {
            continue;
        };
        for (secret_index, secret) in array(secrets, &secrets_path)?.iter().enumerate() {
            let secret_path = format!("{secrets_path}/{secret_index}");
            let secret = object(secret, &secret_path)?;
            allow_keys(secret, &["targetRoleId", "content"], &secret_path)?;
            string(
                required(secret, "content", &secret_path)?,
                &format!("{secret_path}/content"),
            )?;
            if let Some(target) = secret.get("targetRoleId") {
                known_role(target, &format!("{secret_path}/targetRoleId"), &role_ids)?;
            }
        }
    }

    Ok(role_ids)
}

fn validate_phases(
    value: &Value,
    path: &str,
    role_ids: &HashSet<&str>,
    schema: &ScenarioSchema,
) -> Result<(), SchemaError> {
    let phases = non_empty_array(value, path)?;
    let mut previous: Option<(Phase, usize)> = None;
    let mut present = HashSet::with_capacity(phases.len());

    for (index, content) in phases.iter().enumerate() {
        let content_path = format!("{path}/{index}");
        let content = object(content, &content_path)?;
        allow_keys(content, &["phase", "public", "private"], &content_path)?;

        let tag_path = format!("{content_path}/phase");
        let tag = string(required(content, "phase", &content_path)?, &tag_path)?;
        let (phase, position) = Phase::from_tag(tag)
            .and_then(|phase| schema.position(phase).map(|position| (phase, position)))
            .ok_or_else(|| {
                SchemaError::new(
                    &tag_path,
                    format!("phase `{tag}` is not declared in the scenario schema"),
                )
            })?;

        if !present.insert(phase) {
            return Err(SchemaError::new(tag_path, format!("duplicate phase `{phase}`")));
        }
        if let Some((before, before_position)) = previous {
            if position < before_position {
                return Err(SchemaError::new(
                    tag_path,
                    format!("phase `{phase}` must not come after `{before}`"),
                ));
            }
        }
        previous = Some((phase, position));

        validate_public(
            required(content, "public", &content_path)?,
            &format!("{content_path}/public"),
        )?;
        if let Some(private) = content.get("private") {
            validate_private(private, &format!("{content_path}/private"), role_ids)?;
        }
    }

    if let Some(missing) = schema
        .required_phases()
        .iter()
        .find(|phase| !present.contains(*phase))
    {
        return Err(SchemaError::new(
            path,
            format!("missing required phase `{missing}`"),
        ));
    }

    Ok(())
}

fn validate_public(value: &Value, path: &str) -> Result<(), SchemaError> {
    let public = object(value, path)?;
    allow_keys(public, &["description", "text", "actions"], path)?;

    string(
        required(public, "description", path)?,
        &format!("{path}/description"),
    )?;
    if let Some(text) = public.get("text") {
        string(text, &format!("{path}/text"))?;
    }
    if let Some(actions) = public.get("actions") {
        string_array(actions, &format!("{path}/actions"))?;
    }
    Ok(())
}

fn validate_private(value: &Value, path: &str, role_ids: &HashSet<&str>) -> Result<(), SchemaError> {
    for (index, block) in array(value, path)?.iter().enumerate() {
        let block_path = format!("{path}/{index}");
        let block = object(block, &block_path)?;
        allow_keys(block, &["roleId", "hints"], &block_path)?;

        known_role(
            required(block, "roleId", &block_path)?,
            &format!("{block_path}/roleId"),
            role_ids,
        )?;
        string_array(
            required(block, "hints", &block_path)?,
            &format!("{block_path}/hints"),
        )?;
    }
    Ok(())
}

fn known_role(value: &Value, path: &str, role_ids: &HashSet<&str>) -> Result<(), SchemaError> {
    let id = non_empty_string(value, path)?;
    if role_ids.contains(id) {
        Ok(())
    } else {
        Err(SchemaError::new(path, format!("unknown role id `{id}`")))
    }
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, SchemaError> {
    object
        .get(key)
        .ok_or_else(|| SchemaError::new(format!("{path}/{key}"), "required field is missing"))
}

fn allow_keys(object: &Map<String, Value>, allowed: &[&str], path: &str) -> Result<(), SchemaError> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(SchemaError::new(
            format!("{path}/{key}"),
            "unknown field",
        )),
        None => Ok(()),
    }
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, format!("expected object, found {}", kind(value))))
}

fn array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, SchemaError> {
    value
        .as_array()
        .ok_or_else(|| SchemaError::new(path, format!("expected array, found {}", kind(value))))
}

fn non_empty_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, SchemaError> {
    let items = array(value, path)?;
    if items.is_empty() {
        return Err(SchemaError::new(path, "must not be empty"));
    }
    Ok(items)
}

fn string<'a>(value: &'a Value, path: &str) -> Result<&'a str, SchemaError> {
    value
        .as_str()
        .ok_or_else(|| SchemaError::new(path, format!("expected string, found {}", kind(value))))
}

fn non_empty_string<'a>(value: &'a Value, path: &str) -> Result<&'a str, SchemaError> {
    let text = string(value, path)?;
    if text.trim().is_empty() {
        return Err(SchemaError::new(path, "must not be blank"));
    }
    Ok(text)
}

fn string_array(value: &Value, path: &str) -> Result<(), SchemaError> {
    for (index, item) in array(value, path)?.iter().enumerate() {
        string(item, &format!("{path}/{index}"))?;
    }
    Ok(())
}

fn positive_u32(value: &Value, path: &str) -> Result<u64, SchemaError> {
    match value.as_u64() {
        Some(n) if n > 0 && n <= u64::from(u32::MAX) => Ok(n),
        Some(_) => Err(SchemaError::new(path, "must be a positive 32-bit integer")),
        None => Err(SchemaError::new(
            path,
            format!("expected positive integer, found {}", kind(value)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

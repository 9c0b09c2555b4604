//! Endpoint assembly: one [`EndpointDoc`] per documented (url, method) pair,
//! with example bodies bound to body parameters and responses, and permission
//! codes decoded from each operation's metadata.
//!
//! Operations without a `description` are internal and never assembled.

use serde::{Deserialize, Serialize};

use crate::document::{Operation, OperationEntry, RawResponse, SchemaDocument, SchemaRef};
use crate::graph::SchemaGraph;
use crate::render::ExampleBook;

const CONTROLLER_SUFFIX: &str = "-controller";

/// One operation parameter. Only `in: "body"` parameters get a [`body`].
///
/// [`body`]: Parameter::body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in", default)]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,

    /// Example body, resolved from `schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// One documented response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub http_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Documentation for one (url, method) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub url: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub description: String,
    /// The operation's `summary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub produces: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: Vec<Response>,
    /// Every controller tag the operation carries.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The controller this copy is listed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_controller: Option<String>,
    /// `<service>-service.<resource>.<action>`, when permission metadata decodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_interface: Option<bool>,
}

/// A controller tag and the endpoints listed under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub paths: Vec<EndpointDoc>,
}

/// Permission metadata decoded from an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub code: String,
    pub within: bool,
}

#[derive(Deserialize)]
struct ExtraData {
    permission: PermissionData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermissionData {
    action: String,
    #[serde(default)]
    permission_within: bool,
}

/// Assembles endpoint documentation for one service's schema document.
///
/// Example bodies are rendered once, when the assembler is created.
pub struct EndpointAssembler<'a> {
    service: &'a str,
    document: &'a SchemaDocument,
    book: ExampleBook,
}

impl<'a> EndpointAssembler<'a> {
    pub fn new(service: &'a str, document: &'a SchemaDocument) -> Self {
        let graph = SchemaGraph::from_document(document);
        Self {
            service,
            document,
            book: ExampleBook::build(&graph),
        }
    }

    pub fn book(&self) -> &ExampleBook {
        &self.book
    }

    /// Every documented endpoint, in path-table order.
    pub fn endpoints(&self) -> Vec<EndpointDoc> {
        self.document
            .operations()
            .into_iter()
            .filter_map(|entry| self.assemble(entry))
            .collect()
    }

    /// One [`ControllerDoc`] per document tag, in tag order. An endpoint with
    /// several tags is listed under each of them.
    pub fn controllers(&self) -> Vec<ControllerDoc> {
        let endpoints = self.endpoints();
        self.document
            .tags
            .iter()
            .map(|tag| ControllerDoc {
                name: tag.name.clone(),
                description: tag.description.clone(),
                paths: endpoints
                    .iter()
                    .filter(|e| e.tags.contains(&tag.name))
                    .map(|e| EndpointDoc {
                        ref_controller: Some(tag.name.clone()),
                        ..e.clone()
                    })
                    .collect(),
            })
            .collect()
    }

    fn assemble(&self, entry: OperationEntry<'_>) -> Option<EndpointDoc> {
        let OperationEntry {
            url,
            method,
            operation,
        } = entry;
        let Operation {
            tags,
            description,
            summary,
            operation_id,
            consumes,
            produces,
            parameters,
            responses,
        } = operation;
        let description = description?;

        let permission = decode_permission(self.service, &description, &tags);
        let parameters = parameters
            .into_iter()
            .filter_map(|raw| match Parameter::deserialize(&raw) {
                Ok(p) => Some(self.bind_parameter(p)),
                Err(e) => {
                    tracing::info!(url = %url, method = %method, error = %e, "dropping undecodable parameter");
                    None
                }
            })
            .collect();
        let responses = responses
            .into_iter()
            .map(|(status, raw)| self.bind_response(status, raw))
            .collect();

        Some(EndpointDoc {
            base_path: self.document.base_path.clone(),
            url: url.to_string(),
            method: method.to_string(),
            operation_id,
            description,
            remark: summary,
            consumes,
            produces,
            parameters,
            responses,
            tags,
            ref_controller: None,
            code: permission.as_ref().map(|p| p.code.clone()),
            inner_interface: permission.map(|p| p.within),
        })
    }

    fn bind_parameter(&self, mut parameter: Parameter) -> Parameter {
        if parameter.location.as_deref() == Some("body") {
            if let Some(schema) = &parameter.schema {
                parameter.body = resolve_body(schema, &self.book);
            }
        }
        parameter
    }

    fn bind_response(&self, status: String, raw: RawResponse) -> Response {
        Response {
            http_status: status,
            description: raw.description,
            body: raw.schema.as_ref().and_then(|s| resolve_body(s, &self.book)),
        }
    }
}

/// Resolve the example body of a body-parameter or response schema.
///
/// A direct reference to an entity missing from `book` has no body, and
/// neither does a schema with no reference and no type.
pub fn resolve_body(schema: &SchemaRef, book: &ExampleBook) -> Option<String> {
    if let Some(reference) = &schema.reference {
        return book.resolve(reference).map(str::to_string);
    }
    let kind = schema.kind.as_deref();
    if let Some(item_ref) = schema.items.as_ref().and_then(|i| i.reference.as_deref()) {
        let body = book.resolve(item_ref).unwrap_or_default();
        return Some(if kind == Some("array") {
            format!("[\n{body}\n]")
        } else {
            body.to_string()
        });
    }
    match kind {
        Some("object") => {
            let array_values = schema
                .additional_properties
                .as_ref()
                .and_then(|ap| ap.get("type"))
                .and_then(|t| t.as_str())
                == Some("array");
            let body = if array_values { "[{}]" } else { "{}" };
            Some(body.to_string())
        }
        Some(token) => Some(token.to_string()),
        None => None,
    }
}

/// Decode the permission metadata carried in an operation's `description`.
///
/// The description is expected to hold a JSON blob of the form
/// `{"permission": {"action": "...", "permissionWithin": false}}`. Anything
/// else, or an operation with no `-controller` tag to derive the resource
/// from, yields `None`.
pub fn decode_permission(service: &str, description: &str, tags: &[String]) -> Option<Permission> {
    let extra: ExtraData = match serde_json::from_str(description) {
        Ok(extra) => extra,
        Err(e) => {
            tracing::debug!(service = %service, error = %e, "operation carries no permission metadata");
            return None;
        }
    };
    let Some(resource) = tags
        .iter()
        .rev()
        .find_map(|t| t.strip_suffix(CONTROLLER_SUFFIX))
    else {
        tracing::debug!(service = %service, ?tags, "permission metadata without a controller tag");
        return None;
    };
    Some(Permission {
        code: format!("{service}-service.{resource}.{}", extra.permission.action),
        within: extra.permission.permission_within,
    })
}

/// Narrow `controllers` to controller `name` with only the endpoints whose
/// `operationId` is `operation_id`. `None` if no controller has that name.
pub fn find_operation(
    controllers: Vec<ControllerDoc>,
    name: &str,
    operation_id: &str,
) -> Option<ControllerDoc> {
    let mut controller = controllers.into_iter().find(|c| c.name == name)?;
    controller
        .paths
        .retain(|p| p.operation_id.as_deref() == Some(operation_id));
    Some(controller)
}

// --- tests -------------------------------------------------------------------

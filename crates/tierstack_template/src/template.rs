//! The template container and its JSON serialization.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::intrinsic::Expr;
use crate::parameter::Parameter;
use crate::resource::Resource;

/// Static lookup table: top-level key → (second-level key → value).
pub type Mapping = BTreeMap<String, BTreeMap<String, String>>;

/// Handle to a declared parameter or resource.
///
/// Handles are only produced by [`Template::add_parameter`] and
/// [`Template::add_resource`], so holding one means the name has already been
/// declared in the template it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalName(String);

impl LogicalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{"Ref": name}`
    pub fn reference(&self) -> Expr {
        Expr::Ref(self.0.clone())
    }

    /// `{"Fn::GetAtt": [name, attribute]}`
    pub fn get_att(&self, attribute: impl Into<String>) -> Expr {
        Expr::GetAtt {
            name: self.0.clone(),
            attribute: attribute.into(),
        }
    }
}

impl std::fmt::Display for LogicalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stack output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Expr,
}

impl Output {
    pub fn new(value: Expr) -> Self {
        Self {
            description: None,
            value,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An infrastructure template under construction.
///
/// Sections are keyed by logical name and kept sorted, so serialization is
/// deterministic regardless of declaration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion", skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "Mappings", skip_serializing_if = "BTreeMap::is_empty")]
    mappings: BTreeMap<String, Mapping>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, Parameter>,
    #[serde(rename = "Resources", skip_serializing_if = "BTreeMap::is_empty")]
    resources: BTreeMap<String, Resource>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn add_mapping(&mut self, name: impl Into<String>, mapping: Mapping) -> TemplateResult<()> {
        let name = name.into();
        check_name("mapping", &name, self.mappings.contains_key(&name))?;
        debug!("Adding mapping {} with {} entries", name, mapping.len());
        self.mappings.insert(name, mapping);
        Ok(())
    }

    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        parameter: Parameter,
    ) -> TemplateResult<LogicalName> {
        let name = name.into();
        check_name("parameter", &name, self.parameters.contains_key(&name))?;
        debug!("Adding parameter {} ({})", name, parameter.param_type);
        self.parameters.insert(name.clone(), parameter);
        Ok(LogicalName(name))
    }

    pub fn add_resource(
        &mut self,
        name: impl Into<String>,
        resource: impl Into<Resource>,
    ) -> TemplateResult<LogicalName> {
        let name = name.into();
        // Parameters and resources share one namespace for Ref.
        let taken = self.resources.contains_key(&name) || self.parameters.contains_key(&name);
        check_name("resource", &name, taken)?;
        let resource = resource.into();
        debug!("Adding resource {} ({})", name, resource.resource_type());
        self.resources.insert(name.clone(), resource);
        Ok(LogicalName(name))
    }

    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> TemplateResult<()> {
        let name = name.into();
        check_name("output", &name, self.outputs.contains_key(&name))?;
        debug!("Adding output {}", name);
        self.outputs.insert(name, output);
        Ok(())
    }

    pub fn mappings(&self) -> &BTreeMap<String, Mapping> {
        &self.mappings
    }

    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    /// Convert to a JSON value with every object's keys in sorted order.
    pub fn to_value(&self) -> TemplateResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty JSON with a four-space indent.
    pub fn to_json(&self) -> TemplateResult<String> {
        let value = self.to_value()?;
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Single-line JSON.
    pub fn to_json_compact(&self) -> TemplateResult<String> {
        let value = self.to_value()?;
        Ok(serde_json::to_string(&value)?)
    }
}

fn check_name(section: &'static str, name: &str, taken: bool) -> TemplateResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TemplateError::InvalidName(name.to_string()));
    }
    if taken {
        return Err(TemplateError::DuplicateKey {
            section,
            name: name.to_string(),
        });
    }
    Ok(())
}

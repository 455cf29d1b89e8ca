//! Reference checking for serialized templates.
//!
//! The checker works on a parsed JSON document rather than on [`Template`],
//! so it can be pointed at the exact text that is about to be emitted.
//!
//! [`Template`]: crate::template::Template

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::intrinsic::PseudoParameter;

/// Validation result with details.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical names declared by a template, per section.
struct Declared {
    parameters: BTreeSet<String>,
    resources: BTreeSet<String>,
    mappings: BTreeSet<String>,
}

impl Declared {
    fn from_root(root: &Map<String, Value>) -> Self {
        Self {
            parameters: section_keys(root, "Parameters"),
            resources: section_keys(root, "Resources"),
            mappings: section_keys(root, "Mappings"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Reference {
    Ref(String),
    GetAtt(String),
    FindInMap(String),
}

/// Checks that every symbolic reference in a template resolves.
pub struct ReferenceValidator;

impl ReferenceValidator {
    /// Validate a parsed template document.
    pub fn validate(document: &Value) -> ValidationResult {
        let Some(root) = document.as_object() else {
            let mut result = ValidationResult::new();
            result.add_error("Template must be a JSON object");
            return result;
        };

        let mut result = Self::validate_structure(root);
        let declared = Declared::from_root(root);

        for section in ["Resources", "Outputs"] {
            if let Some(Value::Object(entries)) = root.get(section) {
                result.merge(Self::validate_section(section, entries, &declared));
            }
        }

        result
    }

    /// Required and recommended top-level sections.
    pub fn validate_structure(root: &Map<String, Value>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if root.get("Description").is_none() {
            result.add_warning("Template description is recommended");
        }

        if root.get("Resources").is_none() {
            result.add_error("Template has no Resources section");
        }

        result
    }

    fn validate_section(
        section: &str,
        entries: &Map<String, Value>,
        declared: &Declared,
    ) -> ValidationResult {
        let mut result = ValidationResult::new();

        for (name, body) in entries {
            let mut found = Vec::new();
            collect_references(body, &mut found);
            debug!("{} '{}' has {} references", section, name, found.len());

            for reference in found {
                match reference {
                    Reference::Ref(target) => {
                        let known = declared.parameters.contains(&target)
                            || declared.resources.contains(&target)
                            || PseudoParameter::from_str(&target).is_some();
                        if !known {
                            result.add_error(format!(
                                "{} '{}' references undeclared name '{}'",
                                section, name, target
                            ));
                        }
                    }
                    Reference::GetAtt(target) => {
                        if !declared.resources.contains(&target) {
                            result.add_error(format!(
                                "{} '{}' reads an attribute of '{}', which is not a declared resource",
                                section, name, target
                            ));
                        }
                    }
                    Reference::FindInMap(map) => {
                        if !declared.mappings.contains(&map) {
                            result.add_error(format!(
                                "{} '{}' looks up undeclared mapping '{}'",
                                section, name, map
                            ));
                        }
                    }
                }
            }
        }

        result
    }

    /// All logical names targeted by `Ref` or `Fn::GetAtt` in resources and outputs.
    pub fn references(document: &Value) -> BTreeSet<String> {
        let mut found = Vec::new();
        for section in ["Resources", "Outputs"] {
            if let Some(body) = document.get(section) {
                collect_references(body, &mut found);
            }
        }

        found
            .into_iter()
            .filter_map(|reference| match reference {
                Reference::Ref(target) | Reference::GetAtt(target) => Some(target),
                Reference::FindInMap(_) => None,
            })
            .collect()
    }
}

fn section_keys(root: &Map<String, Value>, section: &str) -> BTreeSet<String> {
    root.get(section)
        .and_then(Value::as_object)
        .map(|entries| entries.keys().cloned().collect())
        .unwrap_or_default()
}

fn collect_references(value: &Value, found: &mut Vec<Reference>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(target)) = map.get("Ref") {
                    found.push(Reference::Ref(target.clone()));
                    return;
                }

                if let Some(args) = map.get("Fn::GetAtt") {
                    // Both the list form and the "Name.Attribute" short form.
                    let target = match args {
                        Value::Array(items) => items.first().and_then(Value::as_str),
                        Value::String(dotted) => dotted.split('.').next(),
                        _ => None,
                    };
                    if let Some(target) = target {
                        found.push(Reference::GetAtt(target.to_string()));
                    }
                    return;
                }

                if let Some(Value::Array(args)) = map.get("Fn::FindInMap") {
                    if let Some(map_name) = args.first().and_then(Value::as_str) {
                        found.push(Reference::FindInMap(map_name.to_string()));
                    }
                    for key in args.iter().skip(1) {
                        collect_references(key, found);
                    }
                    return;
                }
            }

            for nested in map.values() {
                collect_references(nested, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, found);
            }
        }
        _ => {}
    }
}

//! Template parameter declarations.

use serde::Serialize;

/// Declared type of a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterType {
    #[serde(rename = "String")]
    String,
    #[serde(rename = "Number")]
    Number,
    #[serde(rename = "AWS::EC2::KeyPair::KeyName")]
    KeyPairName,
    #[serde(rename = "List<AWS::EC2::Subnet::Id>")]
    SubnetIdList,
    #[serde(rename = "AWS::EC2::VPC::Id")]
    VpcId,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::KeyPairName => "AWS::EC2::KeyPair::KeyName",
            ParameterType::SubnetIdList => "List<AWS::EC2::Subnet::Id>",
            ParameterType::VpcId => "AWS::EC2::VPC::Id",
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deploy-time input to the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub param_type: ParameterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_description: Option<String>,
}

impl Parameter {
    pub fn new(param_type: ParameterType) -> Self {
        Self {
            param_type,
            default: None,
            description: None,
            allowed_values: Vec::new(),
            constraint_description: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_constraint_description(mut self, description: impl Into<String>) -> Self {
        self.constraint_description = Some(description.into());
        self
    }

    /// A parameter without a default must be supplied at deploy time.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_serialization_omits_empty_fields() {
        let param = Parameter::new(ParameterType::VpcId).with_description("Choose VPC");
        let value = serde_json::to_value(&param).unwrap();

        assert_eq!(value, json!({"Type": "AWS::EC2::VPC::Id", "Description": "Choose VPC"}));
        assert!(param.is_required());
    }

    #[test]
    fn test_parameter_with_constraints() {
        let param = Parameter::new(ParameterType::String)
            .with_default("t2.micro")
            .with_allowed_values(["t1.micro", "t2.micro"])
            .with_constraint_description("must be a valid EC2 instance type.");
        let value = serde_json::to_value(&param).unwrap();

        assert_eq!(value["Default"], "t2.micro");
        assert_eq!(value["AllowedValues"], json!(["t1.micro", "t2.micro"]));
        assert_eq!(value["ConstraintDescription"], "must be a valid EC2 instance type.");
        assert!(!param.is_required());
    }

    #[test]
    fn test_parameter_type_names() {
        assert_eq!(ParameterType::SubnetIdList.as_str(), "List<AWS::EC2::Subnet::Id>");
        assert_eq!(
            serde_json::to_value(ParameterType::KeyPairName).unwrap(),
            json!("AWS::EC2::KeyPair::KeyName")
        );
    }
}

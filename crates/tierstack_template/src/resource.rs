//! Typed resource definitions.
//!
//! Only the resource types and properties the tierstack topologies use are
//! modelled. Property names serialize in the engine's PascalCase form and
//! optional properties are left out of the document when unset.

use serde::Serialize;

use crate::intrinsic::Expr;

/// A declared resource: its type tag plus typed properties.
///
/// Serializes as `{"Type": "...", "Properties": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::EC2::SecurityGroup")]
    SecurityGroup(SecurityGroup),
    #[serde(rename = "AWS::EC2::Instance")]
    Instance(Instance),
    #[serde(rename = "AWS::ElasticLoadBalancingV2::LoadBalancer")]
    LoadBalancer(LoadBalancer),
    #[serde(rename = "AWS::ElasticLoadBalancingV2::TargetGroup")]
    TargetGroup(TargetGroup),
    #[serde(rename = "AWS::ElasticLoadBalancingV2::Listener")]
    Listener(Listener),
    #[serde(rename = "AWS::ElasticLoadBalancingV2::ListenerRule")]
    ListenerRule(ListenerRule),
}

impl Resource {
    /// The engine type name, e.g. `AWS::EC2::Instance`.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::SecurityGroup(_) => "AWS::EC2::SecurityGroup",
            Resource::Instance(_) => "AWS::EC2::Instance",
            Resource::LoadBalancer(_) => "AWS::ElasticLoadBalancingV2::LoadBalancer",
            Resource::TargetGroup(_) => "AWS::ElasticLoadBalancingV2::TargetGroup",
            Resource::Listener(_) => "AWS::ElasticLoadBalancingV2::Listener",
            Resource::ListenerRule(_) => "AWS::ElasticLoadBalancingV2::ListenerRule",
        }
    }
}

macro_rules! impl_into_resource {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Resource {
                fn from(value: $ty) -> Self {
                    Resource::$ty(value)
                }
            }
        )*
    };
}

impl_into_resource!(SecurityGroup, Instance, LoadBalancer, TargetGroup, Listener, ListenerRule);

// ============================================================================
// EC2
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ingress: Vec<IngressRule>,
}

impl SecurityGroup {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            group_description: description.into(),
            security_group_ingress: Vec::new(),
        }
    }

    pub fn ingress(mut self, rule: IngressRule) -> Self {
        self.security_group_ingress.push(rule);
        self
    }
}

/// Inbound rule. Ports are expressions so they can come from parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IngressRule {
    pub ip_protocol: String,
    pub from_port: Expr,
    pub to_port: Expr,
    pub cidr_ip: String,
}

impl IngressRule {
    /// A single-port TCP rule.
    pub fn tcp(port: impl Into<Expr>, cidr: impl Into<String>) -> Self {
        let port = port.into();
        Self {
            ip_protocol: "tcp".to_string(),
            from_port: port.clone(),
            to_port: port,
            cidr_ip: cidr.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub image_id: Expr,
    pub instance_type: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<Expr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Expr>,
}

impl Instance {
    pub fn new(image_id: Expr, instance_type: Expr) -> Self {
        Self {
            image_id,
            instance_type,
            key_name: None,
            security_groups: Vec::new(),
            user_data: None,
        }
    }

    pub fn key_name(mut self, key_name: Expr) -> Self {
        self.key_name = Some(key_name);
        self
    }

    pub fn security_group(mut self, group: Expr) -> Self {
        self.security_groups.push(group);
        self
    }

    pub fn user_data(mut self, user_data: Expr) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

// ============================================================================
// Elastic Load Balancing v2
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub subnets: Expr,
}

/// Expected health check response codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Matcher {
    pub http_code: String,
}

/// A backend endpoint registered with a target group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetDescription {
    pub id: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_interval_seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_timeout_seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<Matcher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub port: Expr,
    pub protocol: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<TargetDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<String>,
    pub vpc_id: Expr,
}

/// Listener or rule action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    #[serde(rename = "Type")]
    pub action_type: String,
    pub target_group_arn: Expr,
}

impl Action {
    pub fn forward(target_group: Expr) -> Self {
        Self {
            action_type: "forward".to_string(),
            target_group_arn: target_group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listener {
    pub default_actions: Vec<Action>,
    pub load_balancer_arn: Expr,
    pub port: String,
    pub protocol: String,
}

/// Match condition of a listener rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleCondition {
    pub field: String,
    pub values: Vec<String>,
}

impl RuleCondition {
    pub fn path_pattern(pattern: impl Into<String>) -> Self {
        Self {
            field: "path-pattern".to_string(),
            values: vec![pattern.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListenerRule {
    pub actions: Vec<Action>,
    pub conditions: Vec<RuleCondition>,
    pub listener_arn: Expr,
    pub priority: String,
}

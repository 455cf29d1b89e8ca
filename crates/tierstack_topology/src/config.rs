//! Topology configuration.
//!
//! Every literal the generated template carries lives here. The defaults
//! describe the stock web/api deployment; a YAML file can override any
//! top-level field and missing fields fall back to the defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{TopologyError, TopologyResult};

/// Settings for one tier (an instance plus its target group).
///
/// A tier block in a config file must be given in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Logical name of the compute instance.
    pub instance_name: String,
    /// Logical name of the target group resource.
    pub target_group_name: String,
    /// `Name` property of the target group.
    pub target_name: String,
    /// Logical name of the port parameter.
    pub port_parameter: String,
    /// Description of the port parameter.
    pub port_description: String,
    /// Default value of the port parameter.
    pub default_port: String,
    /// Port written into the boot script's httpd `Listen` rewrite.
    ///
    /// Not derived from `default_port`; see [`TopologyConfig::boot_port_drift`].
    pub boot_listen_port: String,
    /// Final line appended verbatim to the boot script.
    pub boot_script_tail: String,
}

impl TierConfig {
    pub fn web() -> Self {
        Self {
            instance_name: "WebInstance".to_string(),
            target_group_name: "TargetGroupWeb".to_string(),
            target_name: "WebTarget".to_string(),
            port_parameter: "WebServerPort".to_string(),
            port_description: "TCP/IP port of the web server".to_string(),
            default_port: "8888".to_string(),
            boot_listen_port: "8888".to_string(),
            boot_script_tail: "Ref(webport_param)".to_string(),
        }
    }

    pub fn api() -> Self {
        Self {
            instance_name: "ApiInstance".to_string(),
            target_group_name: "TargetGroupApi".to_string(),
            target_name: "ApiTarget".to_string(),
            port_parameter: "ApiServerPort".to_string(),
            port_description: "TCP/IP port of the api server".to_string(),
            default_port: "8889".to_string(),
            boot_listen_port: "8889".to_string(),
            boot_script_tail: "Ref(web2_param)".to_string(),
        }
    }
}

/// Target group health check settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    pub interval_seconds: String,
    pub protocol: String,
    pub timeout_seconds: String,
    pub healthy_threshold: String,
    pub unhealthy_threshold: String,
    pub success_codes: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_seconds: "30".to_string(),
            protocol: "HTTP".to_string(),
            timeout_seconds: "10".to_string(),
            healthy_threshold: "4".to_string(),
            unhealthy_threshold: "3".to_string(),
            success_codes: "200".to_string(),
        }
    }
}

/// Full configuration of the two-tier topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub format_version: String,
    pub description: String,
    /// Region → AMI id, emitted as the `RegionMap` mapping.
    pub region_amis: BTreeMap<String, String>,
    pub key_name_default: String,
    pub instance_type_default: String,
    pub instance_types: Vec<String>,
    pub ingress_cidr: String,
    pub ssh_port: String,
    pub web: TierConfig,
    pub api: TierConfig,
    pub health_check: HealthCheckConfig,
    pub load_balancer_name: String,
    pub load_balancer_scheme: String,
    pub listener_port: String,
    pub api_path_pattern: String,
    pub api_rule_priority: String,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        let region_amis = [
            ("us-east-1", "ami-009d6802948d06e52"),
            ("us-west-1", "ami-011b6930a81cd6aaf"),
            ("us-west-2", "ami-011b6930a81cd6aaf"),
            ("eu-central-1", "ami-034fffcc6a0063961"),
            ("sa-east-1", "ami-0112d42866980b373"),
        ]
        .into_iter()
        .map(|(region, ami)| (region.to_string(), ami.to_string()))
        .collect();

        Self {
            format_version: "2010-09-09".to_string(),
            description: "AWS CloudFormation Sample Template: ELB with 2 EC2 instances".to_string(),
            region_amis,
            key_name_default: "ansible-key".to_string(),
            instance_type_default: "t2.micro".to_string(),
            instance_types: vec!["t1.micro".to_string(), "t2.micro".to_string()],
            ingress_cidr: "0.0.0.0/0".to_string(),
            ssh_port: "22".to_string(),
            web: TierConfig::web(),
            api: TierConfig::api(),
            health_check: HealthCheckConfig::default(),
            load_balancer_name: "ApplicationElasticLB".to_string(),
            load_balancer_scheme: "internet-facing".to_string(),
            listener_port: "80".to_string(),
            api_path_pattern: "/api/*".to_string(),
            api_rule_priority: "1".to_string(),
        }
    }
}

impl TopologyConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> TopologyResult<Self> {
        if !path.exists() {
            return Err(TopologyError::ConfigNotFound(path.to_path_buf()));
        }

        info!("Loading topology config from {:?}", path);
        let content = fs::read_to_string(path)?;
        let config: TopologyConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_file(&self, path: &Path) -> TopologyResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        debug!("Wrote topology config to {:?}", path);
        Ok(())
    }

    /// Tiers whose boot-script listen port differs from their port parameter's default.
    ///
    /// The boot script never reads the parameter, so a deployment that keeps
    /// the defaults but edits only one of the two values serves traffic on a
    /// port the target group does not health-check.
    pub fn boot_port_drift(&self) -> Vec<String> {
        [&self.web, &self.api]
            .into_iter()
            .filter(|tier| tier.boot_listen_port != tier.default_port)
            .map(|tier| {
                format!(
                    "{}: boot script listens on {} but {} defaults to {}",
                    tier.instance_name, tier.boot_listen_port, tier.port_parameter, tier.default_port
                )
            })
            .collect()
    }
}

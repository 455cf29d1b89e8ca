//! Two-tier template assembly.
//!
//! One pass, top to bottom: mapping, parameters, security group, instances,
//! load balancer, target groups, listener, listener rule, output. Each step
//! takes the handles of what it references, so the declaration order cannot
//! be broken without the code failing to compile.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use tierstack_template::{
    Action, Expr, IngressRule, Instance, Listener, ListenerRule, LoadBalancer, LogicalName,
    Mapping, Matcher, Output, Parameter, ParameterType, PseudoParameter, RuleCondition,
    SecurityGroup, TargetDescription, TargetGroup, Template,
};

use crate::config::{TierConfig, TopologyConfig};
use crate::error::TopologyResult;

pub const REGION_MAP: &str = "RegionMap";
pub const AMI_KEY: &str = "AMI";
pub const SECURITY_GROUP: &str = "InstanceSecurityGroup";
pub const LISTENER: &str = "Listener";
pub const LISTENER_RULE: &str = "ListenerRuleApi";
pub const URL_OUTPUT: &str = "URL";

/// Handles to the declared parameters.
struct Parameters {
    key_name: LogicalName,
    instance_type: LogicalName,
    web_port: LogicalName,
    api_port: LogicalName,
    subnets: LogicalName,
    vpc: LogicalName,
}

/// Build the web/api load balancer template.
pub fn build_template(config: &TopologyConfig) -> TopologyResult<Template> {
    info!("Building two-tier template");

    for drift in config.boot_port_drift() {
        warn!("{}", drift);
    }

    let mut template = Template::new()
        .with_version(&config.format_version)
        .with_description(&config.description);

    add_region_map(&mut template, config)?;
    let params = add_parameters(&mut template, config)?;

    let security_group = template.add_resource(
        SECURITY_GROUP,
        SecurityGroup::new("Enable SSH and HTTP access on the inbound port")
            .ingress(IngressRule::tcp(config.ssh_port.as_str(), &config.ingress_cidr))
            .ingress(IngressRule::tcp(params.web_port.reference(), &config.ingress_cidr))
            .ingress(IngressRule::tcp(params.api_port.reference(), &config.ingress_cidr)),
    )?;

    let web_instance = add_instance(&mut template, &config.web, &params, &security_group)?;
    let api_instance = add_instance(&mut template, &config.api, &params, &security_group)?;

    let load_balancer = template.add_resource(
        config.load_balancer_name.as_str(),
        LoadBalancer {
            name: Some(config.load_balancer_name.clone()),
            scheme: Some(config.load_balancer_scheme.clone()),
            subnets: params.subnets.reference(),
        },
    )?;

    let web_targets = add_target_group(
        &mut template,
        config,
        &config.web,
        &web_instance,
        &params.web_port,
        &params.vpc,
    )?;
    let api_targets = add_target_group(
        &mut template,
        config,
        &config.api,
        &api_instance,
        &params.api_port,
        &params.vpc,
    )?;

    let listener = template.add_resource(
        LISTENER,
        Listener {
            default_actions: vec![Action::forward(web_targets.reference())],
            load_balancer_arn: load_balancer.reference(),
            port: config.listener_port.clone(),
            protocol: "HTTP".to_string(),
        },
    )?;

    template.add_resource(
        LISTENER_RULE,
        ListenerRule {
            actions: vec![Action::forward(api_targets.reference())],
            conditions: vec![RuleCondition::path_pattern(&config.api_path_pattern)],
            listener_arn: listener.reference(),
            priority: config.api_rule_priority.clone(),
        },
    )?;

    template.add_output(
        URL_OUTPUT,
        Output::new(Expr::join(
            "",
            vec!["http://".into(), load_balancer.get_att("DNSName")],
        ))
        .with_description("URL of the sample website"),
    )?;

    info!(
        "Template built with {} parameters and {} resources",
        template.parameters().len(),
        template.resources().len()
    );
    Ok(template)
}

fn add_region_map(template: &mut Template, config: &TopologyConfig) -> TopologyResult<()> {
    let mapping: Mapping = config
        .region_amis
        .iter()
        .map(|(region, ami)| {
            let entry: BTreeMap<String, String> =
                [(AMI_KEY.to_string(), ami.clone())].into_iter().collect();
            (region.clone(), entry)
        })
        .collect();

    template.add_mapping(REGION_MAP, mapping)?;
    Ok(())
}

fn add_parameters(template: &mut Template, config: &TopologyConfig) -> TopologyResult<Parameters> {
    let key_name = template.add_parameter(
        "KeyName",
        Parameter::new(ParameterType::KeyPairName)
            .with_default(&config.key_name_default)
            .with_description("Name of an existing EC2 KeyPair to enable SSH access to the instance"),
    )?;

    let instance_type = template.add_parameter(
        "InstanceType",
        Parameter::new(ParameterType::String)
            .with_description("WebServer EC2 instance type")
            .with_default(&config.instance_type_default)
            .with_allowed_values(config.instance_types.iter().cloned())
            .with_constraint_description("must be a valid EC2 instance type."),
    )?;

    let web_port = add_port_parameter(template, &config.web)?;
    let api_port = add_port_parameter(template, &config.api)?;

    let subnets = template.add_parameter(
        "subnetA",
        Parameter::new(ParameterType::SubnetIdList).with_description("Choose Subnets"),
    )?;

    let vpc = template.add_parameter(
        "VpcId",
        Parameter::new(ParameterType::VpcId).with_description("Choose VPC"),
    )?;

    Ok(Parameters {
        key_name,
        instance_type,
        web_port,
        api_port,
        subnets,
        vpc,
    })
}

fn add_port_parameter(template: &mut Template, tier: &TierConfig) -> TopologyResult<LogicalName> {
    let name = template.add_parameter(
        tier.port_parameter.as_str(),
        Parameter::new(ParameterType::String)
            .with_default(&tier.default_port)
            .with_description(&tier.port_description),
    )?;
    Ok(name)
}

fn add_instance(
    template: &mut Template,
    tier: &TierConfig,
    params: &Parameters,
    security_group: &LogicalName,
) -> TopologyResult<LogicalName> {
    let image_id = Expr::find_in_map(REGION_MAP, Expr::pseudo(PseudoParameter::Region), AMI_KEY);

    let instance = Instance::new(image_id, params.instance_type.reference())
        .security_group(security_group.reference())
        .key_name(params.key_name.reference())
        .user_data(boot_script(tier));

    debug!("Instance {} boots httpd on port {}", tier.instance_name, tier.boot_listen_port);
    Ok(template.add_resource(tier.instance_name.as_str(), instance)?)
}

/// User data that installs httpd and rewrites its listen port.
///
/// The lines are emitted exactly as the stock deployment ships them. The port
/// is the tier's `boot_listen_port` literal, and the tail is plain text, not
/// a reference to the port parameter.
pub fn boot_script(tier: &TierConfig) -> Expr {
    let lines = [
        "#!/bin/bash\n".to_string(),
        "sudo yum -y update\n".to_string(),
        "sudo yum install -y httpd php\n".to_string(),
        format!(
            "sudo sed - i \"42s/Listen 80/Listen {}/\" / etc / httpd / conf / httpd.conf\n",
            tier.boot_listen_port
        ),
        "sudo service httpd restart \n".to_string(),
        tier.boot_script_tail.clone(),
    ];

    Expr::base64(Expr::join("", lines.into_iter().map(Expr::Literal).collect()))
}

fn add_target_group(
    template: &mut Template,
    config: &TopologyConfig,
    tier: &TierConfig,
    instance: &LogicalName,
    port: &LogicalName,
    vpc: &LogicalName,
) -> TopologyResult<LogicalName> {
    let health = &config.health_check;

    let group = TargetGroup {
        health_check_interval_seconds: Some(health.interval_seconds.clone()),
        health_check_protocol: Some(health.protocol.clone()),
        health_check_timeout_seconds: Some(health.timeout_seconds.clone()),
        healthy_threshold_count: Some(health.healthy_threshold.clone()),
        matcher: Some(Matcher {
            http_code: health.success_codes.clone(),
        }),
        name: Some(tier.target_name.clone()),
        port: port.reference(),
        protocol: "HTTP".to_string(),
        targets: vec![TargetDescription {
            id: instance.reference(),
            port: Some(port.reference()),
        }],
        unhealthy_threshold_count: Some(health.unhealthy_threshold.clone()),
        vpc_id: vpc.reference(),
    };

    Ok(template.add_resource(tier.target_group_name.as_str(), group)?)
}

//! Integration tests for the two-tier template.

use std::collections::BTreeSet;
use std::fs;

use serde_json::{json, Value};
use tempfile::tempdir;

use tierstack_template::ReferenceValidator;
use tierstack_topology::{render, TopologyConfig};

fn default_document() -> Value {
    let json = render(&TopologyConfig::default(), false).unwrap();
    serde_json::from_str(&json).expect("emitted template must be valid JSON")
}

fn properties<'a>(doc: &'a Value, name: &str) -> &'a Value {
    &doc["Resources"][name]["Properties"]
}

fn parameter_default<'a>(doc: &'a Value, reference: &Value) -> &'a Value {
    let name = reference["Ref"].as_str().expect("expected a Ref");
    &doc["Parameters"][name]["Default"]
}

#[test]
fn test_top_level_sections() {
    let doc = default_document();
    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();

    assert_eq!(
        keys,
        vec![
            "AWSTemplateFormatVersion",
            "Description",
            "Mappings",
            "Outputs",
            "Parameters",
            "Resources"
        ]
    );
    assert_eq!(doc["AWSTemplateFormatVersion"], "2010-09-09");
    assert_eq!(
        doc["Description"],
        "AWS CloudFormation Sample Template: ELB with 2 EC2 instances"
    );
}

#[test]
fn test_resource_types() {
    let doc = default_document();
    let types: Vec<(&str, &str)> = doc["Resources"]
        .as_object()
        .unwrap()
        .iter()
        .map(|(name, body)| (name.as_str(), body["Type"].as_str().unwrap()))
        .collect();

    assert_eq!(
        types,
        vec![
            ("ApiInstance", "AWS::EC2::Instance"),
            ("ApplicationElasticLB", "AWS::ElasticLoadBalancingV2::LoadBalancer"),
            ("InstanceSecurityGroup", "AWS::EC2::SecurityGroup"),
            ("Listener", "AWS::ElasticLoadBalancingV2::Listener"),
            ("ListenerRuleApi", "AWS::ElasticLoadBalancingV2::ListenerRule"),
            ("TargetGroupApi", "AWS::ElasticLoadBalancingV2::TargetGroup"),
            ("TargetGroupWeb", "AWS::ElasticLoadBalancingV2::TargetGroup"),
            ("WebInstance", "AWS::EC2::Instance"),
        ]
    );
}

#[test]
fn test_parameters_match_deploy_interface() {
    let doc = default_document();
    let params = &doc["Parameters"];

    assert_eq!(params["KeyName"]["Type"], "AWS::EC2::KeyPair::KeyName");
    assert_eq!(params["KeyName"]["Default"], "ansible-key");
    assert_eq!(params["InstanceType"]["Type"], "String");
    assert_eq!(params["InstanceType"]["Default"], "t2.micro");
    assert_eq!(params["InstanceType"]["AllowedValues"], json!(["t1.micro", "t2.micro"]));
    assert_eq!(params["WebServerPort"]["Default"], "8888");
    assert_eq!(params["ApiServerPort"]["Default"], "8889");
    assert_eq!(params["subnetA"]["Type"], "List<AWS::EC2::Subnet::Id>");
    assert!(params["subnetA"].get("Default").is_none());
    assert_eq!(params["VpcId"]["Type"], "AWS::EC2::VPC::Id");
    assert!(params["VpcId"].get("Default").is_none());
}

#[test]
fn test_region_map() {
    let doc = default_document();
    let regions = doc["Mappings"]["RegionMap"].as_object().unwrap();

    assert_eq!(regions.len(), 5);
    assert_eq!(regions["us-east-1"]["AMI"], "ami-009d6802948d06e52");
    assert_eq!(regions["sa-east-1"]["AMI"], "ami-0112d42866980b373");
}

#[test]
fn test_no_dangling_references() {
    let doc = default_document();

    let result = ReferenceValidator::validate(&doc);
    assert!(result.valid, "dangling references: {:?}", result.errors);
    assert!(result.warnings.is_empty());

    let declared: BTreeSet<String> = ["Parameters", "Resources"]
        .iter()
        .flat_map(|section| doc[*section].as_object().unwrap().keys().cloned())
        .collect();
    for target in ReferenceValidator::references(&doc) {
        assert!(
            declared.contains(&target) || target == "AWS::Region",
            "unresolved reference {}",
            target
        );
    }
}

#[test]
fn test_security_group_ingress() {
    let doc = default_document();
    let ingress = properties(&doc, "InstanceSecurityGroup")["SecurityGroupIngress"]
        .as_array()
        .unwrap();

    assert_eq!(ingress.len(), 3);
    assert_eq!(ingress[0]["FromPort"], "22");
    assert_eq!(ingress[0]["ToPort"], "22");
    assert_eq!(parameter_default(&doc, &ingress[1]["FromPort"]), "8888");
    assert_eq!(parameter_default(&doc, &ingress[1]["ToPort"]), "8888");
    assert_eq!(parameter_default(&doc, &ingress[2]["FromPort"]), "8889");
    assert_eq!(parameter_default(&doc, &ingress[2]["ToPort"]), "8889");

    for rule in ingress {
        assert_eq!(rule["IpProtocol"], "tcp");
        assert_eq!(rule["CidrIp"], "0.0.0.0/0");
    }
}

#[test]
fn test_instances_wiring() {
    let doc = default_document();

    for name in ["WebInstance", "ApiInstance"] {
        let props = properties(&doc, name);
        assert_eq!(props["SecurityGroups"], json!([{"Ref": "InstanceSecurityGroup"}]));
        assert_eq!(props["KeyName"], json!({"Ref": "KeyName"}));
        assert_eq!(props["InstanceType"], json!({"Ref": "InstanceType"}));
        assert_eq!(
            props["ImageId"],
            json!({"Fn::FindInMap": ["RegionMap", {"Ref": "AWS::Region"}, "AMI"]})
        );
    }
}

#[test]
fn test_boot_script_port_literals_preserved() {
    let doc = default_document();

    let web = &properties(&doc, "WebInstance")["UserData"]["Fn::Base64"]["Fn::Join"];
    assert_eq!(web[0], "");
    assert_eq!(
        web[1],
        json!([
            "#!/bin/bash\n",
            "sudo yum -y update\n",
            "sudo yum install -y httpd php\n",
            "sudo sed - i \"42s/Listen 80/Listen 8888/\" / etc / httpd / conf / httpd.conf\n",
            "sudo service httpd restart \n",
            "Ref(webport_param)"
        ])
    );

    let api = &properties(&doc, "ApiInstance")["UserData"]["Fn::Base64"]["Fn::Join"][1];
    assert!(api[3].as_str().unwrap().contains("Listen 8889/"));
    assert_eq!(api[5], "Ref(web2_param)");
}

#[test]
fn test_target_groups() {
    let doc = default_document();

    for (group, instance, param, target_name, port) in [
        ("TargetGroupWeb", "WebInstance", "WebServerPort", "WebTarget", "8888"),
        ("TargetGroupApi", "ApiInstance", "ApiServerPort", "ApiTarget", "8889"),
    ] {
        let props = properties(&doc, group);
        assert_eq!(props["Port"], json!({"Ref": param}));
        assert_eq!(parameter_default(&doc, &props["Port"]), port);
        assert_eq!(props["Protocol"], "HTTP");
        assert_eq!(props["Name"], target_name);
        assert_eq!(props["VpcId"], json!({"Ref": "VpcId"}));
        assert_eq!(props["HealthCheckIntervalSeconds"], "30");
        assert_eq!(props["HealthCheckProtocol"], "HTTP");
        assert_eq!(props["HealthCheckTimeoutSeconds"], "10");
        assert_eq!(props["HealthyThresholdCount"], "4");
        assert_eq!(props["UnhealthyThresholdCount"], "3");
        assert_eq!(props["Matcher"], json!({"HttpCode": "200"}));

        let targets = props["Targets"].as_array().unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0]["Id"], json!({"Ref": instance}));
        assert_eq!(targets[0]["Port"], props["Port"]);
    }
}

#[test]
fn test_listener_and_rule_routing() {
    let doc = default_document();

    let lb = properties(&doc, "ApplicationElasticLB");
    assert_eq!(lb["Name"], "ApplicationElasticLB");
    assert_eq!(lb["Scheme"], "internet-facing");
    assert_eq!(lb["Subnets"], json!({"Ref": "subnetA"}));

    let listener = properties(&doc, "Listener");
    assert_eq!(listener["Port"], "80");
    assert_eq!(listener["Protocol"], "HTTP");
    assert_eq!(listener["LoadBalancerArn"], json!({"Ref": "ApplicationElasticLB"}));
    assert_eq!(
        listener["DefaultActions"],
        json!([{"Type": "forward", "TargetGroupArn": {"Ref": "TargetGroupWeb"}}])
    );

    let rule = properties(&doc, "ListenerRuleApi");
    assert_eq!(rule["ListenerArn"], json!({"Ref": "Listener"}));
    assert_eq!(rule["Priority"], "1");
    assert_eq!(
        rule["Conditions"],
        json!([{"Field": "path-pattern", "Values": ["/api/*"]}])
    );
    assert_eq!(
        rule["Actions"],
        json!([{"Type": "forward", "TargetGroupArn": {"Ref": "TargetGroupApi"}}])
    );
}

#[test]
fn test_url_output() {
    let doc = default_document();
    let output = &doc["Outputs"]["URL"];

    assert_eq!(output["Description"], "URL of the sample website");
    assert_eq!(
        output["Value"],
        json!({"Fn::Join": ["", ["http://", {"Fn::GetAtt": ["ApplicationElasticLB", "DNSName"]}]]})
    );
}

#[test]
fn test_output_is_deterministic() {
    let config = TopologyConfig::default();

    assert_eq!(render(&config, false).unwrap(), render(&config, false).unwrap());
    assert_eq!(render(&config, true).unwrap(), render(&config, true).unwrap());
}

#[test]
fn test_compact_and_pretty_agree() {
    let config = TopologyConfig::default();
    let pretty: Value = serde_json::from_str(&render(&config, false).unwrap()).unwrap();
    let compact = render(&config, true).unwrap();

    assert!(!compact.contains('\n'));
    assert_eq!(pretty, serde_json::from_str::<Value>(&compact).unwrap());
}

#[test]
fn test_config_file_overrides_template() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("topology.yaml");
    fs::write(&path, "api_path_pattern: /v2/*\nlistener_port: \"8080\"\n").unwrap();

    let config = TopologyConfig::from_file(&path).unwrap();
    let doc: Value = serde_json::from_str(&render(&config, false).unwrap()).unwrap();

    assert_eq!(properties(&doc, "Listener")["Port"], "8080");
    assert_eq!(
        properties(&doc, "ListenerRuleApi")["Conditions"][0]["Values"],
        json!(["/v2/*"])
    );
    assert!(ReferenceValidator::validate(&doc).valid);
}

//! Shared fixtures for builder tests

use gateflow_config::StackSettings;
use gateflow_core::{Descriptor, Template};

pub fn settings() -> StackSettings {
    StackSettings {
        stack: "dev".to_string(),
        project: "acme-dev".to_string(),
        region: "us-central1".to_string(),
        zone: Some("us-central1-a".to_string()),
        general_tag_name: "acme".to_string(),
        target_domain: "api.acme.dev".to_string(),
        target_domain_redirect: "acme.dev".to_string(),
        vpc_network: "acme-vpc".to_string(),
        vpc_connector_range: "10.8.0.0/28".to_string(),
        sls_service_name: "acme-functions".to_string(),
        alb_http_route: false,
        alb_header_powered_by: "acme".to_string(),
    }
}

pub const CREATE_YAML: &str = r#"
resources:
  - type: storage.v1.bucket
    name: myfuncs-abc123-xyz
"#;

pub const UPDATE_YAML: &str = r#"
resources:
  - type: storage.v1.bucket
    name: myfuncs-abc123-xyz
  - type: cloudfunctions.v1beta2.function
    name: acme-dev-users
    properties:
      location: us-central1
      runtime: nodejs18
      function: users
      entryPoint: users
      availableMemoryMb: 256
      timeout: 60s
      sourceArchiveUrl: gs://myfuncs-abc123/serverless/acme/dev/1700000000/acme.zip
      httpsTrigger:
        url: /users
      environmentVariables:
        NODE_ENV: production
  - type: cloudfunctions.v1beta2.function
    name: acme-dev-orders
    properties:
      location: us-central1
      runtime: nodejs18
      function: orders
      entryPoint: orders
      availableMemoryMb: 512
      timeout: 540s
      sourceArchiveUrl: gs://myfuncs-abc123/serverless/acme/dev/1700000000/acme.zip
      httpsTrigger:
        url: /orders
"#;

pub fn descriptor() -> Descriptor {
    Descriptor {
        create: parse(CREATE_YAML),
        update: parse(UPDATE_YAML),
    }
}

fn parse(yaml: &str) -> Template {
    serde_yaml::from_str(yaml).unwrap()
}

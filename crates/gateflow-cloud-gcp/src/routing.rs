//! Routing layer: endpoint groups, backend services, URL map, proxies, forwarding rules

use crate::error::{GcpError, Result};
use crate::network::NetworkEdge;
use crate::types;
use gateflow_cloud::{Resource, ResourceGraph, ResourceHandle, escape_literal};
use gateflow_config::StackSettings;
use gateflow_core::DescriptorEntry;
use serde_json::{Value, json};

/// Name of the single path matcher on the URL map
pub const PATH_MATCHER: &str = "allpaths";

/// Response headers added by every backend service
pub fn security_headers(powered_by: &str) -> Vec<String> {
    vec![
        "X-Frame-Options: DENY".to_string(),
        "X-XSS-Protection: 1; mode=block".to_string(),
        "Content-Security-Policy: frame-ancestors 'self'".to_string(),
        "Strict-Transport-Security: max-age=31536000; includesubdomains".to_string(),
        "X-Content-Type-Options: nosniff".to_string(),
        format!("X-Powered-By: {}", powered_by),
        "Cache-Control: no-cache=\"Set-Cookie\"".to_string(),
    ]
}

/// URL path → backend service
#[derive(Debug, Clone)]
pub struct PathRule {
    pub paths: Vec<String>,
    pub service: ResourceHandle,
}

impl PathRule {
    fn to_value(&self) -> Value {
        let paths: Vec<String> = self.paths.iter().map(|p| escape_literal(p)).collect();
        json!({
            "paths": paths,
            "service": self.service.output("selfLink").to_string(),
        })
    }
}

/// Backends for every routable function, in descriptor order
#[derive(Debug, Clone, Default)]
pub struct Backends {
    pub endpoint_groups: Vec<ResourceHandle>,
    pub services: Vec<ResourceHandle>,
    pub path_rules: Vec<PathRule>,
}

impl Backends {
    /// Fallback service for the path matcher: the first routable function's backend
    pub fn default_service(&self) -> Option<&ResourceHandle> {
        self.services.first()
    }
}

/// Handles produced by the routing builder
#[derive(Debug, Clone)]
pub struct Routing {
    pub backends: Backends,
    pub url_map: ResourceHandle,
    pub http_forwarding_rule: Option<ResourceHandle>,
    pub https_forwarding_rule: ResourceHandle,
}

/// Declare one endpoint group and backend service per function
pub fn build_backends<'a>(
    graph: &mut ResourceGraph,
    settings: &StackSettings,
    functions: impl IntoIterator<Item = &'a DescriptorEntry>,
) -> Result<Backends> {
    let prefix = settings.general_prefix();
    let headers = security_headers(&settings.alb_header_powered_by);
    let mut backends = Backends::default();

    for (index, function) in functions.into_iter().enumerate() {
        let count = index + 1;
        let trigger_url = function.trigger_url()?;

        let endpoint_group = graph.declare(
            Resource::new(
                types::REGION_NETWORK_ENDPOINT_GROUP,
                &format!("{}-rne-{}", prefix, count),
            )
            .with("networkEndpointType", "SERVERLESS")
            .with("region", settings.region.as_str())
            .with("cloudFunction", json!({ "function": function.name })),
        )?;

        let service = graph.declare(
            Resource::new(
                types::BACKEND_SERVICE,
                &format!("{}-alb-bsfunction-{}", prefix, count),
            )
            .with("protocol", "HTTP")
            .with_template(
                "backends",
                json!([{ "group": endpoint_group.output("selfLink").to_string() }]),
            )
            .with("customResponseHeaders", headers.clone()),
        )?;

        tracing::debug!(
            function = %function.name,
            path = trigger_url,
            backend = service.name(),
            "Routed function"
        );
        backends.path_rules.push(PathRule {
            paths: vec![trigger_url.to_string()],
            service: service.clone(),
        });
        backends.endpoint_groups.push(endpoint_group);
        backends.services.push(service);
    }

    Ok(backends)
}

/// Declare the URL map over the collected backends
pub fn build_url_map(
    graph: &mut ResourceGraph,
    settings: &StackSettings,
    backends: &Backends,
) -> Result<ResourceHandle> {
    let default_service = backends
        .default_service()
        .ok_or(GcpError::NoDefaultBackend)?;
    let path_rules: Vec<Value> = backends.path_rules.iter().map(PathRule::to_value).collect();

    let url_map = graph.declare(
        Resource::new(
            types::URL_MAP,
            &format!("{}-alb-backend", settings.general_prefix()),
        )
        .with(
            "defaultUrlRedirect",
            json!({
                "hostRedirect": settings.target_domain_redirect,
                "httpsRedirect": true,
                "stripQuery": true,
            }),
        )
        .with(
            "hostRules",
            json!([{ "hosts": [settings.target_domain], "pathMatcher": PATH_MATCHER }]),
        )
        .with_template(
            "pathMatchers",
            json!([{
                "name": PATH_MATCHER,
                "defaultService": default_service.output("selfLink").to_string(),
                "pathRules": path_rules,
            }]),
        ),
    )?;
    Ok(url_map)
}

/// Declare proxies and forwarding rules on the static address
fn build_frontends(
    graph: &mut ResourceGraph,
    settings: &StackSettings,
    edge: &NetworkEdge,
    url_map: &ResourceHandle,
) -> Result<(Option<ResourceHandle>, ResourceHandle)> {
    let prefix = settings.general_prefix();

    let http_forwarding_rule = if settings.alb_http_route {
        let proxy = graph.declare(
            Resource::new(
                types::TARGET_HTTP_PROXY,
                &format!("{}-alb-backend-proxy-http", prefix),
            )
            .with_output("urlMap", url_map.output("selfLink")),
        )?;
        Some(forwarding_rule(graph, &prefix, "http", &proxy, edge, "80")?)
    } else {
        None
    };

    let ssl_policy = graph.declare(
        Resource::new(
            types::SSL_POLICY,
            &format!("{}-alb-backend-https-policy", prefix),
        )
        .with("minTlsVersion", "TLS_1_2")
        .with("profile", "COMPATIBLE"),
    )?;

    let certificate = edge
        .certificates
        .get(&settings.target_domain)
        .ok_or_else(|| GcpError::CertificateNotFound(settings.target_domain.clone()))?;

    let https_proxy = graph.declare(
        Resource::new(
            types::TARGET_HTTPS_PROXY,
            &format!("{}-alb-backend-proxy-https", prefix),
        )
        .with_output("urlMap", url_map.output("selfLink"))
        .with_output("sslPolicy", ssl_policy.output("selfLink"))
        .with_template("sslCertificates", json!([certificate.output("id").to_string()])),
    )?;
    let https_forwarding_rule = forwarding_rule(graph, &prefix, "https", &https_proxy, edge, "443")?;

    Ok((http_forwarding_rule, https_forwarding_rule))
}

fn forwarding_rule(
    graph: &mut ResourceGraph,
    prefix: &str,
    scheme: &str,
    proxy: &ResourceHandle,
    edge: &NetworkEdge,
    port: &str,
) -> Result<ResourceHandle> {
    Ok(graph.declare(
        Resource::new(
            types::GLOBAL_FORWARDING_RULE,
            &format!("{}-alb-backend-forward-{}", prefix, scheme),
        )
        .with_output("target", proxy.output("selfLink"))
        .with_output("ipAddress", edge.address.output("address"))
        .with("portRange", port),
    )?)
}

/// Declare the whole routing layer
pub fn build_routing<'a>(
    graph: &mut ResourceGraph,
    settings: &StackSettings,
    edge: &NetworkEdge,
    functions: impl IntoIterator<Item = &'a DescriptorEntry>,
) -> Result<Routing> {
    let backends = build_backends(graph, settings, functions)?;
    let url_map = build_url_map(graph, settings, &backends)?;
    let (http_forwarding_rule, https_forwarding_rule) =
        build_frontends(graph, settings, edge, &url_map)?;

    tracing::debug!(
        backends = backends.services.len(),
        http = http_forwarding_rule.is_some(),
        "Routing layer declared"
    );
    Ok(Routing {
        backends,
        url_map,
        http_forwarding_rule,
        https_forwarding_rule,
    })
}

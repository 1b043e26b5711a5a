//! Pulumi GCP type tokens

pub const NETWORK: &str = "gcp:compute:Network";
pub const VPC_CONNECTOR: &str = "gcp:vpcaccess:Connector";
pub const GLOBAL_ADDRESS: &str = "gcp:compute:GlobalAddress";
pub const MANAGED_ZONE: &str = "gcp:dns:ManagedZone";
pub const RECORD_SET: &str = "gcp:dns:RecordSet";
pub const MANAGED_SSL_CERTIFICATE: &str = "gcp:compute:ManagedSslCertificate";
pub const REGION_NETWORK_ENDPOINT_GROUP: &str = "gcp:compute:RegionNetworkEndpointGroup";
pub const BACKEND_SERVICE: &str = "gcp:compute:BackendService";
pub const URL_MAP: &str = "gcp:compute:URLMap";
pub const TARGET_HTTP_PROXY: &str = "gcp:compute:TargetHttpProxy";
pub const TARGET_HTTPS_PROXY: &str = "gcp:compute:TargetHttpsProxy";
pub const SSL_POLICY: &str = "gcp:compute:SSLPolicy";
pub const GLOBAL_FORWARDING_RULE: &str = "gcp:compute:GlobalForwardingRule";
pub const BUCKET: &str = "gcp:storage:Bucket";
pub const BUCKET_OBJECT: &str = "gcp:storage:BucketObject";
pub const FUNCTION: &str = "gcp:cloudfunctions:Function";
pub const FUNCTION_IAM_MEMBER: &str = "gcp:cloudfunctions:FunctionIamMember";

// apigw-log-retention - API Gateway log retention for deployment pipelines
//
// Runs once after a deployment completes:
// - Finds the REST API named after the service and stage
// - Reads the stage's access log destination
// - Puts (or deletes, for "never expire") the retention policy on the access
//   and execution log groups
//
// Access and execution logs are independent failure domains; a failure in
// one never prevents the other from being attempted and reported.

pub mod backend;
pub mod error;
pub mod hook;
pub mod locator;
pub mod retention;
pub mod stage;

mod init;

pub use backend::{ApiGatewayBackend, LogsBackend, RestApiPage, RestApiSummary, StageLogSettings};
pub use error::{HookError, RemoteError, RetentionError};
pub use hook::{BranchOutcome, HookMode, HookReport, LogKind, RetentionHook};
pub use init::{init_backends, init_tracing, load_sdk_config};
pub use retention::LogGroupTarget;

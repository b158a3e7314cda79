use async_trait::async_trait;
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::metadata::ActionMetadata;
use crate::result::EdgeMap;

/// A node implementation: the contract the interpreter drives.
///
/// `execute` is given the node's resolved config (all `$.path` references
/// already substituted by `nebula-expression`) and returns an [`EdgeMap`] —
/// an ordered set of edges, each evaluated in turn by the caller until one
/// yields a payload. The action itself does not decide *which* edge fires
/// first; that's the registration order it builds into the map.
///
/// # Object Safety
///
/// Object-safe; the registry stores actions as `Arc<dyn Action>`.
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Static metadata describing this node type.
    fn metadata(&self) -> &ActionMetadata;

    /// Run the node against its resolved config.
    async fn execute(&self, ctx: &ActionContext, config: &Value) -> Result<EdgeMap, ActionError>;
}

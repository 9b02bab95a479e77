//! The protocol handler contract.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::handle::ToolHandle;
use crate::registry::Registrable;
use crate::value::ToolValue;
use async_trait::async_trait;

/// Executes tool handles that declare this handler's name.
///
/// Handlers are registered in a [`ToolContext`] under their own
/// [`name`](ToolHandler::name) and looked up by
/// [`execute_tool_handle`](crate::handle::execute_tool_handle).
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    /// The handler name that handles declare in their `handler` field.
    fn name(&self) -> &str;

    /// Executes `handle` with the given arguments.
    async fn execute(
        &self,
        context: &ToolContext,
        handle: &ToolHandle,
        args: ToolValue,
    ) -> Result<ToolValue, ToolError>;
}

impl Registrable for dyn ToolHandler {
    fn registry_key(&self) -> &str {
        self.name()
    }
}

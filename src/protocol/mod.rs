pub mod request;
pub mod response;

pub use request::{ChatId, JsonRpcRequest, RpcId, SendMessageParams, ToolCallParams, TradingSignalsParams};
pub use response::{
    JsonRpcError, JsonRpcNotification, JsonRpcResponse, ToolResult, ToolResultContent,
};

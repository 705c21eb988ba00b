//! 充电桩命令分发
//!
//! 从标识列表生成命令消息并逐条发布到消息代理交换机，只负责发送，不等待回复。

pub mod dispatch_run;
pub mod input_source;

pub use dispatch_run::{CommandDispatcher, CommandSpec, RunOutcome};
pub use input_source::{load_identifiers, parse_identifiers};

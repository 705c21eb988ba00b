//! # Charger Testing Utils
//!
//! 分发相关crate共用的测试工具：
//!
//! - **Mock Broker**: 内存中的连接器与会话，记录每次发布，可配置连接失败或第N次发布失败
//! - **Helpers**: 临时标识列表文件、常用配置
//!
//! ```toml
//! [dev-dependencies]
//! charger-testing-utils = { path = "../testing-utils" }
//! ```

pub mod helpers;
pub mod mocks;

pub use helpers::*;
pub use mocks::*;

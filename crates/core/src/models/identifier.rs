use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DispatchError, DispatchResult};

/// 命令目标标识（充电桩配置项的key名）
///
/// 由输入列表的一行修剪两端空白得到，修剪后保证非空。
/// 不去重：重复的标识会产生重复的发布。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// 从输入列表的一行构造标识，空行或纯空白行返回 `None`
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// 检查标识能否作为消息中的 key_name 字段，内部字符原样保留
    pub fn validate(&self) -> DispatchResult<()> {
        if self.0.trim().is_empty() {
            return Err(DispatchError::invalid_identifier(&self.0, "标识不能为空"));
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

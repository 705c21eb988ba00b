use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use charger_core::{DispatchError, DispatchResult, Identifier};
use tracing::debug;

/// 从标识列表文件加载标识
///
/// 每行一个标识，修剪两端空白，丢弃空行，保持原有顺序，不去重。
/// 文件无法打开或读取时返回 `SourceUnavailable`，此时不会进行任何发布。
pub fn load_identifiers(path: impl AsRef<Path>) -> DispatchResult<Vec<Identifier>> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let file =
        File::open(path).map_err(|e| DispatchError::source_unavailable(&source, e.to_string()))?;
    let identifiers = parse_identifiers(BufReader::new(file))
        .map_err(|e| DispatchError::source_unavailable(&source, e.to_string()))?;

    debug!("从 {} 读取到 {} 个标识", source, identifiers.len());
    Ok(identifiers)
}

/// 逐行解析标识
pub fn parse_identifiers<R: BufRead>(reader: R) -> io::Result<Vec<Identifier>> {
    let mut identifiers = Vec::new();
    for line in reader.lines() {
        if let Some(identifier) = Identifier::from_line(&line?) {
            identifiers.push(identifier);
        }
    }
    Ok(identifiers)
}

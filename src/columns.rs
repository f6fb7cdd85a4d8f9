//! 输出列展开
//!
//! 与 [`crate::fetch_compiler::FetchCompiler`] 读取同一棵树：根节点字段不加前缀，
//! 其余节点的字段以各自的别名限定为 `alias.field`。

use crate::entity::{EntityId, EntityTree};

/// 按根、子节点、孙节点的顺序列出输出列
pub fn flatten_columns(tree: &EntityTree, include_root_identifier: bool) -> Vec<String> {
    let mut columns = Vec::new();
    let row_identifier = tree.row_identifier();
    if include_root_identifier {
        columns.push(row_identifier.to_string());
    }
    // 已作为第一列强制输出的行标识不再重复
    columns.extend(
        tree.root()
            .output_fields
            .iter()
            .filter(|field| !(include_root_identifier && *field == row_identifier))
            .cloned(),
    );

    // 逐层展开，同一层内按声明顺序
    let mut level: Vec<EntityId> = tree.root().children.clone();
    while !level.is_empty() {
        for id in &level {
            let node = tree.get(*id);
            columns.extend(node.output_fields.iter().map(|field| qualify(&node.alias, field)));
        }
        level = level
            .iter()
            .flat_map(|id| tree.get(*id).children.iter().copied())
            .collect();
    }
    columns
}

/// `alias.field`
pub fn qualify(alias: &str, field: &str) -> String {
    format!("{}.{}", alias, field)
}

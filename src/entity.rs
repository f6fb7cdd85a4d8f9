//! 实体树
//!
//! 节点存放在树持有的数组中，父子关系用 [`EntityId`] 下标表示：
//! 子节点列表自上而下表达所有权，`parent` 只用于向上查找。

use crate::criterion::Criterion;
use crate::search_event::MutationKind;
use crate::topology::{EntityTemplate, CASE_ROW_IDENTIFIER, CASE_TOPOLOGY};
use std::collections::BTreeMap;
use tracing::debug;

/// `find` 只搜索到根以下两层，与固定拓扑的深度一致
pub const MAX_LOOKUP_DEPTH: usize = 2;

/// 实体节点在树中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

impl EntityId {
    pub const ROOT: EntityId = EntityId(0);
}

/// 一个可关联的记录类型及其当前的搜索状态
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub name: String,
    pub link_name: String,
    pub join_from: String,
    pub join_to: String,
    pub alias: String,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    /// 输出字段，保持首次出现的顺序且不重复
    pub output_fields: Vec<String>,
    /// 字段名到当前条件的映射，每个字段至多一个条件
    pub criteria: BTreeMap<String, Criterion>,
}

impl EntityDescriptor {
    fn from_template(template: &EntityTemplate, parent: Option<EntityId>) -> Self {
        Self {
            name: template.name.to_string(),
            link_name: template.link_name.to_string(),
            join_from: template.join_from.to_string(),
            join_to: template.join_to.to_string(),
            alias: template.alias.to_string(),
            parent,
            children: Vec::new(),
            output_fields: Vec::new(),
            criteria: BTreeMap::new(),
        }
    }

    /// 节点自身既没有输出字段也没有条件
    pub fn is_empty(&self) -> bool {
        self.output_fields.is_empty() && self.criteria.is_empty()
    }

    /// 追加输出字段，已存在时忽略
    pub fn include_field(&mut self, field: &str) {
        if !self.output_fields.iter().any(|f| f == field) {
            self.output_fields.push(field.to_string());
        }
    }

    /// 移除该字段的所有出现
    pub fn exclude_field(&mut self, field: &str) {
        self.output_fields.retain(|f| f != field);
    }

    pub fn clear(&mut self) {
        self.output_fields.clear();
        self.criteria.clear();
    }
}

/// 固定拓扑的实体树，构造后节点不增不减
#[derive(Debug, Clone)]
pub struct EntityTree {
    nodes: Vec<EntityDescriptor>,
    row_identifier: String,
}

impl EntityTree {
    /// 按静态模板构造整棵树，根节点下标为 [`EntityId::ROOT`]
    pub fn from_template(template: &EntityTemplate, row_identifier: &str) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            row_identifier: row_identifier.to_string(),
        };
        tree.push_template(template, None);
        tree
    }

    /// AEFI 病例拓扑
    pub fn case_tree() -> Self {
        Self::from_template(&CASE_TOPOLOGY, CASE_ROW_IDENTIFIER)
    }

    fn push_template(&mut self, template: &EntityTemplate, parent: Option<EntityId>) -> EntityId {
        let id = EntityId(self.nodes.len());
        self.nodes.push(EntityDescriptor::from_template(template, parent));
        for child in template.children {
            let child_id = self.push_template(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn root(&self) -> &EntityDescriptor {
        &self.nodes[EntityId::ROOT.0]
    }

    pub fn row_identifier(&self) -> &str {
        &self.row_identifier
    }

    /// 按下标取节点
    ///
    /// # Panics
    ///
    /// `id` 必须来自本树（`find`、`children`、`parent` 或 [`EntityId::ROOT`]）。
    /// 拿另一棵更大的树的下标来取节点会越界 panic。
    pub fn get(&self, id: EntityId) -> &EntityDescriptor {
        &self.nodes[id.0]
    }

    /// 同 [`EntityTree::get`]，`id` 必须来自本树
    pub fn get_mut(&mut self, id: EntityId) -> &mut EntityDescriptor {
        &mut self.nodes[id.0]
    }

    /// 按名称查找节点：先根，再直接子节点，再各子节点的子节点
    /// 超过 [`MAX_LOOKUP_DEPTH`] 的节点视为不存在
    pub fn find(&self, name: &str) -> Option<EntityId> {
        let mut level = vec![EntityId::ROOT];
        for depth in 0..=MAX_LOOKUP_DEPTH {
            if let Some(id) = level.iter().copied().find(|id| self.get(*id).name == name) {
                return Some(id);
            }
            if depth == MAX_LOOKUP_DEPTH {
                break;
            }
            level = level
                .iter()
                .flat_map(|id| self.get(*id).children.iter().copied())
                .collect();
        }
        None
    }

    /// 按名称查找节点并返回其描述
    pub fn find_entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.find(name).map(|id| self.get(id))
    }

    /// 该节点或其任一后代有输出字段或条件
    pub fn has_content(&self, id: EntityId) -> bool {
        let node = self.get(id);
        !node.is_empty() || node.children.iter().any(|child| self.has_content(*child))
    }

    /// 所有节点上的条件总数
    pub fn criteria_count(&self) -> usize {
        self.nodes.iter().map(|n| n.criteria.len()).sum()
    }

    /// 前序遍历的全部节点
    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.nodes.iter()
    }

    /// 把一条字段级变更合并进树中
    ///
    /// 目标节点不存在时静默忽略；否则只修改该节点的输出字段和条件表。
    pub fn add_search_event(&mut self, criterion: Criterion) {
        let Some(id) = self.find(&criterion.owner_entity_name) else {
            debug!(
                entity = %criterion.owner_entity_name,
                field = %criterion.field_name,
                "search event targets an unknown entity, ignored"
            );
            return;
        };

        let node = self.get_mut(id);
        match criterion.include_in_output {
            Some(true) => node.include_field(&criterion.field_name),
            Some(false) => node.exclude_field(&criterion.field_name),
            None => {}
        }

        match criterion.mutation_kind {
            MutationKind::Update => {
                debug!(
                    entity = %node.name,
                    field = %criterion.field_name,
                    operator = ?criterion.operator,
                    "criterion updated"
                );
                node.criteria.insert(criterion.field_name.clone(), criterion);
            }
            MutationKind::Remove => {
                debug!(entity = %node.name, field = %criterion.field_name, "criterion removed");
                node.criteria.remove(&criterion.field_name);
            }
        }
    }

    /// 清空所有节点的搜索状态，拓扑保持不变
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
    }
}

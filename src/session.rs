//! 搜索会话
//!
//! 持有实体树和配置，是控件事件进入的唯一入口。
//! 编译查询和展开输出列之前都先执行属性组展开，保证两者读取的是同一状态。

use crate::attribute_group::VACCINE_GROUP;
use crate::columns::flatten_columns;
use crate::config::SearchConfig;
use crate::criterion::{Criterion, CriterionError};
use crate::entity::EntityTree;
use crate::export::RowMapper;
use crate::fetch_compiler::{FetchCompiler, FetchDocument};
use crate::search_event::SearchEvent;
use crate::view::SavedView;

#[derive(Debug, Clone)]
pub struct SearchSession {
    tree: EntityTree,
    config: SearchConfig,
}

impl SearchSession {
    /// 使用 AEFI 病例拓扑创建会话
    pub fn new(config: SearchConfig) -> Self {
        Self::with_tree(EntityTree::case_tree(), config)
    }

    pub fn with_tree(tree: EntityTree, config: SearchConfig) -> Self {
        Self { tree, config }
    }

    pub fn tree(&self) -> &EntityTree {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 解码并合并一条控件事件
    /// 载荷解码失败时返回错误，树保持不变
    pub fn add_search_event(&mut self, event: SearchEvent) -> Result<(), CriterionError> {
        let criterion = Criterion::try_from(event)?;
        self.apply(criterion);
        Ok(())
    }

    /// 合并一条已解码的条件
    pub fn apply(&mut self, criterion: Criterion) {
        self.tree.add_search_event(criterion);
    }

    /// 组规则在这里显式列出
    /// 展开作用在树的副本上，会话中的树只由事件修改
    fn expanded_tree(&self) -> EntityTree {
        let mut tree = self.tree.clone();
        VACCINE_GROUP.apply(&mut tree);
        tree
    }

    /// 编译查询文档
    pub fn compile(&self, include_root_identifier: bool) -> FetchDocument {
        FetchCompiler::new(&self.expanded_tree()).compile(include_root_identifier)
    }

    /// 展开输出列
    pub fn columns(&self, include_root_identifier: bool) -> Vec<String> {
        flatten_columns(&self.expanded_tree(), include_root_identifier)
    }

    /// 导出用的行映射器
    pub fn row_mapper(&self, include_root_identifier: bool) -> RowMapper {
        let columns = self.columns(include_root_identifier);
        RowMapper::new(columns, self.tree.row_identifier(), self.config.clone())
    }

    /// 保存视图的载荷，查询和输出列都强制包含行标识
    pub fn saved_view(&self, name: &str) -> SavedView {
        let tree = self.expanded_tree();
        let fetch_xml = FetchCompiler::new(&tree).compile(true).to_string();
        let columns = flatten_columns(&tree, true);
        SavedView::new(name, fetch_xml, columns, tree.row_identifier(), &self.config)
    }

    /// 清空搜索状态
    pub fn reset(&mut self) {
        self.tree.clear();
    }
}

//! 属性组展开
//!
//! 疫苗组（疫苗节点与其免疫制剂子节点）上只要存在任何条件，
//! 两个节点的输出字段都被覆盖为固定的明细字段列表。
//! 这是唯一的一条组规则；新增组例外时需要在 [`crate::session::SearchSession`] 的调用处显式加入。

use crate::entity::EntityTree;
use crate::topology::{IMMUNIZING_AGENT_ENTITY, VACCINES_ENTITY};
use tracing::debug;

/// 一组节点及其被强制输出的明细字段
#[derive(Debug)]
pub struct AttributeGroup {
    pub members: &'static [GroupMember],
}

#[derive(Debug)]
pub struct GroupMember {
    pub entity: &'static str,
    pub detail_fields: &'static [&'static str],
}

/// 疫苗组
pub static VACCINE_GROUP: AttributeGroup = AttributeGroup {
    members: &[
        GroupMember {
            entity: VACCINES_ENTITY,
            detail_fields: &[
                "caefiss_vaccine_name",
                "caefiss_lot_number",
                "caefiss_dose_number",
                "caefiss_date_vaccine_administered",
                "caefiss_route_of_administration",
                "caefiss_site_of_administration",
            ],
        },
        GroupMember {
            entity: IMMUNIZING_AGENT_ENTITY,
            detail_fields: &["caefiss_name", "caefiss_trade_name", "caefiss_manufacturer"],
        },
    ],
};

impl AttributeGroup {
    /// 任一成员有条件时覆盖所有成员的输出字段（替换而非合并），返回是否触发
    pub fn apply(&self, tree: &mut EntityTree) -> bool {
        let ids: Vec<_> = self
            .members
            .iter()
            .map(|member| (member, tree.find(member.entity)))
            .collect();

        let searched = ids
            .iter()
            .filter_map(|(_, id)| *id)
            .any(|id| !tree.get(id).criteria.is_empty());
        if !searched {
            return false;
        }

        for (member, id) in ids {
            let Some(id) = id else { continue };
            tree.get_mut(id).output_fields = member.detail_fields.iter().map(|f| f.to_string()).collect();
        }
        debug!(
            entities = ?self.members.iter().map(|m| m.entity).collect::<Vec<_>>(),
            "attribute group expanded"
        );
        true
    }
}

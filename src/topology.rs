//! 固定的实体关联拓扑
//!
//! 拓扑以静态数据描述，[`crate::entity::EntityTree::from_template`] 在构造时一次性建出整棵树。
//! 运行期只改变节点的输出字段和条件，不增删节点。

/// 一个实体节点的静态描述
#[derive(Debug)]
pub struct EntityTemplate {
    pub name: &'static str,
    /// 在查询文档中作为 link-entity 时使用的实体名
    pub link_name: &'static str,
    /// 本节点上的关联字段
    pub join_from: &'static str,
    /// 父节点上的关联字段
    pub join_to: &'static str,
    pub alias: &'static str,
    pub children: &'static [EntityTemplate],
}

/// 根实体的行标识字段
pub const CASE_ROW_IDENTIFIER: &str = "incidentid";

pub const CASE_ENTITY: &str = "incident";
pub const VACCINES_ENTITY: &str = "caefiss_aefi_vaccines";
pub const IMMUNIZING_AGENT_ENTITY: &str = "caefiss_immunizing_agents";

/// AEFI 病例的关联拓扑：病例为根，疫苗、不良反应、报告人各挂一个孙节点
pub static CASE_TOPOLOGY: EntityTemplate = EntityTemplate {
    name: CASE_ENTITY,
    link_name: "incident",
    join_from: "",
    join_to: "",
    alias: "case",
    children: &[
        EntityTemplate {
            name: VACCINES_ENTITY,
            link_name: "caefiss_aefi_vaccine",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "vaccine",
            children: &[EntityTemplate {
                name: IMMUNIZING_AGENT_ENTITY,
                link_name: "caefiss_immunizing_agent",
                join_from: "caefiss_immunizing_agentid",
                join_to: "caefiss_immunizing_agent",
                alias: "agent",
                children: &[],
            }],
        },
        EntityTemplate {
            name: "caefiss_aefi_reactions",
            link_name: "caefiss_aefi_reaction",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "reaction",
            children: &[EntityTemplate {
                name: "caefiss_reaction_types",
                link_name: "caefiss_reaction_type",
                join_from: "caefiss_reaction_typeid",
                join_to: "caefiss_reaction_type",
                alias: "reactiontype",
                children: &[],
            }],
        },
        EntityTemplate {
            name: "caefiss_reporters",
            link_name: "caefiss_reporter",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "reporter",
            children: &[EntityTemplate {
                name: "caefiss_reporting_organizations",
                link_name: "account",
                join_from: "accountid",
                join_to: "caefiss_organization",
                alias: "organization",
                children: &[],
            }],
        },
        EntityTemplate {
            name: "caefiss_patients",
            link_name: "contact",
            join_from: "contactid",
            join_to: "customerid",
            alias: "patient",
            children: &[],
        },
        EntityTemplate {
            name: "caefiss_medical_histories",
            link_name: "caefiss_medical_history",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "history",
            children: &[],
        },
        EntityTemplate {
            name: "caefiss_treatments",
            link_name: "caefiss_treatment",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "treatment",
            children: &[],
        },
        EntityTemplate {
            name: "caefiss_case_outcomes",
            link_name: "caefiss_case_outcome",
            join_from: "caefiss_case",
            join_to: "incidentid",
            alias: "outcome",
            children: &[],
        },
    ],
};

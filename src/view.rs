//! 保存视图
//!
//! 为视图/报表发布方准备的载荷：强制带行标识的查询文档、输出列以及网格布局。
//! 视图的创建、替换和挂载到仪表板不在这里处理。

use crate::config::SearchConfig;
use crate::xml::Element;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedView {
    pub name: String,
    pub fetch_xml: String,
    pub layout_xml: String,
    pub columns: Vec<String>,
}

impl SavedView {
    pub fn new(name: &str, fetch_xml: String, columns: Vec<String>, row_identifier: &str, config: &SearchConfig) -> Self {
        let layout_xml = layout(&columns, row_identifier, config).to_string();
        Self {
            name: name.to_string(),
            fetch_xml,
            layout_xml,
            columns,
        }
    }
}

/// 网格布局：主显示字段在第一列，行标识不作为单元格出现
fn layout(columns: &[String], row_identifier: &str, config: &SearchConfig) -> Element {
    let width = config.column_width.to_string();
    let mut row = Element::new("row").attr("name", "result").attr("id", row_identifier);

    row.push(Element::new("cell").attr("name", config.title_field.clone()).attr("width", width.clone()));
    for column in columns {
        if column == row_identifier || *column == config.title_field {
            continue;
        }
        row.push(Element::new("cell").attr("name", column.clone()).attr("width", width.clone()));
    }

    Element::new("grid")
        .attr("name", "resultset")
        .attr("jump", config.title_field.clone())
        .attr("select", "1")
        .attr("icon", "1")
        .attr("preview", "1")
        .child(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_puts_title_first() {
        let columns = vec![
            "incidentid".to_string(),
            "caefiss_onset".to_string(),
            "title".to_string(),
            "vaccine.caefiss_lot_number".to_string(),
        ];
        let view = SavedView::new("Lot AB123", "<fetch />".to_string(), columns, "incidentid", &SearchConfig::default());

        assert_eq!(
            view.layout_xml,
            concat!(
                r#"<grid name="resultset" jump="title" select="1" icon="1" preview="1">"#,
                r#"<row name="result" id="incidentid">"#,
                r#"<cell name="title" width="150" />"#,
                r#"<cell name="caefiss_onset" width="150" />"#,
                r#"<cell name="vaccine.caefiss_lot_number" width="150" />"#,
                r#"</row></grid>"#
            )
        );
        assert_eq!(view.columns.len(), 4);
    }

    #[test]
    fn test_serializes_for_provisioning() {
        let view = SavedView::new("v", "<fetch />".to_string(), vec!["incidentid".to_string()], "incidentid", &SearchConfig::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "v");
        assert_eq!(json["fetch_xml"], "<fetch />");
        assert_eq!(json["columns"][0], "incidentid");
    }
}

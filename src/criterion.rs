//! 搜索条件的解码
//!
//! 控件上报的 `rawValue` 是按数据类型编码的字符串（字面量、空格分隔的区间、JSON 数组或 JSON 对象）。
//! 这里在事件进入时一次性解码为 [`CriterionValue`]，序列化阶段只读取解码后的值。

use crate::search_event::{DataKind, MutationKind, Operator, SearchEvent};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// 载荷解码错误
#[derive(Debug, thiserror::Error)]
pub enum CriterionError {
    #[error("无法解析字段 {field} 的 {kind:?} 载荷 {raw:?}: {source}")]
    MalformedPayload {
        field: String,
        kind: DataKind,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 数值控件的载荷, 例如：`{"number1": 5, "number2": 10}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NumberRange {
    #[serde(default)]
    pub number1: Option<Value>,
    #[serde(default)]
    pub number2: Option<Value>,
}

/// 选项集多选中的一项, 例如：`{"display": "Pfizer", "value": 100000001}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionEntry {
    #[serde(default)]
    pub display: Value,
    #[serde(default)]
    pub value: Value,
}

/// 复选框的两个勾选状态，键 `"0"` 对应未勾选，键 `"1"` 对应已勾选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxFlags {
    pub unchecked: bool,
    pub checked: bool,
}

impl CheckboxFlags {
    /// 被选中的键，固定按 `0`、`1` 的顺序
    pub fn selected_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::with_capacity(2);
        if self.unchecked {
            keys.push("0");
        }
        if self.checked {
            keys.push("1");
        }
        keys
    }
}

/// 按数据类型区分的已解码条件值
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    Text(String),
    Lookup(String),
    /// 单个日期，或空格分隔的两个日期
    Date(String),
    /// 只有 Equal / Between 携带 JSON 载荷，其余运算符为 `None`
    Number(Option<NumberRange>),
    /// 只有 In / NotIn 携带 JSON 载荷，其余运算符为 `None`
    OptionSet(Option<Vec<OptionEntry>>),
    Checkbox(CheckboxFlags),
}

/// 已解码的搜索条件，注册在某个实体节点的条件表中
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub owner_entity_name: String,
    pub parent_entity_name: String,
    pub field_name: String,
    pub operator: Operator,
    pub value: CriterionValue,
    pub mutation_kind: MutationKind,
    pub include_in_output: Option<bool>,
}

impl Criterion {
    pub fn data_kind(&self) -> DataKind {
        match self.value {
            CriterionValue::Text(_) => DataKind::Text,
            CriterionValue::Lookup(_) => DataKind::Lookup,
            CriterionValue::Date(_) => DataKind::Date,
            CriterionValue::Number(_) => DataKind::Number,
            CriterionValue::OptionSet(_) => DataKind::OptionSet,
            CriterionValue::Checkbox(_) => DataKind::Checkbox,
        }
    }
}

impl TryFrom<SearchEvent> for Criterion {
    type Error = CriterionError;

    fn try_from(event: SearchEvent) -> Result<Self, Self::Error> {
        let value = decode_value(&event)?;
        Ok(Criterion {
            owner_entity_name: event.owner_entity_name,
            parent_entity_name: event.parent_entity_name,
            field_name: event.field_name,
            operator: event.operator,
            value,
            mutation_kind: event.mutation_kind,
            include_in_output: event.include_in_output,
        })
    }
}

/// 根据数据类型和运算符解码载荷
/// Remove 事件不需要值，JSON 载荷一律不解析
fn decode_value(event: &SearchEvent) -> Result<CriterionValue, CriterionError> {
    let decode = event.mutation_kind == MutationKind::Update;
    let raw = &event.raw_value;

    let value = match event.data_kind {
        DataKind::Text => CriterionValue::Text(raw.clone()),
        DataKind::Lookup => CriterionValue::Lookup(raw.clone()),
        DataKind::Date => CriterionValue::Date(raw.clone()),
        DataKind::Number => {
            let carries_payload = matches!(event.operator, Operator::Equal | Operator::Between);
            if decode && carries_payload {
                CriterionValue::Number(Some(parse_payload(event, raw)?))
            } else {
                CriterionValue::Number(None)
            }
        }
        DataKind::OptionSet => {
            let carries_payload = matches!(event.operator, Operator::In | Operator::NotIn);
            if decode && carries_payload {
                CriterionValue::OptionSet(Some(parse_payload(event, raw)?))
            } else {
                CriterionValue::OptionSet(None)
            }
        }
        DataKind::Checkbox => {
            if decode {
                let flags: HashMap<String, bool> = parse_payload(event, raw)?;
                CriterionValue::Checkbox(CheckboxFlags {
                    unchecked: flags.get("0").copied().unwrap_or(false),
                    checked: flags.get("1").copied().unwrap_or(false),
                })
            } else {
                CriterionValue::Checkbox(CheckboxFlags::default())
            }
        }
    };

    Ok(value)
}

fn parse_payload<T: for<'de> Deserialize<'de>>(event: &SearchEvent, raw: &str) -> Result<T, CriterionError> {
    serde_json::from_str(raw).map_err(|source| CriterionError::MalformedPayload {
        field: event.field_name.clone(),
        kind: event.data_kind,
        raw: raw.to_string(),
        source,
    })
}

/// 把 JSON 标量原样转成字面量字符串，缺失或 null 为空串
pub fn scalar_literal(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(kind: DataKind, operator: Operator, raw: &str) -> Result<Criterion, CriterionError> {
        Criterion::try_from(SearchEvent::update("incident", "field", kind, operator, raw))
    }

    #[test]
    fn test_text_keeps_literal() {
        let criterion = decode(DataKind::Text, Operator::Contains, "a,b").unwrap();
        assert_eq!(criterion.value, CriterionValue::Text("a,b".to_string()));
        assert_eq!(criterion.data_kind(), DataKind::Text);
    }

    #[test]
    fn test_number_range_decoding() {
        let criterion = decode(DataKind::Number, Operator::Between, r#"{"number1": 5, "number2": "10"}"#).unwrap();
        match criterion.value {
            CriterionValue::Number(Some(range)) => {
                assert_eq!(scalar_literal(range.number1.as_ref()), "5");
                assert_eq!(scalar_literal(range.number2.as_ref()), "10");
            }
            other => panic!("Expected number range, got {:?}", other),
        }
    }

    #[test]
    fn test_number_missing_bound_is_kept_absent() {
        let criterion = decode(DataKind::Number, Operator::Between, r#"{"number1": 3}"#).unwrap();
        match criterion.value {
            CriterionValue::Number(Some(range)) => {
                assert_eq!(range.number2, None);
                assert_eq!(scalar_literal(range.number2.as_ref()), "");
            }
            other => panic!("Expected number range, got {:?}", other),
        }
    }

    #[test]
    fn test_number_null_operator_needs_no_payload() {
        let criterion = decode(DataKind::Number, Operator::Null, "").unwrap();
        assert_eq!(criterion.value, CriterionValue::Number(None));
    }

    #[test]
    fn test_malformed_number_payload() {
        let err = decode(DataKind::Number, Operator::Equal, "12").unwrap_err();
        match err {
            CriterionError::MalformedPayload { field, kind, .. } => {
                assert_eq!(field, "field");
                assert_eq!(kind, DataKind::Number);
            }
        }
    }

    #[test]
    fn test_option_entries_in_order() {
        let raw = r#"[{"display": "Moderna", "value": 2}, {"display": "Pfizer", "value": 1}]"#;
        let criterion = decode(DataKind::OptionSet, Operator::In, raw).unwrap();
        match criterion.value {
            CriterionValue::OptionSet(Some(entries)) => {
                let values: Vec<_> = entries.iter().map(|e| scalar_literal(Some(&e.value))).collect();
                assert_eq!(values, vec!["2", "1"]);
            }
            other => panic!("Expected option entries, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_option_payload() {
        assert!(decode(DataKind::OptionSet, Operator::NotIn, "not json").is_err());
    }

    #[test]
    fn test_malformed_checkbox_payload() {
        for (operator, raw) in [
            (Operator::Equal, "not json"),
            (Operator::Null, ""),
            (Operator::In, r#"{"0": "yes"}"#),
            (Operator::Equal, "[true, false]"),
        ] {
            let err = decode(DataKind::Checkbox, operator, raw).unwrap_err();
            match err {
                CriterionError::MalformedPayload { kind, raw: payload, .. } => {
                    assert_eq!(kind, DataKind::Checkbox);
                    assert_eq!(payload, raw);
                }
            }
        }
    }

    #[test]
    fn test_checkbox_flags() {
        let criterion = decode(DataKind::Checkbox, Operator::Equal, r#"{"1": true, "0": true}"#).unwrap();
        match criterion.value {
            CriterionValue::Checkbox(flags) => assert_eq!(flags.selected_keys(), vec!["0", "1"]),
            other => panic!("Expected checkbox flags, got {:?}", other),
        }

        let criterion = decode(DataKind::Checkbox, Operator::In, r#"{"0": false}"#).unwrap();
        assert_eq!(criterion.value, CriterionValue::Checkbox(CheckboxFlags::default()));
    }

    #[test]
    fn test_remove_skips_payload_decoding() {
        let event = SearchEvent::remove("incident", "caefiss_count", DataKind::Number);
        let criterion = Criterion::try_from(event).unwrap();
        assert_eq!(criterion.mutation_kind, MutationKind::Remove);
        assert_eq!(criterion.value, CriterionValue::Number(None));
    }
}

use {
    crate::ValueList,
    serde::Serialize,
    std::{
        collections::BTreeMap,
        fmt::{Debug, Display, Formatter, Result as FmtResult},
    },
};

/// The condition operators the builder emits.
///
/// The rendered key is the variant name. Operators are ordered so condition
/// blocks render deterministically.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ConditionOp {
    ArnEquals,
    ArnLike,
    ArnNotEquals,
    ArnNotLike,
    Bool,
    DateGreaterThan,
    DateLessThan,
    IpAddress,
    NotIpAddress,
    Null,
    NumericEquals,
    NumericGreaterThan,
    NumericLessThan,
    NumericNotEquals,
    StringEquals,
    StringEqualsIgnoreCase,
    StringLike,
    StringNotEquals,
    StringNotLike,
}

impl Display for ConditionOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(self, f)
    }
}

pub type ConditionMap = BTreeMap<String, ValueList>;
pub type Condition = BTreeMap<ConditionOp, ConditionMap>;

#[cfg(test)]
mod tests {
    use {
        crate::{get_att, Condition, ConditionMap, ConditionOp, ValueList},
        indoc::indoc,
        pretty_assertions::assert_eq,
    };

    #[test_log::test]
    fn test_display() {
        let items = vec![
            (ConditionOp::ArnEquals, "ArnEquals"),
            (ConditionOp::Bool, "Bool"),
            (ConditionOp::IpAddress, "IpAddress"),
            (ConditionOp::Null, "Null"),
            (ConditionOp::NumericLessThan, "NumericLessThan"),
            (ConditionOp::StringEquals, "StringEquals"),
            (ConditionOp::StringNotLike, "StringNotLike"),
        ];

        for (item, expected) in items {
            assert_eq!(format!("{}", item), expected);
        }
    }

    #[test_log::test]
    fn test_serialized_keys() {
        let mut map = ConditionMap::new();
        map.insert("ec2:InstanceProfile".to_string(), ValueList::from(get_att("WorkerRoleProfile", "Arn")));
        let mut condition = Condition::new();
        condition.insert(ConditionOp::StringEquals, map);

        let json = serde_json::to_string_pretty(&condition).unwrap();
        assert_eq!(
            json,
            indoc! { r#"
            {
              "StringEquals": {
                "ec2:InstanceProfile": {
                  "Fn::GetAtt": [
                    "WorkerRoleProfile",
                    "Arn"
                  ]
                }
              }
            }"# }
        );
    }

    #[test_log::test]
    fn test_ordering() {
        assert!(ConditionOp::ArnEquals < ConditionOp::Bool);
        assert!(ConditionOp::Bool < ConditionOp::StringEquals);
        assert!(ConditionOp::StringEquals < ConditionOp::StringNotLike);
    }
}

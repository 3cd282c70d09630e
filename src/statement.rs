use {
    crate::{display_json, Condition, ConditionMap, ConditionOp, Value, ValueList},
    derive_builder::Builder,
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::{
        collections::{btree_map::Entry, BTreeSet},
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Deny => f.write_str("Deny"),
        }
    }
}

/// The principals a statement applies to: the wildcard, or one or more
/// identifiers per principal type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Principal {
    Any,
    Specified(SpecifiedPrincipal),
}

impl Principal {
    #[inline]
    pub fn specified(&self) -> Option<&SpecifiedPrincipal> {
        match self {
            Self::Any => None,
            Self::Specified(specified) => Some(specified),
        }
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Specified(specified) => specified.serialize(serializer),
        }
    }
}

display_json!(Principal);

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpecifiedPrincipal {
    aws: Option<ValueList>,
    canonical_user: Option<ValueList>,
    federated: Option<ValueList>,
    service: Option<ValueList>,
}

impl SpecifiedPrincipal {
    #[inline]
    pub fn aws(&self) -> Option<&ValueList> {
        self.aws.as_ref()
    }

    #[inline]
    pub fn canonical_user(&self) -> Option<&ValueList> {
        self.canonical_user.as_ref()
    }

    #[inline]
    pub fn federated(&self) -> Option<&ValueList> {
        self.federated.as_ref()
    }

    #[inline]
    pub fn service(&self) -> Option<&ValueList> {
        self.service.as_ref()
    }

    fn referenced_names(&self, names: &mut BTreeSet<String>) {
        for list in [&self.aws, &self.canonical_user, &self.federated, &self.service].into_iter().flatten() {
            list.referenced_names(names);
        }
    }
}

impl Serialize for SpecifiedPrincipal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(aws) = &self.aws {
            map.serialize_entry("AWS", aws)?;
        }
        if let Some(canonical_user) = &self.canonical_user {
            map.serialize_entry("CanonicalUser", canonical_user)?;
        }
        if let Some(federated) = &self.federated {
            map.serialize_entry("Federated", federated)?;
        }
        if let Some(service) = &self.service {
            map.serialize_entry("Service", service)?;
        }
        map.end()
    }
}

display_json!(SpecifiedPrincipal);

/// One access-control statement. Built through [`StatementBuilder`] and
/// immutable afterwards.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Statement {
    #[builder(setter(into, strip_option), default)]
    sid: Option<String>,

    effect: Effect,

    #[builder(setter(custom), default)]
    action: Option<ValueList>,

    #[builder(setter(custom), default)]
    principal: Option<Principal>,

    #[builder(setter(custom), default)]
    resource: Option<ValueList>,

    #[builder(setter(custom), default)]
    condition: Option<Condition>,
}

impl Statement {
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    #[inline]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    #[inline]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    #[inline]
    pub fn action(&self) -> Option<&ValueList> {
        self.action.as_ref()
    }

    #[inline]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&ValueList> {
        self.resource.as_ref()
    }

    #[inline]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        for list in [&self.action, &self.resource].into_iter().flatten() {
            list.referenced_names(names);
        }
        if let Some(Principal::Specified(specified)) = &self.principal {
            specified.referenced_names(names);
        }
        if let Some(condition) = &self.condition {
            for map in condition.values() {
                for list in map.values() {
                    list.referenced_names(names);
                }
            }
        }
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(sid) = &self.sid {
            map.serialize_entry("Sid", sid)?;
        }
        map.serialize_entry("Effect", &self.effect)?;
        if let Some(action) = &self.action {
            map.serialize_entry("Action", action)?;
        }
        if let Some(principal) = &self.principal {
            map.serialize_entry("Principal", principal)?;
        }
        if let Some(resource) = &self.resource {
            map.serialize_entry("Resource", resource)?;
        }
        if let Some(condition) = &self.condition {
            map.serialize_entry("Condition", condition)?;
        }
        map.end()
    }
}

display_json!(Statement);

impl StatementBuilder {
    /// Append one action identifier. A single call renders as a bare
    /// string, repeated calls as a list.
    pub fn action(&mut self, action: impl Into<Value>) -> &mut Self {
        append_value(self.action.get_or_insert(None), action.into());
        self
    }

    /// Append one resource identifier; accepts references as well as ARNs.
    pub fn resource(&mut self, resource: impl Into<Value>) -> &mut Self {
        append_value(self.resource.get_or_insert(None), resource.into());
        self
    }

    /// Set the wildcard principal, replacing any specified principals.
    pub fn principal_any(&mut self) -> &mut Self {
        *self.principal.get_or_insert(None) = Some(Principal::Any);
        self
    }

    pub fn principal_aws(&mut self, id: impl Into<Value>) -> &mut Self {
        append_value(&mut self.specified_principal().aws, id.into());
        self
    }

    pub fn principal_canonical_user(&mut self, id: impl Into<Value>) -> &mut Self {
        append_value(&mut self.specified_principal().canonical_user, id.into());
        self
    }

    pub fn principal_federated(&mut self, id: impl Into<Value>) -> &mut Self {
        append_value(&mut self.specified_principal().federated, id.into());
        self
    }

    pub fn principal_service(&mut self, id: impl Into<Value>) -> &mut Self {
        append_value(&mut self.specified_principal().service, id.into());
        self
    }

    /// Add a condition entry. Repeated calls with the same operator and key
    /// accumulate values.
    pub fn condition(&mut self, op: ConditionOp, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let condition = self.condition.get_or_insert(None).get_or_insert_with(Condition::new);
        let map = condition.entry(op).or_insert_with(ConditionMap::new);
        match map.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value.into()),
            Entry::Vacant(entry) => {
                entry.insert(ValueList::Single(value.into()));
            }
        }
        self
    }

    pub(crate) fn has_resource(&self) -> bool {
        matches!(self.resource, Some(Some(_)))
    }

    fn specified_principal(&mut self) -> &mut SpecifiedPrincipal {
        let slot = self.principal.get_or_insert(None);
        if !matches!(slot, Some(Principal::Specified(_))) {
            *slot = Some(Principal::Specified(SpecifiedPrincipal::default()));
        }
        match slot {
            Some(Principal::Specified(specified)) => specified,
            _ => unreachable!("slot was just set to a specified principal"),
        }
    }
}

fn append_value(slot: &mut Option<ValueList>, value: Value) {
    match slot {
        None => *slot = Some(ValueList::Single(value)),
        Some(list) => list.push(value),
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{get_att, ConditionOp, Effect, Principal, Statement, Value, ValueList},
        indoc::indoc,
        pretty_assertions::assert_eq,
    };

    #[test_log::test]
    fn test_missing_effect() {
        let err = Statement::builder().build().unwrap_err();
        assert_eq!(err.to_string(), "`effect` must be initialized");
    }

    #[test_log::test]
    fn test_action_accumulation() {
        let mut builder = Statement::builder();
        builder.effect(Effect::Allow).action("s3:GetObject");
        let statement = builder.clone().build().unwrap();
        assert_eq!(statement.action(), Some(&ValueList::from("s3:GetObject")));

        builder.action("s3:PutObject");
        let statement = builder.build().unwrap();
        assert_eq!(
            statement.action(),
            Some(&ValueList::from(vec![Value::from("s3:GetObject"), Value::from("s3:PutObject")]))
        );
        assert!(statement.resource().is_none());
        assert!(statement.principal().is_none());
        assert!(statement.condition().is_none());
    }

    #[test_log::test]
    fn test_principal_shapes() {
        let mut builder = Statement::builder();
        builder.effect(Effect::Allow).action("sts:AssumeRole").principal_service("ec2.amazonaws.com");
        let statement = builder.build().unwrap();
        let specified = statement.principal().unwrap().specified().unwrap();
        assert_eq!(specified.service(), Some(&ValueList::from("ec2.amazonaws.com")));
        assert!(specified.aws().is_none());

        let mut builder = Statement::builder();
        builder.effect(Effect::Deny).action("*").principal_aws("123456789012").principal_any();
        let statement = builder.build().unwrap();
        assert_eq!(statement.principal(), Some(&Principal::Any));
        assert!(statement.principal().unwrap().specified().is_none());
    }

    #[test_log::test]
    fn test_condition_accumulation() {
        let mut builder = Statement::builder();
        builder
            .effect(Effect::Allow)
            .action("ec2:RunInstances")
            .condition(ConditionOp::StringEquals, "ec2:Region", "us-east-1")
            .condition(ConditionOp::StringEquals, "ec2:Region", "us-west-2");
        let statement = builder.build().unwrap();

        let condition = statement.condition().unwrap();
        let map = condition.get(&ConditionOp::StringEquals).unwrap();
        let values = map.get("ec2:Region").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1], Value::from("us-west-2"));
    }

    #[test_log::test]
    fn test_field_order() {
        let mut builder = Statement::builder();
        builder
            .effect(Effect::Allow)
            .sid("TerminateSelf")
            .action("ec2:TerminateInstances")
            .principal_aws("123456789012")
            .resource("*")
            .condition(ConditionOp::StringEquals, "ec2:InstanceProfile", get_att("WorkerRoleProfile", "Arn"));
        let statement = builder.build().unwrap();

        assert_eq!(statement.sid(), Some("TerminateSelf"));
        assert_eq!(statement.effect(), &Effect::Allow);
        assert_eq!(
            statement.to_string(),
            indoc! { r#"
            {
                "Sid": "TerminateSelf",
                "Effect": "Allow",
                "Action": "ec2:TerminateInstances",
                "Principal": {
                    "AWS": "123456789012"
                },
                "Resource": "*",
                "Condition": {
                    "StringEquals": {
                        "ec2:InstanceProfile": {
                            "Fn::GetAtt": [
                                "WorkerRoleProfile",
                                "Arn"
                            ]
                        }
                    }
                }
            }"# }
        );
    }

    #[test_log::test]
    fn test_effect_display() {
        assert_eq!(format!("{}", Effect::Allow), "Allow");
        assert_eq!(format!("{}", Effect::Deny), "Deny");
    }
}

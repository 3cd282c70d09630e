use {
    crate::{
        display_json,
        property::{PropertyDescriptor, PropertyKind, PropertySchema},
        resource::{serialize_resource, Properties, ResourceCore},
        statement::StatementBuilder,
        CumulusError, PolicyDocument, Value,
    },
    serde::{Serialize, Serializer},
    std::collections::BTreeSet,
};

const TYPE: &str = "AWS::IAM::Policy";

static SCHEMA: PropertySchema = PropertySchema::new(
    TYPE,
    &[
        PropertyDescriptor::new("policy_name", "PolicyName", PropertyKind::Scalar),
        PropertyDescriptor::new("groups", "Groups", PropertyKind::List),
        PropertyDescriptor::new("roles", "Roles", PropertyKind::List),
        PropertyDescriptor::new("users", "Users", PropertyKind::List),
        PropertyDescriptor::new("policy_document", "PolicyDocument", PropertyKind::Document),
    ],
);

/// AWS::IAM::Policy: a standalone policy resource attached to roles,
/// groups, or users. Owns exactly one identity-mode document, created with
/// the resource and populated through [`allow`](Self::allow) and
/// [`deny`](Self::deny).
#[derive(Clone, Debug)]
pub struct IamPolicy {
    core: ResourceCore,
}

impl IamPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let document = PolicyDocument::new(name.clone());
        let mut core = ResourceCore::new(name, TYPE, &SCHEMA);
        core.set_declared("policy_document", Value::PolicyDocument(document));
        Self {
            core,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.core.name()
    }

    #[inline]
    pub fn resource_type(&self) -> &'static str {
        self.core.resource_type()
    }

    pub fn policy_name(&mut self, policy_name: impl Into<Value>) -> &mut Self {
        self.core.set_declared("policy_name", policy_name.into());
        self
    }

    /// Attach a role, normally by `Ref`.
    pub fn attach_role(&mut self, role: impl Into<Value>) -> &mut Self {
        self.core.append_declared("roles", role.into());
        self
    }

    pub fn attach_group(&mut self, group: impl Into<Value>) -> &mut Self {
        self.core.append_declared("groups", group.into());
        self
    }

    pub fn attach_user(&mut self, user: impl Into<Value>) -> &mut Self {
        self.core.append_declared("users", user.into());
        self
    }

    /// Append one Allow statement to the policy document.
    pub fn allow<F: FnOnce(&mut StatementBuilder)>(&mut self, configure: F) -> &mut Self {
        self.document_mut().allow(configure);
        self
    }

    /// Append one Deny statement to the policy document.
    pub fn deny<F: FnOnce(&mut StatementBuilder)>(&mut self, configure: F) -> &mut Self {
        self.document_mut().deny(configure);
        self
    }

    pub fn document(&self) -> &PolicyDocument {
        match self.core.get("policy_document") {
            Some(Value::PolicyDocument(document)) => document,
            _ => unreachable!("policy document is set at construction"),
        }
    }

    fn document_mut(&mut self) -> &mut PolicyDocument {
        match self.core.get_mut("policy_document") {
            Some(Value::PolicyDocument(document)) => document,
            _ => unreachable!("policy document is set at construction"),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.core.get(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), CumulusError> {
        self.core.set(field, value.into())
    }

    pub fn append(&mut self, field: &str, value: impl Into<Value>) -> Result<(), CumulusError> {
        self.core.append(field, value.into())
    }

    pub fn depend_on(&mut self, name: impl Into<String>) -> &mut Self {
        self.core.depend_on(name);
        self
    }

    #[inline]
    pub fn depends_on(&self) -> &[String] {
        self.core.depends_on()
    }

    pub fn reference(&self) -> Value {
        self.core.reference()
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        self.core.referenced_names(names);
    }
}

impl Serialize for IamPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_resource(serializer, &self.core, &Properties(&self.core))
    }
}

display_json!(IamPolicy);

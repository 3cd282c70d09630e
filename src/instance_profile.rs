use {
    crate::{
        display_json,
        property::{PropertyDescriptor, PropertyKind, PropertySchema},
        resource::{serialize_resource, Properties, ResourceCore},
        CumulusError, Value,
    },
    serde::{Serialize, Serializer},
    std::collections::BTreeSet,
};

const TYPE: &str = "AWS::IAM::InstanceProfile";

static SCHEMA: PropertySchema = PropertySchema::new(
    TYPE,
    &[
        PropertyDescriptor::new("path", "Path", PropertyKind::Scalar),
        PropertyDescriptor::new("roles", "Roles", PropertyKind::List),
    ],
);

/// AWS::IAM::InstanceProfile. Normally synthesized by
/// [`Role::with_instance_profile`](crate::Role::with_instance_profile) with
/// the owning role already attached.
#[derive(Clone, Debug)]
pub struct InstanceProfile {
    core: ResourceCore,
}

impl InstanceProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: ResourceCore::new(name, TYPE, &SCHEMA),
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

    pub fn path(&mut self, path: impl Into<Value>) -> &mut Self {
        self.core.set_declared("path", path.into());
        self
    }

    /// Attach a role, normally by `Ref`.
    pub fn add_role(&mut self, role: impl Into<Value>) -> &mut Self {
        self.core.append_declared("roles", role.into());
        self
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

impl Serialize for InstanceProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_resource(serializer, &self.core, &Properties(&self.core))
    }
}

display_json!(InstanceProfile);

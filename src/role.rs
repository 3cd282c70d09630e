use {
    crate::{
        display_json, get_att,
        property::{PropertyDescriptor, PropertyKind, PropertySchema},
        resource::{serialize_resource, ResourceCore},
        ConditionOp, CumulusError, IamPolicy, InstanceProfile, PolicyDocument, Template, Value,
    },
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::collections::BTreeSet,
};

const TYPE: &str = "AWS::IAM::Role";

static SCHEMA: PropertySchema = PropertySchema::new(
    TYPE,
    &[
        PropertyDescriptor::new("path", "Path", PropertyKind::Scalar),
        PropertyDescriptor::new("policies", "Policies", PropertyKind::List),
        PropertyDescriptor::with_aliases(
            "managed_policy_arn",
            "ManagedPolicyArns",
            PropertyKind::List,
            &["managed_policy"],
        ),
        PropertyDescriptor::new("role_name", "RoleName", PropertyKind::Scalar),
    ],
);

/// AWS::IAM::Role.
///
/// Besides its declared properties, a role carries a trust relationship
/// (rendered under `AssumeRolePolicyDocument`) and may synthesize satellite
/// resources: an instance profile and policy resources attached to it.
/// Methods that synthesize resources take the owning [`Template`] by `&mut`
/// and register the new resources there.
#[derive(Clone, Debug)]
pub struct Role {
    core: ResourceCore,
    trust_relationship: Option<PolicyDocument>,
    instance_profile: Option<String>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            core: ResourceCore::new(name, TYPE, &SCHEMA),
            trust_relationship: None,
            instance_profile: None,
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

    #[inline]
    pub fn trust_relationship(&self) -> Option<&PolicyDocument> {
        self.trust_relationship.as_ref()
    }

    /// The name of the instance profile synthesized for this role, if any.
    #[inline]
    pub fn instance_profile(&self) -> Option<&str> {
        self.instance_profile.as_deref()
    }

    pub fn path(&mut self, path: impl Into<Value>) -> &mut Self {
        self.core.set_declared("path", path.into());
        self
    }

    pub fn role_name(&mut self, role_name: impl Into<Value>) -> &mut Self {
        self.core.set_declared("role_name", role_name.into());
        self
    }

    /// Append one managed policy ARN.
    pub fn managed_policy(&mut self, arn: impl Into<Value>) -> &mut Self {
        self.core.append_declared("managed_policy_arn", arn.into());
        self
    }

    /// The attached inline policy documents, in the order they were added.
    pub fn policies(&self) -> Vec<&PolicyDocument> {
        match self.core.get("policies") {
            Some(Value::List(values)) => values
                .iter()
                .filter_map(|value| match value {
                    Value::NamedPolicy(document) => Some(document),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Replace the trust relationship with a document built by the closure.
    /// The last call wins; there is no merging.
    pub fn assume_role_policy<F: FnOnce(&mut PolicyDocument)>(
        &mut self,
        policy_name: impl Into<String>,
        configure: F,
    ) -> &mut Self {
        let mut document = PolicyDocument::trust(policy_name);
        configure(&mut document);
        self.trust_relationship = Some(document);
        self
    }

    /// Trust an AWS service to assume this role. The canned statement is
    /// appended before the closure runs, so the closure can extend the
    /// document with further statements.
    pub fn trust_service<F: FnOnce(&mut PolicyDocument)>(
        &mut self,
        service: &str,
        policy_name: Option<&str>,
        configure: F,
    ) -> &mut Self {
        let policy_name = match policy_name {
            Some(name) => name.to_string(),
            None => format!("trust-{}-service", service),
        };
        let mut document = PolicyDocument::trust(policy_name);
        document.allow(|statement| {
            statement.action("sts:AssumeRole").principal_service(format!("{}.amazonaws.com", service));
        });
        configure(&mut document);
        self.trust_relationship = Some(document);
        self
    }

    pub fn trust_ec2_instances<F: FnOnce(&mut PolicyDocument)>(&mut self, configure: F) -> &mut Self {
        self.trust_service("ec2", Some("trust-ec2-instances"), configure)
    }

    pub fn trust_flow_logs<F: FnOnce(&mut PolicyDocument)>(&mut self, configure: F) -> &mut Self {
        self.trust_service("vpc-flow-logs", Some("trust-flow-logs"), configure)
    }

    pub fn trust_emr<F: FnOnce(&mut PolicyDocument)>(&mut self, configure: F) -> &mut Self {
        self.trust_service("elasticmapreduce", Some("trust-emr"), configure)
    }

    pub fn trust_cloudtrail<F: FnOnce(&mut PolicyDocument)>(&mut self, configure: F) -> &mut Self {
        self.trust_service("cloudtrail", Some("trust-cloudtrail-instances"), configure)
    }

    /// Append one inline policy document, built by the closure.
    pub fn policy<F: FnOnce(&mut PolicyDocument)>(&mut self, policy_name: impl Into<String>, configure: F) -> &mut Self {
        let mut document = PolicyDocument::new(policy_name);
        configure(&mut document);
        self.core.append_declared("policies", Value::NamedPolicy(document));
        self
    }

    /// Synthesize an instance profile named `<RoleName>Profile`, attach
    /// this role to it, copy this role's path, and register it in the
    /// template. A role has at most one instance profile: a second call is
    /// rejected with [`CumulusError::InstanceProfileExists`].
    pub fn with_instance_profile<F: FnOnce(&mut InstanceProfile)>(
        &mut self,
        template: &mut Template,
        configure: F,
    ) -> Result<(), CumulusError> {
        if self.instance_profile.is_some() {
            return Err(CumulusError::InstanceProfileExists(self.name().to_string()));
        }
        self.create_instance_profile(template, configure)
    }

    /// Grant instances launched with this role's profile permission to
    /// terminate themselves, creating the profile first if it does not
    /// exist. The policy resource is named `<RoleName>TerminationPolicy`
    /// and depends explicitly on the instance profile.
    pub fn allow_instance_termination<F: FnOnce(&mut IamPolicy)>(
        &mut self,
        template: &mut Template,
        configure: F,
    ) -> Result<(), CumulusError> {
        if self.instance_profile.is_none() {
            self.create_instance_profile(template, |_| {})?;
        }
        let profile_name = match &self.instance_profile {
            Some(name) => name.clone(),
            None => unreachable!("instance profile was just created"),
        };

        let mut policy = IamPolicy::new(format!("{}TerminationPolicy", self.name()));
        policy.policy_name("allow-instance-termination");
        policy.allow(|statement| {
            statement.action("ec2:TerminateInstances").resource("*").condition(
                ConditionOp::StringEquals,
                "ec2:InstanceProfile",
                get_att(profile_name.as_str(), "Arn"),
            );
        });
        policy.attach_role(self.reference());
        policy.depend_on(profile_name);

        configure(&mut policy);
        template.add(policy)
    }

    fn create_instance_profile<F: FnOnce(&mut InstanceProfile)>(
        &mut self,
        template: &mut Template,
        configure: F,
    ) -> Result<(), CumulusError> {
        let mut profile = InstanceProfile::new(format!("{}Profile", self.name()));
        profile.add_role(self.reference());
        if let Some(path) = self.core.get("path") {
            profile.path(path.clone());
        }
        configure(&mut profile);
        self.instance_profile = Some(profile.name().to_string());
        template.add(profile)
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
        if let Some(trust) = &self.trust_relationship {
            trust.referenced_names(names);
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_resource(serializer, &self.core, &RoleProperties(self))
    }
}

display_json!(Role);

/// Property block with the trust relationship injected after the declared
/// properties.
struct RoleProperties<'a>(&'a Role);

impl Serialize for RoleProperties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.0.core.serialize_properties(&mut map)?;
        if let Some(trust) = &self.0.trust_relationship {
            map.serialize_entry("AssumeRolePolicyDocument", trust)?;
        }
        map.end()
    }
}

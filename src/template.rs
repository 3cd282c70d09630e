use {
    crate::{display_json, CumulusError, IamPolicy, InstanceProfile, Role},
    lazy_static::lazy_static,
    log::debug,
    regex::Regex,
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::collections::BTreeSet,
};

const FORMAT_VERSION: &str = "2010-09-09";

lazy_static! {
    static ref LOGICAL_ID: Regex = Regex::new("^[A-Za-z0-9]+$").unwrap();
}

/// One registered resource.
#[derive(Clone, Debug)]
pub enum TemplateResource {
    InstanceProfile(InstanceProfile),
    Policy(IamPolicy),
    Role(Role),
}

impl TemplateResource {
    pub fn name(&self) -> &str {
        match self {
            Self::InstanceProfile(profile) => profile.name(),
            Self::Policy(policy) => policy.name(),
            Self::Role(role) => role.name(),
        }
    }

    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::InstanceProfile(profile) => profile.resource_type(),
            Self::Policy(policy) => policy.resource_type(),
            Self::Role(role) => role.resource_type(),
        }
    }

    pub fn depends_on(&self) -> &[String] {
        match self {
            Self::InstanceProfile(profile) => profile.depends_on(),
            Self::Policy(policy) => policy.depends_on(),
            Self::Role(role) => role.depends_on(),
        }
    }

    pub fn as_instance_profile(&self) -> Option<&InstanceProfile> {
        match self {
            Self::InstanceProfile(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_policy(&self) -> Option<&IamPolicy> {
        match self {
            Self::Policy(policy) => Some(policy),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&Role> {
        match self {
            Self::Role(role) => Some(role),
            _ => None,
        }
    }

    fn referenced_names(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::InstanceProfile(profile) => profile.referenced_names(names),
            Self::Policy(policy) => policy.referenced_names(names),
            Self::Role(role) => role.referenced_names(names),
        }
    }
}

impl From<InstanceProfile> for TemplateResource {
    fn from(profile: InstanceProfile) -> Self {
        Self::InstanceProfile(profile)
    }
}

impl From<IamPolicy> for TemplateResource {
    fn from(policy: IamPolicy) -> Self {
        Self::Policy(policy)
    }
}

impl From<Role> for TemplateResource {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl Serialize for TemplateResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::InstanceProfile(profile) => profile.serialize(serializer),
            Self::Policy(policy) => policy.serialize(serializer),
            Self::Role(role) => role.serialize(serializer),
        }
    }
}

/// The registry of resources that renders as one CloudFormation template.
///
/// Resources are held in insertion order; rendering lists them in a
/// provisioning-safe order instead, with every dependency ahead of its
/// dependents. Rendering is pure: an unmutated template renders the same
/// document every time.
#[derive(Clone, Debug, Default)]
pub struct Template {
    description: Option<String>,
    resources: Vec<TemplateResource>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Register a resource under its own name. The name must be a
    /// CloudFormation logical ID (alphanumeric) and unused in this
    /// template.
    pub fn add(&mut self, resource: impl Into<TemplateResource>) -> Result<(), CumulusError> {
        let resource = resource.into();
        let name = resource.name();
        if !LOGICAL_ID.is_match(name) {
            return Err(CumulusError::InvalidLogicalId(name.to_string()));
        }
        if self.get(name).is_some() {
            return Err(CumulusError::DuplicateResource(name.to_string()));
        }
        debug!("registered resource {} ({})", name, resource.resource_type());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TemplateResource> {
        self.resources.iter().find(|resource| resource.name() == name)
    }

    /// The registered resources, in insertion order.
    #[inline]
    pub fn resources(&self) -> &[TemplateResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resource names in provisioning-safe order.
    ///
    /// A resource is ordered after everything in its explicit `DependsOn`
    /// set and after every registered resource it references through `Ref`
    /// or `Fn::GetAtt`. Insertion order breaks ties. References to names
    /// not registered here are ignored.
    pub fn sorted_names(&self) -> Result<Vec<&str>, CumulusError> {
        let registered: BTreeSet<&str> = self.resources.iter().map(|resource| resource.name()).collect();
        let mut pending: Vec<(&str, BTreeSet<String>)> = Vec::with_capacity(self.resources.len());
        for resource in &self.resources {
            let mut after: BTreeSet<String> = resource.depends_on().iter().cloned().collect();
            resource.referenced_names(&mut after);
            after.retain(|name| name != resource.name() && registered.contains(name.as_str()));
            pending.push((resource.name(), after));
        }

        let mut sorted = Vec::with_capacity(pending.len());
        let mut placed: BTreeSet<&str> = BTreeSet::new();
        while placed.len() < pending.len() {
            let mut progressed = false;
            for (name, after) in &pending {
                if placed.contains(name) {
                    continue;
                }
                if after.iter().all(|dep| placed.contains(dep.as_str())) {
                    debug!("resource {} is ready", name);
                    sorted.push(*name);
                    placed.insert(*name);
                    progressed = true;
                }
            }
            if !progressed {
                for (name, _) in &pending {
                    if !placed.contains(name) {
                        return Err(CumulusError::DependencyCycle((*name).to_string()));
                    }
                }
            }
        }
        Ok(sorted)
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let order = self.sorted_names().map_err(serde::ser::Error::custom)?;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("AWSTemplateFormatVersion", FORMAT_VERSION)?;
        if let Some(description) = &self.description {
            map.serialize_entry("Description", description)?;
        }
        map.serialize_entry(
            "Resources",
            &OrderedResources {
                template: self,
                order,
            },
        )?;
        map.end()
    }
}

display_json!(Template);

struct OrderedResources<'a> {
    template: &'a Template,
    order: Vec<&'a str>,
}

impl Serialize for OrderedResources<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for name in &self.order {
            match self.template.get(name) {
                Some(resource) => map.serialize_entry(name, resource)?,
                None => unreachable!("sorted names come from the registry"),
            }
        }
        map.end()
    }
}

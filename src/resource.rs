use {
    crate::{
        property::{PropertySchema, PropertyStore},
        CumulusError, Value,
    },
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::collections::BTreeSet,
};

/// State shared by every concrete resource: the logical name (immutable
/// after construction), the fixed CloudFormation type tag, the property
/// table for the type, the per-instance values, and the explicit
/// dependency set.
#[derive(Clone, Debug)]
pub(crate) struct ResourceCore {
    name: String,
    resource_type: &'static str,
    schema: &'static PropertySchema,
    properties: PropertyStore,
    depends_on: Vec<String>,
}

impl ResourceCore {
    pub(crate) fn new(name: impl Into<String>, resource_type: &'static str, schema: &'static PropertySchema) -> Self {
        Self {
            name: name.into(),
            resource_type,
            schema,
            properties: PropertyStore::new(),
            depends_on: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    pub(crate) fn get(&self, field: &str) -> Option<&Value> {
        self.properties.get(self.schema, field)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.properties.get_mut(self.schema, field)
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) -> Result<(), CumulusError> {
        self.properties.set(self.schema, field, value)
    }

    pub(crate) fn append(&mut self, field: &str, value: Value) -> Result<(), CumulusError> {
        self.properties.append(self.schema, field, value)
    }

    /// Set a field that is known to be declared in the type's schema.
    pub(crate) fn set_declared(&mut self, field: &str, value: Value) {
        match self.set(field, value) {
            Ok(()) => (),
            Err(err) => unreachable!("{}", err),
        }
    }

    /// Append to a list field that is known to be declared in the type's
    /// schema.
    pub(crate) fn append_declared(&mut self, field: &str, value: Value) {
        match self.append(field, value) {
            Ok(()) => (),
            Err(err) => unreachable!("{}", err),
        }
    }

    /// Record an explicit provisioning-order dependency on another resource.
    pub(crate) fn depend_on(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.depends_on.contains(&name) {
            self.depends_on.push(name);
        }
    }

    #[inline]
    pub(crate) fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// A `Ref` to this resource, usable wherever a value is accepted.
    pub(crate) fn reference(&self) -> Value {
        Value::Ref(self.name.clone())
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        self.properties.referenced_names(names);
    }

    /// Emit the present properties into an open map, in schema declaration
    /// order.
    pub(crate) fn serialize_properties<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for descriptor in self.schema.descriptors() {
            if let Some(value) = self.properties.value(descriptor.key()) {
                map.serialize_entry(descriptor.key(), value)?;
            }
        }
        Ok(())
    }
}

/// Serializer for a plain property block: present properties only, in
/// schema order. Resources with injected fields build their own.
pub(crate) struct Properties<'a>(pub(crate) &'a ResourceCore);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.0.serialize_properties(&mut map)?;
        map.end()
    }
}

/// Emit the standard resource envelope: `Type`, `Properties`, and
/// `DependsOn` when the explicit dependency set is non-empty.
pub(crate) fn serialize_resource<S, P>(serializer: S, core: &ResourceCore, properties: &P) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: Serialize,
{
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("Type", core.resource_type())?;
    map.serialize_entry("Properties", properties)?;
    if !core.depends_on().is_empty() {
        map.serialize_entry("DependsOn", core.depends_on())?;
    }
    map.end()
}

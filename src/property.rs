use {
    crate::{CumulusError, Value},
    std::collections::{btree_map::Entry, BTreeMap, BTreeSet},
};

/// How a property value is placed into the rendered output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyKind {
    Scalar,
    List,
    Document,
}

/// Declares how one logical field of a resource type serializes: the
/// output key it renders under, its kind, and any alias field names.
///
/// Descriptors are declared once per resource type in a `'static` table and
/// shared read-only by every instance of that type.
#[derive(Debug, Eq, PartialEq)]
pub struct PropertyDescriptor {
    field: &'static str,
    key: &'static str,
    kind: PropertyKind,
    aliases: &'static [&'static str],
}

impl PropertyDescriptor {
    pub const fn new(field: &'static str, key: &'static str, kind: PropertyKind) -> Self {
        Self {
            field,
            key,
            kind,
            aliases: &[],
        }
    }

    pub const fn with_aliases(
        field: &'static str,
        key: &'static str,
        kind: PropertyKind,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            key,
            kind,
            aliases,
        }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[inline]
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn matches(&self, name: &str) -> bool {
        self.field == name || self.aliases.iter().any(|alias| *alias == name)
    }
}

/// The property table for one resource type.
#[derive(Debug)]
pub struct PropertySchema {
    resource_type: &'static str,
    descriptors: &'static [PropertyDescriptor],
}

impl PropertySchema {
    pub const fn new(resource_type: &'static str, descriptors: &'static [PropertyDescriptor]) -> Self {
        Self {
            resource_type,
            descriptors,
        }
    }

    #[inline]
    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    #[inline]
    pub fn descriptors(&self) -> &'static [PropertyDescriptor] {
        self.descriptors
    }

    /// Look up a descriptor by its canonical field name or any alias.
    pub fn descriptor(&self, field: &str) -> Option<&'static PropertyDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.matches(field))
    }
}

/// Per-instance property values, keyed by output key. A property that was
/// never set has no entry and is omitted from the rendered output.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertyStore {
    values: BTreeMap<&'static str, Value>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any existing value. List properties are
    /// normalized so the stored value is always a list.
    pub fn set(&mut self, schema: &PropertySchema, field: &str, value: Value) -> Result<(), CumulusError> {
        let descriptor = self.resolve(schema, field)?;
        let value = match descriptor.kind() {
            PropertyKind::List => match value {
                Value::List(_) => value,
                single => Value::List(vec![single]),
            },
            _ => value,
        };
        self.values.insert(descriptor.key(), value);
        Ok(())
    }

    /// Append a value to a list property, creating the list on first use.
    pub fn append(&mut self, schema: &PropertySchema, field: &str, value: Value) -> Result<(), CumulusError> {
        let descriptor = self.resolve(schema, field)?;
        if descriptor.kind() != PropertyKind::List {
            return Err(CumulusError::NotAListProperty(schema.resource_type(), field.to_string()));
        }
        match self.values.entry(descriptor.key()) {
            Entry::Vacant(entry) => {
                entry.insert(Value::List(vec![value]));
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Value::List(values) => values.push(value),
                // set() normalizes list properties to Value::List
                _ => unreachable!("list property holds a list"),
            },
        }
        Ok(())
    }

    /// Read a property by its canonical field name or any alias.
    pub fn get(&self, schema: &PropertySchema, field: &str) -> Option<&Value> {
        schema.descriptor(field).and_then(|descriptor| self.values.get(descriptor.key()))
    }

    pub(crate) fn get_mut(&mut self, schema: &PropertySchema, field: &str) -> Option<&mut Value> {
        match schema.descriptor(field) {
            Some(descriptor) => self.values.get_mut(descriptor.key()),
            None => None,
        }
    }

    /// Read a property by its output key, bypassing alias resolution.
    pub(crate) fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        for value in self.values.values() {
            value.referenced_names(names);
        }
    }

    fn resolve(&self, schema: &PropertySchema, field: &str) -> Result<&'static PropertyDescriptor, CumulusError> {
        schema
            .descriptor(field)
            .ok_or_else(|| CumulusError::UndeclaredProperty(schema.resource_type(), field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{CumulusError, PropertyDescriptor, PropertyKind, PropertySchema, PropertyStore, Value},
        pretty_assertions::assert_eq,
    };

    static SCHEMA: PropertySchema = PropertySchema::new(
        "Test::Widget",
        &[
            PropertyDescriptor::new("path", "Path", PropertyKind::Scalar),
            PropertyDescriptor::with_aliases(
                "managed_policy_arn",
                "ManagedPolicyArns",
                PropertyKind::List,
                &["managed_policy"],
            ),
        ],
    );

    #[test_log::test]
    fn test_descriptor_lookup() {
        let descriptor = SCHEMA.descriptor("managed_policy").unwrap();
        assert_eq!(descriptor.field(), "managed_policy_arn");
        assert_eq!(descriptor.key(), "ManagedPolicyArns");
        assert_eq!(descriptor.kind(), PropertyKind::List);
        assert_eq!(descriptor.aliases(), ["managed_policy"]);
        assert_eq!(SCHEMA.descriptor("managed_policy_arn"), SCHEMA.descriptor("managed_policy"));
        assert!(SCHEMA.descriptor("color").is_none());
        assert_eq!(SCHEMA.resource_type(), "Test::Widget");
    }

    #[test_log::test]
    fn test_alias_shares_slot() {
        let mut store = PropertyStore::new();
        store.append(&SCHEMA, "managed_policy", Value::from("arn:aws:iam::aws:policy/ReadOnlyAccess")).unwrap();
        store.append(&SCHEMA, "managed_policy_arn", Value::from("arn:aws:iam::aws:policy/PowerUserAccess")).unwrap();

        let value = store.get(&SCHEMA, "managed_policy").unwrap();
        assert_eq!(
            value,
            &Value::List(vec![
                Value::from("arn:aws:iam::aws:policy/ReadOnlyAccess"),
                Value::from("arn:aws:iam::aws:policy/PowerUserAccess"),
            ])
        );
        assert_eq!(store.get(&SCHEMA, "managed_policy_arn"), Some(value));
    }

    #[test_log::test]
    fn test_undeclared_property() {
        let mut store = PropertyStore::new();
        let err = store.set(&SCHEMA, "color", Value::from("red")).unwrap_err();
        assert_eq!(err, CumulusError::UndeclaredProperty("Test::Widget", "color".to_string()));

        let err = store.append(&SCHEMA, "color", Value::from("red")).unwrap_err();
        assert_eq!(err, CumulusError::UndeclaredProperty("Test::Widget", "color".to_string()));
        assert!(store.is_empty());
    }

    #[test_log::test]
    fn test_append_to_scalar() {
        let mut store = PropertyStore::new();
        let err = store.append(&SCHEMA, "path", Value::from("/")).unwrap_err();
        assert_eq!(err, CumulusError::NotAListProperty("Test::Widget", "path".to_string()));
    }

    #[test_log::test]
    fn test_set_normalizes_lists() {
        let mut store = PropertyStore::new();
        store.set(&SCHEMA, "managed_policy", Value::from("arn:aws:iam::aws:policy/ReadOnlyAccess")).unwrap();
        assert_eq!(
            store.get(&SCHEMA, "managed_policy"),
            Some(&Value::List(vec![Value::from("arn:aws:iam::aws:policy/ReadOnlyAccess")]))
        );

        // a later append extends the normalized list
        store.append(&SCHEMA, "managed_policy", Value::from("arn:aws:iam::aws:policy/PowerUserAccess")).unwrap();
        let value = store.get(&SCHEMA, "managed_policy").unwrap();
        assert_eq!(
            value,
            &Value::List(vec![
                Value::from("arn:aws:iam::aws:policy/ReadOnlyAccess"),
                Value::from("arn:aws:iam::aws:policy/PowerUserAccess"),
            ])
        );
    }

    #[test_log::test]
    fn test_unset_properties_absent() {
        let mut store = PropertyStore::new();
        assert!(store.get(&SCHEMA, "path").is_none());
        store.set(&SCHEMA, "path", Value::from("/")).unwrap();
        assert_eq!(store.get(&SCHEMA, "path"), Some(&Value::from("/")));
    }
}

use {
    crate::{display_json, PolicyDocument},
    serde::{
        ser::{SerializeMap, SerializeSeq, Serializer},
        Serialize,
    },
    std::{collections::BTreeSet, ops::Index},
};

/// Produce an opaque reference to a runtime attribute of a named resource.
///
/// The reference is not resolved here; CloudFormation resolves it at
/// provisioning time. Referencing a name that is never registered is not an
/// error in this crate.
pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Value {
    Value::GetAtt(resource.into(), attribute.into())
}

/// A value as it appears in a rendered template document.
///
/// `Ref` and `GetAtt` are kept distinct from plain strings so the renderer
/// can emit their intrinsic-function shapes and so a consumer can detect an
/// unresolved reference.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    String(String),
    List(Vec<Value>),
    Ref(String),
    GetAtt(String, String),
    PolicyDocument(PolicyDocument),
    NamedPolicy(PolicyDocument),
}

impl Value {
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// Collect the resource names this value refers to, transitively.
    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::String(_) => (),
            Self::List(values) => {
                for value in values {
                    value.referenced_names(names);
                }
            }
            Self::Ref(name) | Self::GetAtt(name, _) => {
                names.insert(name.clone());
            }
            Self::PolicyDocument(document) | Self::NamedPolicy(document) => document.referenced_names(names),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::Ref(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", name)?;
                map.end()
            }
            Self::GetAtt(name, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[name.as_str(), attribute.as_str()])?;
                map.end()
            }
            Self::PolicyDocument(document) => document.serialize(serializer),
            Self::NamedPolicy(document) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("PolicyName", document.name())?;
                map.serialize_entry("PolicyDocument", document)?;
                map.end()
            }
        }
    }
}

display_json!(Value);

/// A statement field that serializes as a bare value when it holds one
/// element and as an array otherwise.
#[derive(Clone, Debug)]
pub enum ValueList {
    Single(Value),
    List(Vec<Value>),
}

impl ValueList {
    pub fn push(&mut self, value: Value) {
        match std::mem::replace(self, Self::List(Vec::new())) {
            Self::Single(first) => *self = Self::List(vec![first, value]),
            Self::List(mut values) => {
                values.push(value);
                *self = Self::List(values);
            }
        }
    }

    pub fn to_vec(&self) -> Vec<&Value> {
        match self {
            Self::Single(value) => vec![value],
            Self::List(values) => values.iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::List(values) => values.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(values) => values.len(),
        }
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        for value in self.to_vec() {
            value.referenced_names(names);
        }
    }
}

impl PartialEq for ValueList {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(v1), Self::Single(v2)) => v1 == v2,
            (Self::List(v1), Self::List(v2)) => v1 == v2,
            (Self::Single(v1), Self::List(v2)) => v2.len() == 1 && v1 == &v2[0],
            (Self::List(v1), Self::Single(v2)) => v1.len() == 1 && &v1[0] == v2,
        }
    }
}

impl Eq for ValueList {}

impl From<Value> for ValueList {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<Value>> for ValueList {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl From<&str> for ValueList {
    fn from(s: &str) -> Self {
        Self::Single(Value::from(s))
    }
}

impl Index<usize> for ValueList {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Self::Single(value) => {
                if index == 0 {
                    value
                } else {
                    panic!("index out of bounds: the len is 1 but the index is {}", index);
                }
            }
            Self::List(values) => &values[index],
        }
    }
}

impl Serialize for ValueList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(value) => value.serialize(serializer),
            Self::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

display_json!(ValueList);

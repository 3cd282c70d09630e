use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

#[derive(Debug, Eq, PartialEq)]
pub enum CumulusError {
    DependencyCycle(String),
    DuplicateResource(String),
    InstanceProfileExists(String),
    InvalidLogicalId(String),
    NotAListProperty(&'static str, String),
    UndeclaredProperty(&'static str, String),
}

impl Display for CumulusError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::DependencyCycle(name) => write!(f, "Dependency cycle involving resource: {}", name),
            Self::DuplicateResource(name) => write!(f, "Duplicate resource name: {}", name),
            Self::InstanceProfileExists(role) => {
                write!(f, "Instance profile already created for role: {}", role)
            }
            Self::InvalidLogicalId(name) => write!(f, "Invalid logical resource name: {}", name),
            Self::NotAListProperty(resource_type, field) => {
                write!(f, "Property {} of {} is not a list", field, resource_type)
            }
            Self::UndeclaredProperty(resource_type, field) => {
                write!(f, "Undeclared property {} for {}", field, resource_type)
            }
        }
    }
}

impl Error for CumulusError {}

#![warn(clippy::all)]
pub(crate) mod condition;
pub(crate) mod document;
pub(crate) mod error;
pub(crate) mod instance_profile;
pub(crate) mod policy_resource;
pub(crate) mod property;
pub(crate) mod resource;
pub(crate) mod role;
pub(crate) mod statement;
pub(crate) mod template;
pub(crate) mod value;

#[macro_use]
pub(crate) mod serutil;

pub use {
    condition::{Condition, ConditionMap, ConditionOp},
    document::{PolicyDocument, PolicyVersion},
    error::CumulusError,
    instance_profile::InstanceProfile,
    policy_resource::IamPolicy,
    property::{PropertyDescriptor, PropertyKind, PropertySchema, PropertyStore},
    role::Role,
    statement::{Effect, Principal, SpecifiedPrincipal, Statement, StatementBuilder, StatementBuilderError},
    template::{Template, TemplateResource},
    value::{get_att, Value, ValueList},
};

use {
    crate::{display_json, statement::StatementBuilder, Effect, Statement},
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
    std::{
        collections::BTreeSet,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Policy language versions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PolicyVersion {
    V2008_10_17,
    V2012_10_17,
}

impl Default for PolicyVersion {
    fn default() -> Self {
        Self::V2012_10_17
    }
}

impl Display for PolicyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::V2008_10_17 => f.write_str("2008-10-17"),
            Self::V2012_10_17 => f.write_str("2012-10-17"),
        }
    }
}

impl Serialize for PolicyVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// A named, ordered collection of statements.
///
/// The name is not part of the rendered body; it surfaces as `PolicyName`
/// where the enclosing resource needs one. Statement order is insertion
/// order and is preserved in the output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyDocument {
    name: String,
    version: PolicyVersion,
    statements: Vec<Statement>,
    requires_resource: bool,
}

impl PolicyDocument {
    /// An identity policy document. The target format requires every
    /// statement to carry a Resource, so a statement built without one gets
    /// the wildcard.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: PolicyVersion::default(),
            statements: Vec::new(),
            requires_resource: true,
        }
    }

    /// A trust policy document. Statements render without a Resource key
    /// unless one is set explicitly.
    pub fn trust(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: PolicyVersion::default(),
            statements: Vec::new(),
            requires_resource: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn version(&self) -> PolicyVersion {
        self.version
    }

    pub fn set_version(&mut self, version: PolicyVersion) -> &mut Self {
        self.version = version;
        self
    }

    #[inline]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Append one Allow statement, configured by the closure.
    pub fn allow<F: FnOnce(&mut StatementBuilder)>(&mut self, configure: F) -> &mut Self {
        self.append(Effect::Allow, configure)
    }

    /// Append one Deny statement, configured by the closure.
    pub fn deny<F: FnOnce(&mut StatementBuilder)>(&mut self, configure: F) -> &mut Self {
        self.append(Effect::Deny, configure)
    }

    fn append<F: FnOnce(&mut StatementBuilder)>(&mut self, effect: Effect, configure: F) -> &mut Self {
        let mut builder = Statement::builder();
        builder.effect(effect);
        configure(&mut builder);
        if self.requires_resource && !builder.has_resource() {
            builder.resource("*");
        }
        match builder.build() {
            Ok(statement) => self.statements.push(statement),
            // effect is set above and every other field has a default
            Err(_) => unreachable!("statement builder cannot fail"),
        }
        self
    }

    pub(crate) fn referenced_names(&self, names: &mut BTreeSet<String>) {
        for statement in &self.statements {
            statement.referenced_names(names);
        }
    }
}

impl Serialize for PolicyDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("Version", &self.version)?;
        map.serialize_entry("Statement", &self.statements)?;
        map.end()
    }
}

display_json!(PolicyDocument);

#[cfg(test)]
mod tests {
    use {
        crate::{Effect, PolicyDocument, PolicyVersion},
        indoc::indoc,
        pretty_assertions::assert_eq,
    };

    #[test_log::test]
    fn test_empty_document() {
        let document = PolicyDocument::new("empty");
        assert_eq!(document.name(), "empty");
        assert!(document.statements().is_empty());
        assert_eq!(
            document.to_string(),
            indoc! { r#"
            {
                "Version": "2012-10-17",
                "Statement": []
            }"# }
        );
    }

    #[test_log::test]
    fn test_wildcard_resource_default() {
        let mut document = PolicyDocument::new("reader");
        document.allow(|statement| {
            statement.action("s3:GetObject");
        });
        assert_eq!(
            document.to_string(),
            indoc! { r#"
            {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Action": "s3:GetObject",
                        "Resource": "*"
                    }
                ]
            }"# }
        );
    }

    #[test_log::test]
    fn test_trust_document_has_no_resource() {
        let mut document = PolicyDocument::trust("trust-ec2-instances");
        document.allow(|statement| {
            statement.action("sts:AssumeRole").principal_service("ec2.amazonaws.com");
        });
        assert!(document.statements()[0].resource().is_none());
        assert_eq!(
            document.to_string(),
            indoc! { r#"
            {
                "Version": "2012-10-17",
                "Statement": [
                    {
                        "Effect": "Allow",
                        "Action": "sts:AssumeRole",
                        "Principal": {
                            "Service": "ec2.amazonaws.com"
                        }
                    }
                ]
            }"# }
        );
    }

    #[test_log::test]
    fn test_statement_order() {
        let mut document = PolicyDocument::new("mixed");
        document
            .allow(|statement| {
                statement.action("s3:GetObject");
            })
            .deny(|statement| {
                statement.action("s3:DeleteObject");
            })
            .allow(|statement| {
                statement.action("s3:ListBucket");
            });

        let effects: Vec<&Effect> = document.statements().iter().map(|s| s.effect()).collect();
        assert_eq!(effects, vec![&Effect::Allow, &Effect::Deny, &Effect::Allow]);
    }

    #[test_log::test]
    fn test_version() {
        assert_eq!(PolicyVersion::default(), PolicyVersion::V2012_10_17);
        assert_eq!(format!("{}", PolicyVersion::V2008_10_17), "2008-10-17");
        assert_eq!(format!("{}", PolicyVersion::V2012_10_17), "2012-10-17");

        let mut document = PolicyDocument::new("old");
        document.set_version(PolicyVersion::V2008_10_17);
        assert_eq!(document.version(), PolicyVersion::V2008_10_17);
        assert!(document.to_string().contains(r#""Version": "2008-10-17""#));
    }
}

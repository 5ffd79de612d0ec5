//! Declaration registry: kinds, rules and the dependencies they declare.
//!
//! A host engine marks dependencies with metadata on types. This module is
//! the stand-alone equivalent and the default [`DependencySource`] for
//! [`KindName`] items:
//!
//! - **Kinds** form a single-inheritance hierarchy; each kind names at most
//!   one base kind, which must already be defined.
//! - **Rules** are named declaration mechanisms. Each rule restricts the kinds
//!   it may reference to those deriving from its allowed base.
//!   [`REQUIRE_COMPONENT`] is the built-in rule for components.
//! - **Declarations** attach one to three references to a kind under a rule.
//!   References may be `None`; they are kept and dropped at extraction time.
//!
//! Every malformed definition fails with [`DepError::Configuration`] as soon as
//! it is made. Extraction never fails.
//!
//! Declarations are inherited: a kind depends on everything its base kinds
//! declare.
//!
//! # Examples
//!
//! ```rust,no_run
//! use deporder::core::KindName;
//! use deporder::declaration::DeclarationRegistry;
//! use deporder::resolver::extract_dependencies;
//!
//! let mut registry = DeclarationRegistry::with_builtin_rules();
//! registry.define_kind("Transform", Some("Component"))?;
//! registry.define_kind("Rigidbody", Some("Component"))?;
//! registry.require("Rigidbody", ["Transform"])?;
//!
//! let deps = extract_dependencies(&registry, &KindName::from("Rigidbody"));
//! assert!(deps.contains(&KindName::from("Transform")));
//! # Ok::<(), deporder::core::DepError>(())
//! ```

use std::collections::HashMap;

use crate::core::{DepError, KindName};
use crate::resolver::DependencySource;

/// Root kind of every component.
pub const COMPONENT: &str = "Component";

/// Built-in rule whose references must be components.
pub const REQUIRE_COMPONENT: &str = "RequireComponent";

/// Maximum number of references a single declaration may carry.
pub const MAX_REFERENCES: usize = 3;

#[derive(Debug, Clone)]
struct Declaration {
    rule: String,
    references: Vec<Option<KindName>>,
}

/// Registry of kinds, rules and declarations.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    /// kind -> base kind
    bases: HashMap<KindName, Option<KindName>>,
    /// Definition order, for deterministic listings.
    order: Vec<KindName>,
    /// rule -> allowed base kind
    rules: HashMap<String, KindName>,
    declarations: HashMap<KindName, Vec<Declaration>>,
}

impl DeclarationRegistry {
    /// An empty registry with no kinds and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the [`COMPONENT`] kind and the [`REQUIRE_COMPONENT`] rule.
    #[must_use]
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        let component = KindName::from(COMPONENT);
        registry.bases.insert(component.clone(), None);
        registry.order.push(component.clone());
        registry.rules.insert(REQUIRE_COMPONENT.to_string(), component);
        registry
    }

    /// Define a kind, optionally deriving from an already defined base.
    ///
    /// # Errors
    ///
    /// [`DepError::Configuration`] if the kind exists or the base is unknown.
    pub fn define_kind(
        &mut self,
        name: impl Into<KindName>,
        base: Option<impl Into<KindName>>,
    ) -> Result<(), DepError> {
        let name = name.into();
        let base = base.map(Into::into);

        if self.bases.contains_key(&name) {
            return Err(DepError::configuration(format!("kind '{name}' is already defined")));
        }
        if let Some(base) = &base
            && !self.bases.contains_key(base)
        {
            return Err(DepError::configuration(format!(
                "kind '{name}' derives from undefined kind '{base}'"
            )));
        }

        tracing::trace!("Defined kind '{}' (base: {:?})", name, base.as_ref().map(KindName::as_str));
        self.order.push(name.clone());
        self.bases.insert(name, base);
        Ok(())
    }

    /// Define a rule that may only reference kinds deriving from `allowed_base`.
    ///
    /// # Errors
    ///
    /// [`DepError::Configuration`] if the rule exists or the base is unknown.
    pub fn define_rule(
        &mut self,
        rule: impl Into<String>,
        allowed_base: impl Into<KindName>,
    ) -> Result<(), DepError> {
        let rule = rule.into();
        let allowed_base = allowed_base.into();

        if self.rules.contains_key(&rule) {
            return Err(DepError::configuration(format!("rule '{rule}' is already defined")));
        }
        if !self.bases.contains_key(&allowed_base) {
            return Err(DepError::configuration(format!(
                "rule '{rule}' is restricted to undefined kind '{allowed_base}'"
            )));
        }

        self.rules.insert(rule, allowed_base);
        Ok(())
    }

    /// Declare that `kind` depends on `references` under `rule`.
    ///
    /// # Errors
    ///
    /// [`DepError::Configuration`] if the kind or rule is unknown, if the
    /// declaration carries no reference or more than [`MAX_REFERENCES`], or if
    /// a reference is not a kind deriving from the rule's allowed base.
    pub fn declare<I, R>(&mut self, kind: impl Into<KindName>, rule: &str, references: I) -> Result<(), DepError>
    where
        I: IntoIterator<Item = Option<R>>,
        R: Into<KindName>,
    {
        let kind = kind.into();
        let references: Vec<Option<KindName>> =
            references.into_iter().map(|r| r.map(Into::into)).collect();

        if !self.bases.contains_key(&kind) {
            return Err(DepError::configuration(format!(
                "cannot declare dependencies on undefined kind '{kind}'"
            )));
        }
        let Some(allowed_base) = self.rules.get(rule) else {
            return Err(DepError::configuration(format!("unknown rule '{rule}' on '{kind}'")));
        };
        if references.is_empty() || references.len() > MAX_REFERENCES {
            return Err(DepError::configuration(format!(
                "'{rule}' on '{kind}' must name between 1 and {MAX_REFERENCES} kinds, got {}",
                references.len()
            )));
        }

        for reference in references.iter().flatten() {
            if !self.bases.contains_key(reference) {
                return Err(DepError::configuration(format!(
                    "'{rule}' on '{kind}' references undefined kind '{reference}'"
                )));
            }
            if !self.is_subkind_of(reference, allowed_base) {
                return Err(DepError::configuration(format!(
                    "'{rule}' on '{kind}' references '{reference}', which does not derive from '{allowed_base}'"
                )));
            }
        }

        self.declarations.entry(kind).or_default().push(Declaration {
            rule: rule.to_string(),
            references,
        });
        Ok(())
    }

    /// Shorthand for [`declare`](Self::declare) under [`REQUIRE_COMPONENT`].
    ///
    /// # Errors
    ///
    /// As [`declare`](Self::declare).
    pub fn require<I, R>(&mut self, kind: impl Into<KindName>, references: I) -> Result<(), DepError>
    where
        I: IntoIterator<Item = R>,
        R: Into<KindName>,
    {
        self.declare(kind, REQUIRE_COMPONENT, references.into_iter().map(Some))
    }

    /// Whether `kind` is `base` or derives from it.
    pub fn is_subkind_of(&self, kind: &KindName, base: &KindName) -> bool {
        let mut current = Some(kind);
        while let Some(k) = current {
            if k == base {
                return true;
            }
            current = self.bases.get(k).and_then(Option::as_ref);
        }
        false
    }

    /// Whether `kind` has been defined.
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.bases.contains_key(kind)
    }

    /// Whether `rule` has been defined.
    pub fn contains_rule(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    /// The direct base of `kind`, if any.
    pub fn base_of(&self, kind: &KindName) -> Option<&KindName> {
        self.bases.get(kind).and_then(Option::as_ref)
    }

    /// Defined kinds, in definition order.
    pub fn kinds(&self) -> impl Iterator<Item = &KindName> {
        self.order.iter()
    }

    /// Raw references declared on `kind` and its bases, most-derived first.
    fn collect(&self, kind: &KindName, rule: Option<&str>) -> Vec<Option<KindName>> {
        let mut references = Vec::new();
        let mut current = Some(kind);
        while let Some(k) = current {
            for declaration in self.declarations.get(k).into_iter().flatten() {
                if rule.is_none_or(|r| r == declaration.rule) {
                    references.extend(declaration.references.iter().cloned());
                }
            }
            current = self.base_of(k);
        }
        references
    }

    /// A view that only reports declarations made under `rule`.
    ///
    /// # Errors
    ///
    /// [`DepError::Configuration`] if `rule` is unknown.
    pub fn rule_view<'r>(&'r self, rule: &'r str) -> Result<RuleView<'r>, DepError> {
        if self.contains_rule(rule) {
            Ok(RuleView {
                registry: self,
                rule,
            })
        } else {
            Err(DepError::configuration(format!("unknown rule '{rule}'")))
        }
    }
}

impl DependencySource<KindName> for DeclarationRegistry {
    fn declared(&self, kind: &KindName) -> Vec<Option<KindName>> {
        self.collect(kind, None)
    }
}

/// Declarations of a single rule. See [`DeclarationRegistry::rule_view`].
#[derive(Debug, Clone, Copy)]
pub struct RuleView<'r> {
    registry: &'r DeclarationRegistry,
    rule: &'r str,
}

impl DependencySource<KindName> for RuleView<'_> {
    fn declared(&self, kind: &KindName) -> Vec<Option<KindName>> {
        self.registry.collect(kind, Some(self.rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::resolver::{extract_dependencies, resolve_order};

    fn components() -> DeclarationRegistry {
        let mut registry = DeclarationRegistry::with_builtin_rules();
        for kind in ["Transform", "Rigidbody", "Collider"] {
            registry.define_kind(kind, Some(COMPONENT)).unwrap();
        }
        registry
    }

    fn names(deps: &[Option<KindName>]) -> Vec<Option<&str>> {
        deps.iter().map(|d| d.as_ref().map(KindName::as_str)).collect()
    }

    #[test]
    fn test_builtin_rule() {
        let mut registry = components();
        registry.require("Rigidbody", ["Transform"]).unwrap();
        registry.require("Collider", ["Rigidbody", "Transform"]).unwrap();

        let deps = extract_dependencies(&registry, &KindName::from("Collider"));
        assert_eq!(deps.iter().map(KindName::as_str).collect::<Vec<_>>(), ["Rigidbody", "Transform"]);
    }

    #[test]
    fn test_define_kind_errors() {
        let mut registry = components();
        let err = registry.define_kind("Transform", Some(COMPONENT)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = registry.define_kind("Mesh", Some("Renderer")).unwrap_err();
        assert!(err.to_string().contains("undefined kind 'Renderer'"));

        registry.define_kind("Asset", None::<&str>).unwrap();
        assert!(registry.contains_kind("Asset"));
    }

    #[test]
    fn test_declaration_outside_allowed_base_fails() {
        let mut registry = components();
        registry.define_kind("Asset", None::<&str>).unwrap();
        registry.define_kind("Texture", Some("Asset")).unwrap();

        let err = registry.require("Rigidbody", ["Texture"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("does not derive from 'Component'"));
    }

    #[test]
    fn test_declaration_reference_count() {
        let mut registry = components();
        registry.define_kind("Extra", Some(COMPONENT)).unwrap();

        let err = registry
            .require("Rigidbody", ["Transform", "Collider", "Extra", "Transform"])
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 3"));

        let err = registry.require("Rigidbody", Vec::<&str>::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_rule_and_kind() {
        let mut registry = components();
        let err = registry.declare("Rigidbody", "Missing", [Some("Transform")]).unwrap_err();
        assert!(err.to_string().contains("unknown rule 'Missing'"));

        let err = registry.require("Ghost", ["Transform"]).unwrap_err();
        assert!(err.to_string().contains("undefined kind 'Ghost'"));

        let err = registry.require("Rigidbody", ["Ghost"]).unwrap_err();
        assert!(err.to_string().contains("references undefined kind 'Ghost'"));
    }

    #[test]
    fn test_absent_references_are_kept_until_extraction() {
        let mut registry = components();
        registry
            .declare("Collider", REQUIRE_COMPONENT, [Some("Rigidbody"), None, Some("Rigidbody")])
            .unwrap();

        let raw = registry.declared(&KindName::from("Collider"));
        assert_eq!(names(&raw), [Some("Rigidbody"), None, Some("Rigidbody")]);

        let deps = extract_dependencies(&registry, &KindName::from("Collider"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_user_defined_rule_and_view() {
        let mut registry = components();
        registry.define_kind("Asset", None::<&str>).unwrap();
        registry.define_kind("Texture", Some("Asset")).unwrap();
        registry.define_kind("Material", Some("Asset")).unwrap();
        registry.define_rule("AssetDependency", "Asset").unwrap();

        registry.declare("Material", "AssetDependency", [Some("Texture")]).unwrap();
        registry.require("Collider", ["Transform"]).unwrap();

        let err = registry.define_rule("AssetDependency", "Asset").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let view = registry.rule_view("AssetDependency").unwrap();
        assert_eq!(extract_dependencies(&view, &KindName::from("Material")).len(), 1);
        assert!(extract_dependencies(&view, &KindName::from("Collider")).is_empty());
        assert!(registry.rule_view("Nope").is_err());
    }

    #[test]
    fn test_declarations_are_inherited() {
        let mut registry = components();
        registry.define_kind("Body", Some(COMPONENT)).unwrap();
        registry.define_kind("KinematicBody", Some("Body")).unwrap();
        registry.require("Body", ["Transform"]).unwrap();
        registry.require("KinematicBody", ["Collider"]).unwrap();

        let deps = extract_dependencies(&registry, &KindName::from("KinematicBody"));
        assert_eq!(deps.iter().map(KindName::as_str).collect::<Vec<_>>(), ["Collider", "Transform"]);
        assert!(registry.is_subkind_of(&KindName::from("KinematicBody"), &KindName::from(COMPONENT)));
        assert!(!registry.is_subkind_of(&KindName::from("Body"), &KindName::from("KinematicBody")));
    }

    #[test]
    fn test_registry_drives_resolution() {
        let mut registry = components();
        registry.require("Rigidbody", ["Transform"]).unwrap();
        registry.require("Collider", ["Rigidbody"]).unwrap();

        let items: Vec<KindName> =
            ["Collider", "Rigidbody", "Transform"].into_iter().map(KindName::from).collect();
        let ordered = resolve_order(&items, &registry, true).unwrap();
        let ordered: Vec<&str> = ordered.iter().map(|k| k.as_str()).collect();
        assert_eq!(ordered, ["Transform", "Rigidbody", "Collider"]);
    }

    #[test]
    fn test_kinds_in_definition_order() {
        let registry = components();
        let kinds: Vec<&str> = registry.kinds().map(KindName::as_str).collect();
        assert_eq!(kinds, [COMPONENT, "Transform", "Rigidbody", "Collider"]);
    }
}

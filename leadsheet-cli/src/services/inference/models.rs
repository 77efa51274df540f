use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::predicates::{CellKind, Classifier};

/// Semantic meaning a column can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Name,
    Email,
    Phone,
    Product,
    Date,
    Reach,
    Engagement,
    Followers,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Email => "email",
            Role::Phone => "phone",
            Role::Product => "product",
            Role::Date => "date",
            Role::Reach => "reach",
            Role::Engagement => "engagement",
            Role::Followers => "followers",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which step of the resolution chain produced a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMethod {
    /// Primary header keyword
    Header,
    /// Content score over sampled rows
    Content,
    /// Ambiguous header keyword, only after content failed
    SecondaryHeader,
    /// Column 0 for the profile's primary role
    Positional,
}

impl BindingMethod {
    /// Display label for the inspect output
    pub fn label(&self) -> &'static str {
        match self {
            BindingMethod::Header => "[Header]",
            BindingMethod::Content => "[Content]",
            BindingMethod::SecondaryHeader => "[Secondary]",
            BindingMethod::Positional => "[Positional]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnBinding {
    pub column: usize,
    pub method: BindingMethod,
}

/// Role → column assignment for one resolution pass
///
/// Kept in resolution order. No two roles share a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoleMap {
    bindings: Vec<(Role, Option<ColumnBinding>)>,
}

impl ColumnRoleMap {
    pub(crate) fn insert(&mut self, role: Role, binding: Option<ColumnBinding>) {
        match self.bindings.iter_mut().find(|(existing, _)| *existing == role) {
            Some(entry) => entry.1 = binding,
            None => self.bindings.push((role, binding)),
        }
    }

    /// Column bound to a role, `None` when unresolved
    pub fn get(&self, role: Role) -> Option<usize> {
        self.binding(role).map(|binding| binding.column)
    }

    pub fn binding(&self, role: Role) -> Option<&ColumnBinding> {
        self.bindings
            .iter()
            .find(|(existing, _)| *existing == role)
            .and_then(|(_, binding)| binding.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<&ColumnBinding>)> {
        self.bindings.iter().map(|(role, binding)| (*role, binding.as_ref()))
    }

    pub fn resolved_count(&self) -> usize {
        self.bindings.iter().filter(|(_, binding)| binding.is_some()).count()
    }
}

/// How a single role is looked up
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub role: Role,
    /// Header substrings tried first
    pub keywords: Vec<String>,
    /// Ambiguous header substrings, tried only after content scoring failed
    pub secondary_keywords: Vec<String>,
    /// Whole header words that disqualify a header for this role
    pub excluded_tokens: Vec<String>,
    /// Content classifier used for scoring, if any
    pub content: Option<CellKind>,
}

impl RoleSpec {
    fn new(role: Role, keywords: &[&str], content: Option<CellKind>) -> Self {
        Self {
            role,
            keywords: lowercase_all(keywords),
            secondary_keywords: Vec::new(),
            excluded_tokens: Vec::new(),
            content,
        }
    }

    fn secondary(mut self, keywords: &[&str]) -> Self {
        self.secondary_keywords = lowercase_all(keywords);
        self
    }

    fn excluding(mut self, tokens: &[&str]) -> Self {
        self.excluded_tokens = lowercase_all(tokens);
        self
    }

    fn apply(&mut self, overrides: &RoleOverride) {
        if let Some(keywords) = &overrides.keywords {
            self.keywords = lowercase_owned(keywords);
        }
        if let Some(keywords) = &overrides.secondary_keywords {
            self.secondary_keywords = lowercase_owned(keywords);
        }
        if let Some(tokens) = &overrides.excluded_tokens {
            self.excluded_tokens = lowercase_owned(tokens);
        }
    }
}

/// Per-role keyword overrides read from the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleOverride {
    pub keywords: Option<Vec<String>>,
    pub secondary_keywords: Option<Vec<String>>,
    pub excluded_tokens: Option<Vec<String>>,
}

/// The roles one consumer needs, in resolution order
///
/// Order matters: a column claimed by an earlier role is invisible to every
/// later one, and only `primary` may fall back to column 0.
#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub name: &'static str,
    pub roles: Vec<RoleSpec>,
    pub primary: Option<Role>,
    pub sample_size: usize,
    pub classifier: Classifier,
}

/// Default number of data rows sampled for content scoring
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

// Advertising-platform fields that carry "name" or "number" in their header
const AD_PLATFORM_TOKENS: &[&str] = &["campaign", "ad", "adset", "form", "platform"];

impl RoleProfile {
    /// Lead ingestion: email and phone go first, name last
    pub fn leads() -> Self {
        let mut name_excluded = AD_PLATFORM_TOKENS.to_vec();
        name_excluded.extend(["user", "product", "company", "file"]);

        let mut phone_excluded = AD_PLATFORM_TOKENS.to_vec();
        phone_excluded.extend(["id", "order", "invoice"]);

        Self {
            name: "leads",
            roles: vec![
                RoleSpec::new(
                    Role::Email,
                    &["email", "e-mail", "mail", "correo"],
                    Some(CellKind::Email),
                ),
                RoleSpec::new(
                    Role::Phone,
                    &["phone", "telefono", "teléfono", "mobile", "movil", "móvil"],
                    Some(CellKind::Phone),
                )
                .secondary(&[
                    "number", "numero", "número", "contact", "contacto", "cel", "celular", "tel",
                    "whatsapp",
                ])
                .excluding(&phone_excluded),
                RoleSpec::new(
                    Role::Product,
                    &[
                        "product",
                        "producto",
                        "service",
                        "servicio",
                        "interest",
                        "interes",
                        "interés",
                        "category",
                        "categoria",
                        "categoría",
                    ],
                    Some(CellKind::Product),
                )
                .secondary(&["plan", "package", "paquete", "course", "curso"])
                .excluding(AD_PLATFORM_TOKENS),
                RoleSpec::new(Role::Name, &["name", "nombre"], Some(CellKind::PersonName))
                    .secondary(&["client", "cliente", "customer", "person", "persona"])
                    .excluding(&name_excluded),
            ],
            primary: Some(Role::Name),
            sample_size: DEFAULT_SAMPLE_SIZE,
            classifier: Classifier::default(),
        }
    }

    /// Metrics ingestion: the date column anchors the row and is the primary role
    pub fn metrics() -> Self {
        const RATE_TOKENS: &[&str] = &["rate", "tasa", "ratio", "pct", "percent"];

        Self {
            name: "metrics",
            roles: vec![
                RoleSpec::new(
                    Role::Date,
                    &["date", "fecha", "day", "dia", "día", "period", "periodo"],
                    Some(CellKind::Date),
                )
                .secondary(&["week", "semana", "month", "mes"]),
                RoleSpec::new(Role::Reach, &["reach", "alcance"], Some(CellKind::Number))
                    .secondary(&["impressions", "impresiones", "views", "vistas"])
                    .excluding(RATE_TOKENS),
                RoleSpec::new(
                    Role::Engagement,
                    &[
                        "engagement",
                        "interacciones",
                        "interactions",
                        "interaccion",
                        "interacción",
                    ],
                    Some(CellKind::Number),
                )
                .secondary(&["likes", "reactions", "reacciones"])
                .excluding(RATE_TOKENS),
                RoleSpec::new(
                    Role::Followers,
                    &["followers", "seguidores", "fans"],
                    Some(CellKind::Number),
                )
                .secondary(&["audience", "audiencia", "subscribers", "suscriptores"])
                .excluding(RATE_TOKENS),
            ],
            primary: Some(Role::Date),
            sample_size: DEFAULT_SAMPLE_SIZE,
            classifier: Classifier::default(),
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace keyword sets of the roles named in `overrides`
    ///
    /// Roles that are not part of this profile are ignored.
    pub fn with_overrides(mut self, overrides: &HashMap<Role, RoleOverride>) -> Self {
        for spec in &mut self.roles {
            if let Some(role_override) = overrides.get(&spec.role) {
                spec.apply(role_override);
            }
        }
        self
    }

    pub fn spec(&self, role: Role) -> Option<&RoleSpec> {
        self.roles.iter().find(|spec| spec.role == role)
    }

    pub fn role_names(&self) -> Vec<&'static str> {
        self.roles.iter().map(|spec| spec.role.as_str()).collect()
    }
}

fn lowercase_all(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

fn lowercase_owned(values: &[String]) -> Vec<String> {
    values.iter().map(|value| value.to_lowercase()).collect()
}

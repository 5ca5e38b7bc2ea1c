use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::{ConfigError, DomainError};
use super::types::{Action, Proposition, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Action,
    Issue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanContent {
    Question(Question),
    Proposition(Proposition),
    Short(String),
}

/// A static task plan. Issue plans resolve a question, action plans realize a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub kind: PlanKind,
    #[serde(default)]
    pub content: Option<PlanContent>,
    #[serde(alias = "plan")]
    pub steps: Vec<Action>,
}

impl PlanInfo {
    pub fn issue(question: Question, steps: Vec<Action>) -> Self {
        Self {
            kind: PlanKind::Issue,
            content: Some(PlanContent::Question(question)),
            steps,
        }
    }

    pub fn action(name: impl Into<String>, steps: Vec<Action>) -> Self {
        Self {
            kind: PlanKind::Action,
            content: Some(PlanContent::Short(name.into())),
            steps,
        }
    }

    fn questions(&self) -> impl Iterator<Item = &Question> {
        let content = match &self.content {
            Some(PlanContent::Question(q)) => Some(q),
            _ => None,
        };
        content.into_iter().chain(self.steps.iter().filter_map(Action::question))
    }
}

/// Values a predicate accepts, plus the hint given when an answer falls outside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFormat {
    /// Stored lowercase; matching is case-insensitive.
    #[serde(deserialize_with = "lowercase_set")]
    pub allowed: BTreeSet<String>,
    pub hint: String,
}

impl AnswerFormat {
    pub fn new<I, S>(allowed: I, hint: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(|s| Into::<String>::into(s).to_lowercase()).collect(),
            hint: hint.into(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.allowed.contains(&value.to_lowercase())
    }
}

fn lowercase_set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
    let values = Vec::<String>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|s| s.to_lowercase()).collect())
}

/// Serialized form of a domain. Goes through the same validation as the builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainConfig {
    pub predicates: BTreeMap<String, String>,
    pub individuals: BTreeMap<String, String>,
    #[serde(default)]
    pub plans: Vec<PlanInfo>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub formats: BTreeMap<String, AnswerFormat>,
}

/// Sorts, plan library and grounding tables for one task domain.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    predicates: BTreeMap<String, String>,
    individuals: BTreeMap<String, String>,
    plans: Vec<PlanInfo>,
    defaults: BTreeMap<String, String>,
    formats: BTreeMap<String, AnswerFormat>,
}

impl Domain {
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    pub fn from_config(config: DomainConfig) -> Result<Self, DomainError> {
        let mut builder = DomainBuilder::default();
        builder.predicates.extend(config.predicates);
        builder.individuals.extend(config.individuals);
        builder.plans = config.plans;
        builder.defaults = config.defaults;
        builder.formats = config.formats;
        builder.build()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DomainConfig = serde_json::from_str(json)?;
        Ok(Self::from_config(config)?)
    }

    pub fn predicate_sort(&self, predicate: &str) -> Option<&str> {
        self.predicates.get(predicate).map(String::as_str)
    }

    pub fn individual_sort(&self, individual: &str) -> Option<&str> {
        self.individuals.get(individual).map(String::as_str)
    }

    pub fn plans(&self) -> &[PlanInfo] {
        &self.plans
    }

    /// First issue plan whose content is structurally equal to `question`.
    pub fn issue_plan(&self, question: &Question) -> Option<&PlanInfo> {
        self.plans.iter().find(|p| {
            p.kind == PlanKind::Issue && matches!(&p.content, Some(PlanContent::Question(q)) if q == question)
        })
    }

    /// First action plan whose content names `action`.
    pub fn action_plan(&self, action: &str) -> Option<&PlanInfo> {
        self.plans.iter().find(|p| {
            p.kind == PlanKind::Action && matches!(&p.content, Some(PlanContent::Short(s)) if s == action)
        })
    }

    /// Fallback fact used when the user stays silent on `predicate`.
    pub fn default_answer(&self, predicate: &str) -> Option<Proposition> {
        self.defaults
            .get(predicate)
            .map(|individual| Proposition::new(predicate, individual.clone()))
    }

    pub fn format(&self, predicate: &str) -> Option<&AnswerFormat> {
        self.formats.get(predicate)
    }

    /// Format check. Predicates without a declared format accept anything.
    pub fn accepts(&self, proposition: &Proposition) -> bool {
        self.format(&proposition.predicate)
            .map_or(true, |f| f.accepts(&proposition.argument))
    }
}

#[derive(Debug, Default)]
pub struct DomainBuilder {
    predicates: Vec<(String, String)>,
    individuals: Vec<(String, String)>,
    plans: Vec<PlanInfo>,
    defaults: BTreeMap<String, String>,
    formats: BTreeMap<String, AnswerFormat>,
}

impl DomainBuilder {
    pub fn predicate(mut self, name: impl Into<String>, sort: impl Into<String>) -> Self {
        self.predicates.push((name.into(), sort.into()));
        self
    }

    pub fn individual(mut self, name: impl Into<String>, sort: impl Into<String>) -> Self {
        self.individuals.push((name.into(), sort.into()));
        self
    }

    pub fn plan(mut self, plan: PlanInfo) -> Self {
        self.plans.push(plan);
        self
    }

    pub fn default_answer(mut self, predicate: impl Into<String>, individual: impl Into<String>) -> Self {
        self.defaults.insert(predicate.into(), individual.into());
        self
    }

    pub fn format(mut self, predicate: impl Into<String>, format: AnswerFormat) -> Self {
        self.formats.insert(predicate.into(), format);
        self
    }

    pub fn build(self) -> Result<Domain, DomainError> {
        let predicates = sort_table(self.predicates)?;
        let individuals = sort_table(self.individuals)?;

        for (index, plan) in self.plans.iter().enumerate() {
            if plan.steps.iter().any(|s| matches!(s, Action::Respond(_))) {
                return Err(DomainError::RespondInPlan { plan: index });
            }
            if plan.kind == PlanKind::Issue && !matches!(plan.content, Some(PlanContent::Question(_))) {
                return Err(DomainError::IssueWithoutQuestion { plan: index });
            }
            if let Some(q) = plan.questions().find(|q| !predicates.contains_key(&q.predicate)) {
                return Err(DomainError::UnknownPredicate {
                    plan: index,
                    predicate: q.predicate.clone(),
                });
            }
        }

        for (predicate, individual) in &self.defaults {
            let expected = predicates.get(predicate).ok_or_else(|| DomainError::UnknownTablePredicate {
                context: "default answer",
                predicate: predicate.clone(),
            })?;
            let found = individuals.get(individual).ok_or_else(|| DomainError::UnknownIndividual {
                predicate: predicate.clone(),
                individual: individual.clone(),
            })?;
            if found != expected {
                return Err(DomainError::SortMismatch {
                    predicate: predicate.clone(),
                    individual: individual.clone(),
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        if let Some(predicate) = self.formats.keys().find(|p| !predicates.contains_key(*p)) {
            return Err(DomainError::UnknownTablePredicate {
                context: "answer format",
                predicate: predicate.clone(),
            });
        }

        Ok(Domain {
            predicates,
            individuals,
            plans: self.plans,
            defaults: self.defaults,
            formats: self.formats,
        })
    }
}

fn sort_table(entries: Vec<(String, String)>) -> Result<BTreeMap<String, String>, DomainError> {
    let mut table: BTreeMap<String, String> = BTreeMap::new();
    for (name, sort) in entries {
        if let Some(first) = table.get(&name) {
            if first != &sort {
                return Err(DomainError::ConflictingSort {
                    name,
                    first: first.clone(),
                    second: sort,
                });
            }
            continue;
        }
        table.insert(name, sort);
    }
    Ok(table)
}

//! Name-based mapping of catalog property and coefficient values onto the
//! parameter record.
//!
//! Matching is a best-effort heuristic driven by two ordered rule tables. For
//! each value the first rule whose recognizer matches the lower-cased name
//! decides the target field. Values are applied in catalog order, so a later
//! value for the same field overwrites an earlier one.

use crate::domain::{Material, ParameterField, ParameterRecord};
use tracing::debug;

/// Conjunction of keyword groups. A group matches when the name contains any
/// of its keywords; the clause matches when every group does.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClause(pub &'static [&'static [&'static str]]);

impl KeywordClause {
    fn matches(&self, lowered: &str) -> bool {
        self.0
            .iter()
            .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
    }
}

/// Recognizer (any clause) and the field it writes.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    pub target: ParameterField,
    pub clauses: &'static [KeywordClause],
}

impl MappingRule {
    pub fn matches(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.clauses.iter().any(|clause| clause.matches(&lowered))
    }
}

const WLF: &[&str] = &["wlf", "vlf", "влф"];

pub const PROPERTY_RULES: &[MappingRule] = &[
    MappingRule {
        target: ParameterField::Density,
        clauses: &[KeywordClause(&[&["density", "плотност"]])],
    },
    MappingRule {
        target: ParameterField::HeatCapacity,
        clauses: &[KeywordClause(&[&[
            "heat capacity",
            "specific heat",
            "теплоемкост",
            "теплоёмкост",
        ]])],
    },
    MappingRule {
        target: ParameterField::GlassTransitionTemp,
        clauses: &[KeywordClause(&[&["glass transition", "стеклован"]])],
    },
    MappingRule {
        target: ParameterField::MeltingTemp,
        clauses: &[KeywordClause(&[&["melting", "плавлен"]])],
    },
];

pub const COEFFICIENT_RULES: &[MappingRule] = &[
    MappingRule {
        target: ParameterField::Mu0,
        clauses: &[KeywordClause(&[&["consistency", "консистенц"]])],
    },
    MappingRule {
        target: ParameterField::FirstConstantVlf,
        clauses: &[
            KeywordClause(&[&["first", "перв"], WLF]),
            KeywordClause(&[&["c1", "с1"]]),
        ],
    },
    MappingRule {
        target: ParameterField::SecondConstantVlf,
        clauses: &[
            KeywordClause(&[&["second", "втор"], WLF]),
            KeywordClause(&[&["c2", "с2"]]),
        ],
    },
    MappingRule {
        target: ParameterField::FlowIndex,
        clauses: &[KeywordClause(&[&["flow", "течени"]])],
    },
    MappingRule {
        target: ParameterField::HeatTransfer,
        clauses: &[KeywordClause(&[&["heat transfer", "теплоотдач"]])],
    },
    MappingRule {
        target: ParameterField::CastingTemp,
        clauses: &[KeywordClause(&[&[
            "reference",
            "casting",
            "приведени",
            "литья",
        ]])],
    },
];

/// A single catalog value written onto the record.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedValue {
    pub field: ParameterField,
    pub source_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutcome {
    pub record: ParameterRecord,
    pub applied: Vec<AppliedValue>,
}

#[derive(Debug, Clone, Copy)]
pub struct MaterialParameterMapper {
    property_rules: &'static [MappingRule],
    coefficient_rules: &'static [MappingRule],
}

impl Default for MaterialParameterMapper {
    fn default() -> Self {
        Self::new(PROPERTY_RULES, COEFFICIENT_RULES)
    }
}

impl MaterialParameterMapper {
    pub const fn new(
        property_rules: &'static [MappingRule],
        coefficient_rules: &'static [MappingRule],
    ) -> Self {
        Self {
            property_rules,
            coefficient_rules,
        }
    }

    pub fn recognize_property(&self, name: &str) -> Option<ParameterField> {
        first_match(self.property_rules, name)
    }

    pub fn recognize_coefficient(&self, name: &str) -> Option<ParameterField> {
        first_match(self.coefficient_rules, name)
    }

    pub fn apply(&self, material: &Material, base: &ParameterRecord) -> ParameterRecord {
        self.apply_with_outcome(material, base).record
    }

    pub fn apply_with_outcome(&self, material: &Material, base: &ParameterRecord) -> MappingOutcome {
        let properties = material
            .property_values
            .iter()
            .map(|entry| (&entry.property.name, entry.value, self.recognize_property(&entry.property.name)));
        let coefficients = material.coefficient_values.iter().map(|entry| {
            (
                &entry.coefficient.name,
                entry.value,
                self.recognize_coefficient(&entry.coefficient.name),
            )
        });

        let mut record = *base;
        let mut applied = Vec::new();
        for (name, value, target) in properties.chain(coefficients) {
            let Some(field) = target else {
                debug!(material = %material.id, name = %name, "no parameter matches catalog name");
                continue;
            };
            debug!(material = %material.id, name = %name, field = %field, value, "mapped catalog value");
            record.set(field, value);
            applied.push(AppliedValue {
                field,
                source_name: name.clone(),
                value,
            });
        }

        MappingOutcome { record, applied }
    }
}

fn first_match(rules: &[MappingRule], name: &str) -> Option<ParameterField> {
    rules
        .iter()
        .find(|rule| rule.matches(name))
        .map(|rule| rule.target)
}

pub fn apply_material(material: &Material, base: &ParameterRecord) -> ParameterRecord {
    MaterialParameterMapper::default().apply(material, base)
}

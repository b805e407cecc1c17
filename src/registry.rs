//! Registration-time parsing of a declarative input spec into slot group definitions.

use crate::error::SpecError;
use crate::spec::{CompanionKind, InputSpec, NamingScheme};
use ahash::AHashMap;
use itertools::Itertools;
use regex::Regex;

/// Identifier of a dynamic slot group within one node type.
pub type GroupId = u32;

/// A parsed dynamic-input definition: one member column of a slot group.
#[derive(Debug, Clone)]
pub struct SlotDefinition {
    /// The name the input was declared under (e.g. `x0` or `a`).
    pub declared_name: String,
    /// The prefix shared by every row of this member; empty for the letter scheme.
    pub base_name: String,
    pub scheme: NamingScheme,
    pub group: GroupId,
    pub value_type: String,
    pub companion: Option<CompanionKind>,
    matcher: Regex,
}

impl SlotDefinition {
    /// Membership test: does a runtime slot name belong to this member column?
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// The dynamic slot groups declared by one node type.
///
/// Parsed once at registration time and shared by every node instance of that
/// type. Inputs without a naming-scheme marker are ignored entirely; if no
/// input carries one, the registry is inert and the host need not attach an
/// engine at all.
#[derive(Debug, Clone)]
pub struct SlotRegistry {
    definitions: Vec<SlotDefinition>,
    groups: AHashMap<GroupId, Vec<usize>>,
}

impl SlotRegistry {
    pub fn parse(spec: &InputSpec) -> Result<Self, SpecError> {
        let mut definitions: Vec<SlotDefinition> = Vec::new();
        let mut groups: AHashMap<GroupId, Vec<usize>> = AHashMap::new();

        for declaration in &spec.inputs {
            let Some(scheme) = declaration.options.dynamic_scheme else {
                continue;
            };

            let (base_name, pattern) = match scheme {
                NamingScheme::Numeric => {
                    let base = declaration
                        .name
                        .trim_end_matches(|c: char| c.is_ascii_digit());
                    (base.to_string(), format!("^{}\\d+$", regex::escape(base)))
                }
                NamingScheme::Letter => (String::new(), "^[a-zA-Z]$".to_string()),
            };

            if scheme == NamingScheme::Numeric {
                if let Some(previous) = definitions
                    .iter()
                    .find(|d| d.scheme == NamingScheme::Numeric && d.base_name == base_name)
                {
                    return Err(SpecError::DuplicateBaseName {
                        first: previous.declared_name.clone(),
                        second: declaration.name.clone(),
                        base: base_name,
                    });
                }
            }

            let matcher = Regex::new(&pattern).map_err(|e| SpecError::InvalidMatcher {
                name: declaration.name.clone(),
                reason: e.to_string(),
            })?;

            let group = declaration.options.dynamic_group;
            groups.entry(group).or_default().push(definitions.len());
            definitions.push(SlotDefinition {
                declared_name: declaration.name.clone(),
                base_name,
                scheme,
                group,
                value_type: declaration.value_type.clone(),
                companion: declaration.options.companion_value_kind.clone(),
                matcher,
            });
        }

        Self::validate_letter_groups(&definitions, &groups)?;

        Ok(Self {
            definitions,
            groups,
        })
    }

    /// The letter membership test ("is this a single letter") cannot tell two
    /// letter groups apart, nor two letter members within one row, so such
    /// specs are rejected up front instead of corrupting at runtime.
    fn validate_letter_groups(
        definitions: &[SlotDefinition],
        groups: &AHashMap<GroupId, Vec<usize>>,
    ) -> Result<(), SpecError> {
        let mut letter_group: Option<GroupId> = None;
        for definition in definitions {
            if definition.scheme != NamingScheme::Letter {
                continue;
            }
            match letter_group {
                None => letter_group = Some(definition.group),
                Some(first) if first != definition.group => {
                    return Err(SpecError::AmbiguousLetterGroups {
                        first_group: first,
                        second_group: definition.group,
                    });
                }
                _ => {}
            }
        }

        if let Some(group) = letter_group {
            let members = groups[&group]
                .iter()
                .filter(|&&i| definitions[i].scheme == NamingScheme::Letter)
                .count();
            if members > 1 {
                return Err(SpecError::MultiMemberLetterGroup { group, members });
            }
        }
        Ok(())
    }

    /// `true` when the node type declared no dynamic inputs and the whole
    /// mechanism is inert for it.
    pub fn is_inert(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn is_dynamic_name(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.matches(name))
    }

    pub fn definition_for_name(&self, name: &str) -> Option<&SlotDefinition> {
        self.definitions.iter().find(|d| d.matches(name))
    }

    pub fn group_for_name(&self, name: &str) -> Option<GroupId> {
        self.definition_for_name(name).map(|d| d.group)
    }

    /// Member definitions of a group, in declaration order.
    pub fn members(&self, group: GroupId) -> Vec<&SlotDefinition> {
        self.groups
            .get(&group)
            .map(|indices| indices.iter().map(|&i| &self.definitions[i]).collect())
            .unwrap_or_default()
    }

    /// All declared group ids, ascending.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.keys().copied().sorted_unstable().collect()
    }

    /// Every dynamic definition, in declaration order.
    pub fn definitions(&self) -> &[SlotDefinition] {
        &self.definitions
    }
}

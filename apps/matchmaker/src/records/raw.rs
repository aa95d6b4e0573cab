//! Raw input shapes of the three source exports.
//!
//! Each export is a JSON object keyed by identifier. The value shapes differ
//! per entity, so they are modelled as one tagged union and decoded once at
//! the normalizer boundary.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub type AttributeGroup = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Candidate,
    Job,
    ProspectGroup,
}

#[derive(Debug, Clone)]
pub enum RawRecord {
    Candidate(RawCandidate),
    Job(RawJob),
    ProspectGroup(RawProspectGroup),
}

impl RawRecord {
    pub fn decode(kind: RecordKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            RecordKind::Candidate => RawRecord::Candidate(serde_json::from_value(value)?),
            RecordKind::Job => RawRecord::Job(serde_json::from_value(value)?),
            RecordKind::ProspectGroup => RawRecord::ProspectGroup(serde_json::from_value(value)?),
        })
    }
}

/// One entry of `applicants.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidate {
    #[serde(default, deserialize_with = "lenient_group")]
    pub infos_basicas: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub informacoes_pessoais: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub informacoes_profissionais: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub formacao_e_idiomas: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub cargo_atual: AttributeGroup,
    #[serde(default)]
    pub cv_pt: Option<Value>,
}

impl RawCandidate {
    /// Groups in merge order. `cv_pt` is exposed as a single-key group.
    pub fn groups(&self) -> Vec<AttributeGroup> {
        let mut resume = AttributeGroup::new();
        resume.insert(
            "cv_pt".to_string(),
            self.cv_pt.clone().unwrap_or(Value::Null),
        );
        vec![
            self.infos_basicas.clone(),
            self.informacoes_pessoais.clone(),
            self.informacoes_profissionais.clone(),
            self.formacao_e_idiomas.clone(),
            self.cargo_atual.clone(),
            resume,
        ]
    }
}

/// One entry of `vagas.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(default, deserialize_with = "lenient_group")]
    pub informacoes_basicas: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub perfil_vaga: AttributeGroup,
    #[serde(default, deserialize_with = "lenient_group")]
    pub beneficios: AttributeGroup,
}

impl RawJob {
    pub fn groups(&self) -> [&AttributeGroup; 3] {
        [&self.informacoes_basicas, &self.perfil_vaga, &self.beneficios]
    }
}

/// One entry of `prospects.json`: every applicant of a job plus the job's
/// shared title and modality.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProspectGroup {
    #[serde(default)]
    pub titulo: Option<Value>,
    #[serde(default)]
    pub modalidade: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub prospects: Vec<AttributeGroup>,
}

/// Accepts an object; anything else (null, list, string) decodes as empty.
fn lenient_group<'de, D>(deserializer: D) -> Result<AttributeGroup, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => AttributeGroup::new(),
    })
}

/// Accepts a list and keeps only its object entries.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<AttributeGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_groups_default_when_absent_or_malformed() {
        let raw = RawRecord::decode(
            RecordKind::Candidate,
            json!({"infos_basicas": {"nome": "Ana"}, "cargo_atual": []}),
        )
        .unwrap();
        let RawRecord::Candidate(candidate) = raw else {
            panic!("expected candidate");
        };
        assert_eq!(candidate.infos_basicas["nome"], json!("Ana"));
        assert!(candidate.cargo_atual.is_empty());
        assert!(candidate.informacoes_pessoais.is_empty());
        assert!(candidate.cv_pt.is_none());
    }

    #[test]
    fn test_prospect_group_skips_non_object_entries() {
        let raw = RawRecord::decode(
            RecordKind::ProspectGroup,
            json!({"titulo": "Dev", "prospects": [{"codigo": "1"}, "lixo", null]}),
        )
        .unwrap();
        let RawRecord::ProspectGroup(group) = raw else {
            panic!("expected prospect group");
        };
        assert_eq!(group.prospects.len(), 1);
        assert_eq!(group.titulo, Some(json!("Dev")));
    }

    #[test]
    fn test_non_object_record_fails_to_decode() {
        assert!(RawRecord::decode(RecordKind::Job, json!("not a job")).is_err());
    }
}

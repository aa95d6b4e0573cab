//! Applicant normalization.

use serde_json::Value;
use tracing::warn;

use crate::models::{Candidate, Disclosure};
use crate::records::raw::{RawCandidate, RawRecord, RecordKind};
use crate::records::NormalizedRecord;

/// Remuneration recorded when the source amount is missing or unparseable.
pub const NO_REMUNERATION: f64 = 0.0;

/// Professional fields joined, in this order, into `searchable_text`.
const SEARCHABLE_FIELDS: &[&str] = &[
    "cargo_atual",
    "objetivo_profissional",
    "titulo_profissional",
    "area_atuacao",
    "conhecimentos_tecnicos",
    "qualificacoes",
    "experiencias",
    "nivel_ingles",
];

/// Normalizes a whole `applicants.json` document (identifier → record).
/// Records without an identifier or with an undecodable body are dropped.
pub fn normalize_candidates(document: &Value) -> Vec<Candidate> {
    let Some(entries) = document.as_object() else {
        warn!("Applicants document is not a JSON object; nothing to normalize");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(id, body)| {
            match RawRecord::decode(RecordKind::Candidate, body.clone()) {
                Ok(RawRecord::Candidate(raw)) => normalize_candidate(id, &raw),
                Ok(_) => None,
                Err(e) => {
                    warn!(candidate_id = %id, "Dropping undecodable applicant record: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Normalizes one applicant. Returns `None` when the identifier is blank.
pub fn normalize_candidate(id: &str, raw: &RawCandidate) -> Option<Candidate> {
    let id = id.trim();
    if id.is_empty() {
        warn!("Dropping applicant record without identifier");
        return None;
    }

    let groups = raw.groups();
    let record = NormalizedRecord::from_groups(groups.iter());
    Some(build_candidate(id, &record))
}

fn build_candidate(id: &str, r: &NormalizedRecord) -> Candidate {
    let remuneration = r.money("remuneracao").unwrap_or(NO_REMUNERATION);

    Candidate {
        id: id.to_string(),
        professional_code: r.text("codigo_profissional"),
        name: r.text("nome"),
        email: r.text("email"),
        sex: r.text("sexo"),
        marital_status: r.text("estado_civil"),
        birth_date: r.date("data_nascimento"),
        phone: r.text("telefone"),
        mobile_phone: r.text("telefone_celular"),
        location: r.text("local"),
        address: r.text("endereco"),
        disability: Disclosure::from_text(&r.text("pcd")),
        current_role: r.text("cargo_atual"),
        objective: r.text("objetivo_profissional"),
        linkedin_url: r.text("url_linkedin"),
        title: r.text("titulo_profissional"),
        domain: r.text("area_atuacao"),
        technical_skills: r.text("conhecimentos_tecnicos"),
        academic_level: r.text("nivel_academico"),
        courses: r.text("cursos"),
        certifications: r.text("certificacoes"),
        remuneration,
        professional_level: r.text("nivel_profissional"),
        english_level: r.text("nivel_ingles"),
        spanish_level: r.text("nivel_espanhol"),
        other_language: r.text("outro_idioma"),
        resume_text: r.text("cv_pt"),
        institution: r.text("instituicao_ensino_superior"),
        qualifications: r.text("qualificacoes"),
        experience: r.text("experiencias"),
        other_course: r.text("outro_curso"),
        current_project: r.text("projeto_atual"),
        unit: r.text("unidade"),
        resume_file: r.text("download_cv"),
        registered_on: r.date("data_criacao"),
        updated_on: r.date("data_atualizacao"),
        searchable_text: searchable_text(r),
    }
}

/// Joins the professional fields with single spaces. Components keep their
/// sentinel; only blank ones are left out.
pub fn searchable_text(record: &NormalizedRecord) -> String {
    SEARCHABLE_FIELDS
        .iter()
        .map(|key| record.text(key))
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
